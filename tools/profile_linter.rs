/// Profile Linter: validates vocabulary profiles and reports coverage.
///
/// Usage: profile_linter <profile_dir|profile_file> [--strict] [--min-pool <n>]
///        profile_linter --export-builtin <path>

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

use zero_prompt::builtin;
use zero_prompt::core::engine::DEFAULT_PROFILE;
use zero_prompt::core::profile::VocabularyConfiguration;
use zero_prompt::core::source::{discovery_order, DirectorySource, ProfileSource};
use zero_prompt::core::stats::{format_scientific, format_thousands, total_combinations};

#[derive(Debug, Parser)]
#[command(name = "profile_linter", about = "Validate zero-prompt vocabulary profiles")]
struct Args {
    /// A profile file or a directory of `.json` / `.ron` profiles.
    path: Option<PathBuf>,

    /// Treat warnings as errors.
    #[arg(long)]
    strict: bool,

    /// Warn about pools with fewer entries than this.
    #[arg(long, default_value_t = 3)]
    min_pool: usize,

    /// Write the built-in vocabulary as a JSON profile and exit.
    #[arg(long, value_name = "PATH")]
    export_builtin: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(true) => process::exit(0),
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("ERROR: {e:#}");
            process::exit(2);
        }
    }
}

fn run(args: &Args) -> Result<bool> {
    if let Some(ref out) = args.export_builtin {
        export_builtin(out)?;
        println!("Wrote built-in vocabulary to {}", out.display());
        return Ok(true);
    }

    let Some(ref path) = args.path else {
        bail!("no profile path given (see --help)");
    };

    let profiles = collect_profiles(path)?;
    if profiles.is_empty() {
        println!("No profiles found in {}", path.display());
        return Ok(true);
    }

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    println!("\n=== Profile Lint Report ===\n");
    for (id, loaded) in &profiles {
        match loaded {
            Ok(vocab) => {
                let total = total_combinations(vocab);
                println!(
                    "{}: {} templates, {} pools, {} prompts ({})",
                    id,
                    vocab.templates().len(),
                    vocab.pool_count(),
                    format_thousands(&total),
                    format_scientific(&total)
                );
                lint_profile(id, vocab, args.min_pool, &mut warnings);
            }
            Err(e) => errors.push(e.clone()),
        }
    }
    println!();

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {warning}");
    }

    for error in &errors {
        println!("ERROR: {error}");
    }

    println!(
        "\nSummary: {} profiles, {} errors, {} warnings",
        profiles.len(),
        errors.len(),
        warnings.len()
    );

    Ok(errors.is_empty() && (!args.strict || warnings.is_empty()))
}

type Loaded = (String, Result<VocabularyConfiguration, String>);

fn collect_profiles(path: &Path) -> Result<Vec<Loaded>> {
    if path.is_file() {
        let id = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("profile")
            .to_string();
        let loaded = VocabularyConfiguration::load(path).map_err(|e| e.to_string());
        return Ok(vec![(id, loaded)]);
    }

    if !path.is_dir() {
        bail!("path '{}' does not exist", path.display());
    }

    let source = DirectorySource::new(path);
    let ids = source
        .list()
        .with_context(|| format!("listing {}", path.display()))?;
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    Ok(discovery_order(ids, DEFAULT_PROFILE)
        .into_iter()
        .map(|id| {
            let loaded = VocabularyConfiguration::load(&path.join(&id)).map_err(|e| e.to_string());
            (id, loaded)
        })
        .collect())
}

fn lint_profile(id: &str, vocab: &VocabularyConfiguration, min_pool: usize, warnings: &mut Vec<String>) {
    for (index, slot) in vocab.unresolved_placeholders() {
        warnings.push(format!(
            "{id}: template {index} references undeclared slot '{slot}' (renders as [{slot}])"
        ));
    }

    for slot in vocab.unused_slots() {
        warnings.push(format!("{id}: pool '{slot}' is not referenced by any template"));
    }

    for (slot, pool) in vocab.pools() {
        if pool.len() < min_pool {
            warnings.push(format!(
                "{id}: pool '{slot}' has only {} entries (minimum {min_pool} recommended)",
                pool.len()
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for item in pool {
            if !seen.insert(item.as_str()) {
                warnings.push(format!("{id}: pool '{slot}' repeats '{item}'"));
            }
        }
    }

    let mut seen = std::collections::HashSet::new();
    for (index, template) in vocab.templates().iter().enumerate() {
        if !seen.insert(template.source()) {
            warnings.push(format!("{id}: template {index} duplicates an earlier template"));
        }
    }
}

fn export_builtin(out: &Path) -> Result<()> {
    let doc = builtin::document();
    let json = serde_json::to_string_pretty(&doc).context("serializing built-in vocabulary")?;
    std::fs::write(out, json + "\n").with_context(|| format!("writing {}", out.display()))?;
    Ok(())
}
