/// Preview: interactive shell for browsing a prompt universe.
///
/// Usage: preview [--profiles <dir>] [--profile <id>] [--seed <n>] [--index <n>]
///
/// Commands:
///   next / prev               step to the neighbouring index
///   index <n>                 jump to an index
///   seed <n>                  set the world seed
///   reroll                    pick a random world seed
///   profile <id>              switch profile
///   profiles                  list discoverable profiles
///   trace                     show every selection for the current prompt
///   bulk <n>                  generate n prompts with variety stats
///   prefix <text> / suffix <text>   set affixes ('-' clears)
///   info                      profile statistics
///   help                      list commands
///   quit                      exit

use clap::Parser;
use std::collections::HashSet;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use zero_prompt::core::assembler::{self, Affixes};
use zero_prompt::core::engine::{change_token, PromptEngine};
use zero_prompt::core::template::Piece;

#[derive(Debug, Parser)]
#[command(name = "preview", about = "Browse deterministic prompts interactively")]
struct Args {
    /// Directory of `.json` / `.ron` profiles.
    #[arg(long, default_value = "profiles")]
    profiles: PathBuf,

    /// Profile to start with (defaults to default.json / built-in).
    #[arg(long)]
    profile: Option<String>,

    #[arg(long, default_value_t = 42)]
    seed: u32,

    #[arg(long, default_value_t = 0)]
    index: u32,
}

struct Session {
    engine: PromptEngine,
    profile: String,
    seed: u32,
    index: u32,
    prefix: String,
    suffix: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let engine = PromptEngine::builder().profiles_dir(args.profiles.clone()).build();
    let profile = args
        .profile
        .unwrap_or_else(|| engine.default_profile().to_string());

    let mut session = Session {
        engine,
        profile,
        seed: args.seed,
        index: args.index,
        prefix: String::new(),
        suffix: String::new(),
    };

    println!("Profiles: {}", session.engine.available_profiles().join(", "));
    println!("Profile: {}  Seed: {}", session.profile, session.seed);
    println!("Type 'help' for commands.\n");
    session.show();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("preview> ");
        stdout.flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).is_err() || line.is_empty() {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (cmd, rest) = match line.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd.to_lowercase(), rest.trim()),
            None => (line.to_lowercase(), ""),
        };

        match cmd.as_str() {
            "quit" | "exit" | "q" => {
                println!("Goodbye.");
                break;
            }
            "help" | "h" | "?" => print_help(),
            "next" | "n" => {
                session.index = session.index.wrapping_add(1);
                session.show();
            }
            "prev" | "p" => {
                session.index = session.index.wrapping_sub(1);
                session.show();
            }
            "index" | "i" => match rest.parse::<u32>() {
                Ok(n) => {
                    session.index = n;
                    session.show();
                }
                Err(_) => println!("Usage: index <0..{}>", u32::MAX),
            },
            "seed" => {
                if rest.is_empty() {
                    println!("Current seed: {}", session.seed);
                    continue;
                }
                match rest.parse::<u32>() {
                    Ok(s) => {
                        session.seed = s;
                        println!("Seed set to {}", s);
                        session.show();
                    }
                    Err(_) => println!("Invalid seed: {}", rest),
                }
            }
            "reroll" => {
                session.seed = rand::random::<u32>();
                println!("Seed set to {}", session.seed);
                session.show();
            }
            "profile" => {
                if rest.is_empty() {
                    println!("Current profile: {}", session.profile);
                    continue;
                }
                match session.engine.profile(Some(rest)) {
                    Ok(_) => {
                        session.profile = rest.to_string();
                        println!("Profile set to {}", rest);
                        session.show();
                    }
                    Err(e) => println!("ERROR: {}", e),
                }
            }
            "profiles" => {
                for id in session.engine.available_profiles() {
                    let marker = if id == session.profile { "*" } else { " " };
                    println!(" {} {}", marker, id);
                }
            }
            "info" => match session.engine.profile_info(Some(session.profile.as_str())) {
                Ok(info) => println!("{}\n", info),
                Err(e) => println!("ERROR: {}", e),
            },
            "trace" => session.trace(),
            "bulk" => match rest.parse::<u32>() {
                Ok(n) if n > 0 => session.bulk(n),
                _ => println!("Usage: bulk <n>"),
            },
            "prefix" => {
                session.prefix = if rest == "-" { String::new() } else { rest.to_string() };
                session.show();
            }
            "suffix" => {
                session.suffix = if rest == "-" { String::new() } else { rest.to_string() };
                session.show();
            }
            _ => {
                println!("Unknown command: '{}'. Type 'help' for available commands.", cmd);
            }
        }
    }
}

impl Session {
    fn show(&self) {
        let affixes = Affixes::new(&self.prefix, &self.suffix);
        match self
            .engine
            .generate_prompt_with(self.seed, self.index, Some(self.profile.as_str()), affixes)
        {
            Ok(text) => println!("[{}] {}\n", self.index, text),
            Err(e) => println!("ERROR: {}\n", e),
        }
    }

    fn trace(&self) {
        let config = match self.engine.profile(Some(self.profile.as_str())) {
            Ok(config) => config,
            Err(e) => {
                println!("ERROR: {}", e);
                return;
            }
        };

        let selection = assembler::select(self.seed, self.index, &config);
        println!("\n--- Selection Trace ---");
        println!(
            "seed={} index={} token={:08x}",
            self.seed,
            self.index,
            change_token(self.seed, self.index, &self.profile)
        );
        println!(
            "template #{} (coord 0): {}",
            selection.template_index,
            selection.template.source()
        );
        for (position, choice) in selection.slots.iter().enumerate() {
            println!(
                "  {:<12} (coord {}) #{:<4} {}",
                choice.slot,
                assembler::slot_coordinate(position),
                choice.index,
                choice.value
            );
        }

        let unresolved: Vec<&str> = selection
            .pieces(&config)
            .into_iter()
            .filter_map(|piece| match piece {
                Piece::Unresolved(name) => Some(name),
                _ => None,
            })
            .collect();
        if !unresolved.is_empty() {
            println!("  unresolved placeholders: {}", unresolved.join(", "));
        }
        println!("--- End ---\n");
    }

    fn bulk(&self, count: u32) {
        let prompts = match self
            .engine
            .generate_batch(self.seed, self.index, count, Some(self.profile.as_str()))
        {
            Ok(prompts) => prompts,
            Err(e) => {
                println!("ERROR: {}", e);
                return;
            }
        };

        println!("\n=== Bulk Generation: {} prompts from index {} ===\n", prompts.len(), self.index);
        for (offset, prompt) in prompts.iter().enumerate().take(10) {
            println!("[{}] {}", self.index.wrapping_add(offset as u32), prompt);
        }
        if prompts.len() > 10 {
            println!("... {} more", prompts.len() - 10);
        }

        let unique: HashSet<&String> = prompts.iter().collect();
        println!("\nUnique prompts: {} / {}", unique.len(), prompts.len());

        let avg_len = prompts.iter().map(|p| p.len() as f64).sum::<f64>() / prompts.len() as f64;
        println!("Average length: {:.0} chars", avg_len);

        let words: HashSet<&str> = prompts
            .iter()
            .flat_map(|p| p.split(|c: char| !c.is_alphanumeric() && c != '\''))
            .filter(|w| !w.is_empty())
            .collect();
        println!("Distinct words: {}\n", words.len());
    }
}

fn print_help() {
    println!("Commands:");
    println!("  next | n                    Step to the next index");
    println!("  prev | p                    Step to the previous index");
    println!("  index <n>                   Jump to an index");
    println!("  seed [n]                    Show or set the world seed");
    println!("  reroll                      Pick a random world seed");
    println!("  profile [id]                Show or switch profile");
    println!("  profiles                    List discoverable profiles");
    println!("  trace                       Show every selection for the current prompt");
    println!("  bulk <n>                    Generate n prompts with variety stats");
    println!("  prefix <text> | -           Set or clear the prefix");
    println!("  suffix <text> | -           Set or clear the suffix");
    println!("  info                        Profile statistics");
    println!("  help                        Show this help");
    println!("  quit                        Exit");
}
