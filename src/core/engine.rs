/// The prompt engine: profile resolution plus generation entry points.

use once_cell::sync::OnceCell;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::builtin;
use crate::core::assembler::{self, Affixes, TEMPLATE_COORDINATE};
use crate::core::cache::ProfileCache;
use crate::core::hash::{coordinate_hash, identity_hash};
use crate::core::profile::{ConfigurationError, VocabularyConfiguration};
use crate::core::source::{discovery_order, DirectorySource, EmptySource, ProfileSource};
use crate::core::stats;

/// Identifier selected when a caller names no profile.
pub const DEFAULT_PROFILE: &str = "default.json";

/// Top-level entry point. Built via `PromptEngine::builder()`.
///
/// Generation is pure; the only shared state is the profile cache, so one
/// engine can serve any number of threads.
#[derive(Debug)]
pub struct PromptEngine {
    cache: ProfileCache,
    default_profile: String,
    builtin: OnceCell<Arc<VocabularyConfiguration>>,
}

/// Builder for constructing a `PromptEngine`.
pub struct PromptEngineBuilder {
    profiles_dir: Option<PathBuf>,
    source: Option<Box<dyn ProfileSource>>,
    default_profile: String,
    /// Directly provided profiles (for testing without files).
    profiles: Vec<(String, VocabularyConfiguration)>,
}

impl PromptEngine {
    pub fn builder() -> PromptEngineBuilder {
        PromptEngineBuilder {
            profiles_dir: None,
            source: None,
            default_profile: DEFAULT_PROFILE.to_string(),
            profiles: Vec::new(),
        }
    }

    pub fn default_profile(&self) -> &str {
        &self.default_profile
    }

    pub fn cache(&self) -> &ProfileCache {
        &self.cache
    }

    /// Resolve a profile identifier (`None` → the default profile).
    ///
    /// The default identifier falls back to the built-in vocabulary when
    /// the store has no source for it. The fallback is cached under the
    /// default identifier until the store gains a source for it.
    pub fn profile(
        &self,
        profile: Option<&str>,
    ) -> Result<Arc<VocabularyConfiguration>, ConfigurationError> {
        let id = profile.unwrap_or(&self.default_profile);
        match self.cache.get(id) {
            Err(ConfigurationError::NotFound { .. }) if id == self.default_profile => {
                debug!(profile = %id, "no source for default profile, using built-in vocabulary");
                let builtin = self.builtin()?;
                self.cache.insert_fallback(id, Arc::clone(&builtin));
                Ok(builtin)
            }
            other => other,
        }
    }

    /// The compiled-in vocabulary, built on first use.
    pub fn builtin(&self) -> Result<Arc<VocabularyConfiguration>, ConfigurationError> {
        self.builtin
            .get_or_try_init(|| builtin::vocabulary().map(Arc::new))
            .cloned()
    }

    /// Generate the prompt at `(seed, index)` from the named profile.
    pub fn generate_prompt(
        &self,
        seed: u32,
        index: u32,
        profile: Option<&str>,
    ) -> Result<String, ConfigurationError> {
        let config = self.profile(profile)?;
        Ok(assembler::generate(seed, index, &config))
    }

    /// Like [`generate_prompt`](Self::generate_prompt) with prefix/suffix text.
    pub fn generate_prompt_with(
        &self,
        seed: u32,
        index: u32,
        profile: Option<&str>,
        affixes: Affixes<'_>,
    ) -> Result<String, ConfigurationError> {
        let config = self.profile(profile)?;
        Ok(assembler::generate_with_affixes(seed, index, &config, affixes))
    }

    /// Generate `count` consecutive prompts starting at `start`.
    ///
    /// Indices wrap at `u32::MAX`, matching the coordinate space.
    pub fn generate_batch(
        &self,
        seed: u32,
        start: u32,
        count: u32,
        profile: Option<&str>,
    ) -> Result<Vec<String>, ConfigurationError> {
        let config = self.profile(profile)?;
        Ok((0..count)
            .map(|offset| assembler::generate(seed, start.wrapping_add(offset), &config))
            .collect())
    }

    /// Human-readable statistics for a profile.
    pub fn profile_info(&self, profile: Option<&str>) -> Result<String, ConfigurationError> {
        let id = profile.unwrap_or(&self.default_profile);
        let config = self.profile(Some(id))?;
        Ok(stats::profile_info(id, &config))
    }

    /// Every profile identifier on offer: the default first, the rest sorted.
    pub fn available_profiles(&self) -> Vec<String> {
        let mut ids = match self.cache.source().list() {
            Ok(ids) => ids,
            Err(e) => {
                warn!(error = %e, "profile discovery failed");
                Vec::new()
            }
        };
        ids.extend(self.cache.pinned_ids());
        // The default always resolves, through the built-in vocabulary if need be.
        ids.push(self.default_profile.clone());
        discovery_order(ids, &self.default_profile)
    }
}

/// Fingerprint of a generation request, cheap to compute without loading.
///
/// Hosts compare tokens to decide whether a prompt needs regenerating.
pub fn change_token(seed: u32, index: u32, profile: &str) -> u32 {
    coordinate_hash(
        seed ^ identity_hash(profile),
        &[index as i32, TEMPLATE_COORDINATE],
    )
}

impl PromptEngineBuilder {
    /// Directory holding `.json` / `.ron` profile files.
    pub fn profiles_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.profiles_dir = Some(path.into());
        self
    }

    /// A custom profile store; takes precedence over `profiles_dir`.
    pub fn with_source(mut self, source: impl ProfileSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn default_profile(mut self, id: &str) -> Self {
        self.default_profile = id.to_string();
        self
    }

    /// Provide a profile directly (for testing without files).
    pub fn with_profile(mut self, id: &str, profile: VocabularyConfiguration) -> Self {
        self.profiles.push((id.to_string(), profile));
        self
    }

    pub fn build(self) -> PromptEngine {
        let source: Box<dyn ProfileSource> = match (self.source, self.profiles_dir) {
            (Some(source), _) => source,
            (None, Some(dir)) => Box::new(DirectorySource::new(dir)),
            (None, None) => Box::new(EmptySource),
        };

        let cache = ProfileCache::from_boxed(source);
        for (id, profile) in self.profiles {
            cache.insert(&id, profile);
        }

        PromptEngine {
            cache,
            default_profile: self.default_profile,
            builtin: OnceCell::new(),
        }
    }
}
