/// Profile cache: loaded vocabularies keyed by identifier.
///
/// Entries are immutable `Arc`s shared by every reader. A lookup probes the
/// source's modification stamp and reloads only when it moved forward.
/// Concurrent first loads of one identifier are serialized behind a
/// per-identifier gate so the source is parsed once. A gate lives only
/// while a load for its identifier is in flight.

use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, trace};

use crate::core::profile::{ConfigurationError, ProfileFormat, VocabularyConfiguration};
use crate::core::source::ProfileSource;

#[derive(Debug, Clone)]
struct CachedProfile {
    config: Arc<VocabularyConfiguration>,
    stamp: Option<SystemTime>,
    /// Registered directly rather than loaded; never probed or reloaded.
    pinned: bool,
}

pub struct ProfileCache {
    source: Box<dyn ProfileSource>,
    entries: RwLock<FxHashMap<String, CachedProfile>>,
    gates: Mutex<FxHashMap<String, Arc<Mutex<()>>>>,
}

impl ProfileCache {
    pub fn new(source: impl ProfileSource + 'static) -> Self {
        Self::from_boxed(Box::new(source))
    }

    pub fn from_boxed(source: Box<dyn ProfileSource>) -> Self {
        Self {
            source,
            entries: RwLock::new(FxHashMap::default()),
            gates: Mutex::new(FxHashMap::default()),
        }
    }

    pub fn source(&self) -> &dyn ProfileSource {
        self.source.as_ref()
    }

    /// Fetch a profile, loading or reloading it from the source as needed.
    pub fn get(&self, id: &str) -> Result<Arc<VocabularyConfiguration>, ConfigurationError> {
        if let Some(config) = self.lookup_fresh(id) {
            trace!(profile = %id, "profile cache hit");
            return Ok(config);
        }

        let gate = self.gate(id);
        let _guard = gate.lock();

        // Another caller may have completed the load while we waited.
        let result = match self.lookup_fresh(id) {
            Some(config) => {
                trace!(profile = %id, "profile loaded by concurrent caller");
                Ok(config)
            }
            None => self.load(id),
        };
        self.release_gate(id, &gate);
        result
    }

    /// Register an already-validated profile under `id`.
    pub fn insert(&self, id: &str, config: VocabularyConfiguration) -> Arc<VocabularyConfiguration> {
        let config = Arc::new(config);
        self.entries.write().insert(
            id.to_string(),
            CachedProfile {
                config: Arc::clone(&config),
                stamp: None,
                pinned: true,
            },
        );
        config
    }

    /// Store `config` under `id` on behalf of a source that has none.
    ///
    /// Unlike [`insert`](Self::insert) the entry stays subject to the
    /// freshness probe: once the source reports a stamp for `id` the next
    /// lookup loads the real profile in its place.
    pub fn insert_fallback(&self, id: &str, config: Arc<VocabularyConfiguration>) {
        self.entries.write().insert(
            id.to_string(),
            CachedProfile {
                config,
                stamp: None,
                pinned: false,
            },
        );
    }

    /// Drop one entry. Returns whether it was present.
    pub fn evict(&self, id: &str) -> bool {
        let removed = self.entries.write().remove(id).is_some();
        if removed {
            debug!(profile = %id, "evicted profile");
        }
        removed
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Identifiers registered with [`ProfileCache::insert`].
    pub fn pinned_ids(&self) -> Vec<String> {
        self.entries
            .read()
            .iter()
            .filter(|(_, entry)| entry.pinned)
            .map(|(id, _)| id.clone())
            .collect()
    }

    fn lookup_fresh(&self, id: &str) -> Option<Arc<VocabularyConfiguration>> {
        let entry = self.entries.read().get(id).cloned()?;
        if entry.pinned {
            return Some(entry.config);
        }

        match (self.source.modified(id), entry.stamp) {
            (Some(current), Some(loaded)) if current > loaded => {
                debug!(profile = %id, "profile source changed since load");
                None
            }
            (Some(_), None) => {
                debug!(profile = %id, "profile source gained a modification stamp");
                None
            }
            _ => Some(entry.config),
        }
    }

    fn gate(&self, id: &str) -> Arc<Mutex<()>> {
        let mut gates = self.gates.lock();
        Arc::clone(gates.entry(id.to_string()).or_default())
    }

    /// Forget the gate for `id` unless a newer caller already replaced it.
    fn release_gate(&self, id: &str, gate: &Arc<Mutex<()>>) {
        let mut gates = self.gates.lock();
        if gates.get(id).is_some_and(|current| Arc::ptr_eq(current, gate)) {
            gates.remove(id);
        }
    }

    fn load(&self, id: &str) -> Result<Arc<VocabularyConfiguration>, ConfigurationError> {
        let format = ProfileFormat::from_id(id)
            .ok_or_else(|| ConfigurationError::UnsupportedFormat { id: id.to_string() })?;

        // Stamp before reading: a write racing the read forces a later reload.
        let stamp = self.source.modified(id);
        let text = self.source.read(id)?;
        let config = Arc::new(VocabularyConfiguration::parse(id, &text, format)?);

        debug!(
            profile = %id,
            templates = config.templates().len(),
            pools = config.pool_count(),
            "loaded profile"
        );

        self.entries.write().insert(
            id.to_string(),
            CachedProfile {
                config: Arc::clone(&config),
                stamp,
                pinned: false,
            },
        );
        Ok(config)
    }
}

impl std::fmt::Debug for ProfileCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileCache")
            .field("entries", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
    use std::time::{Duration, UNIX_EPOCH};

    /// In-memory store that counts reads and exposes a settable revision.
    #[derive(Clone, Default)]
    struct CountingSource {
        files: Arc<RwLock<FxHashMap<String, String>>>,
        revision: Arc<AtomicU64>,
        reads: Arc<AtomicUsize>,
        read_delay: Option<Duration>,
    }

    impl CountingSource {
        fn with(id: &str, text: &str) -> Self {
            let source = CountingSource::default();
            source.put(id, text);
            source
        }

        fn put(&self, id: &str, text: &str) {
            self.files.write().insert(id.to_string(), text.to_string());
        }

        fn touch(&self) {
            self.revision.fetch_add(1, Ordering::SeqCst);
        }

        fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    impl ProfileSource for CountingSource {
        fn list(&self) -> Result<Vec<String>, ConfigurationError> {
            Ok(self.files.read().keys().cloned().collect())
        }

        fn read(&self, id: &str) -> Result<String, ConfigurationError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.read_delay {
                std::thread::sleep(delay);
            }
            self.files
                .read()
                .get(id)
                .cloned()
                .ok_or_else(|| ConfigurationError::NotFound { id: id.to_string() })
        }

        fn modified(&self, id: &str) -> Option<SystemTime> {
            if !self.files.read().contains_key(id) {
                return None;
            }
            Some(UNIX_EPOCH + Duration::from_secs(self.revision.load(Ordering::SeqCst)))
        }
    }

    const A_V1: &str = r#"{"templates": ["{w}"], "pools": {"w": ["one"]}}"#;
    const A_V2: &str = r#"{"templates": ["{w}"], "pools": {"w": ["two", "three"]}}"#;

    #[test]
    fn second_get_is_served_from_cache() {
        let source = CountingSource::with("a.json", A_V1);
        let cache = ProfileCache::new(source.clone());

        let first = cache.get("a.json").unwrap();
        let second = cache.get("a.json").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.reads(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn newer_stamp_triggers_reload() {
        let source = CountingSource::with("a.json", A_V1);
        let cache = ProfileCache::new(source.clone());

        let first = cache.get("a.json").unwrap();
        assert_eq!(first.pool("w").unwrap().len(), 1);

        source.put("a.json", A_V2);
        // Content changed but the stamp did not: still cached.
        let unchanged = cache.get("a.json").unwrap();
        assert!(Arc::ptr_eq(&first, &unchanged));

        source.touch();
        let reloaded = cache.get("a.json").unwrap();
        assert!(!Arc::ptr_eq(&first, &reloaded));
        assert_eq!(reloaded.pool("w").unwrap().len(), 2);
        assert_eq!(source.reads(), 2);
    }

    #[test]
    fn missing_profile_is_not_cached() {
        let source = CountingSource::default();
        let cache = ProfileCache::new(source.clone());
        let err = cache.get("ghost.json").unwrap_err();
        assert!(matches!(err, ConfigurationError::NotFound { ref id } if id == "ghost.json"));
        assert!(cache.is_empty());
    }

    #[test]
    fn invalid_profile_surfaces_error() {
        let source = CountingSource::with("bad.json", r#"{"pools": {"w": ["x"]}}"#);
        let cache = ProfileCache::new(source);
        let err = cache.get("bad.json").unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingField { field: "templates", .. }));
        assert!(!cache.contains("bad.json"));
    }

    #[test]
    fn unsupported_extension() {
        let source = CountingSource::with("a.yaml", A_V1);
        let cache = ProfileCache::new(source.clone());
        assert!(matches!(
            cache.get("a.yaml").unwrap_err(),
            ConfigurationError::UnsupportedFormat { .. }
        ));
        assert_eq!(source.reads(), 0);
    }

    #[test]
    fn evict_forces_reread() {
        let source = CountingSource::with("a.json", A_V1);
        let cache = ProfileCache::new(source.clone());
        cache.get("a.json").unwrap();
        assert!(cache.evict("a.json"));
        assert!(!cache.evict("a.json"));
        cache.get("a.json").unwrap();
        assert_eq!(source.reads(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn pinned_profiles_bypass_source() {
        let source = CountingSource::default();
        let cache = ProfileCache::new(source.clone());
        let config = VocabularyConfiguration::parse_json("mem.json", A_V1).unwrap();
        let pinned = cache.insert("mem.json", config);

        let fetched = cache.get("mem.json").unwrap();
        assert!(Arc::ptr_eq(&pinned, &fetched));
        assert_eq!(source.reads(), 0);
        assert_eq!(cache.pinned_ids(), vec!["mem.json".to_string()]);
    }

    #[test]
    fn fallback_entry_serves_until_source_appears() {
        let source = CountingSource::default();
        let cache = ProfileCache::new(source.clone());
        let fallback = Arc::new(VocabularyConfiguration::parse_json("d.json", A_V1).unwrap());
        cache.insert_fallback("d.json", Arc::clone(&fallback));

        for _ in 0..10 {
            assert!(Arc::ptr_eq(&cache.get("d.json").unwrap(), &fallback));
        }
        assert_eq!(source.reads(), 0);
        assert!(cache.pinned_ids().is_empty());

        source.put("d.json", A_V2);
        let real = cache.get("d.json").unwrap();
        assert_eq!(real.pool("w").unwrap().len(), 2);
        assert_eq!(source.reads(), 1);
    }

    #[test]
    fn gates_are_released_after_loading() {
        let source = CountingSource::with("a.json", A_V1);
        let cache = ProfileCache::new(source);

        cache.get("a.json").unwrap();
        cache.get("ghost.json").unwrap_err();
        cache.get("a.yaml").unwrap_err();
        assert!(cache.gates.lock().is_empty());

        cache.evict("a.json");
        cache.get("a.json").unwrap();
        assert!(cache.gates.lock().is_empty());
    }

    #[test]
    fn concurrent_first_loads_read_once() {
        let mut source = CountingSource::with("a.json", A_V1);
        source.read_delay = Some(Duration::from_millis(20));
        let cache = ProfileCache::new(source.clone());

        let results: Vec<Arc<VocabularyConfiguration>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8).map(|_| s.spawn(|| cache.get("a.json").unwrap())).collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(source.reads(), 1);
        for config in &results[1..] {
            assert!(Arc::ptr_eq(&results[0], config));
        }
        assert!(cache.gates.lock().is_empty());
    }
}
