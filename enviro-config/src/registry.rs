//! Registry of named compensation documents
//!
//! Boards from different batches need different fits. The registry keeps
//! every known document under a name (the file stem for the packaged ones)
//! so a station can pick one without touching the filesystem.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use include_dir::{include_dir, Dir};

use crate::compensation::CompensationDocument;
use crate::errors::{ConfigError, ConfigResult};

/// Documents shipped with the crate
pub(crate) static PROFILES: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/profiles");

/// Name of the packaged document used when nothing else is configured
pub const DEFAULT_PROFILE: &str = "enviro-plus";

/// Thread-safe compensation document registry
pub struct ProfileRegistry {
    documents: RwLock<HashMap<String, Arc<CompensationDocument>>>,
}

impl ProfileRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self { documents: RwLock::new(HashMap::new()) }
    }

    /// Register a document under a new name
    pub fn register(&self, name: &str, document: CompensationDocument) -> ConfigResult<()> {
        let mut documents = self.documents.write().map_err(|_| ConfigError::poisoned())?;
        if documents.contains_key(name) {
            return Err(ConfigError::Invalid(format!("Profile {name} already registered")));
        }
        documents.insert(name.to_string(), Arc::new(document));
        Ok(())
    }

    /// Register or overwrite
    pub fn replace(&self, name: &str, document: CompensationDocument) -> ConfigResult<()> {
        let mut documents = self.documents.write().map_err(|_| ConfigError::poisoned())?;
        documents.insert(name.to_string(), Arc::new(document));
        Ok(())
    }

    pub fn get(&self, name: &str) -> ConfigResult<Arc<CompensationDocument>> {
        let documents = self.documents.read().map_err(|_| ConfigError::poisoned())?;
        documents.get(name).cloned().ok_or_else(|| ConfigError::NotFound(name.to_string()))
    }

    /// Registered names, sorted
    pub fn names(&self) -> ConfigResult<Vec<String>> {
        let documents = self.documents.read().map_err(|_| ConfigError::poisoned())?;
        let mut names: Vec<String> = documents.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    /// Load every packaged document from `profiles/compensation/`
    pub fn load_defaults(&self) -> ConfigResult<()> {
        let dir = PROFILES
            .get_dir("compensation")
            .ok_or_else(|| ConfigError::NotFound("packaged compensation profiles".to_string()))?;

        for file in dir.files() {
            let path = file.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| ConfigError::Invalid(format!("bad profile file name {}", path.display())))?;
            let json = file
                .contents_utf8()
                .ok_or_else(|| ConfigError::Parse(format!("{} is not UTF-8", path.display())))?;
            self.register(name, CompensationDocument::from_json(json)?)?;
        }
        Ok(())
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::new()
    }
}

lazy_static::lazy_static! {
    /// Global registry with the packaged documents loaded
    pub static ref GLOBAL_REGISTRY: ProfileRegistry = {
        let registry = ProfileRegistry::new();
        if let Err(e) = registry.load_defaults() {
            log::warn!("Packaged compensation profiles failed to load: {}", e);
        }
        registry
    };
}
