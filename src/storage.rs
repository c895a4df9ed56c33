//! Per-language source persistence.
//!
//! A deliberately small key-value seam: last write per key wins and write
//! failures are swallowed, matching the contract the controller expects.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

pub trait CodeStore {
    fn get(&self, key: &str) -> Option<String>;
    /// May fail silently (quota, permissions); persistence is best-effort.
    fn set(&mut self, key: &str, value: &str);
}

impl CodeStore for Box<dyn CodeStore> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) {
        (**self).set(key, value)
    }
}

/// File-backed store under the platform data directory, one file per key.
pub struct FileCodeStore {
    root: PathBuf,
}

impl FileCodeStore {
    pub fn new() -> anyhow::Result<Self> {
        let root = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("could not determine data directory"))?
            .join("codepad-cli")
            .join("saved");
        fs::create_dir_all(&root)?;
        Ok(Self::with_root(root))
    }

    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }
}

impl CodeStore for FileCodeStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.root.join(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) {
        let _ = fs::create_dir_all(&self.root);
        let _ = fs::write(self.root.join(key), value);
    }
}

/// In-memory store; used when auto-save is disabled and in tests.
#[derive(Debug, Default)]
pub struct MemoryCodeStore {
    entries: HashMap<String, String>,
}

impl CodeStore for MemoryCodeStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}
