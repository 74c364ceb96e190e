use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Appending beyond this many memory entries triggers eviction.
pub const MEMORY_CAP: usize = 100;
/// Eviction keeps only this many of the most recent entries. The truncation
/// is deliberately asymmetric (drop down to 50, not 100) and must stay that
/// way for compatibility with existing context files.
pub const MEMORY_RETAIN: usize = 50;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MemoryEntry {
    pub role: String,
    pub content: String,
}

impl MemoryEntry {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Per-project working state, persisted at `./.termforge/context.json`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ContextData {
    pub files: Vec<String>,
    pub project_goal: String,
    pub memory: Vec<MemoryEntry>,
}

/// Loads the project context once per process and rewrites the whole file
/// after every mutation. There is no file locking: two invocations against
/// the same project race on this file and the last writer wins. Accepted
/// limitation, documented in the README.
pub struct ContextManager {
    path: PathBuf,
    pub data: ContextData,
}

impl ContextManager {
    pub fn new() -> Result<Self> {
        Self::with_path(PathBuf::from(".termforge").join("context.json"))
    }

    /// An absent file yields empty defaults and does not create the file;
    /// the first mutating call does.
    pub fn with_path(path: PathBuf) -> Result<Self> {
        let data = Self::load(&path)?;
        Ok(Self { path, data })
    }

    fn load(path: &Path) -> Result<ContextData> {
        if !path.exists() {
            return Ok(ContextData::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read context file {}", path.display()))?;
        let data = serde_json::from_str(&content)
            .with_context(|| format!("Malformed JSON in {}", path.display()))?;
        Ok(data)
    }

    /// Records a path touched by a generation command. Idempotent: a path
    /// already present keeps its original position and nothing is written.
    pub fn add_file(&mut self, filepath: &str) -> Result<()> {
        if self.data.files.iter().any(|f| f == filepath) {
            debug!("Context already tracks {filepath}");
            return Ok(());
        }
        self.data.files.push(filepath.to_string());
        self.save()
    }

    /// Last write wins; no history of prior goals is kept.
    pub fn set_goal(&mut self, goal: &str) -> Result<()> {
        self.data.project_goal = goal.to_string();
        self.save()
    }

    pub fn add_memory(&mut self, entry: MemoryEntry) -> Result<()> {
        self.data.memory.push(entry);
        if self.data.memory.len() > MEMORY_CAP {
            let drop = self.data.memory.len() - MEMORY_RETAIN;
            self.data.memory.drain(..drop);
        }
        self.save()
    }

    /// Convenience for AI commands: record the prompt and the response as
    /// two consecutive memory entries.
    pub fn record_exchange(&mut self, prompt: &str, response: &str) -> Result<()> {
        self.add_memory(MemoryEntry::user(prompt))?;
        self.add_memory(MemoryEntry::assistant(response))
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.data)?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write context file {}", self.path.display()))?;
        Ok(())
    }

    pub fn context_file_path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager_in(dir: &tempfile::TempDir) -> ContextManager {
        ContextManager::with_path(dir.path().join("context.json")).unwrap()
    }

    #[test]
    fn absent_file_loads_empty_and_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager_in(&dir);
        assert_eq!(manager.data, ContextData::default());
        assert!(!dir.path().join("context.json").exists());
    }

    #[test]
    fn add_file_is_idempotent_and_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager_in(&dir);
        manager.add_file("src/main.rs").unwrap();
        manager.add_file("README.md").unwrap();
        manager.add_file("src/main.rs").unwrap();
        assert_eq!(manager.data.files, vec!["src/main.rs", "README.md"]);
    }

    #[test]
    fn set_goal_last_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager_in(&dir);
        manager.set_goal("first").unwrap();
        manager.set_goal("second").unwrap();
        assert_eq!(manager.data.project_goal, "second");
    }

    #[test]
    fn memory_eviction_keeps_entries_52_to_101() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager_in(&dir);
        for i in 1..=101 {
            manager.add_memory(MemoryEntry::user(i.to_string())).unwrap();
        }
        assert_eq!(manager.data.memory.len(), MEMORY_RETAIN);
        assert_eq!(manager.data.memory[0].content, "52");
        assert_eq!(manager.data.memory[49].content, "101");
    }

    #[test]
    fn mutations_persist_and_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager_in(&dir);
        manager.add_file("lib.py").unwrap();
        manager.set_goal("ship it").unwrap();
        manager.record_exchange("hello", "hi there").unwrap();

        let reloaded = manager_in(&dir);
        assert_eq!(reloaded.data, manager.data);
    }

    #[test]
    fn malformed_context_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("context.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(ContextManager::with_path(path).is_err());
    }
}
