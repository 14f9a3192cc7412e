// src/application/stage_hints.rs
use std::collections::HashMap;

use crate::domain::article::{Stage, VersionKey};

/// Request-scoped memo of stages computed by recent mutations, keyed by
/// `articleId:version`. Reads may use an entry instead of deriving the stage
/// again; an empty map gives the same answers.
#[derive(Debug, Default, Clone)]
pub struct StageHints {
    entries: HashMap<VersionKey, Stage>,
}

impl StageHints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: VersionKey, stage: Stage) {
        self.entries.insert(key, stage);
    }

    pub fn get(&self, key: &VersionKey) -> Option<Stage> {
        self.entries.get(key).copied()
    }

    pub fn forget(&mut self, key: &VersionKey) {
        self.entries.remove(key);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
