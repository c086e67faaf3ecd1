//! Collaborator doubles that record how often they are consulted.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::registry::{AccessPolicy, LookupError, ProjectLookup};

#[derive(Default)]
pub struct CountingProjects {
    names: HashSet<String>,
    pub queried: Mutex<Vec<String>>,
    pub fail: bool,
}

impl CountingProjects {
    pub fn with(names: &[&str]) -> Self {
        Self {
            names: names.iter().map(|n| n.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queried.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProjectLookup for CountingProjects {
    async fn exists(&self, name: &str) -> Result<bool, LookupError> {
        self.queried.lock().unwrap().push(name.to_string());
        if self.fail {
            return Err(LookupError::Unavailable("store offline".into()));
        }
        Ok(self.names.contains(name))
    }
}

pub struct FixedPolicy {
    allowed: bool,
    pub calls: AtomicUsize,
}

impl FixedPolicy {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn deny() -> Self {
        Self {
            allowed: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccessPolicy for FixedPolicy {
    async fn can_anonymous_read(&self, _repository: &str) -> Result<bool, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.allowed)
    }
}
