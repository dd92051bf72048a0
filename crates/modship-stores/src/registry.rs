//! Publisher registry

use std::sync::Arc;

use modship_core::{Config, Credentials};

use crate::curseforge::CurseForgePublisher;
use crate::error::{Result, StoreError};
use crate::modrinth::ModrinthPublisher;
use crate::traits::Publisher;
use crate::types::Platform;

/// Ordered set of publishers; Modrinth always runs before CurseForge
pub struct PublisherRegistry {
    publishers: Vec<Arc<dyn Publisher>>,
}

impl PublisherRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            publishers: Vec::new(),
        }
    }

    /// Publishers for every enabled platform that is not skipped
    pub fn from_config(
        config: &Config,
        credentials: &Credentials,
        skip_modrinth: bool,
        skip_curseforge: bool,
    ) -> Result<Self> {
        let mut registry = Self::new();
        let user_agent = config.user_agent();

        if config.modrinth.enabled && !skip_modrinth {
            let token = credentials.modrinth_token.clone().ok_or_else(|| {
                StoreError::AuthenticationFailed("MODRINTH_TOKEN is not set".to_string())
            })?;
            registry.register(Arc::new(ModrinthPublisher::new(
                config.modrinth.clone(),
                token,
                user_agent.clone(),
            )));
        }

        if config.curseforge.enabled && !skip_curseforge {
            let token = credentials.curseforge_token.clone().ok_or_else(|| {
                StoreError::AuthenticationFailed("CURSEFORGE_TOKEN is not set".to_string())
            })?;
            registry.register(Arc::new(CurseForgePublisher::new(
                config.curseforge.clone(),
                token,
                user_agent,
            )));
        }

        Ok(registry)
    }

    /// Append a publisher
    pub fn register(&mut self, publisher: Arc<dyn Publisher>) {
        self.publishers.push(publisher);
    }

    /// Publishers in run order
    pub fn publishers(&self) -> &[Arc<dyn Publisher>] {
        &self.publishers
    }

    /// Platforms in run order
    pub fn platforms(&self) -> Vec<Platform> {
        self.publishers.iter().map(|p| p.platform()).collect()
    }

    /// Whether no publisher is registered
    pub fn is_empty(&self) -> bool {
        self.publishers.is_empty()
    }

    /// Number of publishers
    pub fn len(&self) -> usize {
        self.publishers.len()
    }
}

impl Default for PublisherRegistry {
    fn default() -> Self {
        Self::new()
    }
}
