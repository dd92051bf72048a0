//! API tokens for the publishing platforms

use std::env;
use std::fmt;

use super::defaults::{CURSEFORGE_TOKEN_ENV, MODRINTH_TOKEN_ENV};

/// Tokens read from the environment, never from the config file
#[derive(Clone, Default)]
pub struct Credentials {
    /// Modrinth personal access token
    pub modrinth_token: Option<String>,

    /// CurseForge upload API token
    pub curseforge_token: Option<String>,
}

impl Credentials {
    /// Read `MODRINTH_TOKEN` and `CURSEFORGE_TOKEN`
    pub fn from_env() -> Self {
        Self {
            modrinth_token: non_empty_var(MODRINTH_TOKEN_ENV),
            curseforge_token: non_empty_var(CURSEFORGE_TOKEN_ENV),
        }
    }

    /// Replace tokens with explicitly supplied values where present
    pub fn with_overrides(mut self, modrinth: Option<String>, curseforge: Option<String>) -> Self {
        if let Some(token) = modrinth.filter(|t| !t.is_empty()) {
            self.modrinth_token = Some(token);
        }
        if let Some(token) = curseforge.filter(|t| !t.is_empty()) {
            self.curseforge_token = Some(token);
        }
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("modrinth_token", &self.modrinth_token.as_ref().map(|_| "***"))
            .field("curseforge_token", &self.curseforge_token.as_ref().map(|_| "***"))
            .finish()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}
