//! Default search engines per browsing mode.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::privacy::BrowsingMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchEngine {
    DuckDuckGo,
    Google,
    Bing,
    Brave,
    Qwant,
    StartPage,
}

impl SearchEngine {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::DuckDuckGo => "DuckDuckGo",
            Self::Google => "Google",
            Self::Bing => "Bing",
            Self::Brave => "Brave Search",
            Self::Qwant => "Qwant",
            Self::StartPage => "Startpage",
        }
    }
}

/// Read-only view of the search configuration.
pub trait SearchEngineConfig {
    fn default_engine(&self, mode: BrowsingMode) -> SearchEngine;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchSettings {
    pub regular: SearchEngine,
    pub private: SearchEngine,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            regular: SearchEngine::Google,
            private: SearchEngine::Google,
        }
    }
}

impl SearchEngineConfig for SearchSettings {
    fn default_engine(&self, mode: BrowsingMode) -> SearchEngine {
        match mode {
            BrowsingMode::Regular => self.regular,
            BrowsingMode::Private => self.private,
        }
    }
}

/// Settings that another part of the app may change at runtime.
impl SearchEngineConfig for Arc<RwLock<SearchSettings>> {
    fn default_engine(&self, mode: BrowsingMode) -> SearchEngine {
        self.read()
            .unwrap_or_else(|p| p.into_inner())
            .default_engine(mode)
    }
}
