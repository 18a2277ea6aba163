pub mod config;
pub mod events;
pub mod favorites;
pub mod net;
pub mod privacy;
pub mod search_engine;

// New-tab screen and its touch input
pub mod mobile;
pub mod newtab;
