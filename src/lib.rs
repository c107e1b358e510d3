pub mod cli;
pub mod config;
pub mod event_log;
pub mod export;
pub mod hierarchy;
pub mod overlay;
pub mod playback;
pub mod project;
pub mod resolver;
pub mod symbols;
pub mod text;
pub mod theme;
pub mod tui;
