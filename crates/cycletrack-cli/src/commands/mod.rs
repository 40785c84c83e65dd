pub mod config;
pub mod cycle;
pub mod entry;
pub mod profile;
