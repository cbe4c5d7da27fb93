pub mod commands;
pub mod config;
pub mod detection;
pub mod errors;
pub mod persistence;
pub mod report;
pub mod tracking;
pub mod types;
pub mod utils;

#[cfg(target_os = "windows")]
mod windows_api;

#[cfg(test)]
mod test_support;
