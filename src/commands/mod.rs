// src/commands/mod.rs
pub mod export;
pub mod run;
pub mod stats;
