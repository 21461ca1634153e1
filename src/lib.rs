//! Client for a résumé/job-description compatibility analysis service.

pub mod client;
pub mod config;
pub mod console;
pub mod export;
pub mod normalizer;
pub mod orchestrator;
pub mod types;
