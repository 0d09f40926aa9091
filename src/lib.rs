// lib.rs — Crate root for the engine catalog and its reliability scoring.
//
//   reliability  per-engine reliability index (pure)
//   stats        per-engine stats and leaderboards (pure)
//   validation   checks at the submission and read-back boundaries
//   repository   storage traits the analytics layer reads through
//   db           SQLite implementation of those traits
//   analytics    snapshot-then-compute over a repository
//   commands     Mutex-guarded handlers for a UI or the CLI

pub mod analytics;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod reliability;
pub mod repository;
pub mod stats;
pub mod validation;

pub use error::{Error, Result};
