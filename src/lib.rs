//! # Match Insight
//!
//! Win-probability analytics over historical match records.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (match records, features, results)
//! - **calculate**: Numeric helpers (rates, rolling means, cosine similarity)
//! - **transforms**: The three stateless analytics transforms
//! - **pipeline**: JSON-in/JSON-out entry points shared by the CLI and API
//! - **storage**: Read-only JSONL corpus access
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod models;
pub mod pipeline;
pub mod storage;
pub mod transforms;

pub use models::*;
