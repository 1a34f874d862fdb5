//! Common utilities and shared types for shule-rs.
//!
//! This crate provides foundational components used across all shule-rs crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID primary keys plus admission references, PINs,
//!   student index numbers and temporary passwords via [`IdGenerator`]
//!
//! # Example
//!
//! ```no_run
//! use shule_common::{AppResult, Config, IdGenerator};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let reference = id_gen.application_reference();
//!     println!("New admission reference: {reference}");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
