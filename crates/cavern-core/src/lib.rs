#![forbid(unsafe_code)]
//! cavern-core library.
//!
//! The cave-network domain model and its mutable graph store. Algorithms live
//! in `cavern-engine` and only ever read a [`Graph`].
//!
//! # Conventions
//!
//! - **Errors**: typed [`GraphError`] / [`FormatError`] values carrying a stable
//!   [`ErrorCode`]; `anyhow::Result` only for configuration loading.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod format;
pub mod graph;
pub mod model;
pub mod shared;

pub use error::{ErrorCode, FormatError, GraphError};
pub use graph::{Graph, RetypeReport};
pub use model::{Link, Site};
pub use shared::SharedGraph;
