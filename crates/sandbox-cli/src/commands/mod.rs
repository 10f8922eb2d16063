//! Command implementations for sandbox-cli
//!
//! Each command returns whether it succeeded; `false` maps to exit status 1.

pub mod integrity;
pub mod paths;

pub use integrity::{run_check, run_repair};
pub use paths::{run_paths, run_resolve};
