//! Shared test utilities for the sandbox integrity workspace.
//!
//! Dev-dependency only, never published. Deliberately independent of the
//! engine crates so any of them can use it without a dependency cycle.
//!
//! # Modules
//!
//! - [`sandbox`]: [`TestSandbox`](sandbox::TestSandbox), an application
//!   install plus desktop sandbox in a temporary directory

pub mod sandbox;

pub use sandbox::TestSandbox;
