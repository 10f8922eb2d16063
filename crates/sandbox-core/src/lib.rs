//! Reconciliation and repair engine for the sandbox integrity check
//!
//! Keeps a sandbox directory in line with a declarative manifest:
//!
//! - **Reconciliation**: compare each declared entry against the filesystem
//! - **Repair**: per-kind strategies that create directories, provision files
//!   and recreate shortcuts to companion tools
//! - **Reporting**: a timestamped plain-text audit report per run
//! - **Paths**: [`AppPaths`], the host's well-known locations
//!
//! # Architecture
//!
//! ```text
//!                  sandbox-cli / host
//!                          |
//!                     sandbox-core
//!                          |
//!        +-----------------+-----------------+
//!        |                 |                 |
//!   sandbox-fs     sandbox-manifest    sandbox-tools
//! ```
//!
//! # Example
//!
//! ```no_run
//! use sandbox_core::{AppPaths, IntegrityService};
//!
//! fn startup() -> sandbox_core::Result<()> {
//!     let paths = AppPaths::discover()?;
//!     let service = IntegrityService::from_paths(&paths);
//!     let result = service.run_configured(&paths);
//!     println!("{:?}", result.status());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod integrity;
pub mod probe;
pub mod reconcile;
pub mod repair;
pub mod report;

pub use config::{AppPaths, SandboxConfig};
pub use error::{Error, Result};
pub use integrity::{
    CheckIssue, CheckSummary, CheckWarning, IntegrityService, MANIFEST_FATAL, MANIFEST_MISSING,
    RepairRecord, RunResult, RunStatus,
};
pub use probe::{ProbeState, WorkspaceProbe};
pub use reconcile::{Discrepancy, DiscrepancyCategory, EntryWarning, Finding, discrepancies, reconcile};
pub use repair::{DEFAULT_README, RepairContext, RepairOutcome, RepairStrategy, repair};
pub use report::ReportSink;
