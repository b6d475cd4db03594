//! Incremental review discovery.
//!
//! [`IncrementalMonitor`] walks one target's newest-first feed and stops at
//! the first review the [`NoveltyOracle`] already knows. [`RunLoop`] drives
//! every configured target through it and turns each target's failure into
//! a recorded [`revmon_core::RunSummary`] instead of aborting the run.

pub mod error;
pub mod feed;
pub mod monitor;
pub mod oracle;
pub mod run_loop;

pub use error::{MonitorError, OracleError, TargetFailure};
pub use feed::PaginatedFeed;
pub use monitor::{IncrementalMonitor, MonitorOutcome};
pub use oracle::{
    LocalStoreOracle, NoveltyOracle, PgReviewStore, RemoteArbiterOracle, ReviewStore,
};
pub use run_loop::{RunLoop, SummarySink, TracingSink};
