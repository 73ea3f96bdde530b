//! # bayou-reports: End-of-Day Aggregation for Bayou POS
//!
//! Level 1 crate: sums what [`bayou_core`] settled. Nothing here touches
//! a database or the network; the caller loads committed tickets and
//! hands them in, the same way the entry UI hands drafts to the engine.
//!
//! ## Modules
//!
//! - [`eod`] - The canonical EOD report: sales, receipts, breakdowns
//! - [`drawer`] - Cash drawer reconciliation at sales-day close
//! - [`error`] - Report error types
//!
//! The figures these functions produce are exactly the engine's ticket
//! totals added up; there is no second implementation of the money math
//! to drift out of agreement.

pub mod drawer;
pub mod eod;
pub mod error;

pub use drawer::{reconcile_drawer, Deduction, DrawerReconciliation, DEFAULT_STARTING_CASH};
pub use eod::{build_eod, EodParams, EodReport};
pub use error::{ReportError, ReportResult};
