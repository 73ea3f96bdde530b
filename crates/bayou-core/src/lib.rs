//! # bayou-core: Pure Settlement Logic for Bayou POS
//!
//! This crate is the **heart** of Bayou POS. It turns a ticket's line
//! items and tenders into a consistent, audit-correct money picture and
//! decides whether the ticket is still open, as pure functions with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bayou POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Ticket Entry Frontend                          │   │
//! │  │    Line Item Grid ──► Tender Grid ──► Live Totals ──► Submit    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ REST / IPC                             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bayou-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │  ┌─────────┐ ┌──────────┐ ┌─────────┐ ┌────────────┐           │   │
//! │  │  │  money  │ │ lineitem │ │ tender  │ │ settlement │           │   │
//! │  │  │  Money  │ │ evaluate │ │ resolve │ │   settle   │           │   │
//! │  │  │ TaxRate │ │ tax math │ │ layaway │ │ open/close │           │   │
//! │  │  └─────────┘ └──────────┘ └─────────┘ └────────────┘           │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            Storage + bayou-reports (EOD aggregation)            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Ticket, Transaction, LineItem, Tender, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`lineitem`] - Line item evaluator (pretax / tax / total, return sign)
//! - [`tender`] - Tender reconciler (layaway back-computation, total paid)
//! - [`allocation`] - Prorating a tender across line items
//! - [`settlement`] - Ticket totals and Open/Closed lifecycle
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every settlement is a full recomputation from a
//!    snapshot - deterministic, idempotent, order-independent
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64)
//! 4. **Explicit Parameters**: The tax rate is always passed in; nothing
//!    reads ambient user or location state
//! 5. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use bayou_core::money::Money;
//! use bayou_core::types::TaxRate;
//!
//! // Create money from cents (never from floats!)
//! let price = Money::from_cents(10000); // $100.00
//!
//! // Tax rounds half-up to the cent
//! let rate = TaxRate::from_bps(825); // 8.25%
//! assert_eq!(price.calculate_tax(rate).cents(), 825);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod allocation;
pub mod error;
pub mod lineitem;
pub mod money;
pub mod settlement;
pub mod tender;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use bayou_core::Money` instead of
// `use bayou_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use lineitem::LineItemTotals;
pub use money::Money;
pub use settlement::{TicketTotals, TransactionTotals};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items allowed in a single transaction batch.
///
/// ## Business Reason
/// Prevents runaway entry (a stuck scanner key, a paste gone wrong) and
/// keeps single tickets reviewable on a report.
pub const MAX_LINE_ITEMS: usize = 100;

/// Maximum quantity of a single line item.
///
/// ## Business Reason
/// Prevents accidental over-entry (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Smallest valid business ticket number (four digits).
///
/// ## Business Reason
/// Ticket numbers come from preprinted ticket books that start at 1000;
/// anything shorter is a typo.
pub const MIN_TICKET_NUMBER: i64 = 1000;
