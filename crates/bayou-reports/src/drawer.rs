//! # Cash Drawer Reconciliation
//!
//! The sales-day close: how much cash should be in the drawer, and how
//! far off the count was.
//!
//! ```text
//! expected = starting float + cash tenders - paid-outs (deductions)
//! difference = counted - expected        (negative: drawer is short)
//! ```
//!
//! Cash tenders are identified by the payment type's `is_cash` flag; a
//! layaway deposit taken in cash counts at its resolved amount, the same
//! figure settlement credited to the ticket.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use bayou_core::tender::resolve;
use bayou_core::types::{Catalog, TaxSchedule, Ticket};
use bayou_core::Money;

use crate::error::{ReportError, ReportResult};

/// Default starting drawer float in cents ($500.00).
pub const DEFAULT_STARTING_CASH: i64 = 50000;

// =============================================================================
// Deduction
// =============================================================================

/// Money paid out of the drawer during the day (parts runs, COD freight).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Deduction {
    /// User who took the money out.
    pub user_id: String,

    /// Amount paid out, in cents.
    pub amount_cents: i64,

    /// Why the drawer opened.
    pub reason: String,

    /// Business date of the paid-out.
    #[ts(as = "String")]
    pub date: NaiveDate,
}

impl Deduction {
    /// Returns the deduction amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Reconciliation
// =============================================================================

/// The drawer picture at close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DrawerReconciliation {
    /// Float the drawer opened with.
    pub starting_cash: Money,
    /// Cash tenders received across the day's tickets.
    pub cash_received: Money,
    /// Paid-outs during the day.
    pub deductions_total: Money,
    /// starting + received - paid out.
    pub expected_cash: Money,
    /// The physical count, once entered.
    pub actual_cash: Option<Money>,
    /// actual - expected; negative means the drawer is short.
    pub difference: Option<Money>,
}

/// Reconciles a drawer against the day's tickets and paid-outs.
///
/// The caller passes the tickets and deductions belonging to the day
/// being closed. `actual_cash` of `None` produces the expected figure
/// with no difference yet (the count happens after).
pub fn reconcile_drawer(
    starting_cash: Money,
    tickets: &[Ticket],
    deductions: &[Deduction],
    catalog: &Catalog,
    schedule: &TaxSchedule,
    actual_cash: Option<Money>,
) -> ReportResult<DrawerReconciliation> {
    let mut cash_received = Money::zero();

    for ticket in tickets {
        let rate = schedule
            .rate_on(ticket.ticket_date)
            .ok_or(ReportError::NoRateForDate(ticket.ticket_date))?;

        for draft in ticket.tender_drafts() {
            let payment_type = catalog.payment_type(&draft.payment_type_id)?;
            if payment_type.is_cash {
                cash_received += resolve(draft, rate)?.amount();
            }
        }
    }

    let deductions_total: Money = deductions.iter().map(Deduction::amount).sum();
    let expected_cash = starting_cash + cash_received - deductions_total;
    let difference = actual_cash.map(|actual| actual - expected_cash);

    debug!(
        expected = expected_cash.cents(),
        counted = actual_cash.map(|m| m.cents()),
        "drawer reconciled"
    );

    Ok(DrawerReconciliation {
        starting_cash,
        cash_received,
        deductions_total,
        expected_cash,
        actual_cash,
        difference,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
