//! # Ticket Settlement Aggregator
//!
//! Combines line item evaluations and tender reconciliation into the
//! ticket-level money picture and lifecycle state.
//!
//! ## Settlement Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Ticket (all transactions)            Draft (one in-progress batch)     │
//! │       │                                    │                            │
//! │       ▼                                    ▼                            │
//! │  per line item: evaluate()  ──────►  subtotal, tax_total                │
//! │  per tender:    resolve()   ──────►  total_paid                         │
//! │       │                                    │                            │
//! │       ▼                                    ▼                            │
//! │  total = subtotal + tax_total                                           │
//! │  balance_owed = total - total_paid                                      │
//! │  is_open = balance_owed > 0                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no incremental counter anywhere: every settlement is a full
//! recomputation from the current snapshot, so Open and Closed can flow
//! into each other in both directions and nothing drifts from a missed
//! update. The engine never blocks an underpaid submission; it reports
//! accurate state and leaves confirmation to the entry UI.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::lineitem::{evaluate, LineItemTotals};
use crate::money::Money;
use crate::tender::{resolve_all, total_paid};
use crate::types::{Catalog, LineItem, TaxRate, TenderDraft, Ticket, TicketState, Transaction};
use crate::validation::validate_ticket_number;
use crate::MAX_LINE_ITEMS;

// =============================================================================
// Transaction Totals
// =============================================================================

/// Snapshot totals for a single transaction batch.
///
/// The `balance_delta` of a batch (total minus paid) says whether that
/// posting moved the ticket toward open or closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TransactionTotals {
    pub subtotal: Money,
    pub tax_total: Money,
    pub total: Money,
    pub total_paid: Money,
}

impl TransactionTotals {
    /// How much this batch changed the ticket's balance.
    pub fn balance_delta(&self) -> Money {
        self.total - self.total_paid
    }
}

// =============================================================================
// Ticket Totals
// =============================================================================

/// The ticket-level money picture: what was sold, what was paid, and
/// whether the ticket is still waiting on money.
///
/// Invariants (hold for every settlement):
/// - `total == subtotal + tax_total`
/// - `total` also equals the sum of per-item totals
/// - `balance_owed == total - total_paid`, exactly
/// - `is_open == (balance_owed > 0)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TicketTotals {
    /// Sum of pretax amounts over all line items, signed.
    pub subtotal: Money,
    /// Sum of per-line tax (rounded per line, then summed), signed.
    pub tax_total: Money,
    /// subtotal + tax_total.
    pub total: Money,
    /// Sum of resolved tender amounts; never negative.
    pub total_paid: Money,
    /// total - total_paid. Negative means change due.
    pub balance_owed: Money,
    /// True while money is still owed.
    pub is_open: bool,
}

impl TicketTotals {
    /// Derives the dependent fields from the three independent sums.
    fn derive(subtotal: Money, tax_total: Money, total_paid: Money) -> Self {
        let total = subtotal + tax_total;
        let balance_owed = total - total_paid;
        TicketTotals {
            subtotal,
            tax_total,
            total,
            total_paid,
            balance_owed,
            is_open: balance_owed.is_positive(),
        }
    }

    /// The lifecycle state implied by the balance.
    pub fn state(&self) -> TicketState {
        TicketState::from_balance(self.balance_owed)
    }

    /// Change owed back to the customer; zero unless overpaid.
    pub fn change_due(&self) -> Money {
        if self.balance_owed.is_negative() {
            -self.balance_owed
        } else {
            Money::zero()
        }
    }

    /// Combines two totals, re-deriving balance and state.
    ///
    /// Used to preview an in-progress draft on top of a ticket's prior
    /// committed totals without re-sending every historical transaction.
    pub fn merge(&self, other: &TicketTotals) -> TicketTotals {
        TicketTotals::derive(
            self.subtotal + other.subtotal,
            self.tax_total + other.tax_total,
            self.total_paid + other.total_paid,
        )
    }
}

// =============================================================================
// Settlement
// =============================================================================

/// Evaluates a batch of line items, returning per-item figures.
///
/// Fails on the first invalid item or unknown category; nothing partial
/// escapes.
pub fn evaluate_lines(
    items: &[LineItem],
    catalog: &Catalog,
    rate: TaxRate,
) -> CoreResult<Vec<LineItemTotals>> {
    if items.len() > MAX_LINE_ITEMS {
        return Err(CoreError::TooManyLineItems {
            max: MAX_LINE_ITEMS,
        });
    }

    items
        .iter()
        .map(|item| evaluate(item, catalog.category(&item.category_id)?, rate))
        .collect()
}

/// Settles one draft batch: the live preview the entry UI shows while a
/// cashier is still typing, and the figures committed on submission.
pub fn settle_draft(
    items: &[LineItem],
    tenders: &[TenderDraft],
    catalog: &Catalog,
    rate: TaxRate,
) -> CoreResult<TicketTotals> {
    let line_totals = evaluate_lines(items, catalog, rate)?;

    for tender in tenders {
        catalog.payment_type(&tender.payment_type_id)?;
    }
    let resolved = resolve_all(tenders, rate)?;

    let subtotal: Money = line_totals.iter().map(|lt| lt.pretax).sum();
    let tax_total: Money = line_totals.iter().map(|lt| lt.tax).sum();
    Ok(TicketTotals::derive(subtotal, tax_total, total_paid(&resolved)))
}

/// Settles one transaction into its snapshot totals.
pub fn settle_transaction(
    transaction: &Transaction,
    catalog: &Catalog,
    rate: TaxRate,
) -> CoreResult<TransactionTotals> {
    let totals = settle_draft(&transaction.line_items, &transaction.tenders, catalog, rate)?;
    Ok(TransactionTotals {
        subtotal: totals.subtotal,
        tax_total: totals.tax_total,
        total: totals.total,
        total_paid: totals.total_paid,
    })
}

/// Settles a whole ticket from every transaction posted against it.
///
/// A ticket with no line items settles to all-zero sale totals and is
/// closed no matter what tenders exist: nothing is owed.
pub fn settle_ticket(ticket: &Ticket, catalog: &Catalog, rate: TaxRate) -> CoreResult<TicketTotals> {
    validate_ticket_number(ticket.ticket_number)?;

    let mut running = TicketTotals::default();
    for transaction in &ticket.transactions {
        let tx = settle_transaction(transaction, catalog, rate)?;
        running = running.merge(&TicketTotals::derive(tx.subtotal, tx.tax_total, tx.total_paid));
    }
    Ok(running)
}

// =============================================================================
// Unit Tests
// =============================================================================
