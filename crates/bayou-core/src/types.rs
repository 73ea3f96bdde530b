//! # Domain Types
//!
//! Core domain types for ticket settlement.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Ticket      │   │  Transaction    │   │    LineItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  ticket_number  │──►│  posted_date    │──►│  category_id    │       │
//! │  │  ticket_date    │   │  type           │   │  unit_price     │       │
//! │  │  location_id    │   │  line_items     │   │  quantity       │       │
//! │  │  transactions   │   │  tenders        │   │  is_return      │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │  SalesCategory  │   │   PaymentType   │       │
//! │  │  bps (u32)      │   │  taxable dflt   │   │  is_cash flag   │       │
//! │  │  825 = 8.25%    │   │  per category   │   │  taxable tag    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Entities carry:
//! - `id`: UUID v4 string - immutable, used for references
//! - Business ID where one exists: `ticket_number` is assigned by the
//!   business (handwritten ticket books predate the software) and is at
//!   least four digits

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::validation::{validate_name, validate_uuid};

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 825 bps = 8.25% (Louisiana parish rates run 8-11%)
///
/// The rate is location-scoped configuration. It is always passed into the
/// engine explicitly; nothing in this crate reads an ambient default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Tax Schedule
// =============================================================================

/// One effectivity window for a location's tax rate.
///
/// An open-ended row (`effective_to: None`) is the current rate.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRateRow {
    #[ts(as = "String")]
    pub effective_from: NaiveDate,
    #[ts(as = "Option<String>")]
    pub effective_to: Option<NaiveDate>,
    pub rate: TaxRate,
}

impl TaxRateRow {
    /// Whether this row covers the given business date.
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.effective_from && self.effective_to.map_or(true, |to| date <= to)
    }
}

/// A location's tax rates over time.
///
/// Parish rates change; a ticket posted in March settles at March's rate
/// even when it is recomputed in July. Lookup picks the latest row whose
/// window covers the date, so a corrected row shadows the one it replaces.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxSchedule {
    pub rows: Vec<TaxRateRow>,
}

impl TaxSchedule {
    /// Creates a schedule holding a single rate effective from `from`.
    pub fn single(rate: TaxRate, from: NaiveDate) -> Self {
        TaxSchedule {
            rows: vec![TaxRateRow {
                effective_from: from,
                effective_to: None,
                rate,
            }],
        }
    }

    /// Returns the rate in effect on the given date, if any row covers it.
    pub fn rate_on(&self, date: NaiveDate) -> Option<TaxRate> {
        self.rows
            .iter()
            .filter(|row| row.covers(date))
            .max_by_key(|row| row.effective_from)
            .map(|row| row.rate)
    }
}

// =============================================================================
// Sales Category
// =============================================================================

/// A sales category (new appliance, parts, labor, delivery, ...).
///
/// `taxable` is the default taxability for line items entered under this
/// category. A line item may override it at entry time; the category
/// default going forward can change without touching historical items.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesCategory {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown in entry dropdowns and report breakdowns.
    pub name: String,

    /// Default taxability for line items in this category.
    pub taxable: bool,

    /// Whether the category is offered for new entries (soft delete).
    pub active: bool,
}

// =============================================================================
// Payment Type
// =============================================================================

/// A payment type (cash, check, card, financing, ...).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentType {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown in entry dropdowns and receipt breakdowns.
    pub name: String,

    /// Descriptive tag carried through to reporting. It does NOT enter
    /// tender math; tax is computed per line item only.
    pub taxable: bool,

    /// Whether tenders of this type count toward the cash drawer.
    pub is_cash: bool,

    /// Whether the payment type is offered for new entries (soft delete).
    pub active: bool,
}

// =============================================================================
// Line Item
// =============================================================================

fn default_quantity() -> i64 {
    1
}

/// One sale or return entry on a transaction.
///
/// `unit_price_cents` is the pretax price as entered, always non-negative;
/// returns are flagged with `is_return`, never entered as negative prices.
/// The derived pretax/tax/total figures are computed by the evaluator and
/// are not stored here.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    /// Sales category reference.
    pub category_id: String,

    /// Pretax unit price in cents as entered. Zero is a valid price
    /// (warranty swap, goodwill item).
    pub unit_price_cents: i64,

    /// Units sold. Defaults to 1; must be at least 1.
    #[serde(default = "default_quantity")]
    pub quantity: i64,

    /// Return entry: derived amounts flip sign.
    #[serde(default)]
    pub is_return: bool,

    /// Entry-time taxability override. `None` means "use the category
    /// default"; `Some(_)` records a manual override by the cashier.
    #[serde(default)]
    pub taxable: Option<bool>,
}

impl LineItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Resolves the effective taxability against the category default.
    #[inline]
    pub fn effective_taxable(&self, category: &SalesCategory) -> bool {
        self.taxable.unwrap_or(category.taxable)
    }
}

// =============================================================================
// Tenders
// =============================================================================

/// A payment as entered at the counter, before reconciliation.
///
/// For a normal tender, `amount_cents` is the actual cash effect as
/// given. For a layaway tender, it is the desired post-tax total the
/// deposit should eventually cover; the reconciler back-computes the
/// stored amount from it. Either way the figure must be zero or positive;
/// refunds are modeled as return line items, never as negative tenders.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TenderDraft {
    /// Payment type reference.
    pub payment_type_id: String,

    /// Cash amount, or desired post-tax total when `is_layaway`.
    pub amount_cents: i64,

    /// Layaway deposit: back-compute the stored amount.
    #[serde(default)]
    pub is_layaway: bool,
}

/// A reconciled payment applied toward a ticket's total.
///
/// `amount_cents` is always the actual cash effect (post-tax), whatever
/// the draft looked like.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Tender {
    /// Payment type reference.
    pub payment_type_id: String,

    /// Resolved amount in cents, zero or positive.
    pub amount_cents: i64,

    /// Whether this tender came in as a layaway deposit.
    pub is_layaway: bool,
}

impl Tender {
    /// Returns the tender amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// The kind of business event a transaction records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Normal sale posting.
    Sale,
    /// Customer brought merchandise back.
    Return,
    /// Bookkeeping correction.
    Adjustment,
}

impl Default for TransactionType {
    fn default() -> Self {
        TransactionType::Sale
    }
}

/// A dated batch of line items and tenders posted against a ticket.
///
/// A layaway ticket accumulates transactions over weeks: the first posts
/// the merchandise and a deposit, later ones post further payments, and a
/// correction posts a return. Totals are always recomputed from the full
/// set, never incremented.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Transaction {
    /// Business date the batch was posted.
    #[ts(as = "String")]
    pub posted_date: NaiveDate,

    /// User who posted the batch.
    pub user_id: String,

    /// Sale, return, or adjustment.
    #[serde(default)]
    pub transaction_type: TransactionType,

    /// Line items in this batch.
    #[serde(default)]
    pub line_items: Vec<LineItem>,

    /// Tenders in this batch, as entered.
    #[serde(default)]
    pub tenders: Vec<TenderDraft>,
}

// =============================================================================
// Ticket
// =============================================================================

/// The aggregate root: one business ticket and everything posted to it.
///
/// Lifecycle: created when the first transaction posts. The ticket is
/// open while money is still owed and closed once cumulative tenders
/// cover the total; a later correction can reopen it. There is no
/// terminal state and no stored counter; state is derived from a full
/// settlement pass every time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Ticket {
    /// Business-assigned ticket number, at least four digits.
    pub ticket_number: i64,

    /// Business date on the ticket header.
    #[ts(as = "String")]
    pub ticket_date: NaiveDate,

    /// Location reference (determines the tax rate in effect).
    pub location_id: String,

    /// User who opened the ticket.
    pub user_id: String,

    /// All transactions posted against this ticket, in posting order.
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Ticket {
    /// Iterates every line item across all transactions.
    pub fn line_items(&self) -> impl Iterator<Item = &LineItem> {
        self.transactions.iter().flat_map(|tx| tx.line_items.iter())
    }

    /// Iterates every tender draft across all transactions.
    pub fn tender_drafts(&self) -> impl Iterator<Item = &TenderDraft> {
        self.transactions.iter().flat_map(|tx| tx.tenders.iter())
    }
}

// =============================================================================
// Ticket State
// =============================================================================

/// Ticket lifecycle state, derived from the balance.
///
/// ```text
/// balance_owed > 0   ──►  Open    (awaiting further payment)
/// balance_owed <= 0  ──►  Closed  (settled; negative is change due)
/// ```
///
/// Transitions go both ways: adding a tender can close a ticket, and a
/// later return or voided tender can reopen it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TicketState {
    /// Balance owed is positive; further payment expected.
    Open,
    /// Fully settled. Overpayment stays closed; the excess is change due.
    Closed,
}

impl TicketState {
    /// Derives the state from a balance.
    pub fn from_balance(balance_owed: Money) -> Self {
        if balance_owed.is_positive() {
            TicketState::Open
        } else {
            TicketState::Closed
        }
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Lookup tables for the references line items and tenders carry.
///
/// The caller assembles this from its settings snapshot and hands it to
/// the engine; a missing reference is a hard error, never a silent
/// default. Inactive entries still resolve, because historical line items
/// keep pointing at categories that were retired later.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    categories: HashMap<String, SalesCategory>,
    payment_types: HashMap<String, PaymentType>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Catalog::default()
    }

    /// Adds a sales category after validating its id and name.
    pub fn add_category(&mut self, category: SalesCategory) -> CoreResult<()> {
        validate_uuid(&category.id)?;
        validate_name(&category.name)?;
        self.categories.insert(category.id.clone(), category);
        Ok(())
    }

    /// Adds a payment type after validating its id and name.
    pub fn add_payment_type(&mut self, payment_type: PaymentType) -> CoreResult<()> {
        validate_uuid(&payment_type.id)?;
        validate_name(&payment_type.name)?;
        self.payment_types
            .insert(payment_type.id.clone(), payment_type);
        Ok(())
    }

    /// Resolves a sales category reference.
    pub fn category(&self, id: &str) -> CoreResult<&SalesCategory> {
        self.categories
            .get(id)
            .ok_or_else(|| CoreError::CategoryNotFound(id.to_string()))
    }

    /// Resolves a payment type reference.
    pub fn payment_type(&self, id: &str) -> CoreResult<&PaymentType> {
        self.payment_types
            .get(id)
            .ok_or_else(|| CoreError::PaymentTypeNotFound(id.to_string()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
