//! # End-of-Day Report Aggregation
//!
//! Builds the canonical EOD report figures from engine-settled tickets.
//!
//! ## Report Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  EodReport                                                              │
//! │  ├── sales        subtotal / tax_total / total_sold                     │
//! │  ├── receipts     total_received + by-payment-type breakdown            │
//! │  ├── balance_owed what the filtered tickets still carry                 │
//! │  ├── breakdowns   per-sales-category subtotal / tax / total             │
//! │  ├── deductions   count + total paid out of the drawer                  │
//! │  ├── cash         gross cash received, cash after deductions            │
//! │  └── tickets      one settled row per ticket (optional detail)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is plain summation over settlement outputs; the same
//! line-level category tags and tender-level payment-type tags the engine
//! carries are what make the breakdowns possible. All money stays integer
//! cents; rendering happens elsewhere.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;

use bayou_core::lineitem::evaluate;
use bayou_core::settlement::settle_ticket;
use bayou_core::tender::resolve;
use bayou_core::types::{Catalog, TaxSchedule, Ticket};
use bayou_core::Money;

use crate::drawer::Deduction;
use crate::error::{ReportError, ReportResult};

// =============================================================================
// Parameters
// =============================================================================

/// What to aggregate and for whom.
///
/// `user_id`/`location_id` of `None` mean "don't filter on that axis";
/// a location-wide report passes only `location_id`, a user EOD passes
/// only `user_id`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EodParams {
    pub user_id: Option<String>,
    pub location_id: Option<String>,
    #[ts(as = "String")]
    pub start: NaiveDate,
    #[ts(as = "String")]
    pub end: NaiveDate,
    /// Include the per-ticket rows, or just the rollups.
    pub include_ticket_details: bool,
}

// =============================================================================
// Report Sections
// =============================================================================

/// What was sold in the period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesSummary {
    pub subtotal: Money,
    pub tax_total: Money,
    pub total_sold: Money,
}

/// Receipts for one payment type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentTypeReceipt {
    pub payment_type_id: String,
    pub payment_type_name: String,
    pub amount: Money,
}

/// What came in during the period.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReceiptsSummary {
    pub total_received: Money,
    pub by_payment_type: Vec<PaymentTypeReceipt>,
}

/// Sales rollup for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryBreakdown {
    pub sales_category_id: String,
    pub sales_category_name: String,
    pub subtotal: Money,
    pub tax_total: Money,
    pub total: Money,
}

/// One settled ticket in the report detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TicketRow {
    pub ticket_number: i64,
    #[ts(as = "String")]
    pub ticket_date: NaiveDate,
    pub subtotal: Money,
    pub tax_total: Money,
    pub total: Money,
    pub total_paid: Money,
    pub balance_owed: Money,
    pub is_open: bool,
}

/// Drawer money paid out during the period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DeductionSummary {
    pub count: usize,
    pub total_deductions: Money,
}

/// Cash position for the period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CashSummary {
    pub cash_received_gross: Money,
    pub cash_after_deductions: Money,
}

/// The assembled end-of-day report.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EodReport {
    #[ts(as = "String")]
    pub report_date_start: NaiveDate,
    #[ts(as = "String")]
    pub report_date_end: NaiveDate,
    pub user_id: Option<String>,
    pub location_id: Option<String>,
    pub sales: SalesSummary,
    pub receipts: ReceiptsSummary,
    pub balance_owed: Money,
    pub by_sales_category: Vec<CategoryBreakdown>,
    pub deductions: DeductionSummary,
    pub cash: CashSummary,
    pub tickets: Vec<TicketRow>,
}

// =============================================================================
// Aggregation
// =============================================================================

/// Builds an EOD report from committed tickets.
///
/// Tickets and deductions outside the date range or filters are ignored.
/// Each ticket settles at the rate its own date carried, looked up from
/// the location's schedule; a date with no covering rate is an error
/// rather than a guess.
pub fn build_eod(
    tickets: &[Ticket],
    deductions: &[Deduction],
    catalog: &Catalog,
    schedule: &TaxSchedule,
    params: &EodParams,
) -> ReportResult<EodReport> {
    if params.start > params.end {
        return Err(ReportError::InvalidRange {
            start: params.start,
            end: params.end,
        });
    }

    let selected: Vec<&Ticket> = tickets.iter().filter(|t| matches(t, params)).collect();
    debug!(
        selected = selected.len(),
        total = tickets.len(),
        "selected tickets for report range"
    );

    let mut sales = SalesSummary::default();
    let mut balance_owed = Money::zero();
    let mut rows = Vec::new();
    let mut by_category: BTreeMap<String, CategoryBreakdown> = BTreeMap::new();
    let mut by_payment_type: BTreeMap<String, PaymentTypeReceipt> = BTreeMap::new();
    let mut total_received = Money::zero();
    let mut cash_received = Money::zero();

    for ticket in &selected {
        let rate = schedule
            .rate_on(ticket.ticket_date)
            .ok_or(ReportError::NoRateForDate(ticket.ticket_date))?;

        let totals = settle_ticket(ticket, catalog, rate)?;
        sales.subtotal += totals.subtotal;
        sales.tax_total += totals.tax_total;
        sales.total_sold += totals.total;
        balance_owed += totals.balance_owed;

        if params.include_ticket_details {
            rows.push(TicketRow {
                ticket_number: ticket.ticket_number,
                ticket_date: ticket.ticket_date,
                subtotal: totals.subtotal,
                tax_total: totals.tax_total,
                total: totals.total,
                total_paid: totals.total_paid,
                balance_owed: totals.balance_owed,
                is_open: totals.is_open,
            });
        }

        for item in ticket.line_items() {
            let category = catalog.category(&item.category_id)?;
            let line = evaluate(item, category, rate)?;
            let entry = by_category
                .entry(category.id.clone())
                .or_insert_with(|| CategoryBreakdown {
                    sales_category_id: category.id.clone(),
                    sales_category_name: category.name.clone(),
                    subtotal: Money::zero(),
                    tax_total: Money::zero(),
                    total: Money::zero(),
                });
            entry.subtotal += line.pretax;
            entry.tax_total += line.tax;
            entry.total += line.total;
        }

        for draft in ticket.tender_drafts() {
            let payment_type = catalog.payment_type(&draft.payment_type_id)?;
            let tender = resolve(draft, rate)?;
            let entry = by_payment_type
                .entry(payment_type.id.clone())
                .or_insert_with(|| PaymentTypeReceipt {
                    payment_type_id: payment_type.id.clone(),
                    payment_type_name: payment_type.name.clone(),
                    amount: Money::zero(),
                });
            entry.amount += tender.amount();
            total_received += tender.amount();
            if payment_type.is_cash {
                cash_received += tender.amount();
            }
        }
    }

    let period_deductions: Vec<&Deduction> = deductions
        .iter()
        .filter(|d| {
            d.date >= params.start
                && d.date <= params.end
                && params.user_id.as_ref().map_or(true, |uid| &d.user_id == uid)
        })
        .collect();
    let total_deductions: Money = period_deductions.iter().map(|d| d.amount()).sum();

    // Stable presentation order: breakdown rows sorted by display name.
    let mut by_sales_category: Vec<CategoryBreakdown> = by_category.into_values().collect();
    by_sales_category.sort_by(|a, b| a.sales_category_name.cmp(&b.sales_category_name));
    let mut by_payment_type: Vec<PaymentTypeReceipt> = by_payment_type.into_values().collect();
    by_payment_type.sort_by(|a, b| a.payment_type_name.cmp(&b.payment_type_name));

    rows.sort_by_key(|row| (row.ticket_date, row.ticket_number));

    info!(
        tickets = selected.len(),
        total_sold = sales.total_sold.cents(),
        total_received = total_received.cents(),
        "EOD report built"
    );

    Ok(EodReport {
        report_date_start: params.start,
        report_date_end: params.end,
        user_id: params.user_id.clone(),
        location_id: params.location_id.clone(),
        sales,
        receipts: ReceiptsSummary {
            total_received,
            by_payment_type,
        },
        balance_owed,
        by_sales_category,
        deductions: DeductionSummary {
            count: period_deductions.len(),
            total_deductions,
        },
        cash: CashSummary {
            cash_received_gross: cash_received,
            cash_after_deductions: cash_received - total_deductions,
        },
        tickets: rows,
    })
}

fn matches(ticket: &Ticket, params: &EodParams) -> bool {
    ticket.ticket_date >= params.start
        && ticket.ticket_date <= params.end
        && params
            .user_id
            .as_ref()
            .map_or(true, |uid| &ticket.user_id == uid)
        && params
            .location_id
            .as_ref()
            .map_or(true, |lid| &ticket.location_id == lid)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use bayou_core::types::{
        LineItem, PaymentType, SalesCategory, TaxRate, TenderDraft, Transaction, TransactionType,
    };

    const APPLIANCE: &str = "11111111-1111-4111-8111-111111111111";
    const WARRANTY: &str = "22222222-2222-4222-8222-222222222222";
    const CASH: &str = "33333333-3333-4333-8333-333333333333";
    const CARD: &str = "66666666-6666-4666-8666-666666666666";
    const USER_A: &str = "44444444-4444-4444-8444-444444444444";
    const USER_B: &str = "77777777-7777-4777-8777-777777777777";
    const LOCATION: &str = "55555555-5555-4555-8555-555555555555";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog
            .add_category(SalesCategory {
                id: APPLIANCE.to_string(),
                name: "New Appliance".to_string(),
                taxable: true,
                active: true,
            })
            .unwrap();
        catalog
            .add_category(SalesCategory {
                id: WARRANTY.to_string(),
                name: "Extended Warranty".to_string(),
                taxable: false,
                active: true,
            })
            .unwrap();
        catalog
            .add_payment_type(PaymentType {
                id: CASH.to_string(),
                name: "Cash".to_string(),
                taxable: true,
                is_cash: true,
                active: true,
            })
            .unwrap();
        catalog
            .add_payment_type(PaymentType {
                id: CARD.to_string(),
                name: "Card".to_string(),
                taxable: true,
                is_cash: false,
                active: true,
            })
            .unwrap();
        catalog
    }

    fn schedule() -> TaxSchedule {
        TaxSchedule::single(TaxRate::from_bps(825), date(2020, 1, 1))
    }

    fn ticket(
        number: i64,
        day: NaiveDate,
        user_id: &str,
        items: Vec<LineItem>,
        tenders: Vec<TenderDraft>,
    ) -> Ticket {
        Ticket {
            ticket_number: number,
            ticket_date: day,
            location_id: LOCATION.to_string(),
            user_id: user_id.to_string(),
            transactions: vec![Transaction {
                posted_date: day,
                user_id: user_id.to_string(),
                transaction_type: TransactionType::Sale,
                line_items: items,
                tenders,
            }],
        }
    }

    fn item(category_id: &str, unit_price_cents: i64) -> LineItem {
        LineItem {
            category_id: category_id.to_string(),
            unit_price_cents,
            quantity: 1,
            is_return: false,
            taxable: None,
        }
    }

    fn tender(payment_type_id: &str, amount_cents: i64) -> TenderDraft {
        TenderDraft {
            payment_type_id: payment_type_id.to_string(),
            amount_cents,
            is_layaway: false,
        }
    }

    fn params(user_id: Option<&str>) -> EodParams {
        EodParams {
            user_id: user_id.map(str::to_string),
            location_id: Some(LOCATION.to_string()),
            start: date(2025, 3, 10),
            end: date(2025, 3, 10),
            include_ticket_details: true,
        }
    }

    fn day_tickets() -> Vec<Ticket> {
        vec![
            // Fully paid in cash: $100 appliance + tax.
            ticket(
                4501,
                date(2025, 3, 10),
                USER_A,
                vec![item(APPLIANCE, 10000)],
                vec![tender(CASH, 10825)],
            ),
            // Warranty (exempt) on card, underpaid by 5000.
            ticket(
                4502,
                date(2025, 3, 10),
                USER_A,
                vec![item(WARRANTY, 15000)],
                vec![tender(CARD, 10000)],
            ),
            // Different user, same day.
            ticket(
                4503,
                date(2025, 3, 10),
                USER_B,
                vec![item(APPLIANCE, 2000)],
                vec![tender(CASH, 2165)],
            ),
            // Outside the range entirely.
            ticket(
                4504,
                date(2025, 3, 11),
                USER_A,
                vec![item(APPLIANCE, 99999)],
                vec![],
            ),
        ]
    }

    #[test]
    fn test_report_sums_and_breakdowns() {
        let report = build_eod(
            &day_tickets(),
            &[],
            &catalog(),
            &schedule(),
            &params(None),
        )
        .unwrap();

        // 10000 + 15000 + 2000 pretax; tax only on the appliances.
        assert_eq!(report.sales.subtotal.cents(), 27000);
        assert_eq!(report.sales.tax_total.cents(), 825 + 165);
        assert_eq!(report.sales.total_sold.cents(), 27990);

        assert_eq!(report.receipts.total_received.cents(), 10825 + 10000 + 2165);
        assert_eq!(report.balance_owed.cents(), 5000);

        // Breakdown rows sorted by name: Extended Warranty, New Appliance.
        assert_eq!(report.by_sales_category.len(), 2);
        assert_eq!(
            report.by_sales_category[0].sales_category_name,
            "Extended Warranty"
        );
        assert_eq!(report.by_sales_category[0].total.cents(), 15000);
        assert_eq!(report.by_sales_category[1].total.cents(), 12990);

        // Card vs cash receipts.
        assert_eq!(report.receipts.by_payment_type.len(), 2);
        assert_eq!(report.receipts.by_payment_type[0].payment_type_name, "Card");
        assert_eq!(report.receipts.by_payment_type[0].amount.cents(), 10000);
        assert_eq!(report.receipts.by_payment_type[1].amount.cents(), 12990);

        assert_eq!(report.cash.cash_received_gross.cents(), 12990);
        assert_eq!(report.tickets.len(), 3);
    }

    #[test]
    fn test_user_filter_narrows_everything() {
        let report = build_eod(
            &day_tickets(),
            &[],
            &catalog(),
            &schedule(),
            &params(Some(USER_A)),
        )
        .unwrap();

        assert_eq!(report.tickets.len(), 2);
        assert_eq!(report.sales.subtotal.cents(), 25000);
        assert_eq!(report.cash.cash_received_gross.cents(), 10825);
    }

    #[test]
    fn test_deductions_reduce_cash() {
        let deductions = vec![
            Deduction {
                user_id: USER_A.to_string(),
                amount_cents: 3000,
                reason: "Parts run".to_string(),
                date: date(2025, 3, 10),
            },
            // Outside range; ignored.
            Deduction {
                user_id: USER_A.to_string(),
                amount_cents: 9999,
                reason: "Old".to_string(),
                date: date(2025, 3, 1),
            },
        ];
        let report = build_eod(
            &day_tickets(),
            &deductions,
            &catalog(),
            &schedule(),
            &params(Some(USER_A)),
        )
        .unwrap();

        assert_eq!(report.deductions.count, 1);
        assert_eq!(report.deductions.total_deductions.cents(), 3000);
        assert_eq!(report.cash.cash_received_gross.cents(), 10825);
        assert_eq!(report.cash.cash_after_deductions.cents(), 7825);
    }

    #[test]
    fn test_rollup_only_when_details_off() {
        let mut p = params(None);
        p.include_ticket_details = false;
        let report = build_eod(&day_tickets(), &[], &catalog(), &schedule(), &p).unwrap();
        assert!(report.tickets.is_empty());
        assert_eq!(report.sales.subtotal.cents(), 27000);
    }

    #[test]
    fn test_missing_rate_is_an_error() {
        let schedule = TaxSchedule::single(TaxRate::from_bps(825), date(2026, 1, 1));
        let result = build_eod(
            &day_tickets(),
            &[],
            &catalog(),
            &schedule,
            &params(None),
        );
        assert!(matches!(result, Err(ReportError::NoRateForDate(_))));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let mut p = params(None);
        p.start = date(2025, 3, 11);
        p.end = date(2025, 3, 10);
        let result = build_eod(&day_tickets(), &[], &catalog(), &schedule(), &p);
        assert!(matches!(result, Err(ReportError::InvalidRange { .. })));
    }
}
