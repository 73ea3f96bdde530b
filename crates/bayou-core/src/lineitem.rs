//! # Line Item Evaluator
//!
//! Computes the derived money figures for a single line item.
//!
//! ## Evaluation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  LineItem { unit_price, quantity, taxable?, is_return }                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. pretax = unit_price × quantity                                      │
//! │  2. taxable = item override, else category default                      │
//! │  3. tax = taxable ? round_half_up(pretax × rate) : 0                    │
//! │  4. total = pretax + tax                                                │
//! │  5. is_return? negate all three                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  LineItemTotals { pretax, tax, total }                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A return is the mirror image of a sale, not a separate code path: the
//! positive-side math runs first and the sign flips last, so a sale and
//! its return cancel to the cent in every aggregate.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::money::Money;
use crate::types::{LineItem, SalesCategory, TaxRate};
use crate::validation::{validate_quantity, validate_unit_price};

// =============================================================================
// Line Item Totals
// =============================================================================

/// Derived figures for one line item. Not stored on the item; recomputed
/// whenever the ticket is settled.
///
/// Invariants (hold for every evaluation):
/// - `total == pretax + tax`
/// - all three share the item's sign: negative for returns, else positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItemTotals {
    /// unit_price × quantity, signed.
    pub pretax: Money,
    /// Tax rounded half-up to the cent, signed. Zero when not taxable.
    pub tax: Money,
    /// pretax + tax, signed.
    pub total: Money,
}

impl LineItemTotals {
    fn negate(self) -> Self {
        LineItemTotals {
            pretax: -self.pretax,
            tax: -self.tax,
            total: -self.total,
        }
    }
}

// =============================================================================
// Evaluation
// =============================================================================

/// Evaluates a line item against its category and the location's rate.
///
/// Pure function: no side effects, same inputs always give the same
/// outputs. Rejects quantity < 1 and negative unit prices before any
/// computation. A zero unit price is valid and yields all-zero figures
/// regardless of taxability.
///
/// ## Example
/// ```rust
/// use bayou_core::lineitem::evaluate;
/// use bayou_core::types::{LineItem, SalesCategory, TaxRate};
///
/// let category = SalesCategory {
///     id: "550e8400-e29b-41d4-a716-446655440000".to_string(),
///     name: "New Appliance".to_string(),
///     taxable: true,
///     active: true,
/// };
/// let item = LineItem {
///     category_id: category.id.clone(),
///     unit_price_cents: 10000,
///     quantity: 1,
///     is_return: false,
///     taxable: None,
/// };
///
/// let totals = evaluate(&item, &category, TaxRate::from_bps(825)).unwrap();
/// assert_eq!(totals.pretax.cents(), 10000);
/// assert_eq!(totals.tax.cents(), 825);
/// assert_eq!(totals.total.cents(), 10825);
/// ```
pub fn evaluate(
    item: &LineItem,
    category: &SalesCategory,
    rate: TaxRate,
) -> CoreResult<LineItemTotals> {
    validate_quantity(item.quantity)?;
    validate_unit_price(item.unit_price_cents)?;

    let pretax = item.unit_price().multiply_quantity(item.quantity);

    let tax = if item.effective_taxable(category) {
        pretax.calculate_tax(rate)
    } else {
        Money::zero()
    };

    let totals = LineItemTotals {
        pretax,
        tax,
        total: pretax + tax,
    };

    if item.is_return {
        Ok(totals.negate())
    } else {
        Ok(totals)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn taxable_category() -> SalesCategory {
        SalesCategory {
            id: "550e8400-e29b-41d4-a716-446655440000".to_string(),
            name: "New Appliance".to_string(),
            taxable: true,
            active: true,
        }
    }

    fn exempt_category() -> SalesCategory {
        SalesCategory {
            taxable: false,
            name: "Extended Warranty".to_string(),
            ..taxable_category()
        }
    }

    fn item(unit_price_cents: i64) -> LineItem {
        LineItem {
            category_id: taxable_category().id,
            unit_price_cents,
            quantity: 1,
            is_return: false,
            taxable: None,
        }
    }

    #[test]
    fn test_taxable_sale() {
        let totals = evaluate(&item(10000), &taxable_category(), TaxRate::from_bps(825)).unwrap();
        assert_eq!(totals.pretax.cents(), 10000);
        assert_eq!(totals.tax.cents(), 825);
        assert_eq!(totals.total.cents(), 10825);
    }

    #[test]
    fn test_return_mirrors_sale() {
        let rate = TaxRate::from_bps(825);
        let sale = evaluate(&item(10000), &taxable_category(), rate).unwrap();
        let ret = evaluate(
            &LineItem {
                is_return: true,
                ..item(10000)
            },
            &taxable_category(),
            rate,
        )
        .unwrap();

        assert_eq!(ret.pretax.cents(), -10000);
        assert_eq!(ret.tax.cents(), -825);
        assert_eq!(ret.total.cents(), -10825);

        // A sale and its return cancel exactly.
        assert_eq!(sale.pretax + ret.pretax, Money::zero());
        assert_eq!(sale.tax + ret.tax, Money::zero());
        assert_eq!(sale.total + ret.total, Money::zero());
    }

    #[test]
    fn test_total_is_pretax_plus_tax() {
        let rate = TaxRate::from_bps(1075);
        for price in [0, 1, 99, 1099, 10000, 123456] {
            for is_return in [false, true] {
                let totals = evaluate(
                    &LineItem {
                        is_return,
                        quantity: 3,
                        ..item(price)
                    },
                    &taxable_category(),
                    rate,
                )
                .unwrap();
                assert_eq!(totals.total, totals.pretax + totals.tax);
            }
        }
    }

    #[test]
    fn test_quantity_multiplies_pretax() {
        let totals = evaluate(
            &LineItem {
                quantity: 4,
                ..item(2599)
            },
            &taxable_category(),
            TaxRate::from_bps(825),
        )
        .unwrap();
        assert_eq!(totals.pretax.cents(), 10396);
        // Tax on the whole line, not per unit: round(10396 × 0.0825) = 858
        assert_eq!(totals.tax.cents(), 858);
        assert_eq!(totals.total.cents(), 11254);
    }

    #[test]
    fn test_category_default_exempt() {
        let totals = evaluate(&item(10000), &exempt_category(), TaxRate::from_bps(825)).unwrap();
        assert_eq!(totals.tax.cents(), 0);
        assert_eq!(totals.total.cents(), 10000);
    }

    #[test]
    fn test_override_beats_category_default() {
        let rate = TaxRate::from_bps(825);

        // Exempt category, cashier flags the line taxable.
        let forced_taxable = evaluate(
            &LineItem {
                taxable: Some(true),
                ..item(10000)
            },
            &exempt_category(),
            rate,
        )
        .unwrap();
        assert_eq!(forced_taxable.tax.cents(), 825);

        // Taxable category, cashier exempts the line.
        let forced_exempt = evaluate(
            &LineItem {
                taxable: Some(false),
                ..item(10000)
            },
            &taxable_category(),
            rate,
        )
        .unwrap();
        assert_eq!(forced_exempt.tax.cents(), 0);
    }

    #[test]
    fn test_zero_price_yields_zero_everything() {
        let totals = evaluate(&item(0), &taxable_category(), TaxRate::from_bps(825)).unwrap();
        assert_eq!(totals, LineItemTotals::default());
    }

    #[test]
    fn test_bad_quantity_rejected_not_clamped() {
        let rate = TaxRate::from_bps(825);
        for qty in [0, -1, 1000] {
            let result = evaluate(
                &LineItem {
                    quantity: qty,
                    ..item(1000)
                },
                &taxable_category(),
                rate,
            );
            assert!(result.is_err(), "quantity {} should be rejected", qty);
        }
    }

    #[test]
    fn test_negative_price_rejected() {
        let result = evaluate(&item(-500), &taxable_category(), TaxRate::from_bps(825));
        assert!(result.is_err());
    }
}
