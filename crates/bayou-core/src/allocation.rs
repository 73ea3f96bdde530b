//! # Tender Allocation
//!
//! Prorates one tender across a transaction's line items.
//!
//! Reporting wants to know not just that $500 came in, but which line
//! items the $500 settled and how much of each slice was tax. Allocation
//! splits a tender by pretax share:
//!
//! - only non-return lines with a positive pretax amount participate
//! - each line's slice is `round_half_up(amount × line_share)`
//! - the last participating line takes the exact remainder, so the slices
//!   always re-add to the tender amount
//! - a taxable line's slice is split into pretax/tax with the inclusive
//!   divisor `1 + rate`, the same inverse layaway uses
//!
//! Pure function over its inputs; nothing is stored here.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::money::Money;
use crate::types::{Catalog, LineItem, TaxRate, Tender};
use crate::validation::{validate_quantity, validate_unit_price};

// =============================================================================
// Allocation Result
// =============================================================================

/// One tender's slice applied to one line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TenderAllocation {
    /// Index of the line item within the slice passed to [`allocate`].
    pub line_index: usize,
    /// Pretax portion of the applied slice.
    pub applied_pretax: Money,
    /// Tax portion of the applied slice (zero for exempt lines).
    pub applied_tax: Money,
    /// Total applied to this line; parts re-add exactly.
    pub applied_total: Money,
}

// =============================================================================
// Allocation
// =============================================================================

/// Allocates a tender across line items by pretax share.
///
/// Returns one allocation per participating line, in line order. Returns
/// an empty vec when nothing participates (all returns or zero-price
/// lines). The applied totals sum exactly to the tender amount whenever
/// at least one line participates.
pub fn allocate(
    tender: &Tender,
    items: &[LineItem],
    catalog: &Catalog,
    rate: TaxRate,
) -> CoreResult<Vec<TenderAllocation>> {
    // Participating lines and their pretax weights.
    let mut participants: Vec<(usize, Money, bool)> = Vec::new();
    for (index, item) in items.iter().enumerate() {
        validate_quantity(item.quantity)?;
        validate_unit_price(item.unit_price_cents)?;

        let category = catalog.category(&item.category_id)?;
        let pretax = item.unit_price().multiply_quantity(item.quantity);
        if !item.is_return && pretax.is_positive() {
            participants.push((index, pretax, item.effective_taxable(category)));
        }
    }

    if participants.is_empty() {
        return Ok(Vec::new());
    }

    let total_pretax: Money = participants.iter().map(|(_, pretax, _)| *pretax).sum();
    let amount = tender.amount();
    let mut remaining = amount;
    let last = participants.len() - 1;

    let mut allocations = Vec::with_capacity(participants.len());
    for (position, (line_index, pretax, taxable)) in participants.into_iter().enumerate() {
        let applied_total = if position == last {
            remaining
        } else {
            ratio_share(amount, pretax, total_pretax)
        };
        remaining -= applied_total;

        let (applied_pretax, applied_tax) = if taxable {
            applied_total.split_inclusive(rate)
        } else {
            (applied_total, Money::zero())
        };

        allocations.push(TenderAllocation {
            line_index,
            applied_pretax,
            applied_tax,
            applied_total,
        });
    }

    Ok(allocations)
}

/// `round_half_up(amount × part / whole)` in pure integer math.
fn ratio_share(amount: Money, part: Money, whole: Money) -> Money {
    let numer = amount.cents() as i128 * part.cents() as i128;
    let denom = whole.cents() as i128;
    Money::from_cents(((numer * 2 + denom) / (denom * 2)) as i64)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SalesCategory;

    const TAXABLE_CAT: &str = "11111111-1111-4111-8111-111111111111";
    const EXEMPT_CAT: &str = "22222222-2222-4222-8222-222222222222";

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog
            .add_category(SalesCategory {
                id: TAXABLE_CAT.to_string(),
                name: "Parts".to_string(),
                taxable: true,
                active: true,
            })
            .unwrap();
        catalog
            .add_category(SalesCategory {
                id: EXEMPT_CAT.to_string(),
                name: "Extended Warranty".to_string(),
                taxable: false,
                active: true,
            })
            .unwrap();
        catalog
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

    fn tender(amount_cents: i64) -> Tender {
        Tender {
            payment_type_id: "33333333-3333-4333-8333-333333333333".to_string(),
            amount_cents,
            is_layaway: false,
        }
    }

    #[test]
    fn test_proportional_split_with_exact_remainder() {
        let items = vec![item(EXEMPT_CAT, 1200), item(EXEMPT_CAT, 800)];
        let allocations = allocate(&tender(1000), &items, &catalog(), TaxRate::zero()).unwrap();

        assert_eq!(allocations.len(), 2);
        assert_eq!(allocations[0].applied_total.cents(), 600);
        assert_eq!(allocations[1].applied_total.cents(), 400);

        let applied: Money = allocations.iter().map(|a| a.applied_total).sum();
        assert_eq!(applied, tender(1000).amount());
    }

    #[test]
    fn test_remainder_lands_on_last_line() {
        // 1000 over three equal lines: 333 + 333 + 334.
        let items = vec![
            item(EXEMPT_CAT, 500),
            item(EXEMPT_CAT, 500),
            item(EXEMPT_CAT, 500),
        ];
        let allocations = allocate(&tender(1000), &items, &catalog(), TaxRate::zero()).unwrap();

        let totals: Vec<i64> = allocations.iter().map(|a| a.applied_total.cents()).collect();
        assert_eq!(totals, vec![333, 333, 334]);
    }

    #[test]
    fn test_taxable_slice_splits_inclusive() {
        let items = vec![item(TAXABLE_CAT, 10000)];
        let rate = TaxRate::from_bps(825);
        let allocations = allocate(&tender(10825), &items, &catalog(), rate).unwrap();

        assert_eq!(allocations.len(), 1);
        assert_eq!(allocations[0].applied_pretax.cents(), 10000);
        assert_eq!(allocations[0].applied_tax.cents(), 825);
        assert_eq!(
            allocations[0].applied_pretax + allocations[0].applied_tax,
            allocations[0].applied_total
        );
    }

    #[test]
    fn test_exempt_slice_has_no_tax_part() {
        let items = vec![item(EXEMPT_CAT, 10000)];
        let allocations =
            allocate(&tender(5000), &items, &catalog(), TaxRate::from_bps(825)).unwrap();
        assert_eq!(allocations[0].applied_pretax.cents(), 5000);
        assert_eq!(allocations[0].applied_tax.cents(), 0);
    }

    #[test]
    fn test_returns_and_zero_price_lines_excluded() {
        let items = vec![
            item(TAXABLE_CAT, 0),
            LineItem {
                is_return: true,
                ..item(TAXABLE_CAT, 5000)
            },
            item(TAXABLE_CAT, 2000),
        ];
        let allocations =
            allocate(&tender(2165), &items, &catalog(), TaxRate::from_bps(825)).unwrap();

        assert_eq!(allocations.len(), 1);
        assert_eq!(allocations[0].line_index, 2);
        assert_eq!(allocations[0].applied_total.cents(), 2165);
    }

    #[test]
    fn test_no_participants_no_allocations() {
        let items = vec![item(TAXABLE_CAT, 0)];
        let allocations =
            allocate(&tender(5000), &items, &catalog(), TaxRate::from_bps(825)).unwrap();
        assert!(allocations.is_empty());
    }

    #[test]
    fn test_quantity_weighs_into_share() {
        // Line 0: 3 × 500 = 1500 pretax. Line 1: 1 × 500 = 500 pretax.
        let items = vec![
            LineItem {
                quantity: 3,
                ..item(EXEMPT_CAT, 500)
            },
            item(EXEMPT_CAT, 500),
        ];
        let allocations = allocate(&tender(1000), &items, &catalog(), TaxRate::zero()).unwrap();
        assert_eq!(allocations[0].applied_total.cents(), 750);
        assert_eq!(allocations[1].applied_total.cents(), 250);
    }

    #[test]
    fn test_missing_category_is_error() {
        let items = vec![item("99999999-9999-4999-8999-999999999999", 1000)];
        assert!(allocate(&tender(1000), &items, &catalog(), TaxRate::zero()).is_err());
    }
}
