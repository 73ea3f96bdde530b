//! # Tender Reconciler
//!
//! Turns tender drafts into stored tenders and aggregates what was paid.
//!
//! Two kinds of draft arrive from the counter:
//!
//! - **Normal**: the amount is the actual cash effect; it is validated and
//!   accepted as given.
//! - **Layaway**: the amount is the post-tax total the customer wants the
//!   deposit to eventually cover ("put $50 toward it"). The stored amount
//!   is back-computed as `round(desired / (1 + rate))`, the inverse of the
//!   line item tax step.
//!
//! The back-computation and the forward tax formula agree to within one
//! cent on a round trip; that tolerance is documented on
//! [`Money::strip_tax`] and is accepted behavior, not a defect.

use crate::error::CoreResult;
use crate::money::Money;
use crate::types::{TaxRate, Tender, TenderDraft};
use crate::validation::validate_tender_amount;

// =============================================================================
// Resolution
// =============================================================================

/// Resolves one tender draft into its stored form.
///
/// Rejects negative amounts before computation; zero is allowed. The
/// rate is only consulted for layaway drafts.
///
/// ## Example
/// ```rust
/// use bayou_core::tender::resolve;
/// use bayou_core::types::{TaxRate, TenderDraft};
///
/// let draft = TenderDraft {
///     payment_type_id: "550e8400-e29b-41d4-a716-446655440000".to_string(),
///     amount_cents: 5000,
///     is_layaway: true,
/// };
///
/// let tender = resolve(&draft, TaxRate::from_bps(825)).unwrap();
/// assert_eq!(tender.amount_cents, 4619); // round(5000 / 1.0825)
/// ```
pub fn resolve(draft: &TenderDraft, rate: TaxRate) -> CoreResult<Tender> {
    validate_tender_amount(draft.amount_cents)?;

    let amount = if draft.is_layaway {
        Money::from_cents(draft.amount_cents).strip_tax(rate)
    } else {
        Money::from_cents(draft.amount_cents)
    };

    Ok(Tender {
        payment_type_id: draft.payment_type_id.clone(),
        amount_cents: amount.cents(),
        is_layaway: draft.is_layaway,
    })
}

/// Resolves a batch of drafts, failing on the first invalid one.
pub fn resolve_all(drafts: &[TenderDraft], rate: TaxRate) -> CoreResult<Vec<Tender>> {
    drafts.iter().map(|draft| resolve(draft, rate)).collect()
}

// =============================================================================
// Aggregation
// =============================================================================

/// Sums the resolved tender amounts.
///
/// A plain non-negative sum over an unordered set; tenders are never
/// signed, so order cannot matter.
pub fn total_paid(tenders: &[Tender]) -> Money {
    tenders.iter().map(Tender::amount).sum()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const PT: &str = "550e8400-e29b-41d4-a716-446655440000";

    fn draft(amount_cents: i64, is_layaway: bool) -> TenderDraft {
        TenderDraft {
            payment_type_id: PT.to_string(),
            amount_cents,
            is_layaway,
        }
    }

    #[test]
    fn test_normal_tender_passes_through() {
        let tender = resolve(&draft(10825, false), TaxRate::from_bps(825)).unwrap();
        assert_eq!(tender.amount_cents, 10825);
        assert!(!tender.is_layaway);
    }

    #[test]
    fn test_layaway_back_computes() {
        let tender = resolve(&draft(5000, true), TaxRate::from_bps(825)).unwrap();
        assert_eq!(tender.amount_cents, 4619);
        assert!(tender.is_layaway);
    }

    #[test]
    fn test_layaway_at_zero_rate_is_identity() {
        let tender = resolve(&draft(5000, true), TaxRate::zero()).unwrap();
        assert_eq!(tender.amount_cents, 5000);
    }

    #[test]
    fn test_negative_amount_rejected() {
        assert!(resolve(&draft(-1, false), TaxRate::zero()).is_err());
        assert!(resolve(&draft(-5000, true), TaxRate::from_bps(825)).is_err());
    }

    #[test]
    fn test_zero_amount_allowed() {
        let tender = resolve(&draft(0, false), TaxRate::zero()).unwrap();
        assert_eq!(tender.amount_cents, 0);
    }

    #[test]
    fn test_resolve_all_fails_on_first_bad_draft() {
        let drafts = vec![draft(100, false), draft(-1, false), draft(200, false)];
        assert!(resolve_all(&drafts, TaxRate::zero()).is_err());
    }

    #[test]
    fn test_total_paid_sums_and_ignores_order() {
        let rate = TaxRate::from_bps(825);
        let mut tenders =
            resolve_all(&[draft(5000, true), draft(10825, false), draft(0, false)], rate).unwrap();

        let forward = total_paid(&tenders);
        tenders.reverse();
        let backward = total_paid(&tenders);

        assert_eq!(forward, backward);
        assert_eq!(forward.cents(), 4619 + 10825);
    }

    /// Forward tax on a layaway-derived amount reproduces the desired
    /// total within one cent, across the rates a location could carry.
    #[test]
    fn test_layaway_round_trip_within_one_cent() {
        for bps in [0, 1, 250, 825, 875, 1075, 1999, 2000] {
            let rate = TaxRate::from_bps(bps);
            for desired in [1, 50, 4999, 5000, 10825, 250_000] {
                let tender = resolve(&draft(desired, true), rate).unwrap();
                let amount = tender.amount();
                let rebuilt = amount + amount.calculate_tax(rate);
                let drift = (rebuilt.cents() - desired).abs();
                assert!(
                    drift <= 1,
                    "desired {} at {} bps rebuilt as {} (drift {})",
                    desired,
                    bps,
                    rebuilt.cents(),
                    drift
                );
            }
        }
    }
}
