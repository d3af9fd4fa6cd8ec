//! GST arithmetic: supply classification, per-line tax and invoice totals.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Whether a supply stays within one state (CGST + SGST) or crosses state
/// lines (IGST).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplyKind {
    IntraState,
    InterState,
}

impl SupplyKind {
    /// Classify from the seller's state code and the place of supply.
    ///
    /// An unknown side is treated as intra-state, which is how unregistered
    /// walk-in (B2C) sales are billed.
    pub fn between(seller_state: Option<&str>, place_of_supply: Option<&str>) -> Self {
        match (seller_state, place_of_supply) {
            (Some(seller), Some(buyer)) if !buyer.is_empty() && seller.trim() != buyer.trim() => {
                SupplyKind::InterState
            }
            _ => SupplyKind::IntraState,
        }
    }

    pub fn is_inter_state(&self) -> bool {
        *self == SupplyKind::InterState
    }
}

/// Round to paise, half away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Split an intra-state tax amount into `(cgst, sgst)`.
///
/// CGST takes the rounded half, SGST the remainder, so the two always add
/// back up to `tax` exactly.
pub fn split_intra_state(tax: Decimal) -> (Decimal, Decimal) {
    let cgst = round_money(tax / Decimal::TWO);
    (cgst, tax - cgst)
}

/// Tax components of a single invoice line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LineTax {
    pub taxable_value: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub igst: Decimal,
}

impl LineTax {
    pub fn tax(&self) -> Decimal {
        self.cgst + self.sgst + self.igst
    }

    pub fn total(&self) -> Decimal {
        self.taxable_value + self.tax()
    }
}

/// Compute one line: taxable = quantity × unit price − discount, tax at
/// `rate` percent rounded to paise, then split by supply kind.
///
/// A discount larger than the gross amount clamps the taxable value at zero.
pub fn compute_line(
    quantity: Decimal,
    unit_price: Decimal,
    discount: Decimal,
    rate: Decimal,
    supply: SupplyKind,
) -> LineTax {
    let gross = round_money(quantity * unit_price);
    let taxable_value = (gross - discount).max(Decimal::ZERO);
    let tax = round_money(taxable_value * rate / Decimal::ONE_HUNDRED);

    match supply {
        SupplyKind::IntraState => {
            let (cgst, sgst) = split_intra_state(tax);
            LineTax {
                taxable_value,
                cgst,
                sgst,
                igst: Decimal::ZERO,
            }
        }
        SupplyKind::InterState => LineTax {
            taxable_value,
            cgst: Decimal::ZERO,
            sgst: Decimal::ZERO,
            igst: tax,
        },
    }
}

/// Invoice-level totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InvoiceTotals {
    pub subtotal: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub igst: Decimal,
    pub total_tax: Decimal,
    pub grand_total: Decimal,
}

impl InvoiceTotals {
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a LineTax>) -> Self {
        let mut totals = InvoiceTotals::default();
        for line in lines {
            totals.subtotal += line.taxable_value;
            totals.cgst += line.cgst;
            totals.sgst += line.sgst;
            totals.igst += line.igst;
        }
        totals.total_tax = totals.cgst + totals.sgst + totals.igst;
        totals.grand_total = totals.subtotal + totals.total_tax;
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn supply_kind_from_state_codes() {
        assert_eq!(SupplyKind::between(Some("27"), Some("27")), SupplyKind::IntraState);
        assert_eq!(SupplyKind::between(Some("27"), Some("29")), SupplyKind::InterState);
        assert_eq!(SupplyKind::between(Some("27"), None), SupplyKind::IntraState);
        assert_eq!(SupplyKind::between(None, Some("29")), SupplyKind::IntraState);
        assert_eq!(SupplyKind::between(Some("27"), Some("")), SupplyKind::IntraState);
    }

    #[test]
    fn intra_state_line_splits_tax() {
        let line = compute_line(dec!(3), dec!(333.33), dec!(0), dec!(18), SupplyKind::IntraState);
        assert_eq!(line.taxable_value, dec!(999.99));
        // 999.99 * 18% = 179.9982 -> 180.00
        assert_eq!(line.cgst, dec!(90.00));
        assert_eq!(line.sgst, dec!(90.00));
        assert_eq!(line.igst, dec!(0));
        assert_eq!(line.total(), dec!(1179.99));
    }

    #[test]
    fn odd_paise_go_to_sgst() {
        let (cgst, sgst) = split_intra_state(dec!(0.05));
        assert_eq!(cgst, dec!(0.03));
        assert_eq!(sgst, dec!(0.02));
    }

    #[test]
    fn inter_state_line_is_all_igst() {
        let line = compute_line(dec!(2), dec!(500), dec!(100), dec!(12), SupplyKind::InterState);
        assert_eq!(line.taxable_value, dec!(900));
        assert_eq!(line.igst, dec!(108.00));
        assert_eq!(line.cgst + line.sgst, dec!(0));
    }

    #[test]
    fn discount_never_makes_taxable_negative() {
        let line = compute_line(dec!(1), dec!(10), dec!(50), dec!(5), SupplyKind::IntraState);
        assert_eq!(line.taxable_value, dec!(0));
        assert_eq!(line.tax(), dec!(0));
    }

    #[test]
    fn totals_sum_lines() {
        let a = compute_line(dec!(1), dec!(1000), dec!(0), dec!(18), SupplyKind::IntraState);
        let b = compute_line(dec!(4), dec!(250), dec!(0), dec!(5), SupplyKind::IntraState);
        let totals = InvoiceTotals::from_lines([&a, &b]);
        assert_eq!(totals.subtotal, dec!(2000));
        assert_eq!(totals.cgst, dec!(115));
        assert_eq!(totals.sgst, dec!(115));
        assert_eq!(totals.total_tax, dec!(230));
        assert_eq!(totals.grand_total, dec!(2230));
    }

    proptest! {
        /// Property: CGST + SGST always reassembles the intra-state tax, and
        /// the inter-state IGST equals that same tax.
        #[test]
        fn split_components_reassemble(
            qty in 1u32..1000,
            paise in 0u64..10_000_000,
            rate_idx in 0usize..7,
        ) {
            let rates = [dec!(0), dec!(0.25), dec!(3), dec!(5), dec!(12), dec!(18), dec!(28)];
            let price = Decimal::new(paise as i64, 2);
            let qty = Decimal::from(qty);
            let intra = compute_line(qty, price, Decimal::ZERO, rates[rate_idx], SupplyKind::IntraState);
            let inter = compute_line(qty, price, Decimal::ZERO, rates[rate_idx], SupplyKind::InterState);
            prop_assert_eq!(intra.cgst + intra.sgst, inter.igst);
            prop_assert!((intra.cgst - intra.sgst).abs() <= dec!(0.01));
            prop_assert_eq!(intra.taxable_value, inter.taxable_value);
        }
    }
}
