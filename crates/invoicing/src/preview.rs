//! Invoice preview (document view) and the CGST/SGST/IGST split of its tax
//! lines.
//!
//! The document service reports tax as a flat list of labelled lines. Labels
//! vary: some backends emit `CGST` and `SGST` separately, others a combined
//! intra-state line (`CGST+SGST`, `GST`) that has to be halved. The split
//! below folds all of them into three components.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gstbill_core::InvoiceId;
use gstbill_core::formatters;

use crate::invoice::InvoiceStatus;
use crate::tax::split_intra_state;

/// One labelled tax line from the preview payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxLine {
    pub tax_type: String,
    #[serde(default)]
    pub rate: Decimal,
    pub amount: Decimal,
}

/// One of CGST, SGST or IGST after the split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaxComponent {
    /// `None` when the component is absent, or when lines with different
    /// rates were folded together.
    pub rate: Option<Decimal>,
    pub amount: Decimal,
}

impl TaxComponent {
    fn add(&mut self, rate: Decimal, amount: Decimal, first: bool) {
        self.rate = if first {
            Some(rate)
        } else {
            self.rate.filter(|r| *r == rate)
        };
        self.amount += amount;
    }
}

/// Tax lines folded into the three GST components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub cgst: TaxComponent,
    pub sgst: TaxComponent,
    pub igst: TaxComponent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaxKind {
    Cgst,
    Sgst,
    Igst,
    CombinedIntra,
    Other,
}

fn classify(label: &str) -> TaxKind {
    let normalized: String = label
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();
    match normalized.as_str() {
        "CGST" => TaxKind::Cgst,
        "SGST" | "UTGST" => TaxKind::Sgst,
        "IGST" => TaxKind::Igst,
        "GST" | "CGST+SGST" | "CGST/SGST" | "CGST&SGST" | "CGST_SGST" | "CGST-SGST"
        | "CGST+UTGST" | "CGST/UTGST" => TaxKind::CombinedIntra,
        _ => TaxKind::Other,
    }
}

impl TaxBreakdown {
    /// Fold tax lines by label. Unknown labels (cess and the like) are not
    /// GST components and are left out.
    pub fn from_lines(lines: &[TaxLine]) -> Self {
        let mut out = TaxBreakdown::default();
        let (mut seen_c, mut seen_s, mut seen_i) = (false, false, false);

        for line in lines {
            match classify(&line.tax_type) {
                TaxKind::Cgst => {
                    out.cgst.add(line.rate, line.amount, !seen_c);
                    seen_c = true;
                }
                TaxKind::Sgst => {
                    out.sgst.add(line.rate, line.amount, !seen_s);
                    seen_s = true;
                }
                TaxKind::Igst => {
                    out.igst.add(line.rate, line.amount, !seen_i);
                    seen_i = true;
                }
                TaxKind::CombinedIntra => {
                    let half_rate = line.rate / Decimal::TWO;
                    let (cgst, sgst) = split_intra_state(line.amount);
                    out.cgst.add(half_rate, cgst, !seen_c);
                    out.sgst.add(half_rate, sgst, !seen_s);
                    seen_c = true;
                    seen_s = true;
                }
                TaxKind::Other => {}
            }
        }
        out
    }

    pub fn total(&self) -> Decimal {
        self.cgst.amount + self.sgst.amount + self.igst.amount
    }

    pub fn is_inter_state(&self) -> bool {
        !self.igst.amount.is_zero() && self.cgst.amount.is_zero() && self.sgst.amount.is_zero()
    }
}

/// Seller or buyer block printed on the document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PartySummary {
    #[serde(default, alias = "legal_name")]
    pub name: String,
    #[serde(default)]
    pub gstin: Option<String>,
    #[serde(default, alias = "billing_address")]
    pub address: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub state_code: Option<String>,
}

/// Line as printed on the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewItem {
    pub description: String,
    #[serde(default)]
    pub hsn_sac: Option<String>,
    pub quantity: Decimal,
    #[serde(default)]
    pub unit: Option<String>,
    pub unit_price: Decimal,
    #[serde(default)]
    pub taxable_value: Decimal,
    #[serde(default)]
    pub gst_rate: Decimal,
    #[serde(default)]
    pub total: Decimal,
}

/// `GET /documents/invoices/:id/preview`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoicePreview {
    pub invoice_id: InvoiceId,
    #[serde(default)]
    pub invoice_number: Option<String>,
    pub invoice_date: NaiveDate,
    pub status: InvoiceStatus,
    #[serde(default)]
    pub place_of_supply: Option<String>,
    #[serde(default, alias = "company")]
    pub seller: PartySummary,
    #[serde(default, alias = "customer")]
    pub buyer: PartySummary,
    #[serde(default)]
    pub items: Vec<PreviewItem>,
    #[serde(default)]
    pub taxes: Vec<TaxLine>,
    #[serde(default)]
    pub taxable_amount: Decimal,
    #[serde(default)]
    pub total_tax: Decimal,
    #[serde(default)]
    pub grand_total: Decimal,
    #[serde(default)]
    pub amount_in_words: Option<String>,
}

impl InvoicePreview {
    pub fn tax_breakdown(&self) -> TaxBreakdown {
        TaxBreakdown::from_lines(&self.taxes)
    }

    /// Amount in words as sent by the backend, or derived from the grand total.
    pub fn amount_in_words(&self) -> String {
        match self.amount_in_words.as_deref() {
            Some(words) if !words.trim().is_empty() => words.to_string(),
            _ => formatters::amount_in_words(self.grand_total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn line(tax_type: &str, rate: Decimal, amount: Decimal) -> TaxLine {
        TaxLine {
            tax_type: tax_type.to_string(),
            rate,
            amount,
        }
    }

    #[test]
    fn separate_intra_state_lines() {
        let b = TaxBreakdown::from_lines(&[
            line("CGST", dec!(9), dec!(90)),
            line("SGST", dec!(9), dec!(90)),
        ]);
        assert_eq!(b.cgst.amount + b.sgst.amount, dec!(180));
        assert_eq!(b.cgst.rate, Some(dec!(9)));
        assert_eq!(b.igst, TaxComponent::default());
        assert!(!b.is_inter_state());
    }

    #[test]
    fn combined_line_is_halved() {
        let b = TaxBreakdown::from_lines(&[line("cgst + sgst", dec!(18), dec!(180.05))]);
        assert_eq!(b.cgst.rate, Some(dec!(9)));
        assert_eq!(b.sgst.rate, Some(dec!(9)));
        assert_eq!(b.cgst.amount, dec!(90.03));
        assert_eq!(b.sgst.amount, dec!(90.02));
        assert_eq!(b.total(), dec!(180.05));
    }

    #[test]
    fn igst_alone_carries_full_amount() {
        let b = TaxBreakdown::from_lines(&[line("IGST", dec!(18), dec!(180))]);
        assert_eq!(b.igst.amount, dec!(180));
        assert_eq!(b.igst.rate, Some(dec!(18)));
        assert_eq!(b.cgst.amount, dec!(0));
        assert_eq!(b.sgst.amount, dec!(0));
        assert_eq!(b.cgst.rate, None);
        assert!(b.is_inter_state());
    }

    #[test]
    fn mixed_rates_lose_the_rate_but_keep_amounts() {
        let b = TaxBreakdown::from_lines(&[
            line("CGST", dec!(9), dec!(90)),
            line("CGST", dec!(2.5), dec!(12.5)),
            line("Cess", dec!(1), dec!(10)),
        ]);
        assert_eq!(b.cgst.amount, dec!(102.5));
        assert_eq!(b.cgst.rate, None);
        assert_eq!(b.total(), dec!(102.5));
    }

    #[test]
    fn absent_components_are_zero() {
        let b = TaxBreakdown::from_lines(&[]);
        assert_eq!(b.total(), dec!(0));
        assert!(!b.is_inter_state());
    }

    #[test]
    fn preview_deserializes_with_aliases() {
        let json = format!(
            r#"{{
                "invoice_id": "{}",
                "invoice_number": "INV-7",
                "invoice_date": "2024-05-02",
                "status": "FINAL",
                "company": {{"legal_name": "Acme", "gstin": "27AAPFU0939F1ZV"}},
                "customer": {{"name": "Ravi", "billing_address": "Pune"}},
                "items": [{{"description": "Widget", "quantity": 2, "unit_price": "50.00", "taxable_value": 100}}],
                "taxes": [{{"tax_type": "GST", "rate": 18, "amount": 18}}],
                "taxable_amount": 100,
                "total_tax": 18,
                "grand_total": 118
            }}"#,
            InvoiceId::new()
        );
        let preview: InvoicePreview = serde_json::from_str(&json).unwrap();
        assert_eq!(preview.seller.name, "Acme");
        assert_eq!(preview.buyer.address.as_deref(), Some("Pune"));
        assert_eq!(preview.tax_breakdown().cgst.amount, dec!(9));
        assert_eq!(
            preview.amount_in_words(),
            "One Hundred Eighteen Rupees Only"
        );
    }

    proptest! {
        /// Property: a combined intra-state line splits into halves that sum
        /// back to the combined amount.
        #[test]
        fn combined_split_sums_to_amount(paise in 0i64..100_000_000) {
            let amount = Decimal::new(paise, 2);
            let b = TaxBreakdown::from_lines(&[line("CGST+SGST", dec!(18), amount)]);
            prop_assert_eq!(b.cgst.amount + b.sgst.amount, amount);
            prop_assert_eq!(b.igst.amount, Decimal::ZERO);
        }

        /// Property: an IGST-only breakdown equals the full tax amount.
        #[test]
        fn igst_only_equals_full_amount(paise in 1i64..100_000_000) {
            let amount = Decimal::new(paise, 2);
            let b = TaxBreakdown::from_lines(&[line("IGST", dec!(28), amount)]);
            prop_assert_eq!(b.igst.amount, amount);
            prop_assert_eq!(b.total(), amount);
            prop_assert!(b.is_inter_state());
        }
    }
}
