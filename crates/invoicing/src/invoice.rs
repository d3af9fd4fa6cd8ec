use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gstbill_core::{
    CustomerId, DomainError, DomainResult, Entity, FieldErrors, InvoiceId, InvoiceItemId,
    ProductId,
};

use crate::tax::{InvoiceTotals, LineTax, SupplyKind, compute_line};

/// Invoice status lifecycle: `DRAFT → FINAL`, one way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InvoiceStatus {
    Draft,
    Final,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "DRAFT",
            InvoiceStatus::Final => "FINAL",
        }
    }
}

impl core::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Invoice line as returned by the backend, tax components included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub id: InvoiceItemId,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    pub description: String,
    #[serde(default)]
    pub hsn_sac: Option<String>,
    pub quantity: Decimal,
    #[serde(default)]
    pub unit: Option<String>,
    pub unit_price: Decimal,
    #[serde(default)]
    pub discount: Decimal,
    pub gst_rate: Decimal,
    #[serde(default)]
    pub taxable_value: Decimal,
    #[serde(default)]
    pub cgst_amount: Decimal,
    #[serde(default)]
    pub sgst_amount: Decimal,
    #[serde(default)]
    pub igst_amount: Decimal,
    #[serde(default)]
    pub total: Decimal,
}

impl InvoiceItem {
    /// Tax components as currently stored on the line.
    pub fn line_tax(&self) -> LineTax {
        LineTax {
            taxable_value: self.taxable_value,
            cgst: self.cgst_amount,
            sgst: self.sgst_amount,
            igst: self.igst_amount,
        }
    }

    /// Recompute the stored components for `supply`.
    pub fn recompute(&mut self, supply: SupplyKind) {
        let line = compute_line(
            self.quantity,
            self.unit_price,
            self.discount,
            self.gst_rate,
            supply,
        );
        self.taxable_value = line.taxable_value;
        self.cgst_amount = line.cgst;
        self.sgst_amount = line.sgst;
        self.igst_amount = line.igst;
        self.total = line.total();
    }
}

/// Invoice record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    /// Assigned by the backend; drafts may not have one yet.
    #[serde(default)]
    pub invoice_number: Option<String>,
    pub invoice_date: NaiveDate,
    pub customer_id: CustomerId,
    #[serde(default)]
    pub customer_name: Option<String>,
    /// GST state code of the place of supply.
    #[serde(default)]
    pub place_of_supply: Option<String>,
    pub status: InvoiceStatus,
    #[serde(default)]
    pub items: Vec<InvoiceItem>,
    #[serde(default)]
    pub subtotal: Decimal,
    #[serde(default)]
    pub cgst_amount: Decimal,
    #[serde(default)]
    pub sgst_amount: Decimal,
    #[serde(default)]
    pub igst_amount: Decimal,
    #[serde(default)]
    pub total_tax: Decimal,
    #[serde(default)]
    pub grand_total: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Entity for Invoice {
    type Id = InvoiceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Invoice {
    /// Human label: the invoice number, or `Draft <short id>` before one is
    /// assigned.
    pub fn label(&self) -> String {
        match self.invoice_number.as_deref() {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => {
                let id = self.id.to_string();
                format!("Draft {}", &id[..8])
            }
        }
    }

    /// Invariant: only drafts accept item or header changes.
    pub fn is_editable(&self) -> bool {
        self.status == InvoiceStatus::Draft
    }

    pub fn ensure_editable(&self) -> DomainResult<()> {
        if self.is_editable() {
            Ok(())
        } else {
            Err(DomainError::conflict(format!(
                "invoice {} is finalized and can no longer be modified",
                self.label()
            )))
        }
    }

    pub fn item(&self, item_id: InvoiceItemId) -> Option<&InvoiceItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    pub fn totals(&self) -> InvoiceTotals {
        InvoiceTotals {
            subtotal: self.subtotal,
            cgst: self.cgst_amount,
            sgst: self.sgst_amount,
            igst: self.igst_amount,
            total_tax: self.total_tax,
            grand_total: self.grand_total,
        }
    }

    /// Totals derived from the stored line components.
    pub fn derived_totals(&self) -> InvoiceTotals {
        let lines: Vec<LineTax> = self.items.iter().map(InvoiceItem::line_tax).collect();
        InvoiceTotals::from_lines(&lines)
    }

    fn apply_totals(&mut self, totals: InvoiceTotals) {
        self.subtotal = totals.subtotal;
        self.cgst_amount = totals.cgst;
        self.sgst_amount = totals.sgst;
        self.igst_amount = totals.igst;
        self.total_tax = totals.total_tax;
        self.grand_total = totals.grand_total;
    }

    /// Recompute every line and the invoice totals for `supply`.
    ///
    /// Only drafts can be recomputed; final totals are locked.
    pub fn recompute(&mut self, supply: SupplyKind) -> DomainResult<()> {
        self.ensure_editable()?;
        for item in &mut self.items {
            item.recompute(supply);
        }
        let totals = self.derived_totals();
        self.apply_totals(totals);
        Ok(())
    }

    /// Preconditions for `DRAFT → FINAL`.
    pub fn check_finalizable(&self) -> DomainResult<()> {
        if self.status == InvoiceStatus::Final {
            return Err(DomainError::conflict(format!(
                "invoice {} is already finalized",
                self.label()
            )));
        }
        if self.items.is_empty() {
            return Err(DomainError::validation(
                "items",
                "Cannot finalize an invoice without items",
            ));
        }
        Ok(())
    }

    /// Irreversible `DRAFT → FINAL` transition: recompute totals from the
    /// line components and lock them.
    pub fn finalize(&mut self) -> DomainResult<()> {
        self.check_finalizable()?;
        let totals = self.derived_totals();
        self.apply_totals(totals);
        self.status = InvoiceStatus::Final;
        Ok(())
    }
}

/// Create/update body for `/billing/invoices`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoicePayload {
    pub customer_id: CustomerId,
    pub invoice_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_of_supply: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<InvoiceItemPayload>,
}

impl InvoicePayload {
    pub fn new(customer_id: CustomerId, invoice_date: NaiveDate) -> Self {
        Self {
            customer_id,
            invoice_date,
            place_of_supply: None,
            notes: None,
            items: Vec::new(),
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        let mut errors = FieldErrors::new();
        if let Some(pos) = self.place_of_supply.as_deref() {
            if gstbill_core::states::state_name(pos).is_none() {
                errors.insert("place_of_supply", "Place of supply must be a valid state code");
            }
        }
        for (idx, item) in self.items.iter().enumerate() {
            if let Err(DomainError::Validation(item_errors)) = item.validate() {
                for (field, message) in item_errors.iter() {
                    errors.insert(format!("items[{idx}].{field}"), message);
                }
            }
        }
        errors.into_result()
    }
}

/// Body for adding or updating one invoice line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItemPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hsn_sac: Option<String>,
    pub quantity: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub unit_price: Decimal,
    #[serde(default)]
    pub discount: Decimal,
    pub gst_rate: Decimal,
}

impl InvoiceItemPayload {
    pub fn validate(&self) -> DomainResult<()> {
        let mut errors = FieldErrors::new();
        errors.check(
            "description",
            gstbill_core::validators::required(self.description.trim(), "Description"),
        );
        if let Some(hsn) = self.hsn_sac.as_deref() {
            errors.check("hsn_sac", gstbill_core::validators::hsn_sac(hsn, "HSN/SAC"));
        }
        if self.quantity <= Decimal::ZERO {
            errors.insert("quantity", "Quantity must be greater than zero");
        }
        if self.unit_price < Decimal::ZERO {
            errors.insert("unit_price", "Unit price must be a positive number");
        }
        if self.discount < Decimal::ZERO {
            errors.insert("discount", "Discount must be a positive number");
        }
        if self.gst_rate < Decimal::ZERO || self.gst_rate > Decimal::ONE_HUNDRED {
            errors.insert("gst_rate", "GST rate must be between 0 and 100");
        }
        errors.into_result()
    }

    /// Preview of the line before it is sent.
    pub fn preview(&self, supply: SupplyKind) -> LineTax {
        compute_line(
            self.quantity,
            self.unit_price,
            self.discount,
            self.gst_rate,
            supply,
        )
    }
}

/// Result of `POST /tax/calculate`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaxCalculation {
    #[serde(default)]
    pub invoice_id: Option<InvoiceId>,
    #[serde(default, alias = "subtotal")]
    pub taxable_amount: Decimal,
    #[serde(default)]
    pub cgst_amount: Decimal,
    #[serde(default)]
    pub sgst_amount: Decimal,
    #[serde(default)]
    pub igst_amount: Decimal,
    #[serde(default)]
    pub total_tax: Decimal,
    #[serde(default)]
    pub grand_total: Decimal,
    #[serde(default)]
    pub is_inter_state: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(qty: Decimal, price: Decimal, rate: Decimal) -> InvoiceItem {
        InvoiceItem {
            id: InvoiceItemId::new(),
            product_id: Some(ProductId::new()),
            description: "Widget".into(),
            hsn_sac: Some("8471".into()),
            quantity: qty,
            unit: Some("NOS".into()),
            unit_price: price,
            discount: Decimal::ZERO,
            gst_rate: rate,
            taxable_value: Decimal::ZERO,
            cgst_amount: Decimal::ZERO,
            sgst_amount: Decimal::ZERO,
            igst_amount: Decimal::ZERO,
            total: Decimal::ZERO,
        }
    }

    fn draft(items: Vec<InvoiceItem>) -> Invoice {
        Invoice {
            id: InvoiceId::new(),
            invoice_number: None,
            invoice_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            customer_id: CustomerId::new(),
            customer_name: None,
            place_of_supply: Some("27".into()),
            status: InvoiceStatus::Draft,
            items,
            subtotal: Decimal::ZERO,
            cgst_amount: Decimal::ZERO,
            sgst_amount: Decimal::ZERO,
            igst_amount: Decimal::ZERO,
            total_tax: Decimal::ZERO,
            grand_total: Decimal::ZERO,
            notes: None,
        }
    }

    #[test]
    fn status_wire_format() {
        assert_eq!(serde_json::to_string(&InvoiceStatus::Draft).unwrap(), "\"DRAFT\"");
        let s: InvoiceStatus = serde_json::from_str("\"FINAL\"").unwrap();
        assert_eq!(s, InvoiceStatus::Final);
    }

    #[test]
    fn recompute_updates_lines_and_totals() {
        let mut invoice = draft(vec![item(dec!(2), dec!(500), dec!(18))]);
        invoice.recompute(SupplyKind::IntraState).unwrap();
        assert_eq!(invoice.items[0].taxable_value, dec!(1000));
        assert_eq!(invoice.cgst_amount, dec!(90));
        assert_eq!(invoice.sgst_amount, dec!(90));
        assert_eq!(invoice.grand_total, dec!(1180));

        invoice.recompute(SupplyKind::InterState).unwrap();
        assert_eq!(invoice.cgst_amount, dec!(0));
        assert_eq!(invoice.igst_amount, dec!(180));
        assert_eq!(invoice.grand_total, dec!(1180));
    }

    #[test]
    fn finalize_locks_the_invoice() {
        let mut invoice = draft(vec![item(dec!(1), dec!(100), dec!(5))]);
        invoice.recompute(SupplyKind::IntraState).unwrap();
        invoice.finalize().unwrap();

        assert_eq!(invoice.status, InvoiceStatus::Final);
        assert!(!invoice.is_editable());
        assert_eq!(invoice.grand_total, dec!(105));

        match invoice.ensure_editable() {
            Err(DomainError::Conflict(msg)) => assert!(msg.contains("can no longer be modified")),
            other => panic!("expected conflict, got {other:?}"),
        }
        assert!(invoice.recompute(SupplyKind::InterState).is_err());
        assert_eq!(invoice.igst_amount, dec!(0));

        match invoice.finalize() {
            Err(DomainError::Conflict(msg)) => assert!(msg.contains("already finalized")),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn empty_draft_cannot_be_finalized() {
        let mut invoice = draft(Vec::new());
        match invoice.finalize() {
            Err(DomainError::Validation(errors)) => {
                assert_eq!(errors.get("items"), Some("Cannot finalize an invoice without items"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(invoice.status, InvoiceStatus::Draft);
    }

    #[test]
    fn label_falls_back_to_short_id() {
        let mut invoice = draft(Vec::new());
        assert!(invoice.label().starts_with("Draft "));
        invoice.invoice_number = Some("INV/2024/0001".into());
        assert_eq!(invoice.label(), "INV/2024/0001");
    }

    #[test]
    fn item_payload_validation() {
        let payload = InvoiceItemPayload {
            product_id: None,
            description: " ".into(),
            hsn_sac: Some("12".into()),
            quantity: dec!(0),
            unit: None,
            unit_price: dec!(-5),
            discount: dec!(0),
            gst_rate: dec!(18),
        };
        match payload.validate() {
            Err(DomainError::Validation(errors)) => {
                assert_eq!(errors.get("description"), Some("Description is required"));
                assert_eq!(errors.get("hsn_sac"), Some("HSN/SAC must be 4-8 digits"));
                assert_eq!(errors.get("quantity"), Some("Quantity must be greater than zero"));
                assert_eq!(errors.get("unit_price"), Some("Unit price must be a positive number"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn invoice_payload_prefixes_item_errors() {
        let mut payload = InvoicePayload::new(CustomerId::new(), NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
        payload.place_of_supply = Some("99".into());
        payload.items.push(InvoiceItemPayload {
            product_id: None,
            description: "Service".into(),
            hsn_sac: None,
            quantity: dec!(-1),
            unit: None,
            unit_price: dec!(10),
            discount: dec!(0),
            gst_rate: dec!(18),
        });
        match payload.validate() {
            Err(DomainError::Validation(errors)) => {
                assert_eq!(
                    errors.get("place_of_supply"),
                    Some("Place of supply must be a valid state code")
                );
                assert_eq!(
                    errors.get("items[0].quantity"),
                    Some("Quantity must be greater than zero")
                );
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn tax_calculation_tolerates_missing_fields() {
        let calc: TaxCalculation =
            serde_json::from_str(r#"{"subtotal":"1000.00","igst_amount":180,"is_inter_state":true}"#)
                .unwrap();
        assert_eq!(calc.taxable_amount, dec!(1000));
        assert_eq!(calc.igst_amount, dec!(180));
        assert_eq!(calc.cgst_amount, dec!(0));
        assert!(calc.is_inter_state);
    }
}
