//! Raw form input for the invoice screens, turned into request payloads.
//!
//! Browser inputs hand over strings. Parsing happens here so a bad number is
//! reported against its field the same way a backend validation error is.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use gstbill_core::{CustomerId, DomainError, DomainResult, FieldErrors};
use gstbill_invoicing::{InvoiceItemPayload, InvoicePayload};

/// Header of a new or edited draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftForm {
    pub customer_id: String,
    /// `YYYY-MM-DD`, as an `<input type="date">` reports it.
    pub invoice_date: String,
    pub place_of_supply: String,
    pub notes: String,
}

impl DraftForm {
    pub fn to_payload(&self) -> DomainResult<InvoicePayload> {
        let mut errors = FieldErrors::new();
        let customer_id = CustomerId::from_str(self.customer_id.trim()).ok();
        if customer_id.is_none() {
            errors.insert("customer_id", "Customer is required");
        }
        let invoice_date = NaiveDate::parse_from_str(self.invoice_date.trim(), "%Y-%m-%d").ok();
        if invoice_date.is_none() {
            errors.insert("invoice_date", "Invoice date is required");
        }
        let (Some(customer_id), Some(invoice_date)) = (customer_id, invoice_date) else {
            return Err(DomainError::Validation(errors));
        };

        let mut payload = InvoicePayload::new(customer_id, invoice_date);
        payload.place_of_supply = non_empty(&self.place_of_supply);
        payload.notes = non_empty(&self.notes);
        payload.validate()?;
        Ok(payload)
    }
}

/// One line being added to a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemForm {
    pub description: String,
    pub hsn_sac: String,
    pub quantity: String,
    pub unit: String,
    pub unit_price: String,
    pub discount: String,
    pub gst_rate: String,
}

impl Default for ItemForm {
    fn default() -> Self {
        Self {
            description: String::new(),
            hsn_sac: String::new(),
            quantity: "1".into(),
            unit: "NOS".into(),
            unit_price: String::new(),
            discount: "0".into(),
            gst_rate: "18".into(),
        }
    }
}

impl ItemForm {
    pub fn to_payload(&self) -> DomainResult<InvoiceItemPayload> {
        let mut errors = FieldErrors::new();
        let mut number = |field: &str, label: &str, raw: &str| -> Decimal {
            let raw = raw.trim();
            if raw.is_empty() {
                return Decimal::ZERO;
            }
            Decimal::from_str(raw).unwrap_or_else(|_| {
                errors.insert(field, format!("{label} must be a number"));
                Decimal::ZERO
            })
        };
        let quantity = number("quantity", "Quantity", &self.quantity);
        let unit_price = number("unit_price", "Unit price", &self.unit_price);
        let discount = number("discount", "Discount", &self.discount);
        let gst_rate = number("gst_rate", "GST rate", &self.gst_rate);
        errors.into_result()?;

        let payload = InvoiceItemPayload {
            product_id: None,
            description: self.description.trim().to_string(),
            hsn_sac: non_empty(&self.hsn_sac),
            quantity,
            unit: non_empty(&self.unit),
            unit_price,
            discount,
            gst_rate,
        };
        payload.validate()?;
        Ok(payload)
    }
}

fn non_empty(raw: &str) -> Option<String> {
    let raw = raw.trim();
    (!raw.is_empty()).then(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_errors(err: DomainError) -> FieldErrors {
        match err {
            DomainError::Validation(fields) => fields,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn draft_form_builds_the_create_payload() {
        let customer = CustomerId::new();
        let form = DraftForm {
            customer_id: customer.to_string(),
            invoice_date: "2024-03-05".into(),
            place_of_supply: " 27 ".into(),
            notes: "   ".into(),
        };
        let payload = form.to_payload().unwrap();
        assert_eq!(payload.customer_id, customer);
        assert_eq!(payload.invoice_date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(payload.place_of_supply.as_deref(), Some("27"));
        assert_eq!(payload.notes, None);
        assert!(payload.items.is_empty());
    }

    #[test]
    fn draft_form_reports_missing_header_fields() {
        let fields = field_errors(DraftForm::default().to_payload().unwrap_err());
        assert!(fields.get("customer_id").is_some());
        assert!(fields.get("invoice_date").is_some());
    }

    #[test]
    fn item_form_parses_numbers() {
        let form = ItemForm {
            description: " Laptop ".into(),
            hsn_sac: "8471".into(),
            quantity: "2".into(),
            unit_price: "1000.50".into(),
            ..Default::default()
        };
        let item = form.to_payload().unwrap();
        assert_eq!(item.description, "Laptop");
        assert_eq!(item.quantity, Decimal::TWO);
        assert_eq!(item.unit_price, Decimal::new(100050, 2));
        assert_eq!(item.discount, Decimal::ZERO);
        assert_eq!(item.gst_rate, Decimal::from(18));
        assert_eq!(item.unit.as_deref(), Some("NOS"));
    }

    #[test]
    fn item_form_flags_each_bad_field() {
        let form = ItemForm {
            description: "Laptop".into(),
            quantity: "two".into(),
            gst_rate: "18%".into(),
            ..Default::default()
        };
        let fields = field_errors(form.to_payload().unwrap_err());
        assert_eq!(fields.get("quantity"), Some("Quantity must be a number"));
        assert_eq!(fields.get("gst_rate"), Some("GST rate must be a number"));
        assert!(fields.get("unit_price").is_none());

        let form = ItemForm {
            quantity: "0".into(),
            ..Default::default()
        };
        let fields = field_errors(form.to_payload().unwrap_err());
        assert!(fields.get("description").is_some());
        assert!(fields.get("quantity").is_some());
    }
}
