use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use gstbill_core::validators;
use gstbill_core::{DomainResult, Entity, FieldErrors, ProductId};

/// GST slabs (percent) a product may carry.
pub const GST_RATES: [Decimal; 7] = [
    dec!(0),
    dec!(0.25),
    dec!(3),
    dec!(5),
    dec!(12),
    dec!(18),
    dec!(28),
];

pub fn is_allowed_gst_rate(rate: Decimal) -> bool {
    GST_RATES.iter().any(|r| *r == rate)
}

/// Unit quantity codes (UQC) offered for products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Unit {
    Nos,
    Pcs,
    Kgs,
    Gms,
    Ltr,
    Mtr,
    Sqm,
    Box,
    Set,
    Hrs,
    Day,
}

impl Unit {
    pub const ALL: [Unit; 11] = [
        Unit::Nos,
        Unit::Pcs,
        Unit::Kgs,
        Unit::Gms,
        Unit::Ltr,
        Unit::Mtr,
        Unit::Sqm,
        Unit::Box,
        Unit::Set,
        Unit::Hrs,
        Unit::Day,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Unit::Nos => "NOS",
            Unit::Pcs => "PCS",
            Unit::Kgs => "KGS",
            Unit::Gms => "GMS",
            Unit::Ltr => "LTR",
            Unit::Mtr => "MTR",
            Unit::Sqm => "SQM",
            Unit::Box => "BOX",
            Unit::Set => "SET",
            Unit::Hrs => "HRS",
            Unit::Day => "DAY",
        }
    }

    /// Option label, e.g. `Kilograms (KGS)`.
    pub fn label(&self) -> &'static str {
        match self {
            Unit::Nos => "Numbers (NOS)",
            Unit::Pcs => "Pieces (PCS)",
            Unit::Kgs => "Kilograms (KGS)",
            Unit::Gms => "Grams (GMS)",
            Unit::Ltr => "Litres (LTR)",
            Unit::Mtr => "Metres (MTR)",
            Unit::Sqm => "Square Metres (SQM)",
            Unit::Box => "Box (BOX)",
            Unit::Set => "Set (SET)",
            Unit::Hrs => "Hours (HRS)",
            Unit::Day => "Days (DAY)",
        }
    }
}

impl core::fmt::Display for Unit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl core::str::FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        Unit::ALL
            .into_iter()
            .find(|u| u.code() == code)
            .ok_or_else(|| format!("unknown unit: {s}"))
    }
}

/// Product / service master record.
///
/// `unit` stays a free string on the read side: the backend may hold codes
/// this client does not offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub hsn_sac: String,
    pub unit: String,
    pub gst_rate: Decimal,
    #[serde(alias = "unit_price")]
    pub price: Decimal,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

fn active_by_default() -> bool {
    true
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Create/update body for `/masters/products`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub hsn_sac: String,
    pub unit: Unit,
    pub gst_rate: Decimal,
    pub price: Decimal,
}

impl ProductPayload {
    /// Prefill an edit form. Fails when the stored unit is not one this client
    /// offers.
    pub fn from_product(product: &Product) -> Result<Self, String> {
        Ok(Self {
            name: product.name.clone(),
            description: product.description.clone(),
            hsn_sac: product.hsn_sac.clone(),
            unit: product.unit.parse()?,
            gst_rate: product.gst_rate,
            price: product.price,
        })
    }

    pub fn validate(&self) -> DomainResult<()> {
        let mut errors = FieldErrors::new();

        errors.check("name", validators::required(self.name.trim(), "Name"));
        errors.check("name", validators::max_length(&self.name, 200, "Name"));
        errors.check("hsn_sac", validators::required(&self.hsn_sac, "HSN/SAC"));
        errors.check("hsn_sac", validators::hsn_sac(&self.hsn_sac, "HSN/SAC"));
        if !is_allowed_gst_rate(self.gst_rate) {
            errors.insert(
                "gst_rate",
                format!("GST rate {}% is not a valid GST slab", self.gst_rate.normalize()),
            );
        }
        if self.price.is_sign_negative() && !self.price.is_zero() {
            errors.insert("price", "Price must be a positive number");
        }

        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gstbill_core::DomainError;
    use proptest::prelude::*;

    fn payload() -> ProductPayload {
        ProductPayload {
            name: "Consulting".into(),
            description: None,
            hsn_sac: "998311".into(),
            unit: Unit::Hrs,
            gst_rate: dec!(18),
            price: dec!(2500),
        }
    }

    #[test]
    fn unit_codes_round_trip() {
        for unit in Unit::ALL {
            assert_eq!(unit.code().parse::<Unit>().unwrap(), unit);
        }
        assert_eq!(serde_json::to_string(&Unit::Sqm).unwrap(), "\"SQM\"");
        assert_eq!(Unit::Kgs.label(), "Kilograms (KGS)");
    }

    #[test]
    fn product_accepts_unit_price_alias_and_decimal_strings() {
        let json = format!(
            r#"{{"id":"{}","name":"Cement","hsn_sac":"2523","unit":"BAG","gst_rate":"28.00","unit_price":410.5}}"#,
            ProductId::new()
        );
        let product: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(product.gst_rate, dec!(28));
        assert_eq!(product.price, dec!(410.5));
        assert!(product.is_active);
        assert!(ProductPayload::from_product(&product).is_err());
    }

    #[test]
    fn valid_payload_passes() {
        assert!(payload().validate().is_ok());
    }

    #[test]
    fn rejects_bad_rate_price_and_hsn() {
        let mut bad = payload();
        bad.gst_rate = dec!(15);
        bad.price = dec!(-1);
        bad.hsn_sac = "12".into();
        match bad.validate() {
            Err(DomainError::Validation(errors)) => {
                assert_eq!(errors.get("gst_rate"), Some("GST rate 15% is not a valid GST slab"));
                assert_eq!(errors.get("price"), Some("Price must be a positive number"));
                assert_eq!(errors.get("hsn_sac"), Some("HSN/SAC must be 4-8 digits"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    proptest! {
        /// Property: every 4-8 digit HSN/SAC code is accepted.
        #[test]
        fn any_four_to_eight_digit_code_is_valid(code in "[0-9]{4,8}") {
            let mut p = payload();
            p.hsn_sac = code;
            prop_assert!(p.validate().is_ok());
        }
    }
}
