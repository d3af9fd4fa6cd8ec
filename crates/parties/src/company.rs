use serde::{Deserialize, Serialize};

use gstbill_core::validators;
use gstbill_core::{CompanyId, DomainResult, FieldErrors, states};

/// The tenant's own company (the seller on every invoice).
///
/// Singleton per tenant. The backend returns a record without an `id` (or a
/// 404) until the company has been set up.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Company {
    #[serde(default)]
    pub id: Option<CompanyId>,
    pub legal_name: String,
    #[serde(default)]
    pub trade_name: Option<String>,
    #[serde(default)]
    pub gstin: Option<String>,
    #[serde(default)]
    pub pan: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub state_code: Option<String>,
    #[serde(default)]
    pub pincode: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub bank_account_number: Option<String>,
    #[serde(default)]
    pub bank_ifsc: Option<String>,
}

impl Company {
    pub fn is_setup(&self) -> bool {
        self.id.is_some()
    }

    /// Name printed on documents: trade name when present, else legal name.
    pub fn display_name(&self) -> &str {
        self.trade_name
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(&self.legal_name)
    }

    /// GST state code, from the explicit field or the GSTIN prefix.
    pub fn state_code(&self) -> Option<&str> {
        self.state_code
            .as_deref()
            .filter(|c| c.len() == 2)
            .or_else(|| self.gstin.as_deref().and_then(|g| g.get(..2)))
    }

    pub fn state_name(&self) -> Option<&'static str> {
        self.state_code().and_then(states::state_name)
    }
}

/// Create/update body for `/identity/company`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompanyPayload {
    pub legal_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade_name: Option<String>,
    pub gstin: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_account_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_ifsc: Option<String>,
}

impl CompanyPayload {
    /// Prefill a form from an existing record.
    pub fn from_company(company: &Company) -> Self {
        Self {
            legal_name: company.legal_name.clone(),
            trade_name: company.trade_name.clone(),
            gstin: company.gstin.clone().unwrap_or_default(),
            pan: company.pan.clone(),
            address: company.address.clone(),
            city: company.city.clone(),
            state: company.state.clone(),
            state_code: company.state_code.clone(),
            pincode: company.pincode.clone(),
            phone: company.phone.clone(),
            email: company.email.clone(),
            bank_name: company.bank_name.clone(),
            bank_account_number: company.bank_account_number.clone(),
            bank_ifsc: company.bank_ifsc.clone(),
        }
    }

    /// Upper-case identifiers and fill state details from the GSTIN when the
    /// form left them empty.
    pub fn normalized(mut self) -> Self {
        self.gstin = self.gstin.trim().to_uppercase();
        self.pan = self.pan.map(|p| p.trim().to_uppercase());
        self.bank_ifsc = self.bank_ifsc.map(|i| i.trim().to_uppercase());
        if self.state_code.as_deref().is_none_or(str::is_empty) {
            self.state_code = self.gstin.get(..2).map(str::to_string);
        }
        if self.state.as_deref().is_none_or(str::is_empty) {
            self.state = states::state_from_gstin(&self.gstin).map(str::to_string);
        }
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        let opt = |v: &Option<String>| v.as_deref().unwrap_or("").to_string();
        let mut errors = FieldErrors::new();

        errors.check("legal_name", validators::required(&self.legal_name, "Legal name"));
        errors.check("legal_name", validators::min_length(&self.legal_name, 2, "Legal name"));
        errors.check("gstin", validators::required(&self.gstin, "GSTIN"));
        errors.check("gstin", validators::gstin(&self.gstin, "GSTIN"));
        errors.check("pan", validators::pan(&opt(&self.pan), "PAN"));
        errors.check("pincode", validators::pincode(&opt(&self.pincode), "Pincode"));
        errors.check("phone", validators::phone(&opt(&self.phone), "Phone"));
        errors.check("email", validators::email(&opt(&self.email), "Email"));
        errors.check("bank_ifsc", validators::ifsc(&opt(&self.bank_ifsc), "IFSC"));
        errors.check(
            "bank_account_number",
            validators::account_number(&opt(&self.bank_account_number), "Account Number"),
        );

        // PAN, when given, must be the one embedded in the GSTIN.
        if let (Some(pan), Some(embedded)) = (self.pan.as_deref(), self.gstin.get(2..12)) {
            if errors.get("pan").is_none()
                && errors.get("gstin").is_none()
                && !pan.is_empty()
                && !pan.eq_ignore_ascii_case(embedded)
            {
                errors.insert("pan", "PAN does not match GSTIN");
            }
        }

        errors.into_result()
    }
}
