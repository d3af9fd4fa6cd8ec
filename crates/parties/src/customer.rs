use serde::{Deserialize, Serialize};

use gstbill_core::validators;
use gstbill_core::{CustomerId, DomainResult, Entity, FieldErrors};

/// Customer classification for GST reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomerType {
    /// Registered business; a GSTIN is mandatory.
    #[serde(rename = "B2B")]
    Business,
    /// Unregistered consumer.
    #[serde(rename = "B2C")]
    Consumer,
}

impl CustomerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerType::Business => "B2B",
            CustomerType::Consumer => "B2C",
        }
    }
}

impl core::fmt::Display for CustomerType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for CustomerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "B2B" => Ok(CustomerType::Business),
            "B2C" => Ok(CustomerType::Consumer),
            other => Err(format!("unknown customer type: {other} (expected B2B or B2C)")),
        }
    }
}

/// Customer master record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    #[serde(default)]
    pub gstin: Option<String>,
    pub customer_type: CustomerType,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub billing_address: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub state_code: Option<String>,
    #[serde(default)]
    pub pincode: Option<String>,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

fn active_by_default() -> bool {
    true
}

impl Entity for Customer {
    type Id = CustomerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Customer {
    /// GST state code used as place of supply, from the explicit field or the
    /// GSTIN prefix.
    pub fn state_code(&self) -> Option<&str> {
        self.state_code
            .as_deref()
            .filter(|c| c.len() == 2)
            .or_else(|| self.gstin.as_deref().and_then(|g| g.get(..2)))
    }
}

/// Create/update body for `/masters/customer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gstin: Option<String>,
    pub customer_type: CustomerType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
}

impl CustomerPayload {
    pub fn new(name: impl Into<String>, customer_type: CustomerType) -> Self {
        Self {
            name: name.into(),
            gstin: None,
            customer_type,
            email: None,
            phone: None,
            billing_address: None,
            state: None,
            state_code: None,
            pincode: None,
        }
    }

    pub fn from_customer(customer: &Customer) -> Self {
        Self {
            name: customer.name.clone(),
            gstin: customer.gstin.clone(),
            customer_type: customer.customer_type,
            email: customer.email.clone(),
            phone: customer.phone.clone(),
            billing_address: customer.billing_address.clone(),
            state: customer.state.clone(),
            state_code: customer.state_code.clone(),
            pincode: customer.pincode.clone(),
        }
    }

    /// Upper-case the GSTIN and drop empty optional strings.
    pub fn normalized(mut self) -> Self {
        let clean = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        self.name = self.name.trim().to_string();
        self.gstin = clean(self.gstin).map(|g| g.to_uppercase());
        self.email = clean(self.email);
        self.phone = clean(self.phone);
        self.billing_address = clean(self.billing_address);
        self.state = clean(self.state);
        self.state_code = clean(self.state_code);
        self.pincode = clean(self.pincode);
        if self.state_code.is_none() {
            self.state_code = self.gstin.as_deref().and_then(|g| g.get(..2)).map(str::to_string);
        }
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        let opt = |v: &Option<String>| v.as_deref().unwrap_or("").to_string();
        let gstin = opt(&self.gstin);
        let mut errors = FieldErrors::new();

        errors.check("name", validators::required(&self.name, "Name"));
        errors.check("name", validators::min_length(&self.name, 2, "Name"));
        if self.customer_type == CustomerType::Business {
            errors.check("gstin", validators::required(&gstin, "GSTIN"));
        }
        errors.check("gstin", validators::gstin(&gstin, "GSTIN"));
        errors.check("email", validators::email(&opt(&self.email), "Email"));
        errors.check("phone", validators::phone(&opt(&self.phone), "Phone"));
        errors.check("pincode", validators::pincode(&opt(&self.pincode), "Pincode"));

        errors.into_result()
    }
}
