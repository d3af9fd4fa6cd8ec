//! One façade per REST resource, one method per endpoint.
//!
//! Façades never touch store state; they only shape requests and decode
//! responses.

pub mod auth;
pub mod company;
pub mod customers;
pub mod invoices;
pub mod products;

use serde::{Deserialize, Serialize};

pub use auth::AuthApi;
pub use company::CompanyApi;
pub use customers::CustomersApi;
pub use invoices::{InvoiceFilter, InvoicesApi, PdfDocument};
pub use products::ProductsApi;

/// Body for the `PATCH .../status` endpoints (soft delete / restore).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub is_active: bool,
}

/// Query parameters shared by the master-data list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

/// Paginated list envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub total_pages: u32,
}

fn first_page() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_params_skip_unset_fields() {
        let params = ListParams {
            search: Some("cement".into()),
            is_active: Some(true),
            ..Default::default()
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json, serde_json::json!({"search": "cement", "is_active": true}));
    }

    #[test]
    fn page_tolerates_missing_fields() {
        let page: Page<u32> = serde_json::from_str(r#"{"items":[1,2]}"#).unwrap();
        assert_eq!(page.items, vec![1, 2]);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 0);
    }
}
