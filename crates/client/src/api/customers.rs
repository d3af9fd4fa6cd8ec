use gstbill_core::CustomerId;
use gstbill_parties::{Customer, CustomerPayload};

use super::{ListParams, StatusUpdate};
use crate::error::ClientResult;
use crate::http::ApiClient;

#[derive(Debug, Clone)]
pub struct CustomersApi {
    client: ApiClient,
}

impl CustomersApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Unpaginated: the customer endpoint answers with a plain array.
    pub async fn list(&self, params: &ListParams) -> ClientResult<Vec<Customer>> {
        self.client
            .get_with_query("/masters/customer", params)
            .await
    }

    pub async fn get(&self, id: CustomerId) -> ClientResult<Customer> {
        self.client.get(&format!("/masters/customer/{id}")).await
    }

    pub async fn create(&self, payload: &CustomerPayload) -> ClientResult<Customer> {
        self.client.post("/masters/customer", payload).await
    }

    pub async fn update(&self, id: CustomerId, payload: &CustomerPayload) -> ClientResult<Customer> {
        self.client
            .put(&format!("/masters/customer/{id}"), payload)
            .await
    }

    pub async fn set_status(&self, id: CustomerId, is_active: bool) -> ClientResult<Customer> {
        self.client
            .patch(
                &format!("/masters/customer/{id}/status"),
                &StatusUpdate { is_active },
            )
            .await
    }
}
