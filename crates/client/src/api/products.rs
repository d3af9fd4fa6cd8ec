use gstbill_core::ProductId;
use gstbill_products::{Product, ProductPayload};

use super::{ListParams, Page, StatusUpdate};
use crate::error::ClientResult;
use crate::http::ApiClient;

#[derive(Debug, Clone)]
pub struct ProductsApi {
    client: ApiClient,
}

impl ProductsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, params: &ListParams) -> ClientResult<Page<Product>> {
        self.client
            .get_with_query("/masters/products", params)
            .await
    }

    pub async fn get(&self, id: ProductId) -> ClientResult<Product> {
        self.client.get(&format!("/masters/products/{id}")).await
    }

    pub async fn create(&self, payload: &ProductPayload) -> ClientResult<Product> {
        self.client.post("/masters/products", payload).await
    }

    pub async fn update(&self, id: ProductId, payload: &ProductPayload) -> ClientResult<Product> {
        self.client
            .put(&format!("/masters/products/{id}"), payload)
            .await
    }

    pub async fn set_status(&self, id: ProductId, is_active: bool) -> ClientResult<Product> {
        self.client
            .patch(
                &format!("/masters/products/{id}/status"),
                &StatusUpdate { is_active },
            )
            .await
    }
}
