use gstbill_parties::{Company, CompanyPayload};

use crate::error::ClientResult;
use crate::http::ApiClient;

#[derive(Debug, Clone)]
pub struct CompanyApi {
    client: ApiClient,
}

impl CompanyApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// The tenant's company with its GSTIN. 404 until one is set up.
    pub async fn get(&self) -> ClientResult<Company> {
        self.client.get("/identity/company/with-gstin").await
    }

    pub async fn create(&self, payload: &CompanyPayload) -> ClientResult<Company> {
        self.client.post("/identity/company", payload).await
    }

    pub async fn update(&self, payload: &CompanyPayload) -> ClientResult<Company> {
        self.client.put("/identity/company", payload).await
    }
}
