use gstbill_parties::{Company, CompanyPayload};

use super::Status;
use crate::api::CompanyApi;
use crate::error::ClientResult;

#[derive(Debug)]
pub struct CompanyStore {
    api: CompanyApi,
    company: Option<Company>,
    status: Status,
}

impl CompanyStore {
    pub fn new(api: CompanyApi) -> Self {
        Self {
            api,
            company: None,
            status: Status::default(),
        }
    }

    pub fn company(&self) -> Option<&Company> {
        self.company.as_ref()
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn is_setup(&self) -> bool {
        self.company.as_ref().is_some_and(Company::is_setup)
    }

    /// Load the company. A 404 means it has not been set up yet: that is
    /// `Ok(None)` and no error is recorded.
    pub async fn fetch(&mut self) -> ClientResult<Option<&Company>> {
        self.status.begin();
        let result = self.api.get().await;
        self.status.loading = false;
        match result {
            Ok(company) => {
                self.company = Some(company);
                Ok(self.company.as_ref())
            }
            Err(err) if err.is_not_found() => {
                tracing::info!("company not set up yet");
                self.company = None;
                Ok(None)
            }
            Err(err) => {
                self.company = None;
                self.status.fail(err.to_string());
                Err(err)
            }
        }
    }

    /// Create the company on first save, update it afterwards.
    pub async fn save(&mut self, payload: &CompanyPayload) -> ClientResult<Company> {
        self.status.begin();
        let payload = payload.clone().normalized();
        let result = match payload.validate() {
            Err(err) => Err(err.into()),
            Ok(()) if self.is_setup() => self.api.update(&payload).await,
            Ok(()) => self.api.create(&payload).await,
        };
        if let Ok(company) = &result {
            self.company = Some(company.clone());
        }
        self.status.finish(result)
    }
}
