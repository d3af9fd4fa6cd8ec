//! One state store per resource.
//!
//! Every action follows the same shape: clear `error`, set `loading`, call one
//! façade method, fold the result into local state, then record the error
//! message and hand the error back to the caller. Actions take `&mut self`;
//! two overlapping calls are simply two requests and the last one to finish
//! wins.

pub mod auth;
pub mod company;
pub mod customers;
pub mod invoices;
pub mod products;

use gstbill_core::Entity;

use crate::api::{AuthApi, CompanyApi, CustomersApi, InvoicesApi, ProductsApi};
use crate::error::ClientResult;
use crate::http::ApiClient;

pub use auth::AuthStore;
pub use company::CompanyStore;
pub use customers::CustomersStore;
pub use invoices::InvoicesStore;
pub use products::ProductsStore;

/// `loading` / `error` bookkeeping shared by every store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    loading: bool,
    error: Option<String>,
}

impl Status {
    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub(crate) fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// End an action, recording the failure message if there was one.
    pub(crate) fn finish<T>(&mut self, result: ClientResult<T>) -> ClientResult<T> {
        self.loading = false;
        if let Err(err) = &result {
            self.error = Some(err.to_string());
        }
        result
    }

    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }
}

/// Swap in `updated` where a record with the same id sits. Other records are
/// left untouched; an unknown id changes nothing.
pub(crate) fn replace_by_id<T: Entity>(records: &mut [T], updated: &T) -> bool
where
    T: Clone,
{
    match records.iter_mut().find(|r| r.id() == updated.id()) {
        Some(slot) => {
            *slot = updated.clone();
            true
        }
        None => false,
    }
}

/// Every store, wired to one shared client.
pub struct Stores {
    pub auth: AuthStore,
    pub company: CompanyStore,
    pub products: ProductsStore,
    pub customers: CustomersStore,
    pub invoices: InvoicesStore,
}

impl Stores {
    /// Build all stores and load the persisted session.
    pub fn new(client: &ApiClient) -> Self {
        let mut auth = AuthStore::new(AuthApi::new(client.clone()), client.storage().clone());
        auth.init();
        Self {
            auth,
            company: CompanyStore::new(CompanyApi::new(client.clone())),
            products: ProductsStore::new(ProductsApi::new(client.clone())),
            customers: CustomersStore::new(CustomersApi::new(client.clone())),
            invoices: InvoicesStore::new(InvoicesApi::new(client.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;

    #[derive(Debug, Clone, PartialEq)]
    struct Rec {
        id: u32,
        name: &'static str,
    }

    impl Entity for Rec {
        type Id = u32;

        fn id(&self) -> &u32 {
            &self.id
        }
    }

    #[test]
    fn replace_touches_only_the_matching_record() {
        let mut recs = vec![Rec { id: 1, name: "a" }, Rec { id: 2, name: "b" }];
        assert!(replace_by_id(&mut recs, &Rec { id: 2, name: "B" }));
        assert_eq!(recs, vec![Rec { id: 1, name: "a" }, Rec { id: 2, name: "B" }]);
        assert!(!replace_by_id(&mut recs, &Rec { id: 9, name: "z" }));
        assert_eq!(recs.len(), 2);
    }

    #[test]
    fn status_records_failure_and_clears_on_begin() {
        let mut status = Status::default();
        status.begin();
        assert!(status.loading());
        let result: ClientResult<()> = Err(ClientError::NoRefreshToken);
        assert!(status.finish(result).is_err());
        assert!(!status.loading());
        assert_eq!(status.error(), Some("No refresh token available"));
        status.begin();
        assert_eq!(status.error(), None);
    }
}
