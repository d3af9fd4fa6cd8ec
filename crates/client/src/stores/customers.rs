use gstbill_core::CustomerId;
use gstbill_parties::{Customer, CustomerPayload, CustomerType};

use super::{Status, replace_by_id};
use crate::api::{CustomersApi, ListParams};
use crate::error::ClientResult;

#[derive(Debug)]
pub struct CustomersStore {
    api: CustomersApi,
    customers: Vec<Customer>,
    status: Status,
}

impl CustomersStore {
    pub fn new(api: CustomersApi) -> Self {
        Self {
            api,
            customers: Vec::new(),
            status: Status::default(),
        }
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn active(&self) -> impl Iterator<Item = &Customer> {
        self.customers.iter().filter(|c| c.is_active)
    }

    pub fn of_type(&self, customer_type: CustomerType) -> impl Iterator<Item = &Customer> {
        self.customers
            .iter()
            .filter(move |c| c.customer_type == customer_type)
    }

    pub fn business(&self) -> impl Iterator<Item = &Customer> {
        self.of_type(CustomerType::Business)
    }

    pub fn consumers(&self) -> impl Iterator<Item = &Customer> {
        self.of_type(CustomerType::Consumer)
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn get_by_id(&self, id: CustomerId) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    /// Load the list. On failure the list is emptied.
    pub async fn fetch(&mut self, params: &ListParams) -> ClientResult<()> {
        self.status.begin();
        let result = match self.api.list(params).await {
            Ok(customers) => {
                self.customers = customers;
                Ok(())
            }
            Err(err) => {
                self.customers.clear();
                Err(err)
            }
        };
        self.status.finish(result)
    }

    pub async fn create(&mut self, payload: &CustomerPayload) -> ClientResult<Customer> {
        self.status.begin();
        let payload = payload.clone().normalized();
        let result = match payload.validate() {
            Ok(()) => self.api.create(&payload).await,
            Err(err) => Err(err.into()),
        };
        if let Ok(customer) = &result {
            self.customers.push(customer.clone());
        }
        self.status.finish(result)
    }

    pub async fn update(
        &mut self,
        id: CustomerId,
        payload: &CustomerPayload,
    ) -> ClientResult<Customer> {
        self.status.begin();
        let payload = payload.clone().normalized();
        let result = match payload.validate() {
            Ok(()) => self.api.update(id, &payload).await,
            Err(err) => Err(err.into()),
        };
        if let Ok(customer) = &result {
            replace_by_id(&mut self.customers, customer);
        }
        self.status.finish(result)
    }

    /// Soft delete (`false`) or restore (`true`).
    pub async fn set_status(&mut self, id: CustomerId, is_active: bool) -> ClientResult<Customer> {
        self.status.begin();
        let result = self.api.set_status(id, is_active).await;
        if let Ok(customer) = &result {
            replace_by_id(&mut self.customers, customer);
        }
        self.status.finish(result)
    }
}
