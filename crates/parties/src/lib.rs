//! Parties domain module: the seller company and its customers.
//!
//! Records mirror the backend's JSON; payloads carry local validation that
//! runs before any request is issued (no IO, no HTTP, no storage).

pub mod company;
pub mod customer;

pub use company::{Company, CompanyPayload};
pub use customer::{Customer, CustomerPayload, CustomerType};
