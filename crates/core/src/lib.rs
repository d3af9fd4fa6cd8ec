//! `gstbill-core`: domain foundation building blocks.
//!
//! This crate contains **pure** primitives shared by every other crate:
//! identifiers, the domain error model, GSTIN handling, field validators and
//! display formatters. No I/O happens here.

pub mod entity;
pub mod error;
pub mod formatters;
pub mod gstin;
pub mod id;
pub mod states;
pub mod validators;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult, FieldErrors};
pub use gstin::Gstin;
pub use id::{CompanyId, CustomerId, InvoiceId, InvoiceItemId, ProductId, UserId};
pub use value_object::ValueObject;
