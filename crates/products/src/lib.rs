//! Products domain module: the product/service master.
//!
//! Records mirror the backend's JSON; payloads carry local validation that
//! runs before any request is issued (no IO, no HTTP, no storage).

pub mod product;

pub use product::{GST_RATES, Product, ProductPayload, Unit, is_allowed_gst_rate};
