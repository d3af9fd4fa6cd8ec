//! Invoicing domain module: invoice records, the draft/final lifecycle and
//! GST tax derivation.
//!
//! Everything here is deterministic arithmetic over already-fetched data (no
//! IO, no HTTP, no storage). The backend stays the authority on persisted
//! totals; these helpers drive previews and local guards.

pub mod invoice;
pub mod preview;
pub mod tax;

pub use invoice::{
    Invoice, InvoiceItem, InvoiceItemPayload, InvoicePayload, InvoiceStatus, TaxCalculation,
};
pub use preview::{InvoicePreview, PartySummary, PreviewItem, TaxBreakdown, TaxComponent, TaxLine};
pub use tax::{InvoiceTotals, LineTax, SupplyKind, compute_line, round_money, split_intra_state};
