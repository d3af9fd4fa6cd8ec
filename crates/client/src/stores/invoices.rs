use gstbill_core::{DomainError, InvoiceId, InvoiceItemId};
use gstbill_invoicing::{
    Invoice, InvoiceItemPayload, InvoicePayload, InvoicePreview, InvoiceStatus, TaxCalculation,
};

use super::{Status, replace_by_id};
use crate::api::{InvoiceFilter, InvoicesApi, PdfDocument};
use crate::error::ClientResult;

/// Invoices, the one being edited, and its document preview.
///
/// Mutations of an invoice this store already knows to be `FINAL` fail
/// locally, before any request is made.
#[derive(Debug)]
pub struct InvoicesStore {
    api: InvoicesApi,
    invoices: Vec<Invoice>,
    current: Option<Invoice>,
    preview: Option<InvoicePreview>,
    status: Status,
}

impl InvoicesStore {
    pub fn new(api: InvoicesApi) -> Self {
        Self {
            api,
            invoices: Vec::new(),
            current: None,
            preview: None,
            status: Status::default(),
        }
    }

    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    pub fn current(&self) -> Option<&Invoice> {
        self.current.as_ref()
    }

    pub fn preview(&self) -> Option<&InvoicePreview> {
        self.preview.as_ref()
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn drafts(&self) -> impl Iterator<Item = &Invoice> {
        self.invoices
            .iter()
            .filter(|i| i.status == InvoiceStatus::Draft)
    }

    pub fn finals(&self) -> impl Iterator<Item = &Invoice> {
        self.invoices
            .iter()
            .filter(|i| i.status == InvoiceStatus::Final)
    }

    pub fn is_current_editable(&self) -> bool {
        self.current.as_ref().is_some_and(Invoice::is_editable)
    }

    /// Most complete local copy of an invoice: `current` when it matches,
    /// else the list entry.
    fn known(&self, id: InvoiceId) -> Option<&Invoice> {
        self.current
            .as_ref()
            .filter(|i| i.id == id)
            .or_else(|| self.invoices.iter().find(|i| i.id == id))
    }

    fn guard_editable(&self, id: InvoiceId) -> ClientResult<()> {
        match self.known(id) {
            Some(invoice) => Ok(invoice.ensure_editable()?),
            None => Ok(()),
        }
    }

    fn guard_finalizable(&self, id: InvoiceId) -> ClientResult<()> {
        match (self.current.as_ref().filter(|i| i.id == id), self.known(id)) {
            // Only the fully loaded record has its items.
            (Some(current), _) => Ok(current.check_finalizable()?),
            (None, Some(listed)) if listed.status == InvoiceStatus::Final => {
                Err(DomainError::conflict(format!(
                    "invoice {} is already finalized",
                    listed.label()
                ))
                .into())
            }
            _ => Ok(()),
        }
    }

    /// Keep the list entry and `current` in step with a returned copy.
    fn absorb(&mut self, invoice: &Invoice) {
        replace_by_id(&mut self.invoices, invoice);
        self.current = Some(invoice.clone());
    }

    /// Load the list. On failure the list is emptied.
    pub async fn fetch_all(&mut self, filter: &InvoiceFilter) -> ClientResult<()> {
        self.status.begin();
        let result = match self.api.list(filter).await {
            Ok(invoices) => {
                self.invoices = invoices;
                Ok(())
            }
            Err(err) => {
                self.invoices.clear();
                Err(err)
            }
        };
        self.status.finish(result)
    }

    /// Load one invoice as `current`.
    pub async fn fetch(&mut self, id: InvoiceId) -> ClientResult<Invoice> {
        self.status.begin();
        let result = self.api.get(id).await;
        if let Ok(invoice) = &result {
            self.current = Some(invoice.clone());
        }
        self.status.finish(result)
    }

    /// Create a draft; it goes to the top of the list and becomes `current`.
    pub async fn create(&mut self, payload: &InvoicePayload) -> ClientResult<Invoice> {
        self.status.begin();
        let result = match payload.validate() {
            Ok(()) => self.api.create(payload).await,
            Err(err) => Err(err.into()),
        };
        if let Ok(invoice) = &result {
            tracing::info!(invoice = %invoice.label(), "invoice created");
            self.invoices.insert(0, invoice.clone());
            self.current = Some(invoice.clone());
        }
        self.status.finish(result)
    }

    pub async fn update(&mut self, id: InvoiceId, payload: &InvoicePayload) -> ClientResult<Invoice> {
        self.status.begin();
        let result = match self
            .guard_editable(id)
            .and_then(|()| payload.validate().map_err(Into::into))
        {
            Ok(()) => self.api.update(id, payload).await,
            Err(err) => Err(err),
        };
        if let Ok(invoice) = &result {
            self.absorb(invoice);
        }
        self.status.finish(result)
    }

    pub async fn add_item(&mut self, id: InvoiceId, item: &InvoiceItemPayload) -> ClientResult<Invoice> {
        self.status.begin();
        let result = match self
            .guard_editable(id)
            .and_then(|()| item.validate().map_err(Into::into))
        {
            Ok(()) => self.api.add_item(id, item).await,
            Err(err) => Err(err),
        };
        if let Ok(invoice) = &result {
            self.absorb(invoice);
        }
        self.status.finish(result)
    }

    pub async fn update_item(
        &mut self,
        id: InvoiceId,
        item_id: InvoiceItemId,
        item: &InvoiceItemPayload,
    ) -> ClientResult<Invoice> {
        self.status.begin();
        let result = match self
            .guard_editable(id)
            .and_then(|()| item.validate().map_err(Into::into))
        {
            Ok(()) => self.api.update_item(id, item_id, item).await,
            Err(err) => Err(err),
        };
        if let Ok(invoice) = &result {
            self.current = Some(invoice.clone());
        }
        self.status.finish(result)
    }

    /// Remove one line. A backend that answers with no body gets the invoice
    /// reloaded instead.
    pub async fn remove_item(&mut self, id: InvoiceId, item_id: InvoiceItemId) -> ClientResult<Invoice> {
        self.status.begin();
        let result = match self.guard_editable(id) {
            Ok(()) => self.api.remove_item(id, item_id).await,
            Err(err) => Err(err),
        };
        let result = match result {
            Ok(Some(invoice)) => {
                self.absorb(&invoice);
                Ok(invoice)
            }
            Ok(None) => {
                tracing::debug!(invoice = %id, "item removal returned no body; reloading");
                let reloaded = self.fetch(id).await;
                if let Ok(invoice) = &reloaded {
                    self.absorb(invoice);
                }
                reloaded
            }
            Err(err) => Err(err),
        };
        self.status.finish(result)
    }

    /// Have the backend recompute GST, then reload the invoice so `current`
    /// carries the new totals.
    pub async fn calculate_tax(&mut self, id: InvoiceId) -> ClientResult<TaxCalculation> {
        self.status.begin();
        let result = match self.guard_editable(id) {
            Ok(()) => self.api.calculate_tax(id).await,
            Err(err) => Err(err),
        };
        let result = match result {
            Ok(calculation) => self.fetch(id).await.map(|_| calculation),
            Err(err) => Err(err),
        };
        self.status.finish(result)
    }

    /// Irreversible `DRAFT → FINAL`.
    pub async fn finalize(&mut self, id: InvoiceId) -> ClientResult<Invoice> {
        self.status.begin();
        let result = match self.guard_finalizable(id) {
            Ok(()) => self.api.finalize(id).await,
            Err(err) => Err(err),
        };
        if let Ok(invoice) = &result {
            tracing::info!(invoice = %invoice.label(), "invoice finalized");
            self.absorb(invoice);
        }
        self.status.finish(result)
    }

    pub async fn fetch_preview(&mut self, id: InvoiceId) -> ClientResult<&InvoicePreview> {
        self.status.begin();
        let result = self.api.preview(id).await;
        let result = match result {
            Ok(preview) => {
                self.preview = Some(preview);
                Ok(())
            }
            Err(err) => Err(err),
        };
        self.status.finish(result)?;
        self.preview
            .as_ref()
            .ok_or_else(|| DomainError::not_found().into())
    }

    /// Fetch the PDF. Does not touch `loading`.
    pub async fn download_pdf(&mut self, id: InvoiceId) -> ClientResult<PdfDocument> {
        let result = self.api.download_pdf(id).await;
        if let Err(err) = &result {
            self.status.fail(err.to_string());
        }
        result
    }

    pub fn clear_current(&mut self) {
        self.current = None;
        self.preview = None;
    }
}
