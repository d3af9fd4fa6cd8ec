use serde::Serialize;

use gstbill_core::{CustomerId, InvoiceId, InvoiceItemId};
use gstbill_invoicing::{
    Invoice, InvoiceItemPayload, InvoicePayload, InvoicePreview, InvoiceStatus, TaxCalculation,
};

use crate::error::{ClientError, ClientResult};
use crate::http::ApiClient;

/// Query for `GET /billing/invoices/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InvoiceFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<InvoiceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<CustomerId>,
}

#[derive(Debug, Serialize)]
struct TaxRequest {
    invoice_id: InvoiceId,
}

/// A rendered invoice PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct InvoicesApi {
    client: ApiClient,
}

impl InvoicesApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, filter: &InvoiceFilter) -> ClientResult<Vec<Invoice>> {
        self.client
            .get_with_query("/billing/invoices/", filter)
            .await
    }

    pub async fn get(&self, id: InvoiceId) -> ClientResult<Invoice> {
        self.client.get(&format!("/billing/invoices/{id}")).await
    }

    pub async fn create(&self, payload: &InvoicePayload) -> ClientResult<Invoice> {
        self.client.post("/billing/invoices/", payload).await
    }

    pub async fn update(&self, id: InvoiceId, payload: &InvoicePayload) -> ClientResult<Invoice> {
        self.client
            .put(&format!("/billing/invoices/{id}"), payload)
            .await
    }

    pub async fn add_item(
        &self,
        id: InvoiceId,
        item: &InvoiceItemPayload,
    ) -> ClientResult<Invoice> {
        self.client
            .post(&format!("/billing/invoices/{id}/items"), item)
            .await
    }

    pub async fn update_item(
        &self,
        id: InvoiceId,
        item_id: InvoiceItemId,
        item: &InvoiceItemPayload,
    ) -> ClientResult<Invoice> {
        self.client
            .put(&format!("/billing/invoices/{id}/items/{item_id}"), item)
            .await
    }

    /// `None` when the backend answers 204 without the updated invoice.
    pub async fn remove_item(
        &self,
        id: InvoiceId,
        item_id: InvoiceItemId,
    ) -> ClientResult<Option<Invoice>> {
        self.client
            .delete(&format!("/billing/invoices/{id}/items/{item_id}"))
            .await
    }

    /// Ask the backend to (re)compute GST for a draft.
    pub async fn calculate_tax(&self, id: InvoiceId) -> ClientResult<TaxCalculation> {
        self.client
            .post("/tax/calculate", &TaxRequest { invoice_id: id })
            .await
    }

    pub async fn finalize(&self, id: InvoiceId) -> ClientResult<Invoice> {
        self.client
            .post_empty(&format!("/billing/invoices/{id}/finalize"))
            .await
    }

    pub async fn preview(&self, id: InvoiceId) -> ClientResult<InvoicePreview> {
        self.client
            .get(&format!("/documents/invoices/{id}/preview"))
            .await
    }

    pub async fn download_pdf(&self, id: InvoiceId) -> ClientResult<PdfDocument> {
        let resp = self
            .client
            .get_raw(&format!("/documents/invoices/{id}/pdf"))
            .await?;
        let disposition = resp
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;

        Ok(PdfDocument {
            filename: pdf_filename(disposition.as_deref(), id),
            bytes: bytes.to_vec(),
        })
    }
}

/// Filename from a `Content-Disposition` header, falling back to
/// `invoice-<id>.pdf`.
///
/// `filename*=` (RFC 5987, percent-encoded) is preferred over `filename=`.
/// Path separators are stripped so the name is safe to write as-is.
pub fn pdf_filename(content_disposition: Option<&str>, id: InvoiceId) -> String {
    let fallback = || format!("invoice-{id}.pdf");
    let Some(header) = content_disposition else {
        return fallback();
    };

    let mut plain = None;
    let mut extended = None;
    for part in split_params(header) {
        let Some((key, value)) = part.split_once('=') else {
            continue;
        };
        match key.trim().to_ascii_lowercase().as_str() {
            "filename*" => {
                // charset'language'percent-encoded-name
                let encoded = value.trim().rsplit('\'').next().unwrap_or_default();
                extended = urlencoding::decode(encoded).ok().map(|s| s.into_owned());
            }
            "filename" => plain = Some(unquote(value)),
            _ => {}
        }
    }

    extended
        .or(plain)
        .map(|name| {
            name.rsplit(['/', '\\'])
                .next()
                .unwrap_or_default()
                .trim()
                .to_string()
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(fallback)
}

/// Split header parameters on `;`, leaving quoted strings intact.
fn split_params(header: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let (mut start, mut quoted, mut escaped) = (0, false, false);
    for (i, c) in header.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            ';' if !quoted => {
                parts.push(&header[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&header[start..]);
    parts
}

fn unquote(value: &str) -> String {
    let value = value.trim();
    let Some(inner) = value.strip_prefix('"') else {
        return value.to_string();
    };
    let inner = inner.strip_suffix('"').unwrap_or(inner);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.extend(chars.next()),
            c => out.push(c),
        }
    }
    out
}
