mod support;

use std::collections::HashMap;

use axum::Json;
use axum::Router;
use axum::extract::{Path, Query};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use serde_json::{Value, json};

use gstbill_client::ClientError;
use gstbill_client::api::InvoiceFilter;
use gstbill_core::{CustomerId, DomainError, InvoiceId, InvoiceItemId};
use gstbill_invoicing::{InvoiceItemPayload, InvoicePayload, InvoiceStatus};

use support::{Calls, Harness, invoice_json, item_json, new_id};

fn laptop_item() -> InvoiceItemPayload {
    InvoiceItemPayload {
        product_id: None,
        description: "Laptop".into(),
        hsn_sac: Some("8471".into()),
        quantity: dec!(2),
        unit: Some("NOS".into()),
        unit_price: dec!(1000),
        discount: dec!(0),
        gst_rate: dec!(18),
    }
}

#[tokio::test]
async fn list_filter_goes_into_the_query() {
    let app = Router::new().route(
        "/api/billing/invoices/",
        get(|Query(q): Query<HashMap<String, String>>| async move {
            assert_eq!(q.get("status").map(String::as_str), Some("DRAFT"));
            assert!(!q.contains_key("customer_id"));
            Json(json!([
                invoice_json(&new_id(), "DRAFT", vec![]),
                invoice_json(&new_id(), "DRAFT", vec![item_json(&new_id())]),
            ]))
        }),
    );
    let h = Harness::signed_in(app, "token", None).await;
    let mut stores = h.stores();

    let filter = InvoiceFilter {
        status: Some(InvoiceStatus::Draft),
        ..Default::default()
    };
    stores.invoices.fetch_all(&filter).await.unwrap();

    assert_eq!(stores.invoices.invoices().len(), 2);
    assert_eq!(stores.invoices.drafts().count(), 2);
    assert_eq!(stores.invoices.finals().count(), 0);
}

#[tokio::test]
async fn created_draft_goes_first_and_becomes_current() {
    let existing = new_id();
    let created = new_id();
    let list = json!([invoice_json(&existing, "FINAL", vec![item_json(&new_id())])]);
    let created_for_handler = created.clone();
    let app = Router::new().route(
        "/api/billing/invoices/",
        get(move || {
            let list = list.clone();
            async move { Json(list) }
        })
        .post(move |Json(body): Json<Value>| {
            let id = created_for_handler.clone();
            async move {
                assert_eq!(body["invoice_date"], "2024-03-05");
                assert_eq!(body["place_of_supply"], "27");
                assert!(body.get("items").is_none());
                Json(invoice_json(&id, "DRAFT", vec![]))
            }
        }),
    );
    let h = Harness::signed_in(app, "token", None).await;
    let mut stores = h.stores();
    stores.invoices.fetch_all(&InvoiceFilter::default()).await.unwrap();

    let customer: CustomerId = "01890a5d-ac96-774b-bcce-b302099a8057".parse().unwrap();
    let mut payload = InvoicePayload::new(customer, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    payload.place_of_supply = Some("27".into());
    let invoice = stores.invoices.create(&payload).await.unwrap();

    assert_eq!(invoice.id.to_string(), created);
    assert_eq!(stores.invoices.invoices()[0].id, invoice.id);
    assert_eq!(stores.invoices.invoices()[1].id.to_string(), existing);
    assert_eq!(stores.invoices.current().map(|i| i.id), Some(invoice.id));
    assert!(stores.invoices.is_current_editable());
    assert!(invoice.label().starts_with("Draft "));
}

#[tokio::test]
async fn final_invoice_is_locked_without_asking_the_backend() {
    let calls = Calls::default();
    let id = new_id();
    let fixture = invoice_json(&id, "FINAL", vec![item_json(&new_id())]);
    let (c1, c2) = (calls.clone(), calls.clone());
    let app = Router::new()
        .route(
            "/api/billing/invoices/:id",
            get(move || {
                let fixture = fixture.clone();
                async move { Json(fixture) }
            }),
        )
        .route(
            "/api/billing/invoices/:id/items",
            post(move || {
                let c = c1.clone();
                async move {
                    c.hit();
                    Json(json!({}))
                }
            }),
        )
        .route(
            "/api/billing/invoices/:id/finalize",
            post(move || {
                let c = c2.clone();
                async move {
                    c.hit();
                    Json(json!({}))
                }
            }),
        );
    let h = Harness::signed_in(app, "token", None).await;
    let mut stores = h.stores();

    let invoice_id: InvoiceId = id.parse().unwrap();
    stores.invoices.fetch(invoice_id).await.unwrap();
    assert!(!stores.invoices.is_current_editable());

    let err = stores
        .invoices
        .add_item(invoice_id, &laptop_item())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Domain(DomainError::Conflict(_))));
    assert!(err.to_string().contains("INV-2024-0001"));
    assert!(stores.invoices.status().error().is_some());

    let err = stores.invoices.finalize(invoice_id).await.unwrap_err();
    assert!(matches!(err, ClientError::Domain(DomainError::Conflict(_))));

    assert_eq!(calls.count(), 0);
}

#[tokio::test]
async fn empty_draft_cannot_be_finalized() {
    let id = new_id();
    let fixture = invoice_json(&id, "DRAFT", vec![]);
    let app = Router::new().route(
        "/api/billing/invoices/:id",
        get(move || {
            let fixture = fixture.clone();
            async move { Json(fixture) }
        }),
    );
    let h = Harness::signed_in(app, "token", None).await;
    let mut stores = h.stores();

    let invoice_id: InvoiceId = id.parse().unwrap();
    stores.invoices.fetch(invoice_id).await.unwrap();
    let err = stores.invoices.finalize(invoice_id).await.unwrap_err();

    match err {
        ClientError::Domain(DomainError::Validation(fields)) => {
            assert!(fields.get("items").is_some());
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn adding_an_item_replaces_current_with_the_returned_copy() {
    let id = new_id();
    let app = Router::new().route(
        "/api/billing/invoices/:id/items",
        post(|Path(id): Path<String>, Json(body): Json<Value>| async move {
            assert_eq!(body["description"], "Laptop");
            assert_eq!(body["gst_rate"], "18");
            Json(invoice_json(&id, "DRAFT", vec![item_json(&new_id())]))
        }),
    );
    let h = Harness::signed_in(app, "token", None).await;
    let mut stores = h.stores();

    let invoice_id: InvoiceId = id.parse().unwrap();
    let invoice = stores.invoices.add_item(invoice_id, &laptop_item()).await.unwrap();

    assert_eq!(invoice.items.len(), 1);
    assert_eq!(invoice.grand_total, dec!(2360));
    let current = stores.invoices.current().unwrap();
    assert_eq!(current.items[0].cgst_amount, dec!(180));
    assert_eq!(current.items[0].igst_amount, dec!(0));
}

#[tokio::test]
async fn removing_an_item_reloads_when_the_backend_sends_no_body() {
    let id = new_id();
    let item = new_id();
    let fetches = Calls::default();
    let counter = fetches.clone();
    let list = json!([invoice_json(&id, "DRAFT", vec![item_json(&item)])]);
    let app = Router::new()
        .route(
            "/api/billing/invoices/",
            get(move || {
                let list = list.clone();
                async move { Json(list) }
            }),
        )
        .route(
            "/api/billing/invoices/:id/items/:item_id",
            delete(|| async { StatusCode::NO_CONTENT }),
        )
        .route(
            "/api/billing/invoices/:id",
            get(move |Path(id): Path<String>| {
                let counter = counter.clone();
                async move {
                    counter.hit();
                    Json(invoice_json(&id, "DRAFT", vec![]))
                }
            }),
        );
    let h = Harness::signed_in(app, "token", None).await;
    let mut stores = h.stores();
    stores.invoices.fetch_all(&InvoiceFilter::default()).await.unwrap();
    assert_eq!(stores.invoices.invoices()[0].items.len(), 1);

    let invoice_id: InvoiceId = id.parse().unwrap();
    let item_id: InvoiceItemId = item.parse().unwrap();
    let invoice = stores.invoices.remove_item(invoice_id, item_id).await.unwrap();

    assert!(invoice.items.is_empty());
    assert_eq!(invoice.grand_total, dec!(0));
    assert_eq!(fetches.count(), 1);
    assert_eq!(stores.invoices.current().map(|i| i.id), Some(invoice_id));
    assert!(stores.invoices.invoices()[0].items.is_empty());
    assert_eq!(stores.invoices.status().error(), None);
    assert!(!stores.invoices.status().loading());
}

#[tokio::test]
async fn removing_an_item_uses_the_returned_invoice() {
    let id = new_id();
    let fetches = Calls::default();
    let counter = fetches.clone();
    let app = Router::new()
        .route(
            "/api/billing/invoices/:id/items/:item_id",
            delete(|Path((id, _item)): Path<(String, String)>| async move {
                Json(invoice_json(&id, "DRAFT", vec![]))
            }),
        )
        .route(
            "/api/billing/invoices/:id",
            get(move || {
                let counter = counter.clone();
                async move {
                    counter.hit();
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }),
        );
    let h = Harness::signed_in(app, "token", None).await;
    let mut stores = h.stores();

    let invoice_id: InvoiceId = id.parse().unwrap();
    let invoice = stores
        .invoices
        .remove_item(invoice_id, InvoiceItemId::new())
        .await
        .unwrap();

    assert!(invoice.items.is_empty());
    assert_eq!(fetches.count(), 0);
}

#[tokio::test]
async fn calculating_tax_reloads_the_invoice() {
    let id = new_id();
    let fetches = Calls::default();
    let counter = fetches.clone();
    let expected_id = id.clone();
    let app = Router::new()
        .route(
            "/api/tax/calculate",
            post(move |Json(body): Json<Value>| {
                let expected = expected_id.clone();
                async move {
                    assert_eq!(body, json!({"invoice_id": expected}));
                    Json(json!({
                        "invoice_id": expected,
                        "subtotal": "2000.00",
                        "cgst_amount": "180.00",
                        "sgst_amount": "180.00",
                        "igst_amount": "0",
                        "total_tax": "360.00",
                        "grand_total": "2360.00",
                        "is_inter_state": false,
                    }))
                }
            }),
        )
        .route(
            "/api/billing/invoices/:id",
            get(move |Path(id): Path<String>| {
                let counter = counter.clone();
                async move {
                    counter.hit();
                    Json(invoice_json(&id, "DRAFT", vec![item_json(&new_id())]))
                }
            }),
        );
    let h = Harness::signed_in(app, "token", None).await;
    let mut stores = h.stores();

    let invoice_id: InvoiceId = id.parse().unwrap();
    let calculation = stores.invoices.calculate_tax(invoice_id).await.unwrap();

    assert_eq!(calculation.taxable_amount, dec!(2000));
    assert_eq!(calculation.total_tax, dec!(360));
    assert!(!calculation.is_inter_state);
    assert_eq!(fetches.count(), 1);
    assert_eq!(stores.invoices.current().map(|i| i.grand_total), Some(dec!(2360)));
    assert!(!stores.invoices.status().loading());
}

#[tokio::test]
async fn finalizing_updates_the_list_and_current() {
    let id = new_id();
    let other = new_id();
    let draft = invoice_json(&id, "DRAFT", vec![item_json(&new_id())]);
    let list = json!([draft.clone(), invoice_json(&other, "DRAFT", vec![])]);
    let app = Router::new()
        .route(
            "/api/billing/invoices/",
            get(move || {
                let list = list.clone();
                async move { Json(list) }
            }),
        )
        .route(
            "/api/billing/invoices/:id",
            get(move || {
                let draft = draft.clone();
                async move { Json(draft) }
            }),
        )
        .route(
            "/api/billing/invoices/:id/finalize",
            post(|Path(id): Path<String>| async move {
                Json(invoice_json(&id, "FINAL", vec![item_json(&new_id())]))
            }),
        );
    let h = Harness::signed_in(app, "token", None).await;
    let mut stores = h.stores();

    let invoice_id: InvoiceId = id.parse().unwrap();
    stores.invoices.fetch_all(&InvoiceFilter::default()).await.unwrap();
    stores.invoices.fetch(invoice_id).await.unwrap();

    let finalized = stores.invoices.finalize(invoice_id).await.unwrap();

    assert_eq!(finalized.status, InvoiceStatus::Final);
    assert_eq!(finalized.label(), "INV-2024-0001");
    assert_eq!(stores.invoices.finals().count(), 1);
    assert_eq!(stores.invoices.drafts().count(), 1);
    assert!(!stores.invoices.is_current_editable());
    let untouched = stores
        .invoices
        .invoices()
        .iter()
        .find(|i| i.id.to_string() == other)
        .unwrap();
    assert_eq!(untouched.status, InvoiceStatus::Draft);
}

#[tokio::test]
async fn preview_splits_tax_and_spells_the_amount() {
    let id = new_id();
    let app = Router::new().route(
        "/api/documents/invoices/:id/preview",
        get(|Path(id): Path<String>| async move {
            Json(json!({
                "invoice_id": id,
                "invoice_number": "INV-2024-0001",
                "invoice_date": "2024-03-05",
                "status": "FINAL",
                "place_of_supply": "27",
                "company": {"legal_name": "Acme Traders", "gstin": "27AAPFU0939F1ZV"},
                "customer": {"name": "Globex Retail", "billing_address": "MG Road, Pune"},
                "items": [{
                    "description": "Cement",
                    "quantity": "1",
                    "unit_price": "947.46",
                    "taxable_value": "947.46",
                    "gst_rate": "18",
                    "total": "1118.00",
                }],
                "taxes": [{"tax_type": "CGST+SGST", "rate": "18", "amount": "170.54"}],
                "taxable_amount": "947.46",
                "total_tax": "170.54",
                "grand_total": "1118.00",
            }))
        }),
    );
    let h = Harness::signed_in(app, "token", None).await;
    let mut stores = h.stores();

    let invoice_id: InvoiceId = id.parse().unwrap();
    let preview = stores.invoices.fetch_preview(invoice_id).await.unwrap();

    assert_eq!(preview.seller.name, "Acme Traders");
    assert_eq!(preview.buyer.address.as_deref(), Some("MG Road, Pune"));
    let breakdown = preview.tax_breakdown();
    assert_eq!(breakdown.cgst.rate, Some(dec!(9)));
    assert_eq!(breakdown.cgst.amount + breakdown.sgst.amount, dec!(170.54));
    assert_eq!(breakdown.igst.amount, dec!(0));
    assert!(!breakdown.is_inter_state());
    assert_eq!(
        preview.amount_in_words(),
        "One Thousand One Hundred Eighteen Rupees Only"
    );
    assert!(stores.invoices.preview().is_some());
}

#[tokio::test]
async fn pdf_filename_comes_from_the_response_header() {
    let named = new_id();
    let unnamed = new_id();
    let named_for_handler = named.clone();
    let app = Router::new().route(
        "/api/documents/invoices/:id/pdf",
        get(move |Path(id): Path<String>| {
            let named = named_for_handler.clone();
            async move {
                let body = b"%PDF-1.7 fake".to_vec();
                if id == named {
                    (
                        [
                            (header::CONTENT_TYPE, "application/pdf"),
                            (
                                header::CONTENT_DISPOSITION,
                                r#"attachment; filename="INV-2024-0001.pdf""#,
                            ),
                        ],
                        body,
                    )
                        .into_response()
                } else {
                    ([(header::CONTENT_TYPE, "application/pdf")], body).into_response()
                }
            }
        }),
    );
    let h = Harness::signed_in(app, "token", None).await;
    let mut stores = h.stores();

    let doc = stores
        .invoices
        .download_pdf(named.parse().unwrap())
        .await
        .unwrap();
    assert_eq!(doc.filename, "INV-2024-0001.pdf");
    assert!(doc.bytes.starts_with(b"%PDF"));

    let doc = stores
        .invoices
        .download_pdf(unnamed.parse().unwrap())
        .await
        .unwrap();
    assert_eq!(doc.filename, format!("invoice-{unnamed}.pdf"));
    assert!(!stores.invoices.status().loading());
}
