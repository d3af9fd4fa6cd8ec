#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::{Value, json};

use gstbill_client::storage::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use gstbill_client::{ApiClient, ClientConfig, MemoryStorage, SessionStorage, Stores, ToastLog};

pub struct TestServer {
    pub base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Serve `app` on an ephemeral port.
    pub async fn spawn(app: Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A fake backend plus a client pointed at its `/api` prefix.
pub struct Harness {
    pub server: TestServer,
    pub client: ApiClient,
    pub storage: Arc<MemoryStorage>,
    pub toasts: Arc<ToastLog>,
}

impl Harness {
    pub async fn start(app: Router) -> Self {
        let server = TestServer::spawn(app).await;
        let storage = Arc::new(MemoryStorage::new());
        let toasts = Arc::new(ToastLog::new());
        let config = ClientConfig::default().with_base_url(format!("{}/api", server.base_url));
        let client = ApiClient::new(config, storage.clone(), toasts.clone())
            .expect("failed to build client");
        Self {
            server,
            client,
            storage,
            toasts,
        }
    }

    /// Start with a stored session, as if a previous run had logged in.
    pub async fn signed_in(app: Router, access: &str, refresh: Option<&str>) -> Self {
        let harness = Self::start(app).await;
        harness.storage.set(ACCESS_TOKEN_KEY, access).unwrap();
        if let Some(refresh) = refresh {
            harness.storage.set(REFRESH_TOKEN_KEY, refresh).unwrap();
        }
        harness
    }

    pub fn stores(&self) -> Stores {
        Stores::new(&self.client)
    }
}

/// Shared request counter for handlers.
#[derive(Clone, Default)]
pub struct Calls(Arc<AtomicUsize>);

impl Calls {
    pub fn hit(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Unsigned JWT-shaped token expiring at `exp` (unix seconds).
pub fn jwt(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(json!({"sub": "user-1", "exp": exp}).to_string());
    format!("{header}.{payload}.signature")
}

pub fn user_json(email: &str) -> Value {
    json!({
        "id": uuid::Uuid::now_v7(),
        "email": email,
        "full_name": "Asha Rao",
        "is_active": true,
        "is_superuser": false,
    })
}

pub fn product_json(id: &str, name: &str, is_active: bool) -> Value {
    json!({
        "id": id,
        "name": name,
        "hsn_sac": "8471",
        "unit": "NOS",
        "gst_rate": "18",
        "price": "1000.00",
        "is_active": is_active,
    })
}

pub fn customer_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "gstin": "29AABCU9603R1ZM",
        "customer_type": "B2B",
        "state_code": "29",
        "is_active": true,
    })
}

pub fn item_json(id: &str) -> Value {
    json!({
        "id": id,
        "description": "Laptop",
        "hsn_sac": "8471",
        "quantity": "2",
        "unit": "NOS",
        "unit_price": "1000.00",
        "gst_rate": "18",
        "taxable_value": "2000.00",
        "cgst_amount": "180.00",
        "sgst_amount": "180.00",
        "igst_amount": "0",
        "total": "2360.00",
    })
}

pub fn invoice_json(id: &str, status: &str, items: Vec<Value>) -> Value {
    let with_items = !items.is_empty();
    json!({
        "id": id,
        "invoice_number": if status == "FINAL" { json!("INV-2024-0001") } else { Value::Null },
        "invoice_date": "2024-03-05",
        "customer_id": "01890a5d-ac96-774b-bcce-b302099a8057",
        "customer_name": "Globex Retail",
        "place_of_supply": "27",
        "status": status,
        "items": items,
        "subtotal": if with_items { "2000.00" } else { "0" },
        "cgst_amount": if with_items { "180.00" } else { "0" },
        "sgst_amount": if with_items { "180.00" } else { "0" },
        "igst_amount": "0",
        "total_tax": if with_items { "360.00" } else { "0" },
        "grand_total": if with_items { "2360.00" } else { "0" },
    })
}

pub fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}
