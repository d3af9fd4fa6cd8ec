//! `gstbill-client`
//!
//! **Responsibility:** the GST billing client: HTTP plumbing, one API façade
//! per REST resource, one state store per resource, session persistence and
//! the route table with its authentication gate.
//!
//! The backend is the authority on every record. The client validates input
//! locally, calls one endpoint per action and keeps the returned copy.

pub mod api;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod forms;
pub mod http;
pub mod notify;
pub mod router;
pub mod storage;
pub mod stores;

#[cfg(target_arch = "wasm32")]
pub mod frontend;

pub use config::ClientConfig;
pub use connectivity::{Connectivity, ConnectivityState};
pub use error::{ApiError, ClientError, ClientResult};
pub use http::ApiClient;
pub use notify::{Notifier, Toast, ToastLevel, ToastLog, TracingNotifier};
pub use router::{Navigation, Route};
pub use storage::{MemoryStorage, SessionStorage};
pub use stores::Stores;

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
