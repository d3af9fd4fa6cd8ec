//! Leptos frontend for the browser build.

pub mod app;

use std::sync::Arc;

use leptos::*;
use wasm_bindgen::prelude::*;

use app::App;

use crate::notify::{Notifier, Toast, ToastLevel};
use crate::storage::BrowserStorage;
use crate::{ApiClient, ClientConfig};

/// Shows error toasts with `window.alert`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlertNotifier;

impl Notifier for AlertNotifier {
    fn notify(&self, toast: Toast) {
        if toast.level != ToastLevel::Error {
            return;
        }
        if let Some(w) = web_sys::window() {
            let _ = w.alert_with_message(&toast.message);
        }
    }
}

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    let origin = web_sys::window().and_then(|w| w.location().origin().ok());
    let config = ClientConfig::for_browser(origin.as_deref(), option_env!("GSTBILL_API_BASE_URL"));
    logging::log!("API base URL: {}", config.api_base_url);

    let client = match ApiClient::new(
        config,
        Arc::new(BrowserStorage),
        Arc::new(AlertNotifier),
    ) {
        Ok(client) => client,
        Err(err) => {
            logging::error!("failed to start the API client: {err}");
            return;
        }
    };

    mount_to_body(move || view! { <App client=client.clone()/> });
}
