//! Online/offline tracking.
//!
//! The HTTP client flips this on every exchange: any response means online,
//! a request that got no response means offline. Nothing is queued while
//! offline; callers just get the connectivity error.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectivityState {
    Online,
    Offline,
}

impl ConnectivityState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectivityState::Online => "Online",
            ConnectivityState::Offline => "Offline",
        }
    }
}

/// Shared connectivity flag. Starts online.
#[derive(Debug, Default)]
pub struct Connectivity {
    offline: AtomicBool,
}

impl Connectivity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ConnectivityState {
        if self.is_offline() {
            ConnectivityState::Offline
        } else {
            ConnectivityState::Online
        }
    }

    pub fn set_offline(&self) {
        if !self.offline.swap(true, Ordering::Relaxed) {
            tracing::warn!("api unreachable; marking client offline");
        }
    }

    pub fn set_online(&self) {
        if self.offline.swap(false, Ordering::Relaxed) {
            tracing::info!("api reachable again");
        }
    }

    pub fn is_offline(&self) -> bool {
        self.offline.load(Ordering::Relaxed)
    }
}
