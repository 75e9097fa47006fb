//! Device location
//!
//! A terminal has no GPS, so the desktop provider takes both its permission
//! policy and its position sample from configuration.

use crate::config::config::{LocationConfig, PermissionPolicy};
use crate::core::{Coordinate, GeoError};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn request_foreground_permission(&self) -> PermissionStatus;

    /// One current-position sample
    async fn current_position(&self) -> Result<Coordinate, GeoError>;

    /// Ask for permission, then take a single sample
    async fn request_current_location(&self) -> Result<Coordinate, GeoError> {
        match self.request_foreground_permission().await {
            PermissionStatus::Granted => self.current_position().await,
            PermissionStatus::Denied => Err(GeoError::PermissionDenied),
        }
    }
}

type PromptFn = Arc<dyn Fn() -> bool + Send + Sync>;

/// Location provider backed by `[location]` config and GEO_PIN_LOCATION
pub struct ConfiguredLocationProvider {
    policy: PermissionPolicy,
    position: Option<Coordinate>,
    prompt: PromptFn,
}

impl ConfiguredLocationProvider {
    pub fn new(config: &LocationConfig) -> Self {
        Self::with_prompt(config, Arc::new(ask_on_terminal))
    }

    /// Same as `new` but with a custom answer source for the `prompt` policy
    pub fn with_prompt(config: &LocationConfig, prompt: PromptFn) -> Self {
        Self {
            policy: config.permission,
            position: config.position,
            prompt,
        }
    }
}

/// Blocking y/n question on stdin; anything but "y" is a denial
fn ask_on_terminal() -> bool {
    use std::io::Write;

    print!("Allow geo-pin to use your location? (y/n) [n]: ");
    if std::io::stdout().flush().is_err() {
        return false;
    }
    let mut input = String::new();
    match std::io::stdin().read_line(&mut input) {
        Ok(_) => matches!(input.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

#[async_trait]
impl LocationProvider for ConfiguredLocationProvider {
    async fn request_foreground_permission(&self) -> PermissionStatus {
        let granted = match self.policy {
            PermissionPolicy::Granted => true,
            PermissionPolicy::Denied => false,
            PermissionPolicy::Prompt => {
                let prompt = Arc::clone(&self.prompt);
                tokio::task::spawn_blocking(move || prompt())
                    .await
                    .unwrap_or(false)
            }
        };

        info!(target: "location", "Foreground location permission granted={}", granted);
        if granted {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        }
    }

    async fn current_position(&self) -> Result<Coordinate, GeoError> {
        debug!(target: "location", "Sampling configured position {:?}", self.position);
        self.position.ok_or_else(|| {
            GeoError::ProviderUnavailable(
                "no position configured (set GEO_PIN_LOCATION=\"lat,lng\")".to_string(),
            )
        })
    }
}
