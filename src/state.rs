use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::{Config, DEFAULT_MAX_DISTANCE_METERS, DEFAULT_MAX_UPLOAD_BYTES};
use crate::documents::DocumentStore;
use crate::notify::{Notification, Notifier};
use crate::observability::metrics::Metrics;
use crate::store::RiderStore;

#[derive(Debug, Clone)]
pub struct Settings {
    pub mail_from: String,
    pub max_distance_meters: f64,
    pub max_upload_bytes: usize,
    pub auth_token: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mail_from: "noreply@localhost".to_string(),
            max_distance_meters: DEFAULT_MAX_DISTANCE_METERS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            auth_token: None,
        }
    }
}

impl From<&Config> for Settings {
    fn from(config: &Config) -> Self {
        Self {
            mail_from: config.mail_from(),
            max_distance_meters: config.nearest_max_distance_meters,
            max_upload_bytes: config.max_upload_bytes,
            auth_token: config.auth_token.clone(),
        }
    }
}

pub struct AppState {
    pub riders: Arc<dyn RiderStore>,
    pub documents: Arc<dyn DocumentStore>,
    pub notifier: Notifier,
    pub settings: Settings,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(
        settings: Settings,
        riders: Arc<dyn RiderStore>,
        documents: Arc<dyn DocumentStore>,
        notification_queue_size: usize,
    ) -> (Self, mpsc::Receiver<Notification>) {
        let metrics = Metrics::new();
        let (notifier, notification_rx) =
            Notifier::channel(notification_queue_size, metrics.clone());

        (
            Self {
                riders,
                documents,
                notifier,
                settings,
                metrics,
            },
            notification_rx,
        )
    }
}
