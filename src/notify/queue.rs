use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{error, info, warn};

use crate::notify::{Mailer, Notification};
use crate::observability::metrics::Metrics;

#[derive(Clone)]
pub struct Notifier {
    tx: mpsc::Sender<Notification>,
    metrics: Metrics,
}

impl Notifier {
    pub fn channel(queue_size: usize, metrics: Metrics) -> (Self, mpsc::Receiver<Notification>) {
        let (tx, rx) = mpsc::channel(queue_size.max(1));
        (Self { tx, metrics }, rx)
    }

    pub fn dispatch(&self, notification: Notification) -> bool {
        // Counted before the send so the worker's dec() never runs first.
        self.metrics.notification_queue_depth.inc();

        match self.tx.try_send(notification) {
            Ok(()) => true,
            Err(TrySendError::Full(notification)) => {
                warn!(to = %notification.to, "notification queue full; dropping email");
                self.record_dropped();
                false
            }
            Err(TrySendError::Closed(notification)) => {
                error!(to = %notification.to, "notification worker gone; dropping email");
                self.record_dropped();
                false
            }
        }
    }

    fn record_dropped(&self) {
        self.metrics.notification_queue_depth.dec();
        self.metrics
            .notifications_total
            .with_label_values(&["dropped"])
            .inc();
    }
}

pub async fn run_notification_worker(
    mailer: Arc<dyn Mailer>,
    mut rx: mpsc::Receiver<Notification>,
    metrics: Metrics,
) {
    info!("notification worker started");

    while let Some(notification) = rx.recv().await {
        metrics.notification_queue_depth.dec();

        match mailer.send(&notification).await {
            Ok(response) => {
                metrics.notifications_total.with_label_values(&["sent"]).inc();
                info!(to = %notification.to, response = %response, "email sent");
            }
            Err(err) => {
                metrics
                    .notifications_total
                    .with_label_values(&["failed"])
                    .inc();
                error!(to = %notification.to, error = %err, "failed to send email");
            }
        }
    }

    info!("notification worker stopped: queue drained");
}
