use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub riders_registered_total: IntCounter,
    pub registration_rejections_total: IntCounterVec,
    pub notifications_total: IntCounterVec,
    pub notification_queue_depth: IntGauge,
    pub nearest_query_latency_seconds: Histogram,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let riders_registered_total =
            IntCounter::new("riders_registered_total", "Total riders registered")
                .expect("valid riders_registered_total metric");

        let registration_rejections_total = IntCounterVec::new(
            Opts::new(
                "registration_rejections_total",
                "Rejected registrations by reason",
            ),
            &["reason"],
        )
        .expect("valid registration_rejections_total metric");

        let notifications_total = IntCounterVec::new(
            Opts::new("notifications_total", "Notification emails by outcome"),
            &["outcome"],
        )
        .expect("valid notifications_total metric");

        let notification_queue_depth = IntGauge::new(
            "notification_queue_depth",
            "Notifications waiting for the mail worker",
        )
        .expect("valid notification_queue_depth metric");

        let nearest_query_latency_seconds = Histogram::with_opts(HistogramOpts::new(
            "nearest_query_latency_seconds",
            "Latency of nearest-rider queries in seconds",
        ))
        .expect("valid nearest_query_latency_seconds metric");

        registry
            .register(Box::new(riders_registered_total.clone()))
            .expect("register riders_registered_total");
        registry
            .register(Box::new(registration_rejections_total.clone()))
            .expect("register registration_rejections_total");
        registry
            .register(Box::new(notifications_total.clone()))
            .expect("register notifications_total");
        registry
            .register(Box::new(notification_queue_depth.clone()))
            .expect("register notification_queue_depth");
        registry
            .register(Box::new(nearest_query_latency_seconds.clone()))
            .expect("register nearest_query_latency_seconds");

        Self {
            registry,
            riders_registered_total,
            registration_rejections_total,
            notifications_total,
            notification_queue_depth,
            nearest_query_latency_seconds,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}
