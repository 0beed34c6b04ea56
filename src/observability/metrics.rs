use prometheus::{Encoder, Histogram, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub store_operations_total: IntCounterVec,
    pub deliveries_live: IntGauge,
    pub update_duration_seconds: Histogram,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let store_operations_total = IntCounterVec::new(
            Opts::new("store_operations_total", "Store operations by kind"),
            &["op"],
        )
        .expect("valid store_operations_total metric");

        let deliveries_live = IntGauge::new("deliveries_live", "Deliveries currently in the store")
            .expect("valid deliveries_live metric");

        let update_duration_seconds = Histogram::with_opts(prometheus::HistogramOpts::new(
            "update_duration_seconds",
            "Duration of per-delivery update closures in seconds",
        ))
        .expect("valid update_duration_seconds metric");

        registry
            .register(Box::new(store_operations_total.clone()))
            .expect("register store_operations_total");
        registry
            .register(Box::new(deliveries_live.clone()))
            .expect("register deliveries_live");
        registry
            .register(Box::new(update_duration_seconds.clone()))
            .expect("register update_duration_seconds");

        Self {
            registry,
            store_operations_total,
            deliveries_live,
            update_duration_seconds,
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

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
