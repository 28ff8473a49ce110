use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

// ============================================================================
// Metrics Module - Prometheus metrics for order tracking
// ============================================================================
//
// Counts:
// - Lifecycle operations by operation and outcome
// - Broadcasts and per-subscriber delivery results
// - Orders still open (not yet completed or cancelled)
//
// Nothing is served over HTTP; callers render the text exposition with
// `Metrics::render` when they want it.
// ============================================================================

pub struct Metrics {
    registry: Registry,

    pub transitions_total: IntCounterVec,
    pub broadcasts_total: IntCounter,
    pub broadcast_duration: Histogram,
    pub deliveries_total: IntCounterVec,
    pub subscriber_failures_total: IntCounterVec,
    pub open_orders: IntGauge,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let transitions_total = IntCounterVec::new(
            Opts::new("order_transitions_total", "Lifecycle operations attempted"),
            &["operation", "outcome"],
        )?;
        registry.register(Box::new(transitions_total.clone()))?;

        let broadcasts_total = IntCounter::new(
            "order_broadcasts_total",
            "Events broadcast to subscribers",
        )?;
        registry.register(Box::new(broadcasts_total.clone()))?;

        let broadcast_duration = Histogram::with_opts(
            HistogramOpts::new(
                "order_broadcast_duration_seconds",
                "Time to deliver one event to all subscribers",
            )
            .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1]),
        )?;
        registry.register(Box::new(broadcast_duration.clone()))?;

        let deliveries_total = IntCounterVec::new(
            Opts::new("order_deliveries_total", "Per-subscriber deliveries"),
            &["result"],
        )?;
        registry.register(Box::new(deliveries_total.clone()))?;

        let subscriber_failures_total = IntCounterVec::new(
            Opts::new("order_subscriber_failures_total", "Subscriber failures by subscriber"),
            &["subscriber"],
        )?;
        registry.register(Box::new(subscriber_failures_total.clone()))?;

        let open_orders = IntGauge::new(
            "order_open_orders",
            "Orders being tracked that have not reached a terminal state",
        )?;
        registry.register(Box::new(open_orders.clone()))?;

        Ok(Self {
            registry,
            transitions_total,
            broadcasts_total,
            broadcast_duration,
            deliveries_total,
            subscriber_failures_total,
            open_orders,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Record one lifecycle operation (`transitioned`, `unchanged`, `rejected`)
    pub fn record_transition(&self, operation: &str, outcome: &str) {
        self.transitions_total.with_label_values(&[operation, outcome]).inc();
    }

    /// Record the result of one broadcast
    pub fn record_broadcast(&self, delivered: usize, failed: &[&str], duration_secs: f64) {
        self.broadcasts_total.inc();
        self.broadcast_duration.observe(duration_secs);
        self.deliveries_total
            .with_label_values(&["delivered"])
            .inc_by(delivered as u64);

        for subscriber in failed {
            self.deliveries_total.with_label_values(&["failed"]).inc();
            self.subscriber_failures_total.with_label_values(&[*subscriber]).inc();
        }
    }

    pub fn order_opened(&self) {
        self.open_orders.inc();
    }

    pub fn order_closed(&self) {
        self.open_orders.dec();
    }

    /// Prometheus text exposition of everything registered
    pub fn render(&self) -> anyhow::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
