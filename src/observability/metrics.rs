use prometheus::{
    Gauge, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE
        .get_or_init(|| async {
            info!("Initializing Metrics ...");
            Metrics::new()
        })
        .await
}

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Token provider metrics
    pub token_fetch_requests: IntCounterVec,
    pub token_fetch_failures: IntCounterVec,
    pub token_fetch_duration: HistogramVec,
    pub token_cache_hits: IntCounterVec,

    // Proxy metrics
    pub proxy_requests: IntCounterVec,
    pub proxy_failures: IntCounterVec,
    pub proxy_duration: HistogramVec,

    // Config/runtime
    pub config_parse_failures: IntCounter,
    pub up: IntGauge,

    // === Service resource metrics ===
    pub process_cpu_usage: Gauge,
    pub process_memory_usage: IntGauge,
    pub process_open_fds: IntGauge,
    pub process_start_time: IntGauge,
    pub process_uptime: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("graphproxy".into()), None).unwrap();

        let metrics: Arc<Metrics> = Arc::new(Self {
            registry,

            // Token provider
            token_fetch_requests: IntCounterVec::new(Opts::new("token_fetch_requests_total", "Total token endpoint requests by tenant"), &["tenant"]).unwrap(),
            token_fetch_failures: IntCounterVec::new(Opts::new("token_fetch_failures_total", "Token acquisition failures by reason"), &["tenant", "reason"]).unwrap(),
            token_fetch_duration: HistogramVec::new(HistogramOpts::new("token_fetch_duration_seconds", "Token request duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]), &["tenant"]).unwrap(),
            token_cache_hits: IntCounterVec::new(Opts::new("token_cache_hits_total", "Access tokens served from cache"), &["tenant"]).unwrap(),

            // Proxy
            proxy_requests: IntCounterVec::new(Opts::new("proxy_requests_total", "Proxied directory requests by route"), &["route"]).unwrap(),
            proxy_failures: IntCounterVec::new(Opts::new("proxy_failures_total", "Proxied request failures"), &["route", "reason"]).unwrap(),
            proxy_duration: HistogramVec::new(HistogramOpts::new("proxy_request_duration_seconds", "Proxied request time").buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]), &["route"]).unwrap(),

            // Config/runtime
            config_parse_failures: IntCounter::new("config_parse_failures_total", "Config parse failures").unwrap(),
            up: IntGauge::new("up", "Service readiness flag").unwrap(),

            // Service resources
            process_cpu_usage: Gauge::new("process_cpu_usage_percent", "Process CPU usage percent").unwrap(),
            process_memory_usage: IntGauge::new("process_memory_bytes", "Process resident memory").unwrap(),
            process_open_fds: IntGauge::new("process_open_fds", "Open file descriptors").unwrap(),
            process_start_time: IntGauge::new("process_start_time_seconds", "Process start time, unix seconds").unwrap(),
            process_uptime: IntGauge::new("process_uptime_seconds", "Process uptime seconds").unwrap(),
        });

        metrics.register_all();
        metrics
    }

    fn register_all(&self) {
        let r = &self.registry;
        let _ = r.register(Box::new(self.token_fetch_requests.clone()));
        let _ = r.register(Box::new(self.token_fetch_failures.clone()));
        let _ = r.register(Box::new(self.token_fetch_duration.clone()));
        let _ = r.register(Box::new(self.token_cache_hits.clone()));
        let _ = r.register(Box::new(self.proxy_requests.clone()));
        let _ = r.register(Box::new(self.proxy_failures.clone()));
        let _ = r.register(Box::new(self.proxy_duration.clone()));
        let _ = r.register(Box::new(self.config_parse_failures.clone()));
        let _ = r.register(Box::new(self.up.clone()));
        let _ = r.register(Box::new(self.process_cpu_usage.clone()));
        let _ = r.register(Box::new(self.process_memory_usage.clone()));
        let _ = r.register(Box::new(self.process_open_fds.clone()));
        let _ = r.register(Box::new(self.process_start_time.clone()));
        let _ = r.register(Box::new(self.process_uptime.clone()));
    }
}
