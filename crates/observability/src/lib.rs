use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

#[derive(Debug, Default)]
pub struct AppMetrics {
    queries_total: AtomicU64,
    resolver_calls_total: AtomicU64,
    resolver_fallbacks_total: AtomicU64,
    route_summaries_total: AtomicU64,
    total_latency_millis: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub queries_total: u64,
    pub resolver_calls_total: u64,
    pub resolver_fallbacks_total: u64,
    pub route_summaries_total: u64,
    pub avg_latency_millis: f64,
}

impl AppMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_query(&self) {
        self.queries_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_resolver_call(&self) {
        self.resolver_calls_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_resolver_fallback(&self) {
        self.resolver_fallbacks_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_route_summary(&self) {
        self.route_summaries_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn observe_latency(&self, duration: Duration) {
        self.total_latency_millis
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let queries = self.queries_total.load(Ordering::Relaxed);
        let latency = self.total_latency_millis.load(Ordering::Relaxed);

        MetricsSnapshot {
            queries_total: queries,
            resolver_calls_total: self.resolver_calls_total.load(Ordering::Relaxed),
            resolver_fallbacks_total: self.resolver_fallbacks_total.load(Ordering::Relaxed),
            route_summaries_total: self.route_summaries_total.load(Ordering::Relaxed),
            avg_latency_millis: if queries == 0 {
                0.0
            } else {
                latency as f64 / queries as f64
            },
        }
    }
}

pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}=info,waymark_api=info,waymark_pipeline=info",
                service_name
            ))
        });

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(true)
            .init();
    });
}
