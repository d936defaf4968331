//! Prometheus Metrics Registry - Reward Flow Observability
//!
//! Registers and exposes Prometheus metrics for Grafana dashboards.
//! Covers point accrual, claim outcomes, and transfer latency.
//!
//! All metrics follow the naming convention `bitmon_api_*`. Claim
//! counters are labeled by outcome so the dashboard can alert on
//! `indeterminate` specifically — every one of those is a manual
//! reconciliation task.

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder,
};

/// Centralized Prometheus metrics for the rewards API.
pub struct ApiMetrics {
    /// Prometheus registry.
    registry: Registry,
    /// Points credited, labeled by category.
    pub points_added: IntCounterVec,
    /// Claim attempts, labeled by outcome: `settled` or a lowercased
    /// error code (`insufficient_points`, `chain_rejected`,
    /// `chain_indeterminate`, ...).
    pub claims: IntCounterVec,
    /// Whole BTM units settled on-chain.
    pub units_claimed: IntCounterVec,
    /// End-to-end transfer latency in seconds.
    pub transfer_latency: Histogram,
}

impl ApiMetrics {
    /// Create and register all Prometheus metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let points_added = IntCounterVec::new(
            Opts::new("bitmon_api_points_added_total", "Total points credited"),
            &["category"],
        )?;

        let claims = IntCounterVec::new(
            Opts::new("bitmon_api_claims_total", "Claim attempts by outcome"),
            &["outcome"],
        )?;

        let units_claimed = IntCounterVec::new(
            Opts::new(
                "bitmon_api_units_claimed_total",
                "Whole BTM units settled on-chain",
            ),
            &["category"],
        )?;

        let transfer_latency = Histogram::with_opts(
            HistogramOpts::new(
                "bitmon_api_transfer_latency_seconds",
                "End-to-end BTM transfer latency",
            )
            .buckets(vec![0.5, 1.0, 2.0, 5.0, 10.0, 20.0, 30.0]),
        )?;

        registry.register(Box::new(points_added.clone()))?;
        registry.register(Box::new(claims.clone()))?;
        registry.register(Box::new(units_claimed.clone()))?;
        registry.register(Box::new(transfer_latency.clone()))?;

        Ok(Self {
            registry,
            points_added,
            claims,
            units_claimed,
            transfer_latency,
        })
    }

    /// Render the registry in Prometheus text exposition format.
    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_register_and_render() {
        let metrics = ApiMetrics::new().unwrap();
        metrics.points_added.with_label_values(&["pvp"]).inc_by(1500);
        metrics.claims.with_label_values(&["settled"]).inc();

        let rendered = metrics.render().unwrap();
        assert!(rendered.contains("bitmon_api_points_added_total"));
        assert!(rendered.contains("bitmon_api_claims_total"));
    }
}
