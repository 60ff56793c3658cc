//! Counter/timer facade for source-call observability.
//!
//! The collector owns one `MetricsCollector`; nothing is process-global.
//! Emission is disabled unless the `GAME_INSIGHTS_METRICS` environment
//! variable is set (or the collector is constructed with metrics enabled),
//! so library users pay nothing by default. Timers always report the elapsed
//! duration even when recording is disabled, since the fetch log line wants
//! it regardless.

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Environment variable that enables metrics recording.
pub const METRICS_ENV_VAR: &str = "GAME_INSIGHTS_METRICS";

/// In-process counters and duration observations, keyed `name{tag=value,...}`.
#[derive(Debug)]
pub struct MetricsCollector {
    enabled: bool,
    counters: RefCell<HashMap<String, u64>>,
    durations: RefCell<HashMap<String, Vec<Duration>>>,
}

impl MetricsCollector {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            counters: RefCell::new(HashMap::new()),
            durations: RefCell::new(HashMap::new()),
        }
    }

    /// Enabled when `GAME_INSIGHTS_METRICS` is set to a truthy value.
    pub fn from_env() -> Self {
        let enabled = std::env::var(METRICS_ENV_VAR)
            .map(|value| {
                let value = value.trim().to_ascii_lowercase();
                value == "1" || value == "true" || value == "yes"
            })
            .unwrap_or(false);
        Self::new(enabled)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn key(name: &str, tags: &[(&str, &str)]) -> String {
        if tags.is_empty() {
            return name.to_string();
        }
        let rendered: Vec<String> = tags.iter().map(|(k, v)| format!("{k}={v}")).collect();
        format!("{name}{{{}}}", rendered.join(","))
    }

    /// Increment a counter by one.
    pub fn counter(&self, name: &str, tags: &[(&str, &str)]) {
        if !self.enabled {
            return;
        }
        *self
            .counters
            .borrow_mut()
            .entry(Self::key(name, tags))
            .or_insert(0) += 1;
    }

    /// Start a timer; call [`MetricTimer::observe`] to record and get the
    /// elapsed duration.
    pub fn timer<'a>(&'a self, name: &str, tags: &[(&str, &str)]) -> MetricTimer<'a> {
        MetricTimer {
            metrics: self,
            key: Self::key(name, tags),
            start: Instant::now(),
        }
    }

    fn record_duration(&self, key: String, duration: Duration) {
        if !self.enabled {
            return;
        }
        self.durations
            .borrow_mut()
            .entry(key)
            .or_default()
            .push(duration);
    }

    /// Current value of a counter (0 when never incremented).
    pub fn counter_value(&self, name: &str, tags: &[(&str, &str)]) -> u64 {
        self.counters
            .borrow()
            .get(&Self::key(name, tags))
            .copied()
            .unwrap_or(0)
    }

    /// Number of recorded duration observations for a timer key.
    pub fn duration_count(&self, name: &str, tags: &[(&str, &str)]) -> usize {
        self.durations
            .borrow()
            .get(&Self::key(name, tags))
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Copy of all counters, for reporting.
    pub fn counters_snapshot(&self) -> HashMap<String, u64> {
        self.counters.borrow().clone()
    }
}

/// Running timer handed out by [`MetricsCollector::timer`].
pub struct MetricTimer<'a> {
    metrics: &'a MetricsCollector,
    key: String,
    start: Instant,
}

impl MetricTimer<'_> {
    /// Record the observation and return the elapsed time.
    pub fn observe(self) -> Duration {
        let elapsed = self.start.elapsed();
        self.metrics.record_duration(self.key, elapsed);
        elapsed
    }
}
