//! Telemetry metric name constants.
//!
//! Consumers install their own `metrics` recorder (e.g. prometheus,
//! statsd); without a recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `tonepicker_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).

/// Total rewrites served from the cache.
pub const CACHE_HITS_TOTAL: &str = "tonepicker_cache_hits_total";

/// Total cache lookups that found no live entry.
pub const CACHE_MISSES_TOTAL: &str = "tonepicker_cache_misses_total";

/// Total requests sent to the upstream chat API.
///
/// Labels: `status` ("ok" | "error").
pub const UPSTREAM_REQUESTS_TOTAL: &str = "tonepicker_upstream_requests_total";

/// Upstream request duration in seconds, including body parsing.
pub const UPSTREAM_DURATION_SECONDS: &str = "tonepicker_upstream_duration_seconds";
