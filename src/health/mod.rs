// Infrastructure health aggregation
//
// Probes for the optional dependencies (database, cache, message queue)
// live in `probes`; this module owns the status vocabulary and the
// reduction of individual check results into one report.

pub mod probes;

pub use probes::HealthChecker;

use chrono::{DateTime, Utc};
use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Per-check timeout applied when the caller does not supply one
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;

/// Status of a single dependency check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyStatus {
    Healthy,
    Unhealthy,
    NotConfigured,
    NotAvailable,
}

impl DependencyStatus {
    /// Whether this status pulls the overall report down to degraded.
    ///
    /// An unconfigured dependency is neutral; a configured one that failed
    /// its probe or whose client support is missing from the build is not.
    pub fn degrades_overall(&self) -> bool {
        matches!(
            self,
            DependencyStatus::Unhealthy | DependencyStatus::NotAvailable
        )
    }
}

impl std::fmt::Display for DependencyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DependencyStatus::Healthy => write!(f, "healthy"),
            DependencyStatus::Unhealthy => write!(f, "unhealthy"),
            DependencyStatus::NotConfigured => write!(f, "not_configured"),
            DependencyStatus::NotAvailable => write!(f, "not_available"),
        }
    }
}

/// Aggregate status over every configured dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    Healthy,
    Degraded,
}

impl std::fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverallStatus::Healthy => write!(f, "healthy"),
            OverallStatus::Degraded => write!(f, "degraded"),
        }
    }
}

/// Result of probing a single dependency
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    pub status: DependencyStatus,
    /// Backend kind behind the check (postgres, redis, rabbitmq, ...)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    /// Registered queue count, reported by the pgmq probe
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queues: Option<u64>,
}

impl CheckReport {
    pub fn healthy(backend: &str, elapsed_ms: u64) -> Self {
        Self {
            status: DependencyStatus::Healthy,
            backend: Some(backend.to_string()),
            error: None,
            response_time_ms: Some(elapsed_ms),
            queues: None,
        }
    }

    pub fn unhealthy(backend: &str, error: String, elapsed_ms: u64) -> Self {
        Self {
            status: DependencyStatus::Unhealthy,
            backend: Some(backend.to_string()),
            error: Some(error),
            response_time_ms: Some(elapsed_ms),
            queues: None,
        }
    }

    pub fn not_configured() -> Self {
        Self {
            status: DependencyStatus::NotConfigured,
            backend: None,
            error: None,
            response_time_ms: None,
            queues: None,
        }
    }

    pub fn not_available(backend: &str, reason: String) -> Self {
        Self {
            status: DependencyStatus::NotAvailable,
            backend: Some(backend.to_string()),
            error: Some(reason),
            response_time_ms: None,
            queues: None,
        }
    }

    pub fn with_queues(mut self, count: u64) -> Self {
        self.queues = Some(count);
        self
    }
}

/// The three dependency checks, in reporting order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyChecks {
    pub database: CheckReport,
    pub cache: CheckReport,
    pub queue: CheckReport,
}

impl DependencyChecks {
    pub fn entries(&self) -> [(&'static str, &CheckReport); 3] {
        [
            ("database", &self.database),
            ("cache", &self.cache),
            ("queue", &self.queue),
        ]
    }
}

/// Combined health report over all infrastructure dependencies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: OverallStatus,
    pub timestamp: DateTime<Utc>,
    pub checks: DependencyChecks,
    pub total_response_time_ms: u64,
}

impl HealthReport {
    /// Reduces individual check results into an overall status.
    ///
    /// The report is healthy only when no configured dependency failed its
    /// probe; `not_configured` checks never count against it.
    pub fn aggregate(checks: DependencyChecks, total_response_time_ms: u64) -> Self {
        let degraded = checks
            .entries()
            .iter()
            .any(|(_, check)| check.status.degrades_overall());

        Self {
            status: if degraded {
                OverallStatus::Degraded
            } else {
                OverallStatus::Healthy
            },
            timestamp: Utc::now(),
            checks,
            total_response_time_ms,
        }
    }

    /// Process exit code for the health-check CLI
    pub fn exit_code(&self) -> i32 {
        match self.status {
            OverallStatus::Healthy => 0,
            OverallStatus::Degraded => 2,
        }
    }

    /// HTTP status for the readiness endpoint
    pub fn http_status(&self) -> StatusCode {
        match self.status {
            OverallStatus::Healthy => StatusCode::OK,
            OverallStatus::Degraded => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Human-readable summary for terminal output
    pub fn render_text(&self) -> String {
        let mut out = format!("Overall status: {}\n", self.status);
        for (name, check) in self.checks.entries() {
            out.push_str(&format!("- {}: {}", name, check.status));
            if let Some(ms) = check.response_time_ms {
                out.push_str(&format!(" ({} ms)", ms));
            }
            if let Some(error) = &check.error {
                out.push_str(&format!(": {}", error));
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checks(database: CheckReport, cache: CheckReport, queue: CheckReport) -> DependencyChecks {
        DependencyChecks {
            database,
            cache,
            queue,
        }
    }

    #[test]
    fn healthy_when_nothing_is_configured() {
        let report = HealthReport::aggregate(
            checks(
                CheckReport::not_configured(),
                CheckReport::not_configured(),
                CheckReport::not_configured(),
            ),
            1,
        );

        assert_eq!(report.status, OverallStatus::Healthy);
        assert_eq!(report.exit_code(), 0);
        assert_eq!(report.http_status(), StatusCode::OK);
    }

    #[test]
    fn healthy_when_every_configured_check_passes() {
        let report = HealthReport::aggregate(
            checks(
                CheckReport::healthy("postgres", 12),
                CheckReport::healthy("redis", 3),
                CheckReport::not_configured(),
            ),
            20,
        );

        assert_eq!(report.status, OverallStatus::Healthy);
    }

    #[test]
    fn degraded_when_any_configured_check_fails() {
        let report = HealthReport::aggregate(
            checks(
                CheckReport::unhealthy("postgres", "connection refused".to_string(), 40),
                CheckReport::healthy("redis", 3),
                CheckReport::not_configured(),
            ),
            50,
        );

        assert_eq!(report.status, OverallStatus::Degraded);
        assert_eq!(report.exit_code(), 2);
        assert_eq!(report.http_status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn missing_client_support_degrades() {
        let report = HealthReport::aggregate(
            checks(
                CheckReport::not_configured(),
                CheckReport::not_available("redis", "built without cache-redis support".into()),
                CheckReport::not_configured(),
            ),
            2,
        );

        assert_eq!(report.status, OverallStatus::Degraded);
    }

    #[test]
    fn statuses_serialize_snake_case() {
        let value = serde_json::to_value(DependencyStatus::NotConfigured).expect("serializable");
        assert_eq!(value, serde_json::json!("not_configured"));

        let value = serde_json::to_value(OverallStatus::Degraded).expect("serializable");
        assert_eq!(value, serde_json::json!("degraded"));
    }

    #[test]
    fn report_serializes_expected_shape() {
        let report = HealthReport::aggregate(
            checks(
                CheckReport::healthy("postgres", 12),
                CheckReport::not_configured(),
                CheckReport::healthy("pgmq", 8).with_queues(3),
            ),
            25,
        );

        let value = serde_json::to_value(&report).expect("serializable");
        assert_eq!(value["status"], "healthy");
        assert_eq!(value["checks"]["database"]["type"], "postgres");
        assert_eq!(value["checks"]["database"]["response_time_ms"], 12);
        assert_eq!(value["checks"]["cache"]["status"], "not_configured");
        assert!(value["checks"]["cache"].get("error").is_none());
        assert_eq!(value["checks"]["queue"]["queues"], 3);
        assert_eq!(value["total_response_time_ms"], 25);
    }

    #[test]
    fn renders_errors_and_timings_in_text_summary() {
        let report = HealthReport::aggregate(
            checks(
                CheckReport::unhealthy("postgres", "timed out after 5s".to_string(), 5000),
                CheckReport::not_configured(),
                CheckReport::not_configured(),
            ),
            5001,
        );

        let text = report.render_text();
        assert!(text.starts_with("Overall status: degraded\n"));
        assert!(text.contains("- database: unhealthy (5000 ms): timed out after 5s"));
        assert!(text.contains("- cache: not_configured"));
    }
}
