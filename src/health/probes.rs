// Dependency liveness probes
//
// Each probe opens its own transient connection, is bounded by the
// checker's timeout, and makes a single attempt. Failures are captured as
// error text rather than propagated.

use std::fmt::Display;
use std::future::Future;
use std::time::{Duration, Instant};

use sea_orm::{ConnectionTrait, Database, DatabaseBackend, Statement};
use tokio::time::timeout;
use tracing::debug;

use crate::config::{InfraConfig, QueueTarget};
use crate::health::{
    CheckReport, DependencyChecks, HealthReport, DEFAULT_PROBE_TIMEOUT_SECS,
};

/// Probes configured infrastructure dependencies and aggregates the results
#[derive(Debug, Clone)]
pub struct HealthChecker {
    infra: InfraConfig,
    probe_timeout: Duration,
}

impl HealthChecker {
    pub fn new(infra: InfraConfig, probe_timeout: Duration) -> Self {
        Self {
            infra,
            probe_timeout,
        }
    }

    pub fn with_default_timeout(infra: InfraConfig) -> Self {
        Self::new(infra, Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS))
    }

    pub fn infra(&self) -> &InfraConfig {
        &self.infra
    }

    /// Runs every dependency probe and reduces the results into one report
    pub async fn check_all(&self) -> HealthReport {
        let started = Instant::now();

        let database = self.check_database().await;
        let cache = self.check_cache().await;
        let queue = self.check_queue().await;

        let report = HealthReport::aggregate(
            DependencyChecks {
                database,
                cache,
                queue,
            },
            elapsed_ms(started),
        );
        debug!(status = %report.status, "health checks complete");
        report
    }

    /// Probes the configured database with a trivial query
    pub async fn check_database(&self) -> CheckReport {
        let url = match &self.infra.database_url {
            Some(url) => url,
            None => return CheckReport::not_configured(),
        };

        match classify_database_url(url) {
            DatabaseEngine::Postgres => {
                let started = Instant::now();
                let outcome = bounded(self.probe_timeout, async {
                    let conn = Database::connect(url.clone()).await?;
                    conn.execute_unprepared("SELECT 1").await?;
                    conn.close().await.ok();
                    Ok::<(), sea_orm::DbErr>(())
                })
                .await;

                match outcome {
                    Ok(()) => CheckReport::healthy("postgres", elapsed_ms(started)),
                    Err(error) => CheckReport::unhealthy("postgres", error, elapsed_ms(started)),
                }
            }
            DatabaseEngine::Unbuilt(kind) => CheckReport::not_available(
                kind,
                format!("server built without {} support", kind),
            ),
            DatabaseEngine::Unknown => CheckReport::unhealthy(
                "unknown",
                "unrecognized database engine in connection string".to_string(),
                0,
            ),
        }
    }

    /// Probes the configured cache with a redis PING
    #[cfg(feature = "cache-redis")]
    pub async fn check_cache(&self) -> CheckReport {
        let url = match &self.infra.redis_url {
            Some(url) => url,
            None => return CheckReport::not_configured(),
        };

        let started = Instant::now();
        let outcome = bounded(self.probe_timeout, async {
            let client = redis::Client::open(url.as_str())?;
            let mut conn = client.get_multiplexed_async_connection().await?;
            redis::cmd("PING").query_async::<String>(&mut conn).await?;
            Ok::<(), redis::RedisError>(())
        })
        .await;

        match outcome {
            Ok(()) => CheckReport::healthy("redis", elapsed_ms(started)),
            Err(error) => CheckReport::unhealthy("redis", error, elapsed_ms(started)),
        }
    }

    #[cfg(not(feature = "cache-redis"))]
    pub async fn check_cache(&self) -> CheckReport {
        match &self.infra.redis_url {
            Some(_) => CheckReport::not_available(
                "redis",
                "built without cache-redis support".to_string(),
            ),
            None => CheckReport::not_configured(),
        }
    }

    /// Probes the configured message queue
    pub async fn check_queue(&self) -> CheckReport {
        match &self.infra.queue {
            None => CheckReport::not_configured(),
            Some(QueueTarget::Rabbitmq { url }) => self.check_rabbitmq(url).await,
            Some(QueueTarget::Pgmq { url }) => self.check_pgmq(url).await,
        }
    }

    #[cfg(feature = "queue-rabbitmq")]
    async fn check_rabbitmq(&self, url: &str) -> CheckReport {
        let started = Instant::now();
        let outcome = bounded(self.probe_timeout, async {
            let conn =
                lapin::Connection::connect(url, lapin::ConnectionProperties::default()).await?;
            conn.close(200, "health probe complete").await?;
            Ok::<(), lapin::Error>(())
        })
        .await;

        match outcome {
            Ok(()) => CheckReport::healthy("rabbitmq", elapsed_ms(started)),
            Err(error) => CheckReport::unhealthy("rabbitmq", error, elapsed_ms(started)),
        }
    }

    #[cfg(not(feature = "queue-rabbitmq"))]
    async fn check_rabbitmq(&self, _url: &str) -> CheckReport {
        CheckReport::not_available(
            "rabbitmq",
            "built without queue-rabbitmq support".to_string(),
        )
    }

    async fn check_pgmq(&self, url: &str) -> CheckReport {
        let started = Instant::now();
        let outcome = bounded(self.probe_timeout, async {
            let conn = Database::connect(url.to_string()).await?;
            let row = conn
                .query_one(Statement::from_string(
                    DatabaseBackend::Postgres,
                    "SELECT count(*) AS queues FROM pgmq.meta".to_string(),
                ))
                .await?;
            let queues = match row {
                Some(row) => row.try_get::<i64>("", "queues")?,
                None => 0,
            };
            conn.close().await.ok();
            Ok::<i64, sea_orm::DbErr>(queues)
        })
        .await;

        match outcome {
            Ok(queues) => CheckReport::healthy("pgmq", elapsed_ms(started))
                .with_queues(queues.max(0) as u64),
            Err(error) => CheckReport::unhealthy("pgmq", error, elapsed_ms(started)),
        }
    }
}

/// Runs a fallible future under a timeout, flattening both failure modes
/// into error text
async fn bounded<T, E, F>(limit: Duration, fut: F) -> Result<T, String>
where
    E: Display,
    F: Future<Output = Result<T, E>>,
{
    match timeout(limit, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(error)) => Err(error.to_string()),
        Err(_) => Err(format!("timed out after {:?}", limit)),
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

#[derive(Debug, PartialEq, Eq)]
enum DatabaseEngine {
    Postgres,
    /// Recognized engine the binary is not built against
    Unbuilt(&'static str),
    Unknown,
}

fn classify_database_url(url: &str) -> DatabaseEngine {
    if url.starts_with("postgres://") || url.starts_with("postgresql://") {
        DatabaseEngine::Postgres
    } else if url.starts_with("mysql://") || url.starts_with("mariadb://") {
        DatabaseEngine::Unbuilt("mysql")
    } else if url.starts_with("sqlite:") {
        DatabaseEngine::Unbuilt("sqlite")
    } else {
        DatabaseEngine::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::{DependencyStatus, OverallStatus};

    #[test]
    fn classifies_connection_strings() {
        assert_eq!(
            classify_database_url("postgres://localhost/db"),
            DatabaseEngine::Postgres
        );
        assert_eq!(
            classify_database_url("postgresql://localhost/db"),
            DatabaseEngine::Postgres
        );
        assert_eq!(
            classify_database_url("mysql://localhost/db"),
            DatabaseEngine::Unbuilt("mysql")
        );
        assert_eq!(
            classify_database_url("sqlite::memory:"),
            DatabaseEngine::Unbuilt("sqlite")
        );
        assert_eq!(
            classify_database_url("foodb://localhost/db"),
            DatabaseEngine::Unknown
        );
    }

    #[tokio::test]
    async fn bounded_reports_timeout() {
        let outcome = bounded(
            Duration::from_millis(10),
            std::future::pending::<Result<(), std::convert::Infallible>>(),
        )
        .await;

        let error = outcome.expect_err("pending future must time out");
        assert!(error.contains("timed out"), "unexpected error: {}", error);
    }

    #[tokio::test]
    async fn unconfigured_dependencies_are_neutral() {
        let checker = HealthChecker::with_default_timeout(InfraConfig::default());
        let report = checker.check_all().await;

        assert_eq!(report.status, OverallStatus::Healthy);
        assert_eq!(report.exit_code(), 0);
        for (_, check) in report.checks.entries() {
            assert_eq!(check.status, DependencyStatus::NotConfigured);
        }
    }

    #[tokio::test]
    async fn unreachable_database_is_unhealthy() {
        let infra = InfraConfig::from_values(
            Some("postgres://127.0.0.1:1/items".to_string()),
            None,
            None,
            None,
        );
        let checker = HealthChecker::new(infra, Duration::from_secs(2));
        let report = checker.check_all().await;

        assert_eq!(report.status, OverallStatus::Degraded);
        assert_eq!(report.exit_code(), 2);
        assert_eq!(report.checks.database.status, DependencyStatus::Unhealthy);
        assert!(report.checks.database.error.is_some());
        assert!(report.checks.database.response_time_ms.is_some());
    }

    #[tokio::test]
    async fn unrecognized_engine_is_unhealthy() {
        let infra = InfraConfig::from_values(
            Some("foodb://localhost/items".to_string()),
            None,
            None,
            None,
        );
        let checker = HealthChecker::with_default_timeout(infra);
        let check = checker.check_database().await;

        assert_eq!(check.status, DependencyStatus::Unhealthy);
        assert!(check
            .error
            .as_deref()
            .is_some_and(|e| e.contains("unrecognized")));
    }

    #[tokio::test]
    async fn unbuilt_engine_is_not_available() {
        let infra = InfraConfig::from_values(
            Some("mysql://localhost/items".to_string()),
            None,
            None,
            None,
        );
        let checker = HealthChecker::with_default_timeout(infra);
        let report = checker.check_all().await;

        assert_eq!(
            report.checks.database.status,
            DependencyStatus::NotAvailable
        );
        assert_eq!(report.status, OverallStatus::Degraded);
    }
}
