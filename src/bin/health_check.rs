// Infrastructure health check CLI
//
// Probes the dependencies configured through the environment
// (DATABASE_URL, REDIS_URL, RABBITMQ_URL, PGMQ_URL) and reports an
// aggregate status. Intended to back a Docker Compose `healthcheck` or a
// Kubernetes readinessProbe command.

use clap::Parser;
use std::time::Duration;

use item_service::config::InfraConfig;
use item_service::health::HealthChecker;

/// Run infrastructure health checks against configured dependencies
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Per-check timeout in seconds
    #[arg(short, long, default_value_t = 5)]
    timeout: u64,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Logs go to stderr so --json output stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let checker = HealthChecker::new(InfraConfig::from_env(), Duration::from_secs(cli.timeout));
    let report = checker.check_all().await;

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(body) => println!("{}", body),
            Err(e) => {
                eprintln!("Failed to serialize report: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        print!("{}", report.render_text());
    }

    std::process::exit(report.exit_code());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_timeout_and_json_flags() {
        let cli = Cli::parse_from(["health-check", "--timeout", "3", "--json"]);
        assert_eq!(cli.timeout, 3);
        assert!(cli.json);

        let cli = Cli::parse_from(["health-check"]);
        assert_eq!(cli.timeout, 5);
        assert!(!cli.json);
    }
}
