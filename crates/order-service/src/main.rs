//! Main entry point for the food order service.
//!
//! Loads the configuration, builds the order service from the configured
//! storage and payment implementations, and serves the HTTP API.

use clap::Parser;
use order_config::Config;
use order_core::{OrderFactories, OrderServiceBuilder};
use std::path::PathBuf;
use std::sync::Arc;

mod apis;
mod server;

/// Command-line arguments for the order service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	tracing::info!("Started food order service");

	let config = Config::from_file(&args.config).await?;
	tracing::info!("Loaded configuration [{}]", config.service.id);

	let orders = OrderServiceBuilder::new(config.clone()).build(OrderFactories::registered())?;

	server::start_server(config.api, Arc::new(orders)).await?;

	tracing::info!("Stopped food order service");
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_args_default_values() {
		let args = Args::parse_from(["food-orders"]);

		assert_eq!(args.config, PathBuf::from("config.toml"));
		assert_eq!(args.log_level, "info");
	}

	#[test]
	fn test_args_custom_values() {
		let args = Args::parse_from([
			"food-orders",
			"--config",
			"custom.toml",
			"--log-level",
			"debug",
		]);

		assert_eq!(args.config, PathBuf::from("custom.toml"));
		assert_eq!(args.log_level, "debug");
	}

	#[tokio::test]
	async fn test_sample_config_builds_service() {
		let temp_dir = tempfile::tempdir().unwrap();
		let config_path = temp_dir.path().join("config.toml");
		let storage_path = temp_dir.path().join("orders");
		std::fs::write(
			&config_path,
			format!(
				r#"
[service]
id = "food-orders"

[storage]
primary = "file"
[storage.implementations.file]
storage_path = "{}"

[payment]
primary = "fixed"
[payment.implementations.fixed]
approve = true
"#,
				storage_path.display()
			),
		)
		.unwrap();

		let config = Config::from_file(&config_path).await.unwrap();
		assert_eq!(config.api.port, 5000);

		let orders = OrderServiceBuilder::new(config)
			.build(OrderFactories::registered())
			.unwrap();
		let order = orders
			.create_order(Some("Burger"), Some("user@upi"))
			.await
			.unwrap();
		assert!(storage_path.exists());
		assert!(orders.get_order_status(&order.order_id).await.is_ok());
	}
}
