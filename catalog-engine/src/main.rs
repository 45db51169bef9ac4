use clap::Parser;
use catalog_engine::config::CliArgs;
use catalog_engine::server::CatalogServer;
use catalog_engine::transport::NdjsonTransport;

fn main() {
	let args = CliArgs::parse();

	// Logs go to stderr; stdout carries the protocol.
	tracing_subscriber::fmt()
		.with_writer(std::io::stderr)
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
		)
		.init();

	let config = args.engine_config();
	tracing::info!(
		index = %config.index_kind,
		capacity = config.initial_capacity,
		binary_threshold = config.binary_search_threshold,
		"Engine configured"
	);

	let transport = NdjsonTransport::new();
	let mut server = CatalogServer::new(&config, transport);

	tracing::info!("catalog-engine ready");

	if let Err(e) = server.run(std::io::stdin().lock()) {
		tracing::error!("Server error: {}", e);
		std::process::exit(1);
	}
}
