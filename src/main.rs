use clap::Parser;
use homedesign::config::{AppConfig, setup_logging};
use tracing::{debug, error};

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let cli = homedesign::cli::CliOptions::parse();

    if setup_logging(cli.debug).is_err() {
        return;
    }

    let config = AppConfig::from(&cli);
    debug!("Loaded config: {:?}", config);

    if let Err(err) = homedesign::web::setup_server(&cli.listen_address, cli.port, config).await {
        error!("Application error: {}", err);
    }
}
