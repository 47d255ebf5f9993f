use anyhow::Result;
use boiteftpd::config::Config;
use boiteftpd::core_cli::Cli;
use boiteftpd::core_log::logger;
use boiteftpd::server;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Cli::parse();

    logger::init(args.debug);

    // Load configuration from the TOML file, if any, then let the flags win
    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };
    config.apply_cli(&args);
    config.validate()?;

    server::run(config).await
}
