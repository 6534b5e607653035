use starfront::cli::run_cli;
use starfront::logging::{init_logging, LogConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&LogConfig::from_env())?;
    run_cli()
}
