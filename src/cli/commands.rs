use crate::controller::{controller_factory, EchoController};
use crate::ids::RequestId;
use crate::kernel::Kernel;
use crate::server::{write_cgi_response, Request};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, info};

/// Command-line interface for the starfront kernel
#[derive(Parser)]
#[command(name = "starfront")]
#[command(about = "Front-controller kernel CLI", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Dispatch a single CGI-style request with the echo controller
    Run {
        /// Application root
        #[arg(long, env = "STAR_APP_PATH")]
        app: PathBuf,

        /// Configuration file (YAML, JSON or TOML)
        #[arg(long, env = "STAR_CONFIG")]
        config: PathBuf,

        /// Environment section to select from the configuration
        #[arg(long, env = "STAR_ENV", default_value = "production")]
        env: String,

        /// Request query string
        #[arg(long, env = "QUERY_STRING", default_value = "")]
        query: String,

        /// Upstream correlation id (ULID)
        #[arg(long, env = "HTTP_X_REQUEST_ID")]
        request_id: Option<String>,
    },
    /// Build the kernel and print its wiring
    Check {
        #[arg(long, env = "STAR_APP_PATH")]
        app: PathBuf,

        #[arg(long, env = "STAR_CONFIG")]
        config: PathBuf,

        #[arg(long, env = "STAR_ENV", default_value = "production")]
        env: String,
    },
}

/// Parse the process arguments and execute against stdout.
pub fn run_cli() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(&cli, &mut out)
}

/// Execute a parsed command, writing its output to `out`.
pub fn execute<W: Write>(cli: &Cli, out: &mut W) -> Result<(), Box<dyn std::error::Error>> {
    match &cli.command {
        Commands::Run {
            app,
            config,
            env,
            query,
            request_id,
        } => {
            let request = Request::from_query(query)
                .with_request_id(RequestId::parse_or_new(request_id.as_deref()));
            let mut kernel = Kernel::builder(env, app.clone(), config.clone())
                .request(request)
                .build()?;
            register_echo_units(&mut kernel)?;
            let response = kernel.run();
            write_cgi_response(&response, out)?;
            out.flush()?;
            Ok(())
        }
        Commands::Check { app, config, env } => {
            let mut kernel = Kernel::builder(env, app.clone(), config.clone()).build()?;
            let directory = kernel.controller_directory();
            info!(directory = %directory.display(), "Configuration check passed");
            writeln!(out, "{}", kernel.summary())?;
            Ok(())
        }
    }
}

/// Declare every `*.rs` unit in the controller directory as an echo-served class.
fn register_echo_units(kernel: &mut Kernel) -> io::Result<()> {
    let directory = kernel.controller_directory();
    let entries = match fs::read_dir(&directory) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(directory = %directory.display(), "No controller directory");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("rs") {
            continue;
        }
        let Some(class) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
            continue;
        };
        debug!(class = %class, unit = %path.display(), "Echo unit registered");
        kernel.controllers_mut().register_unit(
            path,
            &class,
            controller_factory(EchoController::new),
        );
    }
    Ok(())
}
