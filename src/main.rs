use clap::Parser;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use isrc_submit::app;
use isrc_submit::config::{self, Args};
use isrc_submit::prompt::{Console, Prompt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let dotenv_loaded = config::load_dotenv();
    let args = Args::parse();

    // RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if dotenv_loaded {
        debug!("Dev mode - loaded .env file");
    }

    let mut console = Console::new();
    match app::run(args, &mut console).await {
        Ok(submitted) => {
            debug!("Submitted ISRCs for {} tracks", submitted);
            ExitCode::SUCCESS
        }
        Err(e) => {
            debug!("Exiting on {:?}", e);
            console.say(&e.to_string());
            ExitCode::from(e.exit_code())
        }
    }
}
