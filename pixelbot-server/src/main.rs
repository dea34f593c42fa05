use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

mod context;
mod server;

#[derive(Parser, Debug, Clone)]
#[command(name = "pixelbot")]
#[command(author, version, about = "Year in Pixels - daily mood tracker for Discord")]
pub struct Args {
    /// Overrides DATABASE_URL.
    #[arg(long)]
    pub database_url: Option<String>,

    /// Overrides CREDENTIALS_PATH (Google service-account key).
    #[arg(long)]
    pub credentials: Option<PathBuf>,

    /// Dotenv file loaded before reading configuration.
    #[arg(long, default_value = ".env")]
    pub env_file: PathBuf,

    /// Directory holding the pdfium shared library. Falls back to the
    /// system library when omitted.
    #[arg(long)]
    pub pdfium_dir: Option<PathBuf>,
}

fn init_tracing() {
    let filter = EnvFilter::from_default_env()
        .add_directive("pixelbot=info".parse().unwrap_or_default())
        .add_directive("pixelbot_core=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(sub)
        .expect("Failed to set global subscriber");
}

/// Loads `path` into the process environment. Runs before tracing is set up
/// so `RUST_LOG` from the file takes effect.
fn load_env_file(path: &Path) -> Result<(), dotenv::Error> {
    dotenv::from_path(path)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let env_loaded = load_env_file(&args.env_file);
    init_tracing();

    if let Err(e) = env_loaded {
        info!("No env file loaded from {} ({e}); using the process environment", args.env_file.display());
    }

    info!("Pixelbot starting.");
    if let Err(e) = server::run_server(args).await {
        error!("Server error: {:?}", e);
        return Err(e.into());
    }
    info!("Main finished. Goodbye!");
    Ok(())
}
