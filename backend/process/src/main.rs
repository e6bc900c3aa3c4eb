use std::{path::PathBuf, time::Duration};

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Deployed spreadsheet script URL
    #[arg(long, env = "APPS_SCRIPT_URL")]
    url: String,

    #[arg(long, env = "DATA_FILE", default_value = roster::DEFAULT_DATA_FILE)]
    data_file: PathBuf,

    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Read a field from a differently named column, e.g. "Class Name=Enrolled Class"
    #[arg(long = "map", value_name = "FIELD=COLUMN")]
    map: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();
    let mapping = process::utils::parse_mapping(&args.map)?;

    process::load_students(
        &args.url,
        &args.data_file,
        Duration::from_secs(args.timeout_secs),
        &mapping,
    )
    .await
}
