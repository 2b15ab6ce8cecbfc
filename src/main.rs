use std::path::PathBuf;

use clap::Parser;

use imf::app::App;
use imf::config::Config;
use imf::error::AppResult;
use imf::logging::init_logging;

#[derive(Debug, Parser)]
#[command(name = "imf", version, about = "Search Pixabay images from the terminal")]
struct Cli {
    /// Submitted on startup, as if typed into the search field.
    query: Vec<String>,

    /// Config file; defaults to $IMF_CONFIG_PATH or the XDG config dir.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Overrides [log].level, e.g. "debug" or "imf=trace".
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

impl Cli {
    fn initial_query(&self) -> Option<String> {
        if self.query.is_empty() {
            None
        } else {
            Some(self.query.join(" "))
        }
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    if let Err(err) = run(Cli::parse()).await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let config = load_config(&cli)?;
    let log_path = init_logging(&config.log)?;
    tracing::info!(log = ?log_path, "starting imf");

    let mut app = App::new(config)?;
    let result = app.run(cli.initial_query()).await;
    if let Err(err) = &result {
        tracing::error!(error = %err, "imf exited with error");
    }
    result
}

fn load_config(cli: &Cli) -> AppResult<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path)?.with_env_overrides(),
        None => Config::load()?,
    };
    if let Some(level) = &cli.log_level {
        config.log.level = level.clone();
    }
    Ok(config)
}
