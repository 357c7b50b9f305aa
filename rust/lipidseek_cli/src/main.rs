mod cli;
mod config;
mod errors;
mod processing;
mod results;

use clap::Parser;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::Config;

#[cfg(target_os = "windows")]
use mimalloc::MiMalloc;

#[cfg(target_os = "windows")]
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> std::result::Result<(), errors::CliError> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        ) // This uses RUST_LOG environment variable
        .init();

    let args = Cli::parse();
    let config = Config::with_cli_args(&args)?;
    info!("Parsed configuration: {:#?}", config);

    if let Some(threads) = config.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .map_err(|e| errors::CliError::Config {
                source: e.to_string(),
            })?;
        info!("Scoring on {} threads", threads);
    }

    let output = config.output_config()?;
    std::fs::create_dir_all(&output.directory)
        .map_err(|e| errors::CliError::io(e, &output.directory))?;

    let map = config.parameter_map()?;
    let summary = processing::run_search(&config, &map)?;
    info!(
        "Done: {} candidates, {} retained scores in {:?}",
        summary.candidates, summary.scores_retained, summary.elapsed
    );
    Ok(())
}
