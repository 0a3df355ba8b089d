use anyhow::Context;
use clap::Parser;
use merit_config::MeritConfig;
use merit_contrib::Probes;

mod cli;
mod commands;
mod context;
mod output;
mod ui;

fn main() {
    if let Err(error) = run() {
        eprintln!("merit error: {error:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let config = MeritConfig::load_with_dotenv().context("failed to load merit configuration")?;
    let flags = cli.global_flags(&config);
    ui::init(&flags, &config.output);
    tracing::debug!(format = ?flags.format, verbose = flags.verbose, "flags resolved");

    let mut ctx = context::AppContext::init(config, &Probes::system())
        .context("failed to initialize merit application context")?;

    commands::dispatch::dispatch(cli.command, &mut ctx, &flags)
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("MERIT_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
