use anyhow::Result;
use clap::Parser;
use recam::{
    app,
    cli::{handle_devices_command, Cli, CliCommand},
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(CliCommand::Version) => {
            println!("reCam {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Some(CliCommand::Devices) => {
            return handle_devices_command();
        }
        None => {}
    }

    app::run(cli)
}
