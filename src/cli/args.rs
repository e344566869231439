use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "recam")]
#[command(about = "Local real-time camera and microphone monitor", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Camera index to use, skipping the interactive picker
    #[arg(long)]
    pub camera: Option<u32>,

    /// Microphone index to use, skipping the interactive picker
    #[arg(long)]
    pub microphone: Option<usize>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// List detected cameras and microphones
    Devices,
    /// Print version information
    Version,
}
