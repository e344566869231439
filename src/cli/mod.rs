mod args;
mod devices;

pub use args::{Cli, CliCommand};
pub use devices::{handle_devices_command, pick_camera, pick_microphone};
