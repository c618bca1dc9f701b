use anyhow::{Context, Result};
use clap::Parser;
use winit::event_loop::EventLoop;

use cursor_glow::app::{spawn_control_reader, App, ControlCommand};
use cursor_glow::cli::Cli;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.config();
    config.validate().context("invalid configuration")?;

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let event_loop = EventLoop::<ControlCommand>::with_user_event()
        .build()
        .context("failed to create event loop")?;
    let mut app = App::new(config, !cli.start_disabled);

    spawn_control_reader(event_loop.create_proxy());
    log::info!("commands on stdin: toggle, enable, disable, quit");

    event_loop.run_app(&mut app)?;

    match app.take_error() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
