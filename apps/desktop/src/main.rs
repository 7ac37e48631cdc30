use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{ControllerEvent, GameController, HttpGameApi, StatusPoller, ViewState};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::{self, error::RecvError},
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod config;
mod console;

use config::Settings;
use console::{render_view, ConsoleCommand, HELP};

#[derive(Parser, Debug)]
#[command(
    name = "rps-desktop",
    about = "Console controller for the rock-paper-scissors gesture server"
)]
struct Args {
    /// Settings file; defaults to ./rps.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    poll_interval_ms: Option<u64>,
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = config::load_settings(args.config.as_deref())
        .context("failed to load settings")?
        .with_cli_overrides(args.server_url, args.poll_interval_ms);
    init_tracing(&settings.log_filter);
    info!(server_url = %settings.server_url, "starting rps console");

    let api = HttpGameApi::new(&settings.server_url, settings.request_timeout())?
        .with_video_feed_timeout(settings.video_feed_timeout());
    let controller = GameController::new(Arc::new(api));
    let render_task = tokio::spawn(render_events(
        controller.subscribe_events(),
        controller.view().await,
    ));

    controller
        .adjust_layout(&settings.layout, settings.viewport, &settings.regions)
        .await;
    controller.probe_video_feed().await;
    let poller = controller.spawn_poller(settings.poll_interval()).await;
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("failed to read stdin")?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<ConsoleCommand>() {
            Ok(ConsoleCommand::Quit) => break,
            Ok(command) => dispatch(&controller, &poller, &settings, command),
            Err(err) => println!("{err}"),
        }
    }

    info!("shutting down");
    poller.shutdown().await;
    render_task.abort();
    Ok(())
}

/// Each command runs on its own task so slow requests never block input.
/// Failures are logged by the controller.
fn dispatch(
    controller: &Arc<GameController>,
    poller: &StatusPoller,
    settings: &Settings,
    command: ConsoleCommand,
) {
    let controller = Arc::clone(controller);
    match command {
        ConsoleCommand::Lock => {
            tokio::spawn(async move {
                let _ = controller.lock_move().await;
            });
        }
        ConsoleCommand::Reset => {
            tokio::spawn(async move {
                let _ = controller.reset_game().await;
            });
        }
        ConsoleCommand::Play(player_move) => {
            tokio::spawn(async move {
                let _ = controller.play_move(player_move).await;
            });
        }
        ConsoleCommand::Resize(viewport) => {
            let rules = settings.layout;
            let regions = settings.regions;
            tokio::spawn(async move {
                controller.adjust_layout(&rules, viewport, &regions).await;
            });
        }
        ConsoleCommand::Refresh => {
            poller.poll_now();
        }
        ConsoleCommand::Help => println!("{HELP}"),
        ConsoleCommand::Quit => {}
    }
}

async fn render_events(mut events: broadcast::Receiver<ControllerEvent>, initial: ViewState) {
    let mut last_frame = render_view(&initial);
    println!("{last_frame}\n");

    loop {
        match events.recv().await {
            Ok(ControllerEvent::ViewChanged(view)) => {
                let frame = render_view(&view);
                if frame != last_frame {
                    println!("{frame}\n");
                    last_frame = frame;
                }
            }
            Ok(ControllerEvent::PollFailed(_) | ControllerEvent::CommandFailed { .. }) => {}
            Err(RecvError::Lagged(skipped)) => debug!(skipped, "render loop fell behind"),
            Err(RecvError::Closed) => break,
        }
    }
}
