use std::{sync::Arc, time::Duration};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use shared::{
    domain::Move,
    protocol::{CommandAck, GameStatus, ManualPlayRequest},
};
use tokio::sync::{broadcast, mpsc, Mutex};
use tracing::{debug, error, info, warn};
use url::Url;

pub mod error;
pub mod layout;
mod poller;
mod sequence;
pub mod view;

pub use error::{CommandError, CommandKind};
pub use layout::{FixedRegions, LayoutRules, VideoHeightCap, Viewport};
pub use poller::{PollerControl, StatusPoller};
pub use sequence::SequenceGate;
pub use view::{LockButton, ResultColor, ResultSize, ResultStyle, ViewState};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(2);
/// The server opens the camera on each video request, so the first response
/// can take much longer than a status call.
pub const DEFAULT_VIDEO_FEED_TIMEOUT: Duration = Duration::from_secs(10);
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// The game server endpoints the controller talks to.
#[async_trait]
pub trait GameApi: Send + Sync {
    async fn game_status(&self) -> Result<GameStatus>;
    async fn lock_move(&self) -> Result<CommandAck>;
    async fn reset_game(&self) -> Result<CommandAck>;
    async fn manual_play(&self, player_move: Move) -> Result<CommandAck>;
    /// Succeeds if the video stream answers; the stream body is never read.
    async fn probe_video_feed(&self) -> Result<()>;
}

pub struct HttpGameApi {
    http: Client,
    server_url: Url,
    video_feed_timeout: Duration,
}

impl HttpGameApi {
    pub fn new(server_url: &str, request_timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(request_timeout)
            .build()
            .context("failed to build http client")?;
        Self::with_client(http, server_url)
    }

    pub fn with_client(http: Client, server_url: &str) -> Result<Self> {
        let mut url = Url::parse(server_url.trim())
            .with_context(|| format!("invalid server url: {server_url}"))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(anyhow!("server_url must start with http:// or https://"));
        }
        // Endpoints are joined relative to the base, which needs a trailing slash
        // to keep any path prefix.
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(Self {
            http,
            server_url: url,
            video_feed_timeout: DEFAULT_VIDEO_FEED_TIMEOUT,
        })
    }

    /// Overrides the client timeout for the video feed check only.
    pub fn with_video_feed_timeout(mut self, timeout: Duration) -> Self {
        self.video_feed_timeout = timeout;
        self
    }

    pub fn server_url(&self) -> &Url {
        &self.server_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.server_url
            .join(path)
            .with_context(|| format!("failed to build endpoint url for {path}"))
    }

    async fn post_command(&self, path: &str) -> Result<CommandAck> {
        let ack = self
            .http
            .post(self.endpoint(path)?)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(ack)
    }
}

#[async_trait]
impl GameApi for HttpGameApi {
    async fn game_status(&self) -> Result<GameStatus> {
        let status = self
            .http
            .get(self.endpoint("game_status")?)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(status)
    }

    async fn lock_move(&self) -> Result<CommandAck> {
        self.post_command("lock_move").await
    }

    async fn reset_game(&self) -> Result<CommandAck> {
        self.post_command("reset_game").await
    }

    async fn manual_play(&self, player_move: Move) -> Result<CommandAck> {
        let ack = self
            .http
            .post(self.endpoint("manual_play")?)
            .json(&ManualPlayRequest { player_move })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(ack)
    }

    async fn probe_video_feed(&self) -> Result<()> {
        self.http
            .get(self.endpoint("video_feed")?)
            .timeout(self.video_feed_timeout)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub enum ControllerEvent {
    ViewChanged(ViewState),
    PollFailed(String),
    CommandFailed {
        command: CommandKind,
        message: String,
    },
}

struct ControllerState {
    view: ViewState,
    gate: SequenceGate,
}

/// Keeps a [`ViewState`] in sync with the game server and forwards user commands.
pub struct GameController {
    api: Arc<dyn GameApi>,
    inner: Mutex<ControllerState>,
    poller_control: Mutex<Option<mpsc::UnboundedSender<PollerControl>>>,
    events: broadcast::Sender<ControllerEvent>,
}

impl GameController {
    pub fn new(api: Arc<dyn GameApi>) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            api,
            inner: Mutex::new(ControllerState {
                view: ViewState::default(),
                gate: SequenceGate::default(),
            }),
            poller_control: Mutex::new(None),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    pub async fn view(&self) -> ViewState {
        self.inner.lock().await.view.clone()
    }

    /// Starts the periodic status poller. The returned handle owns the task.
    pub async fn spawn_poller(self: &Arc<Self>, period: Duration) -> StatusPoller {
        let (control_tx, control_rx) = mpsc::unbounded_channel();
        *self.poller_control.lock().await = Some(control_tx.clone());
        StatusPoller::spawn(Arc::clone(self), period, control_tx, control_rx)
    }

    /// Fetches one snapshot and applies it unless a newer response got there first.
    pub async fn poll_once(&self) -> bool {
        let seq = self.issue_sequence().await;
        let result = self.api.game_status().await;
        self.apply_status(seq, result).await
    }

    pub async fn lock_move(&self) -> Result<(), CommandError> {
        let seq = self.issue_sequence().await;
        let result = self.api.lock_move().await;
        self.finish_command(
            CommandKind::LockMove,
            seq,
            result,
            Some(ViewState::apply_move_locked),
        )
        .await
    }

    pub async fn reset_game(&self) -> Result<(), CommandError> {
        let seq = self.issue_sequence().await;
        let result = self.api.reset_game().await;
        self.finish_command(
            CommandKind::ResetGame,
            seq,
            result,
            Some(ViewState::apply_reset),
        )
        .await
    }

    /// Plays a round with an explicit move. The outcome arrives with the next poll.
    pub async fn play_move(&self, player_move: Move) -> Result<(), CommandError> {
        let seq = self.issue_sequence().await;
        let result = self.api.manual_play(player_move).await;
        self.finish_command(CommandKind::ManualPlay, seq, result, None)
            .await
    }

    pub async fn probe_video_feed(&self) -> bool {
        let Err(err) = self.api.probe_video_feed().await else {
            return true;
        };
        error!(error = %err, "error loading video feed");
        let view = {
            let mut guard = self.inner.lock().await;
            guard.view.apply_video_error();
            guard.view.clone()
        };
        let _ = self.events.send(ControllerEvent::ViewChanged(view));
        false
    }

    pub async fn adjust_layout(
        &self,
        rules: &LayoutRules,
        viewport: Viewport,
        regions: &FixedRegions,
    ) -> VideoHeightCap {
        let cap = rules.video_height_cap(viewport, regions);
        let view = {
            let mut guard = self.inner.lock().await;
            if guard.view.video_max_height == cap {
                return cap;
            }
            guard.view.apply_layout(cap);
            guard.view.clone()
        };
        debug!(
            width = viewport.width,
            height = viewport.height,
            ?cap,
            "video height cap changed"
        );
        let _ = self.events.send(ControllerEvent::ViewChanged(view));
        cap
    }

    pub(crate) async fn issue_sequence(&self) -> u64 {
        self.inner.lock().await.gate.issue()
    }

    pub(crate) async fn fetch_status(&self) -> Result<GameStatus> {
        self.api.game_status().await
    }

    pub(crate) async fn apply_status(&self, seq: u64, result: Result<GameStatus>) -> bool {
        let status = match result {
            Ok(status) => status,
            Err(err) => {
                warn!(seq, error = %err, "error fetching game status");
                let _ = self.events.send(ControllerEvent::PollFailed(err.to_string()));
                return false;
            }
        };

        let view = {
            let mut guard = self.inner.lock().await;
            if !guard.gate.admit(seq) {
                debug!(
                    seq,
                    last_applied = guard.gate.last_applied(),
                    "discarding stale game status"
                );
                return false;
            }
            guard.view.apply_snapshot(&status, Utc::now());
            guard.view.clone()
        };
        let _ = self.events.send(ControllerEvent::ViewChanged(view));
        true
    }

    async fn finish_command(
        &self,
        command: CommandKind,
        seq: u64,
        result: Result<CommandAck>,
        update: Option<fn(&mut ViewState)>,
    ) -> Result<(), CommandError> {
        let ack = match result {
            Ok(ack) => ack,
            Err(source) => {
                error!(%command, seq, error = %source, "command request failed");
                let _ = self.events.send(ControllerEvent::CommandFailed {
                    command,
                    message: source.to_string(),
                });
                return Err(CommandError::Request { command, source });
            }
        };

        let message = match ack.into_result() {
            Ok(message) => message,
            Err(source) => {
                warn!(%command, seq, error = %source, "command rejected by server");
                let _ = self.events.send(ControllerEvent::CommandFailed {
                    command,
                    message: source.message.clone(),
                });
                return Err(CommandError::Rejected { command, source });
            }
        };
        info!(
            %command,
            seq,
            message = message.as_deref().unwrap_or_default(),
            "command acknowledged"
        );

        let view = {
            let mut guard = self.inner.lock().await;
            // Polls issued before this command would roll the update back.
            guard.gate.advance_to(seq);
            update.map(|update| {
                update(&mut guard.view);
                guard.view.clone()
            })
        };
        if let Some(view) = view {
            let _ = self.events.send(ControllerEvent::ViewChanged(view));
        }
        self.request_refresh().await;
        Ok(())
    }

    async fn request_refresh(&self) {
        if let Some(control) = self.poller_control.lock().await.as_ref() {
            let _ = control.send(PollerControl::PollNow);
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
