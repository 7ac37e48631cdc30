use std::{sync::Arc, time::Duration};

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, info};

use crate::GameController;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerControl {
    /// Poll immediately, abandoning a poll that is still in flight.
    PollNow,
    Shutdown,
}

/// Handle to the background status poll loop.
///
/// At most one status request is in flight at a time; ticks that fire while a
/// request is outstanding are skipped. Dropping the handle aborts the task.
pub struct StatusPoller {
    control: mpsc::UnboundedSender<PollerControl>,
    task: JoinHandle<()>,
}

impl StatusPoller {
    pub(crate) fn spawn(
        controller: Arc<GameController>,
        period: Duration,
        control: mpsc::UnboundedSender<PollerControl>,
        control_rx: mpsc::UnboundedReceiver<PollerControl>,
    ) -> Self {
        let task = tokio::spawn(run(controller, period, control_rx));
        Self { control, task }
    }

    pub fn poll_now(&self) -> bool {
        self.control.send(PollerControl::PollNow).is_ok()
    }

    pub async fn shutdown(mut self) {
        let _ = self.control.send(PollerControl::Shutdown);
        let _ = (&mut self.task).await;
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(
    controller: Arc<GameController>,
    period: Duration,
    mut control: mpsc::UnboundedReceiver<PollerControl>,
) {
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    info!(period_ms = period.as_millis() as u64, "status poller started");

    'ticks: loop {
        tokio::select! {
            _ = ticker.tick() => {}
            command = control.recv() => match command {
                Some(PollerControl::PollNow) => {}
                Some(PollerControl::Shutdown) | None => break 'ticks,
            },
        }

        loop {
            let seq = controller.issue_sequence().await;
            tokio::select! {
                result = controller.fetch_status() => {
                    controller.apply_status(seq, result).await;
                    break;
                }
                command = control.recv() => match command {
                    Some(PollerControl::PollNow) => {
                        debug!(seq, "superseding in-flight status poll");
                    }
                    Some(PollerControl::Shutdown) | None => {
                        debug!(seq, "cancelling in-flight status poll");
                        break 'ticks;
                    }
                },
            }
        }
    }

    info!("status poller stopped");
}
