use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::progress::progress_model::{Progress, ProgressConfig, ProgressCurve};

/// Manufactures perceived progress while a real request is pending.
///
/// `start` hands back a receiver of `Progress` updates fed by a ticker task.
/// `stop` cancels that task and waits for it to finish, so once it returns no
/// further update can be produced.
pub struct ProgressSimulator {
    config: ProgressConfig,
    run: Option<Run>,
}

struct Run {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl Default for ProgressSimulator {
    fn default() -> Self {
        Self::new(ProgressConfig::default())
    }
}

impl ProgressSimulator {
    pub fn new(config: ProgressConfig) -> Self {
        Self { config, run: None }
    }

    pub fn is_running(&self) -> bool {
        self.run.as_ref().is_some_and(|run| !run.handle.is_finished())
    }

    /// Begin a fresh run. Any previous run is halted first. The first value on
    /// the receiver is always `Progress::initial()`.
    ///
    /// Cancelling `parent` stops the ticker as well.
    pub fn start(&mut self, parent: &CancellationToken) -> mpsc::UnboundedReceiver<Progress> {
        self.halt();

        let (tx, rx) = mpsc::unbounded_channel();
        let mut curve = ProgressCurve::new(self.config.clone());
        let _ = tx.send(curve.current());

        let cancel = parent.child_token();
        let token = cancel.clone();
        let period = self.config.tick_interval;

        let handle = tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // first tick of a tokio interval completes immediately
            interval.tick().await;

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        if tx.send(curve.tick()).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        debug!(tick_ms = period.as_millis() as u64, "progress simulation started");
        self.run = Some(Run { cancel, handle });
        rx
    }

    /// Stop ticking and wait for the ticker to exit.
    pub async fn stop(&mut self) {
        if let Some(run) = self.run.take() {
            run.cancel.cancel();
            // the task only ends by returning or by abort; neither is an error for us
            let _ = run.handle.await;
            debug!("progress simulation stopped");
        }
    }

    /// Synchronous stop for callers that cannot await. The ticker is cancelled
    /// and aborted. On a multi-threaded runtime a tick already being polled
    /// may still land; use `stop` when that matters.
    pub fn halt(&mut self) {
        if let Some(run) = self.run.take() {
            run.cancel.cancel();
            run.handle.abort();
        }
    }
}

impl Drop for ProgressSimulator {
    fn drop(&mut self) {
        self.halt();
    }
}
