use std::future::Future;

use tokio::sync::{mpsc, watch};
use tokio::time::{self, Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    client::{client::AnalysisClient, client_model::AnalysisOutcome},
    progress::{progress_model::Progress, simulator::ProgressSimulator},
    source::{
        error::SelectionError,
        selector,
        source_model::{AnalysisRequest, ImageFile, Preview, Selection},
    },
    trace::{logger::TraceLogger, trace::TraceEvent},
    workflow::{
        error::WorkflowError,
        workflow_model::{Notification, WorkflowConfig, WorkflowEvent, WorkflowPhase, WorkflowState},
    },
};

/// Drives one session through select → analyze → completed.
///
/// Only the controller mutates the selection/result slot. `analyze` borrows
/// the controller mutably for the whole run, so re-selecting or resetting
/// mid-flight cannot happen; a caller-owned `CancellationToken` is the one way
/// to abandon a run early.
pub struct WorkflowController {
    state: WorkflowState,
    client: AnalysisClient,
    simulator: ProgressSimulator,
    config: WorkflowConfig,
    progress: watch::Sender<Progress>,
    events: Option<mpsc::UnboundedSender<WorkflowEvent>>,
    tracer: TraceLogger,
    /// SHA-1 of the current selection, computed on first traced use
    fingerprint: Option<String>,
    step: u64,
}

/// How the analyzing phase ended.
enum RunEnd {
    Settled(AnalysisOutcome),
    Cancelled,
}

impl WorkflowController {
    pub fn new(client: AnalysisClient) -> Self {
        Self::with_config(client, WorkflowConfig::default())
    }

    pub fn with_config(client: AnalysisClient, config: WorkflowConfig) -> Self {
        let (progress, _) = watch::channel(Progress::initial());
        Self {
            state: WorkflowState::Idle,
            client,
            simulator: ProgressSimulator::new(config.progress.clone()),
            config,
            progress,
            events: None,
            tracer: TraceLogger::disabled(),
            fingerprint: None,
            step: 0,
        }
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = tracer;
        self
    }

    /// Open the notification channel. A later call replaces the earlier receiver.
    pub fn subscribe_events(&mut self) -> mpsc::UnboundedReceiver<WorkflowEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.events = Some(tx);
        rx
    }

    /// Latest simulated progress. Meaningful while `Analyzing`.
    pub fn subscribe_progress(&self) -> watch::Receiver<Progress> {
        self.progress.subscribe()
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn phase(&self) -> WorkflowPhase {
        self.state.phase()
    }

    // ========================================================================
    // Selection
    // ========================================================================

    pub fn select_file(&mut self, file: ImageFile) -> Result<Preview, WorkflowError> {
        let selection = selector::select_file(file).map_err(|e| self.reject("select_file", e))?;
        Ok(self.enter_selected(selection, "select_file"))
    }

    pub fn select_url(&mut self, url: &str) -> Result<Preview, WorkflowError> {
        let selection = selector::select_url(url).map_err(|e| self.reject("select_url", e))?;
        Ok(self.enter_selected(selection, "select_url"))
    }

    /// Report a source that could not even be loaded (e.g. an unreadable
    /// path) the same way as a rejected selection. State is unchanged.
    pub fn reject_load(&mut self, error: SelectionError) -> WorkflowError {
        self.reject("load_file", error)
    }

    fn reject(&mut self, operation: &str, error: SelectionError) -> WorkflowError {
        debug!(operation, error = %error, "selection rejected");
        self.notify(Notification::destructive(error.title(), error.to_string()));
        let (step, phase) = (self.step, self.phase());
        self.trace(|| {
            TraceEvent::now(step, phase, operation)
                .with_outcome("rejected")
                .with_detail(&error)
        });
        WorkflowError::Validation(error)
    }

    fn enter_selected(&mut self, selection: Selection, operation: &str) -> Preview {
        // an orphaned run (analyze future dropped mid-flight) must not keep ticking
        self.simulator.halt();
        self.progress.send_replace(Progress::initial());

        self.fingerprint = None;
        self.trace_request(WorkflowPhase::Selected, operation, &selection.request, None);
        let preview = selection.preview.clone();
        self.transition(WorkflowState::Selected { selection });
        preview
    }

    // ========================================================================
    // Analysis
    // ========================================================================

    /// Run the current selection through the analysis client.
    pub async fn analyze(&mut self) -> Result<AnalysisOutcome, WorkflowError> {
        self.analyze_with(CancellationToken::new()).await
    }

    /// Like `analyze`, but the run can be abandoned through `cancel`. A
    /// cancelled run stops the simulator, discards whatever the client
    /// returns, and leaves the workflow `Idle`.
    pub async fn analyze_with(
        &mut self,
        cancel: CancellationToken,
    ) -> Result<AnalysisOutcome, WorkflowError> {
        let selection = match std::mem::replace(&mut self.state, WorkflowState::Idle) {
            WorkflowState::Selected { selection } => selection,
            WorkflowState::Idle => {
                self.notify(Notification::destructive(
                    "No image selected",
                    "Please upload an image or provide a URL",
                ));
                return Err(WorkflowError::NothingToAnalyze);
            }
            other => {
                let phase = other.phase();
                self.state = other;
                return Err(WorkflowError::InvalidTransition {
                    operation: "analyze",
                    phase,
                });
            }
        };

        let request = selection.request.clone();
        self.trace_request(WorkflowPhase::Analyzing, "analyze", &request, None);
        self.enter(WorkflowPhase::Selected, WorkflowState::Analyzing { selection });

        let started = Instant::now();
        let run_token = cancel.child_token();
        let updates = self.simulator.start(&run_token);

        let end = drive_run(
            self.client.analyze(&request),
            self.config.min_visible,
            &run_token,
            updates,
            &self.progress,
        )
        .await;

        self.simulator.stop().await;
        run_token.cancel();
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let selection = match std::mem::replace(&mut self.state, WorkflowState::Idle) {
            WorkflowState::Analyzing { selection } => selection,
            other => {
                // nothing else can touch the state while we hold &mut self
                let phase = other.phase();
                self.state = other;
                return Err(WorkflowError::InvalidTransition {
                    operation: "complete",
                    phase,
                });
            }
        };

        match end {
            RunEnd::Cancelled => {
                info!(elapsed_ms, "analysis cancelled");
                self.progress.send_replace(Progress::initial());
                self.trace_request(WorkflowPhase::Idle, "cancel", &request, None);
                self.enter(WorkflowPhase::Analyzing, WorkflowState::Idle);
                Err(WorkflowError::Cancelled)
            }
            RunEnd::Settled(outcome) => {
                info!(elapsed_ms, success = outcome.is_success(), "analysis completed");
                self.progress.send_replace(Progress::initial());

                match &outcome {
                    AnalysisOutcome::Success(result) => self.notify(Notification::info(
                        "Analysis complete",
                        format!("{} analyzed", result.name),
                    )),
                    AnalysisOutcome::Failure(error) => self.notify(Notification::destructive(
                        "Analysis failed",
                        error.error.clone(),
                    )),
                }

                let label = if outcome.is_success() { "success" } else { "error" };
                self.trace_request(WorkflowPhase::Completed, "complete", &request, Some(label));

                self.enter(
                    WorkflowPhase::Analyzing,
                    WorkflowState::Completed {
                        selection,
                        outcome: outcome.clone(),
                    },
                );
                Ok(outcome)
            }
        }
    }

    // ========================================================================
    // Reset
    // ========================================================================

    /// Back to `Idle`: selection, preview, result and error are all dropped.
    pub fn reset(&mut self) {
        self.simulator.halt();
        self.progress.send_replace(Progress::initial());

        if matches!(self.state, WorkflowState::Idle) {
            return;
        }

        let step = self.step;
        self.trace(|| TraceEvent::now(step, WorkflowPhase::Idle, "reset"));
        self.fingerprint = None;
        self.transition(WorkflowState::Idle);
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn transition(&mut self, next: WorkflowState) {
        let from = self.state.phase();
        self.enter(from, next);
    }

    /// Install `next`, reporting `from` as the phase being left.
    fn enter(&mut self, from: WorkflowPhase, next: WorkflowState) {
        let to = next.phase();
        self.state = next;
        self.step += 1;

        debug!(?from, ?to, "workflow transition");
        self.emit(WorkflowEvent::PhaseChanged { from, to });
    }

    fn notify(&mut self, notification: Notification) {
        self.emit(WorkflowEvent::Notice(notification));
    }

    fn emit(&mut self, event: WorkflowEvent) {
        if let Some(tx) = &self.events {
            if tx.send(event).is_err() {
                warn!("event receiver dropped; notifications disabled");
                self.events = None;
            }
        }
    }

    /// Events are only built when a trace file is attached.
    fn trace(&self, build: impl FnOnce() -> TraceEvent) {
        if self.tracer.is_enabled() {
            self.tracer.log(&build());
        }
    }

    /// Trace an event about `request`. The fingerprint hashes the whole
    /// payload, so it is computed at most once per selection.
    fn trace_request(
        &mut self,
        phase: WorkflowPhase,
        event: &str,
        request: &AnalysisRequest,
        outcome: Option<&str>,
    ) {
        if !self.tracer.is_enabled() {
            return;
        }

        let fingerprint = self
            .fingerprint
            .get_or_insert_with(|| request.fingerprint())
            .clone();
        let mut trace =
            TraceEvent::now(self.step, phase, event).with_source(request.kind(), fingerprint);
        if let Some(outcome) = outcome {
            trace = trace.with_outcome(outcome);
        }
        self.tracer.log(&trace);
    }
}

/// Wait for the later of {client settled, minimum visible time}, relaying
/// simulated progress meanwhile. Cancellation wins over everything.
async fn drive_run(
    client_call: impl Future<Output = AnalysisOutcome>,
    min_visible: Duration,
    cancel: &CancellationToken,
    mut updates: mpsc::UnboundedReceiver<Progress>,
    progress: &watch::Sender<Progress>,
) -> RunEnd {
    let min_timer = time::sleep(min_visible);
    tokio::pin!(client_call, min_timer);

    let mut outcome = None;
    let mut min_elapsed = false;
    let mut ticking = true;

    loop {
        if min_elapsed {
            if let Some(outcome) = outcome.take() {
                return RunEnd::Settled(outcome);
            }
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return RunEnd::Cancelled,
            settled = &mut client_call, if outcome.is_none() => {
                debug!(success = settled.is_success(), "client settled");
                outcome = Some(settled);
            }
            _ = &mut min_timer, if !min_elapsed => min_elapsed = true,
            update = updates.recv(), if ticking => match update {
                Some(p) => {
                    progress.send_replace(p);
                }
                None => ticking = false,
            },
        }
    }
}
