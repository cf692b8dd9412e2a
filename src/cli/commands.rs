use std::path::Path;

use anyhow::bail;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::{mpsc, watch};
use tracing::debug;

use crate::client::client::AnalysisClient;
use crate::cli::config::SourceArgs;
use crate::progress::progress_model::Progress;
use crate::report::console::{format_console_report, format_price};
use crate::source::selector::load_image_file;
use crate::trace::logger::TraceLogger;
use crate::workflow::controller::WorkflowController;
use crate::workflow::workflow_model::{
    Severity, WorkflowConfig, WorkflowEvent, WorkflowPhase,
};

// ============================================================================
// analyze subcommand
// ============================================================================

/// Run one select → analyze cycle. Returns whether the analysis succeeded.
pub async fn cmd_analyze(
    source: &SourceArgs,
    format: &str,
    trace: Option<&str>,
    client: AnalysisClient,
    config: WorkflowConfig,
    verbose: u8,
) -> anyhow::Result<bool> {
    let tracer = trace.map(TraceLogger::new).unwrap_or_else(TraceLogger::disabled);
    let mut controller = WorkflowController::with_config(client, config).with_tracer(tracer);
    let events = controller.subscribe_events();
    let progress = controller.subscribe_progress();

    let presenter = tokio::spawn(present(events, progress, format == "console", verbose));

    let selected = match (&source.file, &source.url) {
        (Some(path), _) => match load_image_file(Path::new(path)).await {
            Ok(file) => controller.select_file(file),
            Err(e) => Err(controller.reject_load(e)),
        },
        (None, Some(url)) => controller.select_url(url),
        (None, None) => bail!("either --file or --url is required"),
    };
    if selected.is_err() {
        // the rejection was already reported as a notice
        drop(controller);
        let _ = presenter.await;
        return Ok(false);
    }

    let outcome = controller.analyze().await?;

    // closing the channels lets the presenter finish
    drop(controller);
    let _ = presenter.await;

    let rendered = match format {
        "json" => format!("{}\n", serde_json::to_string_pretty(&outcome)?),
        _ => format_console_report(&outcome),
    };
    print!("{}", rendered);

    Ok(outcome.is_success())
}

/// Render workflow events and simulated progress on stderr until the
/// controller goes away.
async fn present(
    mut events: mpsc::UnboundedReceiver<WorkflowEvent>,
    mut progress: watch::Receiver<Progress>,
    show_bar: bool,
    verbose: u8,
) {
    let mut bar: Option<ProgressBar> = None;
    let mut watching = true;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(WorkflowEvent::PhaseChanged { from, to }) => {
                    if verbose > 0 {
                        eprintln!("{:?} -> {:?}", from, to);
                    }
                    match to {
                        WorkflowPhase::Analyzing if show_bar => bar = Some(new_bar()),
                        _ => {
                            if let Some(b) = bar.take() {
                                b.finish_and_clear();
                            }
                        }
                    }
                }
                Some(WorkflowEvent::Notice(notice)) => {
                    let marker = match notice.severity {
                        Severity::Destructive => "\u{2717}",
                        Severity::Info => "\u{2713}",
                    };
                    eprintln!("{} {}: {}", marker, notice.title, notice.description);
                }
                None => break,
            },
            changed = progress.changed(), if watching => match changed {
                Ok(()) => {
                    let current = *progress.borrow_and_update();
                    if let Some(b) = &bar {
                        b.set_position(current.percent as u64);
                        b.set_message(current.message);
                    }
                }
                Err(_) => watching = false,
            },
        }
    }

    if let Some(b) = bar.take() {
        b.finish_and_clear();
    }
}

fn new_bar() -> ProgressBar {
    let bar = ProgressBar::new(100);
    match ProgressStyle::default_bar().template("{spinner:.green} [{bar:30.cyan/blue}] {pos}% {wide_msg}") {
        Ok(style) => bar.set_style(style.progress_chars("█▓░")),
        Err(e) => debug!(error = %e, "falling back to default progress style"),
    }
    bar.set_message(Progress::initial().message);
    bar
}

// ============================================================================
// price subcommand
// ============================================================================

/// Print the current price of a product. Returns whether one was found.
pub async fn cmd_price(name: &str, client: &AnalysisClient) -> anyhow::Result<bool> {
    let price = client.get_price(name).await;
    print!("{}", format_price(name, price.as_ref()));
    Ok(price.is_some())
}
