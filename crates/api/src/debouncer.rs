use crate::{
    error::EditorError,
    occurrences::{handle_status_error, CheckSeriesStatusUseCase},
    session::Tagged,
    shared::usecase::execute,
};
use recurrence_editor_domain::{RecurrenceRule, SeriesStatus};
use recurrence_editor_infra::RecurrenceContext;
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::time::sleep;
use tracing::debug;

pub type StatusOutcome = Result<Tagged<SeriesStatus>, EditorError>;

/// Handle used to ask for a status re-check after an edit
#[derive(Debug, Clone)]
pub struct StatusDebouncer {
    requests: UnboundedSender<RecurrenceRule>,
}

impl StatusDebouncer {
    /// Returns `false` when the worker is gone
    pub fn request(&self, rule: RecurrenceRule) -> bool {
        self.requests.send(rule).is_ok()
    }
}

/// Coalesces a burst of status re-check requests into one trailing check,
/// issued for the latest rule once no request arrived for the quiet period
pub struct StatusDebounceWorker {
    ctx: RecurrenceContext,
    quiet_period: Duration,
    requests: UnboundedReceiver<RecurrenceRule>,
    outcomes: UnboundedSender<StatusOutcome>,
}

/// Creates a debouncer using the quiet period of the config. Outcomes are
/// delivered on the returned receiver, tagged with the snapshot they were
/// computed for.
pub fn status_debouncer(
    ctx: RecurrenceContext,
) -> (
    StatusDebouncer,
    StatusDebounceWorker,
    UnboundedReceiver<StatusOutcome>,
) {
    let quiet_period = Duration::from_millis(ctx.config.status_debounce_millis);
    let (requests_tx, requests_rx) = unbounded_channel();
    let (outcomes_tx, outcomes_rx) = unbounded_channel();
    (
        StatusDebouncer {
            requests: requests_tx,
        },
        StatusDebounceWorker {
            ctx,
            quiet_period,
            requests: requests_rx,
            outcomes: outcomes_tx,
        },
        outcomes_rx,
    )
}

impl StatusDebounceWorker {
    /// Runs until every `StatusDebouncer` handle is dropped or the outcome
    /// receiver is closed
    pub async fn run(mut self) {
        while let Some(mut rule) = self.requests.recv().await {
            let mut coalesced = 0;
            loop {
                tokio::select! {
                    next = self.requests.recv() => match next {
                        Some(next) => {
                            rule = next;
                            coalesced += 1;
                        }
                        None => break,
                    },
                    _ = sleep(self.quiet_period) => break,
                }
            }
            debug!("Checking series status, coalesced {} requests", coalesced);

            let outcome = execute(CheckSeriesStatusUseCase { rule }, &self.ctx)
                .await
                .map_err(handle_status_error);
            if self.outcomes.send(outcome).is_err() {
                break;
            }
        }
    }
}
