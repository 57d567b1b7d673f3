use crate::application::configuration::OrderConfiguration;
use crate::domain::ports::OrderTransportRef;
use crate::error::{OrderError, Result};
use std::fmt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Idle,
    Confirming,
    Uploading,
    Succeeded,
    Failed,
    Cancelled,
}

impl UploadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStatus::Idle => "idle",
            UploadStatus::Confirming => "confirming",
            UploadStatus::Uploading => "uploading",
            UploadStatus::Succeeded => "succeeded",
            UploadStatus::Failed => "failed",
            UploadStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            UploadStatus::Succeeded | UploadStatus::Failed | UploadStatus::Cancelled
        )
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
enum UploadState {
    Idle,
    Confirming,
    Uploading {
        session: u64,
        cancel: CancellationToken,
        /// Latched by `cancel()`; once set the session can only end as cancelled.
        cancel_requested: bool,
    },
    Succeeded,
    Failed,
    Cancelled,
}

impl UploadState {
    fn status(&self) -> UploadStatus {
        match self {
            UploadState::Idle => UploadStatus::Idle,
            UploadState::Confirming => UploadStatus::Confirming,
            UploadState::Uploading { .. } => UploadStatus::Uploading,
            UploadState::Succeeded => UploadStatus::Succeeded,
            UploadState::Failed => UploadStatus::Failed,
            UploadState::Cancelled => UploadStatus::Cancelled,
        }
    }
}

/// Terminal result of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Succeeded,
    Failed { reason: String },
    Cancelled,
}

impl UploadOutcome {
    pub fn status(&self) -> UploadStatus {
        match self {
            UploadOutcome::Succeeded => UploadStatus::Succeeded,
            UploadOutcome::Failed { .. } => UploadStatus::Failed,
            UploadOutcome::Cancelled => UploadStatus::Cancelled,
        }
    }

    /// Message shown to the person placing the order.
    pub fn message(&self) -> String {
        match self {
            UploadOutcome::Succeeded => "Order submitted!".to_string(),
            UploadOutcome::Failed { reason } => format!("Order could not be submitted: {reason}"),
            UploadOutcome::Cancelled => "Order upload cancelled.".to_string(),
        }
    }
}

/// What to ask before an order is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationRequest {
    pub message: String,
}

#[derive(Debug)]
struct Settled {
    session: u64,
    result: Result<()>,
}

/// Drives one order submission at a time through
/// idle → confirming → uploading → succeeded | failed | cancelled → idle.
///
/// The transfer runs on a spawned task and reports back over a channel;
/// its result is only applied in [`UploadController::next_outcome`], which is
/// also where a pending cancellation wins over a late response.
pub struct UploadController {
    transport: OrderTransportRef,
    state: UploadState,
    sessions: u64,
    events_tx: mpsc::UnboundedSender<Settled>,
    events_rx: mpsc::UnboundedReceiver<Settled>,
}

impl UploadController {
    pub fn new(transport: OrderTransportRef) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            transport,
            state: UploadState::Idle,
            sessions: 0,
            events_tx,
            events_rx,
        }
    }

    pub fn status(&self) -> UploadStatus {
        self.state.status()
    }

    fn invalid(&self, operation: &'static str) -> OrderError {
        OrderError::InvalidState {
            operation,
            state: self.status().as_str(),
        }
    }

    /// Starts a submission and returns the question to put to the user.
    pub fn request_submit(&mut self, config: &OrderConfiguration) -> Result<ConfirmationRequest> {
        if !matches!(self.state, UploadState::Idle) {
            return Err(self.invalid("submit"));
        }
        self.state = UploadState::Confirming;
        debug!("Upload idle -> confirming");
        Ok(ConfirmationRequest {
            message: format!(
                "Submit {} order for {}?",
                config.product().label(),
                config.price()
            ),
        })
    }

    /// Applies the user's answer. On acceptance the order is snapshotted and
    /// the transfer starts in the background.
    pub fn confirm(&mut self, accepted: bool, config: &OrderConfiguration) -> Result<UploadStatus> {
        if !matches!(self.state, UploadState::Confirming) {
            return Err(self.invalid("confirm"));
        }
        if !accepted {
            self.state = UploadState::Idle;
            debug!("Upload declined, confirming -> idle");
            return Ok(UploadStatus::Idle);
        }

        let payload = config.snapshot();
        self.sessions += 1;
        let session = self.sessions;
        let cancel = CancellationToken::new();

        let transport = self.transport.clone();
        let events = self.events_tx.clone();
        let aborted = cancel.clone();
        tokio::spawn(async move {
            // The transfer gets its own task so a panicking transport still settles.
            let transfer = tokio::spawn(async move { transport.submit(payload).await });
            let abort = transfer.abort_handle();
            let result = tokio::select! {
                biased;
                _ = aborted.cancelled() => {
                    abort.abort();
                    Err(OrderError::Aborted)
                }
                joined = transfer => joined.unwrap_or_else(|e| {
                    Err(OrderError::Transfer(format!("transfer task failed: {e}")))
                }),
            };
            // Controller dropped: nobody left to report to.
            let _ = events.send(Settled { session, result });
        });

        info!(session, price = %config.price(), "Upload started");
        self.state = UploadState::Uploading {
            session,
            cancel,
            cancel_requested: false,
        };
        Ok(UploadStatus::Uploading)
    }

    /// Asks the in-flight transfer to abort. Outside `uploading` this is a
    /// no-op; returns whether a cancellation was signaled.
    pub fn cancel(&mut self) -> bool {
        match &mut self.state {
            UploadState::Uploading {
                session,
                cancel,
                cancel_requested,
            } => {
                if !*cancel_requested {
                    info!(session = *session, "Upload cancellation requested");
                    *cancel_requested = true;
                    cancel.cancel();
                }
                true
            }
            other => {
                debug!(state = %other.status(), "Cancel ignored");
                false
            }
        }
    }

    /// Waits for the in-flight transfer to settle and moves to the matching
    /// terminal state. Returns `None` when nothing is uploading.
    pub async fn next_outcome(&mut self) -> Option<UploadOutcome> {
        while matches!(self.state, UploadState::Uploading { .. }) {
            let settled = self.events_rx.recv().await?;
            if let Some(outcome) = self.settle(settled) {
                return Some(outcome);
            }
        }
        None
    }

    fn settle(&mut self, settled: Settled) -> Option<UploadOutcome> {
        let UploadState::Uploading {
            session,
            cancel_requested,
            ..
        } = &self.state
        else {
            return None;
        };
        if settled.session != *session {
            debug!(stale = settled.session, current = *session, "Discarding result of old session");
            return None;
        }

        let outcome = if *cancel_requested {
            if settled.result.is_ok() {
                debug!(session = *session, "Late success after cancellation discarded");
            }
            UploadOutcome::Cancelled
        } else {
            match settled.result {
                Ok(()) => UploadOutcome::Succeeded,
                Err(OrderError::Aborted) => UploadOutcome::Cancelled,
                Err(e) if e.is_transfer_failure() => UploadOutcome::Failed {
                    reason: e.to_string(),
                },
                Err(e) => {
                    error!(session = *session, "Upload could not be sent: {e}");
                    UploadOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
            }
        };

        match &outcome {
            UploadOutcome::Failed { reason } => warn!(session = *session, "Upload failed: {reason}"),
            other => info!(session = *session, outcome = %other.status(), "Upload finished"),
        }

        // Replacing the uploading state drops the cancellation token.
        self.state = match &outcome {
            UploadOutcome::Succeeded => UploadState::Succeeded,
            UploadOutcome::Failed { .. } => UploadState::Failed,
            UploadOutcome::Cancelled => UploadState::Cancelled,
        };
        Some(outcome)
    }

    /// Returns to `idle` once a terminal outcome has been shown.
    pub fn acknowledge(&mut self) -> Result<()> {
        if !self.status().is_terminal() {
            return Err(self.invalid("acknowledge"));
        }
        self.state = UploadState::Idle;
        Ok(())
    }
}

impl Drop for UploadController {
    fn drop(&mut self) {
        if let UploadState::Uploading { cancel, .. } = &self.state {
            cancel.cancel();
        }
    }
}
