use super::registry::{InFlightRegistry, InFlightRequest};
use crate::domain::auth::{FlowCompletion, FlowStatus};
use tracing::{debug, warn};

/// Outcome of matching a flow completion to its in-flight record.
#[derive(Debug)]
pub enum Correlation {
    /// No record for this intent, e.g. the host process was recreated.
    Miss,
    Canceled(InFlightRequest),
    Failed(InFlightRequest, String),
    Resolve(InFlightRequest),
}

/// Routes flow completions back to the attempt that launched the flow.
///
/// One correlator exists per controller; its request code is configuration,
/// so several controllers can share a host result channel.
#[derive(Debug, Clone, Copy)]
pub struct ResultCorrelator {
    request_code: i32,
}

impl ResultCorrelator {
    pub fn new(request_code: i32) -> Self {
        Self { request_code }
    }

    pub fn request_code(&self) -> i32 {
        self.request_code
    }

    /// True iff `request_code` is the one this correlator owns.
    ///
    /// Pure: the host may call it speculatively for unrelated results.
    pub fn should_handle_result(
        &self,
        request_code: i32,
        _result_code: i32,
        _completion: Option<&FlowCompletion>,
    ) -> bool {
        request_code == self.request_code
    }

    /// Removes the record matching `completion` and classifies what happened.
    pub fn correlate(&self, registry: &InFlightRegistry, completion: &FlowCompletion) -> Correlation {
        let intent_id = completion.intent_id();
        let Some(request) = registry.take(intent_id) else {
            warn!(intent_id, "no in-flight authentication for completion");
            return Correlation::Miss;
        };
        debug!(intent_id, status = ?completion.status, "correlated flow completion");

        match &completion.status {
            FlowStatus::Canceled => Correlation::Canceled(request),
            FlowStatus::Failed => {
                let message = completion
                    .error
                    .clone()
                    .unwrap_or_else(|| "authentication flow reported an error".to_string());
                Correlation::Failed(request, message)
            }
            FlowStatus::Completed => Correlation::Resolve(request),
            FlowStatus::Unknown(code) => {
                // the server snapshot decides what actually happened
                warn!(intent_id, status = %code, "unrecognized flow status, resolving from server");
                Correlation::Resolve(request)
            }
        }
    }
}
