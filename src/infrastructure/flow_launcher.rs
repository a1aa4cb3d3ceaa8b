use crate::domain::auth::{ChallengeFlowRequest, HostContext, RedirectFlowRequest};
use crate::domain::ports::FlowLauncher;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::warn;

/// A flow the launcher was asked to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchedFlow {
    Redirect {
        request: RedirectFlowRequest,
        host: HostContext,
    },
    SdkChallenge {
        request: ChallengeFlowRequest,
        host: HostContext,
    },
}

impl LaunchedFlow {
    pub fn request_code(&self) -> i32 {
        match self {
            LaunchedFlow::Redirect { request, .. } => request.request_code,
            LaunchedFlow::SdkChallenge { request, .. } => request.request_code,
        }
    }

    pub fn client_secret(&self) -> &str {
        match self {
            LaunchedFlow::Redirect { request, .. } => &request.client_secret,
            LaunchedFlow::SdkChallenge { request, .. } => &request.client_secret,
        }
    }
}

/// Launcher for hosts without a real UI: records every launch and optionally
/// forwards it to a simulated host over a channel.
#[derive(Default, Clone)]
pub struct RecordingFlowLauncher {
    launched: Arc<Mutex<Vec<LaunchedFlow>>>,
    forward: Option<mpsc::UnboundedSender<LaunchedFlow>>,
}

impl RecordingFlowLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a launcher that also sends each launch to the returned receiver.
    pub fn with_channel() -> (Self, mpsc::UnboundedReceiver<LaunchedFlow>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let launcher = Self {
            launched: Arc::default(),
            forward: Some(tx),
        };
        (launcher, rx)
    }

    pub fn launched(&self) -> Vec<LaunchedFlow> {
        self.launched
            .lock()
            .map(|launched| launched.clone())
            .unwrap_or_default()
    }

    fn record(&self, flow: LaunchedFlow) {
        if let Ok(mut launched) = self.launched.lock() {
            launched.push(flow.clone());
        }
        if let Some(forward) = &self.forward
            && forward.send(flow).is_err()
        {
            warn!("simulated host is gone, launched flow dropped");
        }
    }
}

impl FlowLauncher for RecordingFlowLauncher {
    fn launch_redirect_flow(&self, request: RedirectFlowRequest, host: &HostContext) {
        self.record(LaunchedFlow::Redirect {
            request,
            host: host.clone(),
        });
    }

    fn launch_sdk_challenge_flow(&self, request: ChallengeFlowRequest, host: &HostContext) {
        self.record(LaunchedFlow::SdkChallenge {
            request,
            host: host.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_launches_are_recorded_and_forwarded() {
        let (launcher, mut rx) = RecordingFlowLauncher::with_channel();
        let host = HostContext::new("checkout");
        launcher.launch_redirect_flow(
            RedirectFlowRequest {
                request_code: 50000,
                client_secret: "pi_1_secret_a".to_string(),
                url: "https://bank.example".to_string(),
                return_url: None,
            },
            &host,
        );

        let forwarded = rx.recv().await.unwrap();
        assert_eq!(forwarded.request_code(), 50000);
        assert_eq!(forwarded.client_secret(), "pi_1_secret_a");
        assert_eq!(launcher.launched(), vec![forwarded]);
    }
}
