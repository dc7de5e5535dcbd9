use std::sync::Arc;

use anyhow::{bail, Context, Result};
use log::info;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::loop_worker::{recognition_loop, PollerConfig, RecognitionEvent};
use super::session::SessionShared;

/// Owns the poller task of one session.
pub(crate) struct RecognitionController {
    runtime: Handle,
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl RecognitionController {
    pub(crate) fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            handle: None,
            cancel_token: None,
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub(crate) fn start(
        &mut self,
        shared: Arc<SessionShared>,
        config: PollerConfig,
        tx: mpsc::Sender<RecognitionEvent>,
    ) -> Result<()> {
        if self.handle.is_some() {
            bail!("recognition already active");
        }

        info!("starting recognition loop for session {}", config.session_id);

        let cancel_token = CancellationToken::new();
        let handle = self.runtime.spawn(recognition_loop(
            shared,
            config,
            tx,
            cancel_token.clone(),
        ));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    pub(crate) async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("recognition loop task failed to join")
        } else {
            Ok(())
        }
    }
}

impl Drop for RecognitionController {
    fn drop(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
    }
}
