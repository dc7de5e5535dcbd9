use std::ops::ControlFlow;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::engine::RecognizerKind;
use crate::geometry::EngineScale;
use crate::models::{GestureType, PointerEvent, RecognitionResult};
use crate::settings::WriteToTypeSettings;

use super::jiix::{parse_gesture, require_export, GestureParse};
use super::session::SessionShared;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info, log_warn};

/// What the poller hands to the delivery context.
#[derive(Debug, Clone)]
pub(crate) enum RecognitionEvent {
    Result {
        result: RecognitionResult,
        committed: bool,
        /// Raw gesture export of the cycle, empty when the gesture recognizer
        /// was not consulted.
        debug: String,
        /// Clear generation the result was produced in.
        epoch: u64,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Clone)]
pub(crate) struct PollerConfig {
    pub(crate) session_id: String,
    pub(crate) poll_interval: Duration,
    pub(crate) commit_wait_timeout: Duration,
    pub(crate) scale: EngineScale,
}

impl PollerConfig {
    pub(crate) fn from_settings(session_id: &str, settings: &WriteToTypeSettings) -> Self {
        Self {
            session_id: session_id.to_string(),
            poll_interval: settings.poll_interval(),
            commit_wait_timeout: settings.commit_wait_timeout(),
            scale: settings.scale(),
        }
    }
}

/// Turns recognizer state into [`RecognitionEvent`]s until cancelled.
///
/// Parked on the session's `Notify` while there is nothing to do; polls on a
/// short ticker while a result, commit or clear is outstanding.
pub(crate) async fn recognition_loop(
    shared: Arc<SessionShared>,
    config: PollerConfig,
    tx: mpsc::Sender<RecognitionEvent>,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(config.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    log_info!("recognition loop started for session {}", config.session_id);

    loop {
        let busy = shared.has_work();
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                log_info!("recognition loop shutting down for session {}", config.session_id);
                break;
            }
            _ = shared.wake.notified(), if !busy => {
                ticker.reset();
            }
            _ = ticker.tick(), if busy => {
                if poll_once(&shared, &config, &tx, &cancel_token).await.is_break() {
                    log_info!("recognition loop stopped for session {}", config.session_id);
                    break;
                }
            }
        }
    }
}

/// One pass over the commit, live and clear paths, in that order.
async fn poll_once(
    shared: &Arc<SessionShared>,
    config: &PollerConfig,
    tx: &mpsc::Sender<RecognitionEvent>,
    cancel_token: &CancellationToken,
) -> ControlFlow<()> {
    if shared.commit_requested() && !shared.clear_requested() {
        commit(shared, config, tx, cancel_token).await?;
    }

    if shared.result_pending() && !shared.clear_requested() {
        let seq = shared.input_seq();
        let epoch = shared.epoch();
        let (event, idle) = produce_blocking(shared, config.scale, false, epoch).await;
        if let Some(event) = event {
            deliver(tx, event, cancel_token).await?;
        }
        if idle {
            shared.settle(seq);
        }
    }

    if shared.clear_requested() {
        reset_blocking(shared).await;
        shared.finish_commit();
        shared.finish_clear();
        log_debug!("recognition cleared for session {}", config.session_id);
    }

    ControlFlow::Continue(())
}

async fn commit(
    shared: &Arc<SessionShared>,
    config: &PollerConfig,
    tx: &mpsc::Sender<RecognitionEvent>,
    cancel_token: &CancellationToken,
) -> ControlFlow<()> {
    let recognizers = shared.recognizers();
    let settled = async {
        while !recognizers.both_idle() {
            tokio::time::sleep(config.poll_interval).await;
        }
    };
    let waited = tokio::select! {
        biased;
        _ = cancel_token.cancelled() => return ControlFlow::Break(()),
        waited = tokio::time::timeout(config.commit_wait_timeout, settled) => waited,
    };
    if waited.is_err() {
        log_warn!(
            "recognizers still busy after {}ms, committing session {} anyway",
            config.commit_wait_timeout.as_millis(),
            config.session_id
        );
    }

    // A clear requested while waiting takes precedence.
    if shared.clear_requested() {
        return ControlFlow::Continue(());
    }

    let epoch = shared.epoch();
    let (event, _) = produce_blocking(shared, config.scale, true, epoch).await;
    if let Some(event) = event {
        deliver(tx, event, cancel_token).await?;
    }

    reset_blocking(shared).await;
    shared.finish_commit();
    log_debug!("recognition committed for session {}", config.session_id);
    ControlFlow::Continue(())
}

async fn deliver(
    tx: &mpsc::Sender<RecognitionEvent>,
    event: RecognitionEvent,
    cancel_token: &CancellationToken,
) -> ControlFlow<()> {
    tokio::select! {
        sent = tx.send(event) => match sent {
            Ok(()) => ControlFlow::Continue(()),
            Err(_) => {
                log_warn!("recognition receiver dropped");
                ControlFlow::Break(())
            }
        },
        _ = cancel_token.cancelled() => ControlFlow::Break(()),
    }
}

async fn produce_blocking(
    shared: &Arc<SessionShared>,
    scale: EngineScale,
    committed: bool,
    epoch: u64,
) -> (Option<RecognitionEvent>, bool) {
    let worker = Arc::clone(shared);
    match tokio::task::spawn_blocking(move || {
        let event = produce(&worker, scale, committed, epoch);
        (event, worker.recognizers().both_idle())
    })
    .await
    {
        Ok(outcome) => outcome,
        Err(err) => {
            log_error!("recognition worker join failed: {err}");
            (None, false)
        }
    }
}

async fn reset_blocking(shared: &Arc<SessionShared>) {
    let worker = Arc::clone(shared);
    if let Err(err) = tokio::task::spawn_blocking(move || worker.reset_recognition()).await {
        log_error!("recognizer clear worker join failed: {err}");
    }
}

/// Read both recognizers and combine their output into one event.
///
/// Missing or malformed exports are reported and clear the session; a
/// gesture export that lists nothing yet produces no event at all.
pub(crate) fn produce(
    shared: &SessionShared,
    scale: EngineScale,
    committed: bool,
    epoch: u64,
) -> Option<RecognitionEvent> {
    let (recognizers, read_gesture) = {
        let session = shared.lock();
        (session.recognizers.clone(), session.feeds_gesture())
    };
    let is_recognizer_idle = recognizers.both_idle();

    let mut debug = String::new();
    let mut gesture_type = GestureType::Empty;
    if read_gesture {
        let parsed = require_export(recognizers.export(true), RecognizerKind::Gesture).and_then(
            |jiix| {
                let parsed = parse_gesture(&jiix);
                debug = jiix;
                parsed
            },
        );
        match parsed {
            Ok(GestureParse::Recognized(gesture)) => gesture_type = gesture,
            Ok(GestureParse::Pending) => return None,
            Ok(GestureParse::Unknown(name)) => {
                log_warn!("engine reported unknown gesture {name:?}");
                return Some(RecognitionEvent::Error {
                    message: format!("Invalid gesture type: {name}"),
                });
            }
            Err(err) => return Some(fail(shared, format!("{err:#}"))),
        }
    }

    let text_export = match require_export(recognizers.export(false), RecognizerKind::Text) {
        Ok(jiix) => jiix,
        Err(err) => return Some(fail(shared, format!("{err:#}"))),
    };

    let mut session = shared.lock();
    let text_result = match session.words.parse_text(&text_export, scale) {
        Ok(text) => text,
        Err(err) => {
            drop(session);
            return Some(fail(shared, format!("{err:#}")));
        }
    };
    session.last_gesture = gesture_type;

    let result = RecognitionResult {
        is_pointer_up: session.last_event == Some(PointerEvent::Up),
        is_recognizer_idle,
        stroke_rect: session.path.bounds(),
        stroke_points: session.path.points(),
        gesture_type,
        text_result,
    };

    Some(RecognitionEvent::Result {
        result,
        committed,
        debug,
        epoch,
    })
}

fn fail(shared: &SessionShared, message: String) -> RecognitionEvent {
    log_warn!("recognition failed: {message}");
    shared.request_clear();
    RecognitionEvent::Error { message }
}
