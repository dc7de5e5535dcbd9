use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::{Context, Result};
use log::{info, warn};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::time::Duration;
use uuid::Uuid;

use crate::commit::{CommitScheduler, CommitState};
use crate::engine::{RecognizerFactory, RecognizerKind};
use crate::focus::FocusResolver;
use crate::host::InkSurface;
use crate::interpreter::GestureInterpreter;
use crate::models::{StrokePoint, ToolKind};
use crate::recognition::{
    PollerConfig, RecognitionController, RecognitionEvent, Recognizers, SessionShared,
    StrokeRouter,
};
use crate::settings::WriteToTypeSettings;

use super::{Dispatcher, SessionHandle};

/// One editing surface.
///
/// Stroke callbacks are plain synchronous calls meant for the input thread;
/// they never block on recognition. Results come out of the [`Dispatcher`]
/// returned by [`WriteToTypeManager::start`].
pub struct WriteToTypeManager {
    session_id: String,
    settings: WriteToTypeSettings,
    factory: Arc<dyn RecognizerFactory>,
    shared: Arc<SessionShared>,
    router: StrokeRouter,
    scheduler: CommitScheduler,
    ink: Arc<dyn InkSurface>,
    controller: RecognitionController,
    tx: mpsc::Sender<RecognitionEvent>,
    active_stylus_only: AtomicBool,
}

impl WriteToTypeManager {
    /// Create both recognizers and start the poller on the current tokio
    /// runtime.
    pub fn start(
        factory: Arc<dyn RecognizerFactory>,
        settings: WriteToTypeSettings,
        ink: Arc<dyn InkSurface>,
    ) -> Result<(Self, Dispatcher)> {
        let runtime = Handle::try_current().context("write-to-type needs a tokio runtime")?;
        let session_id = Uuid::new_v4().to_string();

        let recognizers = create_recognizers(factory.as_ref(), &settings)?;
        let shared = Arc::new(SessionShared::new(recognizers));

        let scheduler = {
            let shared = Arc::clone(&shared);
            let ink = Arc::clone(&ink);
            CommitScheduler::new(runtime.clone(), settings.commit_timeout(), move || {
                shared.request_commit();
                ink.clear_strokes(true);
            })
        };

        let (tx, rx) = mpsc::channel(1);
        let mut controller = RecognitionController::new(runtime);
        controller.start(
            Arc::clone(&shared),
            PollerConfig::from_settings(&session_id, &settings),
            tx.clone(),
        )?;

        let handle = SessionHandle::new(Arc::clone(&shared), scheduler.clone(), Arc::clone(&ink));
        let interpreter = GestureInterpreter::new(FocusResolver::new(
            settings.scale(),
            settings.punctuations.clone(),
        ));
        let dispatcher = Dispatcher::new(rx, handle, interpreter, settings.debug);

        info!(
            "write-to-type session {session_id} started (language {}, commit after {}ms)",
            settings.language, settings.commit_timeout_ms
        );

        let manager = Self {
            session_id,
            router: StrokeRouter::new(Arc::clone(&shared)),
            active_stylus_only: AtomicBool::new(settings.active_stylus_only),
            settings,
            factory,
            shared,
            scheduler,
            ink,
            controller,
            tx,
        };
        Ok((manager, dispatcher))
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn language(&self) -> &str {
        &self.settings.language
    }

    fn accepts(&self, point: &StrokePoint) -> bool {
        !self.active_stylus_only.load(Ordering::SeqCst) || point.tool == ToolKind::Stylus
    }

    /// Pointer down. Returns whether the point was routed.
    pub fn on_stroke_begin(&self, point: &StrokePoint, pointer_id: i32) -> bool {
        if !self.accepts(point) {
            return false;
        }
        let routed = self.router.route_down(point, pointer_id);
        self.scheduler.cancel();
        routed
    }

    pub fn on_stroke_move(&self, point: &StrokePoint, pointer_id: i32) -> bool {
        if !self.accepts(point) {
            return false;
        }
        self.router.route_move(point, pointer_id)
    }

    /// Pointer up; re-arms the commit timer.
    pub fn on_stroke_end(&self, point: &StrokePoint, pointer_id: i32) -> bool {
        if !self.accepts(point) {
            return false;
        }
        let routed = self.router.route_up(point, pointer_id);
        self.scheduler.schedule();
        routed
    }

    /// The platform took the stroke away.
    pub fn on_stroke_cancel(&self) {
        if let Some(pointer) = self.router.route_cancel() {
            info!("stroke of pointer {pointer} cancelled in session {}", self.session_id);
        }
        self.cancel_recognition();
    }

    pub fn commit_timeout(&self) -> Duration {
        self.scheduler.timeout()
    }

    /// Applies from the next stroke end.
    pub fn set_commit_timeout(&self, timeout: Duration) {
        self.scheduler.set_timeout(timeout);
    }

    pub fn commit_state(&self) -> CommitState {
        self.scheduler.state()
    }

    pub fn set_active_stylus_only(&self, active_stylus_only: bool) {
        self.active_stylus_only
            .store(active_stylus_only, Ordering::SeqCst);
    }

    pub fn active_stylus_only(&self) -> bool {
        self.active_stylus_only.load(Ordering::SeqCst)
    }

    pub fn cancel_recognition(&self) {
        self.handle().cancel_recognition();
    }

    pub fn clear_session(&self) {
        self.handle().clear_session();
    }

    pub fn handle(&self) -> SessionHandle {
        SessionHandle::new(
            Arc::clone(&self.shared),
            self.scheduler.clone(),
            Arc::clone(&self.ink),
        )
    }

    /// Recreate both recognizers for `language` and restart the poller.
    ///
    /// Strokes in progress are dropped. On failure the previous recognizers
    /// stay in place.
    pub async fn set_language(&mut self, language: &str) -> Result<()> {
        let mut settings = self.settings.clone();
        settings.language = language.to_string();
        let recognizers = create_recognizers(self.factory.as_ref(), &settings)?;

        self.scheduler.cancel();
        self.controller.stop().await?;

        let old = self.shared.replace_recognizers(recognizers);
        old.close();
        self.ink.clear_strokes(false);

        self.controller.start(
            Arc::clone(&self.shared),
            PollerConfig::from_settings(&self.session_id, &settings),
            self.tx.clone(),
        )?;
        self.settings = settings;

        info!("session {} switched to {language}", self.session_id);
        Ok(())
    }

    /// Stop the poller and release the recognizers. Nothing is dispatched
    /// after this returns.
    pub async fn destroy(mut self) -> Result<()> {
        self.scheduler.cancel();
        let stopped = self.controller.stop().await;
        self.shared.mark_destroyed();
        self.shared.recognizers().close();

        info!("write-to-type session {} destroyed", self.session_id);
        stopped
    }
}

impl Drop for WriteToTypeManager {
    fn drop(&mut self) {
        if self.controller.is_running() {
            warn!(
                "write-to-type session {} dropped without destroy()",
                self.session_id
            );
            self.scheduler.cancel();
            self.shared.mark_destroyed();
        }
    }
}

fn create_recognizers(
    factory: &dyn RecognizerFactory,
    settings: &WriteToTypeSettings,
) -> Result<Recognizers> {
    let scale = settings.scale();
    let text = factory
        .create_recognizer(RecognizerKind::Text, scale, &settings.language)
        .with_context(|| format!("failed to create text recognizer for {}", settings.language))?;
    let gesture = factory
        .create_recognizer(RecognizerKind::Gesture, scale, &settings.language)
        .with_context(|| {
            format!("failed to create gesture recognizer for {}", settings.language)
        })?;
    Ok(Recognizers::new(text, gesture))
}
