#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Result};
use kurbo::Rect;
use write_to_type::geometry::EngineScale;
use write_to_type::{
    DebugListener, DispatchReport, Dispatcher, ExportFormat, FieldId, InkSurface,
    MonospaceTextHost, PointerEvent, Recognizer, RecognizerFactory, RecognizerKind, StrokePoint,
    TextFieldHost, ToolKind, WriteToTypeManager, WriteToTypeSettings,
};

pub const NO_GESTURE: &str = r#"{"type":"Gesture","gestures":[{"type":"none"}]}"#;

pub fn gesture(name: &str) -> String {
    format!(r#"{{"type":"Gesture","gestures":[{{"type":"{name}"}}]}}"#)
}

/// Text export for a multi-word label; the longest word is `height` mm tall.
pub fn text(label: &str, height: f64) -> String {
    let words: Vec<String> = label
        .split(' ')
        .map(|word| {
            format!(
                r#"{{"label":"{word}","bounding-box":{{"x":0,"y":0,"width":10,"height":{height}}}}}"#
            )
        })
        .collect();
    format!(
        r#"{{"type":"Text","label":"{label}","words":[{}]}}"#,
        words.join(r#",{"label":" "}"#)
    )
}

/// Text export for one character with its candidate list.
pub fn character(candidates: &[&str], height: f64) -> String {
    let quoted: Vec<String> = candidates.iter().map(|c| format!("\"{c}\"")).collect();
    format!(
        r#"{{"type":"Text","label":"{first}","words":[{{"label":"{first}","candidates":[{list}],"bounding-box":{{"x":0,"y":0,"width":1,"height":{height}}}}}]}}"#,
        first = candidates[0],
        list = quoted.join(",")
    )
}

/// Behaviour of every recognizer of one kind, set by the test.
#[derive(Default)]
pub struct Script {
    export: Mutex<Option<String>>,
    busy: AtomicBool,
    points: AtomicUsize,
    clears: AtomicUsize,
    settles: AtomicUsize,
    closes: AtomicUsize,
}

impl Script {
    pub fn set_export(&self, export: Option<&str>) {
        *self.export.lock().unwrap() = export.map(str::to_string);
    }

    pub fn set_busy(&self, busy: bool) {
        self.busy.store(busy, Ordering::SeqCst);
    }

    pub fn points(&self) -> usize {
        self.points.load(Ordering::SeqCst)
    }

    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }

    /// Completed `wait_for_idle` calls, the last engine call of a reset.
    pub fn settles(&self) -> usize {
        self.settles.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

struct ScriptedRecognizer(Arc<Script>);

impl ScriptedRecognizer {
    fn feed(&self) -> Result<()> {
        self.0.points.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl Recognizer for ScriptedRecognizer {
    fn pointer_down(&self, _x: f32, _y: f32, _t: i64, _p: f32) -> Result<()> {
        self.feed()
    }

    fn pointer_move(&self, _x: f32, _y: f32, _t: i64, _p: f32) -> Result<()> {
        self.feed()
    }

    fn pointer_up(&self, _x: f32, _y: f32, _t: i64, _p: f32) -> Result<()> {
        self.feed()
    }

    fn is_idle(&self) -> bool {
        !self.0.busy.load(Ordering::SeqCst)
    }

    fn wait_for_idle(&self) {
        self.0.settles.fetch_add(1, Ordering::SeqCst);
    }

    fn clear(&self) -> Result<()> {
        self.0.clears.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn result(&self, _format: ExportFormat) -> Option<String> {
        self.0.export.lock().unwrap().clone()
    }

    fn close(&self) {
        self.0.closes.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct ScriptedEngine {
    pub text: Arc<Script>,
    pub gesture: Arc<Script>,
    pub languages: Mutex<Vec<String>>,
    pub unsupported: Mutex<Vec<String>>,
}

impl ScriptedEngine {
    pub fn new(gesture: &str, text: &str) -> Arc<Self> {
        let engine = Self::default();
        engine.gesture.set_export(Some(gesture));
        engine.text.set_export(Some(text));
        Arc::new(engine)
    }

    pub fn created(&self) -> usize {
        self.languages.lock().unwrap().len()
    }
}

impl RecognizerFactory for ScriptedEngine {
    fn create_recognizer(
        &self,
        kind: RecognizerKind,
        _scale: EngineScale,
        language: &str,
    ) -> Result<Box<dyn Recognizer>> {
        if self.unsupported.lock().unwrap().iter().any(|l| l == language) {
            bail!("no resources for {language}");
        }
        self.languages.lock().unwrap().push(language.to_string());
        let script = match kind {
            RecognizerKind::Text => Arc::clone(&self.text),
            RecognizerKind::Gesture => Arc::clone(&self.gesture),
        };
        Ok(Box::new(ScriptedRecognizer(script)))
    }
}

#[derive(Default)]
pub struct RecordingInk {
    animated: AtomicUsize,
    instant: AtomicUsize,
}

impl RecordingInk {
    pub fn animated(&self) -> usize {
        self.animated.load(Ordering::SeqCst)
    }

    pub fn instant(&self) -> usize {
        self.instant.load(Ordering::SeqCst)
    }
}

impl InkSurface for RecordingInk {
    fn clear_strokes(&self, animate: bool) {
        if animate {
            self.animated.fetch_add(1, Ordering::SeqCst);
        } else {
            self.instant.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[derive(Clone, Default)]
pub struct RecordingListener {
    pub debug: Arc<Mutex<Vec<String>>>,
    pub errors: Arc<Mutex<Vec<String>>>,
}

impl DebugListener for RecordingListener {
    fn on_debug(&self, message: &str) {
        self.debug.lock().unwrap().push(message.to_string());
    }

    fn on_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

pub fn settings(commit_timeout_ms: u64) -> WriteToTypeSettings {
    WriteToTypeSettings {
        commit_timeout_ms,
        poll_interval_ms: 1,
        // 1 mm per pixel keeps engine and surface units equal.
        dpi_x: 25.4,
        dpi_y: 25.4,
        ..WriteToTypeSettings::default()
    }
}

pub struct Harness {
    pub engine: Arc<ScriptedEngine>,
    pub ink: Arc<RecordingInk>,
    pub manager: WriteToTypeManager,
    pub dispatcher: Dispatcher,
    pub host: MonospaceTextHost,
    pub field: FieldId,
}

/// A focused single-line field at the origin, 10 px per character.
pub fn harness(engine: Arc<ScriptedEngine>, settings: WriteToTypeSettings, text: &str) -> Harness {
    write_to_type::init_logging();
    let ink = Arc::new(RecordingInk::default());
    let (manager, mut dispatcher) =
        WriteToTypeManager::start(engine.clone(), settings, ink.clone()).unwrap();

    let mut host = MonospaceTextHost::new(10.0, 20.0);
    let field = host.add_field(Rect::new(0.0, 0.0, 400.0, 20.0), text, false);
    assert!(dispatcher.set_default_field(&mut host, field));

    Harness {
        engine,
        ink,
        manager,
        dispatcher,
        host,
        field,
    }
}

impl Harness {
    pub fn text(&self) -> String {
        self.host.text(self.field)
    }

    /// A full stroke through `points`, first sample down, last sample up.
    pub fn stroke(&self, points: &[(f32, f32)]) {
        self.stroke_with(points, ToolKind::Finger);
    }

    pub fn stroke_with(&self, points: &[(f32, f32)], tool: ToolKind) {
        let last = points.len() - 1;
        for (i, &(x, y)) in points.iter().enumerate() {
            let event = match i {
                0 => PointerEvent::Down,
                i if i == last => PointerEvent::Up,
                _ => PointerEvent::Move,
            };
            let point = StrokePoint::new(x, y, 0.5, i as i64 * 8, event).with_tool(tool);
            match event {
                PointerEvent::Down => self.manager.on_stroke_begin(&point, 0),
                PointerEvent::Move => self.manager.on_stroke_move(&point, 0),
                PointerEvent::Up => self.manager.on_stroke_end(&point, 0),
            };
        }
    }

    /// Dispatch until `done` accepts a report; everything dispatched is
    /// returned, the accepted report last.
    pub async fn dispatch_until<F>(&mut self, done: F) -> Vec<DispatchReport>
    where
        F: Fn(&DispatchReport) -> bool,
    {
        let mut reports = Vec::new();
        loop {
            let next = tokio::time::timeout(
                Duration::from_secs(5),
                self.dispatcher.dispatch_next(&mut self.host),
            )
            .await
            .expect("timed out waiting for a dispatch")
            .expect("result channel closed");
            let finished = done(&next);
            reports.push(next);
            if finished {
                return reports;
            }
        }
    }

    /// Wait until the text recognizer settled again after `before` settles,
    /// so the next stroke is not refused by the post-commit reset.
    pub async fn wait_for_reset(&self, before: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.engine.text.settles() <= before {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .expect("recognizers never settled");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    /// Dispatch whatever arrives during `period`.
    pub async fn drain_for(&mut self, period: Duration) -> Vec<DispatchReport> {
        let mut reports = Vec::new();
        let deadline = tokio::time::Instant::now() + period;
        while let Ok(Some(report)) = tokio::time::timeout_at(
            deadline,
            self.dispatcher.dispatch_next(&mut self.host),
        )
        .await
        {
            reports.push(report);
        }
        reports
    }
}

pub fn is_commit(report: &DispatchReport) -> bool {
    matches!(report, DispatchReport::Applied { committed: true, .. })
}
