//! Stroke routing and the background recognition poller.

mod controller;
pub(crate) mod jiix;
mod loop_worker;
mod router;
pub(crate) mod session;
#[cfg(test)]
pub(crate) mod testing;

pub(crate) use controller::RecognitionController;
pub(crate) use loop_worker::{PollerConfig, RecognitionEvent};
pub(crate) use router::StrokeRouter;
pub(crate) use session::{Recognizers, SessionShared};
