//! Recording [`ProgressReporter`].

use parking_lot::Mutex;

use crate::domain::LifecycleState;
use crate::port::{ProgressEvent, ProgressReporter};

/// Thread-safe event collector for progress assertions in tests.
#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Number of funding polls reported, failed ones included.
    pub fn funding_polls(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::FundingPoll { .. }))
            .count()
    }

    /// Stages entered, in order.
    pub fn stages(&self) -> Vec<LifecycleState> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::StageEntered { stage } => Some(*stage),
                _ => None,
            })
            .collect()
    }

    /// The stage failure reported, if any.
    pub fn failure(&self) -> Option<(LifecycleState, &'static str)> {
        self.events.lock().iter().find_map(|e| match e {
            ProgressEvent::StageFailed { stage, kind, .. } => Some((*stage, *kind)),
            _ => None,
        })
    }
}

impl ProgressReporter for RecordingReporter {
    fn report(&self, event: ProgressEvent) {
        self.events.lock().push(event);
    }
}
