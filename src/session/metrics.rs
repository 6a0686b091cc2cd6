use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use super::SessionState;
use crate::analysis::HealthStatus;

/// How a single analysis ended, as seen by observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisOutcome {
    Completed(HealthStatus),
    Failed,
}

/// Observer pattern for session events
pub trait SessionObserver: Send {
    fn on_transition(&mut self, sequence: u64, from: &SessionState, to: &SessionState);
    fn on_busy_rejected(&mut self, in_flight: u64);
    fn on_superseded(&mut self, superseded: u64);
    fn on_stale_result(&mut self, sequence: u64);
    fn on_analysis_finished(&mut self, sequence: u64, outcome: AnalysisOutcome, elapsed: Duration);
}

/// Fans session events out to every registered observer
#[derive(Default)]
pub struct ObserverSet {
    observers: Vec<Box<dyn SessionObserver>>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn SessionObserver>) {
        self.observers.push(observer);
    }

    pub fn notify_transition(&mut self, sequence: u64, from: &SessionState, to: &SessionState) {
        for observer in &mut self.observers {
            observer.on_transition(sequence, from, to);
        }
    }

    pub fn notify_busy_rejected(&mut self, in_flight: u64) {
        for observer in &mut self.observers {
            observer.on_busy_rejected(in_flight);
        }
    }

    pub fn notify_superseded(&mut self, superseded: u64) {
        for observer in &mut self.observers {
            observer.on_superseded(superseded);
        }
    }

    pub fn notify_stale_result(&mut self, sequence: u64) {
        for observer in &mut self.observers {
            observer.on_stale_result(sequence);
        }
    }

    pub fn notify_analysis_finished(
        &mut self,
        sequence: u64,
        outcome: AnalysisOutcome,
        elapsed: Duration,
    ) {
        for observer in &mut self.observers {
            observer.on_analysis_finished(sequence, outcome, elapsed);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStats {
    pub submissions: usize,
    pub busy_rejections: usize,
    pub superseded: usize,
    pub stale_results: usize,
    pub completed_by_status: [usize; 3],
    pub failed: usize,
    pub transitions: usize,
    pub average_latency_ms: f32,
}

impl SessionStats {
    pub fn completed(&self, status: HealthStatus) -> usize {
        self.completed_by_status[status.index()]
    }

    pub fn total_completed(&self) -> usize {
        self.completed_by_status.iter().sum()
    }
}

/// Accumulates [`SessionStats`] behind a shared handle.
#[derive(Debug, Clone, Default)]
pub struct StatsObserver {
    stats: Arc<Mutex<SessionStats>>,
}

impl StatsObserver {
    // EWMA smoothing factor
    const ALPHA: f32 = 0.2;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> SessionStats {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionStats> {
        self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionObserver for StatsObserver {
    fn on_transition(&mut self, _sequence: u64, _from: &SessionState, to: &SessionState) {
        let mut stats = self.lock();
        stats.transitions += 1;
        if matches!(to, SessionState::ImageLoaded(_)) {
            stats.submissions += 1;
        }
    }

    fn on_busy_rejected(&mut self, _in_flight: u64) {
        self.lock().busy_rejections += 1;
    }

    fn on_superseded(&mut self, _superseded: u64) {
        self.lock().superseded += 1;
    }

    fn on_stale_result(&mut self, _sequence: u64) {
        self.lock().stale_results += 1;
    }

    fn on_analysis_finished(&mut self, _sequence: u64, outcome: AnalysisOutcome, elapsed: Duration) {
        let mut stats = self.lock();
        match outcome {
            AnalysisOutcome::Completed(status) => stats.completed_by_status[status.index()] += 1,
            AnalysisOutcome::Failed => stats.failed += 1,
        }

        let latency_ms = elapsed.as_secs_f32() * 1000.0;
        let finished = stats.total_completed() + stats.failed;
        stats.average_latency_ms = if finished == 1 {
            latency_ms
        } else {
            Self::ALPHA * latency_ms + (1.0 - Self::ALPHA) * stats.average_latency_ms
        };
    }
}
