//! Test doubles for the metrics source and the view.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use util::system_health::{MetricsError, MetricsSource, Sample};

use crate::display::View;
use crate::session::Cadence;

/// Replays scripted samples, then keeps producing `(n, n + 1, n + 2)` where
/// `n` counts every sample taken so far.
#[derive(Debug, Default)]
pub struct ScriptedMetrics {
    script: VecDeque<Sample>,
    taken: u64,
}

impl ScriptedMetrics {
    pub fn new(samples: impl IntoIterator<Item = Sample>) -> Self {
        Self {
            script: samples.into_iter().collect(),
            taken: 0,
        }
    }
}

impl MetricsSource for ScriptedMetrics {
    fn sample(&mut self) -> Result<Sample, MetricsError> {
        self.taken += 1;
        let n = self.taken as f64;
        Ok(self
            .script
            .pop_front()
            .unwrap_or_else(|| Sample::new(n, n + 1.0, n + 2.0)))
    }
}

/// Always fails, like a host without the configured volume.
#[derive(Debug, Default)]
pub struct FailingMetrics;

impl MetricsSource for FailingMetrics {
    fn sample(&mut self) -> Result<Sample, MetricsError> {
        Err(MetricsError::NoMatchingVolume("/".into()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Sample(Sample),
    Cadence(Cadence),
    Elapsed(Duration),
    Recording(bool),
    Hint(String),
}

/// Records every call. Clones share the same event log.
#[derive(Debug, Clone, Default)]
pub struct CapturingView {
    events: Arc<Mutex<Vec<ViewEvent>>>,
}

impl CapturingView {
    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Samples shown while a recording was open, in order.
    pub fn samples_while_recording(&self) -> Vec<Sample> {
        let mut recording = false;
        let mut samples = Vec::new();
        for event in self.events() {
            match event {
                ViewEvent::Recording(active) => recording = active,
                ViewEvent::Sample(s) if recording => samples.push(s),
                _ => {}
            }
        }
        samples
    }

    fn push(&mut self, event: ViewEvent) -> io::Result<()> {
        self.events
            .lock()
            .map_err(|_| io::Error::other("view log poisoned"))?
            .push(event);
        Ok(())
    }
}

impl View for CapturingView {
    fn show_sample(&mut self, sample: &Sample) -> io::Result<()> {
        self.push(ViewEvent::Sample(*sample))
    }

    fn show_cadence(&mut self, cadence: Cadence) -> io::Result<()> {
        self.push(ViewEvent::Cadence(cadence))
    }

    fn show_elapsed(&mut self, elapsed: Duration) -> io::Result<()> {
        self.push(ViewEvent::Elapsed(elapsed))
    }

    fn show_recording(&mut self, recording: bool) -> io::Result<()> {
        self.push(ViewEvent::Recording(recording))
    }

    fn show_hint(&mut self, message: &str) -> io::Result<()> {
        self.push(ViewEvent::Hint(message.to_owned()))
    }
}
