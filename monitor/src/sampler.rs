use util::system_health::{MetricsSource, Sample};

use crate::display::View;
use crate::error::MonitorError;
use crate::recorder::Recorder;

/// Takes one sample per tick, shows it, and stores it while recording.
pub struct Sampler<S> {
    source: S,
}

impl<S: MetricsSource> Sampler<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Handles one sampling tick.
    ///
    /// A failed host read or insert is returned as-is; there is no retry.
    pub async fn tick<V: View>(
        &mut self,
        recorder: &Recorder,
        view: &mut V,
    ) -> Result<Sample, MonitorError> {
        let sample = self.source.sample()?;
        view.show_sample(&sample)?;

        if recorder.is_recording() {
            recorder.record(&sample).await?;
        }
        Ok(sample)
    }
}
