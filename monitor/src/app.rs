//! The single-threaded event loop.
//!
//! One `select!` services the shutdown signal, the sampling ticker, the
//! one-second elapsed ticker (armed only while recording) and user controls,
//! polled in that order. A
//! branch's handler runs to completion before anything else is polled, so
//! ticks never overlap and rows are inserted in tick order.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use util::system_health::MetricsSource;

use crate::controls::{Command, Control, HELP};
use crate::display::View;
use crate::error::MonitorError;
use crate::recorder::Recorder;
use crate::sampler::Sampler;
use crate::ticker::{Ticker, tick_if_armed};

const ELAPSED_STEP: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct Monitor<S, V> {
    sampler: Sampler<S>,
    recorder: Recorder,
    view: V,
    sampling: Ticker,
    elapsed: Option<Ticker>,
}

impl<S: MetricsSource, V: View> Monitor<S, V> {
    /// Must be called from within a tokio runtime: the sampling ticker starts
    /// counting immediately.
    pub fn new(sampler: Sampler<S>, recorder: Recorder, view: V) -> Self {
        let sampling = Ticker::every(recorder.session().cadence().period());
        Self {
            sampler,
            recorder,
            view,
            sampling,
            elapsed: None,
        }
    }

    /// Runs until `quit`, `shutdown` resolving, or a fatal error, then closes
    /// the store. The store is closed on every one of those paths.
    pub async fn run<F>(
        mut self,
        mut controls: mpsc::Receiver<Control>,
        shutdown: F,
    ) -> Result<(), MonitorError>
    where
        F: Future<Output = ()>,
    {
        let outcome = self.drive(&mut controls, shutdown).await;
        if let Err(err) = &outcome {
            tracing::error!("monitor stopped: {err}");
        }

        let closed = self.recorder.close().await;
        outcome.and(closed)
    }

    async fn drive<F>(
        &mut self,
        controls: &mut mpsc::Receiver<Control>,
        shutdown: F,
    ) -> Result<(), MonitorError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut controls_open = true;
        self.view.show_cadence(self.recorder.session().cadence())?;

        loop {
            tokio::select! {
                biased;

                () = &mut shutdown => return Ok(()),

                // Due ticks go before input so a burst of commands cannot
                // hold sampling back.
                _ = self.sampling.tick() => {
                    self.sampler.tick(&self.recorder, &mut self.view).await?;
                }

                _ = tick_if_armed(&mut self.elapsed) => {
                    if let Some(elapsed) = self.recorder.tick_elapsed() {
                        self.view.show_elapsed(elapsed)?;
                    }
                }

                control = controls.recv(), if controls_open => match control {
                    Some(Ok(command)) => {
                        if self.apply(command).await? == Flow::Quit {
                            tracing::info!("quit requested");
                            return Ok(());
                        }
                    }
                    Some(Err(err)) => self.view.show_hint(&err.to_string())?,
                    None => {
                        tracing::debug!("control channel closed");
                        controls_open = false;
                    }
                },
            }
        }
    }

    async fn apply(&mut self, command: Command) -> Result<Flow, MonitorError> {
        match command {
            Command::Start => {
                self.recorder.start().await?;
                self.elapsed = Some(Ticker::every(ELAPSED_STEP));
                self.view.show_recording(true)?;
                self.view.show_elapsed(self.recorder.session().elapsed())?;
            }
            Command::Stop => {
                self.recorder.stop();
                self.elapsed = None;
                self.view.show_recording(false)?;
            }
            Command::SetCadence(cadence) => {
                self.recorder.set_cadence(cadence);
                self.sampling.reschedule(cadence.period());
                tracing::debug!(seconds = cadence.seconds(), "cadence changed");
                self.view.show_cadence(cadence)?;
            }
            Command::Help => self.view.show_hint(HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Cadence;
    use crate::test_helpers::{CapturingView, FailingMetrics, ScriptedMetrics, ViewEvent};
    use crate::controls::ParseCommandError;
    use db::test_utils::setup_test_db;
    use tokio::time;

    async fn monitor<S: MetricsSource>(source: S, view: CapturingView) -> Monitor<S, CapturingView> {
        let recorder = Recorder::new(setup_test_db().await, Cadence::MAX);
        Monitor::new(Sampler::new(source), recorder, view)
    }

    #[tokio::test]
    async fn commands_are_applied_in_order_until_quit() {
        let view = CapturingView::default();
        let monitor = monitor(ScriptedMetrics::default(), view.clone()).await;
        let (tx, rx) = mpsc::channel(8);

        for control in [
            Ok(Command::SetCadence(Cadence::clamped(2))),
            Err(ParseCommandError::Empty),
            Ok(Command::Start),
            Ok(Command::Stop),
            Ok(Command::Quit),
        ] {
            tx.send(control).await.unwrap();
        }

        monitor
            .run(rx, std::future::pending::<()>())
            .await
            .unwrap();

        assert_eq!(
            view.events(),
            vec![
                ViewEvent::Cadence(Cadence::MAX),
                ViewEvent::Cadence(Cadence::clamped(2)),
                ViewEvent::Hint("empty command".into()),
                ViewEvent::Recording(true),
                ViewEvent::Elapsed(Duration::ZERO),
                ViewEvent::Recording(false),
            ]
        );
    }

    fn samples_shown(view: &CapturingView) -> usize {
        view.events()
            .iter()
            .filter(|e| matches!(e, ViewEvent::Sample(_)))
            .count()
    }

    #[tokio::test]
    async fn cadence_change_reschedules_sampling() {
        let view = CapturingView::default();
        let recorder = Recorder::new(setup_test_db().await, Cadence::MAX);
        // The store is idle until quit, so only the tickers see paused time.
        time::pause();
        let monitor = Monitor::new(
            Sampler::new(ScriptedMetrics::default()),
            recorder,
            view.clone(),
        );
        let (tx, rx) = mpsc::channel(8);

        let driver = {
            let view = view.clone();
            async move {
                tx.send(Ok(Command::SetCadence(Cadence::clamped(2))))
                    .await
                    .unwrap();

                // Ticks land 2s, 4s and 6s after the change: none early,
                // one per step, none doubled at the switch.
                time::sleep(Duration::from_millis(1_900)).await;
                let mut seen = vec![samples_shown(&view)];
                for _ in 0..3 {
                    time::sleep(Duration::from_secs(2)).await;
                    seen.push(samples_shown(&view));
                }

                time::resume();
                tx.send(Ok(Command::Quit)).await.unwrap();
                seen
            }
        };

        let (outcome, seen) =
            tokio::join!(monitor.run(rx, std::future::pending::<()>()), driver);
        outcome.unwrap();

        assert_eq!(seen, vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn due_sample_is_taken_before_queued_commands() {
        let view = CapturingView::default();
        let recorder = Recorder::new(setup_test_db().await, Cadence::MIN);
        time::pause();
        let monitor = Monitor::new(
            Sampler::new(ScriptedMetrics::default()),
            recorder,
            view.clone(),
        );
        let (tx, rx) = mpsc::channel(8);
        tx.send(Ok(Command::Help)).await.unwrap();
        tx.send(Ok(Command::Quit)).await.unwrap();
        time::advance(Cadence::MIN.period()).await;
        time::resume();

        monitor
            .run(rx, std::future::pending::<()>())
            .await
            .unwrap();

        let events = view.events();
        assert_eq!(events[0], ViewEvent::Cadence(Cadence::MIN));
        assert!(matches!(events[1], ViewEvent::Sample(_)));
        assert_eq!(events[2], ViewEvent::Hint(HELP.into()));
    }

    #[tokio::test]
    async fn shutdown_ends_the_loop() {
        let view = CapturingView::default();
        let monitor = monitor(ScriptedMetrics::default(), view.clone()).await;
        let (_tx, rx) = mpsc::channel(1);

        monitor.run(rx, async {}).await.unwrap();

        assert_eq!(view.events(), vec![ViewEvent::Cadence(Cadence::MAX)]);
    }

    #[tokio::test]
    async fn metrics_failure_ends_the_loop_with_error() {
        let view = CapturingView::default();
        let recorder = Recorder::new(setup_test_db().await, Cadence::MIN);
        let monitor = Monitor::new(Sampler::new(FailingMetrics), recorder, view.clone());
        let (_tx, rx) = mpsc::channel(1);

        let err = monitor
            .run(rx, std::future::pending::<()>())
            .await
            .unwrap_err();

        assert!(matches!(err, MonitorError::Metrics(_)));
    }
}
