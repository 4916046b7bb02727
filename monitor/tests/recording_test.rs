use std::time::Duration;

use db::models::system_stat::Model as StoredReading;
use monitor::app::Monitor;
use monitor::controls::Command;
use monitor::recorder::Recorder;
use monitor::sampler::Sampler;
use monitor::session::Cadence;
use monitor::test_helpers::{CapturingView, ScriptedMetrics, ViewEvent};
use tempfile::TempDir;
use tokio::sync::mpsc;
use util::system_health::Sample;

fn db_path(tmp: &TempDir) -> String {
    tmp.path()
        .join("system_monitor.db")
        .to_string_lossy()
        .to_string()
}

#[tokio::test]
async fn recorded_session_survives_restart() {
    let tmp = TempDir::new().unwrap();
    let path = db_path(&tmp);

    let db = db::connect_to(&path).await.unwrap();
    let mut recorder = Recorder::new(db, Cadence::default());
    let mut sampler = Sampler::new(ScriptedMetrics::new([
        Sample::new(10.0, 20.0, 30.0),
        Sample::new(15.0, 25.0, 35.0),
    ]));
    let mut view = CapturingView::default();

    recorder.start().await.unwrap();
    sampler.tick(&recorder, &mut view).await.unwrap();
    sampler.tick(&recorder, &mut view).await.unwrap();
    recorder.stop();
    // Idle ticks after stop must not add rows.
    sampler.tick(&recorder, &mut view).await.unwrap();
    recorder.close().await.unwrap();

    let db = db::connect_to(&path).await.unwrap();
    let rows = StoredReading::all_in_order(&db).await.unwrap();

    let values: Vec<(f64, f64, f64)> = rows
        .iter()
        .map(|r| (r.cpu_load, r.ram_usage, r.disk_usage))
        .collect();
    assert_eq!(values, vec![(10.0, 20.0, 30.0), (15.0, 25.0, 35.0)]);
    assert!(rows[0].timestamp <= rows[1].timestamp);
    assert!(rows[0].id < rows[1].id);

    db.close().await.unwrap();
}

#[tokio::test]
async fn live_loop_stores_exactly_the_samples_shown_while_recording() {
    let tmp = TempDir::new().unwrap();
    let path = db_path(&tmp);

    let db = db::connect_to(&path).await.unwrap();
    let recorder = Recorder::new(db, Cadence::MIN);
    let view = CapturingView::default();
    let monitor = Monitor::new(
        Sampler::new(ScriptedMetrics::default()),
        recorder,
        view.clone(),
    );
    let (tx, rx) = mpsc::channel(8);

    let driver = async move {
        tx.send(Ok(Command::Start)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(2_500)).await;
        tx.send(Ok(Command::Stop)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(2_200)).await;
        tx.send(Ok(Command::Quit)).await.unwrap();
    };

    let (outcome, ()) = tokio::join!(monitor.run(rx, std::future::pending::<()>()), driver);
    outcome.unwrap();

    let recorded = view.samples_while_recording();
    assert!(!recorded.is_empty());

    let events = view.events();
    let shown = events
        .iter()
        .filter(|e| matches!(e, ViewEvent::Sample(_)))
        .count();
    assert!(shown > recorded.len(), "idle ticks after stop are still shown");

    // Elapsed only advanced while recording.
    let stop_at = events
        .iter()
        .position(|e| *e == ViewEvent::Recording(false))
        .unwrap();
    assert!(
        events[stop_at..]
            .iter()
            .all(|e| !matches!(e, ViewEvent::Elapsed(_)))
    );
    assert!(
        events[..stop_at]
            .iter()
            .any(|e| *e == ViewEvent::Elapsed(Duration::from_secs(1)))
    );

    let db = db::connect_to(&path).await.unwrap();
    let rows = StoredReading::all_in_order(&db).await.unwrap();
    let stored: Vec<Sample> = rows
        .iter()
        .map(|r| Sample::new(r.cpu_load, r.ram_usage, r.disk_usage))
        .collect();
    assert_eq!(stored, recorded);

    db.close().await.unwrap();
}
