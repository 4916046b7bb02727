use common::logger::init_logger;
use monitor::app::Monitor;
use monitor::controls::{self, HELP};
use monitor::display::{DisplayFormat, Locale, TerminalView};
use monitor::recorder::Recorder;
use monitor::sampler::Sampler;
use monitor::session::Cadence;
use tokio::sync::mpsc;
use util::system_health::HostMetrics;
use util::{config, paths};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load configuration and initialize logging
    let _log_guard = init_logger(
        &paths::log_dir(),
        &config::log_file(),
        &config::log_level(),
        config::log_to_stdout(),
    );

    tracing::info!(
        project = %config::project_name(),
        env = %config::env(),
        database = %config::database_path(),
        "starting"
    );

    let db = db::connect().await?;
    let recorder = Recorder::new(db, Cadence::clamped(config::sample_interval_seconds()));
    let sampler = Sampler::new(HostMetrics::new(config::disk_path()));
    let view = TerminalView::stdout(
        Locale::from_config(&config::locale()),
        DisplayFormat::from_config(&config::display_format()),
    );

    println!("{} ({HELP})", config::project_name());

    let (tx, rx) = mpsc::channel(16);
    controls::spawn_stdin_reader(tx);

    Monitor::new(sampler, recorder, view)
        .run(rx, controls::shutdown_signal())
        .await?;

    tracing::info!("stopped");
    Ok(())
}
