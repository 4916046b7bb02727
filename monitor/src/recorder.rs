use std::time::Duration;

use db::models::system_stat::Model as StoredReading;
use sea_orm::DatabaseConnection;
use util::system_health::Sample;

use crate::error::MonitorError;
use crate::session::{Cadence, Session};

/// Owns the store handle and the recording [`Session`].
///
/// Constructed once at startup and handed by reference to the sampling path.
/// The connection stays open for the whole process and is released by
/// [`Recorder::close`].
pub struct Recorder {
    db: DatabaseConnection,
    session: Session,
    schema_ready: bool,
}

impl Recorder {
    pub fn new(db: DatabaseConnection, cadence: Cadence) -> Self {
        Self {
            db,
            session: Session::new(cadence),
            schema_ready: false,
        }
    }

    /// Opens a recording session, creating the table on first use.
    ///
    /// An already open session is restarted with elapsed time back at zero.
    pub async fn start(&mut self) -> Result<(), MonitorError> {
        if !self.schema_ready {
            migration::ensure_schema(&self.db).await?;
            self.schema_ready = true;
        }

        if self.session.start() {
            tracing::warn!("start requested while already recording; elapsed time reset");
        } else {
            tracing::info!(
                cadence_secs = self.session.cadence().seconds(),
                "recording started"
            );
        }
        Ok(())
    }

    /// Closes the session. The store stays open.
    pub fn stop(&mut self) -> bool {
        let stopped = self.session.stop();
        if stopped {
            tracing::info!(elapsed_secs = self.session.elapsed().as_secs(), "recording stopped");
        } else {
            tracing::debug!("stop requested while idle");
        }
        stopped
    }

    /// Appends one row. Only the sampling path calls this, and only while
    /// recording.
    pub(crate) async fn record(&self, sample: &Sample) -> Result<StoredReading, MonitorError> {
        let row = StoredReading::create(
            &self.db,
            sample.cpu_load,
            sample.ram_usage,
            sample.disk_usage,
        )
        .await?;
        tracing::debug!(id = row.id, "reading stored");
        Ok(row)
    }

    pub fn tick_elapsed(&mut self) -> Option<Duration> {
        self.session.tick_elapsed()
    }

    pub fn set_cadence(&mut self, cadence: Cadence) {
        self.session.set_cadence(cadence);
    }

    pub fn is_recording(&self) -> bool {
        self.session.is_active()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Releases the store connection.
    pub async fn close(self) -> Result<(), MonitorError> {
        self.db.close().await?;
        tracing::debug!("database connection closed");
        Ok(())
    }
}
