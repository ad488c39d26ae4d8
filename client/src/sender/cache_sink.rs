use log::debug;

use scenesync_shared::{CacheWriterConfig, SceneCacheWriter};

use super::{
    exporter::{ExportReport, ExportSink},
    snapshot::SceneSnapshot,
};
use crate::error::SyncError;

/// Appends each snapshot to a scene cache file as one record at
/// `snapshot.time`. Snapshots arriving faster than the sample rate are
/// skipped.
pub struct CacheFileSink {
    writer: SceneCacheWriter,
}

impl CacheFileSink {
    pub fn create(config: &CacheWriterConfig) -> Result<Self, SyncError> {
        Ok(Self {
            writer: SceneCacheWriter::create(config)?,
        })
    }
}

impl ExportSink for CacheFileSink {
    fn name(&self) -> &'static str {
        "cache-writer"
    }

    fn export(&mut self, snapshot: SceneSnapshot) -> Result<ExportReport, SyncError> {
        if !self.writer.is_due(snapshot.time) {
            debug!("CacheFileSink: skipping frame at {}", snapshot.time);
            return Ok(ExportReport::default());
        }

        let bytes_sent = self.writer.write_scene(&snapshot.to_scene(), snapshot.time)?;
        Ok(ExportReport {
            messages_sent: 1,
            bytes_sent,
        })
    }

    fn finish(&mut self) -> Result<(), SyncError> {
        self.writer.finish()?;
        Ok(())
    }
}
