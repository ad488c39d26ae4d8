use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use log::{info, warn};

use crate::{
    compression::{compression_config::CompressionConfig, encoder::Encoder},
    scene_graph::scene::Scene,
};

use super::{
    error::SceneCacheError,
    header::{RecordHeader, SceneCacheHeader, RECORD_HEADER_SIZE},
};

/// Settings for a scene cache file
#[derive(Clone, Debug)]
pub struct CacheWriterConfig {
    /// Destination file, truncated on open
    pub path: PathBuf,
    /// Samples per second. Frames closer together than `1 / sample_rate`
    /// are not due for writing
    pub sample_rate: f32,
    pub compression: CompressionConfig,
}

impl CacheWriterConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }
}

impl Default for CacheWriterConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("scene.sscf"),
            sample_rate: 30.0,
            compression: CompressionConfig::default(),
        }
    }
}

/// Appends time-stamped, compressed scene records to a file
pub struct SceneCacheWriter {
    path: PathBuf,
    file: Option<BufWriter<File>>,
    encoder: Encoder,
    sample_rate: f32,
    last_time: Option<f32>,
    record_count: usize,
}

impl SceneCacheWriter {
    pub fn create(config: &CacheWriterConfig) -> Result<Self, SceneCacheError> {
        let encoder = Encoder::try_new(&config.compression)?;

        let mut file = BufWriter::new(File::create(&config.path)?);
        SceneCacheHeader::new(config.sample_rate, encoder.encoding(), config.compression.level)
            .write(&mut file)?;

        info!(
            "SceneCacheWriter: opened {} ({:?}, {} samples/s)",
            config.path.display(),
            encoder.encoding(),
            config.sample_rate
        );

        Ok(Self {
            path: config.path.clone(),
            file: Some(file),
            encoder,
            sample_rate: config.sample_rate,
            last_time: None,
            record_count: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Whether a frame at `time` is at least one sample interval past the
    /// last written record
    pub fn is_due(&self, time: f32) -> bool {
        match self.last_time {
            None => true,
            Some(last) if self.sample_rate <= 0.0 => time > last,
            Some(last) => time - last >= (1.0 / self.sample_rate) - 1e-4,
        }
    }

    /// Appends one record and flushes it; returns the number of bytes
    /// written. A failed write closes the writer.
    pub fn write_scene(&mut self, scene: &Scene, time: f32) -> Result<u64, SceneCacheError> {
        let file = self.file.as_mut().ok_or_else(|| SceneCacheError::Io {
            kind: std::io::ErrorKind::BrokenPipe,
            message: "scene cache writer already finished".to_string(),
        })?;

        let decoded = scene.to_bytes();
        let encoded = self.encoder.try_encode(&decoded)?;

        let record = RecordHeader {
            time,
            encoded_size: encoded.len() as u64,
            decoded_size: decoded.len() as u64,
        };
        let mut bytes = Vec::with_capacity(RECORD_HEADER_SIZE as usize + encoded.len());
        record.write(&mut bytes)?;
        bytes.extend_from_slice(encoded);

        // a record that only partly reached the file ends the file there
        if let Err(err) = file.write_all(&bytes).and_then(|()| file.flush()) {
            warn!(
                "SceneCacheWriter: closing {} after a failed write: {}",
                self.path.display(),
                err
            );
            self.file = None;
            return Err(err.into());
        }

        self.last_time = Some(time);
        self.record_count += 1;
        Ok(RECORD_HEADER_SIZE + record.encoded_size)
    }

    /// Writes the terminator and flushes. Further writes fail.
    pub fn finish(&mut self) -> Result<(), SceneCacheError> {
        let Some(mut file) = self.file.take() else {
            return Ok(());
        };
        RecordHeader::terminator().write(&mut file)?;
        file.flush()?;
        info!(
            "SceneCacheWriter: closed {} after {} records",
            self.path.display(),
            self.record_count
        );
        Ok(())
    }
}

impl Drop for SceneCacheWriter {
    fn drop(&mut self) {
        if let Err(err) = self.finish() {
            warn!("SceneCacheWriter: failed to finish {}: {}", self.path.display(), err);
        }
    }
}
