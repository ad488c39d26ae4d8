use std::{
    fs::File,
    io::{BufReader, ErrorKind, Read, Seek, SeekFrom},
    path::Path,
};

use log::{info, warn};

use crate::{compression::decoder::Decoder, scene_graph::scene::Scene};

use super::{
    error::SceneCacheError,
    header::{RecordHeader, SceneCacheHeader, HEADER_SIZE, MAX_RECORD_SIZE, RECORD_HEADER_SIZE},
};

#[derive(Clone, Copy, Debug)]
struct RecordEntry {
    time: f32,
    offset: u64,
    encoded_size: u64,
    decoded_size: u64,
}

/// Random access over the records of a scene cache file
pub struct SceneCacheReader {
    file: BufReader<File>,
    header: SceneCacheHeader,
    decoder: Decoder,
    records: Vec<RecordEntry>,
}

impl SceneCacheReader {
    /// Opens `path` and indexes every record. A missing terminator or a
    /// truncated final record ends the index without failing.
    ///
    /// SECURITY: record sizes come from the file. Sizes that overflow the
    /// file offset or exceed `MAX_RECORD_SIZE` return `CorruptRecord`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SceneCacheError> {
        let path = path.as_ref();
        let mut file = BufReader::new(File::open(path)?);
        let header = SceneCacheHeader::read(&mut file)?;
        let decoder = Decoder::try_new(header.encoding)?;
        let file_len = file.get_ref().metadata()?.len();

        let mut records = Vec::new();
        let mut offset = HEADER_SIZE;
        loop {
            let record = match RecordHeader::read(&mut file) {
                Ok(record) => record,
                Err(err) if err.kind() == ErrorKind::UnexpectedEof => break,
                Err(err) => return Err(err.into()),
            };
            if record.is_terminator() {
                break;
            }

            let corrupt = SceneCacheError::CorruptRecord { offset };
            if record.decoded_size > MAX_RECORD_SIZE {
                return Err(corrupt);
            }
            let data_offset = offset + RECORD_HEADER_SIZE;
            let record_end = data_offset
                .checked_add(record.encoded_size)
                .ok_or(corrupt)?;
            if record_end > file_len {
                warn!(
                    "SceneCacheReader: {} ends inside a record, ignoring it",
                    path.display()
                );
                break;
            }

            records.push(RecordEntry {
                time: record.time,
                offset: data_offset,
                encoded_size: record.encoded_size,
                decoded_size: record.decoded_size,
            });
            offset = record_end;
            file.seek(SeekFrom::Start(offset))?;
        }

        records.sort_by(|a, b| a.time.total_cmp(&b.time));

        info!(
            "SceneCacheReader: opened {} ({} records)",
            path.display(),
            records.len()
        );

        Ok(Self {
            file,
            header,
            decoder,
            records,
        })
    }

    pub fn header(&self) -> &SceneCacheHeader {
        &self.header
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sample time of every record, ascending
    pub fn times(&self) -> impl Iterator<Item = f32> + '_ {
        self.records.iter().map(|record| record.time)
    }

    pub fn time_range(&self) -> Option<(f32, f32)> {
        Some((self.records.first()?.time, self.records.last()?.time))
    }

    pub fn get_by_index(&mut self, index: usize) -> Result<Scene, SceneCacheError> {
        let record = *self
            .records
            .get(index)
            .ok_or(SceneCacheError::IndexOutOfRange {
                index,
                len: self.records.len(),
            })?;

        self.file.seek(SeekFrom::Start(record.offset))?;
        let mut encoded = Vec::new();
        (&mut self.file)
            .take(record.encoded_size)
            .read_to_end(&mut encoded)?;

        let decoded = self
            .decoder
            .try_decode(&encoded, record.decoded_size as usize)?;
        Ok(Scene::from_bytes(decoded)?)
    }

    /// Index of the last record at or before `time`, clamped to the ends
    pub fn frame_by_time(&self, time: f32) -> Option<usize> {
        if self.records.is_empty() {
            return None;
        }
        let after = self.records.partition_point(|record| record.time <= time);
        Some(after.saturating_sub(1))
    }

    /// Scene at `time`. Times outside the recorded range clamp to the first
    /// or last record. With `lerp`, times between two records interpolate
    /// entity state between them.
    pub fn get_by_time(&mut self, time: f32, lerp: bool) -> Result<Scene, SceneCacheError> {
        let index = self.frame_by_time(time).ok_or(SceneCacheError::Empty)?;
        let current = self.records[index];

        let next = match self.records.get(index + 1) {
            Some(next) if lerp && time > current.time => *next,
            _ => return self.get_by_index(index),
        };

        let span = next.time - current.time;
        if span <= f32::EPSILON {
            return self.get_by_index(index);
        }

        let a = self.get_by_index(index)?;
        let b = self.get_by_index(index + 1)?;
        Ok(Scene::lerp(&a, &b, (time - current.time) / span))
    }
}
