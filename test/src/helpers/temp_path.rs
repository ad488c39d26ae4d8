use std::{
    path::{Path, PathBuf},
    process,
    time::{SystemTime, UNIX_EPOCH},
};

/// A file path in the system temp dir, removed on drop
pub struct TempPath {
    path: PathBuf,
}

impl TempPath {
    pub fn new(name: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.subsec_nanos())
            .unwrap_or_default();
        let file_name = format!(
            "scenesync-{}-{}-{}-{}",
            name,
            process::id(),
            nanos,
            fastrand::u32(..)
        );
        Self {
            path: std::env::temp_dir().join(file_name),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempPath {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}
