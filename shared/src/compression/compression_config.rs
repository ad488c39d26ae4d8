/// Encoding of scene records in a cache file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum SceneCacheEncoding {
    #[default]
    Plain = 0,
    Zstd = 1,
}

impl SceneCacheEncoding {
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(SceneCacheEncoding::Plain),
            1 => Some(SceneCacheEncoding::Zstd),
            _ => None,
        }
    }

    /// Whether this build can encode and decode the encoding
    pub fn is_supported(&self) -> bool {
        match self {
            SceneCacheEncoding::Plain => true,
            SceneCacheEncoding::Zstd => cfg!(feature = "zstd_support"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompressionConfig {
    pub encoding: SceneCacheEncoding,
    /// zstd compression level; ignored for `Plain`
    pub level: i32,
}

impl CompressionConfig {
    pub fn new(encoding: SceneCacheEncoding, level: i32) -> Self {
        Self { encoding, level }
    }

    pub fn plain() -> Self {
        Self::new(SceneCacheEncoding::Plain, 0)
    }
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            encoding: SceneCacheEncoding::Zstd,
            level: 3,
        }
    }
}
