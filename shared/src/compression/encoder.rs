cfg_if! {
    if #[cfg(feature = "zstd_support")]
    {
        use log::info;

        use zstd::bulk::Compressor;

        use super::compression_config::{CompressionConfig, SceneCacheEncoding};
        use super::error::EncoderError;

        pub struct Encoder {
            result: Vec<u8>,
            compressor: Option<Compressor<'static>>,
        }

        impl Encoder {
            /// Try to create a new Encoder for the given configuration
            pub fn try_new(config: &CompressionConfig) -> Result<Self, EncoderError> {
                let compressor = match config.encoding {
                    SceneCacheEncoding::Plain => None,
                    SceneCacheEncoding::Zstd => {
                        info!("Encoder: zstd level {}", config.level);
                        Some(
                            Compressor::new(config.level).map_err(|_| {
                                EncoderError::CompressorCreationFailed { level: config.level }
                            })?,
                        )
                    }
                };

                Ok(Self {
                    result: Vec::new(),
                    compressor,
                })
            }

            /// The encoding actually produced by this encoder
            pub fn encoding(&self) -> SceneCacheEncoding {
                if self.compressor.is_some() {
                    SceneCacheEncoding::Zstd
                } else {
                    SceneCacheEncoding::Plain
                }
            }

            /// Try to encode a payload, returning error on compression failure
            pub fn try_encode(&mut self, payload: &[u8]) -> Result<&[u8], EncoderError> {
                match &mut self.compressor {
                    Some(compressor) => {
                        self.result = compressor.compress(payload).map_err(|_| {
                            EncoderError::CompressionFailed {
                                payload_size: payload.len(),
                            }
                        })?;
                    }
                    None => {
                        self.result = payload.to_vec();
                    }
                }
                Ok(&self.result)
            }
        }
    }
    else
    {
        use log::warn;

        use super::compression_config::{CompressionConfig, SceneCacheEncoding};
        use super::error::EncoderError;

        pub struct Encoder {
            result: Vec<u8>,
        }

        impl Encoder {
            /// Without `zstd_support` every encoding degrades to `Plain`
            pub fn try_new(config: &CompressionConfig) -> Result<Self, EncoderError> {
                if config.encoding != SceneCacheEncoding::Plain {
                    warn!(
                        "Encoder: {:?} requested but zstd_support is disabled, writing plain records",
                        config.encoding
                    );
                }
                Ok(Self { result: Vec::new() })
            }

            pub fn encoding(&self) -> SceneCacheEncoding {
                SceneCacheEncoding::Plain
            }

            pub fn try_encode(&mut self, payload: &[u8]) -> Result<&[u8], EncoderError> {
                self.result = payload.to_vec();
                Ok(&self.result)
            }
        }
    }
}
