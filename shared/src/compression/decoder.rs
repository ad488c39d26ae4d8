cfg_if! {
    if #[cfg(feature = "zstd_support")]
    {
        use zstd::bulk::Decompressor;

        use super::compression_config::SceneCacheEncoding;
        use super::error::DecoderError;

        pub struct Decoder {
            result: Vec<u8>,
            decompressor: Option<Decompressor<'static>>,
        }

        impl Decoder {
            /// Try to create a new Decoder for the given encoding
            pub fn try_new(encoding: SceneCacheEncoding) -> Result<Self, DecoderError> {
                let decompressor = match encoding {
                    SceneCacheEncoding::Plain => None,
                    SceneCacheEncoding::Zstd => {
                        Some(Decompressor::new().map_err(|_| DecoderError::DecompressorCreationFailed)?)
                    }
                };

                Ok(Self {
                    result: Vec::new(),
                    decompressor,
                })
            }

            /// Try to decode a payload whose decoded size was recorded when it
            /// was written.
            ///
            /// SECURITY: This method processes file data. Any malformed payload
            /// returns an error instead of panicking.
            pub fn try_decode(&mut self, payload: &[u8], decoded_size: usize) -> Result<&[u8], DecoderError> {
                match &mut self.decompressor {
                    Some(decompressor) => {
                        self.result = decompressor
                            .decompress(payload, decoded_size)
                            .map_err(|_| DecoderError::DecompressionFailed {
                                payload_size: payload.len(),
                            })?;
                    }
                    None => {
                        self.result = payload.to_vec();
                    }
                }

                if self.result.len() != decoded_size {
                    return Err(DecoderError::SizeMismatch {
                        expected: decoded_size,
                        actual: self.result.len(),
                    });
                }
                Ok(&self.result)
            }
        }
    }
    else
    {
        use super::compression_config::SceneCacheEncoding;
        use super::error::DecoderError;

        pub struct Decoder {
            result: Vec<u8>,
        }

        impl Decoder {
            pub fn try_new(encoding: SceneCacheEncoding) -> Result<Self, DecoderError> {
                if encoding != SceneCacheEncoding::Plain {
                    return Err(DecoderError::UnsupportedEncoding { encoding });
                }
                Ok(Self { result: Vec::new() })
            }

            pub fn try_decode(&mut self, payload: &[u8], decoded_size: usize) -> Result<&[u8], DecoderError> {
                if payload.len() != decoded_size {
                    return Err(DecoderError::SizeMismatch {
                        expected: decoded_size,
                        actual: payload.len(),
                    });
                }
                self.result = payload.to_vec();
                Ok(&self.result)
            }
        }
    }
}
