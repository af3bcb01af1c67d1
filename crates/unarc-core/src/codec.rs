//! Single-stream decompression codecs.

use std::io::Read;

use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use xz2::read::XzDecoder;
use xz2::stream::Stream;

use crate::ExtractError;
use crate::Result;

/// A single-stream compression codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    /// GZip (`.gz`).
    Gzip,
    /// BZip2 (`.bz2`).
    Bzip2,
    /// XZ (`.xz`).
    Xz,
    /// Raw LZMA, the lzma_alone container (`.lzma`).
    Lzma,
}

impl Codec {
    /// Lowercase format name, used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Xz => "xz",
            Self::Lzma => "lzma",
        }
    }

    /// File extension this codec strips from an input name.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Gzip => "gz",
            Self::Bzip2 => "bz2",
            Self::Xz => "xz",
            Self::Lzma => "lzma",
        }
    }

    /// Decompresses one complete stream in a single pass.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Codec`] when the stream is corrupted or
    /// truncated.
    pub fn decompress(self, data: &[u8]) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        let result = match self {
            Self::Gzip => GzDecoder::new(data).read_to_end(&mut output),
            Self::Bzip2 => BzDecoder::new(data).read_to_end(&mut output),
            Self::Xz => XzDecoder::new(data).read_to_end(&mut output),
            Self::Lzma => {
                let stream =
                    Stream::new_lzma_decoder(u64::MAX).map_err(|e| ExtractError::Codec {
                        format: self.name(),
                        reason: e.to_string(),
                    })?;
                XzDecoder::new_stream(data, stream).read_to_end(&mut output)
            }
        };
        result.map_err(|e| ExtractError::Codec {
            format: self.name(),
            reason: e.to_string(),
        })?;
        Ok(output)
    }
}
