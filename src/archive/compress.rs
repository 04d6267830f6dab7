//! Gzip envelope around the tar stream.
//!
//! Decompression failures are reported as `InvalidArchive`, never as
//! `DecryptionFailed`, so "this is not gzip data" stays distinguishable
//! from "wrong password".

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::errors::{GitVaultError, Result};

/// Default gzip level (same as `gzip -6`).
pub const DEFAULT_LEVEL: u32 = 6;

/// Highest accepted gzip level.
pub const MAX_LEVEL: u32 = 9;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Wrap `inner` in a streaming gzip encoder.
///
/// Call `finish()` on the result to flush the gzip trailer.
pub fn encoder<W: Write>(inner: W, level: u32) -> GzEncoder<W> {
    GzEncoder::new(inner, Compression::new(level.min(MAX_LEVEL)))
}

/// Compress a whole buffer.
pub fn compress(data: &[u8], level: u32) -> Result<Vec<u8>> {
    let mut enc = encoder(Vec::with_capacity(data.len() / 2), level);
    enc.write_all(data)?;
    Ok(enc.finish()?)
}

/// Decompress a whole gzip buffer.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    if !data.starts_with(&GZIP_MAGIC) {
        return Err(GitVaultError::InvalidArchive(
            "not gzip-compressed data".into(),
        ));
    }

    let mut out = Vec::with_capacity(data.len() * 2);
    GzDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(|e| GitVaultError::InvalidArchive(format!("corrupt gzip stream: {e}")))?;
    Ok(out)
}
