//! # Deflate Compression
//!
//! Pure, stateless compression used by the worker threads. Each input buffer
//! is deflated independently with a fresh encoder, so the function is safe to
//! call concurrently from any number of threads.
//!
//! The output is a *raw* deflate stream (no zlib/gzip framing), which is what
//! the archive layer stores verbatim as an entry payload.

use flate2::{Compress, Compression, FlushCompress, Status};

use crate::ArchiveError;

/// Scratch buffer size for draining encoder output per iteration.
const SCRATCH_SIZE: usize = 1024 * 1024; // 1 MiB

/// Highest deflate level accepted by the encoder.
pub const MAX_LEVEL: u32 = 9;

/// Compresses `input` into a raw deflate stream at the given level (0-9).
///
/// The whole input is fed in one pass; output is drained into a fixed-size
/// scratch buffer until the encoder reports the stream finished. On any
/// failure the partial output is discarded, never returned.
///
/// Empty input is valid and yields the (tiny) deflate encoding of an empty
/// stream.
pub fn compress(input: &[u8], level: u32) -> Result<Vec<u8>, ArchiveError> {
    if level > MAX_LEVEL {
        return Err(ArchiveError::CompressionInit(level));
    }

    // `false` ⇒ raw deflate, no zlib header.
    let mut encoder = Compress::new(Compression::new(level), false);
    let mut out = Vec::with_capacity((input.len() / 2).max(64));
    let mut scratch = vec![0u8; SCRATCH_SIZE];

    loop {
        let consumed = encoder.total_in() as usize;
        let flush = if consumed == input.len() {
            FlushCompress::Finish
        } else {
            FlushCompress::None
        };

        let before_out = encoder.total_out();
        let status = encoder
            .compress(&input[consumed..], &mut scratch, flush)
            .map_err(|e| ArchiveError::CompressionStream(e.to_string()))?;
        let produced = (encoder.total_out() - before_out) as usize;
        out.extend_from_slice(&scratch[..produced]);

        match status {
            Status::StreamEnd => break,
            Status::Ok => {}
            // We always hand the encoder a fully drained scratch buffer, so a
            // buffer stall means the stream cannot make progress at all.
            Status::BufError => {
                if produced == 0 && encoder.total_in() as usize == consumed {
                    return Err(ArchiveError::CompressionStream(
                        "encoder stalled without consuming input".into(),
                    ));
                }
            }
        }
    }

    Ok(out)
}
