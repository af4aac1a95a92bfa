//! The three working buffers of a run.
//!
//! Allocated once per benchmark invocation from the chunk size and reused by
//! every iteration of every cell. Nothing here grows: a native call that
//! reports more output than the buffer it was given fails its cell.

use crate::config::MIN_PAD_SIZE;

/// Capacity of the compressed-output buffer for a `chunk`-byte input.
///
/// `chunk + chunk / 6 + MIN_PAD_SIZE` covers the worst-case expansion of
/// every supported codec family on incompressible data.
#[inline]
pub fn compression_bound(chunk: usize) -> usize {
    chunk.saturating_add(chunk / 6).saturating_add(MIN_PAD_SIZE)
}

/// Input, compressed and decompressed buffers for one run.
#[derive(Debug)]
pub struct Buffers {
    input: Vec<u8>,
    compressed: Vec<u8>,
    decompressed: Vec<u8>,
}

impl Buffers {
    /// Allocates buffers for chunks of at most `chunk_size` bytes.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Buffers {
            input: vec![0u8; chunk_size],
            compressed: vec![0u8; compression_bound(chunk_size)],
            decompressed: vec![0u8; chunk_size],
        }
    }

    /// Largest chunk the input buffer holds.
    #[inline]
    pub fn chunk_size(&self) -> usize {
        self.input.len()
    }

    /// Disjoint mutable views of (input, compressed, decompressed).
    pub(crate) fn split_mut(&mut self) -> (&mut [u8], &mut [u8], &mut [u8]) {
        (&mut self.input, &mut self.compressed, &mut self.decompressed)
    }
}
