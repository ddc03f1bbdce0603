//! Chunk planning.
//!
//! A resource of `total` bytes is cut into `total / chunk_size` full chunks
//! followed by one shorter chunk holding the remainder, if any. The spans are
//! disjoint and cover `[0, total)` exactly; [`plan_memory_chunks`] relies on
//! that to hand every worker its own window of the destination buffer.

use bytes::{Bytes, BytesMut};

/// Default chunk size: 64 KiB.
pub const DEFAULT_CHUNK_SIZE: u64 = 64 * 1024;

/// A byte range of the resource, fetched as one ranged request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSpan {
    pub offset: u64,
    pub size: u64,
}

/// A chunk whose bytes land directly in its window of the destination buffer.
#[derive(Debug)]
pub struct MemoryChunk {
    pub offset: u64,
    pub content: BytesMut,
}

/// Cut `total` bytes into spans of `chunk_size` (a zero size counts as one).
///
/// ```rust
/// use splinter::downloader::plan::{plan_chunks, ChunkSpan};
///
/// let spans = plan_chunks(10, 4);
/// assert_eq!(
///     spans,
///     vec![
///         ChunkSpan { offset: 0, size: 4 },
///         ChunkSpan { offset: 4, size: 4 },
///         ChunkSpan { offset: 8, size: 2 },
///     ]
/// );
/// ```
pub fn plan_chunks(total: u64, chunk_size: u64) -> Vec<ChunkSpan> {
    let chunk_size = chunk_size.max(1);
    let full = total / chunk_size;
    let mut spans = Vec::with_capacity(full as usize + 1);

    let mut offset = 0;
    for _ in 0..full {
        spans.push(ChunkSpan {
            offset,
            size: chunk_size,
        });
        offset += chunk_size;
    }
    if offset < total {
        spans.push(ChunkSpan {
            offset,
            size: total - offset,
        });
    }
    spans
}

/// Allocate one zeroed buffer of `total` bytes and split it along the plan.
pub fn plan_memory_chunks(total: u64, chunk_size: u64) -> Vec<MemoryChunk> {
    let mut rest = BytesMut::zeroed(total as usize);
    plan_chunks(total, chunk_size)
        .into_iter()
        .map(|span| MemoryChunk {
            offset: span.offset,
            content: rest.split_to(span.size as usize),
        })
        .collect()
}

/// Join completed windows back into one buffer, in offset order.
///
/// Windows split from the same allocation are re-joined without copying.
pub fn assemble(mut chunks: Vec<MemoryChunk>) -> Bytes {
    chunks.sort_unstable_by_key(|chunk| chunk.offset);
    let mut chunks = chunks.into_iter();
    let Some(first) = chunks.next() else {
        return Bytes::new();
    };
    let mut buf = first.content;
    for chunk in chunks {
        buf.unsplit(chunk.content);
    }
    buf.freeze()
}
