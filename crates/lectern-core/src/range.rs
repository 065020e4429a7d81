//! Byte-range negotiation for HTTP `Range` request headers.
//!
//! Only the single prefix-anchored form `bytes=<start>-[end]` is supported,
//! which is the minimum a browser video element needs for seeking. Suffix
//! ranges (`bytes=-500`) and multi-range lists are deliberately unsupported
//! and treated like an absent header; this is a known limitation versus full
//! RFC 7233, not an oversight.
//!
//! Negotiation works against the metadata record's size, never a live store
//! stat, so there is exactly one size source per request.

/// Outcome of negotiating a `Range` header against an object's total size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeDecision {
    /// Serve the whole object with a 200.
    FullContent,
    /// Serve the closed interval `[start, end]` with a 206.
    PartialContent { start: u64, end: u64 },
    /// The range is recognized but outside the object's bounds; respond 416.
    NotSatisfiable,
}

/// Negotiate an optional `Range` header value against `total_bytes`.
///
/// Absent or syntactically invalid headers fall back to
/// [`RangeDecision::FullContent`]. A parsed range with `start >= total_bytes`,
/// or with `start > end` after clamping, is [`RangeDecision::NotSatisfiable`].
/// An omitted or oversized end is clamped to `total_bytes - 1`.
pub fn negotiate(header: Option<&str>, total_bytes: u64) -> RangeDecision {
    let Some(header) = header else {
        return RangeDecision::FullContent;
    };
    match parse_prefix_range(header) {
        Some((start, end)) => satisfiable(start, end, total_bytes),
        None => RangeDecision::FullContent,
    }
}

/// Parse `bytes=<start>-[end]`. Returns `None` for anything else, including
/// suffix ranges and multi-range lists.
fn parse_prefix_range(header: &str) -> Option<(u64, Option<u64>)> {
    let spec = header.trim().strip_prefix("bytes=")?;
    if spec.contains(',') {
        // multi-range list
        return None;
    }
    let (start, end) = spec.split_once('-')?;
    let start = start.trim();
    if start.is_empty() {
        // suffix form bytes=-<len>
        return None;
    }
    let start: u64 = start.parse().ok()?;
    let end = end.trim();
    let end: Option<u64> = if end.is_empty() {
        None
    } else {
        Some(end.parse().ok()?)
    };
    Some((start, end))
}

fn satisfiable(start: u64, end: Option<u64>, total_bytes: u64) -> RangeDecision {
    if start >= total_bytes {
        return RangeDecision::NotSatisfiable;
    }
    let end = end.map_or(total_bytes - 1, |e| e.min(total_bytes - 1));
    if start > end {
        return RangeDecision::NotSatisfiable;
    }
    RangeDecision::PartialContent { start, end }
}
