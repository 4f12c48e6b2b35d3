use std::collections::HashSet;

use crate::request::Endpoint;
use crate::types::Pagination;

/// Page-size cap the vendor enforces on beta keys, whatever `limit` asks for.
pub const VENDOR_LIMIT_CEILING: u32 = 50;

/// How an endpoint answers an offset past the end of its result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Every pagination field comes back as zero.
    ZeroAll,
    /// `count` is zero but `total_count` and the requested `offset` are echoed.
    EchoRequest,
}

impl OverflowPolicy {
    pub fn for_endpoint(endpoint: &Endpoint) -> Self {
        match endpoint {
            Endpoint::StickerSearch => OverflowPolicy::EchoRequest,
            Endpoint::GifTrending | Endpoint::GifById(_) => OverflowPolicy::ZeroAll,
        }
    }

    pub fn expected(self, total_count: u64, requested_offset: u64) -> Pagination {
        match self {
            OverflowPolicy::ZeroAll => Pagination::default(),
            OverflowPolicy::EchoRequest => Pagination { total_count, count: 0, offset: requested_offset },
        }
    }
}

/// Items a page should hold for a requested `limit`. Negative limits clamp to
/// an empty page, oversized ones to `ceiling`.
pub fn expected_page_len(requested: i64, ceiling: u32) -> usize {
    if requested <= 0 {
        return 0;
    }
    requested.min(i64::from(ceiling)) as usize
}

/// Ids that show up on more than one page.
pub fn overlapping_ids<'a>(pages: &[&'a [String]]) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    let mut dupes = Vec::new();
    for id in pages.iter().flat_map(|p| p.iter()) {
        if !seen.insert(id.as_str()) && !dupes.contains(&id.as_str()) {
            dupes.push(id.as_str());
        }
    }
    dupes
}

/// Count/offset agreement between a page and the request that produced it.
pub fn consistency_problems(p: &Pagination, data_len: usize, limit: Option<u32>, offset: Option<u64>) -> Vec<String> {
    let mut out = Vec::new();
    if p.count != data_len as u64 {
        out.push(format!("pagination.count {} but data holds {} items", p.count, data_len));
    }
    if let Some(l) = limit {
        if p.count > u64::from(l) {
            out.push(format!("pagination.count {} exceeds limit {}", p.count, l));
        }
    }
    if let Some(o) = offset {
        if p.offset != o {
            out.push(format!("pagination.offset {} but requested {}", p.offset, o));
        }
    }
    if p.total_count > 0 && p.offset.saturating_add(p.count) > p.total_count {
        out.push(format!("offset {} + count {} runs past total_count {}", p.offset, p.count, p.total_count));
    }
    out
}
