//! Byte string searching.

/// Find the first occurrence of `needle` in `haystack`.
///
/// Returns the offset of the match. An empty needle matches at the start.
pub fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }

    haystack.windows(needle.len()).position(|window| window == needle)
}

/// The length of the zero-terminated string in `buf`, looking at most `max` bytes far.
///
/// If there is no terminator in reach, the reach itself is returned.
pub fn bounded_len(buf: &[u8], max: usize) -> usize {
    let reach = &buf[..max.min(buf.len())];

    reach.iter().position(|&b| b == 0).unwrap_or(reach.len())
}
