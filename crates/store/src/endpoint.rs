//! Path to endpoint URL translation
//!
//! Every tree path maps to `{base}/{seg}/{seg}.json`, with each segment
//! percent-encoded on its own. The root maps to `{base}/.json`.

use canopy_core::TreePath;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything except the unreserved set `A-Za-z0-9-._~`
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Encode one path segment.
///
/// `.` and `..` are unreserved but would be collapsed by URL resolution, so
/// they are spelled out as `%2E`.
pub fn encode_segment(segment: &str) -> String {
    match segment {
        "." => "%2E".to_string(),
        ".." => "%2E%2E".to_string(),
        _ => utf8_percent_encode(segment, SEGMENT).to_string(),
    }
}

/// REST endpoint for `path` under `base_url`
pub fn endpoint_url(base_url: &str, path: &TreePath) -> String {
    if path.is_root() {
        return format!("{}/.json", base_url);
    }
    let encoded: Vec<String> = path.segments().iter().map(|s| encode_segment(s)).collect();
    format!("{}/{}.json", base_url, encoded.join("/"))
}
