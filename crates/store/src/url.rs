//! Connection string normalization
//!
//! Users type anything from a bare project id to a full URL with a trailing
//! `.json`. [`normalize_base_url`] reduces all of these to one absolute base
//! URL with no trailing slash:
//!
//! | Input | Base URL |
//! |-------|----------|
//! | `my-project` | `https://my-project-default-rtdb.firebaseio.com` |
//! | `db.example.com/` | `https://db.example.com` |
//! | `http://localhost:9000/.json` | `http://localhost:9000` |

use crate::error::StoreError;

/// Host template for a bare project id
const HOSTED_SUFFIX: &str = "-default-rtdb.firebaseio.com";

/// Normalize user input into an absolute base URL.
///
/// Trailing `/` and `.json` suffixes are stripped repeatedly, so the result
/// is a fixed point: normalizing it again returns it unchanged.
pub fn normalize_base_url(input: &str) -> Result<String, StoreError> {
    let mut rest = input.trim();
    loop {
        let stripped = rest.trim_end().trim_end_matches('/');
        let stripped = stripped.strip_suffix(".json").unwrap_or(stripped);
        if stripped.len() == rest.len() {
            break;
        }
        rest = stripped;
    }

    if rest.is_empty() {
        return Err(StoreError::MalformedRequest {
            reason: format!("'{}' is not a database URL", input.trim()),
        });
    }

    if is_project_id(rest) {
        return Ok(format!("https://{}{}", rest, HOSTED_SUFFIX));
    }
    if rest.contains("://") {
        Ok(rest.to_string())
    } else {
        Ok(format!("https://{}", rest))
    }
}

fn is_project_id(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}
