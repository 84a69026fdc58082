//! Typed builders for every API endpoint.
//!
//! Each operation maps to one method/path pair and is exposed as an
//! [`ApiClient`](crate::ApiClient) method, split by resource.

mod auth;
mod categories;
mod posts;
mod users;

pub use users::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped inside one path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// `prefix` followed by `id` encoded as a single path segment.
pub(crate) fn item_path(prefix: &str, id: impl std::fmt::Display) -> String {
    let id = id.to_string();
    format!("{}{}", prefix, utf8_percent_encode(&id, SEGMENT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_path_plain_ids() {
        assert_eq!(item_path("/api/v1/posts/", 42), "/api/v1/posts/42");
        assert_eq!(item_path("/api/v1/posts/", "7"), "/api/v1/posts/7");
    }

    #[test]
    fn test_item_path_escapes_segment_breakers() {
        assert_eq!(item_path("/api/v1/posts/", "a/b?c#d"), "/api/v1/posts/a%2Fb%3Fc%23d");
        assert_eq!(item_path("/api/v1/posts/", "x y"), "/api/v1/posts/x%20y");
    }
}
