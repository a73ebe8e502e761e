//! Search response parsing.

use crate::task::Post;

/// Parses a search page body into posts.
///
/// The API answers an out-of-range page or a query without matches with an
/// empty body instead of `[]`; both mean "no posts".
pub fn parse_posts(body: &[u8]) -> Result<Vec<Post>, serde_json::Error> {
    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(Vec::new());
    }
    serde_json::from_slice(body)
}
