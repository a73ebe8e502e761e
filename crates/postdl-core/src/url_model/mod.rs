//! URL modeling and destination naming.
//!
//! Derives the extension hint of a payload address and the deterministic
//! file name a task is saved under.

mod path;

pub use path::{extension_of, last_path_segment};

/// Extension hint for a payload URL, including the leading dot.
///
/// Only the path is considered, so query strings such as `?1234` (common on
/// image CDNs) do not leak into the name. Returns an empty string when the
/// path has no usable extension.
///
/// # Examples
///
/// - `extension_hint("https://cdn.example.com/images/12/abc.jpg?9")` → `".jpg"`
/// - `extension_hint("https://cdn.example.com/download")` → `""`
pub fn extension_hint(url: &str) -> String {
    let Some(segment) = last_path_segment(url) else {
        return String::new();
    };
    match extension_of(&segment) {
        Some(ext) if ext.chars().all(|c| c.is_ascii_alphanumeric()) => format!(".{ext}"),
        _ => String::new(),
    }
}

/// File name a task with `id` and extension hint `ext` is stored under.
pub fn file_name(id: u64, ext: &str) -> String {
    format!("{id}{ext}")
}
