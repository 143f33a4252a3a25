//! Object key conventions.
//!
//! Pure string functions, no AWS SDK dependency.

/// Extension of the final path component, without the dot.
pub fn extension(key: &str) -> Option<&str> {
    let name = key.rsplit('/').next().unwrap_or(key);
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext),
        _ => None,
    }
}

/// Key the converted copy of `key` is stored under.
///
/// Only the trailing `.{from}` extension is swapped, so a directory or stem
/// that happens to contain the same text is left alone. Keys without that
/// extension get `.{to}` appended.
pub fn converted_key(key: &str, from: &str, to: &str) -> String {
    let from = from.trim_start_matches('.');
    let to = to.trim_start_matches('.');
    let suffix = format!(".{from}");

    let split = key.len().saturating_sub(suffix.len());
    match (key.get(..split), key.get(split..)) {
        (Some(stem), Some(tail)) if !stem.is_empty() && tail.eq_ignore_ascii_case(&suffix) => {
            format!("{stem}.{to}")
        }
        _ => format!("{key}.{to}"),
    }
}

/// Public virtual-hosted-style URL of an object.
pub fn object_url(bucket: &str, region: &str, key: &str) -> String {
    format!("https://{bucket}.s3.{region}.amazonaws.com/{key}")
}
