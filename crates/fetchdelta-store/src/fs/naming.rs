//! Cache file naming
//!
//! Cache names are arbitrary strings; file names are restricted to
//! `[A-Za-z0-9_-]` plus `%XX` escapes of every other UTF-8 byte, so the
//! mapping is injective and reversible.

/// Suffix shared by every cache file
pub const CACHE_FILE_SUFFIX: &str = ".cache.json";

fn is_plain(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-'
}

/// File name for `cache_name`
///
/// For "my tasks" returns "my%20tasks.cache.json"
pub fn cache_file_name(cache_name: &str) -> String {
    let mut out = String::with_capacity(cache_name.len() + CACHE_FILE_SUFFIX.len());
    for byte in cache_name.bytes() {
        if is_plain(byte) {
            out.push(byte as char);
        } else {
            out.push('%');
            out.push_str(&hex::encode_upper([byte]));
        }
    }
    out.push_str(CACHE_FILE_SUFFIX);
    out
}

/// Cache name encoded in `file_name`, or `None` for foreign files
///
/// Only the canonical encoding is accepted: `a%62.cache.json` would decode to
/// `ab`, but `ab` is stored as `ab.cache.json`, so it is rejected.
pub fn cache_name_from_file(file_name: &str) -> Option<String> {
    let stem = file_name.strip_suffix(CACHE_FILE_SUFFIX)?;
    let mut bytes = Vec::with_capacity(stem.len());
    let mut rest = stem.as_bytes();

    while let Some((&first, tail)) = rest.split_first() {
        if first == b'%' {
            let escape = tail.get(..2)?;
            let decoded = hex::decode(escape).ok()?;
            bytes.extend_from_slice(&decoded);
            rest = &tail[2..];
        } else if is_plain(first) {
            bytes.push(first);
            rest = tail;
        } else {
            return None;
        }
    }

    let name = String::from_utf8(bytes).ok()?;
    (cache_file_name(&name) == file_name).then_some(name)
}
