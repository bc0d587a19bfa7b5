//! Shared key generation for storage backends.
//!
//! Key format: `video-{unix_millis}-{random_u64}{.ext}`, for example
//! `video-1718000000000-9283746501234.mov`.

use std::sync::atomic::{AtomicI64, Ordering};

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reelbox_core::video_types::normalized_extension;

const KEY_PREFIX: &str = "video";

/// Characters left as-is when a key is placed in a URL path segment.
const KEY_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

static LAST_MILLIS: AtomicI64 = AtomicI64::new(0);

/// Current unix time in milliseconds, never lower than a previously returned value.
fn monotonic_millis() -> i64 {
    let now = chrono::Utc::now().timestamp_millis();
    let previous = LAST_MILLIS.fetch_max(now, Ordering::Relaxed);
    previous.max(now)
}

/// Generate a storage key for an uploaded file.
///
/// The extension of `original_filename` is kept (lowercased) so backends and clients
/// can infer the media type. Everything else about the client's name is discarded.
/// The result never contains `/`, `\` or `..`.
pub fn generate_storage_key(original_filename: &str) -> String {
    storage_key_with_extension(normalized_extension(original_filename).as_deref())
}

/// Generate a storage key with an explicit extension (or none).
pub fn storage_key_with_extension(extension: Option<&str>) -> String {
    let millis = monotonic_millis();
    let suffix: u64 = rand::random();

    match extension {
        Some(ext) => format!("{}-{}-{}.{}", KEY_PREFIX, millis, suffix, ext),
        None => format!("{}-{}-{}", KEY_PREFIX, millis, suffix),
    }
}

/// Percent-encode a key for use as one URL path segment.
pub fn encode_key_for_url(key: &str) -> String {
    utf8_percent_encode(key, KEY_SEGMENT).to_string()
}

/// Join a base URL and a key: `{base}/{encoded key}`.
pub fn url_for_key(base_url: &str, key: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), encode_key_for_url(key))
}
