//! Video file type tables.
//!
//! Extension handling is shared by key generation, upload validation and the
//! local listing filter, so all three agree on what counts as a video.

/// Extensions accepted for upload and shown by the local listing.
pub const DEFAULT_VIDEO_EXTENSIONS: [&str; 9] =
    ["mp4", "mov", "avi", "wmv", "flv", "webm", "mkv", "m4v", "3gp"];

const MAX_EXTENSION_LEN: usize = 16;

/// Extract the lowercase extension of a filename.
///
/// Returns `None` when there is no extension, when the name is a dotfile such as
/// `.hidden`, or when the extension holds anything other than ASCII letters and digits.
pub fn normalized_extension(filename: &str) -> Option<String> {
    let name = filename
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(filename);
    let (stem, ext) = name.rsplit_once('.')?;

    if stem.is_empty()
        || ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.bytes().all(|b| b.is_ascii_alphanumeric())
    {
        return None;
    }

    Some(ext.to_ascii_lowercase())
}

/// Strip MIME parameters and lowercase (`Video/MP4; codecs=x` -> `video/mp4`).
pub fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_lowercase()
}

pub fn is_video_content_type(content_type: &str) -> bool {
    normalize_mime_type(content_type).starts_with("video/")
}

/// Content-Type served for a stored file, chosen by extension.
pub fn content_type_for_extension(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "wmv" => "video/x-ms-wmv",
        "flv" => "video/x-flv",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "m4v" => "video/x-m4v",
        "3gp" => "video/3gpp",
        _ => "application/octet-stream",
    }
}

/// Extension for a video MIME type, used when the client's filename has no usable one.
pub fn extension_for_content_type(content_type: &str) -> Option<&'static str> {
    let ext = match normalize_mime_type(content_type).as_str() {
        "video/mp4" => "mp4",
        "video/quicktime" => "mov",
        "video/x-msvideo" | "video/avi" => "avi",
        "video/x-ms-wmv" => "wmv",
        "video/x-flv" => "flv",
        "video/webm" => "webm",
        "video/x-matroska" => "mkv",
        "video/x-m4v" => "m4v",
        "video/3gpp" => "3gp",
        _ => return None,
    };
    Some(ext)
}

/// Content-Type for a storage key, falling back to `application/octet-stream`.
pub fn content_type_for_key(key: &str) -> &'static str {
    normalized_extension(key)
        .map(|ext| content_type_for_extension(&ext))
        .unwrap_or("application/octet-stream")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_extension() {
        assert_eq!(normalized_extension("clip.MOV").as_deref(), Some("mov"));
        assert_eq!(normalized_extension("archive.tar.GZ").as_deref(), Some("gz"));
        assert_eq!(normalized_extension("dir/sub/movie.mp4").as_deref(), Some("mp4"));
        assert_eq!(normalized_extension("noextension"), None);
        assert_eq!(normalized_extension(".hidden"), None);
        assert_eq!(normalized_extension("trailing."), None);
        assert_eq!(normalized_extension("weird.m p4"), None);
    }

    #[test]
    fn test_video_content_type() {
        assert!(is_video_content_type("video/mp4"));
        assert!(is_video_content_type("VIDEO/QuickTime; charset=binary"));
        assert!(!is_video_content_type("image/png"));
        assert!(!is_video_content_type("application/octet-stream"));
    }

    #[test]
    fn test_extension_for_content_type() {
        assert_eq!(extension_for_content_type("video/quicktime"), Some("mov"));
        assert_eq!(extension_for_content_type("Video/MP4; codecs=avc1"), Some("mp4"));
        assert_eq!(extension_for_content_type("video/x-unknown"), None);
        assert_eq!(extension_for_content_type("image/png"), None);
    }

    #[test]
    fn test_content_type_for_key() {
        assert_eq!(content_type_for_key("video-1-2.mov"), "video/quicktime");
        assert_eq!(content_type_for_key("video-1-2.MKV"), "video/x-matroska");
        assert_eq!(content_type_for_key("video-1-2"), "application/octet-stream");
    }
}
