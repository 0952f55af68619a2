//! Extension to media-type lookup.
//!
//! The table is fixed; anything unknown (or without an extension at all)
//! is served as `application/octet-stream`.

pub const OCTET_STREAM: &str = "application/octet-stream";

static TABLE: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("htm", "text/html"),
    ("css", "text/css"),
    ("js", "application/javascript"),
    ("json", "application/json"),
    ("xml", "application/xml"),
    ("txt", "text/plain"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("ico", "image/x-icon"),
    ("svg", "image/svg+xml"),
    ("pdf", "application/pdf"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    ("xls", "application/vnd.ms-excel"),
    (
        "xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
    ("ppt", "application/vnd.ms-powerpoint"),
    (
        "pptx",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    ),
    ("zip", "application/zip"),
    ("rar", "application/x-rar-compressed"),
    ("7z", "application/x-7z-compressed"),
    ("tar", "application/x-tar"),
    ("gz", "application/gzip"),
];

/// Look up the media type for `path` by its extension (the substring after
/// the last `.`, compared case-insensitively).
pub fn mime_type(path: &str) -> &'static str {
    let Some(dot) = path.rfind('.') else {
        return OCTET_STREAM;
    };
    let ext = path[dot + 1..].to_ascii_lowercase();
    TABLE
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, t)| *t)
        .unwrap_or(OCTET_STREAM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_types() {
        assert_eq!(mime_type("/a/b/index.html"), "text/html");
        assert_eq!(mime_type("notes.txt"), "text/plain");
        assert_eq!(mime_type("archive.tar"), "application/x-tar");
        assert_eq!(mime_type("archive.GZ"), "application/gzip");
    }

    #[test]
    fn case_insensitive_extension() {
        assert_eq!(mime_type("PHOTO.JPG"), "image/jpeg");
        assert_eq!(mime_type("photo.JpEg"), "image/jpeg");
    }

    #[test]
    fn unknown_or_dotless() {
        assert_eq!(mime_type("Makefile"), OCTET_STREAM);
        assert_eq!(mime_type("weird.xyz"), OCTET_STREAM);
        assert_eq!(mime_type(""), OCTET_STREAM);
    }

    #[test]
    fn last_dot_wins() {
        assert_eq!(mime_type("bundle.tar.gz"), "application/gzip");
        assert_eq!(mime_type("trailing."), OCTET_STREAM);
    }
}
