//! Filename and MIME helpers for the static photo store. Pure functions,
//! tested without touching the filesystem.

const ALLOWED_EXTENSIONS: [&str; 6] = ["jpeg", "jpg", "png", "gif", "bmp", "webp"];

pub fn extension_of(filename: &str) -> Option<&str> {
    filename.rsplit_once('.').map(|(_, ext)| ext)
}

pub fn mime_for(filename: &str) -> &'static str {
    match extension_of(filename).map(str::to_lowercase).as_deref() {
        Some("jpeg") | Some("jpg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("tiff") => "image/tiff",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// A filename is safe when it cannot escape the photo directory: a single
/// path component, no traversal, not hidden.
pub fn is_safe_filename(filename: &str) -> bool {
    !filename.is_empty()
        && !filename.starts_with('.')
        && !filename.contains(['/', '\\'])
        && !filename.contains("..")
}

pub fn is_allowed_extension(filename: &str) -> bool {
    extension_of(filename)
        .map(str::to_lowercase)
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_mapping() {
        assert_eq!(mime_for("a.jpeg"), "image/jpeg");
        assert_eq!(mime_for("a.JPG"), "image/jpeg");
        assert_eq!(mime_for("a.png"), "image/png");
        assert_eq!(mime_for("a.gif"), "image/gif");
        assert_eq!(mime_for("a.bmp"), "image/bmp");
        assert_eq!(mime_for("a.tiff"), "image/tiff");
        assert_eq!(mime_for("a.webp"), "image/webp");
        assert_eq!(mime_for("a.exe"), "application/octet-stream");
        assert_eq!(mime_for("no-extension"), "application/octet-stream");
    }

    #[test]
    fn safe_filenames() {
        assert!(is_safe_filename("photo.png"));
        assert!(is_safe_filename("cafe front 1.jpg"));
        assert!(!is_safe_filename(""));
        assert!(!is_safe_filename(".hidden"));
        assert!(!is_safe_filename("../escape.png"));
        assert!(!is_safe_filename("a/b.png"));
        assert!(!is_safe_filename("a\\b.png"));
    }

    #[test]
    fn extension_allow_list() {
        assert!(is_allowed_extension("photo.png"));
        assert!(is_allowed_extension("photo.JPEG"));
        assert!(!is_allowed_extension("photo.tiff")); // servable but not uploadable
        assert!(!is_allowed_extension("photo.svg"));
        assert!(!is_allowed_extension("photo"));
    }
}
