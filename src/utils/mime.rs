//! MIME type detection for file uploads.

/// Guess a MIME type from content bytes (magic numbers) first, then the
/// filename extension, falling back to `application/octet-stream`.
pub fn guess_mime(bytes: Option<&[u8]>, filename: Option<&str>) -> String {
    if let Some(b) = bytes
        && let Some(kind) = infer::get(b)
    {
        return kind.mime_type().to_string();
    }
    if let Some(name) = filename
        && let Some(mime) = mime_guess::from_path(name).first_raw()
    {
        return mime.to_string();
    }
    "application/octet-stream".to_string()
}
