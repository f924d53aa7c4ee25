//! Upload naming and acceptance rules.
//!
//! Pure helpers used by the upload handlers; the handlers own all
//! filesystem access.

use rand::Rng;

use crate::error::CoreError;

/// Folder used when the client does not name one.
pub const DEFAULT_FOLDER: &str = "products";

/// Per-file size cap (10 MiB).
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Maximum number of files accepted by a multi-file upload.
pub const MAX_FILES_PER_REQUEST: usize = 10;

/// Public URL prefix the upload directory is served under.
pub const PUBLIC_PREFIX: &str = "uploads";

pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "video/mp4",
    "video/mpeg",
    "video/quicktime",
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 6;

pub fn is_allowed_mime(mime: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&mime)
}

/// Replace every character outside `[A-Za-z0-9_-]` with `_`.
///
/// `None` or an empty name falls back to [`DEFAULT_FOLDER`].
pub fn sanitize_folder_name(name: Option<&str>) -> String {
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(n) => n
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect(),
        None => DEFAULT_FOLDER.to_string(),
    }
}

/// Build a collision-resistant stored name: `<stem>_<millis>_<6 base36>.<ext>`.
///
/// Any directory components of `original` are discarded.
pub fn unique_file_name(original: &str, now_millis: i64, rng: &mut impl Rng) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .filter(|b| !b.is_empty())
        .unwrap_or("file");

    let (stem, ext) = match base.rfind('.') {
        Some(idx) if idx > 0 => (&base[..idx], &base[idx..]),
        _ => (base, ""),
    };

    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.random_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect();

    format!("{stem}_{now_millis}_{suffix}{ext}")
}

/// Validate a client-supplied stored file name before touching the disk.
pub fn validate_stored_name(name: &str) -> Result<(), CoreError> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0')
    {
        return Err(CoreError::Validation(format!("Invalid file name '{name}'")));
    }
    Ok(())
}

/// Relative path and public URL for a stored file.
pub fn public_paths(folder: &str, file_name: &str) -> (String, String) {
    (
        format!("{PUBLIC_PREFIX}/{folder}/{file_name}"),
        format!("/{PUBLIC_PREFIX}/{folder}/{file_name}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn folder_names_are_scrubbed() {
        assert_eq!(sanitize_folder_name(Some("../etc")), "___etc");
        assert_eq!(sanitize_folder_name(Some("avatars-2024")), "avatars-2024");
        assert_eq!(sanitize_folder_name(Some("  ")), DEFAULT_FOLDER);
        assert_eq!(sanitize_folder_name(None), DEFAULT_FOLDER);
    }

    #[test]
    fn unique_name_keeps_stem_and_extension() {
        let mut rng = StdRng::seed_from_u64(7);
        let name = unique_file_name("photos/lamp.final.png", 1_700_000_000_000, &mut rng);

        assert!(name.starts_with("lamp.final_1700000000000_"));
        assert!(name.ends_with(".png"));
        let suffix = &name["lamp.final_1700000000000_".len()..name.len() - 4];
        assert_eq!(suffix.len(), 6);
        assert!(suffix.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn unique_name_without_extension() {
        let mut rng = StdRng::seed_from_u64(1);
        let name = unique_file_name(".env", 5, &mut rng);
        assert!(name.starts_with(".env_5_"));
    }

    #[test]
    fn stored_names_reject_traversal() {
        assert!(validate_stored_name("lamp_1_abc123.png").is_ok());
        assert!(validate_stored_name("../secret").is_err());
        assert!(validate_stored_name("..").is_err());
        assert!(validate_stored_name("").is_err());
    }

    #[test]
    fn mime_allow_list() {
        assert!(is_allowed_mime("image/png"));
        assert!(!is_allowed_mime("text/html"));
    }
}
