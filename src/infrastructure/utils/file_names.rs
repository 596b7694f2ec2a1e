use chrono::Utc;
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;

static SAFE_FILE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._-]+$").expect("static regex")
});

static EXTENSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]{1,10}$").expect("static regex")
});

/// Lowercased extension of `original`, if it is short and alphanumeric.
pub fn sanitized_extension(original: &str) -> Option<String> {
    let (_, ext) = original.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    EXTENSION.is_match(&ext).then_some(ext)
}

/// `file-<unix millis>-<random>` plus the sanitized extension of the client's name.
pub fn generate_file_name(original: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);

    match sanitized_extension(original) {
        Some(ext) => format!("file-{millis}-{suffix}.{ext}"),
        None => format!("file-{millis}-{suffix}"),
    }
}

/// Names served from the upload directory: no separators, no traversal.
pub fn is_safe_file_name(name: &str) -> bool {
    SAFE_FILE_NAME.is_match(name) && name != "." && name != ".."
}
