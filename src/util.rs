use sha2::{Digest, Sha256};
use time::format_description::well_known::Rfc3339;

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut h = Sha256::new();
    h.update(bytes);
    format!("{:x}", h.finalize())
}

pub fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

/// First `max` characters of `s`, on a char boundary.
pub fn snippet(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
