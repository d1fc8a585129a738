//! Upload validation and expiry policy for DataShare.
//!
//! Pure functions: given file metadata and an optional requested expiry,
//! decide accept/reject and compute the effective expiry instant. No I/O
//! happens here; the lifecycle service calls in before touching storage.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};

use crate::config::UploadConfig;
use crate::{DataShareError, Result};

/// Minimum retention for an uploaded file, in days.
pub const MIN_RETENTION_DAYS: i64 = 1;

/// Maximum retention for an uploaded file, in days.
pub const MAX_RETENTION_DAYS: i64 = 7;

/// Validation policy applied to every upload.
///
/// Kept as a named, swappable value rather than hardcoded checks so a
/// stricter content-sniffing policy can replace it without touching the
/// lifecycle service.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    max_file_size: u64,
    forbidden_mime_types: Vec<String>,
    forbidden_extensions: Vec<String>,
}

impl UploadPolicy {
    /// Build the policy from deployment configuration.
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            max_file_size: config.max_file_size_bytes,
            forbidden_mime_types: config.forbidden_mime_types.clone(),
            forbidden_extensions: config
                .forbidden_extensions
                .iter()
                .map(|e| e.to_lowercase())
                .collect(),
        }
    }

    /// Get the configured maximum file size in bytes.
    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Validate an incoming file.
    ///
    /// Checks are evaluated in order (size, MIME type, extension); the
    /// first failure wins. Rejections never touch the store.
    pub fn validate(&self, original_name: &str, mime_type: &str, size: u64) -> Result<()> {
        if size > self.max_file_size {
            return Err(DataShareError::Validation(format!(
                "file size exceeds the maximum allowed size ({} bytes)",
                self.max_file_size
            )));
        }

        if self
            .forbidden_mime_types
            .iter()
            .any(|m| m == mime_type)
        {
            return Err(DataShareError::Validation(
                "file type not allowed".to_string(),
            ));
        }

        let ext = extract_extension(original_name);
        if self.forbidden_extensions.iter().any(|e| *e == ext) {
            return Err(DataShareError::Validation(
                "file type not allowed".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::new(&UploadConfig::default())
    }
}

/// Extract the lowercase extension (with leading dot) from a filename.
///
/// Returns an empty string when the name has no extension.
fn extract_extension(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| format!(".{}", s.to_lowercase()))
        .unwrap_or_default()
}

/// Compute the effective expiry instant for an upload.
///
/// Absent or unparsable requests yield `now + 7 days`. Anything else is
/// clamped into `[now + 1 day, now + 7 days]` - out-of-range values are
/// raised or lowered to the nearest bound, never rejected. The caller
/// therefore never sees an expiry error.
pub fn resolve_expiry(now: DateTime<Utc>, requested: Option<&str>) -> DateTime<Utc> {
    let max_expiry = now + Duration::days(MAX_RETENTION_DAYS);
    let min_expiry = now + Duration::days(MIN_RETENTION_DAYS);

    let requested = match requested {
        Some(s) => s,
        None => return max_expiry,
    };

    let parsed = match DateTime::parse_from_rfc3339(requested) {
        Ok(dt) => dt.with_timezone(&Utc),
        Err(_) => return max_expiry,
    };

    if parsed < min_expiry {
        min_expiry
    } else if parsed > max_expiry {
        max_expiry
    } else {
        parsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> UploadPolicy {
        UploadPolicy::default()
    }

    #[test]
    fn test_validate_accepts_normal_file() {
        let result = policy().validate("test.pdf", "application/pdf", 1024);
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_size_over_limit() {
        let config = UploadConfig {
            max_file_size_bytes: 100,
            ..Default::default()
        };
        let policy = UploadPolicy::new(&config);

        let result = policy.validate("big.txt", "text/plain", 101);
        assert!(matches!(result, Err(DataShareError::Validation(msg)) if msg.contains("size")));
    }

    #[test]
    fn test_validate_size_at_limit_ok() {
        let config = UploadConfig {
            max_file_size_bytes: 100,
            ..Default::default()
        };
        let policy = UploadPolicy::new(&config);

        assert!(policy.validate("ok.txt", "text/plain", 100).is_ok());
    }

    #[test]
    fn test_validate_forbidden_mime() {
        for mime in [
            "application/x-msdownload",
            "application/x-sh",
            "application/x-bat",
        ] {
            let result = policy().validate("file.txt", mime, 10);
            assert!(
                matches!(result, Err(DataShareError::Validation(_))),
                "{mime} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_forbidden_extension() {
        for name in ["virus.exe", "run.bat", "script.sh", "do.cmd"] {
            let result = policy().validate(name, "application/octet-stream", 10);
            assert!(
                matches!(result, Err(DataShareError::Validation(_))),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_extension_case_insensitive() {
        let result = policy().validate("VIRUS.EXE", "application/octet-stream", 10);
        assert!(matches!(result, Err(DataShareError::Validation(_))));
    }

    #[test]
    fn test_validate_size_checked_before_type() {
        let config = UploadConfig {
            max_file_size_bytes: 1,
            ..Default::default()
        };
        let policy = UploadPolicy::new(&config);

        // Both violations present; size must win
        let result = policy.validate("virus.exe", "application/x-msdownload", 100);
        assert!(matches!(result, Err(DataShareError::Validation(msg)) if msg.contains("size")));
    }

    #[test]
    fn test_validate_no_extension_ok() {
        assert!(policy().validate("README", "text/plain", 10).is_ok());
    }

    #[test]
    fn test_extract_extension() {
        assert_eq!(extract_extension("test.txt"), ".txt");
        assert_eq!(extract_extension("VIRUS.EXE"), ".exe");
        assert_eq!(extract_extension("archive.tar.gz"), ".gz");
        assert_eq!(extract_extension("no_ext"), "");
        assert_eq!(extract_extension(".hidden"), "");
    }

    #[test]
    fn test_resolve_expiry_absent() {
        let now = Utc::now();
        let expiry = resolve_expiry(now, None);
        assert_eq!(expiry, now + Duration::days(7));
    }

    #[test]
    fn test_resolve_expiry_unparsable() {
        let now = Utc::now();
        assert_eq!(
            resolve_expiry(now, Some("not a date")),
            now + Duration::days(7)
        );
        assert_eq!(resolve_expiry(now, Some("")), now + Duration::days(7));
    }

    #[test]
    fn test_resolve_expiry_in_window() {
        let now = Utc::now();
        let requested = now + Duration::days(3);
        let expiry = resolve_expiry(now, Some(&requested.to_rfc3339()));
        assert_eq!(expiry, requested);
    }

    #[test]
    fn test_resolve_expiry_clamped_low() {
        let now = Utc::now();
        // In the past, and merely too soon: both raise to now + 1d
        for requested in [now - Duration::days(30), now + Duration::hours(1)] {
            let expiry = resolve_expiry(now, Some(&requested.to_rfc3339()));
            assert_eq!(expiry, now + Duration::days(1));
        }
    }

    #[test]
    fn test_resolve_expiry_clamped_high() {
        let now = Utc::now();
        let requested = now + Duration::days(365);
        let expiry = resolve_expiry(now, Some(&requested.to_rfc3339()));
        assert_eq!(expiry, now + Duration::days(7));
    }

    #[test]
    fn test_resolve_expiry_at_bounds() {
        let now = Utc::now();
        let min = now + Duration::days(1);
        let max = now + Duration::days(7);

        assert_eq!(resolve_expiry(now, Some(&min.to_rfc3339())), min);
        assert_eq!(resolve_expiry(now, Some(&max.to_rfc3339())), max);
    }
}
