use std::fmt;

use crate::errors::StoreError;

/// Directory inside the store root that holds in-flight temp files.
pub const STAGING_DIR: &str = ".staging";

/// Longest name most filesystems accept for a single path component.
pub const MAX_NAME_BYTES: usize = 255;

/// A document name that is safe to use as a single file name under the store root.
///
/// Construction rejects anything that could resolve outside the root:
/// separators, `.`/`..`, NUL bytes. Names are never rewritten, only
/// accepted or refused.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentName(String);

impl DocumentName {
    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        let reject = |why: &str| Err(StoreError::InvalidName(format!("{raw:?}: {why}")));

        if raw.is_empty() {
            return reject("name is empty");
        }
        if raw.len() > MAX_NAME_BYTES {
            return reject("name is too long");
        }
        if raw == "." || raw == ".." {
            return reject("relative directory reference");
        }
        if raw.contains(['/', '\\']) {
            return reject("path separators are not allowed");
        }
        if raw.contains('\0') {
            return reject("NUL byte");
        }
        if raw == STAGING_DIR {
            return reject("reserved name");
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DocumentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DocumentName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for DocumentName {
    type Error = StoreError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_and_unicode_names() {
        for ok in ["data.json", "전일근무.json", "아침열쇠.json", "a b c", "..hidden", "x..y", ".env"] {
            let name = DocumentName::parse(ok).unwrap();
            assert_eq!(name.as_str(), ok);
        }
    }

    #[test]
    fn rejects_traversal_and_absolute_paths() {
        for bad in [
            "",
            ".",
            "..",
            "../../etc/passwd",
            "/etc/passwd",
            "..\\..\\windows",
            "sub/dir.json",
            "C:\\boot.ini",
            "nul\0byte",
            STAGING_DIR,
        ] {
            match DocumentName::parse(bad) {
                Err(StoreError::InvalidName(_)) => {}
                other => panic!("{bad:?} should be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn length_limit_counts_bytes() {
        // 85 three-byte chars = 255 bytes
        let at_limit = "가".repeat(85);
        assert!(DocumentName::parse(&at_limit).is_ok());
        let over = "가".repeat(86);
        assert!(DocumentName::parse(&over).is_err());
    }
}
