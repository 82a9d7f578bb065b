//! Recognized HSDS-UK standard versions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The major releases of the HSDS-UK standard that test profiles exist
/// for. Version tokens are fixed well-known strings; anything else is
/// unrecognized and falls back during profile selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardVersion {
    #[serde(rename = "HSDS-UK-1.0")]
    V1,
    #[serde(rename = "HSDS-UK-2.0")]
    V2,
    #[serde(rename = "HSDS-UK-3.0")]
    V3,
}

impl StandardVersion {
    /// All recognized versions, oldest first.
    pub const ALL: [StandardVersion; 3] = [Self::V1, Self::V2, Self::V3];

    /// The canonical version token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V1 => "HSDS-UK-1.0",
            Self::V2 => "HSDS-UK-2.0",
            Self::V3 => "HSDS-UK-3.0",
        }
    }

    /// Parse a version token, failing on anything unrecognized.
    pub fn parse(token: &str) -> Result<Self, Error> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == token)
            .ok_or_else(|| Error::unknown_version(token))
    }

    /// The oldest recognized version, used as the most conservative
    /// fallback when a service cannot be reached.
    pub fn oldest() -> Self {
        Self::V1
    }

    /// The newest recognized version, the default when a service does
    /// not declare one.
    pub fn newest() -> Self {
        Self::V3
    }
}

impl fmt::Display for StandardVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recognized_tokens() {
        assert_eq!(
            StandardVersion::parse("HSDS-UK-1.0").unwrap(),
            StandardVersion::V1
        );
        assert_eq!(
            StandardVersion::parse("HSDS-UK-3.0").unwrap(),
            StandardVersion::V3
        );
    }

    #[test]
    fn test_parse_unrecognized_token() {
        let result = StandardVersion::parse("HSDS-UK-9.9");
        assert!(matches!(result, Err(Error::UnknownVersion(_))));
    }

    #[test]
    fn test_oldest_and_newest() {
        assert_eq!(StandardVersion::oldest(), StandardVersion::V1);
        assert_eq!(StandardVersion::newest(), StandardVersion::V3);
    }

    #[test]
    fn test_serialized_form_is_the_token() {
        let json = serde_json::to_string(&StandardVersion::V3).unwrap();
        assert_eq!(json, "\"HSDS-UK-3.0\"");
    }
}
