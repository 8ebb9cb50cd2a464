use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Phrases that identify an SR OS query.
const SROS_KEYWORDS: &[&str] = &[
    "sros",
    "sr os",
    "service router",
    "7750",
    "7450",
    "7250",
    "7950",
];

/// Network operating system whose catalog a query targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// SR Linux (default).
    #[default]
    Srl,
    /// SR OS.
    Sros,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Srl, Platform::Sros];

    /// Pick a platform from query vocabulary, falling back to SR Linux.
    pub fn detect_from_query(query: &str) -> Self {
        let lower = query.to_lowercase();
        if SROS_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            Self::Sros
        } else {
            Self::Srl
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Srl => "srl",
            Self::Sros => "sros",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown platform '{0}' (expected srl or sros)")]
pub struct UnknownPlatform(pub String);

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "srl" => Ok(Self::Srl),
            "sros" => Ok(Self::Sros),
            _ => Err(UnknownPlatform(s.to_string())),
        }
    }
}
