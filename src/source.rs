// Media source locators and their resolution
use crate::error::SessionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Identifier resolving to playable media data.
///
/// The two variants are mutually exclusive: a track is either a file on
/// disk or a stream behind an http(s) URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceLocator {
    LocalFile(PathBuf),
    RemoteUrl(String),
}

impl SourceLocator {
    /// Resolve the locator to a target the media engine can open.
    ///
    /// Local files must exist on disk; remote URLs must carry an http(s)
    /// scheme. Failure is reported, never swallowed.
    pub fn resolve(&self) -> Result<ResolvedSource, SessionError> {
        match self {
            SourceLocator::LocalFile(path) => {
                if !path.is_file() {
                    return Err(SessionError::SourceResolution {
                        locator: self.to_string(),
                        reason: "file not found".to_string(),
                    });
                }
                Ok(ResolvedSource {
                    locator: self.clone(),
                    target: path.to_string_lossy().into_owned(),
                })
            }
            SourceLocator::RemoteUrl(url) => {
                let trimmed = url.trim();
                if trimmed.is_empty() {
                    return Err(SessionError::SourceResolution {
                        locator: self.to_string(),
                        reason: "empty URL".to_string(),
                    });
                }
                if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
                    return Err(SessionError::SourceResolution {
                        locator: self.to_string(),
                        reason: "unsupported URL scheme".to_string(),
                    });
                }
                Ok(ResolvedSource {
                    locator: self.clone(),
                    target: trimmed.to_string(),
                })
            }
        }
    }
}

impl fmt::Display for SourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocator::LocalFile(path) => write!(f, "file:{}", path.display()),
            SourceLocator::RemoteUrl(url) => write!(f, "url:{}", url),
        }
    }
}

/// A locator that passed resolution, ready to hand to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    locator: SourceLocator,
    target: String,
}

impl ResolvedSource {
    pub fn locator(&self) -> &SourceLocator {
        &self.locator
    }

    /// Engine-facing target: a filesystem path or a URL string.
    pub fn target(&self) -> &str {
        &self.target
    }
}
