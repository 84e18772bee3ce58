use std::fmt;

use crate::errors::{DispatchError, DispatchResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Mac,
    Windows,
    Linux,
}

impl Platform {
    /// Classifies a free-form platform descriptor such as `macos`,
    /// `Darwin-23.1.0-arm64` or `Linux-6.5-x86_64`.
    pub fn from_descriptor(descriptor: &str) -> DispatchResult<Self> {
        let lower = descriptor.to_lowercase();
        if lower.contains("mac") || lower.contains("darwin") {
            Ok(Platform::Mac)
        } else if lower.contains("windows") {
            Ok(Platform::Windows)
        } else if lower.contains("linux") {
            Ok(Platform::Linux)
        } else {
            Err(DispatchError::UnsupportedPlatform(descriptor.to_string()))
        }
    }

    /// Descriptor of the platform this binary was built for.
    pub fn host_descriptor() -> &'static str {
        std::env::consts::OS
    }

    pub fn detect() -> DispatchResult<Self> {
        Self::from_descriptor(Self::host_descriptor())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Platform::Mac => "mac",
            Platform::Windows => "windows",
            Platform::Linux => "linux",
        };
        f.write_str(s)
    }
}
