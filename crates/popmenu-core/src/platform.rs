#![forbid(unsafe_code)]

//! Host platform identity.
//!
//! The platform selects small geometry constants (pointer graphic size and
//! offsets, panel shadow flavor) and tells a simulated host whether its
//! overlay surface emits a native dismissal after closing.

use std::fmt;

/// Host platform family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Platform {
    /// Apple mobile platforms.
    Ios,
    /// Android.
    Android,
    /// Anything else (desktop, web, headless).
    #[default]
    Other,
}

impl Platform {
    /// Platform of the compilation target.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(target_os = "ios") {
            Self::Ios
        } else if cfg!(target_os = "android") {
            Self::Android
        } else {
            Self::Other
        }
    }

    /// Whether the native overlay surface reports its own dismissal once it
    /// is torn down.
    #[must_use]
    pub const fn emits_native_dismiss(self) -> bool {
        matches!(self, Self::Ios)
    }

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Android => "android",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
