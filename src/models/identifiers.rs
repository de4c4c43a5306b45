use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! impl_id_type {
    ($name:ident) => {
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// True for empty or whitespace-only ids
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.to_string()))
            }
        }
    };
}

impl_id_type!(VideoId);
impl_id_type!(RowKey);

impl RowKey {
    pub const FAVORITES: &'static str = "favorites";
    pub const CONTINUE_WATCHING: &'static str = "continue-watching";
    pub const GLOBAL_FALLBACK: &'static str = "global_fallback";

    pub fn favorites() -> Self {
        Self::new(Self::FAVORITES)
    }

    pub fn continue_watching() -> Self {
        Self::new(Self::CONTINUE_WATCHING)
    }

    /// Row key attached to candidates picked from the global fallback sequence
    pub fn global_fallback() -> Self {
        Self::new(Self::GLOBAL_FALLBACK)
    }

    pub fn is_global_fallback(&self) -> bool {
        self.0 == Self::GLOBAL_FALLBACK
    }
}
