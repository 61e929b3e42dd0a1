//! Shared domain enumerations.

use serde::{Deserialize, Serialize};

/// Member visibility as reported by the identity API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    /// Interpret the API's free-form visibility string.
    ///
    /// Only the literal `private` hides a member; anything else, including an
    /// absent privacy block, is treated as public.
    pub fn from_api(value: Option<&str>) -> Self {
        match value {
            Some("private") => Visibility::Private,
            _ => Visibility::Public,
        }
    }

    pub fn is_private(self) -> bool {
        matches!(self, Visibility::Private)
    }
}
