use std::fmt;

/// Stable canonical identifier of a content record.
///
/// In the default provider wiring this is the IMDb id (`tt0111161`). It is
/// the primary key of the store and never changes once a record exists.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ContentId(String);

impl ContentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl AsRef<str> for ContentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ContentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ContentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The three catalog identifiers a title must carry to be reconciled.
///
/// Which catalog each slot points at is a wiring decision of the host. The
/// bundled adapters read `primary` as the IMDb id, `secondary` as the TMDB id
/// and `tertiary` as the artwork catalog id (TVDB for shows, TMDB for
/// movies).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CrossReferenceIds<'a> {
    pub primary: &'a str,
    pub secondary: &'a str,
    pub tertiary: &'a str,
}

impl<'a> CrossReferenceIds<'a> {
    /// `None` when the slot is blank.
    pub fn primary(&self) -> Option<&'a str> {
        non_blank(self.primary)
    }

    pub fn secondary(&self) -> Option<&'a str> {
        non_blank(self.secondary)
    }

    pub fn tertiary(&self) -> Option<&'a str> {
        non_blank(self.tertiary)
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
