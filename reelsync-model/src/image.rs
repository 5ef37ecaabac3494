//! Artwork slots attached to every content record.

use std::fmt;

/// One artwork asset at the four resolutions clients request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageSet {
    pub full: String,
    pub high: String,
    pub medium: String,
    pub thumb: String,
}

impl ImageSet {
    /// Same url at every resolution, for providers that only expose one.
    pub fn uniform(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            full: url.clone(),
            high: url.clone(),
            medium: url.clone(),
            thumb: url,
        }
    }

    /// An image set is usable when at least the full resolution is present.
    pub fn is_usable(&self) -> bool {
        !self.full.trim().is_empty()
    }
}

/// An artwork slot: either the placeholder sentinel or a resolved set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ImageSlot {
    #[default]
    Placeholder,
    Resolved(ImageSet),
}

impl ImageSlot {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, ImageSlot::Placeholder)
    }

    pub fn resolved(&self) -> Option<&ImageSet> {
        match self {
            ImageSlot::Placeholder => None,
            ImageSlot::Resolved(set) => Some(set),
        }
    }
}

/// Names the four artwork slots so callers can iterate over them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageField {
    Banner,
    Backdrop,
    Poster,
    Logo,
}

impl ImageField {
    pub const ALL: [ImageField; 4] = [
        ImageField::Banner,
        ImageField::Backdrop,
        ImageField::Poster,
        ImageField::Logo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageField::Banner => "banner",
            ImageField::Backdrop => "backdrop",
            ImageField::Poster => "poster",
            ImageField::Logo => "logo",
        }
    }
}

impl fmt::Display for ImageField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Images {
    #[cfg_attr(feature = "serde", serde(default))]
    pub banner: ImageSlot,
    #[cfg_attr(feature = "serde", serde(default))]
    pub backdrop: ImageSlot,
    #[cfg_attr(feature = "serde", serde(default))]
    pub poster: ImageSlot,
    #[cfg_attr(feature = "serde", serde(default))]
    pub logo: ImageSlot,
}

impl Images {
    pub fn placeholder() -> Self {
        Self::default()
    }

    pub fn slot(&self, field: ImageField) -> &ImageSlot {
        match field {
            ImageField::Banner => &self.banner,
            ImageField::Backdrop => &self.backdrop,
            ImageField::Poster => &self.poster,
            ImageField::Logo => &self.logo,
        }
    }

    pub fn slot_mut(&mut self, field: ImageField) -> &mut ImageSlot {
        match field {
            ImageField::Banner => &mut self.banner,
            ImageField::Backdrop => &mut self.backdrop,
            ImageField::Poster => &mut self.poster,
            ImageField::Logo => &mut self.logo,
        }
    }

    /// Slots still holding the placeholder, in declaration order.
    pub fn missing(&self) -> impl Iterator<Item = ImageField> + '_ {
        ImageField::ALL
            .into_iter()
            .filter(|field| self.slot(*field).is_placeholder())
    }

    pub fn is_complete(&self) -> bool {
        self.missing().next().is_none()
    }

    /// Resolve `field` with `set` unless it is already resolved.
    ///
    /// Returns `true` when the slot changed.
    pub fn fill(&mut self, field: ImageField, set: ImageSet) -> bool {
        let slot = self.slot_mut(field);
        if !slot.is_placeholder() || !set.is_usable() {
            return false;
        }
        *slot = ImageSlot::Resolved(set);
        true
    }
}
