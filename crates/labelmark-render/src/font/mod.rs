//! Font family resolution.
//!
//! A preference list such as `"Helvetica, 'DejaVu Sans', sans-serif"` is matched against the
//! installed-family catalog; the first installed family or generic keyword wins and is handed to a
//! [`FontMatcher`] for the concrete family name.

mod backend;
mod catalog;
#[cfg(feature = "system-fonts")]
mod system;

pub use backend::StaticFontBackend;
pub use catalog::{FontFamilyCatalog, global_catalog, init_global_catalog};
#[cfg(feature = "system-fonts")]
pub use system::SystemFontBackend;

use crate::number::format_number;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

pub const GENERIC_FAMILIES: [&str; 6] = [
    "serif",
    "sans",
    "sans-serif",
    "monospace",
    "cursive",
    "fantasy",
];

pub const DEFAULT_GENERIC_FAMILY: &str = "sans-serif";

pub fn is_generic_family(name: &str) -> bool {
    GENERIC_FAMILIES.contains(&name)
}

#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("font catalog unavailable: {message}")]
    Catalog { message: String },
    #[error("no installed font matches '{family}'")]
    NoMatch { family: String },
    #[error("invalid font descriptor: {descriptor:?}")]
    InvalidDescriptor { descriptor: String },
}

/// Lists installed families. Called once per catalog.
pub trait FontCatalogService {
    fn list_families(&self) -> Result<Vec<String>, FontError>;
}

/// Maps a family name or generic keyword to a concrete installed family.
pub trait FontMatcher {
    fn best_match(&self, family: &str) -> Result<String, FontError>;
}

/// Lower-cased candidates of a comma-separated family list, in preference order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontPreferenceList {
    candidates: Vec<String>,
}

impl FontPreferenceList {
    pub fn parse(list: &str) -> Self {
        let candidates = list
            .split(',')
            .map(|c| {
                c.trim_matches(|ch: char| ch.is_whitespace() || ch == '"' || ch == '\'')
                    .to_lowercase()
            })
            .filter(|c| !c.is_empty())
            .collect();
        Self { candidates }
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// The first candidate that is installed or generic, else [`DEFAULT_GENERIC_FAMILY`].
    pub fn select<'a>(&'a self, catalog: &FontFamilyCatalog) -> &'a str {
        match self
            .candidates
            .iter()
            .find(|c| catalog.contains(c) || is_generic_family(c))
        {
            Some(found) => found.as_str(),
            None => {
                tracing::debug!(
                    candidates = ?self.candidates,
                    "no usable font family, falling back to {DEFAULT_GENERIC_FAMILY}"
                );
                DEFAULT_GENERIC_FAMILY
            }
        }
    }
}

/// `"<family> <size>px"`, the token handed to measurement and markup backends.
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    family: String,
    size_px: f64,
    text: String,
}

impl FontDescriptor {
    pub fn new(family: impl Into<String>, size_px: f64) -> Self {
        let family = family.into();
        let text = format!("{family} {}px", format_number(size_px));
        Self {
            family,
            size_px,
            text,
        }
    }

    /// Parses a descriptor produced by [`FontDescriptor::new`] or written by hand.
    pub fn parse(descriptor: &str) -> Result<Self, FontError> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| {
            Regex::new(r"^\s*(?P<family>.*\S)\s+(?P<size>[0-9]*\.?[0-9]+)px\s*$")
                .expect("valid regex")
        });
        let invalid = || FontError::InvalidDescriptor {
            descriptor: descriptor.to_string(),
        };
        let caps = re.captures(descriptor).ok_or_else(invalid)?;
        let size_px = caps["size"].parse::<f64>().map_err(|_| invalid())?;
        Ok(Self::new(&caps["family"], size_px))
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn size_px(&self) -> f64 {
        self.size_px
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for FontDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

pub struct FontResolver<'a> {
    catalog: &'a FontFamilyCatalog,
    matcher: &'a dyn FontMatcher,
}

impl<'a> FontResolver<'a> {
    pub fn new(catalog: &'a FontFamilyCatalog, matcher: &'a dyn FontMatcher) -> Self {
        Self { catalog, matcher }
    }

    /// Matcher failures are returned unchanged.
    pub fn resolve(&self, preferences: &str, size_px: f64) -> Result<FontDescriptor, FontError> {
        let list = FontPreferenceList::parse(preferences);
        let selected = list.select(self.catalog);
        let family = self.matcher.best_match(selected)?;
        tracing::trace!(preferences, selected, family = %family, "resolved font family");
        Ok(FontDescriptor::new(family, size_px))
    }
}

#[cfg(test)]
mod tests;
