use super::{FontCatalogService, FontError, FontMatcher, is_generic_family};
use rustc_hash::FxHashMap;

/// An in-memory font backend.
///
/// Installed names match case-insensitively and come back with their original casing. Generic
/// keywords resolve through the configured generic table; an unmapped keyword resolves to its
/// CSS spelling (`sans` becomes `sans-serif`), which SVG consumers understand natively.
#[derive(Debug, Clone, Default)]
pub struct StaticFontBackend {
    families: Vec<String>,
    by_lower: FxHashMap<String, usize>,
    generics: FxHashMap<String, String>,
}

impl StaticFontBackend {
    pub fn new<I, S>(families: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut backend = Self::default();
        for family in families {
            let family = family.into();
            let lower = family.trim().to_lowercase();
            if lower.is_empty() || backend.by_lower.contains_key(&lower) {
                continue;
            }
            backend.by_lower.insert(lower, backend.families.len());
            backend.families.push(family.trim().to_string());
        }
        backend
    }

    /// Maps a generic keyword (`serif`, `monospace`, ...) to a concrete family.
    pub fn with_generic(mut self, keyword: &str, family: impl Into<String>) -> Self {
        let keyword = canonical_generic(&keyword.to_lowercase()).to_string();
        self.generics.insert(keyword, family.into());
        self
    }
}

fn canonical_generic(keyword: &str) -> &str {
    if keyword == "sans" { "sans-serif" } else { keyword }
}

impl FontCatalogService for StaticFontBackend {
    fn list_families(&self) -> Result<Vec<String>, FontError> {
        Ok(self.families.clone())
    }
}

impl FontMatcher for StaticFontBackend {
    fn best_match(&self, family: &str) -> Result<String, FontError> {
        let lower = family.trim().to_lowercase();
        if let Some(&idx) = self.by_lower.get(&lower) {
            return Ok(self.families[idx].clone());
        }
        if is_generic_family(&lower) {
            let keyword = canonical_generic(&lower);
            return Ok(self
                .generics
                .get(keyword)
                .cloned()
                .unwrap_or_else(|| keyword.to_string()));
        }
        Err(FontError::NoMatch {
            family: family.to_string(),
        })
    }
}
