use super::{FontCatalogService, FontError, FontMatcher};
use fontdb::{Database, Family, Query};

/// Fonts installed on the host, via `fontdb`.
pub struct SystemFontBackend {
    db: Database,
}

impl SystemFontBackend {
    pub fn load() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts");
        Self { db }
    }

    pub fn from_database(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Installed spelling of a lower-cased `family`; `fontdb` compares family names exactly.
    fn installed_name(&self, family: &str) -> Option<&str> {
        self.db
            .faces()
            .flat_map(|face| face.families.iter())
            .map(|(name, _)| name.as_str())
            .find(|name| name.to_lowercase() == family)
    }
}

impl FontCatalogService for SystemFontBackend {
    fn list_families(&self) -> Result<Vec<String>, FontError> {
        let families: Vec<String> = self
            .db
            .faces()
            .flat_map(|face| face.families.iter().map(|(name, _)| name.clone()))
            .collect();
        if families.is_empty() {
            return Err(FontError::Catalog {
                message: "no fonts found on this system".to_string(),
            });
        }
        Ok(families)
    }
}

impl FontMatcher for SystemFontBackend {
    fn best_match(&self, family: &str) -> Result<String, FontError> {
        let lower = family.trim().to_lowercase();
        let no_match = || FontError::NoMatch {
            family: family.to_string(),
        };
        let query_family = match lower.as_str() {
            "serif" => Family::Serif,
            "sans" | "sans-serif" => Family::SansSerif,
            "monospace" => Family::Monospace,
            "cursive" => Family::Cursive,
            "fantasy" => Family::Fantasy,
            _ => Family::Name(self.installed_name(&lower).ok_or_else(no_match)?),
        };
        let families = [query_family];
        let query = Query {
            families: &families,
            ..Query::default()
        };
        let id = self.db.query(&query).ok_or_else(no_match)?;
        let face = self.db.face(id).ok_or_else(no_match)?;
        face.families
            .first()
            .map(|(name, _)| name.clone())
            .ok_or_else(no_match)
    }
}
