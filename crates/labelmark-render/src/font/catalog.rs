use super::{FontCatalogService, FontError};
use rustc_hash::FxHashSet;
use std::sync::OnceLock;

/// Lower-cased names of the installed font families.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontFamilyCatalog {
    families: FxHashSet<String>,
}

impl FontFamilyCatalog {
    pub fn from_families<I, S>(families: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let families = families
            .into_iter()
            .map(|f| f.as_ref().trim().to_lowercase())
            .filter(|f| !f.is_empty())
            .collect();
        Self { families }
    }

    pub fn from_service(service: &dyn FontCatalogService) -> Result<Self, FontError> {
        let catalog = Self::from_families(service.list_families()?);
        tracing::debug!(families = catalog.len(), "built font family catalog");
        Ok(catalog)
    }

    /// `family` is expected lower-cased.
    pub fn contains(&self, family: &str) -> bool {
        self.families.contains(family)
    }

    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    /// Family names in sorted order.
    pub fn sorted(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.families.iter().map(String::as_str).collect();
        out.sort_unstable();
        out
    }
}

static GLOBAL_CATALOG: OnceLock<FontFamilyCatalog> = OnceLock::new();

/// Builds the process-wide catalog from `service` on first call.
///
/// Later calls return the stored catalog and do not consult `service`. A failed listing leaves
/// the catalog uninitialized so the call can be repeated.
pub fn init_global_catalog(
    service: &dyn FontCatalogService,
) -> Result<&'static FontFamilyCatalog, FontError> {
    if let Some(catalog) = GLOBAL_CATALOG.get() {
        return Ok(catalog);
    }
    let catalog = FontFamilyCatalog::from_service(service)?;
    Ok(GLOBAL_CATALOG.get_or_init(|| catalog))
}

pub fn global_catalog() -> Option<&'static FontFamilyCatalog> {
    GLOBAL_CATALOG.get()
}
