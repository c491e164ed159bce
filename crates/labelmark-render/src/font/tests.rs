use super::*;
use std::cell::Cell;

struct CountingService {
    families: Vec<&'static str>,
    calls: Cell<usize>,
}

impl FontCatalogService for CountingService {
    fn list_families(&self) -> Result<Vec<String>, FontError> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.families.iter().map(|f| f.to_string()).collect())
    }
}

struct FailingMatcher;

impl FontMatcher for FailingMatcher {
    fn best_match(&self, _family: &str) -> Result<String, FontError> {
        Err(FontError::Catalog {
            message: "backend offline".to_string(),
        })
    }
}

#[test]
fn preference_list_trims_quotes_and_lowercases() {
    let list = FontPreferenceList::parse(r#" "Trebuchet MS", 'DejaVu Sans' ,, Arial , sans-serif"#);
    assert_eq!(
        list.candidates(),
        ["trebuchet ms", "dejavu sans", "arial", "sans-serif"]
    );
}

#[test]
fn first_installed_family_wins_over_generic() {
    let catalog = FontFamilyCatalog::from_families(["Arial"]);
    let backend = StaticFontBackend::new(["Arial"]);
    let resolver = FontResolver::new(&catalog, &backend);

    let font = resolver.resolve("Helvetica, Arial, sans", 12.0).unwrap();
    assert_eq!(font.family(), "Arial");
    assert_eq!(font.to_string(), "Arial 12px");
}

#[test]
fn generic_keyword_is_usable_without_catalog_entry() {
    let catalog = FontFamilyCatalog::default();
    let backend = StaticFontBackend::new(Vec::<String>::new()).with_generic("monospace", "DejaVu Sans Mono");
    let resolver = FontResolver::new(&catalog, &backend);

    let font = resolver.resolve("Consolas, monospace", 10.5).unwrap();
    assert_eq!(font.as_str(), "DejaVu Sans Mono 10.5px");
}

#[test]
fn unknown_family_falls_back_to_sans_serif() {
    let catalog = FontFamilyCatalog::default();
    let backend = StaticFontBackend::default();
    let resolver = FontResolver::new(&catalog, &backend);

    assert_eq!(resolver.resolve("NoSuchFont", 16.0).unwrap().as_str(), "sans-serif 16px");
    assert_eq!(resolver.resolve("", 16.0).unwrap().as_str(), "sans-serif 16px");
    assert_eq!(resolver.resolve(" , ,", 16.0).unwrap().as_str(), "sans-serif 16px");
}

#[test]
fn sans_keyword_maps_to_css_generic() {
    let backend = StaticFontBackend::default().with_generic("sans", "DejaVu Sans");
    assert_eq!(backend.best_match("sans-serif").unwrap(), "DejaVu Sans");
    assert_eq!(backend.best_match("Sans").unwrap(), "DejaVu Sans");
    assert_eq!(StaticFontBackend::default().best_match("sans").unwrap(), "sans-serif");
}

#[test]
fn static_backend_keeps_installed_casing() {
    let backend = StaticFontBackend::new(["DejaVu Serif", "dejavu serif"]);
    assert_eq!(backend.best_match("DEJAVU SERIF").unwrap(), "DejaVu Serif");
    assert_eq!(backend.list_families().unwrap(), vec!["DejaVu Serif".to_string()]);
    assert!(matches!(
        backend.best_match("Comic Sans"),
        Err(FontError::NoMatch { .. })
    ));
}

#[test]
fn matcher_errors_propagate() {
    let catalog = FontFamilyCatalog::from_families(["arial"]);
    let resolver = FontResolver::new(&catalog, &FailingMatcher);
    let err = resolver.resolve("Arial", 12.0).unwrap_err();
    assert_eq!(err.to_string(), "font catalog unavailable: backend offline");
}

#[test]
fn catalog_lowercases_and_lists_once_from_service() {
    let service = CountingService {
        families: vec!["DejaVu Sans", " Noto Serif ", ""],
        calls: Cell::new(0),
    };
    let catalog = FontFamilyCatalog::from_service(&service).unwrap();
    assert_eq!(service.calls.get(), 1);
    assert_eq!(catalog.sorted(), vec!["dejavu sans", "noto serif"]);
    assert!(catalog.contains("noto serif"));
    assert!(!catalog.contains("Noto Serif"));
}

#[test]
fn global_catalog_is_built_once() {
    let first = CountingService {
        families: vec!["Liberation Sans"],
        calls: Cell::new(0),
    };
    let second = CountingService {
        families: vec!["Other"],
        calls: Cell::new(0),
    };

    let a = init_global_catalog(&first).unwrap();
    let b = init_global_catalog(&second).unwrap();
    assert!(std::ptr::eq(a, b));
    assert_eq!(second.calls.get(), 0);
    assert!(global_catalog().is_some());
}

#[test]
fn descriptor_round_trips_through_parse() {
    let font = FontDescriptor::parse("DejaVu Sans Mono 13.5px").unwrap();
    assert_eq!(font.family(), "DejaVu Sans Mono");
    assert_eq!(font.size_px(), 13.5);
    assert_eq!(font.as_str(), "DejaVu Sans Mono 13.5px");

    assert!(FontDescriptor::parse("Arial").is_err());
    assert!(FontDescriptor::parse("12px").is_err());
}
