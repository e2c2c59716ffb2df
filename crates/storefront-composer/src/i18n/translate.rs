use std::collections::HashMap;

use storefront_core::locale::{language, normalize_locale};

/// Key -> string lookup per locale.
///
/// A missing key returns the key itself verbatim; callers must not assume a
/// human-readable fallback.
pub trait Translator: Send + Sync {
    fn translate(&self, locale: &str, key: &str) -> String;
}

/// In-memory catalog loaded from the `translations` config section.
///
/// Lookup tries the exact locale (`ar-EG`) and then its language (`ar`).
#[derive(Debug, Default)]
pub struct CatalogTranslator {
    catalogs: HashMap<String, HashMap<String, String>>,
}

impl CatalogTranslator {
    pub fn new(raw: &HashMap<String, HashMap<String, String>>) -> Self {
        let catalogs = raw
            .iter()
            .filter_map(|(locale, entries)| {
                normalize_locale(locale).map(|l| (l, entries.clone()))
            })
            .collect();
        Self { catalogs }
    }

    fn lookup(&self, locale: &str, key: &str) -> Option<&str> {
        let norm = normalize_locale(locale)?;
        self.catalogs
            .get(&norm)
            .and_then(|c| c.get(key))
            .or_else(|| self.catalogs.get(language(&norm)).and_then(|c| c.get(key)))
            .map(String::as_str)
    }
}

impl Translator for CatalogTranslator {
    fn translate(&self, locale: &str, key: &str) -> String {
        self.lookup(locale, key)
            .map(str::to_string)
            .unwrap_or_else(|| key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> CatalogTranslator {
        let mut raw = HashMap::new();
        raw.insert(
            "en".to_string(),
            HashMap::from([("cta.shop".to_string(), "Shop now".to_string())]),
        );
        raw.insert(
            "ar".to_string(),
            HashMap::from([("cta.shop".to_string(), "تسوق الآن".to_string())]),
        );
        CatalogTranslator::new(&raw)
    }

    #[test]
    fn region_falls_back_to_language() {
        let t = catalog();
        assert_eq!(t.translate("ar-EG", "cta.shop"), "تسوق الآن");
        assert_eq!(t.translate("en_GB", "cta.shop"), "Shop now");
    }

    #[test]
    fn missing_key_echoes_key() {
        let t = catalog();
        assert_eq!(t.translate("en", "nope.key"), "nope.key");
        assert_eq!(t.translate("fr", "cta.shop"), "cta.shop");
    }
}
