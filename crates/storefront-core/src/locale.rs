//! Locale and text-direction primitives.
//!
//! Every consumer that needs a locale (tenant resolver, page composer, block
//! renderers) realizes it through [`realize_locale`], so the precedence
//! explicit > ambient > global default is identical across one page.

use serde::{Deserialize, Serialize};

/// Hard-coded last-resort locale for translations and formatting.
pub const DEFAULT_LOCALE: &str = "en";

/// Language subtag rendered right-to-left.
const RTL_LANGUAGE: &str = "ar";

/// Text direction of a rendered page or block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Direction {
    /// Direction is a pure function of the locale's language subtag.
    pub fn for_locale(locale: &str) -> Self {
        if language(locale).eq_ignore_ascii_case(RTL_LANGUAGE) {
            Direction::Rtl
        } else {
            Direction::Ltr
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }
}

/// Language subtag of a BCP-47-ish tag (`"ar-EG"` -> `"ar"`).
pub fn language(locale: &str) -> &str {
    locale.split(is_subtag_sep).next().unwrap_or(locale)
}

/// Canonical form: `_` becomes `-`, language lowercase, region uppercase.
///
/// Returns `None` for empty or whitespace-only input.
pub fn normalize_locale(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let mut parts = raw.split(is_subtag_sep).filter(|p| !p.is_empty());
    let lang = parts.next()?.to_ascii_lowercase();
    let mut out = lang;
    for p in parts {
        out.push('-');
        if p.len() == 2 {
            out.push_str(&p.to_ascii_uppercase());
        } else {
            out.push_str(p);
        }
    }
    Some(out)
}

fn is_subtag_sep(c: char) -> bool {
    c == '-' || c == '_'
}

/// Three-tier locale precedence: explicit override, then ambient context, then
/// the global default. Blank values count as absent.
pub fn realize_locale<'a>(
    explicit: Option<&'a str>,
    ambient: Option<&'a str>,
    global: &'a str,
) -> &'a str {
    fn present(v: Option<&str>) -> Option<&str> {
        v.map(str::trim).filter(|s| !s.is_empty())
    }
    present(explicit)
        .or_else(|| present(ambient))
        .unwrap_or(global)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_follows_language() {
        assert_eq!(Direction::for_locale("ar"), Direction::Rtl);
        assert_eq!(Direction::for_locale("ar-EG"), Direction::Rtl);
        assert_eq!(Direction::for_locale("AR_sa"), Direction::Rtl);
        assert_eq!(Direction::for_locale("en-US"), Direction::Ltr);
        assert_eq!(Direction::for_locale("arn"), Direction::Ltr);
    }

    #[test]
    fn normalize_handles_separators_and_case() {
        assert_eq!(normalize_locale("EN_us").as_deref(), Some("en-US"));
        assert_eq!(normalize_locale(" fr ").as_deref(), Some("fr"));
        assert_eq!(normalize_locale("zh-Hant-TW").as_deref(), Some("zh-Hant-TW"));
        assert_eq!(normalize_locale("   "), None);
    }

    #[test]
    fn explicit_wins_over_ambient_and_global() {
        assert_eq!(realize_locale(Some("de"), Some("fr"), "en"), "de");
        assert_eq!(realize_locale(None, Some("fr"), "en"), "fr");
        assert_eq!(realize_locale(Some(" "), None, "en"), "en");
    }
}
