use chrono::NaiveDate;
use storefront_core::locale::language;

/// Locale-aware currency / number / date formatting.
///
/// All methods are pure functions of their arguments.
pub trait Formatter: Send + Sync {
    fn format_currency(&self, amount: f64, currency: &str, locale: &str) -> String;
    fn format_number(&self, value: f64, locale: &str) -> String;
    fn format_date(&self, date: NaiveDate, locale: &str) -> String;
}

/// Separator conventions keyed by language subtag.
#[derive(Debug, Clone, Copy)]
struct Separators {
    group: &'static str,
    decimal: char,
    symbol_first: bool,
}

fn separators(locale: &str) -> Separators {
    match language(locale).to_ascii_lowercase().as_str() {
        "de" | "es" | "it" | "nl" | "pt" | "tr" | "id" | "da" => Separators {
            group: ".",
            decimal: ',',
            symbol_first: false,
        },
        "fr" | "ru" | "pl" | "sv" | "nb" | "fi" | "cs" | "uk" => Separators {
            group: "\u{a0}",
            decimal: ',',
            symbol_first: false,
        },
        "ar" => Separators {
            group: ",",
            decimal: '.',
            symbol_first: false,
        },
        _ => Separators {
            group: ",",
            decimal: '.',
            symbol_first: true,
        },
    }
}

fn currency_symbol(code: &str) -> Option<&'static str> {
    match code {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        "INR" => Some("₹"),
        "KRW" => Some("₩"),
        _ => None,
    }
}

fn minor_digits(code: &str) -> u32 {
    match code {
        "JPY" | "KRW" => 0,
        "BHD" | "KWD" | "OMR" => 3,
        _ => 2,
    }
}

/// Built-in formatter with a small table of separator/symbol conventions.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocaleFormatter;

impl LocaleFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Formatter for LocaleFormatter {
    fn format_currency(&self, amount: f64, currency: &str, locale: &str) -> String {
        let code = currency.trim().to_ascii_uppercase();
        let sep = separators(locale);
        let digits = fixed(amount.abs(), minor_digits(&code), sep);
        let sign = if amount < 0.0 { "-" } else { "" };

        match currency_symbol(&code) {
            Some(sym) if sep.symbol_first => format!("{sign}{sym}{digits}"),
            Some(sym) => format!("{sign}{digits}\u{a0}{sym}"),
            None if sep.symbol_first => format!("{sign}{code}\u{a0}{digits}"),
            None => format!("{sign}{digits}\u{a0}{code}"),
        }
    }

    fn format_number(&self, value: f64, locale: &str) -> String {
        let sep = separators(locale);
        let sign = if value < 0.0 { "-" } else { "" };
        let v = value.abs();
        // Integers print without a fractional part; others keep up to 2 places.
        let body = if v.fract() == 0.0 {
            fixed(v, 0, sep)
        } else {
            let s = fixed(v, 2, sep);
            s.trim_end_matches('0')
                .trim_end_matches(sep.decimal)
                .to_string()
        };
        format!("{sign}{body}")
    }

    fn format_date(&self, date: NaiveDate, locale: &str) -> String {
        let pattern = match language(locale).to_ascii_lowercase().as_str() {
            "en" => "%b %-d, %Y",
            "de" | "ru" | "pl" | "cs" | "fi" | "nb" | "da" => "%d.%m.%Y",
            "fr" | "es" | "it" | "pt" | "nl" | "tr" | "id" => "%d/%m/%Y",
            _ => "%Y-%m-%d",
        };
        date.format(pattern).to_string()
    }
}

/// Fixed-point rendering of a non-negative value with digit grouping.
fn fixed(v: f64, decimals: u32, sep: Separators) -> String {
    let scale = 10u128.pow(decimals);
    let scaled = (v * scale as f64).round() as u128;
    let int_part = scaled / scale;
    let frac = scaled % scale;

    let raw = int_part.to_string();
    let mut grouped = String::with_capacity(raw.len() + raw.len() / 3);
    for (i, ch) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            grouped.push_str(sep.group);
        }
        grouped.push(ch);
    }

    if decimals == 0 {
        grouped
    } else {
        format!(
            "{grouped}{}{:0width$}",
            sep.decimal,
            frac,
            width = decimals as usize
        )
    }
}
