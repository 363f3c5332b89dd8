//! Catalog of market codes the search backends understand.
//!
//! The engine itself treats regions as opaque strings; this list only feeds
//! the CLI (`marketlens markets`) and its unknown-code warning.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Market {
    pub code: &'static str,
    pub description: &'static str,
}

const fn market(code: &'static str, description: &'static str) -> Market {
    Market { code, description }
}

pub const DEFAULT_MARKET: &str = "en-US";

pub const SUPPORTED_MARKETS: [Market; 23] = [
    market("en-US", "English - United States"),
    market("en-GB", "English - United Kingdom"),
    market("en-AU", "English - Australia"),
    market("en-CA", "English - Canada"),
    market("en-IN", "English - India"),
    market("de-DE", "German - Germany"),
    market("fr-FR", "French - France"),
    market("es-ES", "Spanish - Spain"),
    market("it-IT", "Italian - Italy"),
    market("pt-BR", "Portuguese - Brazil"),
    market("ja-JP", "Japanese - Japan"),
    market("ko-KR", "Korean - South Korea"),
    market("zh-CN", "Chinese - China"),
    market("zh-TW", "Chinese - Taiwan"),
    market("nl-NL", "Dutch - Netherlands"),
    market("pl-PL", "Polish - Poland"),
    market("ru-RU", "Russian - Russia"),
    market("sv-SE", "Swedish - Sweden"),
    market("tr-TR", "Turkish - Turkey"),
    market("ar-SA", "Arabic - Saudi Arabia"),
    market("hi-IN", "Hindi - India"),
    market("th-TH", "Thai - Thailand"),
    market("vi-VN", "Vietnamese - Vietnam"),
];

/// Look up a market by code (exact match)
pub fn find(code: &str) -> Option<&'static Market> {
    SUPPORTED_MARKETS.iter().find(|m| m.code == code)
}

pub fn is_supported(code: &str) -> bool {
    find(code).is_some()
}

/// Codes from `regions` that are not in the catalog, in input order
pub fn unsupported<'a>(regions: &'a [String]) -> Vec<&'a str> {
    regions
        .iter()
        .map(String::as_str)
        .filter(|code| !is_supported(code))
        .collect()
}
