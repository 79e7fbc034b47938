//! Supported storefront languages and localized text resolution.
//!
//! Catalog entities store one column per language (`name_uz`, `name_ru`,
//! `name_eng`). In Rust they are modelled as a [`LocalizedText`] map so that
//! a single accessor resolves the value for the caller's [`Locale`], falling
//! back to English.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A storefront language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Uz,
    Ru,
    En,
}

/// Language used when the requested one has no value.
pub const FALLBACK_LOCALE: Locale = Locale::En;

impl Locale {
    /// Short language code (`uz`, `ru`, `en`).
    pub fn code(self) -> &'static str {
        match self {
            Locale::Uz => "uz",
            Locale::Ru => "ru",
            Locale::En => "en",
        }
    }

    /// Pick the first supported language from an `Accept-Language` header value.
    ///
    /// Quality weights are honoured; entries with `q=0` are skipped.
    pub fn from_accept_language(header: &str) -> Option<Locale> {
        let mut candidates: Vec<(f32, Locale)> = header
            .split(',')
            .filter_map(|entry| {
                let mut parts = entry.trim().split(';');
                let tag = parts.next()?.trim();
                let quality = parts
                    .find_map(|p| p.trim().strip_prefix("q="))
                    .and_then(|q| q.parse::<f32>().ok())
                    .unwrap_or(1.0);
                let locale = tag.parse::<Locale>().ok()?;
                (quality > 0.0).then_some((quality, locale))
            })
            .collect();
        // Stable sort keeps header order for equal weights.
        candidates.sort_by(|a, b| b.0.total_cmp(&a.0));
        candidates.first().map(|(_, locale)| *locale)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = String;

    /// Accepts `uz`, `ru`, `en`, `eng`, case-insensitively, ignoring any
    /// region subtag (`ru-RU`, `en_US`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let primary = s
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match primary.as_str() {
            "uz" => Ok(Locale::Uz),
            "ru" => Ok(Locale::Ru),
            "en" | "eng" => Ok(Locale::En),
            _ => Err(format!("Unsupported locale '{s}'. Must be one of: uz, ru, en")),
        }
    }
}

/// A text value available in one or more languages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<Locale, String>);

impl LocalizedText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the three per-language columns. Empty and `None` values are dropped.
    pub fn from_columns(uz: Option<&str>, ru: Option<&str>, eng: Option<&str>) -> Self {
        let mut text = Self::new();
        for (locale, value) in [(Locale::Uz, uz), (Locale::Ru, ru), (Locale::En, eng)] {
            if let Some(v) = value {
                text.set(locale, v);
            }
        }
        text
    }

    /// Set the value for a language. Blank values remove the entry.
    pub fn set(&mut self, locale: Locale, value: impl Into<String>) {
        let value = value.into();
        if value.trim().is_empty() {
            self.0.remove(&locale);
        } else {
            self.0.insert(locale, value);
        }
    }

    /// Exact lookup without fallback.
    pub fn get(&self, locale: Locale) -> Option<&str> {
        self.0.get(&locale).map(String::as_str)
    }

    /// Value for `locale`, else English, else whichever language is present.
    pub fn resolve(&self, locale: Locale) -> Option<&str> {
        self.get(locale)
            .or_else(|| self.get(FALLBACK_LOCALE))
            .or_else(|| self.0.values().next().map(String::as_str))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
