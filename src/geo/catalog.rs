//! Location catalog with name-normalised lookup.
//!
//! The catalog combines the world city database of the `cities` crate with
//! user-defined locations from the configuration file. Lookups ignore case,
//! punctuation and diacritics (including the Turkish dotless ı and dotted İ),
//! and a `"City, Country"` query narrows duplicates down to one country.

use anyhow::Result;
use chrono_tz::Tz;

use crate::geo::GeoLocation;
use crate::geo::timezone::determine_timezone_from_coordinates;

/// One named place known to the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub name: String,
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    /// Explicit timezone; looked up from the coordinates when absent.
    pub timezone: Option<Tz>,
}

impl CatalogEntry {
    /// Display name, `"City, Country"` when the country is known.
    pub fn display_name(&self) -> String {
        match &self.country {
            Some(country) => format!("{}, {}", self.name, country),
            None => self.name.clone(),
        }
    }

    /// Build the location, resolving the timezone if needed.
    pub fn to_location(&self) -> Result<GeoLocation> {
        let timezone = self
            .timezone
            .unwrap_or_else(|| determine_timezone_from_coordinates(self.latitude, self.longitude));
        GeoLocation::new(self.display_name(), self.latitude, self.longitude, timezone)
    }

    fn matches(&self, name: &str, country: Option<&str>) -> bool {
        if normalize_name(&self.name) != name {
            return false;
        }
        match (country, &self.country) {
            (None, _) => true,
            (Some(wanted), Some(actual)) => normalize_name(actual).starts_with(wanted),
            (Some(_), None) => false,
        }
    }
}

/// Read-only collection of named locations.
#[derive(Debug, Clone, Default)]
pub struct LocationCatalog {
    entries: Vec<CatalogEntry>,
}

impl LocationCatalog {
    /// Catalog without any entries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Catalog backed by the bundled world city database.
    pub fn builtin() -> Self {
        let iter = IntoIterator::into_iter(cities::all());
        let entries = iter
            .filter_map(|city| {
                if city.city.trim().is_empty() {
                    return None;
                }
                Some(CatalogEntry {
                    name: city.city.to_string(),
                    country: Some(city.country.to_string()),
                    latitude: city.latitude,
                    longitude: city.longitude,
                    timezone: None,
                })
            })
            .collect();
        Self { entries }
    }

    /// Add user-defined entries ahead of the existing ones.
    pub fn with_custom(mut self, custom: Vec<CatalogEntry>) -> Self {
        let mut entries = custom;
        entries.append(&mut self.entries);
        self.entries = entries;
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry matching the query.
    pub fn find(&self, query: &str) -> Option<&CatalogEntry> {
        let (name, country) = split_query(query);
        if name.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|entry| entry.matches(&name, country.as_deref()))
    }

    /// Entries whose normalised name starts with the normalised query.
    pub fn search(&self, query: &str, max_results: usize) -> Vec<&CatalogEntry> {
        let prefix = normalize_name(query);
        if prefix.is_empty() {
            return Vec::new();
        }
        self.entries
            .iter()
            .filter(|entry| normalize_name(&entry.name).starts_with(&prefix))
            .take(max_results)
            .collect()
    }

    /// Resolve a query to a location.
    ///
    /// # Errors
    /// No entry matches; the message lists close candidates when there are any.
    pub fn resolve(&self, query: &str) -> Result<GeoLocation> {
        if let Some(entry) = self.find(query) {
            return entry.to_location();
        }

        let (name, _) = split_query(query);
        let suggestions: Vec<String> = self
            .search(&name, 5)
            .into_iter()
            .map(CatalogEntry::display_name)
            .collect();
        if suggestions.is_empty() {
            anyhow::bail!("Unknown location: {}", query);
        }
        anyhow::bail!(
            "Unknown location: {}. Did you mean: {}?",
            query,
            suggestions.join("; ")
        )
    }
}

/// Split `"City, Country"` into normalised parts.
fn split_query(query: &str) -> (String, Option<String>) {
    match query.split_once(',') {
        Some((name, country)) => {
            let country = normalize_name(country);
            (
                normalize_name(name),
                if country.is_empty() { None } else { Some(country) },
            )
        }
        None => (normalize_name(query), None),
    }
}

/// Normalise a place name for comparison.
///
/// Lowercases, folds diacritics to ASCII and collapses every run of
/// punctuation or whitespace to a single space.
pub fn normalize_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    let mut pending_space = false;

    for c in name.chars() {
        // İ lowercases to "i" + combining dot, fold it up front
        let lowered: Vec<char> = if c == 'İ' {
            vec!['i']
        } else {
            c.to_lowercase().collect()
        };

        for lc in lowered {
            if is_combining_mark(lc) {
                continue;
            }
            let folded = fold_diacritic(lc);
            if folded.is_alphanumeric() {
                if pending_space && !normalized.is_empty() {
                    normalized.push(' ');
                }
                pending_space = false;
                normalized.push(folded);
            } else {
                pending_space = true;
            }
        }
    }

    normalized
}

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}

fn fold_diacritic(c: char) -> char {
    match c {
        'ı' | 'í' | 'ì' | 'î' | 'ï' => 'i',
        'ş' | 'ș' | 'ś' | 'š' => 's',
        'ğ' => 'g',
        'ü' | 'ú' | 'ù' | 'û' => 'u',
        'ö' | 'ó' | 'ò' | 'ô' | 'õ' | 'ø' => 'o',
        'ç' | 'ć' | 'č' => 'c',
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'ñ' => 'n',
        'ý' | 'ÿ' => 'y',
        'ž' | 'ź' | 'ż' => 'z',
        _ => c,
    }
}
