//! Seed targets: the venues each scan cycle walks.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use radar_common::regions;

/// One scan target: the free-text search query plus the city used for
/// region classification and display-name stripping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedTarget {
    pub query: String,
    pub city: String,
}

impl SeedTarget {
    pub fn new(query: &str, city: &str) -> Self {
        Self {
            query: query.to_string(),
            city: city.to_string(),
        }
    }

    /// Build a target from a bare query, recognizing a trailing city name
    /// when one is present. On-demand scans arrive this way.
    pub fn from_query(query: &str) -> Self {
        let trimmed = query.trim();
        let lowercase = trimmed.to_lowercase();
        let city = regions::city_names()
            .filter(|city| lowercase == *city || lowercase.ends_with(&format!(" {city}")))
            .max_by_key(|city| city.chars().count())
            .unwrap_or("")
            .to_string();
        Self {
            query: trimmed.to_string(),
            city,
        }
    }
}

/// The built-in scan list: storied spots spread across the coverage
/// regions, used when no seed file is configured.
pub fn builtin_seeds() -> Vec<SeedTarget> {
    [
        ("הקוסם תל אביב", "תל אביב"),
        ("מפגש רמבם תל אביב", "תל אביב"),
        ("שווארמה חזן חיפה", "חיפה"),
        ("שווארמה אמיל חיפה", "חיפה"),
        ("סעיד באר שבע", "באר שבע"),
        ("במבינו באר שבע", "באר שבע"),
        ("שאולי חדרה", "חדרה"),
    ]
    .into_iter()
    .map(|(query, city)| SeedTarget::new(query, city))
    .collect()
}

/// Load seed targets from a JSON file — an array of `{"query", "city"}`
/// objects — or fall back to the built-in list.
pub fn load_seeds(path: Option<&str>) -> Result<Vec<SeedTarget>> {
    let Some(path) = path else {
        return Ok(builtin_seeds());
    };
    let raw =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read seed file {path}"))?;
    let seeds: Vec<SeedTarget> =
        serde_json::from_str(&raw).with_context(|| format!("Failed to parse seed file {path}"))?;
    Ok(seeds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use radar_common::classify;
    use std::collections::HashSet;

    #[test]
    fn builtin_list_spans_four_regions() {
        let regions: HashSet<_> = builtin_seeds()
            .iter()
            .map(|seed| classify(&seed.city).expect("builtin city must classify"))
            .collect();
        assert_eq!(regions.len(), 4);
    }

    #[test]
    fn from_query_recognizes_a_trailing_city() {
        assert_eq!(SeedTarget::from_query("שווארמה חזן חיפה").city, "חיפה");
        assert_eq!(SeedTarget::from_query("במבינו באר שבע").city, "באר שבע");
        assert_eq!(SeedTarget::from_query("מקום כלשהו").city, "");
    }

    #[test]
    fn seed_file_shape_is_query_and_city() {
        let parsed: Vec<SeedTarget> = serde_json::from_str(
            r#"[{"query": "פלאפל הנשיא אשדוד", "city": "אשדוד"}]"#,
        )
        .unwrap();
        assert_eq!(parsed[0], SeedTarget::new("פלאפל הנשיא אשדוד", "אשדוד"));
    }

    #[test]
    fn missing_seed_file_is_an_error_not_a_fallback() {
        assert!(load_seeds(Some("/definitely/not/here.json")).is_err());
    }
}
