use super::LocalGeocoder;
use crate::error::Result;
use crate::types::GeocodeResult;
use fuzzy_matcher::{skim::SkimMatcherV2, FuzzyMatcher};
use std::path::Path;

/// In-memory place list searched with fuzzy matching
pub struct Gazetteer {
    places: Vec<GeocodeResult>,
    matcher: SkimMatcherV2,
    max_results: usize,
}

impl std::fmt::Debug for Gazetteer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gazetteer")
            .field("places", &self.places.len())
            .field("matcher", &"SkimMatcherV2")
            .field("max_results", &self.max_results)
            .finish()
    }
}

impl Gazetteer {
    pub fn new(places: Vec<GeocodeResult>) -> Self {
        Self {
            places,
            matcher: SkimMatcherV2::default(),
            max_results: usize::MAX,
        }
    }

    /// Cap the number of matches returned per lookup
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Load a JSON array of places (`place_name`, `center`, optional `bbox`)
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let places: Vec<GeocodeResult> = serde_json::from_str(&content)?;
        log::info!("Loaded {} places from {}", places.len(), path.display());
        Ok(Self::new(places))
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    pub fn search(&self, query: &str) -> Vec<GeocodeResult> {
        let query = query.trim();
        if query.is_empty() {
            return vec![];
        }

        let mut scored: Vec<(i64, &GeocodeResult)> = self
            .places
            .iter()
            .filter_map(|place| {
                let mut score = self.matcher.fuzzy_match(&place.place_name, query)?;
                // Exact and prefix matches first
                if place.place_name.eq_ignore_ascii_case(query) {
                    score += 1_000;
                } else if place
                    .place_name
                    .to_lowercase()
                    .starts_with(&query.to_lowercase())
                {
                    score += 100;
                }
                Some((score, place))
            })
            .collect();

        // Stable sort keeps file order among equal scores
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        scored
            .into_iter()
            .take(self.max_results)
            .map(|(_, place)| place.clone())
            .collect()
    }
}

impl LocalGeocoder for Gazetteer {
    fn lookup(&self, query: &str) -> Vec<GeocodeResult> {
        self.search(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn places() -> Vec<GeocodeResult> {
        vec![
            GeocodeResult::point("Central Park", -73.97, 40.78),
            GeocodeResult::point("Park Slope", -73.98, 40.67),
            GeocodeResult::point("Brooklyn Bridge", -73.99, 40.71),
        ]
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        let gazetteer = Gazetteer::new(places());
        assert!(gazetteer.search("").is_empty());
        assert!(gazetteer.search("   ").is_empty());
    }

    #[test]
    fn test_prefix_match_ranks_first() {
        let gazetteer = Gazetteer::new(places());
        let results = gazetteer.search("park");

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].place_name, "Park Slope");
        assert_eq!(results[1].place_name, "Central Park");
    }

    #[test]
    fn test_max_results_caps_matches() {
        let gazetteer = Gazetteer::new(places()).with_max_results(1);
        assert_eq!(gazetteer.search("park").len(), 1);
    }

    #[test]
    fn test_load_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"place_name":"Tiergarten","center":[13.35,52.51],"bbox":[13.33,52.50,13.37,52.52]}}]"#
        )
        .unwrap();

        let gazetteer = Gazetteer::from_json_file(file.path()).unwrap();
        assert_eq!(gazetteer.len(), 1);
        let results = gazetteer.lookup("tier");
        assert_eq!(results.len(), 1);
        assert!(results[0].bbox.is_some());
    }

    #[test]
    fn test_closure_is_a_local_geocoder() {
        let lookup = |q: &str| vec![GeocodeResult::point(q.to_uppercase(), 0.0, 0.0)];
        let results = LocalGeocoder::lookup(&lookup, "home");
        assert_eq!(results[0].place_name, "HOME");
    }
}
