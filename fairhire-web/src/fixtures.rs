//! Fixture store: candidate records and country demographics
//!
//! Both datasets are loaded once at process start from JSON files and held
//! read-only for the process lifetime; updating the dataset requires a
//! restart. A missing or malformed file is startup-fatal.
//!
//! Candidate country fields arrive free-form (`country`, `origin`, or
//! `Origin` depending on the data vintage) and are normalized to a single
//! lowercase `country` key. Records with no resolvable country are dropped
//! at load time with a warning and never surfaced to callers.

use fairhire_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{info, warn};

/// Education levels recognized by the scoring pipeline
///
/// Unknown spellings collapse to `Other`, which scores as the lowest tier
/// rather than failing the load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EducationLevel {
    HighSchool,
    Bachelors,
    Masters,
    PhD,
    Other,
}

impl EducationLevel {
    /// Numeric feature code used in scoring payloads
    pub fn code(&self) -> u8 {
        match self {
            EducationLevel::HighSchool => 1,
            EducationLevel::Bachelors => 2,
            EducationLevel::Masters => 3,
            EducationLevel::PhD => 4,
            EducationLevel::Other => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EducationLevel::HighSchool => "High School",
            EducationLevel::Bachelors => "Bachelors",
            EducationLevel::Masters => "Masters",
            EducationLevel::PhD => "PhD",
            EducationLevel::Other => "Other",
        }
    }
}

impl From<String> for EducationLevel {
    fn from(value: String) -> Self {
        match value.trim() {
            "High School" => EducationLevel::HighSchool,
            "Bachelors" => EducationLevel::Bachelors,
            "Masters" => EducationLevel::Masters,
            "PhD" => EducationLevel::PhD,
            _ => EducationLevel::Other,
        }
    }
}

impl From<EducationLevel> for String {
    fn from(value: EducationLevel) -> Self {
        value.as_str().to_string()
    }
}

/// A candidate record as it appears in the fixture file
///
/// The country may live in any of three historical field spellings.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCandidate {
    pub name: String,
    pub years_experience: u32,
    pub education: EducationLevel,
    pub qualification_score: f64,
    #[serde(default)]
    pub bias_flags: Vec<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default, rename = "Origin")]
    pub origin_legacy: Option<String>,
}

impl RawCandidate {
    /// Resolve the country from the first non-empty candidate field,
    /// trimmed and lowercased. `None` means the record is dropped.
    fn resolve_country(&self) -> Option<String> {
        [&self.country, &self.origin, &self.origin_legacy]
            .into_iter()
            .flatten()
            .map(|raw| raw.trim().to_lowercase())
            .find(|normalized| !normalized.is_empty())
    }
}

/// A normalized candidate record (immutable after load)
///
/// Invariant: `country` is non-empty and lowercase.
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub name: String,
    pub years_experience: u32,
    pub education: EducationLevel,
    pub qualification_score: f64,
    pub bias_flags: Vec<String>,
    pub country: String,
}

/// Per-country demographic percentages at three education tiers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CountryStats {
    #[serde(default)]
    pub female_low_education: f64,
    #[serde(default)]
    pub female_mid_education: f64,
    #[serde(default)]
    pub female_high_education: f64,
    #[serde(default)]
    pub male_low_education: f64,
    #[serde(default)]
    pub male_mid_education: f64,
    #[serde(default)]
    pub male_high_education: f64,
}

/// Aggregate view of the candidate collection
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_candidates: usize,
    pub average_qualification_score: f64,
    /// Lowercased flag name -> occurrence count across all records
    pub bias_distribution: BTreeMap<String, u64>,
}

/// Read-only holder of both fixture datasets
#[derive(Debug)]
pub struct FixtureStore {
    candidates: Vec<Candidate>,
    country_stats: HashMap<String, CountryStats>,
}

impl FixtureStore {
    /// Load and normalize both fixtures from the data directory
    pub fn load(data_dir: &Path) -> Result<Self> {
        let candidates_path = data_dir.join("candidates.json");
        let stats_path = data_dir.join("country_stats.json");

        let candidates_json = std::fs::read_to_string(&candidates_path).map_err(|e| {
            Error::Config(format!("Read {} failed: {}", candidates_path.display(), e))
        })?;
        let stats_json = std::fs::read_to_string(&stats_path).map_err(|e| {
            Error::Config(format!("Read {} failed: {}", stats_path.display(), e))
        })?;

        let raw: Vec<RawCandidate> = serde_json::from_str(&candidates_json).map_err(|e| {
            Error::Config(format!("Parse {} failed: {}", candidates_path.display(), e))
        })?;
        let stats: HashMap<String, CountryStats> =
            serde_json::from_str(&stats_json).map_err(|e| {
                Error::Config(format!("Parse {} failed: {}", stats_path.display(), e))
            })?;

        let store = Self::new(raw, stats);
        info!(
            "Loaded {} candidates, {} countries",
            store.candidates.len(),
            store.country_stats.len()
        );
        Ok(store)
    }

    /// Build a store from already-parsed fixtures, applying normalization
    pub fn new(raw: Vec<RawCandidate>, stats: HashMap<String, CountryStats>) -> Self {
        let candidates = raw
            .into_iter()
            .filter_map(|record| match record.resolve_country() {
                Some(country) => Some(Candidate {
                    name: record.name,
                    years_experience: record.years_experience,
                    education: record.education,
                    qualification_score: record.qualification_score,
                    bias_flags: record.bias_flags,
                    country,
                }),
                None => {
                    warn!("Dropping candidate '{}': no resolvable country", record.name);
                    None
                }
            })
            .collect();

        // Stats keys are normalized once here; lookups lowercase the query
        let country_stats = stats
            .into_iter()
            .map(|(key, value)| (key.trim().to_lowercase(), value))
            .collect();

        Self {
            candidates,
            country_stats,
        }
    }

    /// All normalized candidates, insertion order preserved
    pub fn get_all(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Totals, mean score, and bias-flag distribution in one pass
    pub fn summarize(&self) -> Summary {
        let total = self.candidates.len();

        let mut score_sum = 0.0;
        let mut bias_distribution: BTreeMap<String, u64> = BTreeMap::new();
        for candidate in &self.candidates {
            score_sum += candidate.qualification_score;
            for flag in &candidate.bias_flags {
                *bias_distribution.entry(flag.to_lowercase()).or_insert(0) += 1;
            }
        }

        let average = if total == 0 { 0.0 } else { score_sum / total as f64 };

        Summary {
            total_candidates: total,
            average_qualification_score: average,
            bias_distribution,
        }
    }

    /// Case-insensitive country lookup; `None` is a first-class result
    pub fn country_stats(&self, name: &str) -> Option<&CountryStats> {
        self.country_stats.get(&name.trim().to_lowercase())
    }

    /// Every known country key, lexicographically sorted
    pub fn list_countries(&self) -> Vec<String> {
        let mut countries: Vec<String> = self.country_stats.keys().cloned().collect();
        countries.sort();
        countries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, country: Option<&str>, origin: Option<&str>, flags: &[&str]) -> RawCandidate {
        RawCandidate {
            name: name.to_string(),
            years_experience: 3,
            education: EducationLevel::Bachelors,
            qualification_score: 50.0,
            bias_flags: flags.iter().map(|f| f.to_string()).collect(),
            country: country.map(String::from),
            origin: origin.map(String::from),
            origin_legacy: None,
        }
    }

    fn store_with(candidates: Vec<RawCandidate>) -> FixtureStore {
        let mut stats = HashMap::new();
        stats.insert("France".to_string(), CountryStats::default());
        stats.insert("germany".to_string(), CountryStats::default());
        FixtureStore::new(candidates, stats)
    }

    #[test]
    fn country_is_normalized_to_lowercase() {
        let store = store_with(vec![raw("Ana", Some("  France "), None, &[])]);
        assert_eq!(store.get_all().len(), 1);
        assert_eq!(store.get_all()[0].country, "france");
    }

    #[test]
    fn origin_field_is_a_fallback() {
        let store = store_with(vec![raw("Ben", None, Some("Germany"), &[])]);
        assert_eq!(store.get_all()[0].country, "germany");
    }

    #[test]
    fn legacy_origin_spelling_resolves() {
        let mut record = raw("Cleo", None, None, &[]);
        record.origin_legacy = Some("INDIA".to_string());
        let store = store_with(vec![record]);
        assert_eq!(store.get_all()[0].country, "india");
    }

    #[test]
    fn records_without_country_are_dropped() {
        let store = store_with(vec![
            raw("Keep", Some("france"), None, &[]),
            raw("Drop", None, None, &[]),
            raw("DropToo", Some("   "), None, &[]),
        ]);
        let names: Vec<&str> = store.get_all().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Keep"]);
    }

    #[test]
    fn summarize_empty_collection() {
        let store = store_with(vec![]);
        let summary = store.summarize();
        assert_eq!(summary.total_candidates, 0);
        assert_eq!(summary.average_qualification_score, 0.0);
        assert!(summary.bias_distribution.is_empty());
    }

    #[test]
    fn summarize_counts_and_averages() {
        let mut a = raw("A", Some("france"), None, &["gender"]);
        a.qualification_score = 40.0;
        let mut b = raw("B", Some("germany"), None, &["Gender", "migrant"]);
        b.qualification_score = 60.0;
        let store = store_with(vec![a, b]);

        let summary = store.summarize();
        assert_eq!(summary.total_candidates, store.get_all().len());
        assert_eq!(summary.average_qualification_score, 50.0);
        // Flags are lowercased before counting
        assert_eq!(summary.bias_distribution.get("gender"), Some(&2));
        assert_eq!(summary.bias_distribution.get("migrant"), Some(&1));
    }

    #[test]
    fn country_stats_lookup_is_case_insensitive() {
        let store = store_with(vec![]);
        assert!(store.country_stats("France").is_some());
        assert!(store.country_stats("france").is_some());
        assert!(store.country_stats("FRANCE").is_some());
        assert!(store.country_stats("nowhereland").is_none());
    }

    #[test]
    fn list_countries_is_sorted_without_duplicates() {
        let mut stats = HashMap::new();
        stats.insert("Germany".to_string(), CountryStats::default());
        stats.insert("france".to_string(), CountryStats::default());
        stats.insert("FRANCE".to_string(), CountryStats::default());
        stats.insert("brazil".to_string(), CountryStats::default());
        let store = FixtureStore::new(vec![], stats);

        let countries = store.list_countries();
        assert_eq!(countries, vec!["brazil", "france", "germany"]);
    }

    #[test]
    fn unknown_education_maps_to_lowest_code() {
        let level = EducationLevel::from("Bootcamp".to_string());
        assert_eq!(level, EducationLevel::Other);
        assert_eq!(level.code(), 1);
        assert_eq!(EducationLevel::from("PhD".to_string()).code(), 4);
    }
}
