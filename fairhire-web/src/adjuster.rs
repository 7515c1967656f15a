//! Batch scoring-and-adjustment pipeline
//!
//! Maps every fixture candidate to a feature payload, fans the payloads out
//! to the scoring service with bounded concurrency, and applies a
//! deterministic bias adjustment to each result.
//!
//! Score convention: the upstream returns a 0-1 probability; every score
//! this system derives is a 0-100 percentage. The conversion happens here
//! and nowhere else.
//!
//! The batch is all-or-nothing: one failed scoring call fails the whole
//! operation, with no partial results and no per-item error reporting.
//! Already-started sibling calls are not cancelled; their results are
//! discarded when the aggregate fails.

use fairhire_common::{Error, Result};
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::fixtures::{Candidate, CountryStats, FixtureStore};
use crate::scoring::Scorer;

/// Default bound on in-flight scoring calls
///
/// Unbounded fan-out has destabilized the upstream before; keep this small.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Flags that qualify a candidate for the score adjustment
const PROTECTED_FLAGS: [&str; 2] = ["gender", "migrant"];

/// Per-candidate result of the batch adjustment
#[derive(Debug, Clone, Serialize)]
pub struct AdjustedCandidate {
    pub name: String,
    pub original_score: f64,
    /// Rounded to the nearest integer
    pub adjusted_score: i64,
    pub hired: bool,
}

/// Bucket `years_experience` into the scorer's age-group feature
pub fn age_group(years_experience: u32) -> u8 {
    match years_experience {
        0..=1 => 1,
        2..=4 => 2,
        5..=9 => 3,
        _ => 4,
    }
}

/// Count how many of a candidate's flags are in the protected set
pub fn bump_count(bias_flags: &[String]) -> u32 {
    PROTECTED_FLAGS
        .iter()
        .filter(|protected| {
            bias_flags
                .iter()
                .any(|flag| flag.eq_ignore_ascii_case(protected))
        })
        .count() as u32
}

/// Apply the deterministic bias adjustment
pub fn adjust_score(original: f64, tolerance: f64, bumps: u32) -> f64 {
    original + tolerance * 5.0 * f64::from(bumps)
}

/// Derive the scoring feature payload for one candidate
///
/// A candidate whose country has no stats entry gets zeroed demographic
/// fields; the fields are always present in the payload.
pub fn feature_payload(candidate: &Candidate, stats: &CountryStats) -> Value {
    json!({
        "age_group": age_group(candidate.years_experience),
        "education_level": candidate.education.code(),
        "professional_developer": 1,
        "years_experience": candidate.years_experience,
        "female_low_education": stats.female_low_education,
        "female_mid_education": stats.female_mid_education,
        "female_high_education": stats.female_high_education,
        "male_low_education": stats.male_low_education,
        "male_mid_education": stats.male_mid_education,
        "male_high_education": stats.male_high_education,
    })
}

/// Extract the raw probability from a scorer response
fn raw_score(response: &Value) -> Result<f64> {
    response
        .get("qualification_score")
        .and_then(Value::as_f64)
        .ok_or_else(|| {
            Error::Internal("Scorer response missing numeric qualification_score".to_string())
        })
}

/// Run the full batch: score every candidate concurrently, adjust, decide
///
/// Results are in fixture iteration order regardless of completion order.
pub async fn run_batch<S: Scorer + Sync>(
    store: &FixtureStore,
    scorer: &S,
    min_score: f64,
    tolerance: f64,
    concurrency: usize,
) -> Result<Vec<AdjustedCandidate>> {
    let candidates = store.get_all();

    let payloads: Vec<Value> = candidates
        .iter()
        .map(|candidate| {
            let stats = match store.country_stats(&candidate.country) {
                Some(stats) => stats.clone(),
                None => {
                    warn!(
                        "No country stats for '{}' (candidate '{}'), using zeroed demographics",
                        candidate.country, candidate.name
                    );
                    CountryStats::default()
                }
            };
            feature_payload(candidate, &stats)
        })
        .collect();

    // `buffered` preserves input order while keeping up to `concurrency`
    // calls in flight; the first error fails the whole batch
    let raw_scores: Vec<f64> = stream::iter(payloads)
        .map(|payload| async move {
            let response = scorer.predict(&payload).await?;
            raw_score(&response)
        })
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    let results = candidates
        .iter()
        .zip(raw_scores)
        .map(|(candidate, raw)| {
            let original = raw * 100.0;
            let adjusted = adjust_score(original, tolerance, bump_count(&candidate.bias_flags));
            AdjustedCandidate {
                name: candidate.name.clone(),
                original_score: original,
                adjusted_score: adjusted.round() as i64,
                hired: adjusted >= min_score,
            }
        })
        .collect();

    Ok(results)
}
