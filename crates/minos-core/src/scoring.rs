//! Business computations: score arithmetic and interest lookup.
//!
//! Both computations consult the cache store through the narrow
//! [`Store`] seam. Scoring is cache-first and degrades gracefully when
//! the cache is unavailable; interest lookup is a read-through whose
//! failures propagate to the caller.

use crate::error::StoreError;
use crate::store::Store;
use chrono::NaiveDate;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::time::Duration;

/// How long a computed score stays cached.
const SCORE_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Validated attributes feeding the score computation.
///
/// Blank values are represented as `None`; a gender of `0` (unknown) is
/// present but scores no points.
#[derive(Debug, Clone, Default)]
pub struct ScoreQuery {
    /// The caller's first name.
    pub first_name: Option<String>,
    /// The caller's last name.
    pub last_name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Normalized phone digit string.
    pub phone: Option<String>,
    /// Birthday as a calendar date.
    pub birthday: Option<NaiveDate>,
    /// Gender code (0 unknown, 1 male, 2 female).
    pub gender: Option<i64>,
}

/// Derives the cache key identifying one scored person.
fn score_cache_key(query: &ScoreQuery) -> String {
    let mut hasher = Sha256::new();
    hasher.update(query.first_name.as_deref().unwrap_or_default());
    hasher.update(query.last_name.as_deref().unwrap_or_default());
    hasher.update(query.phone.as_deref().unwrap_or_default());
    if let Some(birthday) = query.birthday {
        hasher.update(birthday.format("%Y%m%d").to_string());
    }
    format!("uid:{}", hex::encode(hasher.finalize()))
}

/// Computes the caller's score.
///
/// A cached non-zero score is returned as-is. Otherwise: phone and email
/// are worth 1.5 points each, a birthday paired with a known gender 1.5,
/// and a complete name 0.5. The result is written back best-effort with
/// a one-hour time-to-live; cache failures never fail the computation.
pub async fn get_score(store: &dyn Store, query: &ScoreQuery) -> f64 {
    let key = score_cache_key(query);
    if let Some(cached) = store.cache_get(&key).await {
        if let Ok(score) = cached.parse::<f64>() {
            if score != 0.0 {
                return score;
            }
        }
    }

    let mut score = 0.0;
    if query.phone.is_some() {
        score += 1.5;
    }
    if query.email.is_some() {
        score += 1.5;
    }
    if query.birthday.is_some() && query.gender.is_some_and(|g| g != 0) {
        score += 1.5;
    }
    if query.first_name.is_some() && query.last_name.is_some() {
        score += 0.5;
    }

    if !store.cache_set(&key, &score.to_string(), SCORE_CACHE_TTL).await {
        tracing::warn!(key = %key, "score cache write failed");
    }
    score
}

/// Looks up a client's interests under the `i:<id>` key.
///
/// The stored value is JSON; read or decode failures propagate so the
/// transport can answer with an internal error.
pub async fn get_interests(store: &dyn Store, client_id: i64) -> Result<Value, StoreError> {
    let raw = store.get(&format!("i:{client_id}")).await?;
    Ok(serde_json::from_str(&raw)?)
}
