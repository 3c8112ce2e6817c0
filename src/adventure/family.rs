//! Family gamification: registration, stats and best-effort progress recording.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

use super::{ops, AdventureClient};
use crate::api::{self, with_query, ApiError, Backend};
use crate::metrics;

/// Identifier the backend assigned to a family.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FamilyId(String);

impl FamilyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Trimmed id, or `None` when nothing is left.
    pub fn parse(id: &str) -> Option<Self> {
        let id = id.trim();
        if id.is_empty() {
            None
        } else {
            Some(Self::new(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FamilyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildProfile {
    pub name: String,
    pub age: u8,
}

/// Registration payload for `gamification/family/create`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyProfile {
    pub name: String,
    pub children: Vec<ChildProfile>,
}

impl FamilyProfile {
    pub fn ages(&self) -> Vec<u8> {
        self.children.iter().map(|c| c.age).collect()
    }
}

/// Progress summary for a family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyStats {
    pub total_challenges: u32,
    pub completed_challenges: u32,
    pub total_score: u32,
    pub average_score: f64,
    pub places_visited: u32,
    pub current_level: u32,
    pub achievements: u32,
}

impl Default for FamilyStats {
    fn default() -> Self {
        Self {
            total_challenges: 0,
            completed_challenges: 0,
            total_score: 0,
            average_score: 0.0,
            places_visited: 0,
            current_level: 1,
            achievements: 0,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreateFamilyResponse {
    family_id: Value,
}

#[derive(Debug, Deserialize)]
struct LevelResponse {
    #[serde(default = "default_level")]
    level: u32,
}

fn default_level() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
struct StatsResponse {
    #[serde(default)]
    challenges_completed: u32,
    #[serde(default)]
    total_points: u32,
    #[serde(default)]
    places_visited_count: u32,
    #[serde(default)]
    current_level: Option<LevelResponse>,
    #[serde(default)]
    achievements_count: u32,
}

impl From<StatsResponse> for FamilyStats {
    fn from(resp: StatsResponse) -> Self {
        let completed = resp.challenges_completed;
        Self {
            total_challenges: completed,
            completed_challenges: completed,
            total_score: resp.total_points,
            average_score: resp.total_points as f64 / completed.max(1) as f64,
            places_visited: resp.places_visited_count,
            current_level: resp.current_level.map(|l| l.level).unwrap_or(1),
            achievements: resp.achievements_count,
        }
    }
}

fn family_path(family: &FamilyId, action: &str) -> String {
    format!(
        "gamification/family/{}/{}",
        urlencoding::encode(family.as_str()),
        action
    )
}

impl<B: Backend> AdventureClient<B> {
    /// Register a family. `None` when the backend is unavailable or returns no id.
    pub async fn create_family(&self, profile: &FamilyProfile) -> Option<FamilyId> {
        let body = match serde_json::to_value(profile) {
            Ok(body) => body,
            Err(e) => {
                warn!("Could not encode family profile: {}", e);
                return None;
            }
        };
        let result = self
            .backend
            .post("gamification/family/create", &body)
            .await
            .and_then(api::parse::<CreateFamilyResponse>)
            .and_then(|resp| {
                let id = match resp.family_id {
                    Value::String(s) => FamilyId::parse(&s),
                    Value::Number(n) => FamilyId::parse(&n.to_string()),
                    _ => None,
                };
                id.ok_or(ApiError::Empty)
            });
        match result {
            Ok(id) => {
                metrics::record_backend(ops::FAMILY);
                info!("Family '{}' registered as {}", profile.name, id);
                Some(id)
            }
            Err(e) => {
                metrics::record_fallback(ops::FAMILY);
                warn!("Could not create family '{}': {}", profile.name, e);
                None
            }
        }
    }

    /// Stats for a family; zeros and level 1 when the backend cannot answer.
    pub async fn family_stats(&self, family: &FamilyId) -> FamilyStats {
        let result = self
            .backend
            .get(&family_path(family, "stats"))
            .await
            .and_then(api::parse::<StatsResponse>);
        match result {
            Ok(resp) => {
                metrics::record_backend(ops::FAMILY);
                resp.into()
            }
            Err(e) => {
                metrics::record_fallback(ops::FAMILY);
                warn!("Could not fetch stats for family {}: {}", family, e);
                FamilyStats::default()
            }
        }
    }

    /// Record a visit; returns whether the backend accepted it.
    pub async fn record_place_visit(&self, family: &FamilyId, place_name: &str) -> bool {
        let path = with_query(&family_path(family, "visit-place"), "place_name", place_name);
        self.post_best_effort(&path, "place visit").await
    }

    /// Record a completed challenge; returns whether the backend accepted it.
    pub async fn record_challenge_completion(&self, family: &FamilyId) -> bool {
        let path = family_path(family, "complete-challenge");
        self.post_best_effort(&path, "challenge completion").await
    }

    async fn post_best_effort(&self, path: &str, what: &str) -> bool {
        match self
            .backend
            .post(path, &json!({}))
            .await
            .and_then(api::unwrap_envelope)
        {
            Ok(_) => true,
            Err(e) => {
                warn!("Could not record {}: {}", what, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_average_guards_zero_challenges() {
        let resp: StatsResponse = serde_json::from_value(json!({
            "total_points": 50,
            "places_visited_count": 2
        }))
        .unwrap();
        let stats = FamilyStats::from(resp);
        assert_eq!(stats.average_score, 50.0);
        assert_eq!(stats.current_level, 1);
    }

    #[test]
    fn stats_map_nested_level() {
        let resp: StatsResponse = serde_json::from_value(json!({
            "challenges_completed": 4,
            "total_points": 100,
            "places_visited_count": 3,
            "current_level": {"level": 2, "name": "Explorador"},
            "achievements_count": 1
        }))
        .unwrap();
        let stats = FamilyStats::from(resp);
        assert_eq!(stats.completed_challenges, 4);
        assert_eq!(stats.average_score, 25.0);
        assert_eq!(stats.current_level, 2);
        assert_eq!(stats.achievements, 1);
    }

    #[test]
    fn blank_ids_are_not_families() {
        assert_eq!(FamilyId::parse(""), None);
        assert_eq!(FamilyId::parse("   "), None);
        assert_eq!(FamilyId::parse(" 42 "), Some(FamilyId::new("42")));
    }

    #[test]
    fn family_paths_encode_ids() {
        let id = FamilyId::new("fam 1");
        assert_eq!(
            family_path(&id, "stats"),
            "gamification/family/fam%201/stats"
        );
    }

    #[test]
    fn profile_serializes_children() {
        let profile = FamilyProfile {
            name: "Familia García".to_string(),
            children: vec![ChildProfile {
                name: "Lucía".to_string(),
                age: 7,
            }],
        };
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["children"][0]["age"], 7);
        assert_eq!(profile.ages(), vec![7]);
    }
}
