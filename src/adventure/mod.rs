//! # Adventure client
//!
//! [`AdventureClient`] turns the handful of things a family can ask for into
//! backend calls and guarantees each one ends with something to show:
//!
//! - [`AdventureClient::start_adventure`] - narrative for the current position
//! - [`AdventureClient::generate_route`] - multi-category itinerary (see [`route`])
//! - [`AdventureClient::generate_challenge`] - story, curiosity and challenge for a place
//! - [`AdventureClient::validate_answer`] - local grading plus best-effort gamification
//!
//! Every backend failure (transport, timeout, non-2xx, `success: false`, empty
//! payload) is logged and replaced with content from [`crate::content`]. None of
//! these operations return an error.
//!
//! The client is a plain value owned by whoever drives a session; there is no
//! global instance. Family and chat state also live with the caller.

pub mod chat;
pub mod family;
pub mod route;

use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::json;

use crate::api::{self, ApiError, Backend};
use crate::config::AdventureConfig;
use crate::content;
use crate::logutil::escape_log;
use crate::metrics;
use crate::model::{
    AdventureContent, ChallengeResult, ContentSource, Coordinates, Difficulty, HealthStatus,
    Place, ValidationResult,
};
use crate::validation::{average_age, normalize_ages};

use family::FamilyId;

/// Metric keys, one per orchestration operation.
pub mod ops {
    pub const START_ADVENTURE: &str = "start_adventure";
    pub const GENERATE_ROUTE: &str = "generate_route";
    pub const NEARBY_ROUTE: &str = "nearby_route";
    pub const CHALLENGE: &str = "challenge";
    pub const STORY: &str = "story";
    pub const CURIOSITY: &str = "curiosity";
    pub const CHAT: &str = "chat";
    pub const FAMILY: &str = "family";
}

/// Rewards handed out per completed challenge.
pub const REWARDS_PER_CHALLENGE: usize = 3;

/// Answers must be longer than this (in characters, after trimming) to count.
pub const MIN_ANSWER_CHARS: usize = 10;

const ENDPOINT_START: &str = "adventure/start";
const ENDPOINT_ASK: &str = "qa/ask";
const ENDPOINT_HEALTH: &str = "health";

#[derive(Debug, Default, Deserialize)]
struct StartAdventureResponse {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    story: Option<String>,
    #[serde(default)]
    challenge: Option<String>,
    #[serde(default)]
    curiosity: Option<String>,
    #[serde(default)]
    reward: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    duration: Option<String>,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    age_range: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AskResponse {
    #[serde(default)]
    answer: Option<String>,
}

/// Session-scoped client for the adventure backend.
pub struct AdventureClient<B: Backend> {
    backend: B,
    config: AdventureConfig,
}

impl<B: Backend> AdventureClient<B> {
    pub fn new(backend: B, config: AdventureConfig) -> Self {
        Self { backend, config }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &AdventureConfig {
        &self.config
    }

    /// Caller ages, or the configured defaults when none were given.
    fn ages(&self, child_ages: &[u8]) -> Vec<u8> {
        normalize_ages(child_ages, &self.config.default_children_ages)
    }

    /// Start an adventure at `location`.
    ///
    /// Backend fields are used where present and non-blank; missing ones are
    /// filled from the local GPS adventure. When the call fails the whole local
    /// adventure is returned, with the coordinates echoed in the story.
    pub async fn start_adventure(
        &self,
        location: Coordinates,
        child_ages: &[u8],
    ) -> AdventureContent {
        let ages = self.ages(child_ages);
        let body = json!({
            "latitude": location.latitude,
            "longitude": location.longitude,
            "children_ages": ages,
        });

        let result = self
            .backend
            .post(ENDPOINT_START, &body)
            .await
            .and_then(api::parse::<StartAdventureResponse>)
            .and_then(|resp| {
                if non_blank(&resp.story).is_none() && non_blank(&resp.challenge).is_none() {
                    Err(ApiError::Empty)
                } else {
                    Ok(resp)
                }
            });

        let local = content::gps_adventure(location);
        match result {
            Ok(resp) => {
                metrics::record_backend(ops::START_ADVENTURE);
                info!(
                    "Adventure started from backend at {:.4}, {:.4}",
                    location.latitude, location.longitude
                );
                AdventureContent {
                    title: pick(resp.title, local.title),
                    story: pick(resp.story, &local.story),
                    challenge: pick(resp.challenge, local.challenge),
                    curiosity: pick(resp.curiosity, local.curiosity),
                    reward: pick(resp.reward, local.reward),
                    location: pick(resp.location, local.location),
                    duration: pick(resp.duration, local.duration),
                    difficulty: pick(resp.difficulty, local.difficulty),
                    age_range: pick(resp.age_range, local.age_range),
                    source: ContentSource::Backend,
                }
            }
            Err(e) => {
                metrics::record_fallback(ops::START_ADVENTURE);
                warn!("start_adventure falling back to local content: {}", e);
                AdventureContent {
                    title: local.title.to_string(),
                    story: local.story,
                    challenge: local.challenge.to_string(),
                    curiosity: local.curiosity.to_string(),
                    reward: local.reward.to_string(),
                    location: local.location.to_string(),
                    duration: local.duration.to_string(),
                    difficulty: local.difficulty.to_string(),
                    age_range: local.age_range.to_string(),
                    source: ContentSource::Fallback,
                }
            }
        }
    }

    /// Generate challenge, story and curiosity for a place.
    ///
    /// The three `qa/ask` requests run concurrently; each one that fails
    /// degrades only its own field. `place` supplies coordinates for the
    /// questions; without it the configured default location is used.
    pub async fn generate_challenge(
        &self,
        place_name: &str,
        child_ages: &[u8],
        place: Option<&Place>,
    ) -> ChallengeResult {
        let ages = self.ages(child_ages);
        let coords = place
            .map(|p| p.coordinates)
            .unwrap_or_else(|| self.config.default_location());
        debug!(
            "Generating challenge for {} (ages {:?})",
            escape_log(place_name),
            ages
        );

        let story_q = format!("Cuéntame una historia mágica sobre {}", place_name);
        let curiosity_q = format!("¿Qué curiosidad interesante tiene {}?", place_name);
        let challenge_q = format!(
            "Crea un desafío corto y divertido para niños de {} años en {}. Máximo 2-3 oraciones.",
            join_ages(&ages),
            place_name
        );

        let (story, curiosity, challenge) = tokio::join!(
            self.ask(&story_q, place_name, &ages, coords),
            self.ask(&curiosity_q, place_name, &ages, coords),
            self.ask(&challenge_q, place_name, &ages, coords),
        );

        let (story, story_source) = settle(ops::STORY, place_name, story, || {
            content::story_for(place_name)
        });
        let (curiosity, curiosity_source) = settle(ops::CURIOSITY, place_name, curiosity, || {
            content::curiosity_for(place_name)
        });
        let (challenge, challenge_source) = settle(ops::CHALLENGE, place_name, challenge, || {
            content::random_challenge(place_name)
        });
        let challenge = match challenge_source {
            ContentSource::Backend => truncate_text(&challenge, self.config.challenge_max_chars),
            ContentSource::Fallback => challenge,
        };

        let difficulty = calculate_difficulty(&ages);
        ChallengeResult {
            place_name: place_name.to_string(),
            children_ages: ages,
            challenge,
            story,
            curiosity,
            difficulty,
            estimated_time: difficulty.estimated_time().to_string(),
            rewards: generate_rewards(place_name),
            challenge_source,
            story_source,
            curiosity_source,
        }
    }

    async fn ask(
        &self,
        question: &str,
        place_name: &str,
        ages: &[u8],
        coords: Coordinates,
    ) -> Result<String, ApiError> {
        let body = json!({
            "question": question,
            "latitude": coords.latitude,
            "longitude": coords.longitude,
            "place_name": place_name,
            "children_ages": ages,
        });
        let resp: AskResponse = api::parse(self.backend.post(ENDPOINT_ASK, &body).await?)?;
        non_blank(&resp.answer)
            .map(str::to_string)
            .ok_or(ApiError::Empty)
    }

    /// Check a free-text answer.
    ///
    /// Grading is local: a trimmed answer longer than [`MIN_ANSWER_CHARS`]
    /// characters is correct. With a family, the place visit is recorded
    /// first and the challenge completion after a correct answer; both are
    /// best effort.
    pub async fn validate_answer(
        &self,
        place_name: &str,
        challenge_text: &str,
        user_answer: &str,
        family: Option<&FamilyId>,
    ) -> ValidationResult {
        if let Some(family) = family {
            self.record_place_visit(family, place_name).await;
        }

        let is_correct = is_answer_acceptable(user_answer);
        debug!(
            "Answer for {} judged {}: {}",
            escape_log(place_name),
            if is_correct { "correct" } else { "incorrect" },
            escape_log(user_answer)
        );

        if is_correct {
            if let Some(family) = family {
                self.record_challenge_completion(family).await;
            }
            ValidationResult {
                is_correct,
                score: calculate_score(place_name, challenge_text),
                feedback: "¡Excelente! Has completado el desafío".to_string(),
                rewards: generate_rewards(place_name),
            }
        } else {
            ValidationResult {
                is_correct,
                score: 0,
                feedback: "¡Buen intento! Sigue explorando".to_string(),
                rewards: Vec::new(),
            }
        }
    }

    /// Probe the backend `health` endpoint. Never fails.
    pub async fn check_health(&self) -> HealthStatus {
        match self.backend.get(ENDPOINT_HEALTH).await {
            Ok(body) => {
                let message = ["status", "message"]
                    .iter()
                    .find_map(|key| body.get(*key).and_then(|v| v.as_str()))
                    .unwrap_or("ok")
                    .to_string();
                HealthStatus {
                    reachable: true,
                    message,
                }
            }
            Err(e) => HealthStatus {
                reachable: false,
                message: format!("Error de conexión: {}", e),
            },
        }
    }
}

/// Record the outcome of one sub-request and produce the field value.
fn settle(
    operation: &str,
    place_name: &str,
    result: Result<String, ApiError>,
    fallback: impl FnOnce() -> String,
) -> (String, ContentSource) {
    match result {
        Ok(text) => {
            metrics::record_backend(operation);
            (text, ContentSource::Backend)
        }
        Err(e) => {
            metrics::record_fallback(operation);
            warn!(
                "{} for {} falling back to local content: {}",
                operation,
                escape_log(place_name),
                e
            );
            (fallback(), ContentSource::Fallback)
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn pick(value: Option<String>, fallback: &str) -> String {
    non_blank(&value).unwrap_or(fallback).to_string()
}

fn join_ages(ages: &[u8]) -> String {
    ages.iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join(" y ")
}

/// Difficulty for a group of children, stepping at average ages 4, 6, 8 and 10.
/// An empty list averages to 0 and is the easiest level.
pub fn calculate_difficulty(child_ages: &[u8]) -> Difficulty {
    let avg = average_age(child_ages);
    if avg < 4.0 {
        Difficulty::VeryEasy
    } else if avg < 6.0 {
        Difficulty::Easy
    } else if avg < 8.0 {
        Difficulty::Intermediate
    } else if avg < 10.0 {
        Difficulty::Challenging
    } else {
        Difficulty::Expert
    }
}

pub fn calculate_estimated_time(child_ages: &[u8]) -> &'static str {
    calculate_difficulty(child_ages).estimated_time()
}

/// Place-specific rewards first, then the generic ones; always three.
pub fn generate_rewards(place_name: &str) -> Vec<String> {
    content::place_rewards(place_name)
        .iter()
        .chain(content::BASE_REWARDS.iter())
        .take(REWARDS_PER_CHALLENGE)
        .map(|r| r.to_string())
        .collect()
}

pub fn is_answer_acceptable(answer: &str) -> bool {
    answer.trim().chars().count() > MIN_ANSWER_CHARS
}

/// `100 + 5 per place-name char + 2 per challenge char`.
pub fn calculate_score(place_name: &str, challenge_text: &str) -> u32 {
    let place = place_name.chars().count() as u32;
    let challenge = challenge_text.chars().count() as u32;
    100u32
        .saturating_add(place.saturating_mul(5))
        .saturating_add(challenge.saturating_mul(2))
}

/// Cut `text` to `max_chars` characters, trimming and appending `...` when cut.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}
