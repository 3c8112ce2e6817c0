//! Core value types shared by the client, the content registry and the tracker.
//!
//! Everything here is plain data: places and routes are built once (from the
//! backend or from the local registry) and replaced wholesale, never edited.

use serde::{Deserialize, Serialize};

/// A position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Position of a place within a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlaceRole {
    Start,
    Checkpoint,
    End,
    #[default]
    #[serde(alias = "place")]
    Generic,
}

impl PlaceRole {
    /// Role of position `index` in a route of `len` places.
    ///
    /// The first place is always the start, even when it is also the last.
    pub fn for_position(index: usize, len: usize) -> Self {
        if index == 0 {
            PlaceRole::Start
        } else if index + 1 == len {
            PlaceRole::End
        } else {
            PlaceRole::Checkpoint
        }
    }
}

/// A named point of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
    pub name: String,
    pub coordinates: Coordinates,
    pub description: String,
    pub role: PlaceRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Where a route's places came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteSource {
    Backend,
    LocalFallback,
}

/// An ordered itinerary of places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Coordinates>,
    pub estimated_duration: String,
    pub difficulty: String,
    pub source: RouteSource,
    pub places: Vec<Place>,
}

impl Route {
    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Polyline of the route for a map widget, in visiting order. The CLI
    /// `walk` command prints it before stepping through the stops.
    pub fn polyline(&self) -> Vec<Coordinates> {
        self.places.iter().map(|p| p.coordinates).collect()
    }
}

/// Provenance of a single generated text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSource {
    Backend,
    Fallback,
}

/// Age-derived challenge difficulty, ordered from easiest to hardest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(rename = "Muy Fácil")]
    VeryEasy,
    #[serde(rename = "Fácil")]
    Easy,
    #[serde(rename = "Intermedio")]
    Intermediate,
    #[serde(rename = "Desafiante")]
    Challenging,
    #[serde(rename = "Experto")]
    Expert,
}

impl Difficulty {
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::VeryEasy => "Muy Fácil",
            Difficulty::Easy => "Fácil",
            Difficulty::Intermediate => "Intermedio",
            Difficulty::Challenging => "Desafiante",
            Difficulty::Expert => "Experto",
        }
    }

    /// Estimated time to finish a challenge at this difficulty.
    pub fn estimated_time(self) -> &'static str {
        match self {
            Difficulty::VeryEasy => "2-3 minutos",
            Difficulty::Easy => "3-5 minutos",
            Difficulty::Intermediate => "5-10 minutos",
            Difficulty::Challenging => "10-15 minutos",
            Difficulty::Expert => "15-20 minutos",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Narrative fields for an adventure started at a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdventureContent {
    pub title: String,
    pub story: String,
    pub challenge: String,
    pub curiosity: String,
    pub reward: String,
    pub location: String,
    pub duration: String,
    pub difficulty: String,
    pub age_range: String,
    pub source: ContentSource,
}

/// Challenge, story and curiosity generated for one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeResult {
    pub place_name: String,
    pub children_ages: Vec<u8>,
    pub challenge: String,
    pub story: String,
    pub curiosity: String,
    pub difficulty: Difficulty,
    pub estimated_time: String,
    pub rewards: Vec<String>,
    pub challenge_source: ContentSource,
    pub story_source: ContentSource,
    pub curiosity_source: ContentSource,
}

impl ChallengeResult {
    /// True when the challenge text itself came from the local registry.
    pub fn is_fallback(&self) -> bool {
        self.challenge_source == ContentSource::Fallback
    }

    /// True when all three fields were served by the backend.
    pub fn fully_from_backend(&self) -> bool {
        [
            self.challenge_source,
            self.story_source,
            self.curiosity_source,
        ]
        .iter()
        .all(|s| *s == ContentSource::Backend)
    }
}

/// Outcome of checking a free-text answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_correct: bool,
    pub score: u32,
    pub feedback: String,
    pub rewards: Vec<String>,
}

/// Backend reachability as reported by the health probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub reachable: bool,
    pub message: String,
}
