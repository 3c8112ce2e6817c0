//! Route generation: category searches with synonym broadening, then the
//! local tables when the backend has nothing.

use chrono::Utc;
use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashSet;

use super::{ops, AdventureClient};
use crate::api::{self, with_query, ApiError, Backend};
use crate::content::catalog;
use crate::metrics;
use crate::model::{Coordinates, Place, PlaceRole, Route, RouteSource};

const ENDPOINT_SEARCH: &str = "gps/places/search";
const ENDPOINT_ROUTE: &str = "adventure/route/generate";

/// A place as the backend describes it.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendPlace {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub challenge: Option<String>,
    #[serde(default)]
    pub challenges: Vec<String>,
    #[serde(default)]
    pub reward: Option<String>,
}

impl BackendPlace {
    pub fn into_place(self) -> Place {
        let role = self
            .kind
            .as_deref()
            .map(role_from_tag)
            .unwrap_or(PlaceRole::Generic);
        let challenge = self
            .challenge
            .or_else(|| self.challenges.into_iter().next())
            .unwrap_or_else(|| format!("Desafío en {}", self.name));
        let reward = self
            .reward
            .unwrap_or_else(|| format!("Recompensa por visitar {}", self.name));
        Place {
            id: self.id.unwrap_or_else(|| self.name.clone()),
            coordinates: Coordinates::new(self.latitude, self.longitude),
            description: self
                .description
                .unwrap_or_else(|| "Lugar de interés".to_string()),
            role,
            challenge: Some(challenge),
            reward: Some(reward),
            category: Some(
                self.tags
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| "general".to_string()),
            ),
            name: self.name,
        }
    }
}

/// Map a backend `type` tag to a route role.
pub fn role_from_tag(tag: &str) -> PlaceRole {
    match tag.to_ascii_lowercase().as_str() {
        "start" => PlaceRole::Start,
        "checkpoint" => PlaceRole::Checkpoint,
        "end" => PlaceRole::End,
        _ => PlaceRole::Generic,
    }
}

// Search results arrive either wrapped in `{ places, total }` or as a bare list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SearchPayload {
    Wrapped {
        #[serde(default)]
        places: Vec<BackendPlace>,
    },
    Bare(Vec<BackendPlace>),
}

#[derive(Debug, Deserialize)]
struct BackendRoute {
    #[serde(default, alias = "id")]
    route_id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    estimated_duration: Option<String>,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    places: Vec<BackendPlace>,
}

/// Places found for one category, and whether they came from the local table.
#[derive(Debug, Clone)]
pub struct CategoryPlaces {
    pub category: String,
    pub places: Vec<Place>,
    pub source: RouteSource,
}

impl<B: Backend> AdventureClient<B> {
    /// Search the backend for places matching `query`.
    pub async fn search_places(&self, query: &str) -> Result<Vec<Place>, ApiError> {
        let body = self
            .backend
            .get(&with_query(ENDPOINT_SEARCH, "query", query))
            .await?;
        let places = match api::parse::<SearchPayload>(body)? {
            SearchPayload::Wrapped { places } => places,
            SearchPayload::Bare(places) => places,
        };
        Ok(places.into_iter().map(BackendPlace::into_place).collect())
    }

    /// Places for one category: direct term, then every broader term, then the
    /// local table.
    pub async fn places_for_category(&self, category: &str) -> CategoryPlaces {
        let term = catalog::search_term(category);
        match self.search_places(term).await {
            Ok(places) if !places.is_empty() => {
                debug!("Backend returned {} places for {}", places.len(), category);
                return CategoryPlaces {
                    category: category.to_string(),
                    places,
                    source: RouteSource::Backend,
                };
            }
            Ok(_) => debug!("No places for '{}', broadening search", term),
            Err(e) => debug!("Search for '{}' failed ({}), broadening search", term, e),
        }

        let mut found = Vec::new();
        for broader in catalog::broader_terms(category) {
            match self.search_places(broader).await {
                Ok(places) => found.extend(places),
                Err(e) => debug!("Search for '{}' failed: {}", broader, e),
            }
        }
        dedup_by_name(&mut found);

        if !found.is_empty() {
            debug!(
                "Backend returned {} places for {} (broad search)",
                found.len(),
                category
            );
            return CategoryPlaces {
                category: category.to_string(),
                places: found,
                source: RouteSource::Backend,
            };
        }

        warn!("No backend places for category {}; using local data", category);
        CategoryPlaces {
            category: category.to_string(),
            places: catalog::local_places(category)
                .iter()
                .map(catalog::LocalPlace::to_place)
                .collect(),
            source: RouteSource::LocalFallback,
        }
    }

    /// Build a route covering `categories`, in the order given.
    ///
    /// Each category contributes its first `places_per_category` places;
    /// duplicates (by name) are dropped and the first place becomes the start,
    /// the last the end.
    pub async fn generate_route(
        &self,
        categories: &[String],
        location: Coordinates,
        child_ages: &[u8],
    ) -> Route {
        let ages = self.ages(child_ages);
        debug!("Generating route for {:?} (ages {:?})", categories, ages);

        let mut selected = Vec::new();
        let mut used_local = false;
        for category in categories {
            let found = self.places_for_category(category).await;
            if found.places.is_empty() {
                continue;
            }
            if found.source == RouteSource::LocalFallback {
                used_local = true;
            }
            selected.extend(
                found
                    .places
                    .into_iter()
                    .take(self.config.places_per_category),
            );
        }
        dedup_by_name(&mut selected);

        if selected.is_empty() {
            metrics::record_fallback(ops::GENERATE_ROUTE);
            warn!("No places found for {:?}; using fallback route", categories);
            return fallback_route(categories, location);
        }

        let joined = categories.join(", ");
        let source = if used_local {
            metrics::record_fallback(ops::GENERATE_ROUTE);
            RouteSource::LocalFallback
        } else {
            metrics::record_backend(ops::GENERATE_ROUTE);
            RouteSource::Backend
        };
        info!(
            "Route generated with {} places for {} ({:?})",
            selected.len(),
            joined,
            source
        );

        Route {
            id: format!("custom_{}_{}", categories.join("_"), Utc::now().timestamp_millis()),
            name: format!("Ruta Personalizada: {}", joined),
            description: format!(
                "Una ruta personalizada que incluye {}{}",
                joined,
                if used_local { " (datos locales)" } else { "" }
            ),
            categories: categories.to_vec(),
            origin: Some(location),
            estimated_duration: estimated_duration(selected.len()),
            difficulty: "Personalizada".to_string(),
            source,
            places: assign_roles(selected),
        }
    }

    /// Ask the backend for a route near `location`; fall back to the classic
    /// Madrid itinerary.
    pub async fn generate_nearby_route(&self, location: Coordinates, child_ages: &[u8]) -> Route {
        let ages = self.ages(child_ages);
        let body = json!({
            "latitude": location.latitude,
            "longitude": location.longitude,
            "children_ages": ages,
        });

        let result = self
            .backend
            .post(ENDPOINT_ROUTE, &body)
            .await
            .and_then(api::parse::<BackendRoute>)
            .and_then(|route| {
                if route.places.is_empty() {
                    Err(ApiError::Empty)
                } else {
                    Ok(route)
                }
            });

        match result {
            Ok(route) => {
                metrics::record_backend(ops::NEARBY_ROUTE);
                let has_roles = route.places.iter().any(|p| p.kind.is_some());
                let places: Vec<Place> = route
                    .places
                    .into_iter()
                    .map(BackendPlace::into_place)
                    .collect();
                let count = places.len();
                Route {
                    id: route
                        .route_id
                        .unwrap_or_else(|| format!("route_{}", Utc::now().timestamp_millis())),
                    name: route
                        .name
                        .unwrap_or_else(|| "Ruta del Ratoncito Pérez".to_string()),
                    description: route.description.unwrap_or_default(),
                    categories: Vec::new(),
                    origin: Some(location),
                    estimated_duration: route
                        .estimated_duration
                        .unwrap_or_else(|| estimated_duration(count)),
                    difficulty: route.difficulty.unwrap_or_else(|| "Fácil".to_string()),
                    source: RouteSource::Backend,
                    places: if has_roles {
                        places
                    } else {
                        assign_roles(places)
                    },
                }
            }
            Err(e) => {
                metrics::record_fallback(ops::NEARBY_ROUTE);
                warn!("Route generation falling back to classic itinerary: {}", e);
                madrid_classic_route(Some(location))
            }
        }
    }
}

/// The hand-built tour of central Madrid.
pub fn madrid_classic_route(origin: Option<Coordinates>) -> Route {
    let places: Vec<Place> = catalog::madrid_itinerary()
        .iter()
        .map(catalog::ItineraryStop::to_place)
        .collect();
    Route {
        id: format!("madrid_real_route_{}", Utc::now().timestamp_millis()),
        name: "Ruta Clásica de Madrid".to_string(),
        description: "Una ruta tradicional por los lugares más emblemáticos de Madrid".to_string(),
        categories: Vec::new(),
        origin,
        estimated_duration: "2-3 horas".to_string(),
        difficulty: "Fácil".to_string(),
        source: RouteSource::LocalFallback,
        places,
    }
}

/// Route built only from the secondary local table (museos, parques, teatros).
pub fn fallback_route(categories: &[String], location: Coordinates) -> Route {
    let places: Vec<Place> = categories
        .iter()
        .flat_map(|category| {
            catalog::secondary_fallback_places(category)
                .iter()
                .map(move |p| Place {
                    challenge: Some(format!("Desafío en {}", p.name)),
                    category: Some(category.clone()),
                    ..p.to_place()
                })
        })
        .collect();
    let joined = categories.join(", ");
    Route {
        id: format!("fallback_{}_{}", categories.join("_"), Utc::now().timestamp_millis()),
        name: format!("Ruta Local: {}", joined),
        description: format!("Ruta generada con datos locales para {}", joined),
        categories: categories.to_vec(),
        origin: Some(location),
        estimated_duration: estimated_duration(places.len()),
        difficulty: "Fácil".to_string(),
        source: RouteSource::LocalFallback,
        places: assign_roles(places),
    }
}

/// `"{ceil(n*0.5)}-{ceil(n*0.8)} horas"`.
pub fn estimated_duration(place_count: usize) -> String {
    let n = place_count as f64;
    format!("{}-{} horas", (n * 0.5).ceil(), (n * 0.8).ceil())
}

/// Label the first place start, the last end, everything between checkpoint.
pub fn assign_roles(places: Vec<Place>) -> Vec<Place> {
    let len = places.len();
    places
        .into_iter()
        .enumerate()
        .map(|(i, place)| Place {
            role: PlaceRole::for_position(i, len),
            ..place
        })
        .collect()
}

/// Keep the first place of each name, preserving order.
pub fn dedup_by_name(places: &mut Vec<Place>) {
    let mut seen = HashSet::new();
    places.retain(|p| seen.insert(p.name.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn place(name: &str) -> Place {
        Place {
            id: name.to_string(),
            name: name.to_string(),
            coordinates: Coordinates::new(40.0, -3.0),
            description: String::new(),
            role: PlaceRole::Generic,
            challenge: None,
            reward: None,
            category: None,
        }
    }

    #[test]
    fn duration_rounds_up() {
        assert_eq!(estimated_duration(4), "2-4 horas");
        assert_eq!(estimated_duration(3), "2-3 horas");
        assert_eq!(estimated_duration(1), "1-1 horas");
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let mut places = vec![place("A"), place("B"), place("A"), place("C"), place("B")];
        dedup_by_name(&mut places);
        let names: Vec<_> = places.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn roles_mark_start_and_end() {
        let places = assign_roles(vec![place("A"), place("B"), place("C")]);
        assert_eq!(places[0].role, PlaceRole::Start);
        assert_eq!(places[1].role, PlaceRole::Checkpoint);
        assert_eq!(places[2].role, PlaceRole::End);
        let single = assign_roles(vec![place("A")]);
        assert_eq!(single[0].role, PlaceRole::Start);
    }

    #[test]
    fn backend_place_defaults() {
        let raw: BackendPlace = serde_json::from_value(json!({
            "name": "Templo de Debod",
            "latitude": 40.424,
            "longitude": -3.7178,
            "tags": ["egipcio", "historia"],
            "challenges": ["Observa el atardecer"]
        }))
        .unwrap();
        let place = raw.into_place();
        assert_eq!(place.id, "Templo de Debod");
        assert_eq!(place.description, "Lugar de interés");
        assert_eq!(place.challenge.as_deref(), Some("Observa el atardecer"));
        assert_eq!(place.category.as_deref(), Some("egipcio"));
        assert_eq!(place.role, PlaceRole::Generic);
    }

    #[test]
    fn search_payload_accepts_both_shapes() {
        let wrapped: SearchPayload = serde_json::from_value(json!({
            "places": [{"name": "A", "latitude": 1.0, "longitude": 2.0}],
            "total": 1
        }))
        .unwrap();
        assert!(matches!(wrapped, SearchPayload::Wrapped { ref places } if places.len() == 1));
        let bare: SearchPayload = serde_json::from_value(json!([
            {"name": "A", "latitude": 1.0, "longitude": 2.0}
        ]))
        .unwrap();
        assert!(matches!(bare, SearchPayload::Bare(ref places) if places.len() == 1));
    }

    #[test]
    fn fallback_route_skips_categories_without_table() {
        let categories = vec!["museos".to_string(), "historia".to_string()];
        let route = fallback_route(&categories, Coordinates::new(40.4168, -3.7038));
        assert_eq!(route.len(), 2);
        assert!(route.id.starts_with("fallback_museos_historia_"));
        assert_eq!(route.source, RouteSource::LocalFallback);
        assert_eq!(route.places[0].role, PlaceRole::Start);
        assert_eq!(route.places[1].role, PlaceRole::End);
        assert_eq!(route.places[0].category.as_deref(), Some("museos"));
    }

    #[test]
    fn classic_route_covers_itinerary() {
        let route = madrid_classic_route(None);
        assert_eq!(route.len(), catalog::madrid_itinerary().len());
        assert_eq!(route.places[0].name, "Plaza Mayor");
        assert_eq!(route.source, RouteSource::LocalFallback);
    }
}
