//! Static place tables used to build routes without the backend.
//!
//! - per-category place lists (the last resort of category route generation)
//! - category search terms and their broader synonyms
//! - thematic route catalog shown by route pickers
//! - the classic Madrid itinerary and its walking graph
//!
//! [`neighbours`], [`leg_between`] and [`all_legs`] expose the walking graph as
//! coordinate pairs for map consumers that draw the itinerary; the CLI `themes`
//! command prints the same graph as text.

use crate::model::{Coordinates, Place, PlaceRole};

/// Category keys understood by route generation.
pub const CATEGORIES: [&str; 5] = ["museos", "parques", "teatros", "historia", "gastronomia"];

/// Backend search term for a category. Unknown categories search for themselves.
pub fn search_term(category: &str) -> &str {
    match category {
        "museos" => "museo",
        "parques" => "parque",
        "teatros" => "teatro",
        "historia" => "histórico",
        "gastronomia" => "mercado",
        other => other,
    }
}

/// Broader terms tried when the direct search finds nothing.
pub fn broader_terms(category: &str) -> Vec<&str> {
    match category {
        "museos" => vec!["arte", "cultura", "exposición"],
        "parques" => vec!["jardín", "naturaleza", "verde"],
        "teatros" => vec!["ópera", "cultura", "espectáculo"],
        "historia" => vec!["monumento", "plaza", "palacio"],
        "gastronomia" => vec!["comida", "restaurante", "bar"],
        other => vec![other],
    }
}

/// A place from the local category tables.
#[derive(Debug, Clone, Copy)]
pub struct LocalPlace {
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    pub description: &'static str,
    pub tags: &'static [&'static str],
    pub challenge: &'static str,
}

impl LocalPlace {
    /// Convert to a route place; the role is assigned when the route is assembled.
    pub fn to_place(&self) -> Place {
        Place {
            id: self.name.to_string(),
            name: self.name.to_string(),
            coordinates: Coordinates::new(self.latitude, self.longitude),
            description: self.description.to_string(),
            role: PlaceRole::Generic,
            challenge: Some(self.challenge.to_string()),
            reward: Some(format!("Recompensa por visitar {}", self.name)),
            category: self.tags.first().map(|t| t.to_string()),
        }
    }
}

static MUSEOS: [LocalPlace; 3] = [
    LocalPlace {
        name: "Museo del Prado",
        latitude: 40.4138,
        longitude: -3.6921,
        description: "Museo de arte más importante de España",
        tags: &["museo", "arte", "cultura"],
        challenge: "Encuentra el cuadro de Las Meninas",
    },
    LocalPlace {
        name: "Museo Reina Sofía",
        latitude: 40.4081,
        longitude: -3.6946,
        description: "Museo de arte contemporáneo",
        tags: &["museo", "arte", "contemporáneo"],
        challenge: "Descubre el Guernica de Picasso",
    },
    LocalPlace {
        name: "Museo Thyssen-Bornemisza",
        latitude: 40.4159,
        longitude: -3.6946,
        description: "Colección privada de arte",
        tags: &["museo", "arte", "colección"],
        challenge: "Encuentra tu pintura favorita",
    },
];

static PARQUES: [LocalPlace; 2] = [
    LocalPlace {
        name: "Parque del Retiro",
        latitude: 40.4152,
        longitude: -3.6844,
        description: "Parque más famoso de Madrid",
        tags: &["parque", "naturaleza", "recreo"],
        challenge: "Encuentra el Palacio de Cristal",
    },
    LocalPlace {
        name: "Casa de Campo",
        latitude: 40.4189,
        longitude: -3.7319,
        description: "Parque más grande de Madrid",
        tags: &["parque", "naturaleza", "grande"],
        challenge: "Llega hasta el teleférico",
    },
];

static TEATROS: [LocalPlace; 2] = [
    LocalPlace {
        name: "Teatro Real",
        latitude: 40.4180,
        longitude: -3.7142,
        description: "Teatro de ópera de Madrid",
        tags: &["teatro", "ópera", "cultura"],
        challenge: "Escucha una melodía mágica",
    },
    LocalPlace {
        name: "Teatro Español",
        latitude: 40.4154,
        longitude: -3.7074,
        description: "Teatro histórico de Madrid",
        tags: &["teatro", "historia", "cultura"],
        challenge: "Descubre el escenario secreto",
    },
];

static HISTORIA: [LocalPlace; 2] = [
    LocalPlace {
        name: "Plaza Mayor",
        latitude: 40.4154,
        longitude: -3.7074,
        description: "Plaza histórica de Madrid",
        tags: &["historia", "plaza", "centro"],
        challenge: "Cuenta las ventanas de la plaza",
    },
    LocalPlace {
        name: "Palacio Real",
        latitude: 40.4180,
        longitude: -3.7142,
        description: "Residencia oficial del Rey",
        tags: &["historia", "palacio", "rey"],
        challenge: "Encuentra el trono real",
    },
];

static GASTRONOMIA: [LocalPlace; 1] = [LocalPlace {
    name: "Mercado de San Miguel",
    latitude: 40.4158,
    longitude: -3.7072,
    description: "Mercado gourmet más famoso de Madrid",
    tags: &["gastronomía", "mercado", "comida"],
    challenge: "Prueba un pincho de jamón ibérico",
}];

/// Local places for a category; empty for unknown categories.
pub fn local_places(category: &str) -> &'static [LocalPlace] {
    match category {
        "museos" => &MUSEOS,
        "parques" => &PARQUES,
        "teatros" => &TEATROS,
        "historia" => &HISTORIA,
        "gastronomia" => &GASTRONOMIA,
        _ => &[],
    }
}

/// Last-resort places used when a category pass produced nothing at all.
/// Only the first two entries of museos, parques and teatros qualify.
pub fn secondary_fallback_places(category: &str) -> &'static [LocalPlace] {
    match category {
        "museos" => &MUSEOS[..2],
        "parques" => &PARQUES[..],
        "teatros" => &TEATROS[..],
        _ => &[],
    }
}

/// A curated route offered by the route picker.
#[derive(Debug, Clone, Copy)]
pub struct ThematicRoute {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub places: &'static [&'static str],
}

static THEMATIC_ROUTES: [ThematicRoute; 5] = [
    ThematicRoute {
        key: "museos",
        name: "Ruta de Museos",
        description: "Descubre los museos más importantes de Madrid",
        icon: "🏛️",
        color: "#8B5CF6",
        places: &[
            "Museo del Prado",
            "Museo Reina Sofía",
            "Museo Thyssen-Bornemisza",
            "Museo Arqueológico Nacional",
            "Museo de Ciencias Naturales",
        ],
    },
    ThematicRoute {
        key: "parques",
        name: "Ruta de Parques",
        description: "Explora los parques y jardines de Madrid",
        icon: "🌳",
        color: "#10B981",
        places: &[
            "Parque del Retiro",
            "Parque de El Capricho",
            "Casa de Campo",
            "Parque del Oeste",
            "Jardín Botánico",
        ],
    },
    ThematicRoute {
        key: "teatros",
        name: "Ruta de Teatros",
        description: "Conoce los teatros históricos de Madrid",
        icon: "🎭",
        color: "#F59E0B",
        places: &[
            "Teatro Real",
            "Teatro de la Zarzuela",
            "Teatro Español",
            "Teatro de la Comedia",
            "Teatro Lara",
        ],
    },
    ThematicRoute {
        key: "historia",
        name: "Ruta Histórica",
        description: "Recorre los lugares más históricos de Madrid",
        icon: "🏰",
        color: "#EF4444",
        places: &[
            "Plaza Mayor",
            "Puerta del Sol",
            "Palacio Real",
            "Catedral de la Almudena",
            "Plaza de Oriente",
        ],
    },
    ThematicRoute {
        key: "gastronomia",
        name: "Ruta Gastronómica",
        description: "Saborea la mejor gastronomía de Madrid",
        icon: "🍽️",
        color: "#F97316",
        places: &[
            "Mercado de San Miguel",
            "Mercado de San Antón",
            "Mercado de la Cebada",
            "Plaza de Santa Ana",
            "Calle de la Cava Baja",
        ],
    },
];

pub fn thematic_routes() -> &'static [ThematicRoute] {
    &THEMATIC_ROUTES
}

pub fn thematic_route(key: &str) -> Option<&'static ThematicRoute> {
    THEMATIC_ROUTES.iter().find(|r| r.key == key)
}

/// One stop of the classic Madrid itinerary.
#[derive(Debug, Clone, Copy)]
pub struct ItineraryStop {
    pub id: &'static str,
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    pub role: PlaceRole,
    pub description: &'static str,
    pub district: &'static str,
    pub challenge: &'static str,
    pub reward: &'static str,
    pub time_estimate: &'static str,
}

impl ItineraryStop {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    pub fn to_place(&self) -> Place {
        Place {
            id: self.id.to_string(),
            name: self.name.to_string(),
            coordinates: self.coordinates(),
            description: self.description.to_string(),
            role: self.role,
            challenge: Some(self.challenge.to_string()),
            reward: Some(self.reward.to_string()),
            category: Some(self.district.to_string()),
        }
    }
}

static MADRID_ITINERARY: [ItineraryStop; 7] = [
    ItineraryStop {
        id: "plaza_mayor",
        name: "Plaza Mayor",
        latitude: 40.4154,
        longitude: -3.7074,
        role: PlaceRole::Start,
        description: "La famosa plaza rectangular de Madrid, corazón histórico de la ciudad",
        district: "Centro",
        challenge: "Busca la estatua de Felipe III en el centro de la plaza",
        reward: "10 puntos y 2 monedas mágicas",
        time_estimate: "15-20 minutos",
    },
    ItineraryStop {
        id: "puerta_del_sol",
        name: "Puerta del Sol",
        latitude: 40.4168,
        longitude: -3.7038,
        role: PlaceRole::Checkpoint,
        description: "El kilómetro cero de España y centro neurálgico de Madrid",
        district: "Centro",
        challenge: "Encuentra el reloj de la Casa de Correos y cuenta las campanadas",
        reward: "15 puntos y 3 monedas mágicas",
        time_estimate: "20-25 minutos",
    },
    ItineraryStop {
        id: "palacio_real",
        name: "Palacio Real",
        latitude: 40.4180,
        longitude: -3.7142,
        role: PlaceRole::Checkpoint,
        description: "Residencia oficial del Rey de España, uno de los palacios más grandes de Europa",
        district: "Centro",
        challenge: "Observa los jardines del Campo del Moro desde la plaza",
        reward: "20 puntos y 4 monedas mágicas",
        time_estimate: "25-30 minutos",
    },
    ItineraryStop {
        id: "parque_retiro",
        name: "Parque del Retiro",
        latitude: 40.4150,
        longitude: -3.6840,
        role: PlaceRole::Checkpoint,
        description: "Uno de los parques más famosos de Madrid, con el Palacio de Cristal",
        district: "Retiro",
        challenge: "Encuentra el Palacio de Cristal y haz una foto",
        reward: "18 puntos y 3 monedas mágicas",
        time_estimate: "30-40 minutos",
    },
    ItineraryStop {
        id: "templo_debod",
        name: "Templo de Debod",
        latitude: 40.4240,
        longitude: -3.7178,
        role: PlaceRole::Checkpoint,
        description: "Templo egipcio del siglo II a.C. regalado a España por Egipto",
        district: "Moncloa-Aravaca",
        challenge: "Observa el atardecer desde el templo",
        reward: "25 puntos y 5 monedas mágicas",
        time_estimate: "20-25 minutos",
    },
    ItineraryStop {
        id: "gran_via",
        name: "Gran Vía",
        latitude: 40.4200,
        longitude: -3.7050,
        role: PlaceRole::Checkpoint,
        description: "La calle más famosa de Madrid, conocida como el Broadway madrileño",
        district: "Centro",
        challenge: "Cuenta cuántos teatros puedes ver en la Gran Vía",
        reward: "12 puntos y 2 monedas mágicas",
        time_estimate: "15-20 minutos",
    },
    ItineraryStop {
        id: "mercado_san_miguel",
        name: "Mercado de San Miguel",
        latitude: 40.4158,
        longitude: -3.7072,
        role: PlaceRole::Checkpoint,
        description: "Mercado gourmet más famoso de Madrid, con productos de alta calidad",
        district: "Centro",
        challenge: "Prueba un pincho de jamón ibérico",
        reward: "8 puntos y 1 moneda mágica",
        time_estimate: "10-15 minutos",
    },
];

// Walkable connections between itinerary stops.
static NEIGHBOURS: [(&str, &[&str]); 7] = [
    ("Plaza Mayor", &["Puerta del Sol", "Mercado de San Miguel"]),
    (
        "Puerta del Sol",
        &["Plaza Mayor", "Palacio Real", "Parque del Retiro"],
    ),
    ("Palacio Real", &["Puerta del Sol", "Templo de Debod"]),
    ("Parque del Retiro", &["Puerta del Sol", "Gran Vía"]),
    ("Templo de Debod", &["Palacio Real", "Gran Vía"]),
    ("Gran Vía", &["Parque del Retiro", "Templo de Debod"]),
    ("Mercado de San Miguel", &["Plaza Mayor"]),
];

pub fn madrid_itinerary() -> &'static [ItineraryStop] {
    &MADRID_ITINERARY
}

pub fn itinerary_stop(name: &str) -> Option<&'static ItineraryStop> {
    MADRID_ITINERARY.iter().find(|s| s.name == name)
}

/// Stops reachable on foot from `place`; empty for places off the itinerary.
pub fn neighbours(place: &str) -> &'static [&'static str] {
    NEIGHBOURS
        .iter()
        .find(|(name, _)| *name == place)
        .map(|(_, next)| *next)
        .unwrap_or(&[])
}

/// Straight leg between two itinerary stops, for drawing on a map.
pub fn leg_between(from: &str, to: &str) -> Option<(Coordinates, Coordinates)> {
    let from = itinerary_stop(from)?;
    let to = itinerary_stop(to)?;
    Some((from.coordinates(), to.coordinates()))
}

/// Every directed leg of the walking graph.
pub fn all_legs() -> Vec<(Coordinates, Coordinates)> {
    NEIGHBOURS
        .iter()
        .flat_map(|(from, next)| next.iter().filter_map(move |to| leg_between(from, to)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_has_terms_and_places() {
        for category in CATEGORIES {
            assert!(!local_places(category).is_empty(), "{}", category);
            assert!(!broader_terms(category).is_empty());
            assert!(thematic_route(category).is_some());
        }
        assert_eq!(search_term("historia"), "histórico");
        assert_eq!(search_term("zoologicos"), "zoologicos");
        assert_eq!(broader_terms("zoologicos"), vec!["zoologicos"]);
        assert!(local_places("zoologicos").is_empty());
    }

    #[test]
    fn secondary_fallback_covers_three_categories() {
        assert_eq!(secondary_fallback_places("museos").len(), 2);
        assert_eq!(secondary_fallback_places("parques").len(), 2);
        assert_eq!(secondary_fallback_places("teatros").len(), 2);
        assert!(secondary_fallback_places("historia").is_empty());
    }

    #[test]
    fn local_place_conversion_uses_first_tag() {
        let place = local_places("museos")[0].to_place();
        assert_eq!(place.name, "Museo del Prado");
        assert_eq!(place.category.as_deref(), Some("museo"));
        assert_eq!(place.role, PlaceRole::Generic);
        assert_eq!(
            place.reward.as_deref(),
            Some("Recompensa por visitar Museo del Prado")
        );
    }

    #[test]
    fn neighbour_graph_only_references_itinerary_stops() {
        for (from, next) in NEIGHBOURS.iter() {
            assert!(itinerary_stop(from).is_some(), "{}", from);
            for to in next.iter() {
                assert!(leg_between(from, to).is_some(), "{} -> {}", from, to);
            }
        }
        assert_eq!(neighbours("Mercado de San Miguel"), &["Plaza Mayor"]);
        assert!(neighbours("Atocha").is_empty());
        assert!(leg_between("Plaza Mayor", "Atocha").is_none());
        assert_eq!(all_legs().len(), 14);
    }

    #[test]
    fn itinerary_starts_at_plaza_mayor() {
        let stops = madrid_itinerary();
        assert_eq!(stops[0].name, "Plaza Mayor");
        assert_eq!(stops[0].role, PlaceRole::Start);
        assert!(stops[1..].iter().all(|s| s.role == PlaceRole::Checkpoint));
    }
}
