mod common;

use common::{failing_client, scripted_client, ScriptedBackend};
use ratoncito::api::ApiError;
use ratoncito::content::catalog;
use ratoncito::model::{Coordinates, PlaceRole, RouteSource};
use serde_json::{json, Value};

const SOL: Coordinates = Coordinates::new(40.4168, -3.7038);

fn categories(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn place_json(name: &str) -> Value {
    json!({
        "name": name,
        "latitude": 40.41,
        "longitude": -3.70,
        "description": format!("{} desc", name)
    })
}

#[tokio::test]
async fn unreachable_backend_uses_local_category_tables() {
    let client = failing_client();
    let route = client
        .generate_route(&categories(&["museos", "parques"]), SOL, &[6, 8])
        .await;

    assert_eq!(route.source, RouteSource::LocalFallback);
    let names: Vec<_> = route.places.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Museo del Prado",
            "Museo Reina Sofía",
            "Parque del Retiro",
            "Casa de Campo"
        ]
    );
    assert_eq!(route.places[0].role, PlaceRole::Start);
    assert_eq!(route.places[1].role, PlaceRole::Checkpoint);
    assert_eq!(route.places[3].role, PlaceRole::End);
    assert_eq!(route.estimated_duration, "2-4 horas");
    assert!(route.description.ends_with("(datos locales)"));
    assert!(route.id.starts_with("custom_museos_parques_"));
    assert_eq!(route.origin, Some(SOL));
}

#[tokio::test]
async fn direct_search_hit_skips_broader_terms() {
    let backend = ScriptedBackend::new(|path, _| {
        if path == "gps/places/search?query=museo" {
            Ok(json!({"success": true, "data": {"places": [
                place_json("Museo del Prado"),
                place_json("Museo Sorolla"),
                place_json("Museo Cerralbo"),
            ], "total": 3}}))
        } else {
            Err(ApiError::Status {
                status: 500,
                message: "boom".to_string(),
            })
        }
    });
    let client = scripted_client(&backend);
    let route = client
        .generate_route(&categories(&["museos"]), SOL, &[7])
        .await;

    assert_eq!(route.source, RouteSource::Backend);
    assert_eq!(route.len(), 2);
    assert_eq!(route.places[1].name, "Museo Sorolla");
    assert_eq!(route.places[1].role, PlaceRole::End);
    assert_eq!(backend.paths(), vec!["gps/places/search?query=museo"]);
}

#[tokio::test]
async fn empty_direct_search_broadens_and_dedups() {
    let backend = ScriptedBackend::new(|path, _| {
        let query = path.split("query=").nth(1).unwrap_or_default();
        match query {
            "jard%C3%ADn" => Ok(json!({
                "places": [place_json("Jardín Botánico"), place_json("Parque del Oeste")]
            })),
            "naturaleza" => Ok(json!([
                place_json("Parque del Oeste"),
                place_json("Dehesa de la Villa")
            ])),
            _ => Ok(json!({"places": []})),
        }
    });
    let client = scripted_client(&backend);
    let found = client.places_for_category("parques").await;

    assert_eq!(found.source, RouteSource::Backend);
    let names: Vec<_> = found.places.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Jardín Botánico", "Parque del Oeste", "Dehesa de la Villa"]
    );
    assert_eq!(
        backend.paths(),
        vec![
            "gps/places/search?query=parque",
            "gps/places/search?query=jard%C3%ADn",
            "gps/places/search?query=naturaleza",
            "gps/places/search?query=verde",
        ]
    );
}

#[tokio::test]
async fn mixed_sources_mark_route_local_and_dedup_across_categories() {
    // historia comes back from the backend with Museo del Prado in it; museos
    // falls back locally and also starts with Museo del Prado.
    let backend = ScriptedBackend::new(|path, _| {
        if path.ends_with("query=hist%C3%B3rico") {
            Ok(json!({"places": [place_json("Museo del Prado"), place_json("Plaza de la Villa")]}))
        } else {
            Err(ApiError::Transport("down".to_string()))
        }
    });
    let client = scripted_client(&backend);
    let route = client
        .generate_route(&categories(&["historia", "museos"]), SOL, &[6])
        .await;

    let names: Vec<_> = route.places.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Museo del Prado", "Plaza de la Villa", "Museo Reina Sofía"]
    );
    assert_eq!(route.source, RouteSource::LocalFallback);
}

#[tokio::test]
async fn unknown_categories_fall_through_to_empty_fallback_route() {
    let client = failing_client();
    let route = client
        .generate_route(&categories(&["zoologicos"]), SOL, &[6])
        .await;
    assert!(route.is_empty());
    assert!(route.id.starts_with("fallback_zoologicos_"));
    assert_eq!(route.source, RouteSource::LocalFallback);
    assert_eq!(route.estimated_duration, "0-0 horas");
}

#[tokio::test]
async fn nearby_route_parses_backend_route() {
    let backend = ScriptedBackend::new(|path, body| {
        assert_eq!(path, "adventure/route/generate");
        assert_eq!(body.unwrap()["children_ages"], json!([5, 9]));
        Ok(json!({"success": true, "data": {
            "route_id": "r-42",
            "name": "Ruta mágica",
            "places": [
                {"name": "Plaza Mayor", "latitude": 40.4154, "longitude": -3.7074,
                 "type": "start"},
                {"name": "Puerta del Sol", "latitude": 40.4168, "longitude": -3.7038,
                 "type": "checkpoint"}
            ]
        }}))
    });
    let client = scripted_client(&backend);
    let route = client.generate_nearby_route(SOL, &[5, 9]).await;

    assert_eq!(route.source, RouteSource::Backend);
    assert_eq!(route.id, "r-42");
    assert_eq!(route.name, "Ruta mágica");
    assert_eq!(route.places[0].role, PlaceRole::Start);
    assert_eq!(route.places[1].role, PlaceRole::Checkpoint);
}

#[tokio::test]
async fn nearby_route_without_places_uses_classic_itinerary() {
    let backend = ScriptedBackend::new(|_, _| Ok(json!({"success": true, "data": {"places": []}})));
    let client = scripted_client(&backend);
    let route = client.generate_nearby_route(SOL, &[6]).await;
    assert_eq!(route.source, RouteSource::LocalFallback);
    assert_eq!(route.name, "Ruta Clásica de Madrid");
    assert_eq!(route.len(), catalog::madrid_itinerary().len());
}

#[tokio::test]
async fn rejected_envelope_uses_classic_itinerary() {
    let backend = ScriptedBackend::new(|_, _| {
        Ok(json!({"success": false, "message": "Error al generar ruta"}))
    });
    let client = scripted_client(&backend);
    let route = client.generate_nearby_route(SOL, &[6]).await;
    assert_eq!(route.source, RouteSource::LocalFallback);
    assert_eq!(route.places[0].name, "Plaza Mayor");
}
