mod common;

use common::{failing_client, scripted_client, ScriptedBackend};
use ratoncito::adventure::family::{ChildProfile, FamilyId, FamilyProfile, FamilyStats};
use ratoncito::api::ApiError;
use serde_json::json;

fn profile() -> FamilyProfile {
    FamilyProfile {
        name: "Familia García".to_string(),
        children: vec![
            ChildProfile {
                name: "Lucía".to_string(),
                age: 6,
            },
            ChildProfile {
                name: "Mateo".to_string(),
                age: 8,
            },
        ],
    }
}

#[tokio::test]
async fn create_family_accepts_numeric_ids() {
    let backend = ScriptedBackend::new(|path, body| {
        assert_eq!(path, "gamification/family/create");
        assert_eq!(body.unwrap()["children"][1]["name"], "Mateo");
        Ok(json!({"success": true, "data": {"family_id": 17}}))
    });
    let client = scripted_client(&backend);
    assert_eq!(client.create_family(&profile()).await, Some(FamilyId::new("17")));
}

#[tokio::test]
async fn create_family_without_id_is_none() {
    let backend =
        ScriptedBackend::new(|_, _| Ok(json!({"success": true, "data": {"family_id": ""}})));
    let client = scripted_client(&backend);
    assert_eq!(client.create_family(&profile()).await, None);
    assert_eq!(failing_client().create_family(&profile()).await, None);
}

#[tokio::test]
async fn stats_are_mapped_from_backend() {
    let backend = ScriptedBackend::new(|path, _| {
        assert_eq!(path, "gamification/family/fam-1/stats");
        Ok(json!({"success": true, "data": {
            "challenges_completed": 3,
            "total_points": 90,
            "places_visited_count": 5,
            "current_level": {"level": 2, "name": "Explorador"},
            "achievements_count": 4
        }}))
    });
    let client = scripted_client(&backend);
    let stats = client.family_stats(&FamilyId::new("fam-1")).await;
    assert_eq!(stats.completed_challenges, 3);
    assert_eq!(stats.total_score, 90);
    assert_eq!(stats.average_score, 30.0);
    assert_eq!(stats.places_visited, 5);
    assert_eq!(stats.current_level, 2);
    assert_eq!(stats.achievements, 4);
}

#[tokio::test]
async fn stats_default_when_backend_fails() {
    let stats = failing_client().family_stats(&FamilyId::new("fam-1")).await;
    assert_eq!(stats, FamilyStats::default());
    assert_eq!(stats.current_level, 1);
}

#[tokio::test]
async fn recording_reports_acceptance() {
    let backend = ScriptedBackend::new(|path, _| {
        if path.ends_with("complete-challenge") {
            Err(ApiError::Status {
                status: 404,
                message: "Familia no encontrada".to_string(),
            })
        } else {
            Ok(json!({"success": true, "message": "ok"}))
        }
    });
    let client = scripted_client(&backend);
    let family = FamilyId::new("fam-1");
    assert!(client.record_place_visit(&family, "Plaza Mayor").await);
    assert!(!client.record_challenge_completion(&family).await);

    let rejecting = ScriptedBackend::new(|_, _| Ok(json!({"success": false, "detail": "no"})));
    let client = scripted_client(&rejecting);
    assert!(!client.record_place_visit(&family, "Plaza Mayor").await);
}
