mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

use common::{
    TestApp, create_test_competition, create_test_user, future_rounds, hours_from_now,
    setup_test_app,
};
use scoreboard_auth::Role;
use scoreboard_models::Round;

fn competition_body(rounds: &[Round]) -> Value {
    json!({
        "name": "Regional Finals",
        "description": "Top teams of the region",
        "location": "Main hall",
        "rounds": rounds,
    })
}

fn started_rounds() -> Vec<Round> {
    vec![Round {
        start: hours_from_now(-2),
        end: hours_from_now(2),
    }]
}

async fn stored_count(app: &TestApp) -> usize {
    app.store.document_count("competitions").await
}

#[tokio::test]
async fn test_create_competition() {
    let app = setup_test_app();
    let jury = create_test_user(&app.state, Role::Jury, true).await;
    let rounds = future_rounds();

    let (status, body) = app
        .send(
            "POST",
            "/competition",
            Some(competition_body(&rounds)),
            Some(&jury.token),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Regional Finals");
    assert_eq!(body["rounds"], json!(rounds));
    assert!(body.get("juries").is_none());

    let id: Uuid = body["id"].as_str().unwrap().parse().unwrap();
    let stored = app.competitions().find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.creator.email, jury.user.email);
    assert_eq!(stored.juries, vec![jury.info()]);
    assert_eq!(stored.tasks.len(), rounds.len());
}

#[tokio::test]
async fn test_create_requires_jury_role() {
    let app = setup_test_app();
    let competitor = create_test_user(&app.state, Role::Competitor, true).await;

    let (status, body) = app
        .send(
            "POST",
            "/competition",
            Some(competition_body(&future_rounds())),
            Some(&competitor.token),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid user passed");
    assert_eq!(stored_count(&app).await, 0);
}

#[tokio::test]
async fn test_create_rejects_overlapping_rounds() {
    let app = setup_test_app();
    let jury = create_test_user(&app.state, Role::Jury, true).await;
    let writes = app.store.write_count();
    let rounds = vec![
        Round {
            start: hours_from_now(10),
            end: hours_from_now(11),
        },
        Round {
            start: hours_from_now(10) + chrono::Duration::minutes(30),
            end: hours_from_now(12),
        },
    ];

    let (status, body) = app
        .send(
            "POST",
            "/competition",
            Some(competition_body(&rounds)),
            Some(&jury.token),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"status": 400, "message": "Round cannot start before previous round finishes"})
    );
    assert_eq!(app.store.write_count(), writes);
}

#[tokio::test]
async fn test_create_rejects_empty_and_inverted_rounds() {
    let app = setup_test_app();
    let jury = create_test_user(&app.state, Role::Jury, true).await;

    let (_, body) = app
        .send(
            "POST",
            "/competition",
            Some(competition_body(&[])),
            Some(&jury.token),
        )
        .await;
    assert_eq!(
        body["message"],
        "You must have at least one round in your competition"
    );

    let inverted = [Round {
        start: hours_from_now(5),
        end: hours_from_now(4),
    }];
    let (_, body) = app
        .send(
            "POST",
            "/competition",
            Some(competition_body(&inverted)),
            Some(&jury.token),
        )
        .await;
    assert_eq!(body["message"], "Round cannot start before it has ended");
    assert_eq!(stored_count(&app).await, 0);
}

#[tokio::test]
async fn test_get_competition_is_public() {
    let app = setup_test_app();
    let jury = create_test_user(&app.state, Role::Jury, true).await;
    let competition = create_test_competition(&app.state, &jury, future_rounds()).await;

    let (status, body) = app
        .send("GET", &format!("/competition/{}", competition.id), None, None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], json!(competition.id));
    assert_eq!(body["creator"]["email"], json!(jury.user.email));
    assert!(body.get("juries").is_none());
    assert!(body.get("tasks").is_none());
}

#[tokio::test]
async fn test_get_unknown_competition() {
    let app = setup_test_app();
    let missing = Uuid::new_v4();

    let (status, body) = app
        .send("GET", &format!("/competition/{}", missing), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({"status": 404, "message": format!("Competition with id {} was not found", missing)})
    );

    let (status, body) = app.send("GET", "/competition/finals", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Competition with id finals was not found");
}

#[tokio::test]
async fn test_list_competitions_reports_span() {
    let app = setup_test_app();
    let jury = create_test_user(&app.state, Role::Jury, true).await;
    let rounds = future_rounds();
    let competition = create_test_competition(&app.state, &jury, rounds.clone()).await;

    let (status, body) = app.send("GET", "/competition", None, None).await;

    assert_eq!(status, StatusCode::OK);
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], json!(competition.id));
    assert_eq!(list[0]["start"], json!(rounds[0].start));
    assert_eq!(list[0]["end"], json!(rounds[1].end));
    assert!(list[0].get("rounds").is_none());
    assert!(list[0].get("creator").is_none());
}

#[tokio::test]
async fn test_list_empty() {
    let app = setup_test_app();

    let (status, body) = app.send("GET", "/competition", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_detailed_view_is_for_juries() {
    let app = setup_test_app();
    let jury = create_test_user(&app.state, Role::Jury, true).await;
    let outsider = create_test_user(&app.state, Role::Jury, true).await;
    let competition = create_test_competition(&app.state, &jury, future_rounds()).await;
    let uri = format!("/competition/{}/detailed", competition.id);

    let (status, body) = app.send("GET", &uri, None, Some(&jury.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["juries"], json!([jury.info()]));

    let (status, body) = app.send("GET", &uri, None, Some(&outsider.token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid request, access denied");

    let (status, _) = app.send("GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_detailed_view_of_unknown_competition() {
    let app = setup_test_app();
    let jury = create_test_user(&app.state, Role::Jury, true).await;

    let (status, _) = app
        .send(
            "GET",
            &format!("/competition/{}/detailed", Uuid::new_v4()),
            None,
            Some(&jury.token),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_creator_updates_before_start() {
    let app = setup_test_app();
    let jury = create_test_user(&app.state, Role::Jury, true).await;
    let competition = create_test_competition(&app.state, &jury, future_rounds()).await;
    let new_rounds = vec![Round {
        start: hours_from_now(48),
        end: hours_from_now(50),
    }];

    let (status, body) = app
        .send(
            "PUT",
            &format!("/competition/{}", competition.id),
            Some(json!({"name": "Renamed", "location": "", "rounds": new_rounds})),
            Some(&jury.token),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Renamed");
    assert_eq!(body["location"], json!(competition.location));
    assert_eq!(body["description"], json!(competition.description));

    let stored = app
        .competitions()
        .find_by_id(competition.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.rounds, new_rounds);
    assert_eq!(stored.tasks.len(), 1);
}

#[tokio::test]
async fn test_update_revalidates_rounds() {
    let app = setup_test_app();
    let jury = create_test_user(&app.state, Role::Jury, true).await;
    let competition = create_test_competition(&app.state, &jury, future_rounds()).await;

    let (status, body) = app
        .send(
            "PUT",
            &format!("/competition/{}", competition.id),
            Some(json!({"rounds": []})),
            Some(&jury.token),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "You must have at least one round in your competition"
    );
    let stored = app
        .competitions()
        .find_by_id(competition.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.rounds, competition.rounds);
}

#[tokio::test]
async fn test_update_denied_for_other_jury_and_after_start() {
    let app = setup_test_app();
    let jury = create_test_user(&app.state, Role::Jury, true).await;
    let other = create_test_user(&app.state, Role::Jury, true).await;
    let upcoming = create_test_competition(&app.state, &jury, future_rounds()).await;
    let running = create_test_competition(&app.state, &jury, started_rounds()).await;

    let (status, body) = app
        .send(
            "PUT",
            &format!("/competition/{}", upcoming.id),
            Some(json!({"name": "Hijacked"})),
            Some(&other.token),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid request, access denied");

    let (status, body) = app
        .send(
            "PUT",
            &format!("/competition/{}", running.id),
            Some(json!({"name": "Too late"})),
            Some(&jury.token),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid request, access denied");

    let stored = app
        .competitions()
        .find_by_id(running.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.name, running.name);
}

#[tokio::test]
async fn test_creator_removes_competition() {
    let app = setup_test_app();
    let jury = create_test_user(&app.state, Role::Jury, true).await;
    let competition = create_test_competition(&app.state, &jury, started_rounds()).await;
    let uri = format!("/competition/{}", competition.id);

    let (status, body) = app.send("DELETE", &uri, None, Some(&jury.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], json!(competition.id));

    let (status, _) = app.send("GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send("DELETE", &uri, None, Some(&jury.token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_remove_denied_for_non_creator() {
    let app = setup_test_app();
    let jury = create_test_user(&app.state, Role::Jury, true).await;
    let other = create_test_user(&app.state, Role::Jury, true).await;
    let competitor = create_test_user(&app.state, Role::Competitor, true).await;
    let competition = create_test_competition(&app.state, &jury, future_rounds()).await;
    let uri = format!("/competition/{}", competition.id);

    let (status, body) = app.send("DELETE", &uri, None, Some(&other.token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid request, access denied");

    let (status, body) = app.send("DELETE", &uri, None, Some(&competitor.token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid user passed");

    assert_eq!(stored_count(&app).await, 1);
}

#[tokio::test]
async fn test_openapi_document_lists_endpoints() {
    let app = setup_test_app();

    let (status, body) = app.send("GET", "/api-docs/openapi.json", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/competition/{id}"]["put"].is_object());
    assert!(body["paths"]["/account/register"]["post"].is_object());
}
