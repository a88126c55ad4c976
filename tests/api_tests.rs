use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use bingerr::config::Config;
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Default API key seeded by migration (must match m20260815_initial.rs)
const DEFAULT_API_KEY: &str = "bingerr_default_api_key_please_regenerate";

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    // A single pooled connection keeps every query on the same
    // in-memory database.
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;

    let state = bingerr::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    bingerr::api::router(state).await
}

async fn get_json(app: &Router, uri: &str, api_key: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .header("X-Api-Key", api_key)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn post_json(
    app: &Router,
    uri: &str,
    api_key: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("X-Api-Key", api_key)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_auth_gating() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/system/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let (status, _) = get_json(&app, "/api/system/status", "wrong-key").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = get_json(&app, "/api/system/status", DEFAULT_API_KEY).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["database_ok"], true);
}

#[tokio::test]
async fn test_bearer_token_accepted() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/system/status")
                .header("Authorization", format!("Bearer {DEFAULT_API_KEY}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_register_and_login_flow() {
    let app = spawn_app().await;

    let (status, body) = post_json(
        &app,
        "/api/auth/register",
        "",
        serde_json::json!({"username": "viewer", "password": "longenough"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "viewer");

    let api_key = body["data"]["api_key"].as_str().unwrap().to_string();
    assert!(!api_key.is_empty());

    let (status, body) = post_json(
        &app,
        "/api/auth/login",
        "",
        serde_json::json!({"username": "viewer", "password": "longenough"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["api_key"], api_key.as_str());

    let (status, body) = get_json(&app, "/api/auth/me", &api_key).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "viewer");
}

#[tokio::test]
async fn test_register_validation() {
    let app = spawn_app().await;

    let (status, _) = post_json(
        &app,
        "/api/auth/register",
        "",
        serde_json::json!({"username": "shorty", "password": "short"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(
        &app,
        "/api/auth/register",
        "",
        serde_json::json!({"username": "  ", "password": "longenough"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_duplicate_username_conflicts() {
    let app = spawn_app().await;

    let payload = serde_json::json!({"username": "twice", "password": "longenough"});
    let (status, _) = post_json(&app, "/api/auth/register", "", payload.clone()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_json(&app, "/api/auth/register", "", payload).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = spawn_app().await;

    let (status, _) = post_json(
        &app,
        "/api/auth/login",
        "",
        serde_json::json!({"username": "admin", "password": "not-the-password"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_favorites_toggle_round_trip() {
    let app = spawn_app().await;

    let (status, body) = post_json(
        &app,
        "/api/favorites/42",
        DEFAULT_API_KEY,
        serde_json::Value::Null,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["favorite"], true);

    let (status, body) = get_json(&app, "/api/favorites", DEFAULT_API_KEY).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], 42);

    let (status, body) = post_json(
        &app,
        "/api/favorites/42",
        DEFAULT_API_KEY,
        serde_json::Value::Null,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["favorite"], false);

    let (_, body) = get_json(&app, "/api/favorites", DEFAULT_API_KEY).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_watchlist_toggle_round_trip() {
    let app = spawn_app().await;

    let (status, body) = post_json(
        &app,
        "/api/watchlist/7",
        DEFAULT_API_KEY,
        serde_json::Value::Null,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["in_list"], true);

    let (_, body) = get_json(&app, "/api/watchlist", DEFAULT_API_KEY).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (_, body) = post_json(
        &app,
        "/api/watchlist/7",
        DEFAULT_API_KEY,
        serde_json::Value::Null,
    )
    .await;
    assert_eq!(body["data"]["in_list"], false);
}

#[tokio::test]
async fn test_user_genres_are_additive() {
    let app = spawn_app().await;

    let (status, body) = post_json(
        &app,
        "/api/user/genres",
        DEFAULT_API_KEY,
        serde_json::json!({"genres": ["Drama", "Comedy"]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["genres"],
        serde_json::json!(["Drama", "Comedy"])
    );

    // Declaring an existing genre again changes nothing and keeps order.
    let (status, body) = post_json(
        &app,
        "/api/user/genres",
        DEFAULT_API_KEY,
        serde_json::json!({"genres": ["Drama", "Crime"]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["genres"],
        serde_json::json!(["Drama", "Comedy", "Crime"])
    );

    let (_, body) = get_json(&app, "/api/user/genres", DEFAULT_API_KEY).await;
    assert_eq!(
        body["data"]["genres"],
        serde_json::json!(["Drama", "Comedy", "Crime"])
    );
}

#[tokio::test]
async fn test_user_genres_rejects_empty() {
    let app = spawn_app().await;

    let (status, _) = post_json(
        &app,
        "/api/user/genres",
        DEFAULT_API_KEY,
        serde_json::json!({"genres": ["", "  "]}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_view_recording_counts_repeats() {
    let app = spawn_app().await;

    let series = serde_json::json!({
        "id": 1399,
        "name": "Game of Thrones",
        "poster_path": "/got.jpg",
        "overview": "Winter is coming",
        "popularity": 500.0,
        "vote_average": 8.4,
        "genres": ["Drama", "Sci-Fi & Fantasy"]
    });

    let (status, body) = post_json(&app, "/api/views", DEFAULT_API_KEY, series.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["tracked"], true);

    let (status, _) = post_json(&app, "/api/views", DEFAULT_API_KEY, series).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get_json(&app, "/api/views", DEFAULT_API_KEY).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], 1399);
    assert_eq!(items[0]["view_count"], 2);
    assert_eq!(items[0]["name"], "Game of Thrones");
}

#[tokio::test]
async fn test_recommendations_empty_without_profile() {
    let app = spawn_app().await;

    // Fresh user, no liked genres, no interactions, no catalog key:
    // the feed is well-formed and empty rather than an error.
    let (status, body) = get_json(&app, "/api/recommendations", DEFAULT_API_KEY).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["data"]["forYou"].as_array().unwrap().is_empty());
    assert!(body["data"]["similarTastes"].as_array().unwrap().is_empty());
    assert!(body["data"]["perGenreSections"].as_array().unwrap().is_empty());
    assert!(body["data"]["userGenres"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_search_requires_query() {
    let app = spawn_app().await;

    let (status, _) = get_json(&app, "/api/search?q=%20", DEFAULT_API_KEY).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
