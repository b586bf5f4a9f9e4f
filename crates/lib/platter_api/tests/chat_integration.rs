//! Integration test — start ephemeral PG, migrate, seed restaurants, and
//! exercise the chat endpoints end to end.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use platter_api::{AppState, config::ApiConfig};
use platter_core::db::{DbError, LocalDb};
use platter_core::recommend::StubRecommender;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

async fn post_json(app: axum::Router, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let resp = app.oneshot(req).await.expect("request");
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = serde_json::from_slice(&bytes).expect("parse JSON");
    (status, json)
}

async fn seed_restaurants(pool: &sqlx::PgPool) {
    // 10: string prices and coordinates; 20: NULL coordinates; 30: NULL menu.
    let rows: [(i64, Option<f64>, Option<&str>); 3] = [
        (
            10,
            Some(37.4979),
            Some(r#"[{"name":"Kimchi stew","price":"8000"},{"name":"Bulgogi","price":12000}]"#),
        ),
        (20, None, Some(r#"[{"name":"Ramen","price":"9500"}]"#)),
        (30, Some(37.5172), None),
    ];

    for (id, lat, menus) in rows {
        sqlx::query(
            r#"
            INSERT INTO restaurants
                (id, name, main_category, sub_category, latitude, longitude, url, thumbnail, menus)
            VALUES ($1, $2, $3, $4, $5, $5, $6, NULL, $7)
            "#,
        )
        .bind(id)
        .bind(format!("Place {id}"))
        .bind("Korean")
        .bind("Casual")
        .bind(lat)
        .bind(format!("https://example.com/place/{id}"))
        .bind(menus)
        .execute(pool)
        .await
        .expect("seed restaurant");
    }
}

/// Spin up an ephemeral PostgreSQL instance. Returns `None` when the
/// environment cannot run one (PG not installed, or `initdb`/`pg_ctl`
/// refuse to run, e.g. as root).
async fn ephemeral_db() -> Option<LocalDb> {
    let mut db = match LocalDb::ephemeral().await {
        Ok(db) => db,
        Err(DbError::PgConfigNotFound) => {
            eprintln!("skipping: PostgreSQL not installed");
            return None;
        }
        Err(e) => panic!("LocalDb::ephemeral: {e}"),
    };
    match async { db.setup().await?; db.start().await }.await {
        Ok(()) => Some(db),
        Err(DbError::Command(msg)) => {
            eprintln!("skipping: cannot launch local PostgreSQL: {msg}");
            None
        }
        Err(e) => panic!("local PostgreSQL failed: {e}"),
    }
}

#[tokio::test]
async fn chat_endpoints_end_to_end() {
    let Some(mut db) = ephemeral_db().await else {
        return;
    };

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(Duration::from_secs(2))
        .connect(&db.connection_url())
        .await
        .expect("connect to ephemeral PG");

    platter_api::migrate(&pool).await.expect("migrate");
    seed_restaurants(&pool).await;

    let state = AppState {
        pool: pool.clone(),
        config: ApiConfig {
            bind_addr: "127.0.0.1:0".into(),
            database_url: db.connection_url(),
            suggested_restaurant_ids: vec![20],
        },
        recommender: Arc::new(StubRecommender::default()),
    };
    let app = platter_api::router(state);

    // Session creation returns a fresh ID and the suggested place list.
    let (status, json) = post_json(app.clone(), "/chat", "").await;
    assert_eq!(StatusCode::OK, status);
    assert_eq!(json["httpStatusCode"], 200);
    let first_id = json["data"]["chatID"].as_i64().expect("chatID");
    assert_eq!(json["data"]["placeList"][0]["id"], 20);

    // IDs are strictly increasing across sessions.
    let (_, json) = post_json(app.clone(), "/chat", "").await;
    let second_id = json["data"]["chatID"].as_i64().expect("chatID");
    assert!(second_id > first_id, "expected {second_id} > {first_id}");

    // A chat turn returns the stub reply and the fixed recommendation list,
    // regardless of the submitted text.
    let body = format!(
        r#"{{"chatID": {first_id}, "category": {{"main": "Korean", "keywords": ""}}, "chat": "hello"}}"#
    );
    let (status, json) = post_json(app.clone(), "/chat/chatting", &body).await;
    assert_eq!(StatusCode::OK, status);
    assert_eq!(json["httpStatusCode"], 200);
    assert_eq!(
        json["data"]["chat"],
        "This is where the AI reply will go."
    );

    let place_list = json["data"]["placeList"].as_array().expect("placeList");
    let ids: Vec<i64> = place_list
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(vec![10, 20, 30], ids, "recommender order preserved");

    // Menu prices are integers even when stored as strings.
    assert_eq!(place_list[0]["menu"][0]["price"], 8000);
    assert_eq!(place_list[1]["menu"][0]["price"], 9500);
    // NULL coordinates are absent, not zero; NULL menu is an empty list.
    assert!(place_list[1]["latitude"].is_null());
    assert_eq!(place_list[2]["menu"], serde_json::json!([]));

    // The persisted turn holds exactly what was submitted; the empty
    // keywords field was normalized to NULL.
    let (main, keywords, message) = sqlx::query_as::<_, (Option<String>, Option<String>, Option<String>)>(
        "SELECT category_main, category_keywords, message FROM chat_turns WHERE session_id = $1",
    )
    .bind(first_id)
    .fetch_one(&pool)
    .await
    .expect("fetch turn");
    assert_eq!(Some("Korean".into()), main);
    assert_eq!(None, keywords);
    assert_eq!(Some("hello".into()), message);

    // A turn against an unknown session is a 404 envelope.
    let (status, json) = post_json(app.clone(), "/chat/chatting", r#"{"chatID": 999999}"#).await;
    assert_eq!(StatusCode::NOT_FOUND, status);
    assert_eq!(json["httpStatusCode"], 404);
    assert!(json["data"].is_null());

    // A malformed body answers the 400 envelope, not axum's plain-text
    // rejection.
    let (status, json) = post_json(app.clone(), "/chat/chatting", "{not json").await;
    assert_eq!(StatusCode::BAD_REQUEST, status);
    assert_eq!(json["httpStatusCode"], 400);
    assert!(json["data"].is_null());

    // With the database down, endpoints answer the generic 500 envelope and
    // leak no internal detail.
    db.stop().await.expect("db stop");
    let (status, json) = post_json(app.clone(), "/chat", "").await;
    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, status);
    assert_eq!(json["httpStatusCode"], 500);
    assert_eq!(json["message"], "Internal server error.");
    assert!(json["data"].is_null());
}
