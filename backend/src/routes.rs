use crate::config::ServerConfig;
use crate::handlers::*;
use crate::state::AppState;
use axum::http::header::HeaderName;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{delete, get};
use axum::Router;
use shared::api::{FOODS_ENDPOINT, HEALTH_ENDPOINT, HISTORY_ENDPOINT, SNAPSHOT_ENDPOINT};
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::set_header::SetResponseHeaderLayer;

pub fn api_router() -> Router<AppState> {
    Router::new()
        .route(HEALTH_ENDPOINT, get(health_check))
        .route(SNAPSHOT_ENDPOINT, get(get_snapshot))
        .route(FOODS_ENDPOINT, get(list_foods).post(add_food))
        .route(&format!("{}/:id", FOODS_ENDPOINT), delete(remove_food))
        .route(
            HISTORY_ENDPOINT,
            get(list_history).post(append_history).delete(clear_history),
        )
}

pub fn app(state: AppState, config: &ServerConfig) -> Router {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(vec![Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(vec![
            HeaderName::from_static("content-type"),
            HeaderName::from_static("x-requested-with"),
        ]);

    let index = config.static_dir.join("index.html");
    let static_service = ServeDir::new(&config.static_dir).fallback(ServeFile::new(index));

    let cache_control_layer = SetResponseHeaderLayer::if_not_present(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache"),
    );

    api_router()
        .layer(cors)
        .fallback_service(static_service)
        .layer(cache_control_layer)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::DataFile;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde::de::DeserializeOwned;
    use serde_json::json;
    use shared::api::{ErrorResponse, Snapshot};
    use shared::store::{HistoryEntry, MemoryHistoryStore, MemoryOptionStore, HISTORY_LIMIT};
    use shared::wheel::WheelOption;
    use tower::ServiceExt;

    fn test_app(state: AppState) -> Router {
        api_router().with_state(state)
    }

    fn default_state() -> AppState {
        AppState::new(MemoryOptionStore::with_defaults(), MemoryHistoryStore::new(), None)
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, Vec<u8>) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    fn parse<T: DeserializeOwned>(bytes: &[u8]) -> T {
        serde_json::from_slice(bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = test_app(default_state());
        let (status, body) = send(&app, Method::GET, "/api/health_check", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"OK");
    }

    #[tokio::test]
    async fn test_snapshot_starts_with_defaults() {
        let app = test_app(default_state());
        let (status, body) = send(&app, Method::GET, "/api/snapshot", None).await;
        assert_eq!(status, StatusCode::OK);
        let snapshot: Snapshot = parse(&body);
        assert_eq!(snapshot.revision, 0);
        assert_eq!(snapshot.foods.len(), 5);
        assert!(snapshot.history.is_empty());
    }

    #[tokio::test]
    async fn test_add_food_bumps_revision() {
        let state = default_state();
        let app = test_app(state.clone());

        let (status, body) =
            send(&app, Method::POST, "/api/foods", Some(json!({ "label": " Ramen " }))).await;
        assert_eq!(status, StatusCode::CREATED);
        let option: WheelOption = parse(&body);
        assert_eq!(option.label, "Ramen");
        assert_eq!(state.revision(), 1);

        let (status, body) =
            send(&app, Method::POST, "/api/foods", Some(json!({ "label": "ramen" }))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        let error: ErrorResponse = parse(&body);
        assert!(error.error.contains("already"));
        assert_eq!(state.revision(), 1);

        let (_, body) = send(&app, Method::GET, "/api/foods", None).await;
        let foods: Vec<WheelOption> = parse(&body);
        assert_eq!(foods.len(), 6);
    }

    #[tokio::test]
    async fn test_empty_label_is_bad_request() {
        let app = test_app(default_state());
        let (status, _) = send(&app, Method::POST, "/api/foods", Some(json!({ "label": "  " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_remove_food() {
        let app = test_app(default_state());

        let (status, _) = send(&app, Method::DELETE, "/api/foods/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::DELETE, "/api/foods/off1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = send(&app, Method::GET, "/api/foods", None).await;
        let foods: Vec<WheelOption> = parse(&body);
        assert_eq!(foods.len(), 4);
        assert!(foods.iter().all(|food| food.id != "off1"));
    }

    #[tokio::test]
    async fn test_remove_food_keeps_two() {
        let foods = MemoryOptionStore::with_options(vec![
            WheelOption::new("a", "Pizza"),
            WheelOption::new("b", "Tacos"),
        ]);
        let app = test_app(AppState::new(foods, MemoryHistoryStore::new(), None));

        let (status, _) = send(&app, Method::DELETE, "/api/foods/a", None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, body) = send(&app, Method::GET, "/api/foods", None).await;
        let foods: Vec<WheelOption> = parse(&body);
        assert_eq!(foods.len(), 2);
    }

    #[tokio::test]
    async fn test_history_cap_and_clear() {
        let app = test_app(default_state());

        for day in 1..=22 {
            let (status, _) = send(
                &app,
                Method::POST,
                "/api/history",
                Some(json!({ "date": format!("2024-05-{:02}", day), "label": "Sushi" })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (_, body) = send(&app, Method::GET, "/api/history", None).await;
        let history: Vec<HistoryEntry> = parse(&body);
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history[0].date, "2024-05-22");
        assert_eq!(history[HISTORY_LIMIT - 1].date, "2024-05-03");

        let (status, _) = send(&app, Method::DELETE, "/api/history", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, body) = send(&app, Method::GET, "/api/history", None).await;
        let history: Vec<HistoryEntry> = parse(&body);
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_history_rejects_bad_date() {
        let app = test_app(default_state());
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/history",
            Some(json!({ "date": "07/05/2024", "label": "Sushi" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_changes_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wheel.json");

        let state = AppState::load(Some(DataFile::new(&path))).await.unwrap();
        let app = test_app(state);
        send(&app, Method::POST, "/api/foods", Some(json!({ "label": "Ramen" }))).await;
        send(
            &app,
            Method::POST,
            "/api/history",
            Some(json!({ "date": "2024-05-01", "label": "Ramen" })),
        )
        .await;

        let reloaded = AppState::load(Some(DataFile::new(&path))).await.unwrap();
        let snapshot = reloaded.snapshot().await;
        assert_eq!(snapshot.foods.len(), 6);
        assert_eq!(snapshot.foods[5].label, "Ramen");
        assert_eq!(snapshot.history.len(), 1);
        assert_eq!(snapshot.revision, 0);
    }
}
