//! Stub backend route definitions.

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{add, get_all, health, remove, update, BackendState};

/// Create the backend router.
pub fn create_router(state: BackendState) -> Router {
    Router::new()
        // Student endpoints
        .route("/getAll", get(get_all))
        .route("/add", post(add))
        .route("/update/:id", put(update))
        .route("/delete/:id", delete(remove))
        // Health endpoint
        .route("/actuator/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn ada() -> Value {
        json!({"name": "Ada", "age": 20, "email": "a@x.com", "course": "Data Science", "accountNo": 5})
    }

    #[tokio::test]
    async fn health_endpoint_reports_up() {
        let app = create_router(BackendState::new());

        let response = app
            .oneshot(Request::builder().uri("/actuator/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"status": "UP"}));
    }

    #[tokio::test]
    async fn health_endpoint_reports_down() {
        let state = BackendState::new();
        state.set_healthy(false);
        let app = create_router(state);

        let response = app
            .oneshot(Request::builder().uri("/actuator/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(body_json(response).await["status"], "DOWN");
    }

    #[tokio::test]
    async fn add_assigns_sequential_ids() {
        let state = BackendState::new();

        let first = create_router(state.clone())
            .oneshot(json_request("POST", "/add", ada()))
            .await
            .unwrap();
        let second = create_router(state.clone())
            .oneshot(json_request("POST", "/add", ada()))
            .await
            .unwrap();

        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(body_json(first).await["id"], 1);
        assert_eq!(body_json(second).await["id"], 2);
        assert_eq!(state.students.read().await.len(), 2);
    }

    #[tokio::test]
    async fn add_rejects_blank_name_with_message() {
        let mut payload = ada();
        payload["name"] = json!(" ");

        let response = create_router(BackendState::new())
            .oneshot(json_request("POST", "/add", payload))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "name must not be blank");
    }

    #[tokio::test]
    async fn delete_of_missing_id_is_404_with_message() {
        let response = create_router(BackendState::new())
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/delete/9")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await["message"],
            "Student not found with id 9"
        );
    }

    #[tokio::test]
    async fn update_replaces_the_record() {
        let state = BackendState::new();
        create_router(state.clone())
            .oneshot(json_request("POST", "/add", ada()))
            .await
            .unwrap();

        let mut payload = ada();
        payload["name"] = json!("Ada Lovelace");
        let response = create_router(state.clone())
            .oneshot(json_request("PUT", "/update/1", payload))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["name"], "Ada Lovelace");
        assert_eq!(state.students.read().await[0].name, "Ada Lovelace");
    }
}
