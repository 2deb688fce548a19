use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use diawell_scoring::{AssessError, RawInput};
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::app::{App, SubmitError};

const FORM_HTML: &str = include_str!("form.html");

pub const MAX_BODY_BYTES: usize = 64 * 1024;
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

pub fn router(app: Arc<App>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/predict", post(predict))
        .route("/records", get(records))
        .route("/model_info", get(model_info))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http())
        .with_state(app)
}

/// Serves until `shutdown` resolves, then drains in-flight requests.
pub async fn serve<F>(listener: TcpListener, app: Arc<App>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    tracing::info!(target: "diawell", addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router(app))
        .with_graceful_shutdown(shutdown)
        .await?;
    tracing::info!(target: "diawell", "server stopped");
    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(FORM_HTML)
}

async fn predict(State(app): State<Arc<App>>, headers: HeaderMap, body: Bytes) -> Response {
    let form_encoded = headers.get(header::CONTENT_TYPE).map_or(true, |value| {
        value
            .to_str()
            .is_ok_and(|value| value.starts_with(FORM_URLENCODED))
    });
    if !form_encoded {
        return (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            format!("expected {FORM_URLENCODED}"),
        )
            .into_response();
    }

    let raw: RawInput = url::form_urlencoded::parse(&body).collect();

    match app.submit(&raw, true).await {
        Ok(view) => Json(view).into_response(),
        Err(SubmitError::Assess(err @ AssessError::Validation(_))) => {
            (StatusCode::BAD_REQUEST, err.to_string()).into_response()
        }
        Err(SubmitError::Assess(err @ AssessError::Scoring(_))) => {
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
        Err(SubmitError::Store(err)) => {
            tracing::warn!(target: "diawell", error = %err, "record not saved");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to save record").into_response()
        }
    }
}

async fn records(State(app): State<Arc<App>>) -> Response {
    match app.store().list_all().await {
        Ok(records) => Json(records).into_response(),
        Err(err) => {
            tracing::warn!(target: "diawell", error = %err, "listing records failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to list records").into_response()
        }
    }
}

async fn model_info(State(app): State<Arc<App>>) -> Response {
    match app.model_info() {
        Some(info) => Json(info).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use diawell_model::{LogisticModel, ModelArtifact};
    use diawell_store::{service, SqliteStore};
    use tower::ServiceExt;

    fn test_router() -> Router {
        let model = LogisticModel::from_artifact(ModelArtifact {
            classes: vec![0, 1],
            coef: vec![vec![0.0, 0.05, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]],
            intercept: vec![-7.5],
            feature_names: None,
        })
        .unwrap();
        let info = model.info();
        let (store, _task) = service::spawn(SqliteStore::memory().unwrap());
        router(Arc::new(App::new(Arc::new(model), Some(info), Arc::new(store))))
    }

    fn form_post(body: impl Into<Body>) -> Request<Body> {
        Request::post("/predict")
            .header(header::CONTENT_TYPE, FORM_URLENCODED)
            .body(body.into())
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn oversized_body_is_refused() {
        let response = test_router()
            .oneshot(form_post(vec![b'a'; MAX_BODY_BYTES + 1]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn non_form_body_is_unsupported() {
        let request = Request::post("/predict")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"age":45}"#))
            .unwrap();
        let response = test_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn non_utf8_values_count_as_invalid() {
        let body = "age=%FF%FE&glucose=180&bloodpressure=90&insulin=120&bmi=32.5";
        let response = test_router().oneshot(form_post(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_text(response).await,
            "Missing or invalid fields: age. Please provide valid numeric values."
        );
    }

    #[tokio::test]
    async fn unknown_routes_and_methods() {
        let router = test_router();

        let missing = Request::get("/nowhere").body(Body::empty()).unwrap();
        let response = router.clone().oneshot(missing).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let wrong_method = Request::get("/predict").body(Body::empty()).unwrap();
        let response = router.clone().oneshot(wrong_method).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        let wrong_method = Request::post("/records").body(Body::empty()).unwrap();
        let response = router.oneshot(wrong_method).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
