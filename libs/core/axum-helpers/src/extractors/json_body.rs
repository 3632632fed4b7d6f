//! JSON extractor whose rejection is an [`ErrorResponse`](crate::ErrorResponse).

use crate::errors::AppError;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;

/// Like [`Json`], but a malformed body answers with the standard error body
/// instead of axum's plain-text rejection.
///
/// ```ignore
/// async fn create(JsonBody(body): JsonBody<serde_json::Map<String, Value>>) { /* ... */ }
/// ```
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await?;
        Ok(JsonBody(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        routing::post,
    };
    use http_body_util::BodyExt;
    use serde_json::{Map, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new().route(
            "/echo",
            post(|JsonBody(body): JsonBody<Map<String, Value>>| async move { body.len().to_string() }),
        )
    }

    #[tokio::test]
    async fn test_object_body_is_extracted() {
        let res = app()
            .oneshot(
                HttpRequest::post("/echo")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"a":1,"b":2}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"2");
    }

    #[tokio::test]
    async fn test_non_object_body_is_error_response() {
        let res = app()
            .oneshot(
                HttpRequest::post("/echo")
                    .header("content-type", "application/json")
                    .body(Body::from("[1,2]"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "JSON_EXTRACTION");
    }
}
