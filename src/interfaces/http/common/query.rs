//! Query-string extractor with `{"detail"}` rejections
//!
//! Wraps `axum::extract::Query` so an unknown enum value or a malformed
//! parameter is answered like every other client error.

use axum::extract::rejection::QueryRejection;
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;

use super::ErrorResponse;

pub struct ApiQuery<T>(pub T);

pub struct ApiQueryRejection(QueryRejection);

impl IntoResponse for ApiQueryRejection {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            detail: self.0.body_text(),
        };
        (self.0.status(), Json(body)).into_response()
    }
}

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiQueryRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(ApiQueryRejection)?;
        Ok(ApiQuery(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "lowercase")]
    enum Status {
        Pending,
        Approved,
    }

    #[derive(Debug, Deserialize)]
    struct Params {
        status: Option<Status>,
    }

    async fn handler(ApiQuery(params): ApiQuery<Params>) -> String {
        format!("{:?}", params.status)
    }

    async fn get_uri(uri: &str) -> (StatusCode, Vec<u8>) {
        let app = Router::new().route("/items", get(handler));
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn known_value_is_parsed() {
        let (status, body) = get_uri("/items?status=approved").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"Some(Approved)");

        let (_, body) = get_uri("/items?status=pending").await;
        assert_eq!(body, b"Some(Pending)");

        let (status, body) = get_uri("/items").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"None");
    }

    #[tokio::test]
    async fn unknown_value_gets_detail_body() {
        let (status, body) = get_uri("/items?status=bogus").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(value["detail"].as_str().unwrap().contains("status"));
    }
}
