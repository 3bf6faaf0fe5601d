use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::error::ExtractError;
use crate::output::Method;
use crate::pipeline::input::{has_pdf_extension, PdfSource};

pub const SERVICE_NAME: &str = "PDF Extraction Service";

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub service: String,
    pub status: String,
    pub version: String,
    pub methods: Vec<Method>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

fn error_response(status: StatusCode, detail: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            detail: detail.into(),
        }),
    )
        .into_response()
}

pub async fn root_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(ServiceInfo {
        service: SERVICE_NAME.to_string(),
        status: "running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        methods: state.extractor.available_methods(),
    })
}

pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
        }),
    )
}

#[tracing::instrument(skip(state, multipart))]
pub async fn extract_handler(State(state): State<AppState>, multipart: Multipart) -> Response {
    let data = match read_pdf_upload(multipart).await {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    match state.extractor.extract(PdfSource::Bytes(data)).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => extract_error_response(e),
    }
}

#[tracing::instrument(skip(state, multipart))]
pub async fn extract_tier_handler(
    State(state): State<AppState>,
    Path(tier): Path<String>,
    multipart: Multipart,
) -> Response {
    let method = match tier.parse::<Method>() {
        Ok(m) if state.extractor.available_methods().contains(&m) => m,
        Ok(_) | Err(_) => {
            tracing::warn!(tier = %tier, "Unknown extraction tier requested");
            return error_response(
                StatusCode::NOT_FOUND,
                format!("Unknown extraction method '{tier}'"),
            );
        }
    };

    let data = match read_pdf_upload(multipart).await {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    match state
        .extractor
        .extract_with_tier(method, PdfSource::Bytes(data))
        .await
    {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => extract_error_response(e),
    }
}

/// Read the first multipart field that carries a filename.
async fn read_pdf_upload(mut multipart: Multipart) -> Result<Vec<u8>, Response> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => {
                tracing::warn!("Extract request with no file");
                return Err(error_response(StatusCode::BAD_REQUEST, "No file uploaded"));
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to read multipart");
                return Err(error_response(
                    e.status(),
                    format!("Failed to read multipart: {}", e.body_text()),
                ));
            }
        };

        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };

        if !has_pdf_extension(&filename) {
            tracing::warn!(filename = %filename, "Rejected non-PDF upload");
            return Err(error_response(StatusCode::BAD_REQUEST, "File must be a PDF"));
        }

        return match field.bytes().await {
            Ok(d) => {
                tracing::debug!(filename = %filename, bytes = d.len(), "File data received");
                Ok(d.to_vec())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to read file bytes");
                Err(error_response(
                    e.status(),
                    format!("Failed to read file: {}", e.body_text()),
                ))
            }
        };
    }
}

fn extract_error_response(e: ExtractError) -> Response {
    match e {
        ExtractError::UnknownTier { .. } => error_response(StatusCode::NOT_FOUND, e.to_string()),
        e if e.is_input_error() => {
            tracing::warn!(error = %e, "Rejected upload");
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
        e => {
            tracing::error!(error = %e, "Extraction failed unexpectedly");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn status_and_detail(resp: Response) -> (StatusCode, String) {
        let status = resp.status();
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let err: ErrorResponse = serde_json::from_slice(&body).unwrap();
        (status, err.detail)
    }

    #[tokio::test]
    async fn internal_error_is_500_with_detail() {
        let resp = extract_error_response(ExtractError::Internal("worker vanished".into()));
        let (status, detail) = status_and_detail(resp).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(detail, "Internal error: worker vanished");
    }

    #[tokio::test]
    async fn input_error_is_400() {
        let resp = extract_error_response(ExtractError::EmptyInput {
            input: "<bytes>".into(),
        });
        let (status, _) = status_and_detail(resp).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_tier_is_404() {
        let resp = extract_error_response(ExtractError::UnknownTier {
            name: "magic".into(),
            available: "primary, secondary".into(),
        });
        let (status, detail) = status_and_detail(resp).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(detail.contains("magic"));
    }
}
