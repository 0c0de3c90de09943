use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use oauth2::basic::BasicErrorResponseType;
use oauth2::{ConfigurationError, RequestTokenError, StandardErrorResponse};
use thiserror::Error;
use tracing::error;

use super::preferences::Preferences;
use super::templates::page::RenderPage;
use super::templates::pages::error_page::ErrorPage;

#[derive(Debug, Error)]
pub enum WebError {
    #[error("Page not found")]
    NotFound,
    #[error("Discord login is not enabled")]
    LoginDisabled,
    #[error("Login request did not match, please try again")]
    LoginStateMismatch,
    #[error("OAuth configuration error {0}")]
    ConfigurationError(#[from] ConfigurationError),
    #[error("Token error {0}")]
    TokenError(
        #[from]
        RequestTokenError<
            oauth2::reqwest::Error<reqwest::Error>,
            StandardErrorResponse<BasicErrorResponseType>,
        >,
    ),
    #[error("Error making an internal HTTP request {0}")]
    ReqwestError(#[from] reqwest::Error),
    #[error("Internal HTTP Error {0}")]
    AxumError(#[from] axum::http::Error),
    #[error("Error writing table {0}")]
    TableError(#[from] result_table::TableError),
    #[error("Error encoding JSON {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Generic error {0}")]
    AnyhowError(#[from] anyhow::Error),
}

impl WebError {
    fn as_status_code(&self) -> StatusCode {
        match self {
            WebError::NotFound | WebError::LoginDisabled => StatusCode::NOT_FOUND,
            WebError::LoginStateMismatch => StatusCode::BAD_REQUEST,
            WebError::TokenError(_) | WebError::ReqwestError(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.as_status_code();
        if status.is_server_error() {
            error!("Error returned {self:?}");
        }
        let page = ErrorPage {
            status,
            message: self.to_string(),
        };
        (status, RenderPage(page, Preferences::default())).into_response()
    }
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use http_body_util::BodyExt;

    use super::WebError;

    #[tokio::test]
    async fn errors_render_an_html_page() {
        let response = WebError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("Page not found"));
        assert!(body.contains("<html"));
    }
}
