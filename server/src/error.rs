use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use orders::SlotError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload")]
    MalformedPayload,

    #[error("Order not found")]
    OrderNotFound,

    #[error("{0}")]
    UnknownSlot(#[from] SlotError),

    #[error("Data layer error: {0}")]
    Gateway(#[from] hasura::GatewayError),

    #[error("Internal error: {0}")]
    Internal(#[from] serde_json::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MalformedPayload { .. } | AppError::UnknownSlot { .. } => {
                StatusCode::BAD_REQUEST
            }
            AppError::OrderNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Gateway { .. } => StatusCode::BAD_GATEWAY,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(error: AppError) -> StatusCode {
        error.into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_of(AppError::MalformedPayload), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(AppError::UnknownSlot(SlotError::UnknownSlot("shipped".to_string()))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(AppError::OrderNotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(AppError::Gateway(hasura::GatewayError::Graphql(
                "permission denied".to_string()
            ))),
            StatusCode::BAD_GATEWAY
        );

        let json_error = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        assert_eq!(
            status_of(AppError::Internal(json_error)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
