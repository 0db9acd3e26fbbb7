//! Service-layer error type
//!
//! `ServiceError` bridges DB-layer errors (`sqlx::Error`, `BoxError`) and the
//! API-layer error (`AppError`), so handlers can use `?` on both.

use axum::response::IntoResponse;
use shared::error::AppError;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// PostgreSQL SQLSTATE codes the API reports as client errors
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";

/// Service-layer error
///
/// - `Db`: database/infrastructure errors (logged, mapped to InternalError)
/// - `App`: business-rule errors (passed through to the client)
#[derive(Debug)]
pub enum ServiceError {
    Db(BoxError),
    App(AppError),
}

impl ServiceError {
    /// Constraint violations become client errors; anything else stays `Db`.
    fn classify(e: sqlx::Error) -> Self {
        let (code, constraint) = match e.as_database_error() {
            Some(db_err) => (
                db_err.code().map(|c| c.into_owned()),
                db_err.constraint().unwrap_or_default().to_string(),
            ),
            None => (None, String::new()),
        };
        let app_err = match code.as_deref() {
            Some(UNIQUE_VIOLATION) => AppError::conflict("Record already exists"),
            Some(FOREIGN_KEY_VIOLATION) => AppError::invalid_request("Foreign key constraint violated"),
            Some(CHECK_VIOLATION) => AppError::validation("Value violates a table constraint"),
            _ => return ServiceError::Db(e.into()),
        };
        tracing::debug!(constraint = %constraint, code = %app_err.code, "Constraint violation");
        ServiceError::App(app_err.with_detail("constraint", constraint))
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        Self::classify(e)
    }
}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        match e.downcast::<sqlx::Error>() {
            Ok(sqlx_err) => Self::classify(*sqlx_err),
            Err(other) => ServiceError::Db(other),
        }
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Service database error");
                AppError::internal("Internal server error")
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
