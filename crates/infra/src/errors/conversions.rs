//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use reqwest::StatusCode;
use rusqlite::Error as SqlError;
use serde_json::Error as JsonError;
use ticktally_domain::TickTallyError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub TickTallyError);

impl From<InfraError> for TickTallyError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<TickTallyError> for InfraError {
    fn from(value: TickTallyError) -> Self {
        InfraError(value)
    }
}

trait IntoTickTallyError {
    fn into_ticktally(self) -> TickTallyError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → TickTallyError */
/* -------------------------------------------------------------------------- */

// SQLite only backs the local timer mirror, so failures are cache errors.
impl IntoTickTallyError for SqlError {
    fn into_ticktally(self) -> TickTallyError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match err.code {
                    ErrorCode::DatabaseBusy => TickTallyError::Cache("local cache is busy".into()),
                    ErrorCode::DatabaseLocked => {
                        TickTallyError::Cache("local cache is locked".into())
                    }
                    ErrorCode::DiskFull => TickTallyError::Cache("local cache disk is full".into()),
                    ErrorCode::CannotOpen => {
                        TickTallyError::Cache(format!("cannot open local cache: {message}"))
                    }
                    _ => TickTallyError::Cache(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => TickTallyError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                TickTallyError::Cache(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                TickTallyError::Cache(format!("invalid column type: {ty}"))
            }
            RE::InvalidPath(path) => TickTallyError::Config(format!(
                "invalid local cache path: {}",
                path.to_string_lossy()
            )),
            other => TickTallyError::Cache(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_ticktally())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → TickTallyError */
/* -------------------------------------------------------------------------- */

impl IntoTickTallyError for JsonError {
    fn into_ticktally(self) -> TickTallyError {
        TickTallyError::Cache(format!("invalid cached JSON: {self}"))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_ticktally())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → TickTallyError */
/* -------------------------------------------------------------------------- */

impl IntoTickTallyError for HttpError {
    fn into_ticktally(self) -> TickTallyError {
        if self.is_timeout() {
            return TickTallyError::Network("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return TickTallyError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            return status_error(status, "");
        }

        if self.is_decode() {
            return TickTallyError::Store(format!("unexpected response body: {self}"));
        }

        TickTallyError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_ticktally())
    }
}

/// Map a non-success HTTP status to the domain error.
///
/// 404 is `NotFound`, other 4xx are `Store` rejections and everything else
/// (5xx, 429) is treated as a transient `Network` failure.
pub fn status_error(status: StatusCode, detail: &str) -> TickTallyError {
    let code = status.as_u16();
    let mut message = format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown"));
    if !detail.trim().is_empty() {
        message.push_str(": ");
        message.push_str(detail.trim());
    }

    match code {
        404 => TickTallyError::NotFound(message),
        429 => TickTallyError::Network(message),
        400..=499 => TickTallyError::Store(message),
        _ => TickTallyError::Network(message),
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
