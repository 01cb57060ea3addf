//! HTTP response DTOs.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::use_cases::{LookupError, StockLookup, SymbolResult};

/// Error body for a pair where either quote failed.
pub const PAIR_FETCH_ERROR: &str = "External API error: one or more stocks could not be fetched";

/// Error body for storage failures.
pub const STORAGE_UNAVAILABLE: &str = "Stock storage unavailable";

// =============================================================================
// Stock Prices
// =============================================================================

/// Body of `GET /api/stock-prices`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StockPricesResponse {
    /// Lookup data.
    Data {
        /// Single or paired stock data.
        #[serde(rename = "stockData")]
        stock_data: StockData,
    },
    /// Pair failure.
    Error {
        /// Failure message.
        error: String,
    },
}

/// `stockData` payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StockData {
    /// One symbol.
    Single(SingleStock),
    /// Two symbols, in request order.
    Pair([RelativeStock; 2]),
}

/// Single-symbol result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SingleStock {
    /// Priced stock.
    Quote {
        /// Symbol.
        stock: String,
        /// Latest price.
        price: f64,
        /// Distinct likes.
        likes: u64,
    },
    /// Quote failure.
    Error {
        /// Failure reason.
        error: String,
        /// Symbol.
        stock: String,
    },
}

/// One side of a paired result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelativeStock {
    /// Symbol.
    pub stock: String,
    /// Latest price.
    pub price: f64,
    /// Own likes minus the other symbol's likes.
    pub rel_likes: i64,
}

impl From<SymbolResult> for SingleStock {
    fn from(result: SymbolResult) -> Self {
        let stock = result.symbol.into_inner();
        match (result.price, result.error) {
            (Some(price), None) => Self::Quote {
                stock,
                price,
                likes: result.like_count,
            },
            (_, error) => Self::Error {
                error: error.unwrap_or_default(),
                stock,
            },
        }
    }
}

impl From<StockLookup> for StockPricesResponse {
    fn from(lookup: StockLookup) -> Self {
        match lookup {
            StockLookup::One(result) => Self::Data {
                stock_data: StockData::Single(result.into()),
            },
            StockLookup::Two(first, second) => match (first.price, second.price) {
                (Some(first_price), Some(second_price))
                    if !first.is_error() && !second.is_error() =>
                {
                    let first_likes = to_signed(first.like_count);
                    let second_likes = to_signed(second.like_count);
                    Self::Data {
                        stock_data: StockData::Pair([
                            RelativeStock {
                                stock: first.symbol.into_inner(),
                                price: first_price,
                                rel_likes: first_likes - second_likes,
                            },
                            RelativeStock {
                                stock: second.symbol.into_inner(),
                                price: second_price,
                                rel_likes: second_likes - first_likes,
                            },
                        ]),
                    }
                }
                _ => Self::Error {
                    error: PAIR_FETCH_ERROR.to_string(),
                },
            },
        }
    }
}

/// Clamped so that the difference of two counts cannot overflow.
fn to_signed(count: u64) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX / 2).min(i64::MAX / 2)
}

// =============================================================================
// Health
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
    /// Server uptime in seconds.
    pub uptime_secs: u64,
    /// Current time.
    pub current_time: chrono::DateTime<chrono::Utc>,
}

// =============================================================================
// Errors
// =============================================================================

/// API error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Malformed request.
    BadRequest,
    /// Like storage failed.
    StorageUnavailable,
    /// Unexpected internal failure.
    Internal,
}

impl ErrorCode {
    /// HTTP status for this code.
    #[must_use]
    pub const fn status(self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::StorageUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorResponse {
    /// Error message.
    pub error: String,
}

/// Error returned by handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
}

impl ApiError {
    /// Create an error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// The error category.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// The client-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::InvalidArity(_) | LookupError::InvalidSymbol(_) => {
                Self::new(ErrorCode::BadRequest, err.to_string())
            }
            LookupError::Storage(_) => Self::new(ErrorCode::StorageUnavailable, STORAGE_UNAVAILABLE),
            LookupError::TaskFailed(_) => Self::new(ErrorCode::Internal, "Internal error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.code.status(),
            Json(ApiErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}
