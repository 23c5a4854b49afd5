// src/error.rs
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;
use strum::{AsRefStr, Display, EnumString};

use crate::jsonapi::JSONAPI_CONTENT_TYPE;

// ==================== ERROR CODES ====================

/// Codes reported in the `errors` array of a JSON-API error document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    QueryInvalidSortField,
    QueryInvalidPageSize,
    QueryInvalidPageNumber,
    UnknownFeaturedMod,
}

impl ErrorCode {
    pub fn code(&self) -> u16 {
        match self {
            ErrorCode::QueryInvalidSortField => 102,
            ErrorCode::QueryInvalidPageSize => 103,
            ErrorCode::QueryInvalidPageNumber => 104,
            ErrorCode::UnknownFeaturedMod => 142,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ErrorCode::QueryInvalidSortField => "Invalid sort field",
            ErrorCode::QueryInvalidPageSize => "Invalid page size",
            ErrorCode::QueryInvalidPageNumber => "Invalid page number",
            ErrorCode::UnknownFeaturedMod => "Unknown featured mod",
        }
    }

    /// Human readable detail with the offending value substituted
    pub fn detail(&self, arg: &str) -> String {
        match self {
            ErrorCode::QueryInvalidSortField => format!("Sorting by '{}' is not supported", arg),
            ErrorCode::QueryInvalidPageSize => format!("Page size is not valid: {}", arg),
            ErrorCode::QueryInvalidPageNumber => format!("Page number is not valid: {}", arg),
            ErrorCode::UnknownFeaturedMod => format!("There is no featured mod with ID \"{}\".", arg),
        }
    }
}

// ==================== QUERY ERRORS ====================

/// Rejected client query parameter. Always raised before the database is touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    InvalidSortField(String),
    InvalidPageSize(String),
    InvalidPageNumber(String),
}

impl QueryError {
    pub fn code(&self) -> ErrorCode {
        match self {
            QueryError::InvalidSortField(_) => ErrorCode::QueryInvalidSortField,
            QueryError::InvalidPageSize(_) => ErrorCode::QueryInvalidPageSize,
            QueryError::InvalidPageNumber(_) => ErrorCode::QueryInvalidPageNumber,
        }
    }

    /// The raw value the client sent
    pub fn value(&self) -> &str {
        match self {
            QueryError::InvalidSortField(v)
            | QueryError::InvalidPageSize(v)
            | QueryError::InvalidPageNumber(v) => v,
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.code().detail(self.value()))
    }
}

impl std::error::Error for QueryError {}

// ==================== API ERRORS ====================

#[derive(Debug)]
pub enum ApiError {
    Query(QueryError),
    UnknownFeaturedMod(String),
    BadRequest(String),
    NotFound(String),
    InternalServerError(String),
    DatabaseError(sqlx::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize)]
struct ErrorObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<u16>,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<Value>,
}

#[derive(Serialize)]
struct ErrorDocument {
    errors: Vec<ErrorObject>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::Query(err) => write!(f, "Invalid Query: {}", err),
            ApiError::UnknownFeaturedMod(id) => write!(f, "Unknown featured mod: {}", id),
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            ApiError::DatabaseError(err) => write!(f, "Database Error: {}", err),
        }
    }
}

impl ApiError {
    pub fn not_found(what: &str) -> Self {
        ApiError::NotFound(format!("No {} with this id was found", what))
    }

    fn error_object(&self) -> ErrorObject {
        match self {
            ApiError::Query(err) => ErrorObject {
                code: Some(err.code().code()),
                title: err.code().title().to_string(),
                detail: Some(err.code().detail(err.value())),
                meta: Some(json!({ "args": [err.value()] })),
            },
            ApiError::UnknownFeaturedMod(id) => {
                let code = ErrorCode::UnknownFeaturedMod;
                ErrorObject {
                    code: Some(code.code()),
                    title: code.title().to_string(),
                    detail: Some(code.detail(id)),
                    meta: Some(json!({ "args": [id] })),
                }
            }
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) => ErrorObject {
                code: None,
                title: msg.clone(),
                detail: None,
                meta: None,
            },
            // Driver messages are not echoed to clients
            ApiError::InternalServerError(_) | ApiError::DatabaseError(_) => ErrorObject {
                code: None,
                title: "Internal server error".to_string(),
                detail: None,
                meta: None,
            },
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Query(_) | ApiError::UnknownFeaturedMod(_) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalServerError(_) | ApiError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::DatabaseError(err) = self {
            log::error!("Database error: {}", err);
        }

        let document = ErrorDocument {
            errors: vec![self.error_object()],
        };
        HttpResponse::build(self.status_code())
            .content_type(JSONAPI_CONTENT_TYPE)
            .json(document)
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::DatabaseError(err)
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        ApiError::Query(err)
    }
}

// ==================== TESTS ====================
