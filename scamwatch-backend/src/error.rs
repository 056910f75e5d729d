// scamwatch-backend/src/error.rs

use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DbErr(DbErr),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Validation failed")]
    ValidationFailure(#[from] ValidationErrors),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Cascade delete failed: {0}")]
    CascadeFailure(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

/// コア操作が返すエラー分類。トランスポート層はこの値だけを見て応答に変換する
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Unauthenticated,
    Forbidden,
    NotFound,
    ValidationError,
    Conflict,
    CascadeFailure,
    Internal,
}

impl ErrorKind {
    /// 慣例的なHTTPステータスコード
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::Unauthenticated => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::ValidationError => 400,
            ErrorKind::Conflict => 409,
            ErrorKind::CascadeFailure => 500,
            ErrorKind::Internal => 500,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Unauthenticated => "unauthenticated",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::NotFound => "not_found",
            ErrorKind::ValidationError => "validation_error",
            ErrorKind::Conflict => "conflict",
            ErrorKind::CascadeFailure => "cascade_failure",
            ErrorKind::Internal => "internal",
        }
    }
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Unauthenticated(_) => ErrorKind::Unauthenticated,
            AppError::Forbidden(_) => ErrorKind::Forbidden,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::DbErr(DbErr::RecordNotFound(_)) => ErrorKind::NotFound,
            AppError::ValidationError(_) | AppError::ValidationFailure(_) => {
                ErrorKind::ValidationError
            }
            AppError::Conflict(_) => ErrorKind::Conflict,
            AppError::CascadeFailure(_) => ErrorKind::CascadeFailure,
            AppError::DbErr(_) | AppError::InternalServerError(_) => ErrorKind::Internal,
        }
    }

    /// クライアントに返すエラーレスポンスを組み立てる
    pub fn to_response(&self) -> ErrorResponse {
        let kind = self.kind();
        let message = match self {
            // ストレージの詳細は外に出さない
            AppError::DbErr(_) | AppError::InternalServerError(_) => {
                "An internal server error occurred".to_string()
            }
            other => other.to_string(),
        };
        let errors = match self {
            AppError::ValidationFailure(errors) => Some(
                errors
                    .field_errors()
                    .into_iter()
                    .flat_map(|(field, errors)| {
                        errors.iter().map(move |e| {
                            let msg = e
                                .message
                                .as_ref()
                                .map_or_else(|| "Invalid value".to_string(), |m| m.to_string());
                            format!("{}: {}", field, msg)
                        })
                    })
                    .collect(),
            ),
            _ => None,
        };

        ErrorResponse {
            success: false,
            error_type: kind,
            status: kind.status_code(),
            message,
            errors,
        }
    }
}

// 一意制約違反は入力エラーとして扱う
impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                AppError::ValidationError(format!("Duplicate value: {}", detail))
            }
            _ => AppError::DbErr(err),
        }
    }
}

// Result 型のエイリアス
pub type AppResult<T> = Result<T, AppError>;

/// 統一的なエラーレスポンス構造
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error_type: ErrorKind,
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}
