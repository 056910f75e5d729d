// scamwatch-backend/src/shared/dto/case_file_dto.rs

use crate::shared::validation::{file, validate_mime_type, validate_not_blank};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 案件書類のメタデータ登録リクエスト
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AttachDocumentInput {
    #[validate(
        length(min = 1, max = file::NAME_MAX_LENGTH, message = "File name must be 1-255 characters"),
        custom(function = validate_not_blank)
    )]
    pub file_name: String,

    #[validate(range(min = 1, max = file::MAX_SIZE_BYTES, message = "File size must be between 1 byte and 100MB"))]
    pub file_size: i64,

    #[validate(custom(function = validate_mime_type))]
    pub mime_type: String,

    #[validate(length(min = 1, max = 2048, message = "File URI must be 1-2048 characters"))]
    pub file_uri: String,
}

/// 証拠品のメタデータ登録リクエスト
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AttachEvidenceInput {
    #[validate(
        length(min = 1, max = file::NAME_MAX_LENGTH, message = "File name must be 1-255 characters"),
        custom(function = validate_not_blank)
    )]
    pub file_name: String,

    #[validate(range(min = 1, max = file::MAX_SIZE_BYTES, message = "File size must be between 1 byte and 100MB"))]
    pub file_size: i64,

    #[validate(custom(function = validate_mime_type))]
    pub mime_type: String,

    #[validate(length(min = 1, max = 2048, message = "File URI must be 1-2048 characters"))]
    pub file_uri: String,

    #[validate(length(max = 2000, message = "Description cannot exceed 2000 characters"))]
    pub description: Option<String>,
}
