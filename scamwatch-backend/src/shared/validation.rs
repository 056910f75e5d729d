// scamwatch-backend/src/shared/validation.rs

//! 共通バリデーション定数と関数

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

/// 通報・アラート・案件の制約
pub mod record {
    pub const TITLE_MAX_LENGTH: u64 = 200;
    pub const DESCRIPTION_MAX_LENGTH: u64 = 5000;
    pub const NOTES_MAX_LENGTH: u64 = 2000;
}

/// コメントの制約
pub mod comment {
    pub const CONTENT_MAX_LENGTH: u64 = 2000;
}

/// 添付ファイルの制約
pub mod file {
    pub const NAME_MAX_LENGTH: u64 = 255;
    pub const MAX_SIZE_BYTES: i64 = 100 * 1024 * 1024;
}

/// 案件番号（例: CASE-2024-0001）
pub static CASE_NUMBER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9][A-Z0-9-]{2,39}$").expect("Invalid case number regex"));

/// 空白のみの文字列を拒否する
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("Value must not be blank".into());
        return Err(error);
    }
    Ok(())
}

pub fn validate_case_number(value: &str) -> Result<(), ValidationError> {
    if !CASE_NUMBER_REGEX.is_match(value) {
        let mut error = ValidationError::new("invalid_case_number");
        error.message = Some("Case number must be 3-40 uppercase letters, digits or hyphens".into());
        return Err(error);
    }
    Ok(())
}

/// `type/subtype` 形式のMIMEタイプのみ許可
pub fn validate_mime_type(value: &str) -> Result<(), ValidationError> {
    match value.parse::<mime::Mime>() {
        Ok(parsed) if !parsed.subtype().as_str().is_empty() && parsed.type_() != mime::STAR => {
            Ok(())
        }
        _ => {
            let mut error = ValidationError::new("invalid_mime_type");
            error.message = Some("MIME type must be of the form type/subtype".into());
            Err(error)
        }
    }
}

/// 拒否理由などの必須メモを正規化する（空白のみは None）
pub fn normalize_notes(notes: Option<&str>) -> Option<String> {
    notes
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}
