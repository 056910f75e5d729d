// scamwatch-backend/src/shared/dto/case_dto.rs

use super::record_input::{NewRecord, RecordPatch};
use crate::domain::case_model::Model as LegalCase;
use crate::domain::moderated_record::ModerationState;
use crate::shared::validation::{record, validate_case_number, validate_not_blank};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// 案件作成リクエスト
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCaseInput {
    #[validate(custom(function = validate_case_number))]
    pub case_number: String,

    #[validate(
        length(min = 1, max = record::TITLE_MAX_LENGTH, message = "Title must be 1-200 characters"),
        custom(function = validate_not_blank)
    )]
    pub title: String,

    #[validate(
        length(min = 1, max = record::DESCRIPTION_MAX_LENGTH, message = "Description must be 1-5000 characters"),
        custom(function = validate_not_blank)
    )]
    pub description: String,

    #[validate(length(max = 200, message = "Victim name cannot exceed 200 characters"))]
    pub victim_name: Option<String>,
}

/// 案件更新リクエスト
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateCaseInput {
    #[validate(custom(function = validate_case_number))]
    pub case_number: Option<String>,

    #[validate(
        length(min = 1, max = record::TITLE_MAX_LENGTH, message = "Title must be 1-200 characters"),
        custom(function = validate_not_blank)
    )]
    pub title: Option<String>,

    #[validate(
        length(min = 1, max = record::DESCRIPTION_MAX_LENGTH, message = "Description must be 1-5000 characters"),
        custom(function = validate_not_blank)
    )]
    pub description: Option<String>,

    #[validate(length(max = 200, message = "Victim name cannot exceed 200 characters"))]
    pub victim_name: Option<String>,
}

impl NewRecord<LegalCase> for CreateCaseInput {
    fn into_record(
        self,
        id: Uuid,
        owner_id: Uuid,
        state: ModerationState,
        now: DateTime<Utc>,
    ) -> LegalCase {
        LegalCase {
            id,
            officer_id: owner_id,
            case_number: self.case_number,
            title: self.title.trim().to_string(),
            description: self.description,
            victim_name: self.victim_name,
            status: state.status,
            moderator_id: state.moderator_id,
            moderator_notes: state.moderator_notes,
            is_active: state.is_active,
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }
}

impl RecordPatch<LegalCase> for UpdateCaseInput {
    fn apply_to(self, case: &mut LegalCase) {
        if let Some(case_number) = self.case_number {
            case.case_number = case_number;
        }
        if let Some(title) = self.title {
            case.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            case.description = description;
        }
        if let Some(victim_name) = self.victim_name {
            case.victim_name = Some(victim_name);
        }
    }

    fn is_empty(&self) -> bool {
        self.case_number.is_none()
            && self.title.is_none()
            && self.description.is_none()
            && self.victim_name.is_none()
    }
}
