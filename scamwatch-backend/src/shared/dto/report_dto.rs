// scamwatch-backend/src/shared/dto/report_dto.rs

use super::record_input::{NewRecord, RecordPatch};
use crate::domain::moderated_record::ModerationState;
use crate::domain::report_model::Model as Report;
use crate::shared::validation::{record, validate_not_blank};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// 通報作成リクエスト
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateReportInput {
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

    #[validate(length(min = 1, max = 50, message = "Scam type must be 1-50 characters"))]
    pub scam_type: String,

    #[validate(length(max = 255, message = "Scammer contact cannot exceed 255 characters"))]
    pub scammer_contact: Option<String>,

    #[validate(range(min = 0, message = "Amount lost cannot be negative"))]
    pub amount_lost_cents: Option<i64>,

    pub incident_date: Option<DateTime<Utc>>,
}

/// 通報更新リクエスト
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateReportInput {
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

    #[validate(length(min = 1, max = 50, message = "Scam type must be 1-50 characters"))]
    pub scam_type: Option<String>,

    #[validate(length(max = 255, message = "Scammer contact cannot exceed 255 characters"))]
    pub scammer_contact: Option<String>,

    #[validate(range(min = 0, message = "Amount lost cannot be negative"))]
    pub amount_lost_cents: Option<i64>,

    pub incident_date: Option<DateTime<Utc>>,
}

impl NewRecord<Report> for CreateReportInput {
    fn into_record(
        self,
        id: Uuid,
        owner_id: Uuid,
        state: ModerationState,
        now: DateTime<Utc>,
    ) -> Report {
        Report {
            id,
            reporter_id: owner_id,
            title: self.title.trim().to_string(),
            description: self.description,
            scam_type: self.scam_type,
            scammer_contact: self.scammer_contact,
            amount_lost_cents: self.amount_lost_cents,
            incident_date: self.incident_date,
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

impl RecordPatch<Report> for UpdateReportInput {
    fn apply_to(self, report: &mut Report) {
        if let Some(title) = self.title {
            report.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            report.description = description;
        }
        if let Some(scam_type) = self.scam_type {
            report.scam_type = scam_type;
        }
        if let Some(contact) = self.scammer_contact {
            report.scammer_contact = Some(contact);
        }
        if let Some(amount) = self.amount_lost_cents {
            report.amount_lost_cents = Some(amount);
        }
        if let Some(date) = self.incident_date {
            report.incident_date = Some(date);
        }
    }

    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.scam_type.is_none()
            && self.scammer_contact.is_none()
            && self.amount_lost_cents.is_none()
            && self.incident_date.is_none()
    }
}
