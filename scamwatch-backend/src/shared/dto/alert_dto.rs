// scamwatch-backend/src/shared/dto/alert_dto.rs

use super::record_input::{NewRecord, RecordPatch};
use crate::domain::alert_model::{AlertSeverity, Model as Alert};
use crate::domain::moderated_record::ModerationState;
use crate::shared::validation::{record, validate_not_blank};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// アラート作成リクエスト
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAlertInput {
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

    #[serde(default)]
    pub severity: AlertSeverity,

    #[validate(length(max = 100, message = "Region cannot exceed 100 characters"))]
    pub region: Option<String>,

    pub expires_at: Option<DateTime<Utc>>,
}

/// アラート更新リクエスト
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateAlertInput {
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

    pub severity: Option<AlertSeverity>,

    #[validate(length(max = 100, message = "Region cannot exceed 100 characters"))]
    pub region: Option<String>,

    pub expires_at: Option<DateTime<Utc>>,
}

impl NewRecord<Alert> for CreateAlertInput {
    fn into_record(
        self,
        id: Uuid,
        owner_id: Uuid,
        state: ModerationState,
        now: DateTime<Utc>,
    ) -> Alert {
        Alert {
            id,
            created_by: owner_id,
            title: self.title.trim().to_string(),
            description: self.description,
            severity: self.severity,
            region: self.region,
            expires_at: self.expires_at,
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

impl RecordPatch<Alert> for UpdateAlertInput {
    fn apply_to(self, alert: &mut Alert) {
        if let Some(title) = self.title {
            alert.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            alert.description = description;
        }
        if let Some(severity) = self.severity {
            alert.severity = severity;
        }
        if let Some(region) = self.region {
            alert.region = Some(region);
        }
        if let Some(expires_at) = self.expires_at {
            alert.expires_at = Some(expires_at);
        }
    }

    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.severity.is_none()
            && self.region.is_none()
            && self.expires_at.is_none()
    }
}
