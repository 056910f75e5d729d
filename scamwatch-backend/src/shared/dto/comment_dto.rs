// scamwatch-backend/src/shared/dto/comment_dto.rs

use super::record_input::{NewRecord, RecordPatch};
use crate::domain::comment_model::Model as Comment;
use crate::domain::moderated_record::ModerationState;
use crate::shared::validation::{comment, validate_not_blank};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// コメント作成リクエスト
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCommentInput {
    pub alert_id: Uuid,

    #[validate(
        length(min = 1, max = comment::CONTENT_MAX_LENGTH, message = "Comment must be 1-2000 characters"),
        custom(function = validate_not_blank)
    )]
    pub content: String,
}

/// コメント更新リクエスト
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateCommentInput {
    #[validate(
        length(min = 1, max = comment::CONTENT_MAX_LENGTH, message = "Comment must be 1-2000 characters"),
        custom(function = validate_not_blank)
    )]
    pub content: Option<String>,
}

impl NewRecord<Comment> for CreateCommentInput {
    fn into_record(
        self,
        id: Uuid,
        owner_id: Uuid,
        state: ModerationState,
        now: DateTime<Utc>,
    ) -> Comment {
        Comment {
            id,
            alert_id: self.alert_id,
            author_id: owner_id,
            content: self.content.trim().to_string(),
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

impl RecordPatch<Comment> for UpdateCommentInput {
    fn apply_to(self, comment: &mut Comment) {
        if let Some(content) = self.content {
            comment.content = content.trim().to_string();
        }
    }

    fn is_empty(&self) -> bool {
        self.content.is_none()
    }
}
