use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{
    stamp_object, Comment, CommentFilter, CommentPatch, NewComment, ValidationError, TOP_LEVEL,
};
use crate::time::StoreTimezone;

/// Legacy "no time" value; treated as if no stamp was sent.
const ZERO_STAMP: &str = "0000-00-00 00:00:00";

const WALL_CLOCK_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// A `stamp` as clients send it. Parsed against the store zone once the
/// request is handled, so a bad value becomes a validation error.
///
/// Accepts RFC 3339 with an offset (`2024-03-01T10:00:00.000Z`) and
/// wall-clock datetimes in the store zone, `T` or space separated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StampInput(pub String);

impl StampInput {
    pub fn resolve(
        &self,
        timezone: &StoreTimezone,
    ) -> Result<Option<NaiveDateTime>, ValidationError> {
        let raw = self.0.trim();
        if raw == ZERO_STAMP {
            return Ok(None);
        }

        if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
            return Ok(Some(timezone.from_utc(instant.with_timezone(&Utc))));
        }

        WALL_CLOCK_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .map(Some)
            .ok_or_else(|| ValidationError::InvalidStamp(self.0.clone()))
    }
}

fn resolve_stamp(
    stamp: Option<&StampInput>,
    timezone: &StoreTimezone,
) -> Result<Option<NaiveDateTime>, ValidationError> {
    match stamp {
        Some(stamp) => stamp.resolve(timezone),
        None => Ok(None),
    }
}

/// Body of `POST /comments`. Every field is optional on the wire so a missing
/// required field surfaces as a validation error instead of a decode failure.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stamp: Option<StampInput>,
}

impl CreateCommentRequest {
    pub fn into_new_comment(
        self,
        timezone: &StoreTimezone,
    ) -> Result<NewComment, ValidationError> {
        let stamp = resolve_stamp(self.stamp.as_ref(), timezone)?;

        Ok(NewComment {
            object_name: self.object_name.ok_or(ValidationError::Missing("objectName"))?,
            object_id: self.object_id.ok_or(ValidationError::Missing("objectId"))?,
            comment_id: self.comment_id.unwrap_or(TOP_LEVEL),
            comment: self.comment.ok_or(ValidationError::Missing("comment"))?,
            stamp,
        })
    }
}

/// Body of `PATCH /comments/:id`; absent fields are left untouched.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stamp: Option<StampInput>,
}

impl UpdateCommentRequest {
    pub fn into_patch(self, timezone: &StoreTimezone) -> Result<CommentPatch, ValidationError> {
        Ok(CommentPatch {
            stamp: resolve_stamp(self.stamp.as_ref(), timezone)?,
            object_name: self.object_name,
            object_id: self.object_id,
            comment_id: self.comment_id,
            comment: self.comment,
        })
    }
}

/// Query string of `GET /comments`.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_id: Option<i64>,
}

impl From<CommentListParams> for CommentFilter {
    fn from(params: CommentListParams) -> Self {
        CommentFilter {
            id: None,
            object_name: params.object_name,
            object_id: params.object_id,
            comment_id: params.comment_id,
        }
    }
}

/// A comment as returned to clients, with its resolved UTC time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    pub stamp_object: DateTime<Utc>,
}

impl CommentView {
    pub fn new(comment: Comment, timezone: &StoreTimezone) -> Self {
        let stamp_object = stamp_object(&comment, timezone);
        Self {
            comment,
            stamp_object,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteCommentResponse {
    pub deleted: u64,
}
