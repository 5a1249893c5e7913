use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::models::BaseRecord;
use crate::time::StoreTimezone;

/// `comment_id` value of a comment that is not a reply.
pub const TOP_LEVEL: i64 = 0;

/// A comment attached to some object (`object_name` + `object_id`), optionally
/// replying to another comment through `comment_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub base: BaseRecord,
    pub object_name: String,
    pub object_id: i64,
    pub comment_id: i64,
    pub comment: String,
    pub stamp: Option<NaiveDateTime>,
}

impl Comment {
    pub fn id(&self) -> i64 {
        self.base.id
    }

    pub fn is_top_level(&self) -> bool {
        self.comment_id == TOP_LEVEL
    }
}

/// Legacy stores wrote `0000-00-00 00:00:00` for "no time"; the closest value
/// chrono can hold is midnight on 0000-01-01.
pub fn is_zero_stamp(stamp: &NaiveDateTime) -> bool {
    stamp.year() == 0
        && stamp.ordinal() == 1
        && stamp.num_seconds_from_midnight() == 0
        && stamp.nanosecond() == 0
}

/// Time of the comment in UTC: the stamp when it holds a real value, the
/// record creation time otherwise.
pub fn stamp_object(comment: &Comment, timezone: &StoreTimezone) -> DateTime<Utc> {
    comment
        .stamp
        .filter(|stamp| !is_zero_stamp(stamp))
        .and_then(|stamp| timezone.to_utc(stamp))
        .unwrap_or(comment.base.created_at)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{0} must not be blank")]
    Blank(&'static str),

    #[error("stamp is not a valid datetime: {0}")]
    InvalidStamp(String),
}

fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank(field));
    }
    Ok(())
}

/// Fields accepted when creating a comment. `id` and the base timestamps are
/// assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub object_name: String,
    pub object_id: i64,
    pub comment_id: i64,
    pub comment: String,
    pub stamp: Option<NaiveDateTime>,
}

impl NewComment {
    pub fn new(object_name: impl Into<String>, object_id: i64, comment: impl Into<String>) -> Self {
        Self {
            object_name: object_name.into(),
            object_id,
            comment_id: TOP_LEVEL,
            comment: comment.into(),
            stamp: None,
        }
    }

    pub fn reply_to(mut self, parent_id: i64) -> Self {
        self.comment_id = parent_id;
        self
    }

    pub fn with_stamp(mut self, stamp: NaiveDateTime) -> Self {
        self.stamp = Some(stamp);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("objectName", &self.object_name)?;
        require_text("comment", &self.comment)
    }
}

/// Direct field mutation; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentPatch {
    pub object_name: Option<String>,
    pub object_id: Option<i64>,
    pub comment_id: Option<i64>,
    pub comment: Option<String>,
    pub stamp: Option<NaiveDateTime>,
}

impl CommentPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(ref object_name) = self.object_name {
            require_text("objectName", object_name)?;
        }
        if let Some(ref comment) = self.comment {
            require_text("comment", comment)?;
        }
        Ok(())
    }

    pub fn apply(&self, target: &mut Comment) {
        if let Some(ref object_name) = self.object_name {
            target.object_name = object_name.clone();
        }
        if let Some(object_id) = self.object_id {
            target.object_id = object_id;
        }
        if let Some(comment_id) = self.comment_id {
            target.comment_id = comment_id;
        }
        if let Some(ref comment) = self.comment {
            target.comment = comment.clone();
        }
        if let Some(stamp) = self.stamp {
            target.stamp = Some(stamp);
        }
    }
}

/// Equality criteria over comment columns, AND-combined. The empty filter
/// matches every comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentFilter {
    pub id: Option<i64>,
    pub object_name: Option<String>,
    pub object_id: Option<i64>,
    pub comment_id: Option<i64>,
}

impl CommentFilter {
    pub fn by_id(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    /// Direct replies to `parent_id`.
    pub fn children_of(parent_id: i64) -> Self {
        Self {
            comment_id: Some(parent_id),
            ..Self::default()
        }
    }

    pub fn attached_to(object_name: impl Into<String>, object_id: i64) -> Self {
        Self {
            object_name: Some(object_name.into()),
            object_id: Some(object_id),
            ..Self::default()
        }
    }

    pub fn matches(&self, comment: &Comment) -> bool {
        self.id.map_or(true, |id| comment.base.id == id)
            && self
                .object_name
                .as_deref()
                .map_or(true, |name| comment.object_name == name)
            && self.object_id.map_or(true, |id| comment.object_id == id)
            && self.comment_id.map_or(true, |id| comment.comment_id == id)
    }
}
