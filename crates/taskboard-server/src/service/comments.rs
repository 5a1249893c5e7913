//! Comment entity rules on top of a [`CommentStore`].
//!
//! Creating a comment fills in `stamp` when the caller leaves it out, and
//! deleting one first removes its direct replies. Both steps run inline in
//! `create` and `delete`; nothing is dispatched implicitly.

use std::str::FromStr;
use std::sync::Arc;

use taskboard_shared::{
    is_zero_stamp, Comment, CommentFilter, CommentPatch, NewComment, StoreTimezone,
    ValidationError,
};

use crate::store::{CommentStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum CommentError {
    #[error("invalid comment: {0}")]
    Validation(#[from] ValidationError),

    #[error("comment lookup before delete failed: {0}")]
    LookupFailure(#[source] StoreError),

    #[error("failed to delete replies of comment {parent_id}: {source}")]
    CascadeFailure {
        parent_id: i64,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Which matched comments get their replies removed on delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CascadeScope {
    /// Only the first comment matched by the delete filter.
    #[default]
    FirstMatch,
    /// Every comment matched by the delete filter.
    AllMatches,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown cascade scope `{0}`, expected `first` or `all`")]
pub struct ParseCascadeScopeError(String);

impl FromStr for CascadeScope {
    type Err = ParseCascadeScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(CascadeScope::FirstMatch),
            "all" => Ok(CascadeScope::AllMatches),
            _ => Err(ParseCascadeScopeError(s.to_string())),
        }
    }
}

#[derive(Clone)]
pub struct CommentService {
    store: Arc<dyn CommentStore>,
    timezone: StoreTimezone,
    cascade_scope: CascadeScope,
}

impl CommentService {
    pub fn new(store: Arc<dyn CommentStore>, timezone: StoreTimezone) -> Self {
        Self {
            store,
            timezone,
            cascade_scope: CascadeScope::default(),
        }
    }

    pub fn with_cascade_scope(mut self, cascade_scope: CascadeScope) -> Self {
        self.cascade_scope = cascade_scope;
        self
    }

    pub fn timezone(&self) -> &StoreTimezone {
        &self.timezone
    }

    pub async fn create(&self, mut fields: NewComment) -> Result<Comment, CommentError> {
        fields.validate()?;

        if fields.stamp.map_or(true, |stamp| is_zero_stamp(&stamp)) {
            fields.stamp = Some(self.timezone.now());
        }

        let comment = self.store.create(&fields).await?;
        tracing::debug!(
            id = comment.id(),
            object_name = %comment.object_name,
            object_id = comment.object_id,
            "comment created"
        );

        Ok(comment)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, CommentError> {
        Ok(self.store.find_one(&CommentFilter::by_id(id)).await?)
    }

    pub async fn find(&self, filter: &CommentFilter) -> Result<Vec<Comment>, CommentError> {
        Ok(self.store.find(filter).await?)
    }

    /// Plain field mutation; `stamp` is only changed when the patch sets it.
    pub async fn update(
        &self,
        filter: &CommentFilter,
        patch: &CommentPatch,
    ) -> Result<Vec<Comment>, CommentError> {
        patch.validate()?;
        Ok(self.store.update(filter, patch).await?)
    }

    /// Deletes the comments matched by `filter` after removing the direct
    /// replies of the looked-up parent(s). Replies of replies are left alone.
    ///
    /// The lookup, the reply removal and the final delete are separate
    /// statements; a failure in either of the first two aborts before the
    /// matched comments are touched.
    pub async fn delete(&self, filter: &CommentFilter) -> Result<u64, CommentError> {
        let parents = match self.cascade_scope {
            CascadeScope::FirstMatch => self
                .store
                .find_one(filter)
                .await
                .map(|found| found.into_iter().collect::<Vec<_>>()),
            CascadeScope::AllMatches => self.store.find(filter).await,
        };

        let parents = parents.map_err(|e| {
            tracing::error!(?filter, "Comment fetch failed: {}", e);
            CommentError::LookupFailure(e)
        })?;

        for parent in &parents {
            let parent_id = parent.id();
            match self.store.destroy(&CommentFilter::children_of(parent_id)).await {
                Ok(removed) => {
                    tracing::debug!(parent_id, removed, "removed comment replies");
                }
                Err(e) => {
                    tracing::error!(parent_id, "Failed to delete comment replies: {}", e);
                    return Err(CommentError::CascadeFailure {
                        parent_id,
                        source: e,
                    });
                }
            }
        }

        let deleted = self.store.destroy(filter).await?;
        tracing::debug!(?filter, deleted, "comments deleted");

        Ok(deleted)
    }
}
