#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use taskboard_server::store::StoreResult;
use taskboard_server::{CommentService, CommentStore, StoreError};
use taskboard_shared::{
    BaseRecord, Comment, CommentFilter, CommentPatch, NewComment, StoreTimezone,
};

/// In-memory comment store with switchable failures.
#[derive(Default)]
pub struct MemoryCommentStore {
    rows: Mutex<Vec<Comment>>,
    next_id: Mutex<i64>,
    faults: Mutex<Faults>,
}

#[derive(Default, Clone, Copy)]
struct Faults {
    lookups: bool,
    reply_deletes: bool,
}

impl MemoryCommentStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every `find_one`/`find` call fails.
    pub fn fail_lookups(&self) {
        self.faults.lock().unwrap().lookups = true;
    }

    /// `destroy` fails when called with a replies-of filter.
    pub fn fail_reply_deletes(&self) {
        self.faults.lock().unwrap().reply_deletes = true;
    }

    pub fn ids(&self) -> Vec<i64> {
        self.rows.lock().unwrap().iter().map(Comment::id).collect()
    }

    fn check_lookup(&self) -> StoreResult<()> {
        if self.faults.lock().unwrap().lookups {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

fn is_reply_filter(filter: &CommentFilter) -> bool {
    filter.comment_id.is_some()
        && filter.id.is_none()
        && filter.object_name.is_none()
        && filter.object_id.is_none()
}

#[async_trait]
impl CommentStore for MemoryCommentStore {
    async fn find_one(&self, filter: &CommentFilter) -> StoreResult<Option<Comment>> {
        self.check_lookup()?;
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|c| filter.matches(c)).cloned())
    }

    async fn find(&self, filter: &CommentFilter) -> StoreResult<Vec<Comment>> {
        self.check_lookup()?;
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().filter(|c| filter.matches(c)).cloned().collect())
    }

    async fn create(&self, fields: &NewComment) -> StoreResult<Comment> {
        let id = {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            *next_id
        };
        let now = Utc::now();
        let comment = Comment {
            base: BaseRecord {
                id,
                created_at: now,
                updated_at: now,
            },
            object_name: fields.object_name.clone(),
            object_id: fields.object_id,
            comment_id: fields.comment_id,
            comment: fields.comment.clone(),
            stamp: fields.stamp,
        };
        self.rows.lock().unwrap().push(comment.clone());
        Ok(comment)
    }

    async fn update(
        &self,
        filter: &CommentFilter,
        patch: &CommentPatch,
    ) -> StoreResult<Vec<Comment>> {
        let now = Utc::now();
        let mut rows = self.rows.lock().unwrap();
        let mut updated = Vec::new();
        for comment in rows.iter_mut().filter(|c| filter.matches(c)) {
            patch.apply(comment);
            comment.base.updated_at = now;
            updated.push(comment.clone());
        }
        Ok(updated)
    }

    async fn destroy(&self, filter: &CommentFilter) -> StoreResult<u64> {
        if self.faults.lock().unwrap().reply_deletes && is_reply_filter(filter) {
            return Err(StoreError::Database(sqlx::Error::PoolClosed));
        }
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|c| !filter.matches(c));
        Ok((before - rows.len()) as u64)
    }
}

pub fn service(store: &Arc<MemoryCommentStore>) -> CommentService {
    service_in(store, StoreTimezone::utc())
}

pub fn service_in(store: &Arc<MemoryCommentStore>, timezone: StoreTimezone) -> CommentService {
    CommentService::new(store.clone(), timezone)
}
