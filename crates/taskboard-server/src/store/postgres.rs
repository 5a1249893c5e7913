use async_trait::async_trait;
use chrono::Utc;
use taskboard_shared::{Comment, CommentFilter, CommentPatch, NewComment};

use super::{CommentStore, StoreResult};
use crate::db::DbPool;

const COMMENT_COLUMNS: &str =
    "id, created_at, updated_at, object_name, object_id, comment_id, comment, stamp";

/// Binds the values referenced by `where_clause`, in the same order.
macro_rules! bind_filter {
    ($query:expr, $filter:expr) => {{
        let mut query = $query;
        if let Some(id) = $filter.id {
            query = query.bind(id);
        }
        if let Some(ref object_name) = $filter.object_name {
            query = query.bind(object_name.as_str());
        }
        if let Some(object_id) = $filter.object_id {
            query = query.bind(object_id);
        }
        if let Some(comment_id) = $filter.comment_id {
            query = query.bind(comment_id);
        }
        query
    }};
}

/// Builds the WHERE body for `filter` with placeholders starting at
/// `param_idx`.
fn where_clause(filter: &CommentFilter, mut param_idx: usize) -> String {
    let mut conditions = Vec::new();

    if filter.id.is_some() {
        conditions.push(format!("id = ${}", param_idx));
        param_idx += 1;
    }
    if filter.object_name.is_some() {
        conditions.push(format!("object_name = ${}", param_idx));
        param_idx += 1;
    }
    if filter.object_id.is_some() {
        conditions.push(format!("object_id = ${}", param_idx));
        param_idx += 1;
    }
    if filter.comment_id.is_some() {
        conditions.push(format!("comment_id = ${}", param_idx));
    }

    if conditions.is_empty() {
        "TRUE".to_string()
    } else {
        conditions.join(" AND ")
    }
}

/// `updated_at` takes `$1`, set patch fields follow in declaration order,
/// then the filter values. `update` binds in the same order.
fn update_sql(filter: &CommentFilter, patch: &CommentPatch) -> String {
    let mut sets = vec!["updated_at = $1".to_string()];
    let mut param_idx = 2;

    if patch.object_name.is_some() {
        sets.push(format!("object_name = ${}", param_idx));
        param_idx += 1;
    }
    if patch.object_id.is_some() {
        sets.push(format!("object_id = ${}", param_idx));
        param_idx += 1;
    }
    if patch.comment_id.is_some() {
        sets.push(format!("comment_id = ${}", param_idx));
        param_idx += 1;
    }
    if patch.comment.is_some() {
        sets.push(format!("comment = ${}", param_idx));
        param_idx += 1;
    }
    if patch.stamp.is_some() {
        sets.push(format!("stamp = ${}", param_idx));
        param_idx += 1;
    }

    format!(
        "UPDATE comments SET {} WHERE {} RETURNING {}",
        sets.join(", "),
        where_clause(filter, param_idx),
        COMMENT_COLUMNS
    )
}

#[derive(Clone)]
pub struct PgCommentStore {
    pool: DbPool,
}

impl PgCommentStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentStore for PgCommentStore {
    async fn find_one(&self, filter: &CommentFilter) -> StoreResult<Option<Comment>> {
        let sql = format!(
            "SELECT {} FROM comments WHERE {} ORDER BY id ASC LIMIT 1",
            COMMENT_COLUMNS,
            where_clause(filter, 1)
        );

        let comment = bind_filter!(sqlx::query_as::<_, Comment>(&sql), filter)
            .fetch_optional(&self.pool)
            .await?;

        Ok(comment)
    }

    async fn find(&self, filter: &CommentFilter) -> StoreResult<Vec<Comment>> {
        let sql = format!(
            "SELECT {} FROM comments WHERE {} ORDER BY id ASC",
            COMMENT_COLUMNS,
            where_clause(filter, 1)
        );

        let comments = bind_filter!(sqlx::query_as::<_, Comment>(&sql), filter)
            .fetch_all(&self.pool)
            .await?;

        Ok(comments)
    }

    async fn create(&self, fields: &NewComment) -> StoreResult<Comment> {
        let now = Utc::now();
        let sql = format!(
            r#"
            INSERT INTO comments (object_name, object_id, comment_id, comment, stamp, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            COMMENT_COLUMNS
        );

        let comment = sqlx::query_as::<_, Comment>(&sql)
            .bind(&fields.object_name)
            .bind(fields.object_id)
            .bind(fields.comment_id)
            .bind(&fields.comment)
            .bind(fields.stamp)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        Ok(comment)
    }

    async fn update(
        &self,
        filter: &CommentFilter,
        patch: &CommentPatch,
    ) -> StoreResult<Vec<Comment>> {
        let sql = update_sql(filter, patch);

        let mut query = sqlx::query_as::<_, Comment>(&sql).bind(Utc::now());
        if let Some(ref object_name) = patch.object_name {
            query = query.bind(object_name.as_str());
        }
        if let Some(object_id) = patch.object_id {
            query = query.bind(object_id);
        }
        if let Some(comment_id) = patch.comment_id {
            query = query.bind(comment_id);
        }
        if let Some(ref comment) = patch.comment {
            query = query.bind(comment.as_str());
        }
        if let Some(stamp) = patch.stamp {
            query = query.bind(stamp);
        }

        let mut comments = bind_filter!(query, filter).fetch_all(&self.pool).await?;
        // RETURNING carries no ordering guarantee
        comments.sort_by_key(Comment::id);

        Ok(comments)
    }

    async fn destroy(&self, filter: &CommentFilter) -> StoreResult<u64> {
        let sql = format!("DELETE FROM comments WHERE {}", where_clause(filter, 1));

        let result = bind_filter!(sqlx::query(&sql), filter)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_matches_everything() {
        assert_eq!(where_clause(&CommentFilter::default(), 1), "TRUE");
    }

    #[test]
    fn placeholders_follow_field_order() {
        let filter = CommentFilter {
            id: Some(3),
            object_name: Some("Task".to_string()),
            object_id: None,
            comment_id: Some(1),
        };
        assert_eq!(
            where_clause(&filter, 4),
            "id = $4 AND object_name = $5 AND comment_id = $6"
        );
    }

    #[test]
    fn update_numbers_set_before_where() {
        let patch = CommentPatch {
            comment: Some("edited".to_string()),
            ..CommentPatch::default()
        };
        assert_eq!(
            update_sql(&CommentFilter::by_id(7), &patch),
            format!(
                "UPDATE comments SET updated_at = $1, comment = $2 WHERE id = $3 RETURNING {}",
                COMMENT_COLUMNS
            )
        );
    }

    #[test]
    fn update_with_every_field_and_filter() {
        let patch = CommentPatch {
            object_name: Some("Story".to_string()),
            object_id: Some(2),
            comment_id: Some(1),
            comment: Some("edited".to_string()),
            stamp: Some(Utc::now().naive_utc()),
        };
        let filter = CommentFilter {
            object_id: Some(5),
            comment_id: Some(0),
            ..CommentFilter::attached_to("Task", 5)
        };
        let sql = update_sql(&filter, &patch);

        assert!(sql.contains(
            "SET updated_at = $1, object_name = $2, object_id = $3, comment_id = $4, \
             comment = $5, stamp = $6 WHERE object_name = $7 AND object_id = $8 AND comment_id = $9"
        ));
    }

    #[test]
    fn update_with_empty_patch_only_touches_timestamp() {
        let sql = update_sql(&CommentFilter::default(), &CommentPatch::default());
        assert!(sql.starts_with("UPDATE comments SET updated_at = $1 WHERE TRUE RETURNING"));
    }
}
