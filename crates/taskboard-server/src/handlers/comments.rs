use axum::{
    extract::{Path, Query, State},
    Json,
};
use taskboard_shared::{
    api::{
        CommentListParams, CommentView, CreateCommentRequest, DeleteCommentResponse,
        UpdateCommentRequest,
    },
    CommentFilter,
};

use crate::error::AppError;
use crate::routes::AppState;

/// GET /api/v1/comments
pub async fn list_comments(
    State(state): State<AppState>,
    Query(params): Query<CommentListParams>,
) -> Result<Json<Vec<CommentView>>, AppError> {
    let filter = CommentFilter::from(params);
    let comments = state.comments.find(&filter).await?;

    let timezone = state.comments.timezone();
    let views = comments
        .into_iter()
        .map(|comment| CommentView::new(comment, timezone))
        .collect();
    Ok(Json(views))
}

/// GET /api/v1/comments/:id
pub async fn get_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<i64>,
) -> Result<Json<CommentView>, AppError> {
    let comment = state
        .comments
        .find_by_id(comment_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(CommentView::new(comment, state.comments.timezone())))
}

/// POST /api/v1/comments
pub async fn create_comment(
    State(state): State<AppState>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<Json<CommentView>, AppError> {
    let fields = req.into_new_comment(state.comments.timezone())?;
    let comment = state.comments.create(fields).await?;

    Ok(Json(CommentView::new(comment, state.comments.timezone())))
}

/// PATCH /api/v1/comments/:id
pub async fn update_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<i64>,
    Json(req): Json<UpdateCommentRequest>,
) -> Result<Json<CommentView>, AppError> {
    let patch = req.into_patch(state.comments.timezone())?;
    let comment = state
        .comments
        .update(&CommentFilter::by_id(comment_id), &patch)
        .await?
        .into_iter()
        .next()
        .ok_or(AppError::NotFound)?;

    Ok(Json(CommentView::new(comment, state.comments.timezone())))
}

/// DELETE /api/v1/comments/:id
///
/// Deleting a comment that does not exist is not an error.
pub async fn delete_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<i64>,
) -> Result<Json<DeleteCommentResponse>, AppError> {
    let deleted = state
        .comments
        .delete(&CommentFilter::by_id(comment_id))
        .await?;

    Ok(Json(DeleteCommentResponse { deleted }))
}
