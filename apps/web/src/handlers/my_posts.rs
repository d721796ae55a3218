//! Handlers for the signed-in author's own posts.

use actix_web::{HttpResponse, web};

use devdiary_core::DateBasis;
use devdiary_core::validation::{PostInput, PostPatch};
use devdiary_shared::ApiResponse;

use super::posts::{ListParams, list_view};
use crate::middleware::error::{AppError, AppResult};
use crate::middleware::session::AuthSession;
use crate::observability::RequestId;
use crate::state::AppState;

/// GET /api/my-posts - Protected route
pub async fn list(
    state: web::Data<AppState>,
    auth: AuthSession,
    params: web::Query<ListParams>,
) -> AppResult<HttpResponse> {
    let posts = state.posts.list(auth.token()).await?;
    let query = params.to_query().with_date_basis(DateBasis::Created);

    Ok(HttpResponse::Ok().json(ApiResponse::ok(list_view(&posts, &query))))
}

/// POST /api/my-posts - Protected route
pub async fn create(
    state: web::Data<AppState>,
    auth: AuthSession,
    request_id: RequestId,
    body: web::Json<PostInput>,
) -> AppResult<HttpResponse> {
    let new_post = body.into_inner().into_new_post()?;
    let post = state.posts.create(auth.token(), &new_post).await?;

    tracing::info!(
        request_id = %request_id.as_str(),
        post_id = %post.id,
        status = %post.status,
        "Post created"
    );

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(post, "Post created")))
}

/// GET /api/my-posts/{id} - Protected route
pub async fn get(
    state: web::Data<AppState>,
    auth: AuthSession,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get(auth.token(), &path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// PUT /api/my-posts/{id} - Protected route
pub async fn update(
    state: web::Data<AppState>,
    auth: AuthSession,
    path: web::Path<String>,
    body: web::Json<PostPatch>,
) -> AppResult<HttpResponse> {
    let changes = body.into_inner().into_changes()?;
    if changes.is_empty() {
        return Err(AppError::BadRequest("Nothing to update".to_string()));
    }

    let post = state.posts.update(auth.token(), &path, &changes).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(post, "Post updated")))
}

/// DELETE /api/my-posts/{id} - Protected route
pub async fn delete(
    state: web::Data<AppState>,
    auth: AuthSession,
    request_id: RequestId,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    state.posts.delete(auth.token(), &id).await?;

    tracing::info!(request_id = %request_id.as_str(), post_id = %id, "Post deleted");

    Ok(HttpResponse::NoContent().finish())
}
