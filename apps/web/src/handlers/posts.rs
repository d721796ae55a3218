//! Public post handlers.

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use devdiary_core::domain::Post;
use devdiary_core::text::{description, initials};
use devdiary_core::{DateBasis, DomainError, PostQuery, SortKey, StatusFilter, tag_universe};
use devdiary_shared::ApiResponse;
use devdiary_shared::dto::{PostListView, PostPageView, TagsView};

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Listing controls, as they arrive in the query string.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
    pub status: Option<String>,
    pub tag: Option<String>,
    pub sort: Option<String>,
}

impl ListParams {
    /// Listings open newest first until the caller picks another order.
    pub fn to_query(&self) -> PostQuery {
        let mut query = PostQuery::from_raw(
            self.q.as_deref(),
            self.status.as_deref(),
            self.tag.as_deref(),
            self.sort.as_deref(),
        );
        if self.sort.is_none() {
            query.sort = Some(SortKey::Newest);
        }
        query
    }
}

/// Run the listing controls over a fetched snapshot.
pub fn list_view(posts: &[Post], query: &PostQuery) -> PostListView {
    PostListView {
        posts: query.apply(posts),
        tags: tag_universe(posts),
        total: posts.len(),
    }
}

/// GET /api/posts
pub async fn list_published(
    state: web::Data<AppState>,
    params: web::Query<ListParams>,
) -> AppResult<HttpResponse> {
    let posts = state.posts.list_published().await?;
    let query = params
        .to_query()
        .with_status(StatusFilter::Published)
        .with_date_basis(DateBasis::Published);

    Ok(HttpResponse::Ok().json(ApiResponse::ok(list_view(&posts, &query))))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// GET /api/posts/search
pub async fn search(
    state: web::Data<AppState>,
    params: web::Query<SearchParams>,
) -> AppResult<HttpResponse> {
    let posts = state.posts.search(params.q.trim()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(posts)))
}

/// GET /api/posts/{handle}
pub async fn get_by_handle(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let handle = path.into_inner();
    let post = state.posts.get_by_handle(&handle).await?;

    if !post.is_published() {
        return Err(DomainError::NotFound {
            entity_type: "Post",
            key: handle,
        }
        .into());
    }

    Ok(HttpResponse::Ok().json(ApiResponse::ok(page_view(post))))
}

/// Page metadata shown alongside a single post.
pub fn page_view(post: Post) -> PostPageView {
    PostPageView {
        description: description(&post.content),
        display_date: post.display_date().format("%B %-d, %Y").to_string(),
        author_initials: initials(&post.author.name),
        post,
    }
}

/// GET /api/tags
pub async fn list_tags(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list_published().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(TagsView {
        tags: tag_universe(&posts),
    })))
}
