use axum::Json;
use axum::extract::{Path, State, rejection::PathRejection};
use pkblog_api_types::{PostSummary, PostView};

use crate::application::error::HttpError;
use crate::application::posts::PostError;
use crate::domain::entities::PostRecord;

use super::HttpState;

pub(super) async fn list_posts(
    State(state): State<HttpState>,
) -> Result<Json<Vec<PostSummary>>, HttpError> {
    let posts = state.posts.list_posts().await?;
    Ok(Json(
        posts
            .into_iter()
            .map(|post| PostSummary::from(post_view(post)))
            .collect(),
    ))
}

pub(super) async fn get_post(
    State(state): State<HttpState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<PostView>, HttpError> {
    // Undecodable segments are just another malformed key.
    let Path(id) = path.map_err(|rejection| PostError::InvalidArgument {
        raw: rejection.body_text(),
    })?;
    let post = state.posts.get_post(&id).await?;
    Ok(Json(post_view(post)))
}

fn post_view(post: PostRecord) -> PostView {
    PostView {
        id: post.id,
        post_id: post.post_id,
        title: post.title,
        content: post.content,
        tags: post.tags,
        date: post.date,
        author: post.author,
        colors: post.colors,
    }
}
