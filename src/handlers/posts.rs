use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::db::models::{NewPost, Post, PostStatus};
use crate::db::sqlite::PostStorage;
use crate::error::CafeError;
use crate::middleware::auth::RequireAdmin;
use crate::middleware::validation::{
    PostId, Shaped, ValidatedJson, as_object, optional_status, optional_string,
    optional_string_array, require_string,
};
use crate::router::CafeState;

/// Body accepted by `POST /api/posts`. `title` and `body` are required;
/// `status` defaults to draft.
#[derive(Debug, Deserialize)]
pub struct CreatePostPayload {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub status: PostStatus,
    // Option so an explicit `"tags": null` deserializes like an absent
    // field, matching what the shape check admits.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl Shaped for CreatePostPayload {
    fn check_shape(value: &Value) -> Result<(), CafeError> {
        let obj = as_object(value)?;
        require_string(obj, "title")?;
        require_string(obj, "body")?;
        optional_string(obj, "author")?;
        optional_status(obj)?;
        optional_string_array(obj, "tags")
    }
}

impl CreatePostPayload {
    fn into_new_post(self) -> NewPost {
        NewPost {
            title: self.title,
            body: self.body,
            author: self.author,
            status: self.status,
            tags: self.tags.unwrap_or_default(),
        }
    }
}

/// Body accepted by `PUT /api/posts/{id}`. Absent fields keep their
/// stored values.
#[derive(Debug, Deserialize)]
pub struct UpdatePostPayload {
    pub title: Option<String>,
    pub body: Option<String>,
    pub author: Option<String>,
    pub status: Option<PostStatus>,
    pub tags: Option<Vec<String>>,
}

impl Shaped for UpdatePostPayload {
    fn check_shape(value: &Value) -> Result<(), CafeError> {
        let obj = as_object(value)?;
        optional_string(obj, "title")?;
        optional_string(obj, "body")?;
        optional_string(obj, "author")?;
        optional_status(obj)?;
        optional_string_array(obj, "tags")
    }
}

impl UpdatePostPayload {
    fn apply_to(self, existing: Post) -> NewPost {
        NewPost {
            title: self.title.unwrap_or(existing.title),
            body: self.body.unwrap_or(existing.body),
            author: self.author.or(existing.author),
            status: self.status.unwrap_or(existing.status),
            tags: self.tags.unwrap_or(existing.tags),
        }
    }
}

pub async fn list_posts(State(state): State<CafeState>) -> Result<Json<Vec<Post>>, CafeError> {
    let pool = state.manager.connect().await?;
    let posts = PostStorage::new(pool).find_all().await?;
    Ok(Json(posts))
}

pub async fn get_post(
    State(state): State<CafeState>,
    PostId(id): PostId,
) -> Result<Json<Post>, CafeError> {
    let pool = state.manager.connect().await?;
    let post = PostStorage::new(pool).find_by_id(id).await?;
    Ok(Json(post))
}

pub async fn create_post(
    State(state): State<CafeState>,
    _admin: RequireAdmin,
    ValidatedJson(payload): ValidatedJson<CreatePostPayload>,
) -> Result<(StatusCode, Json<Post>), CafeError> {
    let pool = state.manager.connect().await?;
    let post = PostStorage::new(pool).insert(payload.into_new_post()).await?;
    info!(id = post.id, "post created");
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn update_post(
    State(state): State<CafeState>,
    _admin: RequireAdmin,
    PostId(id): PostId,
    ValidatedJson(payload): ValidatedJson<UpdatePostPayload>,
) -> Result<Json<Post>, CafeError> {
    let pool = state.manager.connect().await?;
    let storage = PostStorage::new(pool);
    let existing = storage.find_by_id(id).await?;
    let post = storage.update_by_id(id, payload.apply_to(existing)).await?;
    info!(id, "post updated");
    Ok(Json(post))
}

pub async fn delete_post(
    State(state): State<CafeState>,
    _admin: RequireAdmin,
    PostId(id): PostId,
) -> Result<Json<Value>, CafeError> {
    let pool = state.manager.connect().await?;
    PostStorage::new(pool).delete_by_id(id).await?;
    info!(id, "post deleted");
    Ok(Json(json!({ "deleted": true })))
}
