//! Request handlers shared by every resource router.
//!
//! Each handler receives the resource's store through axum `State` and holds
//! the store lock only for the duration of one store operation.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use seedapi_store::{Page, ResourceStore, StoreError};
use seedapi_types::{Item, ItemId};

/// A resource's store, shared by the handlers of its router only.
pub type SharedStore = Arc<RwLock<ResourceStore>>;

/// Handler failure, rendered as an HTTP response.
#[derive(Debug)]
pub enum ApiError {
    NotFound,
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND.into_response(),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg).into_response()
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        Self::Internal(e.to_string())
    }
}

type ApiResult<T> = Result<T, ApiError>;

fn read(store: &SharedStore) -> ApiResult<RwLockReadGuard<'_, ResourceStore>> {
    store
        .read()
        .map_err(|e| ApiError::Internal(format!("store lock poisoned: {e}")))
}

fn write(store: &SharedStore) -> ApiResult<RwLockWriteGuard<'_, ResourceStore>> {
    store
        .write()
        .map_err(|e| ApiError::Internal(format!("store lock poisoned: {e}")))
}

fn found(hit: bool) -> ApiResult<StatusCode> {
    if hit {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

/// Query parameters of the collection listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

// ---- Single item ----

pub async fn read_single(State(store): State<SharedStore>) -> ApiResult<Json<Item>> {
    let guard = read(&store)?;
    Ok(Json(guard.read()?.clone()))
}

pub async fn replace_single(
    State(store): State<SharedStore>,
    Json(item): Json<Item>,
) -> ApiResult<StatusCode> {
    write(&store)?.replace(item)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn merge_single(
    State(store): State<SharedStore>,
    Json(partial): Json<Item>,
) -> ApiResult<StatusCode> {
    write(&store)?.merge(partial)?;
    Ok(StatusCode::NO_CONTENT)
}

// ---- Collection ----

pub async fn list_items(
    State(store): State<SharedStore>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Item>>> {
    let page = Page::new(params.page, params.per_page);
    let guard = read(&store)?;
    Ok(Json(guard.list(page)?.to_vec()))
}

pub async fn find_item(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> ApiResult<Json<Item>> {
    let guard = read(&store)?;
    let item = guard.find(&ItemId::new(id))?.ok_or(ApiError::NotFound)?;
    Ok(Json(item.clone()))
}

pub async fn insert_item(
    State(store): State<SharedStore>,
    Json(item): Json<Item>,
) -> ApiResult<StatusCode> {
    write(&store)?.insert(item)?;
    Ok(StatusCode::CREATED)
}

pub async fn replace_item(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    Json(item): Json<Item>,
) -> ApiResult<StatusCode> {
    let hit = write(&store)?.replace_by_id(&ItemId::new(id), item)?;
    found(hit)
}

pub async fn merge_item(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    Json(partial): Json<Item>,
) -> ApiResult<StatusCode> {
    let hit = write(&store)?.merge_by_id(&ItemId::new(id), partial)?;
    found(hit)
}

pub async fn remove_item(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let hit = write(&store)?.remove_by_id(&ItemId::new(id))?;
    found(hit)
}
