//! Handler bodies shared by every JSON CRUD route. Each one runs a single [Record]
//! operation through the pool and maps a missing row to a 404 naming the object type.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use trip_planner_db::{Record, RecordStore, DEFAULT_LIMIT};

use crate::{shared_state::State, Error};

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub skip: i64,
    pub limit: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    /// SQLite treats a negative LIMIT as "no limit", so negative values are clamped.
    fn bounds(&self) -> (i64, i64) {
        (self.skip.max(0), self.limit.max(0))
    }
}

pub async fn list<R: Record + Serialize>(
    state: &State,
    pagination: Pagination,
) -> Result<impl IntoResponse, Error> {
    let (skip, limit) = pagination.bounds();
    let objects = state.db.list_records::<R>(skip, limit).await?;
    Ok(Json(objects))
}

pub async fn get<R: Record + Serialize>(
    state: &State,
    id: i32,
    object_type: &'static str,
) -> Result<impl IntoResponse, Error> {
    let object = state
        .db
        .get_record::<R>(id)
        .await?
        .ok_or(Error::ObjectNotFound(object_type))?;
    Ok(Json(object))
}

pub async fn create<R: Record + Serialize>(
    state: &State,
    new: R::New,
) -> Result<impl IntoResponse, Error> {
    let object = state.db.create_record::<R>(new).await?;
    Ok((StatusCode::CREATED, Json(object)))
}

pub async fn update<R: Record + Serialize>(
    state: &State,
    id: i32,
    changes: R::Update,
    object_type: &'static str,
) -> Result<impl IntoResponse, Error> {
    let object = state
        .db
        .update_record::<R>(id, changes)
        .await?
        .ok_or(Error::ObjectNotFound(object_type))?;
    Ok(Json(object))
}

pub async fn delete<R: Record>(
    state: &State,
    id: i32,
    object_type: &'static str,
) -> Result<impl IntoResponse, Error> {
    let deleted = state.db.delete_record::<R>(id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::ObjectNotFound(object_type))
    }
}
