use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};

use trip_planner_db::cities::{City, CityUpdate, NewCity};

use crate::{
    auth::{AdminUser, CurrentUser},
    crud_helpers::{self, Pagination},
    shared_state::State,
    Error,
};

const OBJECT: &str = "city";

async fn list_cities(
    Extension(ref state): Extension<State>,
    _user: CurrentUser,
    Query(pagination): Query<Pagination>,
) -> Result<impl IntoResponse, Error> {
    crud_helpers::list::<City>(state, pagination).await
}

async fn get_city(
    Extension(ref state): Extension<State>,
    _user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    crud_helpers::get::<City>(state, id, OBJECT).await
}

async fn create_city(
    Extension(ref state): Extension<State>,
    _user: AdminUser,
    Json(new): Json<NewCity>,
) -> Result<impl IntoResponse, Error> {
    crud_helpers::create::<City>(state, new).await
}

async fn update_city(
    Extension(ref state): Extension<State>,
    _user: AdminUser,
    Path(id): Path<i32>,
    Json(changes): Json<CityUpdate>,
) -> Result<impl IntoResponse, Error> {
    crud_helpers::update::<City>(state, id, changes, OBJECT).await
}

async fn delete_city(
    Extension(ref state): Extension<State>,
    _user: AdminUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    crud_helpers::delete::<City>(state, id, OBJECT).await
}

pub fn configure() -> Router {
    Router::new()
        .route("/", get(list_cities).post(create_city))
        .route(
            "/:id",
            get(get_city).patch(update_city).delete(delete_city),
        )
}
