use axum::{extract::Query, response::IntoResponse, routing::get, Extension, Router};

use trip_planner_db::users::User;

use crate::{
    auth::AdminUser,
    crud_helpers::{self, Pagination},
    shared_state::State,
    Error,
};

async fn list_users(
    Extension(ref state): Extension<State>,
    AdminUser(_): AdminUser,
    Query(pagination): Query<Pagination>,
) -> Result<impl IntoResponse, Error> {
    crud_helpers::list::<User>(state, pagination).await
}

pub fn configure() -> Router {
    Router::new().route("/admin", get(list_users))
}
