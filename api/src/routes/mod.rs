use axum::Router;

mod admin;
mod city;
mod health;
mod session;

pub fn configure_routes(router: Router) -> Router {
    router
        .merge(health::configure())
        .merge(session::configure())
        .merge(admin::configure())
        .nest("/cities", city::configure())
}
