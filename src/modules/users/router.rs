use crate::modules::users::controller::create_user;
use crate::state::AppState;
use axum::{Router, routing::post};

pub fn init_users_router() -> Router<AppState> {
    Router::new().route("/", post(create_user))
}
