use crate::modules::guardians::controller::create_guardian;
use crate::state::AppState;
use axum::{Router, routing::post};

pub fn init_guardians_router() -> Router<AppState> {
    Router::new().route("/", post(create_guardian))
}
