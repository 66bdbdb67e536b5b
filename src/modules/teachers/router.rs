use crate::modules::teachers::controller::{
    create_teacher, delete_teacher, get_teacher, update_teacher,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn init_teachers_router() -> Router<AppState> {
    Router::new().route("/", post(create_teacher)).route(
        "/{id}",
        get(get_teacher).patch(update_teacher).delete(delete_teacher),
    )
}
