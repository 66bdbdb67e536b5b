use crate::modules::students::controller::{
    create_student, delete_student, get_student, update_student,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn init_students_router() -> Router<AppState> {
    Router::new().route("/", post(create_student)).route(
        "/{id}",
        get(get_student).patch(update_student).delete(delete_student),
    )
}
