mod common;

use axum::http::StatusCode;
use common::{count_rows, send_empty, send_json, setup_test_app, unique_email, unique_phone};
use serde_json::{Value, json};
use sqlx::PgPool;
use uuid::Uuid;

fn student_payload(
    email: &str,
    phone: &str,
    guardian_email: &str,
    guardian_phone: &str,
) -> Value {
    json!({
        "first_name": "Student",
        "last_name": "Test",
        "email": email,
        "password": "studentpass",
        "gender": "female",
        "phone_number": phone,
        "address": "1 School Lane",
        "date_of_birth": "2010-01-15",
        "guardian_first_name": "Guardian",
        "guardian_last_name": "Test",
        "guardian_email": guardian_email,
        "guardian_password": "guardianpass",
        "guardian_gender": "male",
        "guardian_phone_number": guardian_phone
    })
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_student_with_new_guardian(pool: PgPool) {
    let student_email = unique_email();
    let payload = student_payload(&student_email, &unique_phone(), &unique_email(), &unique_phone());

    let (status, body) =
        send_json(setup_test_app(pool.clone()), "POST", "/api/students", &payload).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["user"]["email"], student_email);
    assert!(body["data"]["guardian_id"].is_string());
    assert!(body["data"]["user"].get("password").is_none());

    assert_eq!(count_rows(&pool, "users").await, 2);
    assert_eq!(count_rows(&pool, "guardians").await, 1);
    assert_eq!(count_rows(&pool, "students").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_second_student_reuses_guardian(pool: PgPool) {
    let guardian_email = unique_email();
    let guardian_phone = unique_phone();

    let first = student_payload(&unique_email(), &unique_phone(), &guardian_email, &guardian_phone);
    let (status, first_body) =
        send_json(setup_test_app(pool.clone()), "POST", "/api/students", &first).await;
    assert_eq!(status, StatusCode::CREATED);

    // Same guardian email, different guardian fields: they must be ignored.
    let mut second =
        student_payload(&unique_email(), &unique_phone(), &guardian_email, &unique_phone());
    second["guardian_first_name"] = json!("Somebody");
    second["guardian_last_name"] = json!("Else");
    let (status, second_body) =
        send_json(setup_test_app(pool.clone()), "POST", "/api/students", &second).await;
    assert_eq!(status, StatusCode::CREATED);

    assert_eq!(first_body["data"]["guardian_id"], second_body["data"]["guardian_id"]);
    assert_eq!(count_rows(&pool, "users").await, 3);
    assert_eq!(count_rows(&pool, "guardians").await, 1);
    assert_eq!(count_rows(&pool, "students").await, 2);

    let (stored_first_name, stored_phone): (String, String) =
        sqlx::query_as("SELECT first_name, phone_number FROM guardians")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(stored_first_name, "Guardian");
    assert_eq!(stored_phone, guardian_phone);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_guardian_created_under_existing_user(pool: PgPool) {
    let guardian_email = unique_email();

    // An account exists for the guardian email but owns no guardian yet.
    let (status, user_body) = send_json(
        setup_test_app(pool.clone()),
        "POST",
        "/api/users",
        &json!({
            "first_name": "Existing",
            "last_name": "Account",
            "email": guardian_email,
            "password": "accountpass"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let payload = student_payload(&unique_email(), &unique_phone(), &guardian_email, &unique_phone());
    let (status, _) =
        send_json(setup_test_app(pool.clone()), "POST", "/api/students", &payload).await;
    assert_eq!(status, StatusCode::CREATED);

    // Only the student's user was added; the guardian reused the account.
    assert_eq!(count_rows(&pool, "users").await, 2);
    assert_eq!(count_rows(&pool, "guardians").await, 1);

    let guardian_user_id: Uuid = sqlx::query_scalar("SELECT user_id FROM guardians")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(guardian_user_id.to_string(), user_body["data"]["id"].as_str().unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_validation_failure_leaves_store_unchanged(pool: PgPool) {
    let mut payload =
        student_payload(&unique_email(), &unique_phone(), &unique_email(), &unique_phone());
    payload["password"] = json!("short");
    payload["date_of_birth"] = json!("2999-01-01");
    payload["guardian_email"] = json!("not-an-email");

    let (status, body) =
        send_json(setup_test_app(pool.clone()), "POST", "/api/students", &payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    // Every violation is reported, not just the first.
    assert!(body["error"]["password"].is_array());
    assert!(body["error"]["date_of_birth"].is_array());
    assert!(body["error"]["guardian_email"].is_array());

    assert_eq!(count_rows(&pool, "users").await, 0);
    assert_eq!(count_rows(&pool, "guardians").await, 0);
    assert_eq!(count_rows(&pool, "students").await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_student_email_rejected(pool: PgPool) {
    let email = unique_email();
    let (status, _) = send_json(
        setup_test_app(pool.clone()),
        "POST",
        "/api/users",
        &json!({
            "first_name": "Taken",
            "last_name": "Email",
            "email": email,
            "password": "accountpass"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let payload = student_payload(&email, &unique_phone(), &unique_email(), &unique_phone());
    let (status, body) =
        send_json(setup_test_app(pool.clone()), "POST", "/api/students", &payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["email"].is_array());
    assert_eq!(count_rows(&pool, "users").await, 1);
    assert_eq!(count_rows(&pool, "students").await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_guardian_phone_conflict_for_fresh_guardian(pool: PgPool) {
    let guardian_phone = unique_phone();

    let first =
        student_payload(&unique_email(), &unique_phone(), &unique_email(), &guardian_phone);
    let (status, _) =
        send_json(setup_test_app(pool.clone()), "POST", "/api/students", &first).await;
    assert_eq!(status, StatusCode::CREATED);

    // Different guardian email but a phone that an existing guardian holds.
    let second =
        student_payload(&unique_email(), &unique_phone(), &unique_email(), &guardian_phone);
    let (status, body) =
        send_json(setup_test_app(pool.clone()), "POST", "/api/students", &second).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["guardian_phone_number"].is_array());
    assert_eq!(count_rows(&pool, "guardians").await, 1);
    assert_eq!(count_rows(&pool, "students").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_student(pool: PgPool) {
    let payload =
        student_payload(&unique_email(), &unique_phone(), &unique_email(), &unique_phone());
    let (_, created) =
        send_json(setup_test_app(pool.clone()), "POST", "/api/students", &payload).await;
    let id = created["data"]["id"].as_str().unwrap();

    let (status, body) = send_empty(
        setup_test_app(pool.clone()),
        "GET",
        &format!("/api/students/{}", id),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], created["data"]["id"]);
    assert_eq!(body["data"]["user"]["id"], created["data"]["user"]["id"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_student_not_found(pool: PgPool) {
    let (status, body) = send_empty(
        setup_test_app(pool.clone()),
        "GET",
        &format!("/api/students/{}", Uuid::new_v4()),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_patch_address_only(pool: PgPool) {
    let student_email = unique_email();
    let payload =
        student_payload(&student_email, &unique_phone(), &unique_email(), &unique_phone());
    let (_, created) =
        send_json(setup_test_app(pool.clone()), "POST", "/api/students", &payload).await;
    let id = created["data"]["id"].as_str().unwrap();

    let (status, body) = send_json(
        setup_test_app(pool.clone()),
        "PATCH",
        &format!("/api/students/{}", id),
        &json!({ "address": "2 New Street" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["address"], "2 New Street");
    assert_eq!(body["data"]["first_name"], "Student");
    assert_eq!(body["data"]["user"]["email"], student_email);
    assert_eq!(body["data"]["user"]["name"], "Student Test");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_patch_email_propagates_to_user(pool: PgPool) {
    let payload =
        student_payload(&unique_email(), &unique_phone(), &unique_email(), &unique_phone());
    let (_, created) =
        send_json(setup_test_app(pool.clone()), "POST", "/api/students", &payload).await;
    let id = created["data"]["id"].as_str().unwrap();

    let new_email = unique_email();
    let (status, body) = send_json(
        setup_test_app(pool.clone()),
        "PATCH",
        &format!("/api/students/{}", id),
        &json!({ "email": new_email, "first_name": "Renamed" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["first_name"], "Renamed");
    assert_eq!(body["data"]["user"]["email"], new_email);
    // Display name is recomputed from the merged first and last names.
    assert_eq!(body["data"]["user"]["name"], "Renamed Test");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_patch_rejects_future_birth_date(pool: PgPool) {
    let payload =
        student_payload(&unique_email(), &unique_phone(), &unique_email(), &unique_phone());
    let (_, created) =
        send_json(setup_test_app(pool.clone()), "POST", "/api/students", &payload).await;
    let id = created["data"]["id"].as_str().unwrap();

    let (status, body) = send_json(
        setup_test_app(pool.clone()),
        "PATCH",
        &format!("/api/students/{}", id),
        &json!({ "date_of_birth": "2999-01-01" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["date_of_birth"].is_array());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_student_removes_owned_user(pool: PgPool) {
    let payload =
        student_payload(&unique_email(), &unique_phone(), &unique_email(), &unique_phone());
    let (_, created) =
        send_json(setup_test_app(pool.clone()), "POST", "/api/students", &payload).await;
    let id = created["data"]["id"].as_str().unwrap();
    assert_eq!(count_rows(&pool, "users").await, 2);

    let (status, body) = send_empty(
        setup_test_app(pool.clone()),
        "DELETE",
        &format!("/api/students/{}", id),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    // The student and its user are gone; the guardian pair remains.
    assert_eq!(count_rows(&pool, "students").await, 0);
    assert_eq!(count_rows(&pool, "users").await, 1);
    assert_eq!(count_rows(&pool, "guardians").await, 1);

    let (status, _) = send_empty(
        setup_test_app(pool.clone()),
        "GET",
        &format!("/api/students/{}", id),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_student_not_found(pool: PgPool) {
    let (status, _) = send_empty(
        setup_test_app(pool.clone()),
        "DELETE",
        &format!("/api/students/{}", Uuid::new_v4()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
