//! Integration tests for registration and the uniqueness backstop

mod support;

use serial_test::serial;

use rental::error::ApiError;
use rental::repositories::UserRepository;
use rental::validation;

use support::{new_user, test_pool};

#[tokio::test]
#[serial]
#[ignore = "requires a running PostgreSQL instance"]
async fn registration_creates_user_and_license_atomically() {
    let pool = test_pool().await;
    let users = UserRepository::new(pool.clone());

    let input = new_user();
    let (user, license) = users.register(&input).await.unwrap();

    assert_eq!(user.username, input.username);
    assert_eq!(license.user_id, user.id);
    assert_eq!(license.license_number, input.license.license_number);
    assert!(!user.is_admin);

    // The stored password is an opaque hash that verifies.
    assert_ne!(user.password_hash, input.password);
    assert!(rental::repositories::user::verify_password(&user, &input.password).unwrap());
}

#[tokio::test]
#[serial]
#[ignore = "requires a running PostgreSQL instance"]
async fn duplicate_email_is_caught_by_the_pre_check() {
    let pool = test_pool().await;
    let users = UserRepository::new(pool.clone());

    let input = new_user();
    users.register(&input).await.unwrap();

    let mut duplicate = new_user();
    duplicate.email = input.email.clone();

    let body: validation::Payload = serde_json::json!({
        "username": duplicate.username,
        "email": duplicate.email,
        "password1": "Sup3r-secret",
        "password2": "Sup3r-secret",
        "license_number": duplicate.license.license_number,
        "date_issued": duplicate.license.date_issued.format("%Y-%m-%d").to_string(),
        "date_expiry": duplicate.license.date_expiry.format("%Y-%m-%d").to_string(),
    })
    .as_object()
    .cloned()
    .unwrap();

    let err = validation::validate_registration(&body, &users)
        .await
        .unwrap_err();
    match err {
        ApiError::RecordAlreadyExists(field) => assert_eq!(field, "email"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
#[serial]
#[ignore = "requires a running PostgreSQL instance"]
async fn duplicate_email_is_caught_by_the_store_constraint() {
    let pool = test_pool().await;
    let users = UserRepository::new(pool.clone());

    let input = new_user();
    users.register(&input).await.unwrap();

    // Bypass the validator entirely; the unique constraint is the backstop
    // and its violation remaps to the same error category.
    let mut duplicate = new_user();
    duplicate.email = input.email.clone();

    let err = users.register(&duplicate).await.unwrap_err();
    match err {
        ApiError::RecordAlreadyExists(field) => assert_eq!(field, "email"),
        other => panic!("unexpected error: {other:?}"),
    }
}
