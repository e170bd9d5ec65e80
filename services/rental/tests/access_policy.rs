//! Integration tests for the access policy gate
//!
//! These drive the real router against live PostgreSQL and Redis instances
//! and verify the three tiers: anonymous callers are turned away, admin
//! routes reject plain sessions, and ownership rules make foreign records
//! read as absent.

mod support;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::Value;
use serial_test::serial;
use tower::util::ServiceExt;

use rental::routes::create_router;

use support::{booking, create_car, create_user, session_token, test_state};

const MAX_BODY_SIZE: usize = 64 * 1024;

/// Send one request through the router and decode the JSON envelope
async fn send(app: Router, method: Method, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder.body(Body::empty()).unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), MAX_BODY_SIZE)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, body)
}

#[tokio::test]
#[serial]
#[ignore = "requires running PostgreSQL and Redis instances"]
async fn requests_without_a_live_session_are_unauthorized() {
    let state = test_state().await;
    let app = create_router(state);

    let (status, body) = send(app.clone(), Method::GET, "/cars", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unauthorized");
    assert_eq!(body["data"], Value::Null);

    // A token that never came out of a login resolves to no session.
    let (status, _) = send(app, Method::GET, "/cars", Some("not-a-real-token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[serial]
#[ignore = "requires running PostgreSQL and Redis instances"]
async fn admin_routes_reject_plain_sessions() {
    let state = test_state().await;
    let user = create_user(&state.db_pool).await;
    let user_token = session_token(&state, user.id, false).await;
    let admin_token = session_token(&state, user.id, true).await;
    let app = create_router(state);

    let (status, body) = send(app.clone(), Method::GET, "/users", Some(&user_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access to this resource is denied");

    let (status, _) = send(app, Method::GET, "/users", Some(&admin_token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
#[serial]
#[ignore = "requires running PostgreSQL and Redis instances"]
async fn foreign_reservations_read_as_absent() {
    let state = test_state().await;
    let owner = create_user(&state.db_pool).await;
    let other = create_user(&state.db_pool).await;
    let car = create_car(&state.db_pool).await;

    let reservation = state
        .reservations
        .book(owner.id, &booking(car.id))
        .await
        .unwrap();

    let owner_token = session_token(&state, owner.id, false).await;
    let other_token = session_token(&state, other.id, false).await;
    let admin_token = session_token(&state, other.id, true).await;
    let app = create_router(state);

    let uri = format!("/reservations/{}", reservation.id);

    let (status, _) = send(app.clone(), Method::GET, &uri, Some(&owner_token)).await;
    assert_eq!(status, StatusCode::OK);

    // The existence of someone else's reservation must not leak as a 403.
    let (status, body) = send(app.clone(), Method::GET, &uri, Some(&other_token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["message"],
        format!("Reservation {} not found", reservation.id)
    );

    let (status, _) = send(app, Method::GET, &uri, Some(&admin_token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
#[serial]
#[ignore = "requires running PostgreSQL and Redis instances"]
async fn car_listing_hides_unavailable_cars_from_plain_sessions() {
    let state = test_state().await;
    let user = create_user(&state.db_pool).await;
    let user_token = session_token(&state, user.id, false).await;
    let admin_token = session_token(&state, user.id, true).await;
    let app = create_router(state.clone());

    let (status, before_user) = send(app.clone(), Method::GET, "/cars", Some(&user_token)).await;
    assert_eq!(status, StatusCode::OK);
    let (_, before_admin) = send(app.clone(), Method::GET, "/cars", Some(&admin_token)).await;

    // Booking the fresh car flips it to unavailable straight away.
    let car = create_car(&state.db_pool).await;
    state
        .reservations
        .book(user.id, &booking(car.id))
        .await
        .unwrap();

    let (_, after_user) = send(app.clone(), Method::GET, "/cars", Some(&user_token)).await;
    let (_, after_admin) = send(app, Method::GET, "/cars", Some(&admin_token)).await;

    assert_eq!(
        after_user["data"]["count"].as_i64(),
        before_user["data"]["count"].as_i64(),
    );
    assert_eq!(
        after_admin["data"]["count"].as_i64(),
        before_admin["data"]["count"].as_i64().map(|count| count + 1),
    );
}
