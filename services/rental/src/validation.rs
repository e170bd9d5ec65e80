//! Request validation pipeline
//!
//! Raw payloads arrive as `serde_json` maps and pass through ordered,
//! short-circuiting stages: field presence, value types, uniqueness against
//! the store, date formats, then domain rules. Each operation has one entry
//! point returning the normalized input struct consumed by the repositories,
//! or the first failure as a typed [`ApiError`].
//!
//! The uniqueness stages are advisory reads that produce friendly errors;
//! the database constraints remain the authoritative check under concurrent
//! writers.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{CarUpdate, LoginCredentials, NewCar, NewLicense, NewReservation, NewUser, UserUpdate};
use crate::repositories::{CarRepository, UserRepository};

/// Raw request payload
pub type Payload = Map<String, Value>;

/// Accepted format for license dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Accepted format for reservation dates
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A license must remain valid for strictly more than this many days
const LICENSE_EXPIRY_MIN_DAYS: i64 = 90;

/// Expected JSON type of a payload field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Str,
    Int,
    Bool,
}

impl FieldType {
    fn name(self) -> &'static str {
        match self {
            FieldType::Str => "string",
            FieldType::Int => "integer",
            FieldType::Bool => "boolean",
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            FieldType::Str => value.is_string(),
            FieldType::Int => value.is_i64() || value.is_u64(),
            FieldType::Bool => value.is_boolean(),
        }
    }
}

/// Presence stage: every mandatory field must appear in the payload
fn require_fields(body: &Payload, mandatory: &[&str]) -> Result<(), ApiError> {
    let missing: Vec<&str> = mandatory
        .iter()
        .copied()
        .filter(|field| !body.contains_key(*field))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ApiError::MissingMandatoryFields(missing.join(", ")))
    }
}

/// Type stage: each present optional field must carry its declared type
fn check_field_types(body: &Payload, fields: &[(&str, FieldType)]) -> Result<(), ApiError> {
    let wrong: Vec<String> = fields
        .iter()
        .filter_map(|(name, ty)| {
            body.get(*name)
                .filter(|value| !value.is_null() && !ty.matches(value))
                .map(|_| format!("{name} should be of type {}", ty.name()))
        })
        .collect();

    if wrong.is_empty() {
        Ok(())
    } else {
        Err(ApiError::WrongType(wrong.join(", ")))
    }
}

fn str_field<'a>(body: &'a Payload, name: &str) -> Result<&'a str, ApiError> {
    body.get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::WrongType(format!("{name} should be of type string")))
}

fn int_field(body: &Payload, name: &str) -> Result<i64, ApiError> {
    body.get(name)
        .and_then(Value::as_i64)
        .ok_or_else(|| ApiError::WrongType(format!("{name} should be of type integer")))
}

fn uuid_field(body: &Payload, name: &str) -> Result<Uuid, ApiError> {
    str_field(body, name)?
        .parse()
        .map_err(|_| ApiError::WrongFormat(format!("{name} is not a valid id")))
}

fn opt_string(body: &Payload, name: &str) -> Option<String> {
    body.get(name).and_then(Value::as_str).map(str::to_string)
}

/// Parse a `YYYY-MM-DD` date field
fn parse_date(value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        ApiError::WrongFormat(format!(
            "Format of datetime is wrong. Accepted format: {DATE_FORMAT}"
        ))
    })
}

/// Parse a `YYYY-MM-DD HH:MM` datetime field
fn parse_datetime(value: &str) -> Result<DateTime<Utc>, ApiError> {
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT)
        .map(|dt| dt.and_utc())
        .map_err(|_| {
            ApiError::WrongFormat(format!(
                "Format of datetime is wrong. Accepted format: {DATETIME_FORMAT}"
            ))
        })
}

/// License numbers are fully alphanumeric with length exactly 9 or 12
fn validate_license_number(number: &str) -> Result<(), ApiError> {
    static LICENSE_NUMBER_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = LICENSE_NUMBER_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9]+$").expect("Failed to compile license number regex")
    });

    if !matches!(number.len(), 9 | 12) || !regex.is_match(number) {
        return Err(ApiError::WrongFormat("License number is not valid".to_string()));
    }

    Ok(())
}

/// A license expiring in 90 days or fewer is not accepted
fn validate_expiry_window(expiry: NaiveDate, today: NaiveDate) -> Result<(), ApiError> {
    if (expiry - today).num_days() <= LICENSE_EXPIRY_MIN_DAYS {
        return Err(ApiError::InputNotAcceptable(
            "License will expire in less than 90 days".to_string(),
        ));
    }

    Ok(())
}

/// Registration passwords must match before any hashing happens
fn check_passwords_match(password1: &str, password2: &str) -> Result<(), ApiError> {
    if password1 != password2 {
        return Err(ApiError::PasswordsNotMatching);
    }

    Ok(())
}

/// Validate a registration payload
pub async fn validate_registration(
    body: &Payload,
    users: &UserRepository,
) -> Result<NewUser, ApiError> {
    require_fields(
        body,
        &[
            "username",
            "email",
            "password1",
            "password2",
            "license_number",
            "date_issued",
            "date_expiry",
        ],
    )?;

    let username = str_field(body, "username")?;
    let email = str_field(body, "email")?;

    check_passwords_match(str_field(body, "password1")?, str_field(body, "password2")?)?;

    if users.email_exists(email).await? {
        return Err(ApiError::RecordAlreadyExists("email".to_string()));
    }
    if users.username_exists(username).await? {
        return Err(ApiError::RecordAlreadyExists("username".to_string()));
    }

    let license_number = str_field(body, "license_number")?;
    validate_license_number(license_number)?;

    let date_issued = parse_date(str_field(body, "date_issued")?)?;
    let date_expiry = parse_date(str_field(body, "date_expiry")?)?;
    validate_expiry_window(date_expiry, Utc::now().date_naive())?;

    if users.license_number_exists(license_number).await? {
        return Err(ApiError::RecordAlreadyExists("license_number".to_string()));
    }

    Ok(NewUser {
        username: username.to_string(),
        email: email.to_string(),
        password: str_field(body, "password1")?.to_string(),
        license: NewLicense {
            license_number: license_number.to_string(),
            date_issued,
            date_expiry,
        },
    })
}

/// Validate a login payload
pub fn validate_login(body: &Payload) -> Result<LoginCredentials, ApiError> {
    require_fields(body, &["username", "password"])?;

    Ok(LoginCredentials {
        username: str_field(body, "username")?.to_string(),
        password: str_field(body, "password")?.to_string(),
    })
}

/// Validate a partial user update
///
/// `is_admin` is only part of the allow-list for admin callers; other
/// callers sending it have the field ignored.
pub async fn validate_user_update(
    body: &Payload,
    caller_is_admin: bool,
    users: &UserRepository,
) -> Result<UserUpdate, ApiError> {
    let mut fields = vec![("username", FieldType::Str), ("password", FieldType::Str)];
    if caller_is_admin {
        fields.push(("is_admin", FieldType::Bool));
    }
    check_field_types(body, &fields)?;

    if let Some(username) = body.get("username").and_then(Value::as_str) {
        if users.username_exists(username).await? {
            return Err(ApiError::RecordAlreadyExists("username".to_string()));
        }
    }

    Ok(UserUpdate {
        username: opt_string(body, "username"),
        password: opt_string(body, "password"),
        is_admin: caller_is_admin
            .then(|| body.get("is_admin").and_then(Value::as_bool))
            .flatten(),
    })
}

/// Validate a car creation payload
pub async fn validate_new_car(body: &Payload, cars: &CarRepository) -> Result<NewCar, ApiError> {
    require_fields(
        body,
        &[
            "license_plate",
            "company",
            "model",
            "fabrication_year",
            "number_of_seats",
        ],
    )?;

    let license_plate = str_field(body, "license_plate")?;
    if cars.plate_exists(license_plate).await? {
        return Err(ApiError::RecordAlreadyExists("license_plate".to_string()));
    }

    Ok(NewCar {
        license_plate: license_plate.to_string(),
        company: str_field(body, "company")?.to_string(),
        model: str_field(body, "model")?.to_string(),
        fabrication_year: str_field(body, "fabrication_year")?.to_string(),
        number_of_seats: int_field(body, "number_of_seats")? as i32,
    })
}

/// Validate a partial car update
///
/// `is_available` here is the explicit admin override; every other
/// availability change goes through the reservation lifecycle.
pub async fn validate_car_update(
    body: &Payload,
    cars: &CarRepository,
) -> Result<CarUpdate, ApiError> {
    check_field_types(
        body,
        &[
            ("license_plate", FieldType::Str),
            ("company", FieldType::Str),
            ("model", FieldType::Str),
            ("fabrication_year", FieldType::Str),
            ("number_of_seats", FieldType::Int),
            ("is_available", FieldType::Bool),
        ],
    )?;

    if let Some(plate) = body.get("license_plate").and_then(Value::as_str) {
        if cars.plate_exists(plate).await? {
            return Err(ApiError::RecordAlreadyExists("license_plate".to_string()));
        }
    }

    Ok(CarUpdate {
        license_plate: opt_string(body, "license_plate"),
        company: opt_string(body, "company"),
        model: opt_string(body, "model"),
        fabrication_year: opt_string(body, "fabrication_year"),
        number_of_seats: body
            .get("number_of_seats")
            .and_then(Value::as_i64)
            .map(|n| n as i32),
        is_available: body.get("is_available").and_then(Value::as_bool),
    })
}

/// Validate a booking payload
pub async fn validate_new_reservation(
    body: &Payload,
    cars: &CarRepository,
) -> Result<NewReservation, ApiError> {
    require_fields(
        body,
        &["car_id", "reservation_start_date", "reservation_end_date"],
    )?;

    let car_id = uuid_field(body, "car_id")?;
    if !cars.exists(car_id).await? {
        return Err(ApiError::RecordNotFound(format!("Car {car_id}")));
    }

    Ok(NewReservation {
        car_id,
        reservation_start_date: parse_datetime(str_field(body, "reservation_start_date")?)?,
        reservation_end_date: parse_datetime(str_field(body, "reservation_end_date")?)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(fields: &[(&str, Value)]) -> Payload {
        fields
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_require_fields_enumerates_missing() {
        let body = payload(&[("username", Value::String("chouaib".into()))]);
        let err = require_fields(&body, &["username", "email", "password1"]).unwrap_err();
        match err {
            ApiError::MissingMandatoryFields(fields) => {
                assert_eq!(fields, "email, password1");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_check_field_types_flags_mismatches() {
        let body = payload(&[
            ("username", Value::Bool(true)),
            ("password", Value::String("secret".into())),
        ]);
        let err = check_field_types(
            &body,
            &[("username", FieldType::Str), ("password", FieldType::Str)],
        )
        .unwrap_err();
        match err {
            ApiError::WrongType(msg) => assert!(msg.contains("username should be of type string")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_check_field_types_ignores_absent_and_null() {
        let body = payload(&[("username", Value::Null)]);
        assert!(
            check_field_types(
                &body,
                &[("username", FieldType::Str), ("is_admin", FieldType::Bool)]
            )
            .is_ok()
        );
    }

    #[test]
    fn test_license_number_lengths() {
        // 9 and 12 alphanumeric characters are the only accepted shapes
        assert!(validate_license_number("AB1234567").is_ok());
        assert!(validate_license_number("AB1234567890").is_ok());
        assert!(validate_license_number("AB12345678").is_err()); // 10 chars
        assert!(validate_license_number("AB-123456789").is_err()); // hyphen, 12 chars
        assert!(validate_license_number("").is_err());
    }

    #[test]
    fn test_expiry_window_boundary() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let at_90 = today + chrono::Duration::days(90);
        let at_91 = today + chrono::Duration::days(91);

        assert!(validate_expiry_window(at_90, today).is_err());
        assert!(validate_expiry_window(at_91, today).is_ok());
    }

    #[test]
    fn test_date_formats() {
        assert!(parse_date("2026-08-31").is_ok());
        assert!(parse_date("31-08-2026").is_err());
        assert!(parse_date("2026-08-31 10:30").is_err());

        assert!(parse_datetime("2026-08-31 10:30").is_ok());
        assert!(parse_datetime("2026-08-31").is_err());
    }

    #[test]
    fn test_passwords_must_match() {
        assert!(check_passwords_match("secret", "secret").is_ok());
        assert!(matches!(
            check_passwords_match("secret", "other"),
            Err(ApiError::PasswordsNotMatching)
        ));
    }

    #[test]
    fn test_validate_login() {
        let body = payload(&[
            ("username", Value::String("chouaib".into())),
            ("password", Value::String("secret".into())),
        ]);
        let credentials = validate_login(&body).unwrap();
        assert_eq!(credentials.username, "chouaib");
        assert_eq!(credentials.password, "secret");

        let err = validate_login(&payload(&[])).unwrap_err();
        assert!(matches!(err, ApiError::MissingMandatoryFields(_)));
    }

    #[test]
    fn test_uuid_field_rejects_garbage() {
        let body = payload(&[("car_id", Value::String("not-a-uuid".into()))]);
        assert!(matches!(
            uuid_field(&body, "car_id"),
            Err(ApiError::WrongFormat(_))
        ));
    }
}
