use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use confab_db::Database;
use confab_types::api::{Claims, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};

use crate::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
}

/// Registration takes the password twice; a mismatch fails before anything
/// is written. Email is the login identity — there is no username.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_registration(&req)?;

    if state.db.get_user_by_email(&req.email)?.is_some() {
        return Err(ApiError::Conflict(format!(
            "email {:?} is already registered",
            req.email
        )));
    }

    let password_hash = hash_password(&req.password1)?;
    let user_id = Uuid::new_v4();

    state.db.create_user(
        &user_id.to_string(),
        &req.email,
        &password_hash,
        &req.name,
        &req.given_names,
        req.company.as_deref(),
        req.phone.as_deref(),
    )?;

    let token = create_token(&state.jwt_secret, user_id, &req.email)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse { user_id, token }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .db
        .get_user_by_email(&req.email)?
        .ok_or(ApiError::Unauthorized)?;

    if !verify_password(&req.password, &user.password) {
        return Err(ApiError::Unauthorized);
    }

    let user_id: Uuid = user
        .id
        .parse()
        .map_err(|_| ApiError::Internal("corrupt user id".into()))?;

    let token = create_token(&state.jwt_secret, user_id, &user.email)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(LoginResponse {
        user_id,
        email: user.email,
        token,
    }))
}

pub(crate) fn validate_registration(req: &RegisterRequest) -> Result<(), ApiError> {
    if req.password1 != req.password2 {
        return Err(ApiError::validation("password2", "passwords do not match"));
    }
    Ok(())
}

pub(crate) fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))
}

pub(crate) fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

fn create_token(secret: &str, user_id: Uuid, email: &str) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::days(30)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(password1: &str, password2: &str) -> RegisterRequest {
        RegisterRequest {
            email: "a@x.com".into(),
            password1: password1.into(),
            password2: password2.into(),
            name: "Doe".into(),
            given_names: "Jane".into(),
            company: None,
            phone: None,
        }
    }

    #[test]
    fn mismatched_passwords_fail_validation() {
        let err = validate_registration(&request("p1", "p2")).unwrap_err();
        match err {
            ApiError::Validation { field, .. } => assert_eq!(field, "password2"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn matching_passwords_pass_validation() {
        assert!(validate_registration(&request("p1", "p1")).is_ok());
    }

    #[test]
    fn password_hash_verifies_and_is_not_plaintext() {
        let hash = hash_password("p1").unwrap();
        assert_ne!(hash, "p1");
        assert!(!hash.contains("p1"));
        assert!(verify_password("p1", &hash));
        assert!(!verify_password("p2", &hash));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("p1", "not-a-phc-string"));
    }

    fn test_state() -> AppState {
        Arc::new(AppStateInner {
            db: Database::open_in_memory().unwrap(),
            jwt_secret: "test-secret".into(),
        })
    }

    #[tokio::test]
    async fn register_with_mismatched_passwords_creates_no_user() {
        let state = test_state();

        let err = register(State(state.clone()), Json(request("p1", "p2")))
            .await
            .err()
            .expect("registration should fail");
        match err {
            ApiError::Validation { field, .. } => assert_eq!(field, "password2"),
            other => panic!("expected validation error, got {other:?}"),
        }

        assert!(state.db.get_user_by_email("a@x.com").unwrap().is_none());
    }

    #[tokio::test]
    async fn register_persists_one_user_with_verifiable_hash() {
        let state = test_state();

        assert!(
            register(State(state.clone()), Json(request("p1", "p1")))
                .await
                .is_ok()
        );

        let row = state.db.get_user_by_email("a@x.com").unwrap().unwrap();
        assert_eq!(row.email, "a@x.com");
        assert_ne!(row.password, "p1"); // never stored in plain text
        assert!(verify_password("p1", &row.password));

        // Same email again is a conflict, and the table keeps one row.
        let err = register(State(state.clone()), Json(request("p1", "p1")))
            .await
            .err()
            .expect("duplicate registration should fail");
        assert!(matches!(err, ApiError::Conflict(_)), "got {err:?}");
    }
}
