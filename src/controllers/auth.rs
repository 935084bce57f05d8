use std::borrow::Cow;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateEmail, ValidateLength, ValidationError, ValidationErrors};

use crate::{
    auth::{expired_session_cookie, normalize_email, read_session_token, session_cookie},
    controllers::AppJson,
    error::Error,
    model::User,
    response::{Empty, Envelope},
    state::SharedAppState,
};

const CREDENTIALS_REQUIRED: &str = "Email and password are required";

fn empty_password() -> SecretString {
    SecretString::from("")
}

fn required(errors: &mut ValidationErrors, email: &str, password: &str) {
    if email.trim().is_empty() || password.is_empty() {
        errors.add(
            "credentials",
            ValidationError::new("required").with_message(Cow::from(CREDENTIALS_REQUIRED)),
        );
    }
}

#[derive(Deserialize)]
pub struct SignUpRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default = "empty_password")]
    pub password: SecretString,
}

impl Validate for SignUpRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let password = self.password.expose_secret();

        required(&mut errors, &self.email, password);
        if !errors.errors().is_empty() {
            return Err(errors);
        }

        let email = normalize_email(&self.email);
        if !email.validate_email() {
            errors.add(
                "email",
                ValidationError::new("email_email")
                    .with_message(Cow::from("Invalid email format")),
            );
        }
        if !email.validate_length(Some(1), Some(255), None) {
            errors.add(
                "email",
                ValidationError::new("email_length")
                    .with_message(Cow::from("Email must be at most 255 characters")),
            );
        }

        if !password.validate_length(Some(6), Some(128), None) {
            errors.add(
                "password",
                ValidationError::new("password_length").with_message(Cow::from(
                    "Password must be between 6 and 128 characters",
                )),
            );
        }

        if !errors.errors().is_empty() {
            return Err(errors);
        }

        Ok(())
    }
}

#[derive(Deserialize)]
pub struct SignInRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default = "empty_password")]
    pub password: SecretString,
}

impl Validate for SignInRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        required(&mut errors, &self.email, self.password.expose_secret());

        if !errors.errors().is_empty() {
            return Err(errors);
        }

        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct UserBody {
    pub user: Option<User>,
}

#[tracing::instrument(name = "[POST] auth/signup", skip_all)]
pub async fn signup(
    State(app_state): State<SharedAppState>,
    AppJson(request): AppJson<SignUpRequest>,
) -> Result<impl IntoResponse, Error> {
    request.validate().map_err(Error::Validation)?;

    let user = app_state
        .credentials
        .sign_up(&request.email, request.password)
        .await?;
    let session = app_state.sessions.create_session(user.id).await?;
    let cookie = session_cookie(&app_state.config.session, session.token())?;

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Envelope::success(UserBody { user: Some(user) }),
    ))
}

#[tracing::instrument(name = "[POST] auth/login", skip_all)]
pub async fn login(
    State(app_state): State<SharedAppState>,
    AppJson(request): AppJson<SignInRequest>,
) -> Result<impl IntoResponse, Error> {
    request.validate().map_err(Error::Validation)?;

    let user = app_state
        .credentials
        .sign_in(&request.email, request.password)
        .await?;
    let session = app_state.sessions.create_session(user.id).await?;
    let cookie = session_cookie(&app_state.config.session, session.token())?;

    tracing::info!(user_id = %user.id, "User signed in");

    Ok((
        [(header::SET_COOKIE, cookie)],
        Envelope::success(UserBody { user: Some(user) }),
    ))
}

#[tracing::instrument(name = "[POST] auth/logout", skip_all)]
pub async fn logout(
    State(app_state): State<SharedAppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, Error> {
    if let Some(token) = read_session_token(&headers, &app_state.config.session.cookie_name) {
        app_state.sessions.destroy_session(&token).await?;
    }

    let cookie = expired_session_cookie(&app_state.config.session)?;

    Ok(([(header::SET_COOKIE, cookie)], Envelope::success(Empty {})))
}

#[tracing::instrument(name = "[GET] auth/me", skip_all)]
pub async fn me(
    State(app_state): State<SharedAppState>,
    headers: HeaderMap,
) -> Result<Envelope<UserBody>, Error> {
    let token = read_session_token(&headers, &app_state.config.session.cookie_name);
    let user = app_state.sessions.current_user(token.as_deref()).await?;

    Ok(Envelope::success(UserBody { user }))
}
