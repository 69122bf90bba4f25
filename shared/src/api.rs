use std::rc::Rc;

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::profile::Profile;
use crate::profile_editor::ProfileSaveRequest;

pub const CHECK_EMAIL_PATH: &str = "/api/check-email";
pub const SIGN_IN_PATH: &str = "/api/signin";
pub const PROFILES_PATH: &str = "/api/profiles";

/// Path of a single stored profile
pub fn profile_path(id: &str) -> String {
    format!("{}/{}", PROFILES_PATH, id)
}

/// Request body for the email existence check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckEmailRequest {
    pub email: String,
}

/// Request body for signing in or creating an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Result of the email existence check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailStatus {
    /// An account exists for this email
    Exists,
    /// No account yet; the backend answered 404
    NotFound,
}

impl EmailStatus {
    /// Interpret the HTTP status of a check-email response.
    ///
    /// Returns `None` for anything that is neither a success nor a 404.
    pub fn from_http_status(status: u16) -> Option<Self> {
        match status {
            404 => Some(Self::NotFound),
            200..=299 => Some(Self::Exists),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }
}

/// Backend operations the client performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiOperation {
    CheckEmail,
    SignIn,
    SaveProfile,
}

impl ApiOperation {
    /// Reason shown to the user when the operation fails
    pub fn failure_message(&self) -> &'static str {
        match self {
            ApiOperation::CheckEmail => "Failed to verify email",
            ApiOperation::SignIn => "Failed to sign in",
            ApiOperation::SaveProfile => "Failed to save profile",
        }
    }
}

/// Failures talking to the backend
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The backend answered with a non-success status
    #[error("{} (HTTP {status})", .operation.failure_message())]
    RequestFailed { operation: ApiOperation, status: u16 },
    /// The request never produced a response
    #[error("{}: {detail}", .operation.failure_message())]
    Network { operation: ApiOperation, detail: String },
    /// The response body was not a JSON object
    #[error("Invalid response from server")]
    MalformedResponse,
    #[error("Failed to serialize request: {0}")]
    Serialization(String),
}

/// Parse a response body that must hold a JSON object.
pub fn parse_profile_body(body: &str) -> Result<Profile, ApiError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|_| ApiError::MalformedResponse)?;
    Profile::from_value(value).ok_or(ApiError::MalformedResponse)
}

fn is_success(status: u16) -> bool {
    (200..=299).contains(&status)
}

/// Interpret a check-email reply: 2xx means the account exists, 404 that it does not
pub fn email_status_reply(status: u16) -> Result<EmailStatus, ApiError> {
    EmailStatus::from_http_status(status).ok_or(ApiError::RequestFailed {
        operation: ApiOperation::CheckEmail,
        status,
    })
}

/// Interpret a sign-in reply, which must be a 2xx carrying the profile object
pub fn sign_in_reply(status: u16, body: &str) -> Result<Profile, ApiError> {
    if !is_success(status) {
        return Err(ApiError::RequestFailed {
            operation: ApiOperation::SignIn,
            status,
        });
    }
    parse_profile_body(body)
}

/// Interpret a profile save reply.
///
/// Any 2xx is a success. When the body is not a profile object the saved
/// profile is rebuilt from what was sent.
pub fn save_profile_reply(
    request: &ProfileSaveRequest,
    status: u16,
    body: &str,
) -> Result<Profile, ApiError> {
    if !is_success(status) {
        return Err(ApiError::RequestFailed {
            operation: ApiOperation::SaveProfile,
            status,
        });
    }
    match parse_profile_body(body) {
        Ok(profile) => Ok(profile),
        Err(_) => {
            debug!("Save reply has no profile body; using the submitted fields");
            request.submitted_profile()
        }
    }
}

/// HTTP contract of the accounts backend.
///
/// Futures are not `Send`: the browser client runs on a single thread.
#[async_trait(?Send)]
pub trait AccountsApi {
    async fn check_email(&self, request: &CheckEmailRequest) -> Result<EmailStatus, ApiError>;

    /// Sign in, or create the account when the email was not found
    async fn sign_in(&self, request: &SignInRequest) -> Result<Profile, ApiError>;

    /// Create or update a profile depending on the request target
    async fn save_profile(&self, request: &ProfileSaveRequest) -> Result<Profile, ApiError>;
}

#[async_trait(?Send)]
impl<T: AccountsApi + ?Sized> AccountsApi for Rc<T> {
    async fn check_email(&self, request: &CheckEmailRequest) -> Result<EmailStatus, ApiError> {
        (**self).check_email(request).await
    }

    async fn sign_in(&self, request: &SignInRequest) -> Result<Profile, ApiError> {
        (**self).sign_in(request).await
    }

    async fn save_profile(&self, request: &ProfileSaveRequest) -> Result<Profile, ApiError> {
        (**self).save_profile(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Gender, LookingFor, ProfilePayload};
    use crate::profile_editor::SaveTarget;

    #[test]
    fn test_email_status_from_http_status() {
        assert_eq!(EmailStatus::from_http_status(200), Some(EmailStatus::Exists));
        assert_eq!(EmailStatus::from_http_status(204), Some(EmailStatus::Exists));
        assert_eq!(EmailStatus::from_http_status(404), Some(EmailStatus::NotFound));
        assert_eq!(EmailStatus::from_http_status(500), None);
        assert_eq!(EmailStatus::from_http_status(401), None);
        assert_eq!(EmailStatus::from_http_status(302), None);
    }

    #[test]
    fn test_sign_in_request_uses_camel_case() {
        let request = SignInRequest {
            email: "a@b.com".to_string(),
            password: "pw".to_string(),
            confirm_password: String::new(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"email": "a@b.com", "password": "pw", "confirmPassword": ""})
        );
    }

    #[test]
    fn test_parse_profile_body() {
        let profile = parse_profile_body(r#"{"id": 7, "name": "Sam"}"#).unwrap();
        assert_eq!(profile.id().as_deref(), Some("7"));

        assert_eq!(parse_profile_body("null"), Err(ApiError::MalformedResponse));
        assert_eq!(parse_profile_body("[1, 2]"), Err(ApiError::MalformedResponse));
        assert_eq!(parse_profile_body("\"ok\""), Err(ApiError::MalformedResponse));
        assert_eq!(parse_profile_body("<html>"), Err(ApiError::MalformedResponse));
    }

    #[test]
    fn test_error_messages() {
        let err = ApiError::RequestFailed { operation: ApiOperation::SignIn, status: 401 };
        assert_eq!(err.to_string(), "Failed to sign in (HTTP 401)");

        let err = ApiError::Network {
            operation: ApiOperation::CheckEmail,
            detail: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to verify email: connection refused");

        assert_eq!(ApiError::MalformedResponse.to_string(), "Invalid response from server");
    }

    #[test]
    fn test_email_status_reply() {
        assert_eq!(email_status_reply(200), Ok(EmailStatus::Exists));
        assert_eq!(email_status_reply(404), Ok(EmailStatus::NotFound));
        assert_eq!(
            email_status_reply(503),
            Err(ApiError::RequestFailed { operation: ApiOperation::CheckEmail, status: 503 })
        );
    }

    #[test]
    fn test_sign_in_reply_requires_success_and_profile_body() {
        let profile = sign_in_reply(200, r#"{"id": "u1", "email": "a@b.com"}"#).unwrap();
        assert_eq!(profile.id().as_deref(), Some("u1"));

        assert_eq!(
            sign_in_reply(401, r#"{"id": "u1"}"#),
            Err(ApiError::RequestFailed { operation: ApiOperation::SignIn, status: 401 })
        );
        assert_eq!(sign_in_reply(200, ""), Err(ApiError::MalformedResponse));
    }

    #[test]
    fn test_save_profile_reply() {
        let request = ProfileSaveRequest {
            target: SaveTarget::Update { id: "abc".to_string() },
            payload: ProfilePayload {
                name: "Ana".to_string(),
                age: 31.0,
                gender: Gender::Female,
                bio: "Climber".to_string(),
                location: "Lisbon".to_string(),
                looking_for: LookingFor::Dating,
            },
        };

        let saved = save_profile_reply(&request, 200, r#"{"id": "abc", "name": "Server"}"#).unwrap();
        assert_eq!(saved.name().as_deref(), Some("Server"));

        // A bare 2xx still counts as saved
        let saved = save_profile_reply(&request, 204, "").unwrap();
        assert_eq!(saved.id().as_deref(), Some("abc"));
        assert_eq!(saved.name().as_deref(), Some("Ana"));
        assert_eq!(saved.as_map()["age"], serde_json::json!(31));
        assert_eq!(saved.as_map()["lookingFor"], serde_json::json!("dating"));

        let saved = save_profile_reply(&request, 201, "\"ok\"").unwrap();
        assert_eq!(saved.id().as_deref(), Some("abc"));

        assert_eq!(
            save_profile_reply(&request, 500, ""),
            Err(ApiError::RequestFailed { operation: ApiOperation::SaveProfile, status: 500 })
        );
    }

    #[test]
    fn test_profile_path() {
        assert_eq!(profile_path("abc"), "/api/profiles/abc");
    }
}
