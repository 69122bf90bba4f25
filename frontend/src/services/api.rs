use async_trait::async_trait;
use gloo::net::http::{Request, Response};
use shared::api::{
    email_status_reply, save_profile_reply, sign_in_reply, CHECK_EMAIL_PATH, SIGN_IN_PATH,
};
use shared::{
    AccountsApi, ApiError, ApiOperation, CheckEmailRequest, EmailStatus, HttpMethod, Profile,
    ProfileSaveRequest, SignInRequest,
};
use web_sys::RequestCredentials;

/// Everything needed to issue one backend call
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: HttpMethod,
    pub url: String,
    /// Send the session cookie along
    pub include_credentials: bool,
    pub accept_json: bool,
    pub body: serde_json::Value,
}

/// API client for communicating with the backend server
#[derive(Clone, PartialEq)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    /// Create a new API client with a custom base URL
    pub fn with_base_url(base_url: String) -> Self {
        Self { base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn check_email_spec(&self, request: &CheckEmailRequest) -> Result<RequestSpec, ApiError> {
        Ok(RequestSpec {
            method: HttpMethod::Post,
            url: self.url(CHECK_EMAIL_PATH),
            include_credentials: false,
            accept_json: false,
            body: to_body(request)?,
        })
    }

    pub fn sign_in_spec(&self, request: &SignInRequest) -> Result<RequestSpec, ApiError> {
        Ok(RequestSpec {
            method: HttpMethod::Post,
            url: self.url(SIGN_IN_PATH),
            include_credentials: true,
            accept_json: true,
            body: to_body(request)?,
        })
    }

    pub fn save_profile_spec(&self, request: &ProfileSaveRequest) -> Result<RequestSpec, ApiError> {
        Ok(RequestSpec {
            method: request.target.method(),
            url: self.url(&request.target.path()),
            include_credentials: true,
            accept_json: false,
            body: to_body(&request.payload)?,
        })
    }

    async fn send(operation: ApiOperation, spec: RequestSpec) -> Result<Response, ApiError> {
        let mut builder = match spec.method {
            HttpMethod::Post => Request::post(&spec.url),
            HttpMethod::Put => Request::put(&spec.url),
        };
        if spec.accept_json {
            builder = builder.header("Accept", "application/json");
        }
        if spec.include_credentials {
            builder = builder.credentials(RequestCredentials::Include);
        }
        builder
            .json(&spec.body)
            .map_err(|e| ApiError::Serialization(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network {
                operation,
                detail: e.to_string(),
            })
    }

    /// Status and body text; an unreadable body reads as empty
    async fn reply(response: Response) -> (u16, String) {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        (status, body)
    }
}

fn to_body<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Serialization(e.to_string()))
}

#[async_trait(?Send)]
impl AccountsApi for ApiClient {
    async fn check_email(&self, request: &CheckEmailRequest) -> Result<EmailStatus, ApiError> {
        let response = Self::send(ApiOperation::CheckEmail, self.check_email_spec(request)?).await?;
        email_status_reply(response.status())
    }

    async fn sign_in(&self, request: &SignInRequest) -> Result<Profile, ApiError> {
        let response = Self::send(ApiOperation::SignIn, self.sign_in_spec(request)?).await?;
        let (status, body) = Self::reply(response).await;
        sign_in_reply(status, &body)
    }

    async fn save_profile(&self, request: &ProfileSaveRequest) -> Result<Profile, ApiError> {
        let response = Self::send(ApiOperation::SaveProfile, self.save_profile_spec(request)?).await?;
        let (status, body) = Self::reply(response).await;
        save_profile_reply(request, status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::{Gender, LookingFor, ProfilePayload, SaveTarget};
    use wasm_bindgen_test::*;

    fn client() -> ApiClient {
        ApiClient::with_base_url("http://api.test".to_string())
    }

    fn save_request(target: SaveTarget) -> ProfileSaveRequest {
        ProfileSaveRequest {
            target,
            payload: ProfilePayload {
                name: "Jamie".to_string(),
                age: 27.0,
                gender: Gender::Other,
                bio: "Runner".to_string(),
                location: "Oslo".to_string(),
                looking_for: LookingFor::Relationship,
            },
        }
    }

    #[wasm_bindgen_test]
    fn test_check_email_spec() {
        let spec = client()
            .check_email_spec(&CheckEmailRequest { email: "a@b.com".to_string() })
            .unwrap();

        assert_eq!(spec.method, HttpMethod::Post);
        assert_eq!(spec.url, "http://api.test/api/check-email");
        assert!(!spec.include_credentials);
        assert_eq!(spec.body, json!({"email": "a@b.com"}));
    }

    #[wasm_bindgen_test]
    fn test_sign_in_spec_sends_credentials_and_accepts_json() {
        let spec = client()
            .sign_in_spec(&SignInRequest {
                email: "a@b.com".to_string(),
                password: "pw".to_string(),
                confirm_password: String::new(),
            })
            .unwrap();

        assert_eq!(spec.method, HttpMethod::Post);
        assert_eq!(spec.url, "http://api.test/api/signin");
        assert!(spec.include_credentials);
        assert!(spec.accept_json);
        assert_eq!(
            spec.body,
            json!({"email": "a@b.com", "password": "pw", "confirmPassword": ""})
        );
    }

    #[wasm_bindgen_test]
    fn test_save_profile_spec_picks_method_by_target() {
        let create = client().save_profile_spec(&save_request(SaveTarget::Create)).unwrap();
        assert_eq!(create.method, HttpMethod::Post);
        assert_eq!(create.url, "http://api.test/api/profiles");
        assert!(create.include_credentials);
        assert_eq!(create.body["age"], json!(27));
        assert_eq!(create.body["lookingFor"], json!("relationship"));

        let update = client()
            .save_profile_spec(&save_request(SaveTarget::Update { id: "abc".to_string() }))
            .unwrap();
        assert_eq!(update.method, HttpMethod::Put);
        assert_eq!(update.url, "http://api.test/api/profiles/abc");
        assert!(update.include_credentials);
        assert_eq!(update.body, create.body);
    }
}
