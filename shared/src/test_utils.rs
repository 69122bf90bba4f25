//! Recording fakes for exercising the flows without a browser.

use std::cell::RefCell;

use async_trait::async_trait;

use crate::api::{AccountsApi, ApiError, CheckEmailRequest, EmailStatus, SignInRequest};
use crate::ports::{Navigator, Notification, Notifier, ProfileStorage, Screen, StorageError};
use crate::profile::Profile;
use crate::profile_editor::ProfileSaveRequest;

pub fn profile(value: serde_json::Value) -> Profile {
    Profile::from_value(value).expect("test profile must be an object")
}

/// Backend double answering with canned results and recording requests
pub struct FakeAccountsApi {
    pub check_email_result: RefCell<Result<EmailStatus, ApiError>>,
    pub sign_in_result: RefCell<Result<Profile, ApiError>>,
    pub save_result: RefCell<Result<Profile, ApiError>>,
    pub check_email_requests: RefCell<Vec<CheckEmailRequest>>,
    pub sign_in_requests: RefCell<Vec<SignInRequest>>,
    pub save_requests: RefCell<Vec<ProfileSaveRequest>>,
    /// Runs while a request is "in flight", before the result is returned
    pub during_request: RefCell<Option<Box<dyn Fn()>>>,
}

impl FakeAccountsApi {
    pub fn new() -> Self {
        Self {
            check_email_result: RefCell::new(Ok(EmailStatus::Exists)),
            sign_in_result: RefCell::new(Ok(profile(serde_json::json!({"id": "p1"})))),
            save_result: RefCell::new(Ok(profile(serde_json::json!({"id": "p1"})))),
            check_email_requests: RefCell::new(Vec::new()),
            sign_in_requests: RefCell::new(Vec::new()),
            save_requests: RefCell::new(Vec::new()),
            during_request: RefCell::new(None),
        }
    }

    pub fn request_count(&self) -> usize {
        self.check_email_requests.borrow().len()
            + self.sign_in_requests.borrow().len()
            + self.save_requests.borrow().len()
    }

    fn in_flight(&self) {
        if let Some(hook) = self.during_request.borrow().as_ref() {
            hook();
        }
    }
}

#[async_trait(?Send)]
impl AccountsApi for FakeAccountsApi {
    async fn check_email(&self, request: &CheckEmailRequest) -> Result<EmailStatus, ApiError> {
        self.check_email_requests.borrow_mut().push(request.clone());
        self.in_flight();
        self.check_email_result.borrow().clone()
    }

    async fn sign_in(&self, request: &SignInRequest) -> Result<Profile, ApiError> {
        self.sign_in_requests.borrow_mut().push(request.clone());
        self.in_flight();
        self.sign_in_result.borrow().clone()
    }

    async fn save_profile(&self, request: &ProfileSaveRequest) -> Result<Profile, ApiError> {
        self.save_requests.borrow_mut().push(request.clone());
        self.in_flight();
        self.save_result.borrow().clone()
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub notifications: RefCell<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn last(&self) -> Option<Notification> {
        self.notifications.borrow().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.borrow_mut().push(notification);
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    pub screens: RefCell<Vec<Screen>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, screen: Screen) {
        self.screens.borrow_mut().push(screen);
    }
}

#[derive(Default)]
pub struct MemoryProfileStorage {
    pub saved: RefCell<Option<Profile>>,
    pub fail_writes: bool,
}

impl ProfileStorage for MemoryProfileStorage {
    fn save_profile(&self, profile: &Profile) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Unavailable("quota exceeded".to_string()));
        }
        *self.saved.borrow_mut() = Some(profile.clone());
        Ok(())
    }

    fn load_profile(&self) -> Option<Profile> {
        self.saved.borrow().clone()
    }

    fn clear_profile(&self) {
        self.saved.borrow_mut().take();
    }
}
