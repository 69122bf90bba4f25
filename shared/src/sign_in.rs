//! Two-phase sign-in: check the email, then submit the password.
//!
//! ```text
//! EmailEntry --404--> EmailVerified(CreateAccount)
//! EmailEntry --2xx--> EmailVerified(SignIn)
//! EmailVerified(_) --edit email--> EmailEntry
//! EmailVerified(_) --sign-in ok--> navigate away
//! ```
//!
//! Failures keep the current step and everything the user typed.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, error, info, warn};
use thiserror::Error;

use crate::api::{AccountsApi, ApiError, CheckEmailRequest, EmailStatus, SignInRequest};
use crate::config::FlowConfig;
use crate::flow::FlowLifecycle;
use crate::ports::{
    Navigator, Notification, NotificationKind, Notifier, ProfileStorage, ProfileStore, Screen,
};

/// Password sub-mode chosen by the email check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountMode {
    SignIn,
    CreateAccount,
}

impl AccountMode {
    pub fn heading(&self) -> &'static str {
        match self {
            AccountMode::SignIn => "Sign In",
            AccountMode::CreateAccount => "Create Account",
        }
    }

    pub fn busy_label(&self) -> &'static str {
        match self {
            AccountMode::SignIn => "Signing in...",
            AccountMode::CreateAccount => "Creating Account...",
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            AccountMode::SignIn => "Signed in successfully!",
            AccountMode::CreateAccount => "Account created successfully!",
        }
    }

    /// New accounts set up their profile; returning users go to matching
    pub fn destination(&self) -> Screen {
        match self {
            AccountMode::SignIn => Screen::Waiting,
            AccountMode::CreateAccount => Screen::Profile,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignInStep {
    EmailEntry,
    EmailVerified(AccountMode),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Why a sign-in action was not dispatched
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignInRejection {
    #[error("A request is already in progress")]
    Busy,
    #[error("That action is not available at this step")]
    WrongStep,
    #[error("Email is required")]
    EmailRequired,
    #[error("Password is required")]
    PasswordRequired,
    #[error("Please confirm your password")]
    ConfirmPasswordRequired,
}

impl SignInRejection {
    /// Rejections caused by missing input, which the user should see
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            SignInRejection::EmailRequired
                | SignInRejection::PasswordRequired
                | SignInRejection::ConfirmPasswordRequired
        )
    }
}

/// A dispatched sign-in along with the mode it was made in
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSignIn {
    pub request: SignInRequest,
    pub mode: AccountMode,
}

/// Transient state of the sign-in flow
#[derive(Debug, Clone, PartialEq)]
pub struct SignInSession {
    step: SignInStep,
    credentials: Credentials,
    is_loading: bool,
}

impl Default for SignInSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SignInSession {
    pub fn new() -> Self {
        Self {
            step: SignInStep::EmailEntry,
            credentials: Credentials::default(),
            is_loading: false,
        }
    }

    pub fn step(&self) -> SignInStep {
        self.step
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn email_verified(&self) -> bool {
        matches!(self.step, SignInStep::EmailVerified(_))
    }

    pub fn is_new_account(&self) -> bool {
        self.step == SignInStep::EmailVerified(AccountMode::CreateAccount)
    }

    pub fn heading(&self) -> &'static str {
        match self.step {
            SignInStep::EmailVerified(mode) => mode.heading(),
            SignInStep::EmailEntry => AccountMode::SignIn.heading(),
        }
    }

    pub fn set_email(&mut self, email: &str) {
        self.credentials.email = email.to_string();
    }

    pub fn set_password(&mut self, password: &str) {
        self.credentials.password = password.to_string();
    }

    pub fn set_confirm_password(&mut self, confirm_password: &str) {
        self.credentials.confirm_password = confirm_password.to_string();
    }

    /// Start the email existence check
    pub fn begin_email_check(&mut self) -> Result<CheckEmailRequest, SignInRejection> {
        if self.is_loading {
            return Err(SignInRejection::Busy);
        }
        if self.step != SignInStep::EmailEntry {
            return Err(SignInRejection::WrongStep);
        }
        if self.credentials.email.trim().is_empty() {
            return Err(SignInRejection::EmailRequired);
        }
        self.is_loading = true;
        Ok(CheckEmailRequest {
            email: self.credentials.email.clone(),
        })
    }

    /// Apply the email check result; failures keep the email entry step
    pub fn complete_email_check(&mut self, result: &Result<EmailStatus, ApiError>) {
        self.is_loading = false;
        match result {
            Ok(EmailStatus::NotFound) => {
                self.step = SignInStep::EmailVerified(AccountMode::CreateAccount);
            }
            Ok(EmailStatus::Exists) => {
                self.step = SignInStep::EmailVerified(AccountMode::SignIn);
            }
            Err(_) => {}
        }
    }

    /// Return to email entry, keeping the typed email
    pub fn edit_email(&mut self) -> Result<(), SignInRejection> {
        if self.is_loading {
            return Err(SignInRejection::Busy);
        }
        if self.step == SignInStep::EmailEntry {
            return Err(SignInRejection::WrongStep);
        }
        self.step = SignInStep::EmailEntry;
        Ok(())
    }

    /// Start the sign-in or account creation request.
    ///
    /// The confirmation is required for new accounts but is not compared
    /// with the password.
    pub fn begin_sign_in(&mut self) -> Result<PendingSignIn, SignInRejection> {
        if self.is_loading {
            return Err(SignInRejection::Busy);
        }
        let mode = match self.step {
            SignInStep::EmailVerified(mode) => mode,
            SignInStep::EmailEntry => return Err(SignInRejection::WrongStep),
        };
        if self.credentials.password.is_empty() {
            return Err(SignInRejection::PasswordRequired);
        }
        if mode == AccountMode::CreateAccount && self.credentials.confirm_password.is_empty() {
            return Err(SignInRejection::ConfirmPasswordRequired);
        }
        self.is_loading = true;
        Ok(PendingSignIn {
            request: SignInRequest {
                email: self.credentials.email.clone(),
                password: self.credentials.password.clone(),
                confirm_password: self.credentials.confirm_password.clone(),
            },
            mode,
        })
    }

    pub fn complete_sign_in(&mut self) {
        self.is_loading = false;
    }

    /// Drop an in-flight request whose result is no longer wanted
    pub fn abandon_request(&mut self) {
        self.is_loading = false;
    }

    /// Jump straight to password entry for an existing test account
    pub fn load_test_profile(&mut self, email: &str, password: &str) -> Result<(), SignInRejection> {
        if self.is_loading {
            return Err(SignInRejection::Busy);
        }
        self.credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: String::new(),
        };
        self.step = SignInStep::EmailVerified(AccountMode::SignIn);
        Ok(())
    }
}

/// Pick a candidate from a uniform roll in `[0, 1)`
pub fn pick_test_email(candidates: &[String], roll: f64) -> Option<&str> {
    if candidates.is_empty() {
        return None;
    }
    let index = (roll.clamp(0.0, 1.0) * candidates.len() as f64) as usize;
    candidates
        .get(index.min(candidates.len() - 1))
        .map(String::as_str)
}

/// "alex.thompson@example.com" -> "alex thompson"
pub fn test_profile_display_name(email: &str) -> String {
    let local = email.split('@').next().unwrap_or(email);
    local.replacen('.', " ", 1)
}

/// Collaborators the sign-in flow reports to
#[derive(Clone)]
pub struct SignInServices {
    pub notifier: Rc<dyn Notifier>,
    pub navigator: Rc<dyn Navigator>,
    pub profile_store: Rc<dyn ProfileStore>,
    pub storage: Rc<dyn ProfileStorage>,
}

/// Drives a [`SignInSession`] against the backend
pub struct SignInFlow<A: AccountsApi> {
    api: A,
    services: SignInServices,
    config: FlowConfig,
    session: RefCell<SignInSession>,
    lifecycle: FlowLifecycle,
}

impl<A: AccountsApi> SignInFlow<A> {
    pub fn new(api: A, services: SignInServices, config: FlowConfig) -> Self {
        Self {
            api,
            services,
            config,
            session: RefCell::new(SignInSession::new()),
            lifecycle: FlowLifecycle::new(),
        }
    }

    pub fn set_on_change(&self, on_change: Rc<dyn Fn()>) {
        self.lifecycle.set_on_change(on_change);
    }

    pub fn session(&self) -> SignInSession {
        self.session.borrow().clone()
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle.is_active()
    }

    /// Detach from the view; later completions become no-ops
    pub fn deactivate(&self) {
        self.lifecycle.deactivate();
    }

    pub fn update_email(&self, email: &str) {
        self.session.borrow_mut().set_email(email);
        self.lifecycle.changed();
    }

    pub fn update_password(&self, password: &str) {
        self.session.borrow_mut().set_password(password);
        self.lifecycle.changed();
    }

    pub fn update_confirm_password(&self, confirm_password: &str) {
        self.session.borrow_mut().set_confirm_password(confirm_password);
        self.lifecycle.changed();
    }

    pub async fn submit_email(&self) {
        let begun = self.session.borrow_mut().begin_email_check();
        let request = match begun {
            Ok(request) => request,
            Err(rejection) => {
                self.rejected(rejection);
                return;
            }
        };
        self.lifecycle.changed();

        info!("Checking whether {} has an account", request.email);
        let result = self.api.check_email(&request).await;

        if !self.lifecycle.is_active() {
            debug!("Sign-in view closed before the email check completed");
            self.session.borrow_mut().abandon_request();
            return;
        }

        self.session.borrow_mut().complete_email_check(&result);
        match result {
            Ok(EmailStatus::NotFound) => {
                info!("No account for {}, switching to account creation", request.email);
                self.notify(
                    NotificationKind::Info,
                    "Account Not Found",
                    "Would you like to create a new account?",
                );
            }
            Ok(EmailStatus::Exists) => {
                info!("Account found for {}", request.email);
            }
            Err(err) => {
                warn!("Email check failed: {}", err);
                self.notify(NotificationKind::Error, "Error", &err.to_string());
            }
        }
        self.lifecycle.changed();
    }

    pub fn edit_email(&self) {
        let result = self.session.borrow_mut().edit_email();
        match result {
            Ok(()) => self.lifecycle.changed(),
            Err(rejection) => debug!("Edit email ignored: {}", rejection),
        }
    }

    pub async fn submit_password(&self) {
        let begun = self.session.borrow_mut().begin_sign_in();
        let PendingSignIn { request, mode } = match begun {
            Ok(pending) => pending,
            Err(rejection) => {
                self.rejected(rejection);
                return;
            }
        };
        self.lifecycle.changed();

        info!("Submitting {:?} for {}", mode, request.email);
        let result = self.api.sign_in(&request).await;

        if !self.lifecycle.is_active() {
            debug!("Sign-in view closed before authentication completed");
            self.session.borrow_mut().abandon_request();
            return;
        }

        self.session.borrow_mut().complete_sign_in();
        match result {
            Ok(profile) => {
                self.services.profile_store.set_profile(profile.clone());
                if let Err(err) = self.services.storage.save_profile(&profile) {
                    error!("Failed to persist signed-in profile: {}", err);
                    self.notify(NotificationKind::Error, "Error", &err.to_string());
                    self.lifecycle.changed();
                    return;
                }
                info!("{}", mode.success_message());
                self.services.navigator.navigate(mode.destination());
                self.notify(NotificationKind::Success, "Success!", mode.success_message());
            }
            Err(err) => {
                warn!("Authentication failed: {}", err);
                self.notify(NotificationKind::Error, "Error", &err.to_string());
            }
        }
        self.lifecycle.changed();
    }

    /// Fill in one of the configured test accounts without a network call.
    ///
    /// `roll` is a uniform random number in `[0, 1)`.
    pub fn load_test_profile(&self, roll: f64) {
        let Some(email) = pick_test_email(&self.config.test_profile_emails, roll) else {
            warn!("No test profiles configured");
            return;
        };
        let email = email.to_string();

        let loaded = self
            .session
            .borrow_mut()
            .load_test_profile(&email, &self.config.test_profile_password);
        if let Err(rejection) = loaded {
            debug!("Load test profile ignored: {}", rejection);
            return;
        }

        info!("Loaded test profile {}", email);
        let message = format!("Loaded profile for {}", test_profile_display_name(&email));
        self.notify_for(
            NotificationKind::Info,
            "Test Profile Loaded",
            &message,
            self.config.short_notification_ms,
        );
        self.lifecycle.changed();
    }

    fn rejected(&self, rejection: SignInRejection) {
        if rejection.is_input_error() {
            self.notify(NotificationKind::Error, "Error", &rejection.to_string());
        } else {
            debug!("Sign-in action ignored: {}", rejection);
        }
    }

    fn notify(&self, kind: NotificationKind, title: &str, message: &str) {
        let duration_ms = match kind {
            NotificationKind::Success => self.config.short_notification_ms,
            NotificationKind::Error | NotificationKind::Info => self.config.long_notification_ms,
        };
        self.notify_for(kind, title, message, duration_ms);
    }

    fn notify_for(&self, kind: NotificationKind, title: &str, message: &str, duration_ms: u32) {
        self.services
            .notifier
            .notify(Notification::new(kind, title, message, duration_ms));
    }
}
