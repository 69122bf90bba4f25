use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info, warn};
use thiserror::Error;

use crate::api::{profile_path, AccountsApi, ApiError, HttpMethod, PROFILES_PATH};
use crate::config::FlowConfig;
use crate::flow::FlowLifecycle;
use crate::ports::{Notification, NotificationKind, Notifier};
use crate::profile::{Profile, ProfileDraft, ProfileField, ProfilePayload, ValidationErrors};

/// Whether the editor creates a new profile or edits an existing one
#[derive(Debug, Clone, PartialEq)]
pub enum EditorMode {
    Create,
    Edit(Profile),
}

/// Where a save request goes
#[derive(Debug, Clone, PartialEq)]
pub enum SaveTarget {
    Create,
    Update { id: String },
}

impl SaveTarget {
    pub fn method(&self) -> HttpMethod {
        match self {
            SaveTarget::Create => HttpMethod::Post,
            SaveTarget::Update { .. } => HttpMethod::Put,
        }
    }

    pub fn path(&self) -> String {
        match self {
            SaveTarget::Create => PROFILES_PATH.to_string(),
            SaveTarget::Update { id } => profile_path(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSaveRequest {
    pub target: SaveTarget,
    pub payload: ProfilePayload,
}

impl ProfileSaveRequest {
    /// The profile as sent, carrying the id when it was an update
    pub fn submitted_profile(&self) -> Result<Profile, ApiError> {
        let mut value = serde_json::to_value(&self.payload)
            .map_err(|e| ApiError::Serialization(e.to_string()))?;
        if let (SaveTarget::Update { id }, Some(fields)) = (&self.target, value.as_object_mut()) {
            fields.insert("id".to_string(), serde_json::Value::String(id.clone()));
        }
        Profile::from_value(value).ok_or(ApiError::MalformedResponse)
    }
}

/// Why a submit attempt never reached the network
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitRejection {
    #[error("A save is already in progress")]
    Busy,
    #[error("Please fix the highlighted fields")]
    Invalid(ValidationErrors),
    #[error("This profile has no id and cannot be updated")]
    MissingProfileId,
}

/// State of one profile editing session
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileEditor {
    mode: EditorMode,
    draft: ProfileDraft,
    errors: ValidationErrors,
    is_submitting: bool,
}

impl ProfileEditor {
    /// Start a session, populated from `initial` in edit mode
    pub fn open(initial: Option<Profile>) -> Self {
        let (mode, draft) = match initial {
            Some(profile) => {
                let draft = ProfileDraft::from_profile(&profile);
                (EditorMode::Edit(profile), draft)
            }
            None => (EditorMode::Create, ProfileDraft::default()),
        };
        Self {
            mode,
            draft,
            errors: ValidationErrors::new(),
            is_submitting: false,
        }
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn draft(&self) -> &ProfileDraft {
        &self.draft
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, EditorMode::Edit(_))
    }

    /// Store new input and clear that field's error, leaving the others
    pub fn update_field(&mut self, field: ProfileField, value: &str) {
        self.draft.set(field, value);
        self.errors.clear(field);
    }

    /// Validate and mark the editor busy.
    ///
    /// Errors are recomputed on every attempt, valid or not.
    pub fn begin_submit(&mut self) -> Result<ProfileSaveRequest, SubmitRejection> {
        if self.is_submitting {
            return Err(SubmitRejection::Busy);
        }

        let payload = match self.draft.to_payload() {
            Ok(payload) => {
                self.errors = ValidationErrors::new();
                payload
            }
            Err(errors) => {
                self.errors = errors.clone();
                return Err(SubmitRejection::Invalid(errors));
            }
        };

        let target = match &self.mode {
            EditorMode::Create => SaveTarget::Create,
            EditorMode::Edit(profile) => match profile.id() {
                Some(id) => SaveTarget::Update { id },
                None => return Err(SubmitRejection::MissingProfileId),
            },
        };

        self.is_submitting = true;
        Ok(ProfileSaveRequest { target, payload })
    }

    pub fn finish_submit(&mut self) {
        self.is_submitting = false;
    }

    pub fn title(&self) -> &'static str {
        if self.is_edit() { "Edit Profile" } else { "Create Profile" }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_edit() { "Update Profile" } else { "Create Profile" }
    }

    pub fn busy_label(&self) -> &'static str {
        if self.is_edit() { "Updating..." } else { "Creating..." }
    }

    pub fn success_message(&self) -> &'static str {
        if self.is_edit() {
            "Profile updated successfully"
        } else {
            "Profile created successfully"
        }
    }
}

/// Drives a [`ProfileEditor`] against the backend and reports outcomes
pub struct ProfileEditorFlow<A: AccountsApi> {
    api: A,
    notifier: Rc<dyn Notifier>,
    config: FlowConfig,
    editor: RefCell<ProfileEditor>,
    lifecycle: FlowLifecycle,
}

impl<A: AccountsApi> ProfileEditorFlow<A> {
    pub fn new(api: A, notifier: Rc<dyn Notifier>, config: FlowConfig, initial: Option<Profile>) -> Self {
        Self {
            api,
            notifier,
            config,
            editor: RefCell::new(ProfileEditor::open(initial)),
            lifecycle: FlowLifecycle::new(),
        }
    }

    pub fn set_on_change(&self, on_change: Rc<dyn Fn()>) {
        self.lifecycle.set_on_change(on_change);
    }

    pub fn editor(&self) -> ProfileEditor {
        self.editor.borrow().clone()
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle.is_active()
    }

    /// Detach from the view; later completions become no-ops
    pub fn deactivate(&self) {
        self.lifecycle.deactivate();
    }

    /// Reset the session for a newly opened modal
    pub fn open(&self, initial: Option<Profile>) {
        if self.editor.borrow().is_submitting() {
            debug!("Ignoring reopen while a profile save is in flight");
            return;
        }
        *self.editor.borrow_mut() = ProfileEditor::open(initial);
        self.lifecycle.changed();
    }

    pub fn update_field(&self, field: ProfileField, value: &str) {
        self.editor.borrow_mut().update_field(field, value);
        self.lifecycle.changed();
    }

    /// Validate and save the draft.
    ///
    /// Returns the saved profile on success so the caller can close the
    /// modal; every other outcome leaves the form open.
    pub async fn submit(&self) -> Option<Profile> {
        let begun = self.editor.borrow_mut().begin_submit();
        let request = match begun {
            Ok(request) => request,
            Err(SubmitRejection::Busy) => {
                debug!("Profile save already in flight");
                return None;
            }
            Err(SubmitRejection::Invalid(errors)) => {
                debug!("Profile draft has {} invalid field(s)", errors.len());
                self.lifecycle.changed();
                return None;
            }
            Err(rejection @ SubmitRejection::MissingProfileId) => {
                warn!("Profile save rejected: {}", rejection);
                self.notify(NotificationKind::Error, "Error", &rejection.to_string());
                self.lifecycle.changed();
                return None;
            }
        };
        self.lifecycle.changed();

        info!(
            "Saving profile via {} {}",
            request.target.method().as_str(),
            request.target.path()
        );
        let result = self.api.save_profile(&request).await;
        self.editor.borrow_mut().finish_submit();

        if !self.lifecycle.is_active() {
            debug!("Profile editor closed before the save completed");
            return None;
        }

        let saved = match result {
            Ok(profile) => {
                let message = self.editor.borrow().success_message();
                info!("{}", message);
                self.notify(NotificationKind::Success, "Success!", message);
                Some(profile)
            }
            Err(err) => {
                warn!("Profile save failed: {}", err);
                self.notify(NotificationKind::Error, "Error", &err.to_string());
                None
            }
        };
        self.lifecycle.changed();
        saved
    }

    fn notify(&self, kind: NotificationKind, title: &str, message: &str) {
        let duration_ms = match kind {
            NotificationKind::Success => self.config.short_notification_ms,
            NotificationKind::Error | NotificationKind::Info => self.config.long_notification_ms,
        };
        self.notifier
            .notify(Notification::new(kind, title, message, duration_ms));
    }
}
