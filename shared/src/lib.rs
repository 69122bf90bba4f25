//! Client-side models and flows for profile editing and sign-in.
//!
//! Everything here is UI-agnostic: the browser app renders the state and
//! supplies the HTTP client, notifications, navigation and storage.

pub mod api;
pub mod config;
pub mod flow;
pub mod ports;
pub mod profile;
pub mod profile_editor;
pub mod sign_in;

#[cfg(test)]
pub(crate) mod test_utils;

pub use api::{
    AccountsApi, ApiError, ApiOperation, CheckEmailRequest, EmailStatus, HttpMethod, SignInRequest,
};
pub use config::FlowConfig;
pub use ports::{
    MemoryProfileStore, Navigator, Notification, NotificationKind, Notifier, ProfileStorage,
    ProfileStore, Screen, StorageError,
};
pub use profile::{
    validate_form, Gender, LookingFor, Profile, ProfileDraft, ProfileField, ProfilePayload,
    ValidationErrors,
};
pub use profile_editor::{
    EditorMode, ProfileEditor, ProfileEditorFlow, ProfileSaveRequest, SaveTarget, SubmitRejection,
};
pub use sign_in::{
    AccountMode, Credentials, SignInFlow, SignInRejection, SignInServices, SignInSession,
    SignInStep,
};
