//! Capabilities the flows are handed instead of reaching for globals.
//!
//! The browser app implements these with a toast context, screen state and
//! local storage; tests implement them with plain recorders.

use std::cell::RefCell;

use thiserror::Error;

use crate::profile::Profile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

/// A transient user-visible message
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub duration_ms: u32,
}

impl Notification {
    pub fn new(kind: NotificationKind, title: &str, message: &str, duration_ms: u32) -> Self {
        Self {
            kind,
            title: title.to_string(),
            message: message.to_string(),
            duration_ms,
        }
    }
}

pub trait Notifier {
    fn notify(&self, notification: Notification);
}

/// Screens the flows can send the user to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    SignIn,
    /// Profile setup after creating an account
    Profile,
    /// Waiting/matching screen for returning users
    Waiting,
}

impl Screen {
    pub fn path(&self) -> &'static str {
        match self {
            Screen::SignIn => "/",
            Screen::Profile => "/profile",
            Screen::Waiting => "/waiting",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "/" => Some(Screen::SignIn),
            "/profile" => Some(Screen::Profile),
            "/waiting" => Some(Screen::Waiting),
            _ => None,
        }
    }

    /// Screen shown for an address; unknown paths land on sign-in
    pub fn for_location(path: &str) -> Self {
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        Self::from_path(path).unwrap_or(Screen::SignIn)
    }
}

pub trait Navigator {
    fn navigate(&self, screen: Screen);
}

/// Process-wide holder of the signed-in profile.
///
/// Initialized at app start and cleared on sign-out.
pub trait ProfileStore {
    fn set_profile(&self, profile: Profile);
    fn clear(&self);
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    #[error("Storage is unavailable: {0}")]
    Unavailable(String),
    #[error("Failed to serialize profile: {0}")]
    Serialization(String),
}

/// Durable client storage for the signed-in profile
pub trait ProfileStorage {
    fn save_profile(&self, profile: &Profile) -> Result<(), StorageError>;
    fn load_profile(&self) -> Option<Profile>;
    fn clear_profile(&self);
}

/// In-memory profile store for hosts without a UI context
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    profile: RefCell<Option<Profile>>,
}

impl MemoryProfileStore {
    pub fn new(initial: Option<Profile>) -> Self {
        Self {
            profile: RefCell::new(initial),
        }
    }

    pub fn profile(&self) -> Option<Profile> {
        self.profile.borrow().clone()
    }
}

impl ProfileStore for MemoryProfileStore {
    fn set_profile(&self, profile: Profile) {
        *self.profile.borrow_mut() = Some(profile);
    }

    fn clear(&self) {
        self.profile.borrow_mut().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_paths() {
        for screen in [Screen::SignIn, Screen::Profile, Screen::Waiting] {
            assert_eq!(Screen::from_path(screen.path()), Some(screen));
        }
        assert_eq!(Screen::from_path("/nowhere"), None);
    }

    #[test]
    fn test_screen_for_location() {
        assert_eq!(Screen::for_location("/"), Screen::SignIn);
        assert_eq!(Screen::for_location(""), Screen::SignIn);
        assert_eq!(Screen::for_location("/waiting"), Screen::Waiting);
        assert_eq!(Screen::for_location("/profile/"), Screen::Profile);
        assert_eq!(Screen::for_location("/nowhere"), Screen::SignIn);
    }

    #[test]
    fn test_memory_profile_store_lifecycle() {
        let store = MemoryProfileStore::default();
        assert!(store.profile().is_none());

        let profile = Profile::from_value(serde_json::json!({"id": "p1"})).unwrap();
        store.set_profile(profile.clone());
        assert_eq!(store.profile(), Some(profile));

        store.clear();
        assert!(store.profile().is_none());
    }
}
