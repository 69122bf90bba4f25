use serde::{Deserialize, Serialize};

/// Configuration shared by the sign-in flow and the profile editor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlowConfig {
    /// Display time for success and test-profile notifications
    pub short_notification_ms: u32,
    /// Display time for errors and the account-not-found prompt
    pub long_notification_ms: u32,
    /// Durable storage key holding the signed-in profile
    pub profile_storage_key: String,
    /// Candidate emails for the "load test profile" shortcut
    pub test_profile_emails: Vec<String>,
    pub test_profile_password: String,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            short_notification_ms: 3000,
            long_notification_ms: 5000,
            profile_storage_key: "profile".to_string(),
            test_profile_emails: vec![
                "alex.thompson@example.com".to_string(),
                "sarah.chen@example.com".to_string(),
                "marcus.johnson@example.com".to_string(),
            ],
            test_profile_password: "test123".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = FlowConfig::default();
        assert_eq!(config.short_notification_ms, 3000);
        assert_eq!(config.long_notification_ms, 5000);
        assert_eq!(config.profile_storage_key, "profile");
        assert_eq!(config.test_profile_emails.len(), 3);
        assert_eq!(config.test_profile_password, "test123");
    }
}
