pub mod profile_context;
pub mod toast_context;
