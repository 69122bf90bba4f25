pub mod use_profile_editor;
pub mod use_screen;
pub mod use_sign_in;
