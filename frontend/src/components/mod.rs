pub mod header;
pub mod profile_form_modal;
pub mod sign_in;
pub mod toast_container;
