use shared::{FlowConfig, Gender, LookingFor, Profile, ProfileField, ValidationErrors};
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement, MouseEvent};
use yew::prelude::*;

use crate::hooks::use_profile_editor::use_profile_editor;
use crate::services::api::ApiClient;

#[derive(Properties, PartialEq)]
pub struct ProfileFormModalProps {
    pub is_open: bool,
    /// Whether the user may dismiss the modal without saving
    #[prop_or(true)]
    pub closable: bool,
    pub on_close: Callback<()>,
    /// Existing profile to edit; `None` creates a new one
    #[prop_or_default]
    pub initial_data: Option<Profile>,
    pub on_profile_update: Callback<Profile>,
    pub api_client: ApiClient,
    pub config: FlowConfig,
}

fn field_error(errors: &ValidationErrors, field: ProfileField) -> Html {
    match errors.get(field) {
        Some(message) => html! { <span class="field-error">{message}</span> },
        None => html! {},
    }
}

fn input_class(errors: &ValidationErrors, field: ProfileField) -> Classes {
    classes!("profile-input", errors.contains(field).then_some("has-error"))
}

#[function_component(ProfileFormModal)]
pub fn profile_form_modal(props: &ProfileFormModalProps) -> Html {
    // Close only after the saved profile has been handed to the parent
    let on_saved = {
        let on_profile_update = props.on_profile_update.clone();
        let on_close = props.on_close.clone();
        Callback::from(move |profile: Profile| {
            on_profile_update.emit(profile);
            on_close.emit(());
        })
    };

    let editor = use_profile_editor(
        &props.api_client,
        &props.config,
        props.is_open,
        props.initial_data.clone(),
        on_saved,
    );
    let actions = editor.actions.clone();
    let editor = editor.editor;

    let on_input = |field: ProfileField| {
        let update_field = actions.update_field.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            update_field.emit((field, input.value()));
        })
    };

    let on_select = |field: ProfileField| {
        let update_field = actions.update_field.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            update_field.emit((field, select.value()));
        })
    };

    let on_bio_input = {
        let update_field = actions.update_field.clone();
        Callback::from(move |e: InputEvent| {
            let textarea: HtmlTextAreaElement = e.target_unchecked_into();
            update_field.emit((ProfileField::Bio, textarea.value()));
        })
    };

    let on_submit = {
        let submit = actions.submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            submit.emit(());
        })
    };

    let on_backdrop_click = {
        let on_close = props.on_close.clone();
        let closable = props.closable;
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            if closable {
                on_close.emit(());
            }
        })
    };

    let on_modal_click = Callback::from(|e: MouseEvent| {
        e.stop_propagation();
    });

    let on_cancel = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| {
            on_close.emit(());
        })
    };

    if !props.is_open {
        return html! {};
    }

    let draft = editor.draft();
    let errors = editor.errors();
    let submitting = editor.is_submitting();
    let gender = draft.gender.map(|g| g.as_str()).unwrap_or_default();
    let looking_for = draft.looking_for.map(|l| l.as_str()).unwrap_or_default();

    html! {
        <div class="profile-modal-backdrop" onclick={on_backdrop_click}>
            <div class="profile-modal" onclick={on_modal_click}>
                <div class="profile-modal-content">
                    <h3 class="profile-modal-title">{editor.title()}</h3>

                    <form class="profile-form" onsubmit={on_submit}>
                        <div class="form-group">
                            <label for="profile-name">{ProfileField::Name.label()}</label>
                            <input
                                id="profile-name"
                                type="text"
                                class={input_class(errors, ProfileField::Name)}
                                placeholder="Your name"
                                value={draft.name.clone()}
                                oninput={on_input(ProfileField::Name)}
                                disabled={submitting}
                                autofocus=true
                            />
                            {field_error(errors, ProfileField::Name)}
                        </div>

                        <div class="form-group">
                            <label for="profile-age">{ProfileField::Age.label()}</label>
                            <input
                                id="profile-age"
                                type="number"
                                min="18"
                                class={input_class(errors, ProfileField::Age)}
                                placeholder="18"
                                value={draft.age.clone()}
                                oninput={on_input(ProfileField::Age)}
                                disabled={submitting}
                            />
                            {field_error(errors, ProfileField::Age)}
                        </div>

                        <div class="form-group">
                            <label for="profile-gender">{ProfileField::Gender.label()}</label>
                            <select
                                id="profile-gender"
                                class={input_class(errors, ProfileField::Gender)}
                                onchange={on_select(ProfileField::Gender)}
                                disabled={submitting}
                            >
                                <option value="" selected={gender.is_empty()}>{"Select gender"}</option>
                                {for Gender::ALL.iter().map(|option| html! {
                                    <option value={option.as_str()} selected={gender == option.as_str()}>
                                        {option.label()}
                                    </option>
                                })}
                            </select>
                            {field_error(errors, ProfileField::Gender)}
                        </div>

                        <div class="form-group">
                            <label for="profile-bio">{ProfileField::Bio.label()}</label>
                            <textarea
                                id="profile-bio"
                                class={input_class(errors, ProfileField::Bio)}
                                placeholder="Tell us about yourself"
                                rows="4"
                                value={draft.bio.clone()}
                                oninput={on_bio_input}
                                disabled={submitting}
                            />
                            {field_error(errors, ProfileField::Bio)}
                        </div>

                        <div class="form-group">
                            <label for="profile-location">{ProfileField::Location.label()}</label>
                            <input
                                id="profile-location"
                                type="text"
                                class={input_class(errors, ProfileField::Location)}
                                placeholder="City, State"
                                value={draft.location.clone()}
                                oninput={on_input(ProfileField::Location)}
                                disabled={submitting}
                            />
                            {field_error(errors, ProfileField::Location)}
                        </div>

                        <div class="form-group">
                            <label for="profile-looking-for">{ProfileField::LookingFor.label()}</label>
                            <select
                                id="profile-looking-for"
                                class={input_class(errors, ProfileField::LookingFor)}
                                onchange={on_select(ProfileField::LookingFor)}
                                disabled={submitting}
                            >
                                <option value="" selected={looking_for.is_empty()}>{"Select what you're looking for"}</option>
                                {for LookingFor::ALL.iter().map(|option| html! {
                                    <option value={option.as_str()} selected={looking_for == option.as_str()}>
                                        {option.label()}
                                    </option>
                                })}
                            </select>
                            {field_error(errors, ProfileField::LookingFor)}
                        </div>

                        <div class="profile-modal-buttons">
                            <button
                                type="submit"
                                class="btn btn-primary"
                                disabled={submitting}
                            >
                                {if submitting {
                                    editor.busy_label()
                                } else {
                                    editor.submit_label()
                                }}
                            </button>
                            {if props.closable {
                                html! {
                                    <button
                                        type="button"
                                        class="btn btn-secondary profile-cancel"
                                        onclick={on_cancel}
                                        disabled={submitting}
                                    >
                                        {"Cancel"}
                                    </button>
                                }
                            } else {
                                html! {}
                            }}
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wasm_bindgen_test::*;
    use web_sys::Element;

    wasm_bindgen_test_configure!(run_in_browser);

    fn mount(closable: bool) -> Element {
        let document = web_sys::window().unwrap().document().unwrap();
        let root = document.create_element("div").unwrap();
        document.body().unwrap().append_child(&root).unwrap();

        let props = ProfileFormModalProps {
            is_open: true,
            closable,
            on_close: Callback::noop(),
            initial_data: None,
            on_profile_update: Callback::noop(),
            api_client: ApiClient::with_base_url("http://api.test".to_string()),
            config: FlowConfig::default(),
        };
        yew::Renderer::<ProfileFormModal>::with_root_and_props(root.clone(), props).render();
        root
    }

    #[wasm_bindgen_test]
    async fn test_cancel_shown_only_when_closable() {
        let closable = mount(true);
        let required = mount(false);
        yew::platform::time::sleep(Duration::from_millis(10)).await;

        assert!(closable.query_selector(".profile-cancel").unwrap().is_some());
        assert!(required.query_selector(".profile-form").unwrap().is_some());
        assert!(required.query_selector(".profile-cancel").unwrap().is_none());
    }
}
