use shared::{FlowConfig, Screen, SignInStep};
use web_sys::{HtmlInputElement, MouseEvent};
use yew::prelude::*;

use crate::hooks::use_sign_in::use_sign_in;
use crate::services::api::ApiClient;

#[derive(Properties, PartialEq)]
pub struct SignInProps {
    pub api_client: ApiClient,
    pub config: FlowConfig,
    pub on_navigate: Callback<Screen>,
}

fn text_input(update: &Callback<String>) -> Callback<InputEvent> {
    let update = update.clone();
    Callback::from(move |e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        update.emit(input.value());
    })
}

fn on_form_submit(action: &Callback<()>) -> Callback<SubmitEvent> {
    let action = action.clone();
    Callback::from(move |e: SubmitEvent| {
        e.prevent_default();
        action.emit(());
    })
}

#[function_component(SignIn)]
pub fn sign_in(props: &SignInProps) -> Html {
    let sign_in = use_sign_in(&props.api_client, &props.config, props.on_navigate.clone());
    let session = &sign_in.session;
    let actions = &sign_in.actions;
    let loading = session.is_loading();
    let credentials = session.credentials();

    let form = match session.step() {
        SignInStep::EmailEntry => {
            let on_load_test_profile = {
                let load_test_profile = actions.load_test_profile.clone();
                Callback::from(move |_: MouseEvent| load_test_profile.emit(()))
            };

            html! {
                <form class="sign-in-form" onsubmit={on_form_submit(&actions.submit_email)}>
                    <div class="form-group">
                        <label for="sign-in-email">{"Email"}</label>
                        <input
                            id="sign-in-email"
                            type="email"
                            class="sign-in-input"
                            placeholder="you@example.com"
                            value={credentials.email.clone()}
                            oninput={text_input(&actions.on_email_change)}
                            disabled={loading}
                            autofocus=true
                        />
                    </div>
                    <button type="submit" class="btn btn-primary" disabled={loading}>
                        {if loading { "Verifying..." } else { "Continue" }}
                    </button>
                    <button
                        type="button"
                        class="btn btn-secondary"
                        onclick={on_load_test_profile}
                        disabled={loading}
                    >
                        {"Load Test Profile"}
                    </button>
                </form>
            }
        }
        SignInStep::EmailVerified(mode) => {
            let on_edit_email = {
                let edit_email = actions.edit_email.clone();
                Callback::from(move |_: MouseEvent| edit_email.emit(()))
            };

            html! {
                <form class="sign-in-form" onsubmit={on_form_submit(&actions.submit_password)}>
                    <div class="sign-in-email-summary">
                        <span class="sign-in-email">{&credentials.email}</span>
                        <button
                            type="button"
                            class="btn-icon"
                            title="Edit email"
                            aria-label="Edit email"
                            onclick={on_edit_email}
                            disabled={loading}
                        >
                            {"✏️"}
                        </button>
                    </div>
                    <div class="form-group">
                        <label for="sign-in-password">{"Password"}</label>
                        <input
                            id="sign-in-password"
                            type="password"
                            class="sign-in-input"
                            value={credentials.password.clone()}
                            oninput={text_input(&actions.on_password_change)}
                            disabled={loading}
                            autofocus=true
                        />
                    </div>
                    {if session.is_new_account() {
                        html! {
                            <div class="form-group">
                                <label for="sign-in-confirm-password">{"Confirm Password"}</label>
                                <input
                                    id="sign-in-confirm-password"
                                    type="password"
                                    class="sign-in-input"
                                    value={credentials.confirm_password.clone()}
                                    oninput={text_input(&actions.on_confirm_password_change)}
                                    disabled={loading}
                                />
                            </div>
                        }
                    } else {
                        html! {}
                    }}
                    <button type="submit" class="btn btn-primary" disabled={loading}>
                        {if loading { mode.busy_label() } else { mode.heading() }}
                    </button>
                </form>
            }
        }
    };

    html! {
        <div class="sign-in-page">
            <div class="sign-in-card">
                <h2 class="sign-in-title">{session.heading()}</h2>
                {form}
            </div>
        </div>
    }
}
