use shared::{Profile, ProfileStorage, ProfileStore, Screen};
use yew::prelude::*;

mod components;
mod config;
mod context;
mod hooks;
mod services;

use components::header::Header;
use components::profile_form_modal::ProfileFormModal;
use components::sign_in::SignIn;
use config::AppConfig;
use context::profile_context::{use_profile, use_profile_store, ProfileProvider};
use context::toast_context::ToastProvider;
use hooks::use_screen::{use_screen, UseScreenResult};
use services::api::ApiClient;
use services::logging::Logger;
use services::storage::LocalProfileStorage;

#[derive(Properties, PartialEq)]
struct ShellProps {
    config: AppConfig,
}

#[function_component(Shell)]
fn shell(props: &ShellProps) -> Html {
    let api_client = use_memo(props.config.api_url.clone(), |url| {
        ApiClient::with_base_url(url.clone())
    });
    let profile = use_profile();
    let profile_store = use_profile_store();
    let storage = LocalProfileStorage::new(&props.config.flow.profile_storage_key);

    let UseScreenResult { screen, navigate: on_navigate } = use_screen();
    let editing = use_state(|| false);

    // Any screen change, including back/forward, closes the editor
    {
        let editing = editing.clone();
        use_effect_with(screen, move |_| {
            editing.set(false);
            || ()
        });
    }

    // Saved profiles become the signed-in profile and survive reloads
    let on_profile_update = {
        let profile_store = profile_store.clone();
        let storage = storage.clone();
        Callback::from(move |profile: Profile| {
            if let Err(e) = storage.save_profile(&profile) {
                Logger::error_with_component("shell", &format!("Failed to persist profile: {}", e));
            }
            profile_store.set_profile(profile);
        })
    };

    let on_sign_out = {
        let profile_store = profile_store.clone();
        let storage = storage.clone();
        let on_navigate = on_navigate.clone();
        Callback::from(move |_: ()| {
            Logger::info_with_component("shell", "Signing out");
            profile_store.clear();
            storage.clear_profile();
            on_navigate.emit(Screen::SignIn);
        })
    };

    let on_open_editor = {
        let editing = editing.clone();
        Callback::from(move |_: ()| editing.set(true))
    };

    let on_close_editor = {
        let editing = editing.clone();
        Callback::from(move |_: ()| editing.set(false))
    };

    let body = match screen {
        Screen::SignIn => html! {
            <SignIn
                api_client={(*api_client).clone()}
                config={props.config.flow.clone()}
                on_navigate={on_navigate.clone()}
            />
        },
        Screen::Profile => {
            let on_created = {
                let on_profile_update = on_profile_update.clone();
                let on_navigate = on_navigate.clone();
                Callback::from(move |profile: Profile| {
                    on_profile_update.emit(profile);
                    on_navigate.emit(Screen::Waiting);
                })
            };

            html! {
                <div class="profile-setup">
                    <h2>{"Set up your profile"}</h2>
                    <ProfileFormModal
                        is_open=true
                        closable=false
                        on_close={Callback::noop()}
                        initial_data={None::<Profile>}
                        on_profile_update={on_created}
                        api_client={(*api_client).clone()}
                        config={props.config.flow.clone()}
                    />
                </div>
            }
        }
        Screen::Waiting => {
            html! {
                <div class="waiting">
                    <h2>{"Finding your matches..."}</h2>
                    {match profile.as_ref().and_then(|p| p.text("location")) {
                        Some(location) => html! { <p>{format!("Looking near {}", location)}</p> },
                        None => html! {},
                    }}
                    <ProfileFormModal
                        is_open={*editing}
                        on_close={on_close_editor}
                        initial_data={profile.clone()}
                        on_profile_update={on_profile_update.clone()}
                        api_client={(*api_client).clone()}
                        config={props.config.flow.clone()}
                    />
                </div>
            }
        }
    };

    html! {
        <>
            {if screen == Screen::SignIn {
                html! {}
            } else {
                html! {
                    <Header
                        profile={profile.clone()}
                        on_edit_profile={on_open_editor}
                        on_sign_out={on_sign_out}
                    />
                }
            }}
            <main class="container">
                {body}
            </main>
        </>
    }
}

#[derive(Properties, PartialEq)]
struct AppProps {
    config: AppConfig,
}

#[function_component(App)]
fn app(props: &AppProps) -> Html {
    // Restore the signed-in profile from the previous visit
    let initial = use_memo(props.config.flow.profile_storage_key.clone(), |key| {
        LocalProfileStorage::new(key).load_profile()
    });

    html! {
        <ToastProvider>
            <ProfileProvider initial={(*initial).clone()}>
                <Shell config={props.config.clone()} />
            </ProfileProvider>
        </ToastProvider>
    }
}

fn main() {
    let config = AppConfig::from_build_env();
    Logger::init(config.log_level);
    Logger::info_with_component("main", &format!("Starting with API at {}", config.api_url));
    yew::Renderer::<App>::with_props(AppProps { config }).render();
}
