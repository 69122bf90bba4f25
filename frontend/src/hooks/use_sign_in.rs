use std::rc::Rc;

use shared::{FlowConfig, Navigator, Screen, SignInFlow, SignInServices, SignInSession};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::context::profile_context::use_profile_store;
use crate::context::toast_context::use_notifier;
use crate::services::api::ApiClient;
use crate::services::storage::LocalProfileStorage;

/// Routes flow navigation to the app shell
struct CallbackNavigator(Callback<Screen>);

impl Navigator for CallbackNavigator {
    fn navigate(&self, screen: Screen) {
        self.0.emit(screen);
    }
}

pub struct UseSignInResult {
    pub session: SignInSession,
    pub actions: UseSignInActions,
}

#[derive(Clone, PartialEq)]
pub struct UseSignInActions {
    pub on_email_change: Callback<String>,
    pub on_password_change: Callback<String>,
    pub on_confirm_password_change: Callback<String>,
    pub submit_email: Callback<()>,
    pub submit_password: Callback<()>,
    pub edit_email: Callback<()>,
    pub load_test_profile: Callback<()>,
}

#[hook]
pub fn use_sign_in(
    api_client: &ApiClient,
    config: &FlowConfig,
    on_navigate: Callback<Screen>,
) -> UseSignInResult {
    let notifier = use_notifier();
    let profile_store = use_profile_store();
    let force_update = use_force_update();

    // One flow per mounted view
    let flow = {
        let api_client = api_client.clone();
        let config = config.clone();
        use_memo((), move |_| {
            let services = SignInServices {
                notifier,
                navigator: Rc::new(CallbackNavigator(on_navigate)),
                profile_store,
                storage: Rc::new(LocalProfileStorage::new(&config.profile_storage_key)),
            };
            let flow = SignInFlow::new(api_client, services, config);
            flow.set_on_change(Rc::new(move || force_update.force_update()));
            flow
        })
    };

    // Requests still in flight after unmount must not touch the view
    {
        let flow = flow.clone();
        use_effect_with((), move |_| move || flow.deactivate());
    }

    let on_email_change = {
        let flow = flow.clone();
        Callback::from(move |email: String| flow.update_email(&email))
    };

    let on_password_change = {
        let flow = flow.clone();
        Callback::from(move |password: String| flow.update_password(&password))
    };

    let on_confirm_password_change = {
        let flow = flow.clone();
        Callback::from(move |confirm_password: String| flow.update_confirm_password(&confirm_password))
    };

    let submit_email = {
        let flow = flow.clone();
        Callback::from(move |_: ()| {
            let flow = flow.clone();
            spawn_local(async move {
                flow.submit_email().await;
            });
        })
    };

    let submit_password = {
        let flow = flow.clone();
        Callback::from(move |_: ()| {
            let flow = flow.clone();
            spawn_local(async move {
                flow.submit_password().await;
            });
        })
    };

    let edit_email = {
        let flow = flow.clone();
        Callback::from(move |_: ()| flow.edit_email())
    };

    let load_test_profile = {
        let flow = flow.clone();
        Callback::from(move |_: ()| flow.load_test_profile(js_sys::Math::random()))
    };

    UseSignInResult {
        session: flow.session(),
        actions: UseSignInActions {
            on_email_change,
            on_password_change,
            on_confirm_password_change,
            submit_email,
            submit_password,
            edit_email,
            load_test_profile,
        },
    }
}
