use std::rc::Rc;

use shared::{FlowConfig, Profile, ProfileEditor, ProfileEditorFlow, ProfileField};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::context::toast_context::use_notifier;
use crate::services::api::ApiClient;

pub struct UseProfileEditorResult {
    pub editor: ProfileEditor,
    pub actions: UseProfileEditorActions,
}

#[derive(Clone, PartialEq)]
pub struct UseProfileEditorActions {
    pub update_field: Callback<(ProfileField, String)>,
    pub submit: Callback<()>,
}

/// Editor session for the profile modal.
///
/// The session resets every time the modal opens. A successful save emits
/// the saved profile to `on_saved`.
#[hook]
pub fn use_profile_editor(
    api_client: &ApiClient,
    config: &FlowConfig,
    is_open: bool,
    initial: Option<Profile>,
    on_saved: Callback<Profile>,
) -> UseProfileEditorResult {
    let notifier = use_notifier();
    let force_update = use_force_update();

    let flow = {
        let api_client = api_client.clone();
        let config = config.clone();
        let initial = initial.clone();
        use_memo((), move |_| {
            let flow = ProfileEditorFlow::new(api_client, notifier, config, initial);
            flow.set_on_change(Rc::new(move || force_update.force_update()));
            flow
        })
    };

    // Reset state when modal opens
    use_effect_with((is_open, initial), {
        let flow = flow.clone();
        move |(is_open, initial)| {
            if *is_open {
                flow.open(initial.clone());
            }
            || ()
        }
    });

    {
        let flow = flow.clone();
        use_effect_with((), move |_| move || flow.deactivate());
    }

    let update_field = {
        let flow = flow.clone();
        Callback::from(move |(field, value): (ProfileField, String)| {
            flow.update_field(field, &value)
        })
    };

    let submit = {
        let flow = flow.clone();
        Callback::from(move |_: ()| {
            let flow = flow.clone();
            let on_saved = on_saved.clone();
            spawn_local(async move {
                if let Some(profile) = flow.submit().await {
                    on_saved.emit(profile);
                }
            });
        })
    };

    UseProfileEditorResult {
        editor: flow.editor(),
        actions: UseProfileEditorActions {
            update_field,
            submit,
        },
    }
}
