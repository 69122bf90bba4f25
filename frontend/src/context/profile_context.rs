use std::rc::Rc;

use log::{info, warn};
use shared::{MemoryProfileStore, Profile, ProfileStore};
use yew::prelude::*;

/// App-wide signed-in profile
#[derive(Debug, Default, PartialEq)]
pub struct ProfileState {
    pub profile: Option<Profile>,
}

pub enum ProfileAction {
    Set(Profile),
    Clear,
}

impl Reducible for ProfileState {
    type Action = ProfileAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            ProfileAction::Set(profile) => Rc::new(Self {
                profile: Some(profile),
            }),
            ProfileAction::Clear => Rc::new(Self { profile: None }),
        }
    }
}

pub type ProfileContext = UseReducerHandle<ProfileState>;

/// [`ProfileStore`] backed by the profile context
pub struct ProfileStoreHandle {
    dispatcher: UseReducerDispatcher<ProfileState>,
}

impl ProfileStore for ProfileStoreHandle {
    fn set_profile(&self, profile: Profile) {
        info!("Storing signed-in profile");
        self.dispatcher.dispatch(ProfileAction::Set(profile));
    }

    fn clear(&self) {
        info!("Clearing signed-in profile");
        self.dispatcher.dispatch(ProfileAction::Clear);
    }
}

#[derive(Properties, PartialEq)]
pub struct ProfileProviderProps {
    /// Profile restored from durable storage at startup
    pub initial: Option<Profile>,
    pub children: Children,
}

#[function_component(ProfileProvider)]
pub fn profile_provider(props: &ProfileProviderProps) -> Html {
    let initial = props.initial.clone();
    let state = use_reducer(move || ProfileState { profile: initial });

    html! {
        <ContextProvider<ProfileContext> context={state}>
            {props.children.clone()}
        </ContextProvider<ProfileContext>>
    }
}

/// Current signed-in profile, if any
#[hook]
pub fn use_profile() -> Option<Profile> {
    use_context::<ProfileContext>().and_then(|context| context.profile.clone())
}

#[hook]
pub fn use_profile_store() -> Rc<dyn ProfileStore> {
    match use_context::<ProfileContext>() {
        Some(context) => Rc::new(ProfileStoreHandle {
            dispatcher: context.dispatcher(),
        }),
        None => {
            warn!("No profile context; using a detached in-memory store");
            Rc::new(MemoryProfileStore::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_set_and_clear() {
        let profile = Profile::from_value(serde_json::json!({"id": "u1"})).unwrap();
        let state = Rc::new(ProfileState::default()).reduce(ProfileAction::Set(profile.clone()));
        assert_eq!(state.profile, Some(profile));

        let state = state.reduce(ProfileAction::Clear);
        assert!(state.profile.is_none());
    }
}
