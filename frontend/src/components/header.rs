use shared::Profile;
use web_sys::MouseEvent;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct HeaderProps {
    pub profile: Option<Profile>,
    pub on_edit_profile: Callback<()>,
    pub on_sign_out: Callback<()>,
}

#[function_component(Header)]
pub fn header(props: &HeaderProps) -> Html {
    let Some(profile) = &props.profile else {
        return html! {
            <header class="header">
                <div class="container">
                    <h1>{"Dating App"}</h1>
                </div>
            </header>
        };
    };

    let on_edit_click = {
        let on_edit_profile = props.on_edit_profile.clone();
        Callback::from(move |_: MouseEvent| on_edit_profile.emit(()))
    };

    let on_sign_out_click = {
        let on_sign_out = props.on_sign_out.clone();
        Callback::from(move |_: MouseEvent| on_sign_out.emit(()))
    };

    html! {
        <header class="header">
            <div class="container">
                <h1>
                    {match profile.name() {
                        // First name only
                        Some(name) => format!("Hi, {}", name.split_whitespace().next().unwrap_or(&name)),
                        None => "Dating App".to_string(),
                    }}
                </h1>
                <div class="header-right">
                    <button type="button" class="btn btn-secondary" onclick={on_edit_click}>
                        {"Edit Profile"}
                    </button>
                    <button type="button" class="btn btn-secondary" onclick={on_sign_out_click}>
                        {"Sign Out"}
                    </button>
                </div>
            </div>
        </header>
    }
}
