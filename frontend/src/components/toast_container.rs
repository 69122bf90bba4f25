use gloo::timers::callback::Timeout;
use shared::NotificationKind;
use web_sys::MouseEvent;
use yew::prelude::*;

use crate::context::toast_context::{Toast, ToastAction, ToastContext};

fn kind_class(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Success => "toast success",
        NotificationKind::Error => "toast error",
        NotificationKind::Info => "toast info",
    }
}

#[derive(Properties, PartialEq)]
struct ToastItemProps {
    toast: Toast,
    on_dismiss: Callback<u32>,
}

#[function_component(ToastItem)]
fn toast_item(props: &ToastItemProps) -> Html {
    // Dismiss after the notification's duration; dropping the timeout cancels it
    use_effect_with(props.toast.id, {
        let on_dismiss = props.on_dismiss.clone();
        let duration_ms = props.toast.notification.duration_ms;
        move |id| {
            let id = *id;
            let timeout = Timeout::new(duration_ms, move || on_dismiss.emit(id));
            move || drop(timeout)
        }
    });

    let on_close_click = {
        let on_dismiss = props.on_dismiss.clone();
        let id = props.toast.id;
        Callback::from(move |_: MouseEvent| on_dismiss.emit(id))
    };

    let notification = &props.toast.notification;
    html! {
        <div class={kind_class(notification.kind)} role="status">
            <div class="toast-body">
                <strong class="toast-title">{&notification.title}</strong>
                <div class="toast-message">{&notification.message}</div>
            </div>
            <button type="button" class="toast-close" aria-label="Close" onclick={on_close_click}>
                {"×"}
            </button>
        </div>
    }
}

#[function_component(ToastContainer)]
pub fn toast_container() -> Html {
    let Some(toasts) = use_context::<ToastContext>() else {
        return html! {};
    };

    let on_dismiss = {
        let dispatcher = toasts.dispatcher();
        Callback::from(move |id: u32| dispatcher.dispatch(ToastAction::Dismiss(id)))
    };

    html! {
        <div class="toast-container">
            {for toasts.toasts.iter().map(|toast| html! {
                <ToastItem key={toast.id} toast={toast.clone()} on_dismiss={on_dismiss.clone()} />
            })}
        </div>
    }
}
