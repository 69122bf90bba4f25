use std::rc::Rc;

use log::{error, info, warn};
use shared::{Notification, NotificationKind, Notifier};
use yew::prelude::*;

use crate::components::toast_container::ToastContainer;

/// A notification currently on screen
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u32,
    pub notification: Notification,
}

#[derive(Debug, Default, PartialEq)]
pub struct ToastState {
    pub toasts: Vec<Toast>,
    next_id: u32,
}

pub enum ToastAction {
    Push(Notification),
    Dismiss(u32),
}

impl Reducible for ToastState {
    type Action = ToastAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            ToastAction::Push(notification) => {
                let mut toasts = self.toasts.clone();
                toasts.push(Toast {
                    id: self.next_id,
                    notification,
                });
                Rc::new(Self {
                    toasts,
                    next_id: self.next_id.wrapping_add(1),
                })
            }
            ToastAction::Dismiss(id) => {
                if !self.toasts.iter().any(|toast| toast.id == id) {
                    return self;
                }
                Rc::new(Self {
                    toasts: self.toasts.iter().filter(|toast| toast.id != id).cloned().collect(),
                    next_id: self.next_id,
                })
            }
        }
    }
}

pub type ToastContext = UseReducerHandle<ToastState>;

/// Shows notifications through the toast context
pub struct ToastNotifier {
    dispatcher: UseReducerDispatcher<ToastState>,
}

impl Notifier for ToastNotifier {
    fn notify(&self, notification: Notification) {
        self.dispatcher.dispatch(ToastAction::Push(notification));
    }
}

/// Fallback when rendered outside a [`ToastProvider`]: notifications go to the log
struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Error => error!("{}: {}", notification.title, notification.message),
            NotificationKind::Info | NotificationKind::Success => {
                info!("{}: {}", notification.title, notification.message)
            }
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct ToastProviderProps {
    pub children: Children,
}

#[function_component(ToastProvider)]
pub fn toast_provider(props: &ToastProviderProps) -> Html {
    let toasts = use_reducer(ToastState::default);

    html! {
        <ContextProvider<ToastContext> context={toasts}>
            {props.children.clone()}
            <ToastContainer />
        </ContextProvider<ToastContext>>
    }
}

#[hook]
pub fn use_notifier() -> Rc<dyn Notifier> {
    match use_context::<ToastContext>() {
        Some(context) => Rc::new(ToastNotifier {
            dispatcher: context.dispatcher(),
        }),
        None => {
            warn!("No toast context; notifications will only be logged");
            Rc::new(LogNotifier)
        }
    }
}
