use gloo::history::{BrowserHistory, History, HistoryListener};
use shared::Screen;
use yew::prelude::*;

use crate::services::logging::Logger;

/// Screen for the address the history currently points at
pub fn current_screen(history: &BrowserHistory) -> Screen {
    Screen::for_location(history.location().path())
}

/// Report the screen on every history change, pushes and back/forward alike.
///
/// Listening stops when the returned listener is dropped.
pub fn listen_for_screen(history: &BrowserHistory, on_change: Callback<Screen>) -> HistoryListener {
    let reader = history.clone();
    history.listen(move || on_change.emit(current_screen(&reader)))
}

pub struct UseScreenResult {
    pub screen: Screen,
    pub navigate: Callback<Screen>,
}

/// Current screen, kept in step with the address bar
#[hook]
pub fn use_screen() -> UseScreenResult {
    let screen = use_state(|| current_screen(&BrowserHistory::new()));

    {
        let screen = screen.clone();
        use_effect_with((), move |_| {
            let listener = listen_for_screen(
                &BrowserHistory::new(),
                Callback::from(move |next: Screen| screen.set(next)),
            );
            move || drop(listener)
        });
    }

    let navigate = {
        let screen = screen.clone();
        Callback::from(move |next: Screen| {
            Logger::info_with_component("shell", &format!("Navigating to {}", next.path()));
            BrowserHistory::new().push(next.path());
            screen.set(next);
        })
    };

    UseScreenResult {
        screen: *screen,
        navigate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_listener_follows_history_changes() {
        let history = BrowserHistory::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let listener = {
            let seen = seen.clone();
            listen_for_screen(&history, Callback::from(move |screen| seen.borrow_mut().push(screen)))
        };

        history.push("/waiting");
        assert_eq!(current_screen(&history), Screen::Waiting);
        history.push("/");
        history.push("/nowhere");
        assert_eq!(
            *seen.borrow(),
            vec![Screen::Waiting, Screen::SignIn, Screen::SignIn]
        );

        drop(listener);
        history.push("/profile");
        assert_eq!(seen.borrow().len(), 3);
        assert_eq!(current_screen(&history), Screen::Profile);

        history.push("/");
    }
}
