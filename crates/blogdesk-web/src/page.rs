//! The document the app draws into.
//!
//! [`Page`] covers every DOM touch point the app needs: the location hash,
//! the `#app` root, `data-action` elements, event listeners, the auth
//! dialogs and the browser's modal prompts. The browser implementation lives
//! in `web.rs`; tests drive the app through an in-memory page.

use blogdesk_client::Session;
use blogdesk_common::MaybeSend;
use futures::future::LocalBoxFuture;
use std::any::Any;
use std::collections::BTreeMap;
use std::rc::Rc;

pub const ROOT_ID: &str = "app";
pub const AUTH_USER_ID: &str = "authUser";
pub const LOGIN_BUTTON_ID: &str = "btnLogin";
pub const REGISTER_BUTTON_ID: &str = "btnRegister";
pub const LOGOUT_BUTTON_ID: &str = "btnLogout";
pub const ADMIN_LINKS_ID: &str = "adminLinks";

/// Submitted form values by field name.
pub type FormFields = BTreeMap<String, String>;

/// Value of `name`, empty when the form did not carry it.
pub fn field(fields: &FormFields, name: &str) -> String {
    fields.get(name).cloned().unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Click,
    Submit,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::Submit => "submit",
        }
    }
}

/// The login and register modals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialog {
    Login,
    Register,
}

impl Dialog {
    pub fn dialog_id(&self) -> &'static str {
        match self {
            Dialog::Login => "dlgLogin",
            Dialog::Register => "dlgRegister",
        }
    }

    pub fn form_id(&self) -> &'static str {
        match self {
            Dialog::Login => "formLogin",
            Dialog::Register => "formRegister",
        }
    }

    pub fn cancel_id(&self) -> &'static str {
        match self {
            Dialog::Login => "cancelLogin",
            Dialog::Register => "cancelRegister",
        }
    }

    pub fn error_id(&self) -> &'static str {
        match self {
            Dialog::Login => "loginError",
            Dialog::Register => "registerError",
        }
    }

    pub fn open_button_id(&self) -> &'static str {
        match self {
            Dialog::Login => LOGIN_BUTTON_ID,
            Dialog::Register => REGISTER_BUTTON_ID,
        }
    }
}

/// An element tagged with `data-action` in rendered markup.
#[derive(Debug, Clone)]
pub struct ActionTarget<E> {
    pub element: E,
    pub action: String,
    /// `data-id`, absent when missing or empty.
    pub id: Option<String>,
}

/// Keeps an event handler attached. Dropping it detaches the handler.
pub struct Listener(#[allow(dead_code)] Box<dyn Any>);

impl Listener {
    pub fn new(binding: impl Any) -> Self {
        Listener(Box::new(binding))
    }
}

impl std::fmt::Debug for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Listener")
    }
}

/// What the header shows for the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChromeState {
    /// `email (ROLE)`, empty when signed out.
    pub user_label: String,
    pub signed_in: bool,
    pub show_admin: bool,
}

impl ChromeState {
    pub fn from_session(session: &Session) -> Self {
        match &session.user {
            Some(user) => ChromeState {
                user_label: format!("{} ({})", user.email, user.role),
                signed_in: true,
                show_admin: user.is_admin(),
            },
            None => ChromeState::default(),
        }
    }
}

/// Header elements that follow the session.
///
/// Handed to the session store as its change listener, so it must satisfy
/// the same thread bounds.
pub trait ChromeView: MaybeSend {
    fn update(&self, state: &ChromeState);
}

pub trait Page: 'static {
    type Element: Clone + 'static;
    type Chrome: ChromeView + 'static;

    fn chrome(&self) -> Self::Chrome;

    fn location_hash(&self) -> String;
    fn set_location_hash(&self, hash: &str);
    fn reload(&self);

    /// Replace the content of `#app`.
    fn replace_root(&self, html: &str);
    /// `data-action` elements currently under `#app`.
    fn action_targets(&self) -> Vec<ActionTarget<Self::Element>>;
    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// Attach `handler` to `event` on `target`. Submit events never reach the
    /// browser's default form handling.
    fn listen(
        &self,
        target: &Self::Element,
        event: EventKind,
        handler: Rc<dyn Fn()>,
    ) -> Listener;
    fn form_fields(&self, form: &Self::Element) -> FormFields;

    fn confirm(&self, message: &str) -> bool;
    fn alert(&self, message: &str);

    fn open_dialog(&self, dialog: Dialog);
    fn close_dialog(&self, dialog: Dialog);
    fn set_dialog_error(&self, dialog: Dialog, message: &str);

    /// Run `task` on the page's event loop.
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogdesk_client::{Role, UserProfile};

    fn user(role: Role) -> UserProfile {
        UserProfile {
            id: 1,
            email: "a@b.c".into(),
            role,
            is_active: true,
            created_at: None,
        }
    }

    #[test]
    fn test_chrome_state_for_admin() {
        let session = Session {
            access_token: Some("t".into()),
            user: Some(user(Role::Admin)),
        };
        let state = ChromeState::from_session(&session);
        assert_eq!(state.user_label, "a@b.c (ADMIN)");
        assert!(state.signed_in);
        assert!(state.show_admin);
    }

    #[test]
    fn test_chrome_state_follows_user_not_token() {
        let session = Session {
            access_token: Some("t".into()),
            user: None,
        };
        assert_eq!(ChromeState::from_session(&session), ChromeState::default());

        let session = Session {
            access_token: None,
            user: Some(user(Role::User)),
        };
        let state = ChromeState::from_session(&session);
        assert!(state.signed_in);
        assert!(!state.show_admin);
    }

    #[test]
    fn test_field_defaults_to_empty() {
        let mut fields = FormFields::new();
        fields.insert("title".into(), "Hi".into());
        assert_eq!(field(&fields, "title"), "Hi");
        assert_eq!(field(&fields, "body"), "");
    }
}
