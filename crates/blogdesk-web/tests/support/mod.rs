//! In-memory page and client fixtures for app flow tests.

#![allow(dead_code)]

use blogdesk_client::mock::MockNetwork;
use blogdesk_client::{ApiClient, AuthUpdate, ClientConfig, Role, SessionStore, UserProfile};
use blogdesk_common::MemoryStore;
use blogdesk_web::{
    ActionTarget, App, ChromeState, ChromeView, Dialog, EventKind, FormFields, Listener, Page,
};
use futures::future::LocalBoxFuture;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::{Rc, Weak};
use std::sync::{Arc, Mutex};

static ACTION_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<\w+[^>]*\bdata-action="([^"]*)"[^>]*>"#).unwrap());
static DATA_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\bdata-id="([^"]*)""#).unwrap());

const SHELL_IDS: &[&str] = &[
    "btnLogin",
    "btnRegister",
    "btnLogout",
    "cancelLogin",
    "cancelRegister",
    "formLogin",
    "formRegister",
];

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FakeElement(pub String);

#[derive(Clone, Default)]
pub struct RecordingChrome {
    pub updates: Arc<Mutex<Vec<ChromeState>>>,
}

impl RecordingChrome {
    pub fn last(&self) -> Option<ChromeState> {
        self.updates.lock().unwrap().last().cloned()
    }
}

impl ChromeView for RecordingChrome {
    fn update(&self, state: &ChromeState) {
        self.updates.lock().unwrap().push(state.clone());
    }
}

struct Registration {
    element: FakeElement,
    event: EventKind,
    handler: Weak<dyn Fn()>,
}

#[derive(Default)]
pub struct PageState {
    pub hash: String,
    pub navigations: Vec<String>,
    pub reloads: usize,
    pub root: String,
    pub root_writes: usize,
    pub confirm_answer: bool,
    pub confirms: Vec<String>,
    pub alerts: Vec<String>,
    pub dialog_log: Vec<String>,
    pub dialog_errors: BTreeMap<&'static str, String>,
    pub forms: BTreeMap<String, FormFields>,
    pub shell_ids: BTreeSet<String>,
    registrations: Vec<Registration>,
    tasks: Vec<LocalBoxFuture<'static, ()>>,
}

pub struct FakePage {
    pub state: RefCell<PageState>,
    pub chrome: RecordingChrome,
}

impl FakePage {
    pub fn new(hash: &str) -> Self {
        let state = PageState {
            hash: hash.to_string(),
            confirm_answer: true,
            shell_ids: SHELL_IDS.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        };
        FakePage {
            state: RefCell::new(state),
            chrome: RecordingChrome::default(),
        }
    }

    pub fn root(&self) -> String {
        self.state.borrow().root.clone()
    }

    pub fn set_hash(&self, hash: &str) {
        self.state.borrow_mut().hash = hash.to_string();
    }

    pub fn answer_confirm(&self, answer: bool) {
        self.state.borrow_mut().confirm_answer = answer;
    }

    pub fn fill_form(&self, element: &FakeElement, pairs: &[(&str, &str)]) {
        let fields = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.state
            .borrow_mut()
            .forms
            .insert(element.0.clone(), fields);
    }

    /// First rendered element tagged with `action`.
    pub fn find_action(&self, action: &str) -> Option<FakeElement> {
        self.action_targets()
            .into_iter()
            .find(|t| t.action == action)
            .map(|t| t.element)
    }

    /// Invoke every live handler for `event` on `element`. Returns how many ran.
    pub fn fire(&self, element: &FakeElement, event: EventKind) -> usize {
        let handlers: Vec<Rc<dyn Fn()>> = self
            .state
            .borrow()
            .registrations
            .iter()
            .filter(|r| &r.element == element && r.event == event)
            .filter_map(|r| r.handler.upgrade())
            .collect();
        for handler in &handlers {
            handler();
        }
        handlers.len()
    }

    pub fn click(&self, id: &str) -> usize {
        self.fire(&FakeElement(id.to_string()), EventKind::Click)
    }

    pub fn total_listeners(&self) -> usize {
        self.state.borrow().registrations.len()
    }

    pub fn live_listeners(&self) -> usize {
        self.state
            .borrow()
            .registrations
            .iter()
            .filter(|r| r.handler.strong_count() > 0)
            .count()
    }

    /// Drive spawned tasks, including ones they spawn, to completion.
    pub async fn run_pending(&self) {
        loop {
            let tasks = std::mem::take(&mut self.state.borrow_mut().tasks);
            if tasks.is_empty() {
                break;
            }
            for task in tasks {
                task.await;
            }
        }
    }
}

impl Page for FakePage {
    type Element = FakeElement;
    type Chrome = RecordingChrome;

    fn chrome(&self) -> RecordingChrome {
        self.chrome.clone()
    }

    fn location_hash(&self) -> String {
        self.state.borrow().hash.clone()
    }

    fn set_location_hash(&self, hash: &str) {
        let mut state = self.state.borrow_mut();
        state.hash = hash.to_string();
        state.navigations.push(hash.to_string());
    }

    fn reload(&self) {
        self.state.borrow_mut().reloads += 1;
    }

    fn replace_root(&self, html: &str) {
        let mut state = self.state.borrow_mut();
        state.root = html.to_string();
        state.root_writes += 1;
    }

    fn action_targets(&self) -> Vec<ActionTarget<FakeElement>> {
        let state = self.state.borrow();
        ACTION_TAG
            .captures_iter(&state.root)
            .enumerate()
            .map(|(index, caps)| {
                let action = caps[1].to_string();
                let id = DATA_ID
                    .captures(&caps[0])
                    .map(|m| m[1].to_string())
                    .filter(|id| !id.is_empty());
                let name = format!("{}[{}]:{}", action, index, id.as_deref().unwrap_or(""));
                ActionTarget {
                    element: FakeElement(name),
                    action,
                    id,
                }
            })
            .collect()
    }

    fn element_by_id(&self, id: &str) -> Option<FakeElement> {
        self.state
            .borrow()
            .shell_ids
            .contains(id)
            .then(|| FakeElement(id.to_string()))
    }

    fn listen(&self, target: &FakeElement, event: EventKind, handler: Rc<dyn Fn()>) -> Listener {
        self.state.borrow_mut().registrations.push(Registration {
            element: target.clone(),
            event,
            handler: Rc::downgrade(&handler),
        });
        Listener::new(handler)
    }

    fn form_fields(&self, form: &FakeElement) -> FormFields {
        self.state
            .borrow()
            .forms
            .get(&form.0)
            .cloned()
            .unwrap_or_default()
    }

    fn confirm(&self, message: &str) -> bool {
        let mut state = self.state.borrow_mut();
        state.confirms.push(message.to_string());
        state.confirm_answer
    }

    fn alert(&self, message: &str) {
        self.state.borrow_mut().alerts.push(message.to_string());
    }

    fn open_dialog(&self, dialog: Dialog) {
        self.state
            .borrow_mut()
            .dialog_log
            .push(format!("open {}", dialog.dialog_id()));
    }

    fn close_dialog(&self, dialog: Dialog) {
        self.state
            .borrow_mut()
            .dialog_log
            .push(format!("close {}", dialog.dialog_id()));
    }

    fn set_dialog_error(&self, dialog: Dialog, message: &str) {
        self.state
            .borrow_mut()
            .dialog_errors
            .insert(dialog.error_id(), message.to_string());
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        self.state.borrow_mut().tasks.push(task);
    }
}

pub fn admin() -> UserProfile {
    UserProfile {
        id: 1,
        email: "admin@blog.dev".into(),
        role: Role::Admin,
        is_active: true,
        created_at: None,
    }
}

pub fn grant_json(token: &str, role: &str) -> serde_json::Value {
    serde_json::json!({
        "accessToken": token,
        "user": { "id": 1, "email": "admin@blog.dev", "role": role, "isActive": true }
    })
}

/// App on `hash` with an empty session.
pub fn app_at(hash: &str) -> (Arc<MockNetwork>, App<FakePage>) {
    let network = Arc::new(MockNetwork::new());
    let session = SessionStore::load(Arc::new(MemoryStore::new()));
    let client =
        ApiClient::with_network(network.clone(), ClientConfig::default(), session).unwrap();
    (network, App::new(FakePage::new(hash), client))
}

/// App on `hash` signed in as an administrator.
pub fn admin_app_at(hash: &str) -> (Arc<MockNetwork>, App<FakePage>) {
    let (network, app) = app_at(hash);
    app.client().session().set_auth(AuthUpdate {
        access_token: Some("tok".into()),
        user: Some(admin()),
    });
    (network, app)
}
