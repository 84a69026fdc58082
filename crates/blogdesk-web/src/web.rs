//! Browser bindings: the real DOM page, `localStorage` and the entry point.

use crate::app::App;
use crate::error::{WebError, WebResult};
use crate::page::{
    ActionTarget, ChromeState, ChromeView, Dialog, EventKind, FormFields, Listener, Page,
    ADMIN_LINKS_ID, AUTH_USER_ID, LOGIN_BUTTON_ID, LOGOUT_BUTTON_ID, REGISTER_BUTTON_ID, ROOT_ID,
};
use blogdesk_client::{ApiClient, ClientConfig, SessionStore};
use blogdesk_common::BlobStore;
use futures::future::LocalBoxFuture;
use std::rc::Rc;
use std::sync::Arc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, FormData, HtmlDialogElement, HtmlFormElement, Storage, Window};

/// `localStorage` key holding `tracing` filter directives.
pub const LOG_FILTER_KEY: &str = "logFilter";

const HIDDEN_CLASS: &str = "hidden";

fn js_message(value: JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}

/// [`BlobStore`] over `window.localStorage`.
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub fn from_window(window: &Window) -> WebResult<Self> {
        let storage = window
            .local_storage()?
            .ok_or_else(|| WebError::JavaScript("localStorage is unavailable".to_string()))?;
        Ok(Self::new(storage))
    }
}

impl BlobStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| anyhow::anyhow!("localStorage write of {} failed: {}", key, js_message(e)))
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| anyhow::anyhow!("localStorage remove of {} failed: {}", key, js_message(e)))
    }
}

/// Removes its event listener when dropped.
struct EventBinding {
    target: Element,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Drop for EventBinding {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

#[derive(Clone)]
pub struct WebChrome {
    document: Document,
}

impl WebChrome {
    fn set_hidden(&self, id: &str, hidden: bool) {
        if let Some(element) = self.document.get_element_by_id(id) {
            let _ = element.class_list().toggle_with_force(HIDDEN_CLASS, hidden);
        }
    }
}

impl ChromeView for WebChrome {
    fn update(&self, state: &ChromeState) {
        if let Some(label) = self.document.get_element_by_id(AUTH_USER_ID) {
            label.set_text_content(Some(&state.user_label));
        }
        self.set_hidden(LOGIN_BUTTON_ID, state.signed_in);
        self.set_hidden(REGISTER_BUTTON_ID, state.signed_in);
        self.set_hidden(LOGOUT_BUTTON_ID, !state.signed_in);
        self.set_hidden(ADMIN_LINKS_ID, !state.show_admin);
    }
}

pub struct WebPage {
    window: Window,
    document: Document,
}

impl WebPage {
    pub fn new(window: Window, document: Document) -> Self {
        Self { window, document }
    }

    fn dialog(&self, dialog: Dialog) -> Option<HtmlDialogElement> {
        self.document
            .get_element_by_id(dialog.dialog_id())
            .and_then(|e| e.dyn_into::<HtmlDialogElement>().ok())
    }
}

impl Page for WebPage {
    type Element = Element;
    type Chrome = WebChrome;

    fn chrome(&self) -> WebChrome {
        WebChrome {
            document: self.document.clone(),
        }
    }

    fn location_hash(&self) -> String {
        self.window.location().hash().unwrap_or_default()
    }

    fn set_location_hash(&self, hash: &str) {
        if let Err(e) = self.window.location().set_hash(hash) {
            tracing::warn!("Failed to set location hash {}: {}", hash, js_message(e));
        }
    }

    fn reload(&self) {
        if let Err(e) = self.window.location().reload() {
            tracing::warn!("Reload failed: {}", js_message(e));
        }
    }

    fn replace_root(&self, html: &str) {
        match self.document.get_element_by_id(ROOT_ID) {
            Some(root) => root.set_inner_html(html),
            None => tracing::error!("Page has no #{} root", ROOT_ID),
        }
    }

    fn action_targets(&self) -> Vec<ActionTarget<Element>> {
        let Some(root) = self.document.get_element_by_id(ROOT_ID) else {
            return Vec::new();
        };
        let Ok(nodes) = root.query_selector_all("[data-action]") else {
            return Vec::new();
        };

        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .filter_map(|element| {
                let action = element.get_attribute("data-action")?;
                let id = element.get_attribute("data-id").filter(|id| !id.is_empty());
                Some(ActionTarget {
                    element,
                    action,
                    id,
                })
            })
            .collect()
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn listen(&self, target: &Element, event: EventKind, handler: Rc<dyn Fn()>) -> Listener {
        let closure = Closure::<dyn FnMut(Event)>::new(move |e: Event| {
            if event == EventKind::Submit {
                e.prevent_default();
            }
            handler();
        });
        if let Err(e) = target
            .add_event_listener_with_callback(event.as_str(), closure.as_ref().unchecked_ref())
        {
            tracing::warn!("Failed to bind {} handler: {}", event.as_str(), js_message(e));
        }
        Listener::new(EventBinding {
            target: target.clone(),
            event: event.as_str(),
            closure,
        })
    }

    fn form_fields(&self, form: &Element) -> FormFields {
        let mut fields = FormFields::new();
        let Some(form) = form.dyn_ref::<HtmlFormElement>() else {
            return fields;
        };
        let Ok(data) = FormData::new_with_form(form) else {
            return fields;
        };
        let Ok(Some(entries)) = js_sys::try_iter(&data) else {
            return fields;
        };

        for entry in entries.flatten() {
            let pair: js_sys::Array = entry.unchecked_into();
            if let (Some(name), Some(value)) = (pair.get(0).as_string(), pair.get(1).as_string()) {
                fields.insert(name, value);
            }
        }
        fields
    }

    fn confirm(&self, message: &str) -> bool {
        self.window.confirm_with_message(message).unwrap_or(false)
    }

    fn alert(&self, message: &str) {
        let _ = self.window.alert_with_message(message);
    }

    fn open_dialog(&self, dialog: Dialog) {
        if let Some(element) = self.dialog(dialog) {
            if let Err(e) = element.show_modal() {
                tracing::warn!("Failed to open #{}: {}", dialog.dialog_id(), js_message(e));
            }
        }
    }

    fn close_dialog(&self, dialog: Dialog) {
        if let Some(element) = self.dialog(dialog) {
            element.close();
        }
    }

    fn set_dialog_error(&self, dialog: Dialog, message: &str) {
        if let Some(slot) = self.document.get_element_by_id(dialog.error_id()) {
            slot.set_text_content(Some(message));
        }
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let store = LocalStorageStore::from_window(&window)?;
    crate::logging::init_logging(store.get(LOG_FILTER_KEY).as_deref());

    let store: Arc<dyn BlobStore> = Arc::new(store);
    let config = ClientConfig::from_store(store.as_ref());
    tracing::info!("Blogdesk starting against {}", config.api_base);

    let client = ApiClient::new(config, SessionStore::load(store))
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let app = App::new(WebPage::new(window.clone(), document), client);

    let on_hash_change = {
        let app = app.clone();
        Closure::<dyn FnMut()>::new(move || app.on_hash_change())
    };
    window.add_event_listener_with_callback("hashchange", on_hash_change.as_ref().unchecked_ref())?;
    // Lives as long as the page.
    on_hash_change.forget();

    wasm_bindgen_futures::spawn_local(async move {
        app.boot().await;
    });
    Ok(())
}
