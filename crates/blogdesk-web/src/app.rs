//! Render loop and event wiring.

use crate::actions::{Action, ActionKind};
use crate::error::WebResult;
use crate::page::{
    field, ChromeState, ChromeView, Dialog, EventKind, FormFields, Listener, Page,
    LOGOUT_BUTTON_ID,
};
use crate::router::{path_from_hash, RenderSequence, RouteTable};
use crate::views;
use blogdesk_client::{ApiClient, Credentials, Session};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, info, warn};

/// The front end bound to one page.
///
/// Cheap to clone; event handlers hold only weak references back to it.
pub struct App<P: Page> {
    inner: Rc<AppInner<P>>,
}

struct AppInner<P: Page> {
    page: P,
    client: ApiClient,
    routes: RouteTable,
    sequence: RenderSequence,
    /// Handlers for the markup currently under `#app`.
    bindings: RefCell<Vec<Listener>>,
    /// Header buttons and auth dialogs, bound once.
    chrome_bindings: RefCell<Vec<Listener>>,
}

impl<P: Page> Clone for App<P> {
    fn clone(&self) -> Self {
        App {
            inner: self.inner.clone(),
        }
    }
}

impl<P: Page> App<P> {
    pub fn new(page: P, client: ApiClient) -> Self {
        let chrome = page.chrome();
        client.session().set_listener(move |session: &Session| {
            chrome.update(&ChromeState::from_session(session));
        });

        App {
            inner: Rc::new(AppInner {
                page,
                client,
                routes: RouteTable::standard(),
                sequence: RenderSequence::new(),
                bindings: RefCell::new(Vec::new()),
                chrome_bindings: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn page(&self) -> &P {
        &self.inner.page
    }

    pub fn client(&self) -> &ApiClient {
        &self.inner.client
    }

    /// Restore the session if nothing is stored, wire the header, then draw
    /// the current route.
    pub async fn boot(&self) {
        let client = &self.inner.client;
        if client.session().user().is_none() {
            if client.refresh().await {
                info!("Session restored");
            } else {
                debug!("No session to restore");
            }
        }

        self.refresh_chrome();
        self.bind_chrome();
        self.render().await;
    }

    /// Re-render after the location hash changed.
    pub fn on_hash_change(&self) {
        let app = self.clone();
        self.inner.page.spawn(Box::pin(async move {
            app.render().await;
        }));
    }

    pub fn navigate(&self, hash: &str) {
        self.inner.page.set_location_hash(hash);
    }

    /// Resolve the current hash and draw it.
    ///
    /// Returns false when a newer render started while this one was waiting
    /// on the API; its markup is then discarded.
    pub async fn render(&self) -> bool {
        let inner = &self.inner;
        let ticket = inner.sequence.begin();
        let hash = inner.page.location_hash();
        let path = path_from_hash(&hash);
        let route = inner.routes.resolve(path);
        debug!("Render #{} {} -> {:?}", ticket, path, route);

        let html = views::render(&inner.client, &route).await;

        if !inner.sequence.is_current(ticket) {
            debug!("Discarding stale render #{} of {}", ticket, path);
            return false;
        }

        inner.bindings.borrow_mut().clear();
        inner.page.replace_root(&html);
        self.bind_actions();
        true
    }

    /// Run one action to completion. Failures are logged and alerted.
    pub async fn perform(&self, action: Action) {
        let page = &self.inner.page;
        let kind = action.kind();

        if let Some(question) = action.confirmation() {
            if !page.confirm(question) {
                debug!("{} cancelled", kind);
                return;
            }
        }

        if let Err(e) = self.execute(action).await {
            warn!("{} failed: {}", kind, e);
            page.alert(&format!("Error: {}", e));
        }
    }

    /// Sign in or register from a dialog. On failure the dialog stays open
    /// with the error.
    pub async fn submit_auth(&self, dialog: Dialog, credentials: Credentials) -> bool {
        let client = &self.inner.client;
        let result = match dialog {
            Dialog::Login => client.login(&credentials).await,
            Dialog::Register => client.register(&credentials).await,
        };

        match result {
            Ok(_) => {
                self.inner.page.close_dialog(dialog);
                self.navigate("#/");
                true
            }
            Err(e) => {
                warn!("{:?} failed: {}", dialog, e);
                self.inner
                    .page
                    .set_dialog_error(dialog, &format!("Error: {}", e.message()));
                false
            }
        }
    }

    pub fn logout(&self) {
        self.inner.client.logout();
        self.navigate("#/");
    }

    fn refresh_chrome(&self) {
        let session = self.inner.client.session().snapshot();
        self.inner
            .page
            .chrome()
            .update(&ChromeState::from_session(&session));
    }

    async fn execute(&self, action: Action) -> WebResult<()> {
        let client = &self.inner.client;
        let page = &self.inner.page;

        match action {
            Action::DeletePost(id) => {
                client.admin_delete_post(&id).await?;
                self.navigate("#/admin/posts");
                page.reload();
            }
            Action::DeleteCategory(id) => {
                client.admin_delete_category(&id).await?;
                self.navigate("#/admin/categories");
                page.reload();
            }
            Action::DeleteUser(id) => {
                client.admin_delete_user(&id).await?;
                page.reload();
            }
            Action::SetRole { id, role } => {
                client.admin_update_user_role(&id, role).await?;
                page.alert("Role updated");
                page.reload();
            }
            Action::CreatePost => self.navigate("#/admin/posts/new"),
            Action::CreateCategory => self.navigate("#/admin/categories/new"),
            Action::SavePost { id, payload } => {
                match id {
                    Some(id) => client.admin_update_post(&id, &payload).await?,
                    None => client.admin_create_post(&payload).await?,
                };
                self.navigate("#/admin/posts");
            }
            Action::SaveCategory { id, payload } => {
                match id {
                    Some(id) => client.admin_update_category(&id, &payload).await?,
                    None => client.admin_create_category(&payload).await?,
                };
                self.navigate("#/admin/categories");
            }
        }
        Ok(())
    }

    fn bind_actions(&self) {
        let page = &self.inner.page;
        let targets = page.action_targets();
        let mut listeners = Vec::with_capacity(targets.len());

        for target in targets {
            let Some(kind) = ActionKind::parse(&target.action) else {
                debug!("Ignoring unknown action {:?}", target.action);
                continue;
            };
            let handler = self.action_handler(kind, target.element.clone(), target.id);
            listeners.push(page.listen(&target.element, kind.event(), handler));
        }

        debug!("Bound {} action handlers", listeners.len());
        *self.inner.bindings.borrow_mut() = listeners;
    }

    fn action_handler(
        &self,
        kind: ActionKind,
        element: P::Element,
        id: Option<String>,
    ) -> Rc<dyn Fn()> {
        let weak = Rc::downgrade(&self.inner);
        Rc::new(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let app = App { inner };
            let fields = if kind.reads_form() {
                app.inner.page.form_fields(&element)
            } else {
                FormFields::new()
            };

            match Action::from_target(kind, id.clone(), &fields) {
                Ok(action) => {
                    let task = app.clone();
                    app.inner.page.spawn(Box::pin(async move {
                        task.perform(action).await;
                    }));
                }
                Err(e) => {
                    warn!("Cannot run {}: {}", kind, e);
                    app.inner.page.alert(&format!("Error: {}", e));
                }
            }
        })
    }

    fn bind_chrome(&self) {
        let mut listeners = Vec::new();

        for dialog in [Dialog::Login, Dialog::Register] {
            self.bind_by_id(&mut listeners, dialog.open_button_id(), EventKind::Click, move |app| {
                app.inner.page.open_dialog(dialog)
            });
            self.bind_by_id(&mut listeners, dialog.cancel_id(), EventKind::Click, move |app| {
                app.inner.page.close_dialog(dialog)
            });
            self.bind_by_id(&mut listeners, dialog.form_id(), EventKind::Submit, move |app| {
                app.on_auth_submit(dialog)
            });
        }
        self.bind_by_id(&mut listeners, LOGOUT_BUTTON_ID, EventKind::Click, |app| {
            app.logout()
        });

        *self.inner.chrome_bindings.borrow_mut() = listeners;
    }

    fn bind_by_id(
        &self,
        listeners: &mut Vec<Listener>,
        id: &str,
        event: EventKind,
        run: impl Fn(&App<P>) + 'static,
    ) {
        let Some(element) = self.inner.page.element_by_id(id) else {
            warn!("Page shell has no #{}", id);
            return;
        };
        let weak = Rc::downgrade(&self.inner);
        let handler: Rc<dyn Fn()> = Rc::new(move || {
            if let Some(inner) = weak.upgrade() {
                run(&App { inner });
            }
        });
        listeners.push(self.inner.page.listen(&element, event, handler));
    }

    fn on_auth_submit(&self, dialog: Dialog) {
        let page = &self.inner.page;
        let Some(form) = page.element_by_id(dialog.form_id()) else {
            return;
        };
        let fields = page.form_fields(&form);
        let credentials = Credentials::new(field(&fields, "email"), field(&fields, "password"));

        let app = self.clone();
        page.spawn(Box::pin(async move {
            app.submit_auth(dialog, credentials).await;
        }));
    }
}

impl<P: Page> std::fmt::Debug for App<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("client", &self.inner.client)
            .field("bindings", &self.inner.bindings.borrow().len())
            .finish_non_exhaustive()
    }
}
