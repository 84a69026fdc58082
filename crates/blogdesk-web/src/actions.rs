//! `data-action` vocabulary and the mutations behind it.

use crate::error::{WebError, WebResult};
use crate::page::{field, EventKind, FormFields};
use blogdesk_client::{CategoryPayload, PostPayload, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    DeletePost,
    DeleteCategory,
    DeleteUser,
    PromoteUser,
    RestrictUser,
    CreatePost,
    CreateCategory,
    SubmitPost,
    SubmitCategory,
}

impl ActionKind {
    pub const ALL: [ActionKind; 9] = [
        ActionKind::DeletePost,
        ActionKind::DeleteCategory,
        ActionKind::DeleteUser,
        ActionKind::PromoteUser,
        ActionKind::RestrictUser,
        ActionKind::CreatePost,
        ActionKind::CreateCategory,
        ActionKind::SubmitPost,
        ActionKind::SubmitCategory,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::DeletePost => "admin-delete-post",
            ActionKind::DeleteCategory => "admin-delete-category",
            ActionKind::DeleteUser => "admin-delete-user",
            ActionKind::PromoteUser => "admin-promote-user",
            ActionKind::RestrictUser => "admin-restrict-user",
            ActionKind::CreatePost => "admin-create-post",
            ActionKind::CreateCategory => "admin-create-category",
            ActionKind::SubmitPost => "submit-post",
            ActionKind::SubmitCategory => "submit-category",
        }
    }

    pub fn event(&self) -> EventKind {
        match self {
            ActionKind::SubmitPost | ActionKind::SubmitCategory => EventKind::Submit,
            _ => EventKind::Click,
        }
    }

    /// Form actions read their payload from the bound element.
    pub fn reads_form(&self) -> bool {
        self.event() == EventKind::Submit
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved user intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    DeletePost(String),
    DeleteCategory(String),
    DeleteUser(String),
    SetRole { id: String, role: Role },
    CreatePost,
    CreateCategory,
    SavePost { id: Option<String>, payload: PostPayload },
    SaveCategory { id: Option<String>, payload: CategoryPayload },
}

impl Action {
    /// Build the action for an element tagged `kind` with optional `data-id`
    /// and, for forms, the submitted fields.
    pub fn from_target(kind: ActionKind, id: Option<String>, fields: &FormFields) -> WebResult<Self> {
        let require_id = |id: Option<String>| id.ok_or(WebError::MissingId(kind.as_str()));

        Ok(match kind {
            ActionKind::DeletePost => Action::DeletePost(require_id(id)?),
            ActionKind::DeleteCategory => Action::DeleteCategory(require_id(id)?),
            ActionKind::DeleteUser => Action::DeleteUser(require_id(id)?),
            ActionKind::PromoteUser => Action::SetRole {
                id: require_id(id)?,
                role: Role::Admin,
            },
            ActionKind::RestrictUser => Action::SetRole {
                id: require_id(id)?,
                role: Role::User,
            },
            ActionKind::CreatePost => Action::CreatePost,
            ActionKind::CreateCategory => Action::CreateCategory,
            ActionKind::SubmitPost => {
                let raw = field(fields, "categoryId");
                let category_id = raw
                    .trim()
                    .parse()
                    .map_err(|_| WebError::InvalidCategory(raw.clone()))?;
                Action::SavePost {
                    id,
                    payload: PostPayload {
                        title: field(fields, "title"),
                        body: field(fields, "body"),
                        category_id,
                    },
                }
            }
            ActionKind::SubmitCategory => Action::SaveCategory {
                id,
                payload: CategoryPayload {
                    title: field(fields, "title"),
                    description: field(fields, "description"),
                },
            },
        })
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Action::DeletePost(_) => ActionKind::DeletePost,
            Action::DeleteCategory(_) => ActionKind::DeleteCategory,
            Action::DeleteUser(_) => ActionKind::DeleteUser,
            Action::SetRole { role: Role::Admin, .. } => ActionKind::PromoteUser,
            Action::SetRole { role: Role::User, .. } => ActionKind::RestrictUser,
            Action::CreatePost => ActionKind::CreatePost,
            Action::CreateCategory => ActionKind::CreateCategory,
            Action::SavePost { .. } => ActionKind::SubmitPost,
            Action::SaveCategory { .. } => ActionKind::SubmitCategory,
        }
    }

    /// Question to confirm before a destructive action runs.
    pub fn confirmation(&self) -> Option<&'static str> {
        match self {
            Action::DeletePost(_) => Some("Delete this post?"),
            Action::DeleteCategory(_) => Some("Delete this category?"),
            Action::DeleteUser(_) => Some("Delete this user?"),
            _ => None,
        }
    }
}
