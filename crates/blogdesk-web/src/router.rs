//! Hash routes and render sequencing.

use std::cell::Cell;
use std::collections::BTreeMap;

/// Whether an admin editor creates a new item or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditMode {
    Create,
    Edit(String),
}

impl EditMode {
    /// Digits-only segments select an item; anything else (including `new`
    /// or nothing at all) means create.
    pub fn from_segment(segment: Option<&str>) -> Self {
        match segment {
            Some(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
                EditMode::Edit(s.to_string())
            }
            _ => EditMode::Create,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            EditMode::Create => None,
            EditMode::Edit(id) => Some(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Categories,
    AdminPosts,
    AdminCategories,
    AdminUsers,
    PostDetail(String),
    CategoryDetail(String),
    AdminPostEdit(EditMode),
    AdminCategoryEdit(EditMode),
    NotFound,
}

/// Exact paths first, then the parameterized prefixes.
#[derive(Debug, Clone)]
pub struct RouteTable {
    exact: BTreeMap<&'static str, Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self {
            exact: BTreeMap::new(),
        }
    }

    /// The table used by the app.
    pub fn standard() -> Self {
        let mut table = Self::new();
        table.add("/", Route::Home);
        table.add("/categories", Route::Categories);
        table.add("/admin/posts", Route::AdminPosts);
        table.add("/admin/categories", Route::AdminCategories);
        table.add("/admin/users", Route::AdminUsers);
        table
    }

    pub fn add(&mut self, path: &'static str, route: Route) {
        self.exact.insert(path, route);
    }

    pub fn resolve(&self, path: &str) -> Route {
        if let Some(route) = self.exact.get(path) {
            return route.clone();
        }

        if let Some(rest) = path.strip_prefix("/posts/") {
            return match first_segment(rest) {
                Some(id) => Route::PostDetail(id.to_string()),
                None => Route::NotFound,
            };
        }
        if let Some(rest) = path.strip_prefix("/categories/") {
            return match first_segment(rest) {
                Some(id) => Route::CategoryDetail(id.to_string()),
                None => Route::NotFound,
            };
        }
        if let Some(rest) = path.strip_prefix("/admin/posts/") {
            return Route::AdminPostEdit(EditMode::from_segment(first_segment(rest)));
        }
        if let Some(rest) = path.strip_prefix("/admin/categories/") {
            return Route::AdminCategoryEdit(EditMode::from_segment(first_segment(rest)));
        }

        Route::NotFound
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn first_segment(rest: &str) -> Option<&str> {
    rest.split('/').next().filter(|s| !s.is_empty())
}

/// Route path for a `location.hash` value: leading `#` dropped, `/` when empty.
pub fn path_from_hash(hash: &str) -> &str {
    let path = hash.strip_prefix('#').unwrap_or(hash);
    if path.is_empty() {
        "/"
    } else {
        path
    }
}

/// Monotonic render tickets. Only the newest ticket may commit.
#[derive(Debug, Default)]
pub struct RenderSequence {
    latest: Cell<u64>,
}

impl RenderSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> u64 {
        let next = self.latest.get() + 1;
        self.latest.set(next);
        next
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.latest.get() == ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_routes() {
        let table = RouteTable::standard();
        assert_eq!(table.resolve("/"), Route::Home);
        assert_eq!(table.resolve("/categories"), Route::Categories);
        assert_eq!(table.resolve("/admin/posts"), Route::AdminPosts);
        assert_eq!(table.resolve("/admin/categories"), Route::AdminCategories);
        assert_eq!(table.resolve("/admin/users"), Route::AdminUsers);
    }

    #[test]
    fn test_admin_editor_modes() {
        let table = RouteTable::standard();
        assert_eq!(
            table.resolve("/admin/posts/42"),
            Route::AdminPostEdit(EditMode::Edit("42".into()))
        );
        assert_eq!(table.resolve("/admin/posts/new"), Route::AdminPostEdit(EditMode::Create));
        assert_eq!(table.resolve("/admin/posts/abc"), Route::AdminPostEdit(EditMode::Create));
        assert_eq!(table.resolve("/admin/posts/"), Route::AdminPostEdit(EditMode::Create));
        assert_eq!(
            table.resolve("/admin/categories/7/extra"),
            Route::AdminCategoryEdit(EditMode::Edit("7".into()))
        );
        assert_eq!(
            table.resolve("/admin/categories/-1"),
            Route::AdminCategoryEdit(EditMode::Create)
        );
    }

    #[test]
    fn test_detail_routes() {
        let table = RouteTable::standard();
        assert_eq!(table.resolve("/posts/5"), Route::PostDetail("5".into()));
        assert_eq!(table.resolve("/posts/slug-ish"), Route::PostDetail("slug-ish".into()));
        assert_eq!(table.resolve("/categories/3"), Route::CategoryDetail("3".into()));
        assert_eq!(table.resolve("/posts/"), Route::NotFound);
        assert_eq!(table.resolve("/categories/"), Route::NotFound);
    }

    #[test]
    fn test_unknown_paths() {
        let table = RouteTable::standard();
        assert_eq!(table.resolve("/nope"), Route::NotFound);
        assert_eq!(table.resolve("/admin"), Route::NotFound);
        assert_eq!(table.resolve("/posts"), Route::NotFound);
        assert_eq!(RouteTable::new().resolve("/"), Route::NotFound);
    }

    #[test]
    fn test_path_from_hash() {
        assert_eq!(path_from_hash(""), "/");
        assert_eq!(path_from_hash("#"), "/");
        assert_eq!(path_from_hash("#/admin/users"), "/admin/users");
        assert_eq!(path_from_hash("/categories"), "/categories");
    }

    #[test]
    fn test_render_sequence_only_latest_is_current() {
        let seq = RenderSequence::new();
        let first = seq.begin();
        let second = seq.begin();
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
    }
}
