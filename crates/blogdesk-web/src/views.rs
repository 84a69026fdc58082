//! Markup for every route.
//!
//! Views never fail: API errors turn into an inline error card.

use crate::markup::{escape_attr, escape_html, sanitize_html};
use crate::router::{EditMode, Route};
use blogdesk_client::{ApiClient, Category, ClientError, Post, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};

/// Markup for `route`.
pub async fn render(client: &ApiClient, route: &Route) -> String {
    match route {
        Route::Home => home(client).await,
        Route::Categories => categories(client).await,
        Route::CategoryDetail(id) => category_detail(client, id).await,
        Route::PostDetail(id) => post_detail(client, id).await,
        Route::AdminPosts => admin_posts(client).await,
        Route::AdminPostEdit(mode) => admin_post_edit(client, mode).await,
        Route::AdminCategories => admin_categories(client).await,
        Route::AdminCategoryEdit(mode) => admin_category_edit(client, mode).await,
        Route::AdminUsers => admin_users(client).await,
        Route::NotFound => not_found(),
    }
}

pub fn not_found() -> String {
    r#"<div class="card">Page not found</div>"#.to_string()
}

fn error_card(heading: Option<&str>, err: &ClientError) -> String {
    let heading = heading
        .map(|h| format!("<h2>{}</h2>", escape_html(h)))
        .unwrap_or_default();
    format!(
        r#"<div class="card">{}<p class="error">Error: {}</p></div>"#,
        heading,
        escape_html(&err.message())
    )
}

fn category_badge(category: Option<&Category>) -> String {
    let title = category.map(|c| c.title.as_str()).unwrap_or("—");
    format!(r#"<span class="badge">{}</span>"#, escape_html(title))
}

fn post_card(post: &Post, category: Option<&Category>) -> String {
    format!(
        r##"<div class="card">
  <h3>{title}</h3>
  <p class="muted">Category: {badge}</p>
  <div class="actions"><a href="#/posts/{id}" class="btn">Read</a></div>
</div>"##,
        title = escape_html(&post.title),
        badge = category_badge(category.or(post.category.as_ref())),
        id = post.id,
    )
}

pub async fn home(client: &ApiClient) -> String {
    let posts = match client.list_posts().await {
        Ok(posts) => posts,
        Err(e) => {
            return format!(
                r#"<div class="card">
  <h2>Posts</h2>
  <p class="error">Could not load posts. {}</p>
  <p><small>If the API is closed, sign in or register.</small></p>
</div>"#,
                escape_html(&e.message())
            )
        }
    };

    let cards: String = posts.iter().map(|p| post_card(p, None)).collect();
    format!(
        r#"<div><div class="card"><h2>Posts</h2></div><div class="grid">{}</div></div>"#,
        cards
    )
}

pub async fn categories(client: &ApiClient) -> String {
    let categories = match client.list_categories().await {
        Ok(categories) => categories,
        Err(e) => return error_card(Some("Categories"), &e),
    };

    let cards: String = categories
        .iter()
        .map(|c| {
            format!(
                r##"<div class="card">
  <h3>{}</h3>
  <p>{}</p>
  <a href="#/categories/{}" class="btn muted">Details</a>
</div>"##,
                escape_html(&c.title),
                escape_html(&c.description),
                c.id
            )
        })
        .collect();
    format!(
        r#"<div><div class="card"><h2>Categories</h2></div><div class="grid">{}</div></div>"#,
        cards
    )
}

pub async fn category_detail(client: &ApiClient, id: &str) -> String {
    let category = match client.read_category(id).await {
        Ok(category) => category,
        Err(e) => return error_card(None, &e),
    };
    let posts = match client.list_category_posts(id).await {
        Ok(posts) => posts,
        Err(e) => return error_card(None, &e),
    };

    let cards: String = posts.iter().map(|p| post_card(p, Some(&category))).collect();
    format!(
        r#"<div class="card"><h3>{}</h3><p>{}</p></div><div class="grid">{}</div>"#,
        escape_html(&category.title),
        escape_html(&category.description),
        cards
    )
}

pub async fn post_detail(client: &ApiClient, id: &str) -> String {
    match client.read_post(id).await {
        Ok(post) => format!(
            r#"<article class="card">
  <h2>{}</h2>
  <p class="muted">{}</p>
  <div>{}</div>
</article>"#,
            escape_html(&post.title),
            category_badge(post.category.as_ref()),
            sanitize_html(&post.body)
        ),
        Err(e) => error_card(None, &e),
    }
}

fn excerpt(body: &str, limit: usize) -> String {
    let mut chars = body.chars();
    let head: String = chars.by_ref().take(limit).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

pub async fn admin_posts(client: &ApiClient) -> String {
    let posts = match client.admin_list_posts().await {
        Ok(posts) => posts,
        Err(e) => return error_card(None, &e),
    };

    let rows: String = posts
        .iter()
        .map(|p| {
            format!(
                r##"<tr>
  <td>{id}</td>
  <td>{title}</td>
  <td>{excerpt}</td>
  <td class="actions">
    <a href="#/admin/posts/{id}">Edit</a>
    <button data-action="admin-delete-post" data-id="{id}" class="danger">Delete</button>
  </td>
</tr>"##,
                id = p.id,
                title = escape_html(&p.title),
                excerpt = escape_html(&excerpt(&p.body, 10)),
            )
        })
        .collect();
    format!(
        r#"<div>
<div class="card actions"><button data-action="admin-create-post">New post</button></div>
<table class="table card">
<thead><tr><th>ID</th><th>Title</th><th>Body</th><th></th></tr></thead>
<tbody>{}</tbody>
</table>
</div>"#,
        rows
    )
}

pub async fn admin_post_edit(client: &ApiClient, mode: &EditMode) -> String {
    // A missing category list still leaves a usable form.
    let categories = client.admin_list_categories().await.unwrap_or_else(|e| {
        tracing::warn!("Category list unavailable for post editor: {}", e);
        Vec::new()
    });

    let post = match mode.id() {
        Some(id) => match client.admin_get_post(id).await {
            Ok(post) => Some(post),
            Err(e) => return error_card(None, &e),
        },
        None => None,
    };

    let selected = post.as_ref().and_then(|p| p.category.as_ref()).map(|c| c.id);
    let options: String = categories
        .iter()
        .map(|c| {
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                c.id,
                if selected == Some(c.id) { " selected" } else { "" },
                escape_html(&c.title)
            )
        })
        .collect();

    let (heading, submit) = match mode {
        EditMode::Edit(_) => ("Edit post", "Save"),
        EditMode::Create => ("New post", "Create"),
    };
    let title = post.as_ref().map(|p| p.title.as_str()).unwrap_or("");
    let body = post.as_ref().map(|p| p.body.as_str()).unwrap_or("");

    format!(
        r##"<div class="card">
<h2>{heading}</h2>
<form id="formPost" data-action="submit-post" data-id="{id}">
  <label>Title <input name="title" required value="{title}"/></label>
  <label>Body (HTML) <textarea name="body" rows="8">{body}</textarea></label>
  <label>Category <select name="categoryId" required>{options}</select></label>
  <div class="actions">
    <button type="submit">{submit}</button>
    <a href="#/admin/posts">Back</a>
  </div>
</form>
</div>"##,
        heading = heading,
        id = escape_attr(mode.id().unwrap_or("")),
        title = escape_attr(title),
        body = escape_html(body),
        options = options,
        submit = submit,
    )
}

pub async fn admin_categories(client: &ApiClient) -> String {
    let categories = match client.admin_list_categories().await {
        Ok(categories) => categories,
        Err(e) => return error_card(None, &e),
    };

    let rows: String = categories
        .iter()
        .map(|c| {
            format!(
                r##"<tr>
  <td>{id}</td>
  <td>{title}</td>
  <td><small>{description}</small></td>
  <td class="actions">
    <a href="#/admin/categories/{id}">Edit</a>
    <button data-action="admin-delete-category" data-id="{id}" class="danger">Delete</button>
  </td>
</tr>"##,
                id = c.id,
                title = escape_html(&c.title),
                description = escape_html(&c.description),
            )
        })
        .collect();
    format!(
        r#"<div>
<div class="card actions"><button data-action="admin-create-category">New category</button></div>
<table class="table card">
<thead><tr><th>ID</th><th>Title</th><th>Description</th><th></th></tr></thead>
<tbody>{}</tbody>
</table>
</div>"#,
        rows
    )
}

pub async fn admin_category_edit(client: &ApiClient, mode: &EditMode) -> String {
    let category = match mode.id() {
        Some(id) => match client.admin_get_category(id).await {
            Ok(category) => Some(category),
            Err(e) => return error_card(None, &e),
        },
        None => None,
    };

    let (heading, submit) = match mode {
        EditMode::Edit(_) => ("Edit category", "Save"),
        EditMode::Create => ("New category", "Create"),
    };
    let title = category.as_ref().map(|c| c.title.as_str()).unwrap_or("");
    let description = category.as_ref().map(|c| c.description.as_str()).unwrap_or("");

    format!(
        r##"<div class="card">
<h2>{heading}</h2>
<form id="formCategory" data-action="submit-category" data-id="{id}">
  <label>Title <input name="title" required value="{title}"/></label>
  <label>Description <textarea name="description" rows="5">{description}</textarea></label>
  <div class="actions">
    <button type="submit">{submit}</button>
    <a href="#/admin/categories">Back</a>
  </div>
</form>
</div>"##,
        heading = heading,
        id = escape_attr(mode.id().unwrap_or("")),
        title = escape_attr(title),
        description = escape_html(description),
        submit = submit,
    )
}

pub async fn admin_users(client: &ApiClient) -> String {
    let users = match client.admin_list_users(DEFAULT_PAGE, DEFAULT_PAGE_SIZE).await {
        Ok(users) => users,
        Err(e) => return error_card(None, &e),
    };

    let rows: String = users
        .iter()
        .map(|u| {
            format!(
                r#"<tr>
  <td>{id}</td>
  <td>{email}</td>
  <td>{role}</td>
  <td>{active}</td>
  <td class="actions">
    <button data-action="admin-restrict-user" data-id="{id}">Make USER</button>
    <button data-action="admin-promote-user" data-id="{id}">Make ADMIN</button>
    <button data-action="admin-delete-user" data-id="{id}" class="danger">Delete</button>
  </td>
</tr>"#,
                id = u.id,
                email = escape_html(&u.email),
                role = u.role,
                active = if u.is_active { "yes" } else { "no" },
            )
        })
        .collect();
    format!(
        r#"<div>
<table class="table card">
<thead><tr><th>ID</th><th>Email</th><th>Role</th><th>Active</th><th></th></tr></thead>
<tbody>{}</tbody>
</table>
</div>"#,
        rows
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogdesk_client::mock::MockNetwork;
    use blogdesk_client::{ClientConfig, SessionStore};
    use blogdesk_common::MemoryStore;
    use serde_json::json;
    use std::sync::Arc;

    fn setup() -> (Arc<MockNetwork>, ApiClient) {
        let network = Arc::new(MockNetwork::new());
        let session = SessionStore::load(Arc::new(MemoryStore::new()));
        let client =
            ApiClient::with_network(network.clone(), ClientConfig::default(), session).unwrap();
        (network, client)
    }

    #[test]
    fn test_excerpt() {
        assert_eq!(excerpt("short", 10), "short");
        assert_eq!(excerpt("0123456789", 10), "0123456789");
        assert_eq!(excerpt("0123456789abc", 10), "0123456789...");
        assert_eq!(excerpt("привет мир и все", 6), "привет...");
    }

    #[tokio::test]
    async fn test_home_escapes_titles() {
        let (network, client) = setup();
        network.push_json(
            200,
            json!([{ "id": 1, "title": "<b>x</b>", "category": { "id": 2, "title": "News" } }]),
        );

        let html = render(&client, &Route::Home).await;
        assert!(html.contains("&lt;b&gt;x&lt;/b&gt;"));
        assert!(html.contains(r##"href="#/posts/1""##));
        assert!(html.contains(r#"<span class="badge">News</span>"#));
    }

    #[tokio::test]
    async fn test_home_error_is_escaped() {
        let (network, client) = setup();
        network.push_text(500, "<script>boom</script>");

        let html = home(&client).await;
        assert!(html.contains("Could not load posts. &lt;script&gt;boom&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[tokio::test]
    async fn test_post_detail_sanitizes_body() {
        let (network, client) = setup();
        network.push_json(
            200,
            json!({ "id": 3, "title": "T", "body": "<p onclick=\"x()\">hi</p><script>bad()</script>" }),
        );

        let html = post_detail(&client, "3").await;
        assert!(html.contains("<div><p>hi</p>bad()</div>"));
        assert!(html.contains(r#"<span class="badge">—</span>"#));
    }

    #[tokio::test]
    async fn test_post_detail_body_cut_off_inside_a_tag() {
        let (network, client) = setup();
        network.push_json(
            200,
            json!({ "id": 3, "title": "T", "body": "<p>hi</p><img src=x onerror=alert(1) " }),
        );

        let html = post_detail(&client, "3").await;
        assert!(html.contains("<div><p>hi</p>&lt;img src=x onerror=alert(1) </div>"));
        assert!(!html.contains("<img"));
    }

    #[tokio::test]
    async fn test_category_detail_lists_its_posts() {
        let (network, client) = setup();
        network.push_json(200, json!({ "id": 2, "title": "News", "description": "Daily" }));
        network.push_json(200, json!([{ "id": 9, "title": "Headline" }]));

        let html = render(&client, &Route::CategoryDetail("2".into())).await;
        assert!(html.contains("<h3>News</h3><p>Daily</p>"));
        assert!(html.contains("Headline"));
        assert!(html.contains(r#"<span class="badge">News</span>"#));
        assert!(network.calls()[1].1.ends_with("/api/v1/categories/2/posts"));
    }

    #[tokio::test]
    async fn test_post_editor_create_mode_tolerates_missing_categories() {
        let (network, client) = setup();
        network.push_text(403, "Forbidden");

        let html = render(&client, &Route::AdminPostEdit(EditMode::Create)).await;
        assert!(html.contains("<h2>New post</h2>"));
        assert!(html.contains(r#"data-action="submit-post" data-id="""#));
        assert_eq!(network.request_count(), 1);
    }

    #[tokio::test]
    async fn test_post_editor_edit_mode_selects_category() {
        let (network, client) = setup();
        network.push_json(
            200,
            json!([{ "id": 1, "title": "A" }, { "id": 2, "title": "B" }]),
        );
        network.push_json(
            200,
            json!({ "id": 5, "title": "Say \"hi\"", "body": "<p>x</p>",
                    "category": { "id": 2, "title": "B" } }),
        );

        let html = admin_post_edit(&client, &EditMode::Edit("5".into())).await;
        assert!(html.contains(r#"data-id="5""#));
        assert!(html.contains(r#"value="Say &quot;hi&quot;""#));
        assert!(html.contains("&lt;p&gt;x&lt;/p&gt;</textarea>"));
        assert!(html.contains(r#"<option value="2" selected>B</option>"#));
        assert!(html.contains(r#"<option value="1">A</option>"#));
    }

    #[tokio::test]
    async fn test_admin_users_rows_carry_actions() {
        let (network, client) = setup();
        network.push_json(
            200,
            json!([{ "id": 4, "email": "u@b.c", "role": "USER", "isActive": false }]),
        );

        let html = admin_users(&client).await;
        assert!(html.contains(r#"data-action="admin-promote-user" data-id="4""#));
        assert!(html.contains("<td>no</td>"));
        assert!(network.calls()[0].1.ends_with("?page=0&page_size=50"));
    }

    #[tokio::test]
    async fn test_admin_views_render_error_card() {
        let (network, client) = setup();
        network.push_text(403, "Admin only");

        let html = admin_categories(&client).await;
        assert_eq!(
            html,
            r#"<div class="card"><p class="error">Error: Admin only</p></div>"#
        );
    }

    #[test]
    fn test_not_found() {
        assert!(not_found().contains("Page not found"));
    }
}
