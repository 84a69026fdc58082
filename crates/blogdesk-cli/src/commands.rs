//! Command handlers. Results are printed to stdout as pretty JSON.

use crate::{
    AdminCategoriesCommand, AdminCommand, AdminPostsCommand, AdminUsersCommand,
    CategoriesCommand, CategoryFields, Command, ConfigCommand, CredentialArgs, PostFields,
    PostsCommand,
};
use anyhow::{bail, Context, Result};
use blogdesk_client::{ApiClient, CategoryPayload, Credentials, PostPayload};
use blogdesk_common::FileStore;
use serde::Serialize;
use tracing::info;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

impl From<CredentialArgs> for Credentials {
    fn from(args: CredentialArgs) -> Self {
        Credentials::new(args.email, args.password)
    }
}

impl From<PostFields> for PostPayload {
    fn from(fields: PostFields) -> Self {
        PostPayload {
            title: fields.title,
            body: fields.body,
            category_id: fields.category_id,
        }
    }
}

impl From<CategoryFields> for CategoryPayload {
    fn from(fields: CategoryFields) -> Self {
        CategoryPayload {
            title: fields.title,
            description: fields.description,
        }
    }
}

pub async fn run(client: &ApiClient, command: Command) -> Result<()> {
    match command {
        Command::Login(args) => {
            let grant = client.login(&args.into()).await.context("login failed")?;
            info!("Signed in as {}", grant.user.email);
            print_json(&grant.user)
        }
        Command::Register(args) => {
            let grant = client
                .register(&args.into())
                .await
                .context("registration failed")?;
            info!("Registered {}", grant.user.email);
            print_json(&grant.user)
        }
        Command::Logout => {
            client.logout();
            info!("Session cleared");
            Ok(())
        }
        Command::Whoami => print_json(&client.get_me().await?),
        Command::Refresh => {
            if !client.refresh().await {
                bail!("no session to refresh; sign in again");
            }
            match client.session().user() {
                Some(user) => print_json(&user),
                None => Ok(()),
            }
        }
        Command::Posts { command } => posts(client, command).await,
        Command::Categories { command } => categories(client, command).await,
        Command::Admin { command } => admin(client, command).await,
        // Handled before a client is built.
        Command::Config { .. } => Ok(()),
    }
}

async fn posts(client: &ApiClient, command: PostsCommand) -> Result<()> {
    match command {
        PostsCommand::List => print_json(&client.list_posts().await?),
        PostsCommand::Show { id } => print_json(&client.read_post(&id).await?),
    }
}

async fn categories(client: &ApiClient, command: CategoriesCommand) -> Result<()> {
    match command {
        CategoriesCommand::List => print_json(&client.list_categories().await?),
        CategoriesCommand::Show { id } => print_json(&client.read_category(&id).await?),
        CategoriesCommand::Posts { id } => print_json(&client.list_category_posts(&id).await?),
    }
}

async fn admin(client: &ApiClient, command: AdminCommand) -> Result<()> {
    match command {
        AdminCommand::Posts { command } => match command {
            AdminPostsCommand::List => print_json(&client.admin_list_posts().await?),
            AdminPostsCommand::Show { id } => print_json(&client.admin_get_post(&id).await?),
            AdminPostsCommand::Create(fields) => {
                print_json(&client.admin_create_post(&fields.into()).await?)
            }
            AdminPostsCommand::Update { id, fields } => {
                print_json(&client.admin_update_post(&id, &fields.into()).await?)
            }
            AdminPostsCommand::Delete { id } => {
                client.admin_delete_post(&id).await?;
                info!("Deleted post {}", id);
                Ok(())
            }
        },
        AdminCommand::Categories { command } => match command {
            AdminCategoriesCommand::List => print_json(&client.admin_list_categories().await?),
            AdminCategoriesCommand::Show { id } => {
                print_json(&client.admin_get_category(&id).await?)
            }
            AdminCategoriesCommand::Create(fields) => {
                print_json(&client.admin_create_category(&fields.into()).await?)
            }
            AdminCategoriesCommand::Update { id, fields } => {
                print_json(&client.admin_update_category(&id, &fields.into()).await?)
            }
            AdminCategoriesCommand::Delete { id } => {
                client.admin_delete_category(&id).await?;
                info!("Deleted category {}", id);
                Ok(())
            }
        },
        AdminCommand::Users { command } => match command {
            AdminUsersCommand::List { page, page_size } => {
                print_json(&client.admin_list_users(page, page_size).await?)
            }
            AdminUsersCommand::Show { id } => print_json(&client.admin_get_user(&id).await?),
            AdminUsersCommand::Role { id, role } => {
                print_json(&client.admin_update_user_role(&id, role).await?)
            }
            AdminUsersCommand::Delete { id } => {
                client.admin_delete_user(&id).await?;
                info!("Deleted user {}", id);
                Ok(())
            }
        },
    }
}

pub fn config(command: &ConfigCommand, store: &FileStore, flag_base: Option<&str>) -> Result<()> {
    match command {
        ConfigCommand::SetApiBase { url } => {
            let url = url.trim();
            blogdesk_client::ClientConfig::new(url).validate()?;
            blogdesk_common::save_api_base(store, url)?;
            info!("API base set to {}", url);
            Ok(())
        }
        ConfigCommand::Show => {
            let stored = blogdesk_common::api_base(store);
            print_json(&serde_json::json!({
                "apiBase": flag_base.unwrap_or(&stored),
                "storedApiBase": stored,
                "store": store.path().display().to_string(),
            }))
        }
    }
}
