use anyhow::{Context, Result};
use blogdesk_client::{ApiClient, ClientConfig, Role, SessionStore};
use blogdesk_common::{BlobStore, FileStore};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "blogdesk")]
#[command(about = "Blogdesk API client")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// API base URL (overrides the stored apiBase)
    #[arg(long, env = "BLOGDESK_API_BASE", global = true)]
    api_base: Option<String>,

    /// Session file (default: <config dir>/blogdesk/storage.json)
    #[arg(long, env = "BLOGDESK_STORE", global = true)]
    store: Option<PathBuf>,

    /// Log every request and response
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and keep the session
    Login(CredentialArgs),
    /// Create an account and sign in
    Register(CredentialArgs),
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Renew the access token from the refresh cookie
    Refresh,
    /// Public posts
    Posts {
        #[command(subcommand)]
        command: PostsCommand,
    },
    /// Public categories
    Categories {
        #[command(subcommand)]
        command: CategoriesCommand,
    },
    /// Administration (requires an ADMIN session)
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
    /// Local settings
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(clap::Args, Debug)]
struct CredentialArgs {
    #[arg(short, long)]
    email: String,
    #[arg(short, long, env = "BLOGDESK_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Subcommand, Debug)]
enum PostsCommand {
    List,
    Show { id: String },
}

#[derive(Subcommand, Debug)]
enum CategoriesCommand {
    List,
    Show { id: String },
    /// Posts filed under a category
    Posts { id: String },
}

#[derive(Subcommand, Debug)]
enum AdminCommand {
    Posts {
        #[command(subcommand)]
        command: AdminPostsCommand,
    },
    Categories {
        #[command(subcommand)]
        command: AdminCategoriesCommand,
    },
    Users {
        #[command(subcommand)]
        command: AdminUsersCommand,
    },
}

#[derive(clap::Args, Debug)]
struct PostFields {
    #[arg(long)]
    title: String,
    /// HTML body
    #[arg(long, default_value = "")]
    body: String,
    #[arg(long = "category")]
    category_id: u64,
}

#[derive(clap::Args, Debug)]
struct CategoryFields {
    #[arg(long)]
    title: String,
    #[arg(long, default_value = "")]
    description: String,
}

#[derive(Subcommand, Debug)]
enum AdminPostsCommand {
    List,
    Show { id: String },
    Create(PostFields),
    Update {
        id: String,
        #[command(flatten)]
        fields: PostFields,
    },
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum AdminCategoriesCommand {
    List,
    Show { id: String },
    Create(CategoryFields),
    Update {
        id: String,
        #[command(flatten)]
        fields: CategoryFields,
    },
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum AdminUsersCommand {
    List {
        #[arg(long, default_value_t = blogdesk_client::DEFAULT_PAGE)]
        page: u32,
        #[arg(long, default_value_t = blogdesk_client::DEFAULT_PAGE_SIZE)]
        page_size: u32,
    },
    Show { id: String },
    /// Set a user's role (USER or ADMIN)
    Role { id: String, role: Role },
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Persist the API base used when --api-base is not given
    SetApiBase { url: String },
    /// Print the effective settings
    Show,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "blogdesk=debug" } else { "blogdesk=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_store(path: Option<PathBuf>) -> Result<Arc<FileStore>> {
    let store = match path {
        Some(path) => FileStore::open(path),
        None => FileStore::open_default()?,
    };
    Ok(Arc::new(store))
}

fn build_client(cli: &Cli, store: Arc<FileStore>) -> Result<ApiClient> {
    let mut config = match &cli.api_base {
        Some(base) => ClientConfig::new(base.clone()),
        None => ClientConfig::from_store(store.as_ref()),
    };
    config.enable_logging = cli.verbose;

    let session = SessionStore::load(store as Arc<dyn BlobStore>);
    ApiClient::new(config, session).context("invalid client configuration")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let store = open_store(cli.store.clone())?;
    info!("Using session file {}", store.path().display());

    if let Command::Config { command } = &cli.command {
        return commands::config(command, store.as_ref(), cli.api_base.as_deref());
    }

    let client = build_client(&cli, store)?;
    commands::run(&client, cli.command).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_admin_post_update() {
        let cli = Cli::try_parse_from([
            "blogdesk",
            "--api-base",
            "https://blog.example",
            "admin",
            "posts",
            "update",
            "7",
            "--title",
            "Hello",
            "--category",
            "3",
        ])
        .unwrap();

        assert_eq!(cli.api_base.as_deref(), Some("https://blog.example"));
        match cli.command {
            Command::Admin {
                command:
                    AdminCommand::Posts {
                        command: AdminPostsCommand::Update { id, fields },
                    },
            } => {
                assert_eq!(id, "7");
                assert_eq!(fields.title, "Hello");
                assert_eq!(fields.body, "");
                assert_eq!(fields.category_id, 3);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_role_case_insensitively() {
        let cli = Cli::try_parse_from(["blogdesk", "admin", "users", "role", "4", "admin"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Admin {
                command: AdminCommand::Users {
                    command: AdminUsersCommand::Role { role: Role::Admin, .. }
                }
            }
        ));

        assert!(Cli::try_parse_from(["blogdesk", "admin", "users", "role", "4", "root"]).is_err());
    }

    #[test]
    fn test_user_list_defaults() {
        let cli = Cli::try_parse_from(["blogdesk", "admin", "users", "list"]).unwrap();
        match cli.command {
            Command::Admin {
                command:
                    AdminCommand::Users {
                        command: AdminUsersCommand::List { page, page_size },
                    },
            } => assert_eq!((page, page_size), (0, 50)),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_build_client_prefers_flag_over_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(Some(dir.path().join("storage.json"))).unwrap();
        blogdesk_common::save_api_base(store.as_ref(), "http://stored:9000").unwrap();

        let cli = Cli::try_parse_from(["blogdesk", "whoami"]).unwrap();
        let client = build_client(&cli, store.clone()).unwrap();
        assert_eq!(client.config().api_base, "http://stored:9000");

        let cli =
            Cli::try_parse_from(["blogdesk", "--api-base", "http://flag:1", "-v", "whoami"]).unwrap();
        let client = build_client(&cli, store).unwrap();
        assert_eq!(client.config().api_base, "http://flag:1");
        assert!(client.config().enable_logging);
    }
}
