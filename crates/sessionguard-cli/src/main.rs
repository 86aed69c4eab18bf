//! sessionguard - command-line front end for a bearer-token session.
//!
//! Acts as the hosting application for `SessionGuard`: it owns the request
//! client the guard is registered on, a `visit` command standing in for the
//! router, and explicit login/logout commands.

use std::io;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use sessionguard_core::models::{ProfileUpdate, RegistrationRequest};
use sessionguard_core::{
    ApiClient, Config, NavigationDecision, NavigationTarget, Navigator, SessionGuard, User,
};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ============================================================================
// Constants
// ============================================================================

/// Prefix for rolling log files when `log_dir` is configured
const LOG_FILE_PREFIX: &str = "sessionguard.log";

/// Page size for `clients page` when none is given
const DEFAULT_PAGE_SIZE: u32 = 20;

const USAGE: &str = "\
Usage: sessionguard <command>

Commands:
  login [email]                    Log in (password is prompted)
  register <nome> <email> [tel]    Create a client account
  logout                           Clear the local session
  whoami [--json]                  Show the logged-in user
  has-role <ROLE>                  Exit 0 if the current user holds ROLE
  visit <path>                     Check a page against the session guard
  profile <id> <field=value>...    Update your own account

  admins                           List admin accounts
  admins add <nome> <email> [tel]  Create an admin (password is prompted)
  admins update <id> <field=value>...
  admins delete <id>

  clients                          List client accounts
  clients page <n> [size]          One page of clients (n starts at 0)
  clients search <nome>            Search clients by name
  clients find <email>             Look up a client by email
  clients add <nome> <email> [tel] Create a client (password is prompted)
  clients update <id> <field=value>...
  clients delete <id>

  help                             Show this message

Updatable fields: nome, email, telefone, imagem";

/// Which account list a management command works on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Accounts {
    Admins,
    Clients,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Login { email: Option<String> },
    Register { nome: String, email: String, telefone: Option<String> },
    Logout,
    Whoami { json: bool },
    HasRole(String),
    Visit(String),
    Profile { id: i64, update: ProfileUpdate },
    List(Accounts),
    Add { accounts: Accounts, nome: String, email: String, telefone: Option<String> },
    Update { accounts: Accounts, id: i64, update: ProfileUpdate },
    Delete { accounts: Accounts, id: i64 },
    ClientsPage { page: u32, size: u32 },
    SearchClients(String),
    FindClient(String),
    Help,
}

fn parse_args(args: &[String]) -> Result<Command> {
    let mut rest = args.iter().map(String::as_str);
    let Some(name) = rest.next() else {
        return Ok(Command::Help);
    };
    let rest: Vec<&str> = rest.collect();

    let command = match (name, rest.as_slice()) {
        ("login", []) => Command::Login { email: None },
        ("login", [email]) => Command::Login { email: Some(email.to_string()) },
        ("register", [nome, email, telefone @ ..]) if telefone.len() <= 1 => Command::Register {
            nome: nome.to_string(),
            email: email.to_string(),
            telefone: telefone.first().map(|t| t.to_string()),
        },
        ("logout", []) => Command::Logout,
        ("whoami", []) => Command::Whoami { json: false },
        ("whoami", ["--json"]) => Command::Whoami { json: true },
        ("has-role", [role]) => Command::HasRole(role.to_string()),
        ("visit", [path]) => Command::Visit(path.to_string()),
        ("profile", [id, fields @ ..]) => Command::Profile {
            id: parse_id(id)?,
            update: parse_update(fields)?,
        },
        ("admins" | "clients", [action, args @ ..]) => {
            let accounts = if name == "admins" { Accounts::Admins } else { Accounts::Clients };
            parse_accounts(accounts, action, args)?
        }
        ("admins", []) => Command::List(Accounts::Admins),
        ("clients", []) => Command::List(Accounts::Clients),
        ("help" | "--help" | "-h", _) => Command::Help,
        (other, _) => bail!("Invalid arguments for '{}'\n\n{}", other, USAGE),
    };
    Ok(command)
}

fn parse_accounts(accounts: Accounts, action: &str, args: &[&str]) -> Result<Command> {
    let command = match (accounts, action, args) {
        (_, "add", [nome, email, telefone @ ..]) if telefone.len() <= 1 => Command::Add {
            accounts,
            nome: nome.to_string(),
            email: email.to_string(),
            telefone: telefone.first().map(|t| t.to_string()),
        },
        (_, "update", [id, fields @ ..]) => Command::Update {
            accounts,
            id: parse_id(id)?,
            update: parse_update(fields)?,
        },
        (_, "delete", [id]) => Command::Delete { accounts, id: parse_id(id)? },
        (Accounts::Clients, "page", [page]) => Command::ClientsPage {
            page: parse_number(page)?,
            size: DEFAULT_PAGE_SIZE,
        },
        (Accounts::Clients, "page", [page, size]) => Command::ClientsPage {
            page: parse_number(page)?,
            size: parse_number(size)?,
        },
        (Accounts::Clients, "search", [nome]) => Command::SearchClients(nome.to_string()),
        (Accounts::Clients, "find", [email]) => Command::FindClient(email.to_string()),
        _ => bail!("Invalid arguments for '{}'\n\n{}", action, USAGE),
    };
    Ok(command)
}

fn parse_id(value: &str) -> Result<i64> {
    value
        .parse()
        .with_context(|| format!("Invalid account id: {}", value))
}

fn parse_number(value: &str) -> Result<u32> {
    value
        .parse()
        .with_context(|| format!("Invalid number: {}", value))
}

/// Build an update from `field=value` pairs. Passwords are never taken from
/// the command line.
fn parse_update(fields: &[&str]) -> Result<ProfileUpdate> {
    let mut update = ProfileUpdate::default();
    for field in fields {
        let Some((key, value)) = field.split_once('=') else {
            bail!("Expected field=value, got '{}'", field);
        };
        let value = Some(value.to_string());
        match key {
            "nome" => update.nome = value,
            "email" => update.email = value,
            "telefone" => update.telefone = value,
            "imagem" => update.imagem = value,
            other => bail!("Unknown field '{}' (expected nome, email, telefone or imagem)", other),
        }
    }
    if update.is_empty() {
        bail!("Nothing to update");
    }
    Ok(update)
}

/// Prompt twice for a new account's password
fn prompt_new_password() -> Result<String> {
    let senha = rpassword::prompt_password("Password: ").context("Failed to read password")?;
    let confirm = rpassword::prompt_password("Confirm password: ")
        .context("Failed to read password")?;
    if senha != confirm {
        bail!("Passwords do not match");
    }
    Ok(senha)
}

/// Navigator for a terminal: a redirect is just reported to the user
struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn navigate(&self, target: &NavigationTarget) {
        if target.is_logout() {
            println!("Signed out. Redirecting to {}", target);
        } else {
            println!("Redirecting to {}", target);
        }
    }
}

/// Initialize the tracing subscriber for logging
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_args(&args)?;
    if command == Command::Help {
        println!("{}", USAGE);
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = Config::load().context("Failed to load config")?;
    config.apply_env();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_tracing(config.log_dir.as_deref());
    info!(base_url = %config.base_url, "sessionguard starting");

    let storage = config.open_storage().context("Failed to open session storage")?;
    let guard = Arc::new(
        SessionGuard::new(storage, Arc::new(ConsoleNavigator))
            .with_public_paths(config.public_paths()),
    );
    let api = ApiClient::new(&config.base_url)?.with_interceptor(guard.clone());

    run(command, &mut config, &guard, &api).await
}

async fn run(
    command: Command,
    config: &mut Config,
    guard: &SessionGuard,
    api: &ApiClient,
) -> Result<ExitCode> {
    match command {
        Command::Login { email } => {
            let email = email
                .or_else(|| config.last_email.clone())
                .ok_or_else(|| anyhow::anyhow!("No email given and none remembered"))?;
            let senha = rpassword::prompt_password(format!("Password for {}: ", email))
                .context("Failed to read password")?;

            let user = api.login_and_store(guard, &email, &senha).await?;
            println!("Logged in as {} ({})", user.display_name(), role_label(&user));

            config.last_email = Some(email);
            config.save().context("Failed to save config")?;
        }
        Command::Register { nome, email, telefone } => {
            let request = RegistrationRequest {
                nome,
                email,
                senha: prompt_new_password()?,
                telefone,
                imagem: None,
            };
            let user = api.register(&request).await?;
            println!("Registered {} ({})", user.display_name(), role_label(&user));
        }
        Command::Logout => guard.logout(),
        Command::Whoami { json } => match guard.current_user() {
            Some(user) if json => println!("{}", serde_json::to_string_pretty(&user)?),
            Some(user) => {
                println!("{} <{}>", user.display_name(), user.email.as_deref().unwrap_or("-"));
                if user.is_admin() {
                    println!("Role: {} (can manage accounts)", role_label(&user));
                } else {
                    println!("Role: {}", role_label(&user));
                }
            }
            None if guard.is_authenticated() => println!("Logged in (no user details cached)"),
            None => {
                println!("Not logged in");
                return Ok(ExitCode::FAILURE);
            }
        },
        Command::HasRole(role) => {
            let has = guard.has_role(&role);
            println!("{}", has);
            if !has {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Visit(path) => match guard.guard_navigation(&path) {
            NavigationDecision::Allow => println!("{} allowed", path),
            NavigationDecision::Redirect(target) => {
                eprintln!("{} requires a session; sent to {}", path, target.path());
                return Ok(ExitCode::FAILURE);
            }
        },
        Command::Profile { id, update } => {
            let user = api.update_profile(id, &update).await?;
            println!("Updated {}", user.display_name());
        }
        Command::List(Accounts::Admins) => print_users(&api.list_admins().await?),
        Command::List(Accounts::Clients) => print_users(&api.list_clients().await?),
        Command::Add { accounts, nome, email, telefone } => {
            let request = RegistrationRequest {
                nome,
                email,
                senha: prompt_new_password()?,
                telefone,
                imagem: None,
            };
            let user = match accounts {
                Accounts::Admins => api.create_admin(&request).await?,
                Accounts::Clients => api.create_client(&request).await?,
            };
            println!("Created {} ({})", user.display_name(), role_label(&user));
        }
        Command::Update { accounts, id, update } => {
            let user = match accounts {
                Accounts::Admins => api.update_admin(id, &update).await?,
                Accounts::Clients => api.update_client(id, &update).await?,
            };
            println!("Updated {}", user.display_name());
        }
        Command::Delete { accounts, id } => {
            match accounts {
                Accounts::Admins => api.delete_admin(id).await?,
                Accounts::Clients => api.delete_client(id).await?,
            }
            println!("Deleted account {}", id);
        }
        Command::ClientsPage { page, size } => {
            let result = api.list_clients_page(page, size).await?;
            print_users(&result.content);
            println!(
                "Page {} of {} ({} clients)",
                result.number + 1,
                result.total_pages.max(1),
                result.total_elements
            );
        }
        Command::SearchClients(nome) => print_users(&api.search_clients(&nome).await?),
        Command::FindClient(email) => match api.find_client_by_email(&email).await? {
            Some(user) => print_users(std::slice::from_ref(&user)),
            None => {
                println!("No client with email {}", email);
                return Ok(ExitCode::FAILURE);
            }
        },
        Command::Help => println!("{}", USAGE),
    }
    Ok(ExitCode::SUCCESS)
}

fn role_label(user: &User) -> &str {
    user.tipo.as_deref().unwrap_or("no role")
}

fn print_users(users: &[User]) {
    if users.is_empty() {
        println!("No users found");
        return;
    }
    println!("{:>6}  {:<10}  {:<30}  {}", "ID", "ROLE", "NAME", "EMAIL");
    for user in users {
        println!(
            "{:>6}  {:<10}  {:<30}  {}",
            user.id.map(|id| id.to_string()).unwrap_or_default(),
            role_label(user),
            user.nome.as_deref().unwrap_or("-"),
            user.email.as_deref().unwrap_or("-"),
        );
    }
}
