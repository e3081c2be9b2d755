//! Taller console CLI

use clap::{Parser, Subcommand};
use tracing::info;

use taller_console::Console;
use taller_console::catalog_cmd::{self, Catalog};
use taller_console::{order_cmd, session_cmd};

#[derive(Parser, Debug)]
#[command(name = "taller")]
#[command(version, about = "Taller shop console", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in to the backend
    Login {
        /// Account email
        #[arg(short, long)]
        email: Option<String>,
        /// Account password
        #[arg(short, long, env = "TALLER_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Log out and forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Show whether the current session may open a page
    Open {
        /// Page path, e.g. /admin/dashboard
        path: String,
    },
    /// List a catalog
    List {
        #[arg(value_enum)]
        catalog: Catalog,
        /// Only show rows containing this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// List the vehicles of a client
    Vehicles {
        /// Client id
        client_id: i64,
    },
    /// Create a service order interactively
    CreateOrder,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    common::logging::init("warn")?;
    info!(version = env!("CARGO_PKG_VERSION"), "Starting taller console");

    let console = Console::from_env()?;
    match cli.command {
        Command::Login { email, password } => session_cmd::login(&console, email, password).await,
        Command::Logout => session_cmd::logout(&console),
        Command::Whoami => session_cmd::whoami(&console).await,
        Command::Open { path } => session_cmd::open(&console, &path).await,
        Command::List { catalog, search } => {
            catalog_cmd::list(&console, catalog, search.as_deref()).await
        }
        Command::Vehicles { client_id } => catalog_cmd::vehicles(&console, client_id).await,
        Command::CreateOrder => order_cmd::create_order(&console).await,
    }
}
