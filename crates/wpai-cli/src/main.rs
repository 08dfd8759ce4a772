//! Operator CLI for a wpai site database.
//!
//! Provides the `wpai` binary. Subcommands work directly on the SQLite
//! database the server uses, through the same `SiteService` the HTTP
//! handlers call, so a blueprint run here behaves exactly like
//! `POST /wpai/v1/run-blueprint`.

use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use wpai_server::auth::Credential;
use wpai_server::bridge::definitions;
use wpai_server::packages::{DirectoryClient, DEFAULT_PACKAGE_API};
use wpai_server::schema::blueprint::{BlueprintResponse, BlueprintSpec};
use wpai_server::service::SiteService;
use wpai_storage::SqliteStore;

/// Site automation tools.
#[derive(Parser)]
#[command(name = "wpai", about = "Site automation tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the API token, generating it if none exists yet.
    Token {
        /// Path to the site database file.
        #[arg(short, long, default_value = "wpai.db")]
        db: String,
    },

    /// Run a blueprint file against the site database.
    Blueprint {
        #[arg(short, long, default_value = "wpai.db")]
        db: String,

        /// JSON blueprint file.
        #[arg(short, long)]
        file: PathBuf,

        /// Package directory used by plugin configuration steps.
        #[arg(long, default_value = DEFAULT_PACKAGE_API)]
        package_api: String,
    },

    /// List installed plugins.
    Plugins {
        #[arg(short, long, default_value = "wpai.db")]
        db: String,
    },

    /// List the capabilities offered to registries.
    Capabilities,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let exit_code = match cli.command {
        Commands::Token { db } => run_token(&db),
        Commands::Blueprint {
            db,
            file,
            package_api,
        } => run_blueprint(&db, &file, package_api),
        Commands::Plugins { db } => run_plugins(&db),
        Commands::Capabilities => run_capabilities(),
    };
    process::exit(exit_code);
}

/// Opens the database, reporting failures with exit code 3.
fn open_store(db_path: &str) -> Result<SqliteStore, i32> {
    SqliteStore::new(db_path).map_err(|e| {
        eprintln!("Error: failed to open database '{}': {}", db_path, e);
        3
    })
}

fn print_json(value: &impl serde::Serialize) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            println!("{}", text);
            0
        }
        Err(e) => {
            eprintln!("Error: failed to render output: {}", e);
            1
        }
    }
}

fn run_token(db_path: &str) -> i32 {
    let mut store = match open_store(db_path) {
        Ok(s) => s,
        Err(code) => return code,
    };
    match Credential::load_or_init(&mut store) {
        Ok(credential) => {
            println!("{}", credential.expose());
            0
        }
        Err(e) => {
            eprintln!("Error: failed to initialize token: {}", e);
            3
        }
    }
}

/// Execute the blueprint subcommand.
///
/// Returns exit code: 0 = every step succeeded, 1 = unreadable blueprint,
/// 2 = at least one step failed, 3 = I/O error.
fn run_blueprint(db_path: &str, file: &Path, package_api: String) -> i32 {
    let text = match std::fs::read_to_string(file) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: failed to read '{}': {}", file.display(), e);
            return 3;
        }
    };
    let spec: BlueprintSpec = match serde_json::from_str(&text) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: invalid blueprint '{}': {}", file.display(), e);
            return 1;
        }
    };

    let store = match open_store(db_path) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let mut service = SiteService::new(
        Box::new(store),
        Arc::new(DirectoryClient::new(package_api)),
    );

    let report = service.run_blueprint(spec);
    let failures = report.failures();
    for outcome in report.outcomes.iter().filter(|o| !o.ok) {
        eprintln!(
            "Step failed ({}): {}",
            outcome.section,
            outcome.detail.as_deref().unwrap_or("unknown error")
        );
    }

    let code = print_json(&BlueprintResponse::from(report));
    if code != 0 {
        code
    } else if failures > 0 {
        2
    } else {
        0
    }
}

fn run_plugins(db_path: &str) -> i32 {
    let store = match open_store(db_path) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let service = SiteService::new(Box::new(store), Arc::new(DirectoryClient::default()));
    match service.list_plugins() {
        Ok(plugins) => print_json(&plugins),
        Err(e) => {
            eprintln!("Error: {}", e);
            3
        }
    }
}

fn run_capabilities() -> i32 {
    for def in definitions() {
        println!("{:<24} {}", def.name, def.description);
    }
    0
}
