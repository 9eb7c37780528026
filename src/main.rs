use clap::{Parser, Subcommand};
use log::{error, info};
use projtrack::configuration::{ClientConfig, ConfigOverrides};
use projtrack::controller::Controller;
use projtrack::error_handling::{user_message, GENERIC_FAILURE};
use projtrack::resources::TaskStatus;
use projtrack::routing::NavigationOutcome;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "projtrack")]
#[command(version)]
#[command(about = "Client for the academic project and task tracker")]
struct Args {
    /// TOML configuration file
    #[arg(long, env = "PROJTRACK_CONFIG")]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: ConfigOverrides,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and persist the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out and forget the persisted session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Show where the router lands for a path
    Navigate { path: String },
    /// Show the signed-in student's task board
    Tasks,
}

fn print_navigation(outcome: &NavigationOutcome) {
    match outcome {
        NavigationOutcome::Loading { requested } => println!("{}: still loading", requested),
        NavigationOutcome::Rendered { location } => println!("{}", location),
        NavigationOutcome::Redirected {
            requested,
            location,
        } => println!("{} -> {}", requested, location),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .parse_default_env()
        .init();

    let args = Args::parse();

    let config = match args.config {
        Some(ref path) => ClientConfig::from_file(path),
        None => Ok(ClientConfig::default()),
    }
    .and_then(|config| config.with_overrides(&args.overrides))
    .unwrap_or_else(|e| {
        error!("Unable to load configuration: {}", e);
        std::process::exit(1);
    });

    info!("Using API at {}", config.api_base());

    let controller = Controller::new(config).unwrap_or_else(|e| {
        error!("Unable to create a controller instance: {}, exiting...", e);
        std::process::exit(1);
    });

    match args.command {
        Command::Login { email, password } => {
            controller.start("/login").await;
            let (outcome, navigation) = controller.login(&email, &password).await;
            if let Some(message) = outcome.message() {
                error!("{}", message);
                std::process::exit(1);
            }
            if let Some(user) = controller.session_store().current_user() {
                println!("Signed in as {} <{}> ({})", user.name, user.email, user.role);
            }
            if let Some(navigation) = navigation {
                print_navigation(&navigation);
            }
        }
        Command::Logout => {
            controller.start("/").await;
            print_navigation(&controller.logout().await);
        }
        Command::Whoami => {
            controller.start("/").await;
            match controller.session_store().current_user() {
                Some(user) => println!("{} <{}> ({})", user.name, user.email, user.role),
                None => println!("Not signed in"),
            }
        }
        Command::Navigate { path } => {
            print_navigation(&controller.start(&path).await);
        }
        Command::Tasks => {
            let landing = controller.start("/student").await;
            if landing.location() != Some("/student") {
                print_navigation(&landing);
                std::process::exit(1);
            }
            let board = controller.tasks().board().await.unwrap_or_else(|e| {
                error!("{}", user_message(&e, GENERIC_FAILURE));
                std::process::exit(1);
            });
            for status in TaskStatus::ALL {
                let tasks = board.column(status);
                println!("{} ({})", status.label(), tasks.len());
                for task in tasks {
                    match task.due_date {
                        Some(due) => println!("  #{} {} (due {})", task.id, task.title, due),
                        None => println!("  #{} {}", task.id, task.title),
                    }
                }
            }
            println!("Progress: {}%", board.progress());
        }
    }
}
