//! Student management client entry point.

use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use student_desk::backend::{self, BackendState};
use student_desk::config::Config;
use student_desk::metrics;
use student_desk::router::{App, Screen};
use student_desk::student::Field;
use student_desk::views::render;

/// Student management client.
#[derive(Parser, Debug)]
#[command(name = "student-desk")]
#[command(about = "Manage students stored in a REST student service")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every student.
    List,

    /// Add a student.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        age: String,
        /// Course label, see `courses`.
        #[arg(long)]
        course: String,
        #[arg(long, default_value = "")]
        account_no: String,
    },

    /// Delete a student by id.
    Delete { id: i64 },

    /// Edit a student; only the given fields change.
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        age: Option<String>,
        #[arg(long)]
        course: Option<String>,
        #[arg(long)]
        account_no: Option<String>,
    },

    /// Render the view a client-side path routes to (`/` or `/update/:id`).
    Open { path: String },

    /// Show the service health dashboard.
    Health,

    /// List the course options.
    Courses,

    /// Run the in-memory stub backend.
    MockBackend {
        /// Port to listen on.
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("student_desk=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(args.json_logs.then(|| fmt::layer().json()))
        .with((!args.json_logs).then(|| fmt::layer()))
        .with(filter)
        .init();

    metrics::init_metrics();

    match args.command {
        Command::List => cmd_list().await,
        Command::Add {
            name,
            email,
            age,
            course,
            account_no,
        } => cmd_add([
            (Field::Name, name),
            (Field::Email, email),
            (Field::Age, age),
            (Field::Course, course),
            (Field::AccountNo, account_no),
        ])
        .await,
        Command::Delete { id } => cmd_delete(id).await,
        Command::Edit {
            id,
            name,
            email,
            age,
            course,
            account_no,
        } => {
            let changes = [
                (Field::Name, name),
                (Field::Email, email),
                (Field::Age, age),
                (Field::Course, course),
                (Field::AccountNo, account_no),
            ];
            cmd_edit(id, changes).await
        }
        Command::Open { path } => cmd_open(&path).await,
        Command::Health => cmd_health().await,
        Command::Courses => {
            print!("{}", render::course_options());
            Ok(())
        }
        Command::MockBackend { port } => cmd_mock_backend(port).await,
    }
}

/// Load configuration and build the app.
fn load_app() -> anyhow::Result<App> {
    let config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;
    info!(api = %config.student_api_url, "Configuration loaded");
    Ok(App::new(&config)?)
}

/// Print the student table.
async fn cmd_list() -> anyhow::Result<()> {
    let app = load_app()?;
    let view = app.home();

    let result = view.mount().await;
    print!("{}", view.render().await);
    result?;
    Ok(())
}

/// Create a student from form values.
async fn cmd_add(fields: [(Field, String); 5]) -> anyhow::Result<()> {
    let app = load_app()?;
    let mut view = app.home();
    for (field, value) in fields {
        view.set_field(field, value);
    }

    match view.submit().await {
        Ok(created) => {
            println!("Student added");
            print!("{}", render::student_detail(&created));
            Ok(())
        }
        Err(e) => {
            println!("{}", render::error_panel(&e.to_string()));
            Err(e.into())
        }
    }
}

/// Delete a student by id.
async fn cmd_delete(id: i64) -> anyhow::Result<()> {
    let app = load_app()?;
    app.mount().await?;
    let view = app.home();

    match view.delete(id).await {
        Ok(_) => {
            println!("Student {id} deleted");
            print!("{}", view.render().await);
            Ok(())
        }
        Err(e) => {
            println!("{}", render::error_panel(&e.to_string()));
            Err(e.into())
        }
    }
}

/// Select a student, route to its edit view and submit the changes.
async fn cmd_edit(id: i64, changes: [(Field, Option<String>); 5]) -> anyhow::Result<()> {
    let app = load_app()?;
    app.mount().await?;

    let route = app.home().begin_edit(id).await?;
    let Screen::Update(mut view) = app.open(&route.path()).await? else {
        anyhow::bail!("{route} did not route to the edit view");
    };

    for (field, value) in changes {
        if let Some(value) = value {
            view.set_field(field, value);
        }
    }

    match view.submit().await {
        Ok(updated) => {
            println!("Student updated");
            print!("{}", render::student_detail(&updated));
            Ok(())
        }
        Err(e) => {
            print!("{}", view.render());
            Err(e.into())
        }
    }
}

/// Render the view behind a client-side path.
async fn cmd_open(path: &str) -> anyhow::Result<()> {
    let app = load_app()?;
    app.mount().await?;

    match app.open(path).await? {
        Screen::Home(view) => print!("{}", view.render().await),
        Screen::Update(view) => print!("{}", view.render()),
    }
    Ok(())
}

/// Probe every configured service.
async fn cmd_health() -> anyhow::Result<()> {
    let app = load_app()?;
    let mut view = app.health();

    let failed = view.mount().await?.error.is_some();
    print!("{}", view.render());
    if failed {
        anyhow::bail!("health check failed");
    }
    Ok(())
}

/// Run the stub backend until Ctrl+C.
async fn cmd_mock_backend(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr).await?;
    println!("Stub backend listening on http://{addr}");

    backend::serve(listener, BackendState::new(), backend::shutdown_signal()).await?;
    Ok(())
}
