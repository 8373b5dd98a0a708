mod commands;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use taskdeck::config::{find_data_dir, Config, Runtime};
use taskdeck::guard::{DEFAULT_GRACE_MS, MAX_GRACE_MS};
use taskdeck::session::Theme;

#[derive(Parser)]
#[command(name = "taskdeck")]
#[command(about = "Projects and tasks over a simulated backend")]
#[command(version)]
struct Cli {
    /// Data directory (defaults to the nearest .taskdeck upward from the cwd)
    #[arg(long, global = true, env = "TASKDECK_DIR")]
    data_dir: Option<PathBuf>,

    /// Skip the simulated network latency
    #[arg(long, global = true, env = "TASKDECK_NO_LATENCY")]
    no_latency: bool,

    /// Duplicate-submission grace window in milliseconds
    #[arg(
        long,
        global = true,
        env = "TASKDECK_GRACE_MS",
        default_value_t = DEFAULT_GRACE_MS,
        value_parser = clap::value_parser!(i64).range(0..=MAX_GRACE_MS)
    )]
    grace_ms: i64,

    /// Theme used when none has been saved (light, dark)
    #[arg(long = "theme", global = true, env = "TASKDECK_THEME", default_value = "light")]
    default_theme: String,

    /// Log output format
    #[arg(long, global = true, env = "TASKDECK_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize taskdeck in the current directory
    Init {
        /// Restore the demo projects over existing data
        #[arg(long)]
        reset: bool,
    },

    /// Log in (any non-empty email and password are accepted)
    Login {
        email: String,
        #[arg(short, long, env = "TASKDECK_PASSWORD")]
        password: String,
    },

    /// Log out and clear the saved session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Show or change the theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeCommands>,
    },

    /// Project commands
    Project {
        #[command(subcommand)]
        action: ProjectCommands,
    },

    /// Task commands
    Task {
        #[command(subcommand)]
        action: TaskCommands,
    },
}

#[derive(Subcommand)]
enum ThemeCommands {
    /// Print the current theme
    Show,
    /// Switch between light and dark
    Toggle,
    /// Set the theme explicitly
    Set {
        /// light or dark
        name: String,
    },
}

#[derive(Subcommand)]
enum ProjectCommands {
    /// List projects
    List {
        /// Case-insensitive match on title or description
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show a project with its tasks
    Show {
        id: String,
    },

    /// Create a project
    Create {
        title: String,
        #[arg(short, long)]
        description: String,
    },

    /// Update a project
    Update {
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete a project and all of its tasks
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum TaskCommands {
    /// Add a task to a project
    Add {
        /// Project ID
        project: String,
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Priority (low, medium, high)
        #[arg(short, long, default_value = "medium")]
        priority: String,
        /// Due date (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        due: Option<String>,
    },

    /// List a project's tasks
    List {
        /// Project ID
        project: String,
        /// Filter by status (all, pending, completed)
        #[arg(short, long, default_value = "all")]
        status: String,
    },

    /// Update a task
    Update {
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        priority: Option<String>,
        #[arg(long)]
        due: Option<String>,
        /// pending or completed
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Delete a task
    Delete {
        id: String,
        #[arg(short, long)]
        force: bool,
    },

    /// Flip a task between pending and completed
    Toggle {
        id: String,
    },
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "taskdeck=warn".into());
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

fn get_runtime(cli: &Cli) -> Result<Runtime> {
    let data_dir = match &cli.data_dir {
        Some(dir) => dir.clone(),
        None => {
            let cwd = env::current_dir()?;
            match find_data_dir(&cwd) {
                Some(dir) => dir,
                None => bail!("Not a taskdeck directory (or any parent). Run 'taskdeck init' first."),
            }
        }
    };
    if !data_dir.is_dir() {
        bail!("Data directory {} does not exist", data_dir.display());
    }

    let mut config = Config::new(data_dir);
    config.simulate_latency = !cli.no_latency;
    config.grace = chrono::Duration::milliseconds(cli.grace_ms);
    config.default_theme = cli.default_theme.parse::<Theme>()?;
    config.open().context("Failed to open store")
}

fn main() -> Result<()> {
    // One draft per invocation; every guarded create in this run shares it
    let drafted_at = Utc::now();
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    if let Commands::Init { reset } = cli.command {
        let cwd = env::current_dir()?;
        return commands::init::run(&cwd, reset);
    }

    let mut rt = get_runtime(&cli)?;
    let api = &mut rt.api;

    match &cli.command {
        Commands::Init { .. } => Ok(()),

        Commands::Login { email, password } => commands::auth::login(api, email, password),
        Commands::Logout => commands::auth::logout(api),
        Commands::Whoami => commands::auth::whoami(api),

        Commands::Theme { action } => match action {
            None | Some(ThemeCommands::Show) => commands::theme::show(api),
            Some(ThemeCommands::Toggle) => commands::theme::toggle(api),
            Some(ThemeCommands::Set { name }) => commands::theme::set(api, name),
        },

        Commands::Project { action } => match action {
            ProjectCommands::List { search } => commands::list::projects(api, search.as_deref()),
            ProjectCommands::Show { id } => commands::show::run(api, id),
            ProjectCommands::Create { title, description } => {
                let created =
                    commands::create::project(api, &mut rt.guard, drafted_at, title, description)?;
                report_duplicate(created);
                Ok(())
            }
            ProjectCommands::Update {
                id,
                title,
                description,
            } => commands::update::project(api, id, title.as_deref(), description.as_deref()),
            ProjectCommands::Delete { id, force } => commands::delete::project(api, id, *force),
        },

        Commands::Task { action } => match action {
            TaskCommands::Add {
                project,
                title,
                description,
                priority,
                due,
            } => {
                let created = commands::create::task(
                    api,
                    &mut rt.guard,
                    drafted_at,
                    project,
                    title,
                    description.as_deref(),
                    priority,
                    due.as_deref(),
                )?;
                report_duplicate(created);
                Ok(())
            }
            TaskCommands::List { project, status } => commands::list::tasks(api, project, status),
            TaskCommands::Update {
                id,
                title,
                description,
                priority,
                due,
                status,
            } => {
                let changes = commands::update::TaskChanges {
                    title: title.as_deref(),
                    description: description.as_deref(),
                    priority: priority.as_deref(),
                    due_date: due.as_deref(),
                    status: status.as_deref(),
                };
                commands::update::task(api, id, &changes)
            }
            TaskCommands::Delete { id, force } => commands::delete::task(api, id, *force),
            TaskCommands::Toggle { id } => commands::status::toggle(api, id),
        },
    }
}

fn report_duplicate(created: commands::create::Created) {
    if let commands::create::Created::Duplicate = created {
        println!("Already submitted; ignoring duplicate.");
    }
}
