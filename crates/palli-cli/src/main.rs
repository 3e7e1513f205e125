//! `palli` — command-line client for the Palli school records server.
//!
//! # Usage
//!
//! ```
//! palli --url http://localhost:8080 dashboard
//! palli attendance mark 10 A --absent s2 --late s4
//! palli leaves inbox --role TEACHER --class 10 --section A
//! palli --config ~/.config/palli/cli.toml leaves decide <id> approve
//! ```

mod client;
mod render;
mod roster;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig, InboxFilter};
use palli_core::{
  leave::LeaveDecision,
  session::{Language, Role},
};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "palli", about = "Command-line client for the Palli school server")]
struct Args {
  /// Path to a TOML config file (url, language).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the palli server (default: http://localhost:8080).
  #[arg(long, env = "PALLI_URL")]
  url: Option<String>,

  /// Language for status messages (`en` or `ta`). Follows the server's
  /// session language when unset.
  #[arg(long, env = "PALLI_LANG", value_parser = parse_language)]
  lang: Option<Language>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Today's school summary.
  Dashboard,
  /// List students, optionally narrowed to a section or a name/EMIS search.
  Students {
    #[arg(long)]
    class:   Option<String>,
    #[arg(long)]
    section: Option<String>,
    /// Case-insensitive name or EMIS number fragment.
    #[arg(short, long)]
    query:   Option<String>,
  },
  /// An exam's marks sheet.
  Marks {
    /// Exam id.
    exam: String,
  },
  /// Daily attendance.
  #[command(subcommand)]
  Attendance(AttendanceCommand),
  /// Messages sent to parents, newest first.
  Logs,
  /// Leave applications.
  #[command(subcommand)]
  Leaves(LeavesCommand),
  /// Sign in to the server session. Any credentials are accepted.
  Login {
    email: String,
    role:  Role,
    #[arg(long)]
    name:  Option<String>,
  },
  /// Sign out of the server session.
  Logout,
  /// Show the signed-in user and language.
  Whoami,
  /// Switch the server session between English and Tamil.
  Language,
}

#[derive(Subcommand, Debug)]
enum AttendanceCommand {
  /// Today's marking progress for a section.
  Status { class: String, section: String },
  /// Submit today's roster. Everyone not listed is marked present.
  Mark {
    class:   String,
    section: String,
    /// Student ids to mark absent; their parents are alerted.
    #[arg(long, value_delimiter = ',')]
    absent:  Vec<String>,
    #[arg(long, value_delimiter = ',')]
    late:    Vec<String>,
    #[arg(long, value_delimiter = ',')]
    leave:   Vec<String>,
    /// Resubmit a section that is already marked today.
    #[arg(long)]
    force:   bool,
  },
}

#[derive(Subcommand, Debug)]
enum LeavesCommand {
  /// Applications routed to an approver.
  Inbox {
    #[arg(long)]
    role:    Role,
    /// Required for a teacher's inbox.
    #[arg(long)]
    class:   Option<String>,
    /// Required for a teacher's inbox.
    #[arg(long)]
    section: Option<String>,
    /// Pending, Approved, Rejected or all.
    #[arg(long, default_value = "Pending")]
    status:  String,
  },
  /// Approve or reject an application.
  Decide {
    id:       String,
    /// `approve` or `reject`.
    decision: LeaveDecision,
  },
}

fn parse_language(raw: &str) -> Result<Language, String> {
  match raw.to_ascii_lowercase().as_str() {
    "en" => Ok(Language::En),
    "ta" => Ok(Language::Ta),
    other => Err(format!("unknown language {other:?}, expected en or ta")),
  }
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:      String,
  #[serde(default)]
  language: Option<Language>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| "http://localhost:8080".to_string()),
    language: args.lang.or(file_cfg.language),
  };
  tracing::debug!(url = %api_config.base_url, "using server");

  let client = ApiClient::new(api_config)?;
  run(&client, args.command).await
}

async fn run(client: &ApiClient, command: Command) -> Result<()> {
  match command {
    Command::Dashboard => print!("{}", render::dashboard(&client.dashboard().await?)),
    Command::Students { class, section, query } => {
      let students = client
        .list_students(class.as_deref(), section.as_deref(), query.as_deref())
        .await?;
      print!("{}", render::students(&students));
    }
    Command::Marks { exam } => {
      let exam = client.get_exam(&exam).await?;
      let marks = client.list_marks(exam.id.as_str()).await?;
      let students = client
        .list_students(Some(exam.class.as_str()), None, None)
        .await?;
      print!("{}", render::marks(&exam, &marks, &students));
    }
    Command::Attendance(cmd) => attendance(client, cmd).await?,
    Command::Logs => print!("{}", render::logs(&client.communication_logs().await?)),
    Command::Leaves(LeavesCommand::Inbox { role, class, section, status }) => {
      let filter = InboxFilter { role: Some(role), class, section, status: Some(status) };
      print!("{}", render::leaves(&client.leave_inbox(&filter).await?));
    }
    Command::Leaves(LeavesCommand::Decide { id, decision }) => {
      let leave = client.decide_leave(&id, decision).await?;
      println!("{} for {}: {}", leave.id, leave.user_name, leave.status);
    }
    Command::Login { email, role, name } => {
      let user = client.login(&email, role, name.as_deref()).await?;
      println!("signed in as {} ({})", user.name, user.role);
    }
    Command::Logout => {
      client.logout().await?;
      println!("signed out");
    }
    Command::Whoami => {
      let session = client.session().await?;
      match session.user {
        Some(user) => println!(
          "{} <{}> ({}), {}",
          user.name,
          user.email,
          user.role,
          session.language.tag()
        ),
        None => println!("not signed in, {}", session.language.tag()),
      }
    }
    Command::Language => {
      let language = client.toggle_language().await?;
      println!("language is now {}", language.tag());
    }
  }
  Ok(())
}

async fn attendance(client: &ApiClient, cmd: AttendanceCommand) -> Result<()> {
  match cmd {
    AttendanceCommand::Status { class, section } => {
      let status = client.section_status(&class, &section).await?;
      print!("{}", render::section_status(&status));
    }
    AttendanceCommand::Mark { class, section, absent, late, leave, force } => {
      let status = client.section_status(&class, &section).await?;
      roster::ensure_unlocked(&status, force)?;

      let students = client
        .list_students(Some(class.as_str()), Some(section.as_str()), None)
        .await?;
      anyhow::ensure!(!students.is_empty(), "no students in {class}-{section}");

      let exceptions = roster::Exceptions { absent: &absent, late: &late, leave: &leave };
      let marks = roster::compose(&students, &exceptions)?;
      let saved = client.mark_batch(&marks).await?;
      println!("{}", saved.message);
      print!("{}", render::logs(&saved.data.notifications));
    }
  }
  Ok(())
}
