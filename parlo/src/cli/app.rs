use clap::{Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(
    name = "parlo",
    version,
    about = "Parlo - Personalized English learning paths",
    long_about = "Parlo generates a personalized English course from a learner profile: six units of lessons, a vocabulary collection and common phrases, produced by a local or hosted language model."
)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory for stored content, overriding the configured one
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage learner profiles
    #[command(about = "Create, update or inspect learner profiles")]
    Profile(ProfileCommand),

    /// Generate a learning path
    #[command(about = "Generate a complete learning path for a user")]
    Generate(GenerateArgs),

    /// Show a user's learning path
    #[command(about = "Show the learning path, its units and lessons")]
    Status(StatusArgs),

    /// Delete a failed learning path
    #[command(about = "Delete a failed learning path so generation can be retried")]
    Reset(ResetArgs),
}

#[derive(Parser, Debug)]
pub struct ProfileCommand {
    #[command(subcommand)]
    pub action: ProfileAction,
}

#[derive(Subcommand, Debug)]
pub enum ProfileAction {
    /// Create or update a learner profile
    Set(ProfileSetArgs),

    /// Show a stored learner profile
    Show(ProfileShowArgs),
}

#[derive(Parser, Debug)]
pub struct ProfileSetArgs {
    /// User id; a fresh one is created when omitted
    #[arg(long)]
    pub user: Option<Uuid>,

    /// Proficiency label (beginner, elementary, intermediate, upper-intermediate, advanced)
    #[arg(long, default_value = "intermediate")]
    pub level: String,

    /// Learning goal (career, travel, exams, general)
    #[arg(long, default_value = "general")]
    pub goal: String,

    /// Focus area, repeatable (grammar, vocabulary, speaking, ...)
    #[arg(long = "focus")]
    pub focus_areas: Vec<String>,

    /// Native language as an ISO 639-1 code
    #[arg(long, default_value = "en")]
    pub native: String,
}

#[derive(Parser, Debug)]
pub struct ProfileShowArgs {
    /// User whose profile to show
    #[arg(long)]
    pub user: Uuid,
}

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// User to generate a learning path for
    #[arg(long)]
    pub user: Uuid,

    /// Delete a previous failed path before starting
    #[arg(long)]
    pub retry: bool,

    /// Emit progress as JSON lines instead of a progress bar
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// User whose learning path to show
    #[arg(long)]
    pub user: Uuid,
}

#[derive(Parser, Debug)]
pub struct ResetArgs {
    /// User whose failed learning path to delete
    #[arg(long)]
    pub user: Uuid,
}
