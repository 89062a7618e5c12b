use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::model::Filter;

#[derive(Parser)]
#[command(name = "tick", about = concat!("tick v", env!("CARGO_PKG_VERSION"), " - a small todo list for the terminal"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Data directory (default: $TICK_DIR, then the platform data dir)
    #[arg(short = 'C', long = "dir", global = true)]
    pub dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task to the top of the list
    Add(AddArgs),
    /// List tasks
    List(ListArgs),
    /// Flip a task between open and done
    Toggle(IdArg),
    /// Delete a task
    Delete(IdArg),
    /// Replace a task's text
    Edit(EditArgs),
    /// Show completion progress
    Stats,
    /// Toggle the theme, or set it explicitly
    Theme(ThemeArgs),
    /// View or clear the recovery log
    Recovery(RecoveryArgs),
}

#[derive(Args)]
pub struct AddArgs {
    /// Task text (words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Show only tasks in this state (all, active, completed)
    #[arg(long)]
    pub filter: Option<Filter>,
}

#[derive(Args)]
pub struct IdArg {
    /// Task ID
    pub id: String,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task ID
    pub id: String,
    /// New text (words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ThemeMode {
    Light,
    Dark,
}

#[derive(Args)]
pub struct ThemeArgs {
    /// Theme to switch to (omit to toggle)
    pub mode: Option<ThemeMode>,
}

#[derive(Args)]
pub struct RecoveryArgs {
    /// Maximum number of entries to show (default: 10)
    #[arg(long)]
    pub limit: Option<usize>,
    /// Remove every entry
    #[arg(long, conflicts_with = "limit")]
    pub clear: bool,
}
