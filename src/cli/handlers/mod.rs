use std::path::Path;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::controller::TaskListController;
use crate::io::config_io;
use crate::io::recovery;
use crate::io::store::FileStore;
use crate::ops::task_ops::{self, TaskError};

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Default number of recovery entries shown
const RECOVERY_LIMIT: usize = 10;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CliResult {
    let json = cli.json;
    let dir = config_io::resolve_data_dir(cli.dir.as_deref())?;

    match cli.command {
        None => crate::tui::run(Some(dir.as_path())),
        Some(cmd) => match cmd {
            Commands::List(args) => cmd_list(&dir, args, json),
            Commands::Stats => cmd_stats(&dir, json),
            Commands::Recovery(args) => cmd_recovery(&dir, args, json),

            Commands::Add(args) => cmd_add(&dir, args, json),
            Commands::Toggle(args) => cmd_toggle(&dir, args, json),
            Commands::Delete(args) => cmd_delete(&dir, args, json),
            Commands::Edit(args) => cmd_edit(&dir, args, json),
            Commands::Theme(args) => cmd_theme(&dir, args, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_controller(dir: &Path) -> Result<TaskListController<FileStore>, std::io::Error> {
    let store = FileStore::open(dir)?;
    Ok(TaskListController::load(store))
}

fn print_json<T: serde::Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a task the way every write command reports it
fn print_task(controller: &TaskListController<FileStore>, id: &str, json: bool) -> CliResult {
    let task = task_ops::find_task(controller.tasks(), id)
        .ok_or_else(|| TaskError::NotFound(id.to_string()))?;
    if json {
        print_json(&task_to_json(task))
    } else {
        println!("{}", format_task_line(task));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(dir: &Path, args: ListArgs, json: bool) -> CliResult {
    let mut controller = load_controller(dir)?;
    if let Some(filter) = args.filter {
        controller.set_filter(filter);
    }
    let visible = controller.visible_tasks();

    if json {
        let tasks: Vec<TaskJson> = visible.into_iter().map(task_to_json).collect();
        return print_json(&tasks);
    }
    for task in visible {
        println!("{}", format_task_line(task));
    }
    Ok(())
}

fn cmd_stats(dir: &Path, json: bool) -> CliResult {
    let controller = load_controller(dir)?;
    let progress = controller.progress();
    if json {
        print_json(&stats_to_json(progress))
    } else {
        println!("{}", format_stats(progress));
        Ok(())
    }
}

fn cmd_recovery(dir: &Path, args: RecoveryArgs, json: bool) -> CliResult {
    if args.clear {
        let removed = recovery::clear_recovery(dir)?;
        if json {
            return print_json(&ClearedJson { removed });
        }
        println!("removed {} recovery entries", removed);
        return Ok(());
    }

    let entries =
        recovery::read_recovery_entries(dir, Some(args.limit.unwrap_or(RECOVERY_LIMIT)));
    if json {
        let values: Vec<serde_json::Value> = entries.iter().map(|e| e.to_json()).collect();
        return print_json(&values);
    }
    if entries.is_empty() {
        println!("recovery log is empty");
        return Ok(());
    }
    for entry in &entries {
        print!("{}", entry.to_markdown());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(dir: &Path, args: AddArgs, json: bool) -> CliResult {
    let mut controller = load_controller(dir)?;
    let id = controller.add(&args.text.join(" "))?;
    if json {
        print_task(&controller, &id, true)
    } else {
        println!("{}", id);
        Ok(())
    }
}

fn cmd_toggle(dir: &Path, args: IdArg, json: bool) -> CliResult {
    let mut controller = load_controller(dir)?;
    controller.toggle(&args.id)?;
    print_task(&controller, &args.id, json)
}

fn cmd_delete(dir: &Path, args: IdArg, json: bool) -> CliResult {
    let mut controller = load_controller(dir)?;
    let removed = controller.delete(&args.id)?;
    if json {
        print_json(&task_to_json(&removed))
    } else {
        println!("deleted {}", format_task_line(&removed));
        Ok(())
    }
}

fn cmd_edit(dir: &Path, args: EditArgs, json: bool) -> CliResult {
    let mut controller = load_controller(dir)?;
    let current = task_ops::find_task(controller.tasks(), &args.id)
        .map(|t| t.text.clone())
        .unwrap_or_default();
    controller.begin_edit(&args.id, &current)?;
    controller.update_draft(&args.text.join(" "));
    controller.commit_edit()?;
    print_task(&controller, &args.id, json)
}

fn cmd_theme(dir: &Path, args: ThemeArgs, json: bool) -> CliResult {
    let mut controller = load_controller(dir)?;
    match args.mode {
        None => {
            controller.toggle_theme();
        }
        Some(mode) => controller.set_theme(mode == ThemeMode::Dark),
    }
    let dark = controller.is_dark();
    if json {
        print_json(&ThemeJson { dark })
    } else {
        println!("{}", theme_name(dark));
        Ok(())
    }
}
