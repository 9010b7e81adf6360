//! td CLI - a local todo manager with multiple named lists.
//!
//! Output is JSON by default; pass `-H/--human` for plain text. Success
//! exits 0; every error kind maps to its own non-zero exit code (see
//! `Error::exit_code`).

use std::path::Path;
use std::process;
use std::time::Instant;

use clap::Parser;
use taskdeck::cli::{Cli, Commands, ItemCommands, ListCommands};
use taskdeck::commands::{self, Output};
use taskdeck::storage::resolve_data_dir;
use taskdeck::{Error, action_log};

fn main() {
    let cli = Cli::parse();
    let human = cli.human_readable;

    let data_dir = match resolve_data_dir(cli.data_dir) {
        Ok(dir) => dir,
        Err(e) => fail(&e, human),
    };

    // Serialize command for logging
    let (cmd_name, args_json) = describe_command(&cli.command);

    let start = Instant::now();
    let result = run_command(cli.command, &data_dir, human);
    let duration = start.elapsed().as_millis() as u64;

    let (success, error) = match &result {
        Ok(()) => (true, None),
        Err(e) => (false, Some(e.to_string())),
    };
    action_log::log_action(&data_dir, &cmd_name, args_json, success, error, duration);

    if let Err(e) = result {
        fail(&e, human);
    }
}

fn run_command(command: Commands, data_dir: &Path, human: bool) -> Result<(), Error> {
    match command {
        Commands::Init => output(&commands::init(data_dir)?, human),
        Commands::Lists => output(&commands::list_lists(data_dir)?, human),
        Commands::List { command } => run_list_command(command, data_dir, human)?,
        Commands::Item { command } => run_item_command(command, data_dir, human)?,
    }
    Ok(())
}

fn run_list_command(command: ListCommands, data_dir: &Path, human: bool) -> Result<(), Error> {
    match command {
        ListCommands::Create { name } => {
            output(&commands::create_list(data_dir, &name)?, human);
        }
        ListCommands::Delete { name, yes } => {
            output(&commands::delete_list(data_dir, &name, yes)?, human);
        }
        ListCommands::Ls => {
            output(&commands::list_lists(data_dir)?, human);
        }
    }
    Ok(())
}

fn run_item_command(command: ItemCommands, data_dir: &Path, human: bool) -> Result<(), Error> {
    match command {
        ItemCommands::Add { list, text } => {
            output(&commands::add_item(data_dir, &list, &text)?, human);
        }
        ItemCommands::Done { list, item } => {
            output(&commands::complete_item(data_dir, &list, item)?, human);
        }
        ItemCommands::Rm { list, item } => {
            output(&commands::remove_item(data_dir, &list, item)?, human);
        }
        ItemCommands::Ls { list, filter } => {
            output(&commands::get_items(data_dir, &list, filter.into())?, human);
        }
        ItemCommands::Finished { list } => {
            // Same query as `ls --filter completed`, second invocation name.
            output(
                &commands::get_items(data_dir, &list, taskdeck::models::ItemFilter::Completed)?,
                human,
            );
        }
    }
    Ok(())
}

fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}

fn fail(e: &Error, human: bool) -> ! {
    if human {
        eprintln!("Error: {}", e);
    } else {
        let err = serde_json::json!({"error": e.to_string(), "code": e.exit_code()});
        eprintln!("{}", err);
    }
    process::exit(e.exit_code());
}

/// Command name and arguments for the action log.
fn describe_command(command: &Commands) -> (String, serde_json::Value) {
    use serde_json::json;

    match command {
        Commands::Init => ("init".to_string(), json!({})),
        Commands::Lists => ("lists".to_string(), json!({})),
        Commands::List { command } => match command {
            ListCommands::Create { name } => ("list create".to_string(), json!({"name": name})),
            ListCommands::Delete { name, yes } => {
                ("list delete".to_string(), json!({"name": name, "yes": yes}))
            }
            ListCommands::Ls => ("list ls".to_string(), json!({})),
        },
        Commands::Item { command } => match command {
            ItemCommands::Add { list, text } => {
                ("item add".to_string(), json!({"list": list, "text": text}))
            }
            ItemCommands::Done { list, item } => {
                ("item done".to_string(), json!({"list": list, "item": item}))
            }
            ItemCommands::Rm { list, item } => {
                ("item rm".to_string(), json!({"list": list, "item": item}))
            }
            ItemCommands::Ls { list, filter } => (
                "item ls".to_string(),
                json!({"list": list, "filter": format!("{:?}", filter).to_lowercase()}),
            ),
            ItemCommands::Finished { list } => {
                ("item finished".to_string(), json!({"list": list}))
            }
        },
    }
}
