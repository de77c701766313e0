/// Play — interactive shell for playtesting a story.
///
/// Usage: play --story <story.ron> --locations <dir> [--locations <dir> ...]
///
/// Built only with the `tools` feature:
///   cargo run --features tools --bin play -- --story story_data/lighthouse/story.ron \
///       --locations story_data/lighthouse/locations
///
/// Commands:
///   look             — show the current scene again
///   do <n|text>      — take an action by number or by its label
///   use [item]       — use an item (defaults to the selected item)
///   select <item>    — select an inventory item
///   inv              — list the inventory
///   flags            — list story flags that are set
///   restart          — start over from the entry point
///   help             — list commands
///   quit             — exit
///
/// Set RUST_LOG=adventure_engine=debug to trace transitions.

use adventure_engine::{PlayerState, Session, StoryEngine};
use std::io::{self, BufRead, Write};
use std::process;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adventure_engine=warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return;
    }

    let mut story_path = None;
    let mut locations_dirs = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--story" if i + 1 < args.len() => {
                i += 1;
                story_path = Some(args[i].clone());
            }
            "--locations" if i + 1 < args.len() => {
                i += 1;
                locations_dirs.push(args[i].clone());
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let Some(story_path) = story_path else {
        eprintln!("Error: --story is required");
        print_usage();
        process::exit(1);
    };

    let mut builder = StoryEngine::builder().manifest(story_path);
    for dir in locations_dirs {
        builder = builder.locations_dir(dir);
    }
    let engine = match builder.build() {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("ERROR: Failed to load story: {}", e);
            process::exit(1);
        }
    };

    println!("=== {} ===", engine.title());
    println!(
        "Loaded {} locations. Type 'help' for commands.\n",
        engine.catalog().len()
    );

    let mut session = Session::new(&engine);
    print_scene(session.state());

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("play> ");
        stdout.flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).is_err() || line.is_empty() {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (cmd, rest) = match line.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd.to_lowercase(), rest.trim()),
            None => (line.to_lowercase(), ""),
        };

        match cmd.as_str() {
            "quit" | "exit" | "q" => {
                println!("Goodbye.");
                break;
            }
            "help" | "h" | "?" => {
                print_help();
            }
            "look" | "l" => {
                print_scene(session.state());
            }
            "do" | "d" => {
                if rest.is_empty() {
                    println!("Usage: do <n|text>");
                    continue;
                }
                let action = resolve_action(session.state(), rest);
                match session.perform_action(&action) {
                    Ok(state) => print_scene(state),
                    Err(e) => println!("{}", e),
                }
            }
            "use" | "u" => {
                let result = if rest.is_empty() {
                    session.use_selected_item()
                } else {
                    session.use_item(rest)
                };
                match result {
                    Ok(state) => print_scene(state),
                    Err(e) => println!("{}", e),
                }
            }
            "select" => {
                if rest.is_empty() {
                    println!("Usage: select <item>");
                    continue;
                }
                match session.select_item(rest) {
                    Ok(()) => println!("Selected '{}'.", rest),
                    Err(e) => println!("{}", e),
                }
            }
            "inv" | "i" => {
                let inventory = &session.state().inventory;
                if inventory.is_empty() {
                    println!("You are carrying nothing.");
                } else {
                    for item in inventory {
                        let marker = if session.selected_item() == Some(item.as_str()) {
                            "*"
                        } else {
                            " "
                        };
                        println!(" {} {}", marker, item);
                    }
                }
            }
            "flags" => {
                let set: Vec<&str> = session
                    .state()
                    .flags
                    .iter()
                    .filter(|(_, v)| **v)
                    .map(|(k, _)| k.as_str())
                    .collect();
                if set.is_empty() {
                    println!("No flags set.");
                } else {
                    println!("{}", set.join(", "));
                }
                println!("Turns taken: {}", session.turns());
            }
            "restart" => {
                let state = session.restart();
                print_scene(state);
            }
            _ => {
                println!(
                    "Unknown command: '{}'. Type 'help' for available commands.",
                    cmd
                );
            }
        }
    }
}

/// Accept either a 1-based action number or the action label itself.
fn resolve_action(state: &PlayerState, input: &str) -> String {
    input
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|n| state.actions.get(n))
        .cloned()
        .unwrap_or_else(|| input.to_string())
}

fn print_scene(state: &PlayerState) {
    println!("\n--- {} ---", state.location_name);
    println!("{}", state.narrative);
    println!();
    for (i, action) in state.actions.iter().enumerate() {
        println!("  {}. {}", i + 1, action);
    }
    if !state.inventory.is_empty() {
        println!("\nCarrying: {}", state.inventory.join(", "));
    }
    println!();
}

fn print_usage() {
    println!("Play — interactive shell for playtesting a story.");
    println!();
    println!("Usage: play --story <story.ron> --locations <dir> [--locations <dir> ...]");
    println!();
    println!("  --story <path>      Story manifest naming the entry point");
    println!("  --locations <dir>   Directory of location files (repeatable)");
}

fn print_help() {
    println!("Commands:");
    println!("  look            Show the current scene again");
    println!("  do <n|text>     Take an action by number or label");
    println!("  use [item]      Use an item (defaults to the selected item)");
    println!("  select <item>   Select an inventory item");
    println!("  inv             List the inventory (* marks the selection)");
    println!("  flags           List story flags that are set");
    println!("  restart         Start over from the entry point");
    println!("  help            Show this help");
    println!("  quit            Exit");
}
