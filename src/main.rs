//! CLI tool to validate, format, and list kbm configuration files.

use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;

use kbm_rs::{Context, Emitter, Error, Renderer};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        eprintln!("Usage: kbm <command> [files...]");
        eprintln!();
        eprintln!("Commands:");
        eprintln!("  check  Check if configuration file(s) are valid");
        eprintln!("  fmt    Format configuration file(s) and print to stdout");
        eprintln!("  keys   List the bindings of configuration file(s)");
        eprintln!();
        eprintln!("Use - to read standard input.");
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  kbm check ~/.kbmrc");
        eprintln!("  kbm fmt ~/.kbmrc");
        eprintln!("  kbm keys - < ~/.kbmrc");
        return ExitCode::from(2);
    }

    let command = args[1].as_str();
    let files = &args[2..];

    if !matches!(command, "check" | "fmt" | "keys") {
        eprintln!("Unknown command: {command}");
        return ExitCode::from(2);
    }

    if files.is_empty() {
        eprintln!("Error: no files specified");
        return ExitCode::from(2);
    }

    let ctx = Context::new();
    let mut emitter = Emitter::stderr(renderer());
    let mut had_error = false;

    for path in files {
        let keymap = match kbm_rs::parse_file(&ctx, Path::new(path), &mut emitter) {
            Ok(keymap) => keymap,
            Err(Error::Io(e)) => {
                eprintln!("{path}: {e}");
                had_error = true;
                continue;
            }
            // Already rendered through the emitter.
            Err(_) => {
                had_error = true;
                continue;
            }
        };

        match command {
            "check" => {
                let bindings = keymap.len();
                let windows = if keymap.restricts_windows() {
                    format!(", {} window(s)", keymap.windows.len())
                } else {
                    String::new()
                };
                eprintln!("{path}: valid ({bindings} binding(s){windows})");
            }
            "fmt" => match kbm_rs::format(&keymap) {
                Ok(text) => print!("{text}"),
                Err(e) => {
                    eprintln!("{path}: {e}");
                    had_error = true;
                }
            },
            _ => {
                for hotkey in &keymap {
                    println!("{hotkey}");
                }
            }
        }
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn renderer() -> Renderer {
    let color = std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none();
    Renderer::default().with_color(color)
}
