//! Headless level checker
//!
//! Opens each level file given on the command line, reports what it holds,
//! and with `--resave` rewrites it in the canonical indented form. Exits
//! nonzero when any file fails to load.
//!
//! Run with: brawler_editor_check [--resave] <level.txt>...

use std::path::Path;
use std::process::ExitCode;

use brawler_core::{Level, ThingKind};
use brawler_editor::session::{load_level, save_level};

fn main() -> ExitCode {
    env_logger::init();

    let mut resave = false;
    let mut files = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--resave" => resave = true,
            "--help" | "-h" => {
                println!("usage: brawler_editor_check [--resave] <level.txt>...");
                return ExitCode::SUCCESS;
            }
            _ => files.push(arg),
        }
    }
    if files.is_empty() {
        eprintln!("usage: brawler_editor_check [--resave] <level.txt>...");
        return ExitCode::FAILURE;
    }

    let mut failed = false;
    for file in &files {
        match load_level(Path::new(file)) {
            Ok(level) => {
                print_summary(file, &level);
                if resave {
                    if let Err(err) = save_level(&level, Path::new(file)) {
                        eprintln!("{file}: resave failed: {err}");
                        failed = true;
                    }
                }
            }
            Err(err) => {
                eprintln!("{file}: {err}");
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn print_summary(file: &str, level: &Level) {
    let mut characters = 0;
    let mut items = 0;
    for block in level.blocks() {
        for thing in block.things() {
            match thing.kind {
                ThingKind::Character { .. } => characters += 1,
                ThingKind::Item => items += 1,
            }
        }
    }
    let disabled = level.blocks().iter().filter(|b| !b.enabled).count();
    println!(
        "{file}: {} blocks ({disabled} disabled), {} world units, {characters} characters, {items} items, z {}..{}",
        level.blocks().len(),
        level.total_length(),
        level.min_z(),
        level.max_z(),
    );
}
