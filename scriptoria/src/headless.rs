//! Headless mode for the studio.
//!
//! A line-oriented protocol for scripts and automated testing.

use scriptoria_core::headless::{HeadlessConfig, HeadlessStudio, RunReport};
use scriptoria_core::{ArtifactKey, ExportFormat, SessionError, ShotStatus};
use std::io::{self, BufRead, Write};

use crate::CliOptions;

const HELP: &[&str] = &[
    "  #generate <story>         - Generate the production package",
    "  #shots                    - List segmented shots and their images",
    "  #shot <n>                 - Generate (or regenerate) the image for shot n",
    "  #retry <n>                - Retry shot n with its previous description",
    "  #show <artifact>          - Print a deliverable",
    "  #export <artifact> <fmt>  - Save a deliverable as txt, pdf or docx",
    "  #status                   - Show session status",
    "  #help                     - Show this help",
    "  #quit                     - Exit",
];

/// Run the studio in headless mode.
///
/// This provides a simple line-oriented protocol:
/// - Lines starting with `#` are commands
/// - Any other line is submitted as a story prompt
/// - Output lines are tagged (`[RUN]`, `[SHOT]`, `[NOTICE]`, ...)
pub async fn run_headless(options: &CliOptions) -> Result<(), SessionError> {
    let config = HeadlessConfig {
        base_url: options.url.clone(),
        name: options.name.clone(),
        session: options.session_config(),
    };
    let mut studio = HeadlessStudio::new(config).await?;

    println!("=== Scriptoria Headless Mode ===");
    println!("Director: {}", studio.session().greeting());
    println!("Restored deliverables: {}", studio.session().store().len());
    println!();
    println!("Commands:");
    for line in HELP {
        println!("{line}");
    }
    println!();
    println!("Enter a story prompt or a command (one per line):");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error reading input: {e}");
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some(command) = line.strip_prefix('#') else {
            submit(&mut studio, line).await;
            print_notices(&mut studio);
            stdout.flush().ok();
            continue;
        };

        let (name, rest) = command
            .split_once(char::is_whitespace)
            .map(|(n, r)| (n, r.trim()))
            .unwrap_or((command, ""));
        match name {
            "quit" | "exit" => {
                println!("Goodbye!");
                break;
            }
            "generate" => submit(&mut studio, rest).await,
            "shots" => print_shots(&studio),
            "shot" | "retry" => match parse_shot_number(rest) {
                Some(index) => {
                    let result = if name == "shot" {
                        studio.generate_shot(index).await
                    } else {
                        studio.retry_shot(index).await
                    };
                    match result {
                        Ok(status) => print_shot(index, &status),
                        Err(e) => println!("[ERROR] {e}"),
                    }
                }
                None => println!("[ERROR] Usage: #{name} <n>"),
            },
            "show" => match rest.parse::<ArtifactKey>() {
                Ok(key) => match studio.artifact(key) {
                    Some(text) => {
                        println!("[{}]", key.as_str().to_uppercase());
                        println!("{text}");
                        println!();
                    }
                    None => println!("[ERROR] {key} has not been generated"),
                },
                Err(e) => println!("[ERROR] {e}"),
            },
            "export" => match parse_export(rest) {
                Some((key, format)) => match studio.export(key, format).await {
                    Ok(path) => println!("[SAVED] {}", path.display()),
                    Err(e) => println!("[ERROR] {e}"),
                },
                None => println!("[ERROR] Usage: #export <artifact> <txt|pdf|docx>"),
            },
            "status" => print_status(&studio),
            "help" => {
                println!("[HELP]");
                for line in HELP {
                    println!("{line}");
                }
                println!("  (anything else is submitted as a story prompt)");
            }
            _ => println!("[ERROR] Unknown command. Type #help for help."),
        }
        print_notices(&mut studio);
        stdout.flush().ok();
    }

    Ok(())
}

async fn submit(studio: &mut HeadlessStudio, story: &str) {
    print!("[GENERATING]");
    io::stdout().flush().ok();

    let result = studio.submit_story(story).await;
    print!("\r            \r");

    match result {
        Ok(RunReport::Succeeded { artifacts }) => {
            println!("[RUN] complete: {artifacts} deliverables");
            println!("[RUN] {} shots segmented", studio.shots().len());
        }
        Ok(RunReport::Failed { message }) => println!("[RUN] failed: {message}"),
        Ok(RunReport::Skipped) => println!("[RUN] already running"),
        // Validation problems arrive as notices
        Err(SessionError::Validation(_)) => {}
        Err(e) => println!("[ERROR] {e}"),
    }
}

fn print_notices(studio: &mut HeadlessStudio) {
    for notice in studio.notices() {
        println!("[NOTICE] {notice}");
    }
}

fn print_shots(studio: &HeadlessStudio) {
    let shots = studio.shots();
    if shots.is_empty() {
        println!("[SHOTS] none");
        return;
    }
    for (index, description) in shots.iter().enumerate() {
        let first_line = description.lines().next().unwrap_or_default();
        println!("[SHOT {}] {first_line}", index + 1);
        print_shot(index, &studio.session().shot_status(index));
    }
}

fn print_shot(index: usize, status: &ShotStatus) {
    let n = index + 1;
    match status {
        ShotStatus::Idle => println!("  shot {n}: no image"),
        ShotStatus::Loading { stage, .. } => println!("  shot {n}: {}...", stage.label()),
        ShotStatus::Success { image_url, prompt } => {
            println!("  shot {n}: {image_url}");
            println!("  prompt: {prompt}");
        }
        ShotStatus::Error { message } => println!("  shot {n}: failed ({message})"),
    }
}

fn print_status(studio: &HeadlessStudio) {
    let session = studio.session();
    println!("[STATUS]");
    println!("  Director: {}", session.greeting());
    println!("  Status: {}", session.status().label());
    let keys: Vec<&str> = session.store().keys().map(|k| k.as_str()).collect();
    if keys.is_empty() {
        println!("  Deliverables: none");
    } else {
        println!("  Deliverables: {}", keys.join(", "));
    }
    println!("  Exports go to: {}", session.download_dir().display());
}

/// Shots are numbered from 1 on the command line.
fn parse_shot_number(s: &str) -> Option<usize> {
    s.parse::<usize>().ok().filter(|n| *n > 0).map(|n| n - 1)
}

fn parse_export(s: &str) -> Option<(ArtifactKey, ExportFormat)> {
    let mut parts = s.split_whitespace();
    let key = parts.next()?.parse().ok()?;
    let format = parts.next()?.parse().ok()?;
    Some((key, format))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shot_number() {
        assert_eq!(parse_shot_number("1"), Some(0));
        assert_eq!(parse_shot_number("12"), Some(11));
        assert_eq!(parse_shot_number("0"), None);
        assert_eq!(parse_shot_number("two"), None);
    }

    #[test]
    fn test_parse_export() {
        assert_eq!(
            parse_export("shot_list PDF"),
            Some((ArtifactKey::ShotList, ExportFormat::Pdf))
        );
        assert_eq!(parse_export("screenplay"), None);
        assert_eq!(parse_export("poster txt"), None);
    }
}
