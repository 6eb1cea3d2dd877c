//! Config command - interactive profile wizard
//!
//! Prompts for every field (defaulting to the saved value), optionally runs
//! the same checks as `dcr test`, then saves. A failed check asks before
//! saving anyway.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use dcr::config::{expand_tilde, ProfileRecord, TransferSettings, DEFAULT_PORT};
use dcr::domain::ports::ProfileRepository;
use dcr::ConnectionProfile;
use dialoguer::{Confirm, Input, Password};
use is_terminal::IsTerminal;

use super::test::{check_profile, print_check_result};
use crate::ui::context::UiContext;
use crate::ui::theme::{prompt_theme, Icon};

/// Raw wizard input, before paths are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Answers {
    host: String,
    port: u16,
    username: String,
    private_key_path: String,
    passphrase: String,
    local_dir: String,
    remote_dir: String,
}

pub async fn cmd_config(
    ui: &UiContext,
    repo: &impl ProfileRepository,
    skip_test: bool,
) -> Result<()> {
    if ui.json || !std::io::stdin().is_terminal() {
        bail!(
            "'dcr config' needs an interactive terminal; edit {} directly instead",
            repo.location().display()
        );
    }

    let existing = repo.load().context("loading saved profile")?;
    let answers = prompt_answers(existing.as_ref())?;
    let cwd = std::env::current_dir().context("reading current directory")?;
    let record = build_record(answers, existing.as_ref(), &cwd);
    let profile = ConnectionProfile::try_from(&record).context("profile is incomplete")?;

    let theme = prompt_theme();
    let run_test = !skip_test
        && Confirm::with_theme(&theme)
            .with_prompt("Test the connection and destination now?")
            .default(true)
            .interact()?;

    if run_test {
        eprintln!("{} Testing {}...", Icon::Progress.render(ui.color, ui.unicode), profile.target());
        let result = check_profile(&record, &profile).await;
        print_check_result(ui, &profile, &result);
        if let Err(failure) = &result {
            eprintln!("{}", failure);
            let save_anyway = Confirm::with_theme(&theme)
                .with_prompt("Save this profile anyway?")
                .default(false)
                .interact()?;
            if !save_anyway {
                bail!("profile not saved");
            }
        }
    }

    repo.save(&record)?;
    eprintln!(
        "{} Saved {}",
        Icon::Success.render(ui.color, ui.unicode),
        repo.location().display()
    );
    Ok(())
}

fn prompt_answers(existing: Option<&ProfileRecord>) -> Result<Answers> {
    let theme = prompt_theme();

    let host: String = Input::with_theme(&theme)
        .with_prompt("SSH host")
        .with_initial_text(existing.map(|r| r.host.clone()).unwrap_or_default())
        .validate_with(|input: &String| not_blank(input, "host"))
        .interact_text()?;

    let port: u16 = Input::with_theme(&theme)
        .with_prompt("SSH port")
        .default(existing.map_or(DEFAULT_PORT, |r| r.port))
        .validate_with(|port: &u16| {
            if *port == 0 {
                Err("port must be between 1 and 65535")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    let username: String = Input::with_theme(&theme)
        .with_prompt("SSH username")
        .default(existing.map_or_else(|| "root".to_string(), |r| r.username.clone()))
        .validate_with(|input: &String| not_blank(input, "username"))
        .interact_text()?;

    let private_key_path: String = Input::with_theme(&theme)
        .with_prompt("Private key file")
        .with_initial_text(
            existing
                .and_then(|r| r.private_key_path.as_ref())
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        )
        .validate_with(|input: &String| {
            not_blank(input, "private key path")?;
            let path = expand_tilde(Path::new(input.trim()));
            if path.is_file() {
                Ok(())
            } else {
                Err(format!("no such file: {}", path.display()))
            }
        })
        .interact_text()?;

    let passphrase = Password::with_theme(&theme)
        .with_prompt("Key passphrase (empty for none)")
        .allow_empty_password(true)
        .interact()?;

    let local_dir: String = Input::with_theme(&theme)
        .with_prompt("Local directory")
        .default(existing.map_or_else(
            || ".".to_string(),
            |r| r.local_dir.display().to_string(),
        ))
        .validate_with(|input: &String| {
            not_blank(input, "local directory")?;
            let path = expand_tilde(Path::new(input.trim()));
            if path.is_dir() {
                Ok(())
            } else {
                Err(format!("not a directory: {}", path.display()))
            }
        })
        .interact_text()?;

    let remote_dir: String = Input::with_theme(&theme)
        .with_prompt("Remote directory")
        .default(existing.map_or_else(|| "/tmp".to_string(), |r| r.remote_dir.clone()))
        .validate_with(|input: &String| not_blank(input, "remote directory"))
        .interact_text()?;

    Ok(Answers {
        host,
        port,
        username,
        private_key_path,
        passphrase,
        local_dir,
        remote_dir,
    })
}

fn not_blank(input: &str, what: &str) -> Result<(), String> {
    if input.trim().is_empty() {
        Err(format!("{} must not be empty", what))
    } else {
        Ok(())
    }
}

/// Turn answers into a record. Local paths become absolute, the inline key
/// is replaced by the key file and `[transfer]` settings are carried over.
fn build_record(answers: Answers, existing: Option<&ProfileRecord>, cwd: &Path) -> ProfileRecord {
    let absolute = |raw: &str| -> PathBuf {
        let path = expand_tilde(Path::new(raw.trim()));
        if path.is_absolute() {
            path
        } else {
            cwd.join(path)
        }
    };

    ProfileRecord {
        host: answers.host.trim().to_string(),
        port: answers.port,
        username: answers.username.trim().to_string(),
        private_key_path: Some(absolute(&answers.private_key_path)),
        private_key: None,
        passphrase: Some(answers.passphrase).filter(|p| !p.is_empty()),
        local_dir: absolute(&answers.local_dir),
        remote_dir: answers.remote_dir.trim().to_string(),
        transfer: existing
            .map(|r| r.transfer.clone())
            .unwrap_or_else(TransferSettings::default),
    }
}
