//! Show command - print the saved profile with secrets redacted

use anyhow::Result;
use dcr::config;
use dcr::domain::ports::ProfileRepository;
use dcr::ProfileRecord;

use super::load_profile;
use crate::ui::context::UiContext;
use crate::ui::theme::dim;

const REDACTED: &str = "<redacted>";

pub fn cmd_show(ui: &UiContext, repo: &impl ProfileRepository) -> Result<()> {
    let record = redacted(load_profile(repo)?);

    if ui.json {
        crate::ui::json::emit(serde_json::json!({
            "event": "profile",
            "command": "show",
            "path": repo.location().display().to_string(),
            "profile": record,
        }))?;
        return Ok(());
    }

    println!(
        "{}",
        dim(&format!("# {}", repo.location().display()), ui.color)
    );
    print!("{}", config::render_profile(&record)?);
    Ok(())
}

/// Copy of `record` with the passphrase and inline key masked.
fn redacted(mut record: ProfileRecord) -> ProfileRecord {
    if record.passphrase.as_deref().is_some_and(|p| !p.is_empty()) {
        record.passphrase = Some(REDACTED.to_string());
    }
    if record.private_key.is_some() {
        record.private_key = Some(REDACTED.to_string());
    }
    record
}
