//! Reset command - delete the saved profile

use anyhow::{bail, Result};
use dcr::domain::ports::ProfileRepository;
use dialoguer::Confirm;
use is_terminal::IsTerminal;

use crate::ui::context::UiContext;
use crate::ui::theme::{prompt_theme, Icon};

pub fn cmd_reset(ui: &UiContext, repo: &impl ProfileRepository, yes: bool) -> Result<()> {
    let location = repo.location();

    if !yes {
        if ui.json || !std::io::stdin().is_terminal() {
            bail!("refusing to delete {} without --yes", location.display());
        }
        let confirmed = Confirm::with_theme(&prompt_theme())
            .with_prompt(format!("Delete {}?", location.display()))
            .default(false)
            .interact()?;
        if !confirmed {
            eprintln!("Kept {}", location.display());
            return Ok(());
        }
    }

    let removed = repo.clear()?;

    if ui.json {
        crate::ui::json::emit(serde_json::json!({
            "event": "reset",
            "command": "reset",
            "path": location.display().to_string(),
            "removed": removed,
        }))?;
    } else if removed {
        eprintln!(
            "{} Removed {}",
            Icon::Success.render(ui.color, ui.unicode),
            location.display()
        );
    } else {
        eprintln!("No saved profile at {}", location.display());
    }
    Ok(())
}
