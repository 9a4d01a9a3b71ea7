//! Saved theme preference command.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Subcommand;

use folio_static::{PreferenceStore, Theme, ThemeController};

use crate::config::load_config;

#[derive(Debug, Subcommand)]
pub enum ThemeAction {
    /// Print the active theme
    Show,
    /// Switch to the other theme and save the choice
    Toggle,
    /// Forget the saved choice
    Reset,
    /// Print the theme that applies when the system preference changes
    System {
        /// New system preference
        theme: Theme,
    },
}

/// Run the theme command.
pub fn run(config_path: &Path, system: Option<Theme>, action: ThemeAction) -> Result<()> {
    let config = load_config(config_path)?;
    let store = config.theme_store();
    let store_path = store.path().clone();

    let mut controller =
        ThemeController::new(store, system).context("Failed to read theme preference")?;
    let theme = apply(&mut controller, action)
        .with_context(|| format!("Failed to update {}", store_path.display()))?;

    println!("{}", theme);
    Ok(())
}

fn apply<S: PreferenceStore>(
    controller: &mut ThemeController<S>,
    action: ThemeAction,
) -> Result<Theme> {
    let theme = match action {
        ThemeAction::Show => controller.current(),
        ThemeAction::Toggle => {
            let theme = controller.toggle()?;
            tracing::info!("Saved theme {}", theme);
            theme
        }
        ThemeAction::Reset => {
            let theme = controller.reset()?;
            tracing::info!("Cleared saved theme");
            theme
        }
        ThemeAction::System { theme } => {
            if controller.has_explicit_choice() {
                tracing::info!("Saved choice overrides the system preference");
            }
            controller.on_system_change(theme)
        }
    };
    Ok(theme)
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_static::MemoryStore;

    #[test]
    fn toggle_then_system_change_keeps_choice() {
        let mut controller = ThemeController::new(MemoryStore::new(), Some(Theme::Dark)).unwrap();

        assert_eq!(apply(&mut controller, ThemeAction::Show).unwrap(), Theme::Dark);
        assert_eq!(apply(&mut controller, ThemeAction::Toggle).unwrap(), Theme::Light);
        assert_eq!(
            apply(&mut controller, ThemeAction::System { theme: Theme::Dark }).unwrap(),
            Theme::Light
        );
        assert_eq!(apply(&mut controller, ThemeAction::Reset).unwrap(), Theme::Dark);
    }
}
