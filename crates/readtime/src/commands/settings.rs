//! Settings command: the admin surface for the reading time settings.

use anyhow::Context;
use camino::Utf8Path;
use clap::{Args, Subcommand};
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use readtime_core::settings::{self, MAX_READING_SPEED, MIN_READING_SPEED};
use readtime_core::{OptionStore, Settings, SettingsField};

use super::open_store;

/// Arguments for the `settings` subcommand.
#[derive(Args, Debug)]
pub struct SettingsArgs {
    /// What to do with the settings.
    #[command(subcommand)]
    pub action: Option<SettingsAction>,
}

/// Settings actions.
#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Print the current settings (default)
    Show,

    /// Change one setting
    Set {
        /// Setting to change.
        #[arg(value_enum)]
        field: SettingsField,

        /// New value. Lists are comma-separated; flags take yes/no.
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Remove every stored setting, restoring the defaults
    Reset,

    /// Seed the store with the default reading speed if none is stored
    Init,
}

/// Show or change the reading time settings.
#[instrument(name = "cmd_settings", skip_all)]
pub fn cmd_settings(
    args: SettingsArgs,
    global_json: bool,
    options_path: &Utf8Path,
) -> anyhow::Result<()> {
    let action = args.action.unwrap_or(SettingsAction::Show);
    debug!(?action, store = %options_path, "executing settings command");

    let mut store = open_store(options_path)?;
    match action {
        SettingsAction::Show => {}
        SettingsAction::Set { field, value } => {
            let mut current = Settings::load(&store);
            current
                .apply(field, &value)
                .with_context(|| format!("cannot set {field}"))?;
            current
                .save_field(&mut store, field)
                .with_context(|| format!("failed to save {field} to {options_path}"))?;
            if !global_json {
                println!(
                    "{} {field} = {}",
                    "Updated".green(),
                    current.display_value(field)
                );
            }
        }
        SettingsAction::Reset => {
            settings::reset(&mut store)
                .with_context(|| format!("failed to reset settings in {options_path}"))?;
            if !global_json {
                println!("{} settings restored to defaults", "Reset:".green());
            }
        }
        SettingsAction::Init => {
            let seeded = settings::activate(&mut store)
                .with_context(|| format!("failed to initialize {options_path}"))?;
            if !global_json {
                if seeded {
                    println!("{} {options_path}", "Initialized".green());
                } else {
                    println!("{} {options_path}", "Already initialized:".dimmed());
                }
            }
        }
    }

    print_settings(&Settings::load(&store), &store, global_json)
}

fn print_settings<S: OptionStore>(
    current: &Settings,
    store: &S,
    global_json: bool,
) -> anyhow::Result<()> {
    if global_json {
        println!("{}", serde_json::to_string_pretty(current)?);
        return Ok(());
    }

    println!();
    println!("{}", "Reading Time Settings".bold().underline());
    for field in SettingsField::ALL {
        let value = current.display_value(field);
        let stored = store.get(&field.option_key()).is_some();
        let shown = if value.is_empty() {
            "(none)".dimmed().to_string()
        } else {
            value
        };
        if stored {
            println!("{}: {shown}", field.as_str().dimmed());
        } else {
            println!("{}: {shown} {}", field.as_str().dimmed(), "(default)".dimmed());
        }
    }
    if !current.placement.is_known() {
        println!(
            "{} placement {:?} is not one of before, after, manual; nothing will be injected",
            "warning:".yellow(),
            current.placement.as_str()
        );
    }
    if !(MIN_READING_SPEED..=MAX_READING_SPEED).contains(&current.reading_speed) {
        println!(
            "{} reading speed {} is outside {MIN_READING_SPEED}-{MAX_READING_SPEED}",
            "warning:".yellow(),
            current.reading_speed
        );
    }
    Ok(())
}
