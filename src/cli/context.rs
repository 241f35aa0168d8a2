//! Shell state, command dispatch, and error reporting.

use std::{io, path::PathBuf, sync::Arc};

use chrono::{Local, NaiveDate};
use dialoguer::theme::ColorfulTheme;
use strsim::levenshtein;

use crate::{
    config::{Config, ConfigManager},
    core::{ledger_manager::LedgerManager, services::ServiceError, utils::PathResolver},
    errors::{BookError, CliError},
    storage::{JsonFileStore, KeyValueStore},
};

use super::commands;
use super::io as cli_io;
use super::output::{self, OutputPreferences};
use super::registry::{CommandEntry, CommandRegistry};

const SUGGESTION_DISTANCE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// Failure of a single command. Reported to the user; the shell keeps running.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] BookError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<ServiceError> for CommandError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Book(BookError::InvalidInput(message)) | ServiceError::Invalid(message) => {
                CommandError::InvalidArguments(message)
            }
            ServiceError::Book(err) => CommandError::Core(err),
            ServiceError::NotFound(id) => {
                CommandError::Message(format!("No transaction with id `{id}`"))
            }
        }
    }
}

pub struct ShellContext {
    mode: CliMode,
    pub registry: CommandRegistry,
    pub ledger: LedgerManager,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub theme: ColorfulTheme,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, PathResolver::base_dir())
    }

    /// Opens the data directory at `base`: config first, then the store it
    /// configures.
    pub fn with_base_dir(mode: CliMode, base: PathBuf) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(base)?;
        let config = config_manager.load()?;
        let store = JsonFileStore::new(config_manager.store_dir(), config.storage_quota())?;
        tracing::debug!(dir = %store.dir().display(), "opened store");
        Ok(Self::from_parts(mode, config_manager, config, Arc::new(store)))
    }

    pub fn from_parts(
        mode: CliMode,
        config_manager: ConfigManager,
        config: Config,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        output::set_preferences(OutputPreferences {
            plain_mode: config.plain_output || mode == CliMode::Script,
        });
        Self {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            ledger: LedgerManager::load(store),
            config_manager,
            config,
            theme: ColorfulTheme::default(),
            running: true,
        }
    }

    pub fn mode(&self) -> CliMode {
        self.mode
    }

    pub fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    pub fn prompt(&self) -> String {
        format!("bookkeeping [{}] ❯ ", self.ledger.transactions().len())
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub fn format_amount(&self, amount: f64) -> String {
        self.config.format_amount(amount)
    }

    /// Asks before a destructive action. `assume_yes` comes from `--yes`;
    /// script mode never prompts and declines without it.
    pub(crate) fn confirm(&self, prompt: &str, assume_yes: bool) -> Result<bool, CommandError> {
        if assume_yes {
            return Ok(true);
        }
        match self.mode {
            CliMode::Interactive => cli_io::confirm_action(&self.theme, prompt, false),
            CliMode::Script => {
                cli_io::print_warning(format!("{prompt} Pass `--yes` to confirm."));
                Ok(false)
            }
        }
    }

    /// Tells the user when a change stayed in memory because the store
    /// rejected the write.
    pub(crate) fn warn_unpersisted(&self, error: Option<&BookError>) {
        if let Some(err) = error {
            cli_io::print_warning(format!(
                "The change is kept for this session but was not saved: {err}"
            ));
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));
        if let Some(best) = self.closest_command(input) {
            cli_io::print_hint(format!("Did you mean `{best}`?"));
        }
    }

    pub(crate) fn closest_command(&self, input: &str) -> Option<&'static str> {
        let input = input.to_lowercase();
        self.registry
            .names()
            .map(|name| (levenshtein(name, &input), name))
            .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, name)| name)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit shell?", true).or(Ok(true))
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Io(err) => Err(err.into()),
            other => {
                cli_io::print_error(other);
                Ok(())
            }
        }
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                self.print_warning(&err.to_string());
                return Ok(LoopControl::Continue);
            }
        };
        let Some((raw, rest)) = tokens.split_first() else {
            return Ok(LoopControl::Continue);
        };
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        self.dispatch(&raw.to_lowercase(), raw, &args)
    }
}

#[cfg(test)]
pub(crate) fn script_context() -> ShellContext {
    use crate::storage::MemoryStore;

    let base = std::env::temp_dir().join(format!("bookkeeping-test-{}", uuid::Uuid::new_v4()));
    let config_manager = ConfigManager::with_base_dir(base).expect("config manager");
    ShellContext::from_parts(
        CliMode::Script,
        config_manager,
        Config::default(),
        Arc::new(MemoryStore::new()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_nearby_command_names() {
        let context = script_context();
        assert_eq!(context.closest_command("dashbord"), Some("dashboard"));
        assert_eq!(context.closest_command("STATS"), Some("stats"));
        assert_eq!(context.closest_command("zzzzzzzzzz"), None);
    }

    #[test]
    fn script_mode_declines_unconfirmed_actions() {
        let context = script_context();
        assert!(!context.confirm("Delete everything?", false).unwrap());
        assert!(context.confirm("Delete everything?", true).unwrap());
    }

    #[test]
    fn unknown_commands_keep_the_loop_running() {
        let mut context = script_context();
        assert_eq!(
            context.process_line("frobnicate").unwrap(),
            LoopControl::Continue
        );
        assert_eq!(context.process_line("exit").unwrap(), LoopControl::Exit);
    }

    #[test]
    fn service_errors_map_to_user_facing_messages() {
        let err = CommandError::from(ServiceError::NotFound("42".into()));
        assert_eq!(err.to_string(), "No transaction with id `42`");
        let err = CommandError::from(ServiceError::Book(BookError::InvalidInput("bad".into())));
        assert!(matches!(err, CommandError::InvalidArguments(_)));
    }
}
