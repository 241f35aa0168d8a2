use chrono::NaiveDate;

pub mod category;
pub mod data;
pub mod report;
pub mod system;
pub mod transaction;

use super::context::CommandError;
use super::registry::CommandEntry;

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(transaction::definitions());
    commands.extend(report::definitions());
    commands.extend(category::definitions());
    commands.extend(data::definitions());
    commands.extend(system::definitions());
    commands
}

/// Positional arguments plus `--flag value` options and bare `--switch`es.
#[derive(Debug, Default)]
pub(crate) struct ParsedArgs<'a> {
    pub positional: Vec<&'a str>,
    options: Vec<(&'a str, &'a str)>,
    switches: Vec<&'a str>,
}

impl<'a> ParsedArgs<'a> {
    /// Splits `args`. Names in `switches` take no value; any other `--name`
    /// consumes the following argument.
    pub fn parse(args: &[&'a str], switches: &[&str]) -> Result<Self, CommandError> {
        let mut parsed = ParsedArgs::default();
        let mut iter = args.iter().copied();
        while let Some(arg) = iter.next() {
            let Some(name) = arg.strip_prefix("--") else {
                parsed.positional.push(arg);
                continue;
            };
            if switches.contains(&name) {
                parsed.switches.push(name);
                continue;
            }
            let value = iter.next().ok_or_else(|| {
                CommandError::InvalidArguments(format!("`--{name}` needs a value"))
            })?;
            parsed.options.push((name, value));
        }
        Ok(parsed)
    }

    pub fn option(&self, name: &str) -> Option<&'a str> {
        self.options
            .iter()
            .rev()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
    }

    pub fn options(&self, name: &'a str) -> impl Iterator<Item = &'a str> + '_ {
        self.options
            .iter()
            .filter(move |(key, _)| *key == name)
            .map(|(_, value)| *value)
    }

    pub fn switch(&self, name: &str) -> bool {
        self.switches.contains(&name)
    }

    /// Rejects options outside `known`.
    pub fn expect_only(&self, known: &[&str]) -> Result<(), CommandError> {
        match self
            .options
            .iter()
            .map(|(key, _)| *key)
            .find(|key| !known.contains(key))
        {
            Some(unknown) => Err(CommandError::InvalidArguments(format!(
                "unknown option `--{unknown}`"
            ))),
            None => Ok(()),
        }
    }
}

pub(crate) fn parse_date(input: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{input}` (use YYYY-MM-DD)"))
    })
}

pub(crate) fn parse_amount(input: &str) -> Result<f64, CommandError> {
    let amount: f64 = input
        .trim()
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("invalid amount `{input}`")))?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(CommandError::InvalidArguments(
            "amount must be a positive number".into(),
        ));
    }
    Ok(amount)
}

pub(crate) fn usage(text: &str) -> CommandError {
    CommandError::InvalidArguments(format!("usage: {text}"))
}
