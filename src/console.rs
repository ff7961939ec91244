// 🖥️ Command Dispatcher (REPL)
// One line in, one command dispatched, output written, repeat.
//
// Each command validates its arguments in a fixed order and the first
// failing check prints exactly one message. User mistakes never end the
// session; storage failures do.

use crate::config::{ClassFilter, ConsoleConfig};
use crate::error::{CommandError, ConsoleError, StoreError};
use crate::input::{LineSource, ReadResult};
use crate::parser;
use crate::registry::ClassRegistry;
use crate::storage::FileStorage;
use serde_json::Value;
use std::io::{self, Write};
use tracing::debug;

// ============================================================================
// COMMAND TABLE
// ============================================================================

/// Usage text per command, in the order `help` lists them.
pub const COMMANDS: &[(&str, &str)] = &[
    ("EOF", "Exit the console at end of input"),
    ("all", "Print the string form of all instances, optionally of one class\n[USAGE]: all [<class>]"),
    ("create", "Create an instance of a class, save it and print its id\n[USAGE]: create <class>"),
    ("destroy", "Delete an instance by class name and id\n[USAGE]: destroy <class> <id>"),
    ("help", "List commands, or show the usage of one\n[USAGE]: help [<command>]"),
    ("quit", "Exit the console"),
    ("show", "Print the string form of an instance by class name and id\n[USAGE]: show <class> <id>"),
    (
        "update",
        "Add or update an attribute of an instance\n[USAGE]: update <class> <id> <attribute> \"<value>\"",
    ),
];

/// Whether the loop keeps going after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// A command either fails on user input (printed, session continues) or
/// on storage/output (session ends).
enum Failure {
    Command(CommandError),
    Fatal(ConsoleError),
}

impl From<CommandError> for Failure {
    fn from(err: CommandError) -> Self {
        Failure::Command(err)
    }
}

impl From<StoreError> for Failure {
    fn from(err: StoreError) -> Self {
        Failure::Fatal(err.into())
    }
}

impl From<io::Error> for Failure {
    fn from(err: io::Error) -> Self {
        Failure::Fatal(err.into())
    }
}

type Outcome = Result<(), Failure>;

// ============================================================================
// CONSOLE
// ============================================================================

pub struct Console<'a, W: Write> {
    store: &'a mut FileStorage,
    registry: &'a ClassRegistry,
    config: ConsoleConfig,
    out: W,
}

impl<'a, W: Write> Console<'a, W> {
    pub fn new(
        store: &'a mut FileStorage,
        registry: &'a ClassRegistry,
        config: ConsoleConfig,
        out: W,
    ) -> Self {
        Self {
            store,
            registry,
            config,
            out,
        }
    }

    /// Read and execute lines until `quit`, end of input, or the first
    /// storage or I/O failure
    pub fn run<S: LineSource>(&mut self, source: &mut S) -> Result<(), ConsoleError> {
        loop {
            let prompt = self.config.effective_prompt().to_string();
            match source.read_line(&prompt)? {
                ReadResult::Line(line) => {
                    if !line.trim().is_empty() {
                        source.add_history(&line);
                    }
                    if self.execute(&line)? == Flow::Quit {
                        break;
                    }
                }
                ReadResult::Interrupted => {
                    writeln!(self.out)?;
                    self.out.flush()?;
                }
                ReadResult::Eof => {
                    if self.config.interactive {
                        writeln!(self.out)?;
                    }
                    break;
                }
            }
        }

        self.out.flush()?;
        Ok(())
    }

    /// Dispatch a single line. Validation messages are printed, only
    /// fatal failures come back as `Err`.
    pub fn execute(&mut self, line: &str) -> Result<Flow, ConsoleError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Flow::Continue);
        }

        let (command, arg) = split_command(line);
        debug!(command, arg, "dispatching");

        let outcome = match command {
            "create" => self.create(arg),
            "show" => self.show(arg),
            "destroy" => self.destroy(arg),
            "all" => self.all(arg),
            "update" => self.update(arg),
            "help" | "?" => self.help(arg),
            "quit" | "EOF" => return Ok(Flow::Quit),
            _ => self.print(format_args!("*** Unknown syntax: {}", line)),
        };

        match outcome {
            Ok(()) => {}
            Err(Failure::Command(err)) => writeln!(self.out, "{}", err)?,
            Err(Failure::Fatal(err)) => return Err(err),
        }

        self.out.flush()?;
        Ok(Flow::Continue)
    }

    // ========================================================================
    // COMMANDS
    // ========================================================================

    /// create <class>
    fn create(&mut self, arg: &str) -> Outcome {
        if arg.is_empty() {
            return Err(CommandError::ClassNameMissing.into());
        }
        let entity = self
            .registry
            .create(arg)
            .ok_or(CommandError::ClassDoesNotExist)?;

        let id = entity.id().to_string();
        self.store.insert(entity);
        self.store.save()?;

        self.print(format_args!("{}", id))
    }

    /// show <class> <id>
    fn show(&mut self, arg: &str) -> Outcome {
        let key = self.locate(arg)?;
        let text = self
            .store
            .get(&key)
            .map(ToString::to_string)
            .ok_or(CommandError::NoInstanceFound)?;

        self.print(format_args!("{}", text))
    }

    /// destroy <class> <id>
    fn destroy(&mut self, arg: &str) -> Outcome {
        let key = self.locate(arg)?;
        self.store.all_mut().remove(&key);
        self.store.save()?;
        Ok(())
    }

    /// all [<class>]
    fn all(&mut self, arg: &str) -> Outcome {
        let words = parser::split_words(arg)?;

        let lines: Vec<String> = match words.first() {
            None => self.store.all().values().map(ToString::to_string).collect(),
            Some(class) => {
                if !self.registry.contains(class) {
                    return Err(CommandError::ClassDoesNotExist.into());
                }
                let filter = self.config.class_filter;
                self.store
                    .all()
                    .values()
                    .filter(|entity| match filter {
                        ClassFilter::Exact => entity.class_name() == class.as_str(),
                        ClassFilter::Substring => entity.to_string().contains(class.as_str()),
                    })
                    .map(ToString::to_string)
                    .collect()
            }
        };

        for line in lines {
            writeln!(self.out, "{}", line)?;
        }
        Ok(())
    }

    /// update <class> <id> <attribute> "<value>"
    ///
    /// Once the class is known to exist the store is saved whatever the rest
    /// of the validation says, unless `save_on_failed_update` is off.
    fn update(&mut self, arg: &str) -> Outcome {
        let tokens = parser::parse_line(arg)?;
        let class = tokens.first().ok_or(CommandError::ClassNameMissing)?;
        if !self.registry.contains(class) {
            return Err(CommandError::ClassDoesNotExist.into());
        }

        let applied = self.apply_update(&tokens);
        if applied.is_ok() || self.config.save_on_failed_update {
            self.store.save()?;
        }
        Ok(applied?)
    }

    fn apply_update(&mut self, tokens: &[String]) -> Result<(), CommandError> {
        let id = tokens.get(1).ok_or(CommandError::InstanceIdMissing)?;
        let key = format!("{}.{}", tokens[0], id);
        let touch = self.config.touch_on_update;

        let entity = self
            .store
            .get_mut(&key)
            .ok_or(CommandError::NoInstanceFound)?;
        let attribute = tokens.get(2).ok_or(CommandError::AttributeNameMissing)?;
        let raw = tokens.get(3).ok_or(CommandError::ValueMissing)?;

        let value = match entity.kind().attribute(attribute) {
            Some(definition) => definition.type_.coerce(attribute, raw)?,
            None => Value::String(raw.clone()),
        };
        entity.set(attribute, value)?;
        if touch {
            entity.touch();
        }
        Ok(())
    }

    /// help [<command>]
    fn help(&mut self, arg: &str) -> Outcome {
        if arg.is_empty() {
            let names: Vec<&str> = COMMANDS.iter().map(|(name, _)| *name).collect();
            let header = "Documented commands (type help <topic>):";
            return self.print(format_args!(
                "\n{}\n{}\n{}\n",
                header,
                "=".repeat(header.len()),
                names.join("  ")
            ));
        }

        match COMMANDS.iter().find(|(name, _)| *name == arg) {
            Some((_, usage)) => self.print(format_args!("{}", usage)),
            None => self.print(format_args!("*** No help on {}", arg)),
        }
    }

    // ========================================================================
    // HELPERS
    // ========================================================================

    /// Resolve `<class> <id>` for show/destroy to a store key.
    ///
    /// Splits once on the first whitespace; the id is the text up to the
    /// next whitespace, anything after it is ignored.
    fn locate(&self, arg: &str) -> Result<String, CommandError> {
        let (class, rest) = arg.split_once(char::is_whitespace).unwrap_or((arg, ""));
        let id = rest.split(char::is_whitespace).next().unwrap_or("");

        if class.is_empty() {
            return Err(CommandError::ClassNameMissing);
        }
        if !self.registry.contains(class) {
            return Err(CommandError::ClassDoesNotExist);
        }
        if id.is_empty() {
            return Err(CommandError::InstanceIdMissing);
        }

        let key = format!("{}.{}", class, id);
        if !self.store.all().contains_key(&key) {
            return Err(CommandError::NoInstanceFound);
        }
        Ok(key)
    }

    fn print(&mut self, text: std::fmt::Arguments<'_>) -> Outcome {
        writeln!(self.out, "{}", text)?;
        Ok(())
    }
}

/// Split a line into its command word and the trimmed remainder.
///
/// The command word is the leading run of letters, digits and underscores;
/// a leading `?` is shorthand for `help`.
fn split_command(line: &str) -> (&str, &str) {
    if let Some(rest) = line.strip_prefix('?') {
        return ("?", rest.trim());
    }

    let end = line
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(line.len());
    (&line[..end], line[end..].trim())
}

// ============================================================================
// TESTS
// ============================================================================
