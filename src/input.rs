// ⌨️ Line Sources
// The dispatcher reads through LineSource, so the same loop runs against
// the terminal (rustyline with history and completion), a pipe or a
// script held in memory.

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Config, Context, Editor, Helper};
use std::io::{self, BufRead};

// ============================================================================
// LINE SOURCE
// ============================================================================

/// Result of reading one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadResult {
    /// A complete line, without its line terminator.
    Line(String),
    /// Ctrl+C at the prompt.
    Interrupted,
    /// End of input.
    Eof,
}

/// Anything the console can read lines from.
pub trait LineSource {
    /// Read one line, showing `prompt` if the source displays prompts
    fn read_line(&mut self, prompt: &str) -> io::Result<ReadResult>;

    /// Record a line in history, if the source keeps one.
    fn add_history(&mut self, _line: &str) {}
}

// ============================================================================
// SCRIPT INPUT (pipes, files, tests)
// ============================================================================

/// Reads from any buffered reader. Prompts are not shown.
pub struct ScriptInput<R> {
    reader: R,
}

impl<R: BufRead> ScriptInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for ScriptInput<R> {
    fn read_line(&mut self, _prompt: &str) -> io::Result<ReadResult> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(ReadResult::Eof);
        }

        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(ReadResult::Line(line))
    }
}

// ============================================================================
// TERMINAL INPUT
// ============================================================================

/// Completes the command word, then a class name.
struct ConsoleHelper {
    commands: Vec<String>,
    classes: Vec<String>,
}

impl Completer for ConsoleHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let start = line[..pos].rfind(char::is_whitespace).map_or(0, |i| i + 1);
        let word = &line[start..pos];
        let preceding_words = line[..start].split_whitespace().count();

        let pool = match preceding_words {
            0 => &self.commands,
            1 => &self.classes,
            _ => return Ok((start, Vec::new())),
        };

        let candidates = pool
            .iter()
            .filter(|candidate| candidate.starts_with(word))
            .map(|candidate| Pair {
                display: candidate.clone(),
                replacement: candidate.clone(),
            })
            .collect();

        Ok((start, candidates))
    }
}

impl Hinter for ConsoleHelper {
    type Hint = String;
}

impl Highlighter for ConsoleHelper {}

impl Validator for ConsoleHelper {}

impl Helper for ConsoleHelper {}

/// Interactive terminal input backed by rustyline.
pub struct TerminalInput {
    editor: Editor<ConsoleHelper, DefaultHistory>,
}

impl TerminalInput {
    /// Terminal reader completing the given command and class names
    pub fn new<C, N>(commands: C, classes: N) -> io::Result<Self>
    where
        C: IntoIterator,
        C::Item: Into<String>,
        N: IntoIterator,
        N::Item: Into<String>,
    {
        let config = Config::builder().auto_add_history(false).build();
        let mut editor = Editor::with_config(config).map_err(into_io)?;
        editor.set_helper(Some(ConsoleHelper {
            commands: commands.into_iter().map(Into::into).collect(),
            classes: classes.into_iter().map(Into::into).collect(),
        }));

        Ok(Self { editor })
    }
}

impl LineSource for TerminalInput {
    fn read_line(&mut self, prompt: &str) -> io::Result<ReadResult> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadResult::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadResult::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadResult::Eof),
            Err(err) => Err(into_io(err)),
        }
    }

    fn add_history(&mut self, line: &str) {
        let _ = self.editor.add_history_entry(line);
    }
}

fn into_io(err: ReadlineError) -> io::Error {
    match err {
        ReadlineError::Io(err) => err,
        other => io::Error::other(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_input_strips_terminators() {
        let mut source = ScriptInput::new("create User\r\nall\nlast".as_bytes());

        assert_eq!(source.read_line("").unwrap(), ReadResult::Line("create User".to_string()));
        assert_eq!(source.read_line("").unwrap(), ReadResult::Line("all".to_string()));
        assert_eq!(source.read_line("").unwrap(), ReadResult::Line("last".to_string()));
        assert_eq!(source.read_line("").unwrap(), ReadResult::Eof);
    }

    #[test]
    fn test_script_input_keeps_blank_lines() {
        let mut source = ScriptInput::new("\n\n".as_bytes());

        assert_eq!(source.read_line("").unwrap(), ReadResult::Line(String::new()));
        assert_eq!(source.read_line("").unwrap(), ReadResult::Line(String::new()));
        assert_eq!(source.read_line("").unwrap(), ReadResult::Eof);
    }

    #[test]
    fn test_completion_pools() {
        let helper = ConsoleHelper {
            commands: vec!["create".into(), "all".into(), "quit".into()],
            classes: vec!["User".into(), "Review".into()],
        };
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);

        let (start, found) = helper.complete("cr", 2, &ctx).unwrap();
        assert_eq!(start, 0);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].replacement, "create");

        let (start, found) = helper.complete("show Us", 7, &ctx).unwrap();
        assert_eq!(start, 5);
        assert_eq!(found[0].replacement, "User");

        let (_, found) = helper.complete("show User 12", 12, &ctx).unwrap();
        assert!(found.is_empty());
    }
}
