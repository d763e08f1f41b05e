#![forbid(unsafe_code)]

//! Scripted driver for the line-correspondence engine.
//!
//! Screens are one cell wide: each line is a single letter, so a script can
//! describe a whole screen as a word. Unused lines read `.`.
//!
//! # Commands
//!
//! | Command | Effect |
//! |---------|--------|
//! | `# text` | comment, copied to the transcript |
//! | `o<letters>` | set the old screen |
//! | `n<letters>` | set the new screen |
//! | `h` | run the engine, record the map and its hunks |
//! | `d` | record both screens |
//!
//! Blank lines are ignored.
//!
//! # Example
//!
//! ```
//! use linemap_harness::ScriptDriver;
//!
//! let mut driver = ScriptDriver::new(5);
//! driver.run("oABCDE\nnZABCD\nh").unwrap();
//! assert_eq!(driver.transcript()[0], "Result: - 0 1 2 3");
//! ```

use std::fmt;
use std::io::{self, BufRead};

use linemap_render::{LineMapContext, LineMapError, Screen};

/// Filler for lines a command does not set.
pub const UNUSED_LINE: char = '.';

/// Errors raised while running a script.
#[derive(Debug)]
pub enum ScriptError {
    /// The first character of a line is not a known command.
    UnknownCommand { line: usize, command: char },
    /// A screen command gave more letters than the screen has lines.
    TooManyLines {
        line: usize,
        given: usize,
        lines: usize,
    },
    /// The engine could not size itself for the screen.
    LineMap { line: usize, source: LineMapError },
    /// Reading the script failed.
    Io(io::Error),
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCommand { line, command } => {
                write!(f, "line {line}: unknown command {command:?}")
            }
            Self::TooManyLines { line, given, lines } => write!(
                f,
                "line {line}: {given} letters given for a {lines}-line screen"
            ),
            Self::LineMap { line, source } => write!(f, "line {line}: {source}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for ScriptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::LineMap { source, .. } => Some(source),
            Self::Io(e) => Some(e),
            Self::UnknownCommand { .. } | Self::TooManyLines { .. } => None,
        }
    }
}

impl From<io::Error> for ScriptError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Runs scripts against one long-lived [`LineMapContext`].
#[derive(Debug)]
pub struct ScriptDriver {
    lines: u16,
    old: Screen<char>,
    new: Screen<char>,
    ctx: LineMapContext,
    transcript: Vec<String>,
}

impl ScriptDriver {
    /// Create a driver for screens of `lines` lines.
    pub fn new(lines: u16) -> Self {
        Self::with_context(lines, LineMapContext::with_capacity(lines as usize))
    }

    /// Create a driver around an existing context.
    pub fn with_context(lines: u16, ctx: LineMapContext) -> Self {
        Self {
            lines,
            old: Screen::new(1, lines, UNUSED_LINE),
            new: Screen::new(1, lines, UNUSED_LINE),
            ctx,
            transcript: Vec::new(),
        }
    }

    /// Output recorded so far.
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    /// The engine context.
    pub fn context(&self) -> &LineMapContext {
        &self.ctx
    }

    /// The current old screen.
    pub fn old(&self) -> &Screen<char> {
        &self.old
    }

    /// The current new screen.
    pub fn new_screen(&self) -> &Screen<char> {
        &self.new
    }

    /// Run every line of `script`.
    ///
    /// Stops at the first failing line.
    pub fn run(&mut self, script: &str) -> Result<(), ScriptError> {
        for (i, line) in script.lines().enumerate() {
            self.execute(i + 1, line)?;
        }
        Ok(())
    }

    /// Run a script read line by line.
    pub fn run_reader<R: BufRead>(&mut self, reader: R) -> Result<(), ScriptError> {
        for (i, line) in reader.lines().enumerate() {
            self.execute(i + 1, &line?)?;
        }
        Ok(())
    }

    /// Run one script line. `line_no` is used in error messages.
    pub fn execute(&mut self, line_no: usize, line: &str) -> Result<(), ScriptError> {
        let mut chars = line.chars();
        let Some(command) = chars.next() else {
            return Ok(());
        };
        let rest = chars.as_str();

        match command {
            '#' => self.transcript.push(line.to_string()),
            'o' => self.old = self.load(line_no, rest)?,
            'n' => self.new = self.load(line_no, rest)?,
            'd' => {
                self.transcript
                    .push(format!("Old lines: [{}]", flatten(&self.old)));
                self.transcript
                    .push(format!("New lines: [{}]", flatten(&self.new)));
            }
            'h' => {
                let map = self
                    .ctx
                    .compute(&self.old, &self.new, ' ')
                    .map_err(|source| ScriptError::LineMap {
                        line: line_no,
                        source,
                    })?;
                let hunks: Vec<String> = map
                    .hunks()
                    .iter()
                    .map(|h| format!("{}..{}@{:+}", h.start, h.end, h.shift))
                    .collect();
                let result = format!("Result: {map}");
                self.transcript.push(result);
                self.transcript.push(format!("Hunks: [{}]", hunks.join(" ")));
            }
            c if c.is_whitespace() && rest.trim().is_empty() => {}
            other => {
                return Err(ScriptError::UnknownCommand {
                    line: line_no,
                    command: other,
                });
            }
        }
        Ok(())
    }

    fn load(&self, line_no: usize, letters: &str) -> Result<Screen<char>, ScriptError> {
        let letters: Vec<char> = letters.trim_end().chars().collect();
        if letters.len() > self.lines as usize {
            return Err(ScriptError::TooManyLines {
                line: line_no,
                given: letters.len(),
                lines: self.lines as usize,
            });
        }
        let rows: Vec<[char; 1]> = (0..self.lines as usize)
            .map(|i| [letters.get(i).copied().unwrap_or(UNUSED_LINE)])
            .collect();
        Ok(Screen::from_rows(1, UNUSED_LINE, &rows))
    }
}

fn flatten(screen: &Screen<char>) -> String {
    screen.lines().flat_map(|l| l.iter()).collect()
}
