//! Line-based console interaction

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use std::io::{self, BufRead, IsTerminal, Write};
use tracing::warn;

/// User-facing output and input (allows scripting for tests)
pub trait Prompt {
    /// Print a message. A message ending in a space stays on the current line.
    fn say(&mut self, message: &str);

    /// Ask for one line of input; `None` at end of input
    fn ask(&mut self, question: &str) -> Option<String>;

    /// Ask for input without echoing it
    fn ask_secret(&mut self, question: &str) -> Option<String>;
}

/// Prompt on the process's stdin and stdout
#[derive(Debug, Default)]
pub struct Console;

impl Console {
    pub fn new() -> Self {
        Self
    }

    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                warn!("Failed to read input: {}", e);
                None
            }
        }
    }

    /// Read keys in raw mode, echoing `*` for each character
    fn read_masked(&mut self) -> io::Result<Option<String>> {
        terminal::enable_raw_mode()?;
        let result = read_masked_keys();
        terminal::disable_raw_mode()?;

        let mut stdout = io::stdout();
        write!(stdout, "\r\n")?;
        stdout.flush()?;
        result
    }
}

fn read_masked_keys() -> io::Result<Option<String>> {
    let mut stdout = io::stdout();
    let mut secret = String::new();

    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Enter => return Ok(Some(secret)),
            KeyCode::Char('c') | KeyCode::Char('d')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                return Ok(None);
            }
            KeyCode::Backspace => {
                if secret.pop().is_some() {
                    write!(stdout, "\u{8} \u{8}")?;
                }
            }
            KeyCode::Char(c) => {
                secret.push(c);
                write!(stdout, "*")?;
            }
            _ => {}
        }
        stdout.flush()?;
    }
}

impl Prompt for Console {
    fn say(&mut self, message: &str) {
        let mut stdout = io::stdout().lock();
        let written = if message.ends_with(' ') {
            write!(stdout, "{}", message).and_then(|_| stdout.flush())
        } else {
            writeln!(stdout, "{}", message)
        };
        if let Err(e) = written {
            warn!("Failed to write output: {}", e);
        }
    }

    fn ask(&mut self, question: &str) -> Option<String> {
        self.say(question);
        self.read_line()
    }

    fn ask_secret(&mut self, question: &str) -> Option<String> {
        self.say(question);
        if !io::stdin().is_terminal() {
            return self.read_line();
        }

        match self.read_masked() {
            Ok(secret) => secret,
            Err(e) => {
                warn!("Failed to read masked input: {}", e);
                None
            }
        }
    }
}

/// Replays canned answers and records everything said
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: std::collections::VecDeque<String>,
    pub output: Vec<String>,
    pub questions: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            output: Vec::new(),
            questions: Vec::new(),
        }
    }

    /// Answers not yet consumed
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    pub fn transcript(&self) -> String {
        self.output.join("\n")
    }
}

impl Prompt for ScriptedPrompt {
    fn say(&mut self, message: &str) {
        self.output.push(message.to_string());
    }

    fn ask(&mut self, question: &str) -> Option<String> {
        self.questions.push(question.to_string());
        self.answers.pop_front()
    }

    fn ask_secret(&mut self, question: &str) -> Option<String> {
        self.ask(question)
    }
}
