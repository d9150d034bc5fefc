// Console I/O for the prioritization loop

use anyhow::{Context, Result};
use crossterm::style::Stylize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::{self, IsTerminal};

/// Where the loop prints feedback and reads progress updates
pub trait Console {
    fn show_greeting(&mut self, text: &str);

    /// Collaborator feedback or answer for the latest turn
    fn show_feedback(&mut self, text: &str);

    /// Rendered next task
    fn show_next_task(&mut self, rendered: &str);

    /// Read one line of progress; `None` when the user closed input (Ctrl-D / Ctrl-C)
    fn read_progress(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Interactive terminal: rustyline for input, styled output on stdout
pub struct TerminalConsole {
    editor: DefaultEditor,
    is_interactive: bool,
}

impl TerminalConsole {
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new().context("Failed to initialize line editor")?;
        Ok(Self {
            editor,
            is_interactive: io::stdout().is_terminal(),
        })
    }
}

impl Console for TerminalConsole {
    fn show_greeting(&mut self, text: &str) {
        if self.is_interactive {
            println!("{}", text.bold());
        } else {
            println!("{}", text);
        }
    }

    fn show_feedback(&mut self, text: &str) {
        println!();
        if text.trim().is_empty() {
            return;
        }
        if self.is_interactive {
            println!("{}", text.cyan());
        } else {
            println!("{}", text);
        }
    }

    fn show_next_task(&mut self, rendered: &str) {
        if self.is_interactive {
            println!("{} {}", "Your next task is:".green().bold(), rendered);
        } else {
            println!("Your next task is: {}", rendered);
        }
    }

    fn read_progress(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(e) => Err(e).context("Failed to read progress update"),
        }
    }
}

/// Console fed from a fixed list of input lines, recording everything shown
///
/// Used for tests and for piping a scripted session through the loop.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    inputs: std::collections::VecDeque<String>,
    pub greetings: Vec<String>,
    pub feedback: Vec<String>,
    pub next_tasks: Vec<String>,
    pub prompts: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn remaining_inputs(&self) -> usize {
        self.inputs.len()
    }
}

impl Console for ScriptedConsole {
    fn show_greeting(&mut self, text: &str) {
        self.greetings.push(text.to_string());
    }

    fn show_feedback(&mut self, text: &str) {
        self.feedback.push(text.to_string());
    }

    fn show_next_task(&mut self, rendered: &str) {
        self.next_tasks.push(rendered.to_string());
    }

    fn read_progress(&mut self, prompt: &str) -> Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.inputs.pop_front())
    }
}
