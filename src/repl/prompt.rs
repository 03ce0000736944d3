//! A single-line, history-aware terminal prompt. Trimmed from a richer
//! multi-line editor: this grammar never continues across lines, so there
//! is no continuation prompt, word-wise navigation, or status bar to
//! drive.
use crossterm::{
    cursor,
    event::{self, KeyCode, KeyEvent, KeyModifiers},
    execute, terminal,
};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::warn;

const NAME: &str = env!("CARGO_PKG_NAME");

pub struct Prompt {
    history: Vec<String>,
    history_path: PathBuf,
    history_index: usize,
}

impl Prompt {
    /// Loads history from `~/.{name}_history`.
    pub fn new() -> Self {
        let history_path = super::history::get_home_file(format!(".{NAME}_history"));
        let history = super::history::load_history(&history_path);
        let history_index = history.len();
        Self {
            history,
            history_path,
            history_index,
        }
    }

    fn append_line(&mut self, line: &str) {
        if !line.trim().is_empty() {
            self.history.push(line.to_string());
            self.history_index = self.history.len();
            if let Err(e) = super::history::append_history(line, &self.history_path) {
                warn!("failed to save history: {e}");
            }
        }
    }

    /// Prints the prompt and reads one line, with history recall on
    /// Up/Down and Ctrl-C/Ctrl-D as interrupt signals.
    pub fn readline(&mut self) -> io::Result<String> {
        crate::console::print_prompt()?;

        let mut input = String::new();

        loop {
            if let event::Event::Key(KeyEvent {
                code, modifiers, ..
            }) = event::read()?
            {
                match code {
                    KeyCode::Enter => {
                        execute!(io::stdout(), cursor::MoveToNextLine(0))?;
                        break;
                    }
                    KeyCode::Up if self.history_index > 0 => {
                        self.history_index -= 1;
                        let line = self.history[self.history_index].clone();
                        self.replace_line(&mut input, line)?;
                    }
                    KeyCode::Down => {
                        if self.history_index + 1 < self.history.len() {
                            self.history_index += 1;
                            let line = self.history[self.history_index].clone();
                            self.replace_line(&mut input, line)?;
                        } else {
                            self.history_index = self.history.len();
                            self.replace_line(&mut input, String::new())?;
                        }
                    }
                    KeyCode::Backspace => {
                        if !input.is_empty() {
                            input.pop();
                            execute!(
                                io::stdout(),
                                cursor::MoveLeft(1),
                                terminal::Clear(terminal::ClearType::UntilNewLine)
                            )?;
                            io::stdout().flush()?;
                        }
                    }
                    KeyCode::Esc => {
                        return Err(io::Error::new(io::ErrorKind::Interrupted, "Esc"));
                    }
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        return Err(io::Error::new(io::ErrorKind::Interrupted, "Ctrl-C"));
                    }
                    KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => {
                        return Err(io::Error::new(io::ErrorKind::Interrupted, "Ctrl-D"));
                    }
                    KeyCode::Char(c) => {
                        input.push(c);
                        write!(io::stdout(), "{c}")?;
                        io::stdout().flush()?;
                    }
                    _ => {}
                }
            }
        }

        self.append_line(&input);
        Ok(input)
    }

    fn replace_line(&self, input: &mut String, new_line: String) -> io::Result<()> {
        execute!(
            io::stdout(),
            cursor::MoveToColumn((NAME.len() + 2) as u16),
            terminal::Clear(terminal::ClearType::UntilNewLine)
        )?;
        write!(io::stdout(), "{new_line}")?;
        io::stdout().flush()?;
        *input = new_line;
        Ok(())
    }
}

impl Default for Prompt {
    fn default() -> Self {
        Self::new()
    }
}
