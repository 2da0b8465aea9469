use std::io::{self, BufRead, StdinLock};

use nu_ansi_term::{Color, Style};
use reedline::{
    default_emacs_keybindings, ColumnarMenu, DefaultCompleter, EditCommand, EditMode, Emacs,
    KeyCode, KeyModifiers, MenuBuilder, Reedline, ReedlineEvent, ReedlineMenu, Signal,
};

use crate::warn;

use super::command::COMMAND_WORDS;
use super::highlighter::Highlighter;
use super::prompt::{completion_marker, Prompt};

fn edit_mode() -> Box<dyn EditMode> {
    let mut keybindings = default_emacs_keybindings();

    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::UntilFound(vec![
            ReedlineEvent::Menu("completion_menu".to_string()),
            ReedlineEvent::MenuNext,
        ]),
    );

    keybindings.add_binding(
        KeyModifiers::CONTROL,
        KeyCode::Char('j'),
        ReedlineEvent::Edit(vec![EditCommand::InsertNewline]),
    );

    Box::new(Emacs::new(keybindings))
}

pub(crate) struct Repl {
    line_editor: Reedline,
    prompt: Prompt,
}

impl Repl {
    pub(crate) fn new() -> Repl {
        let prompt = Prompt::default();

        let commands = COMMAND_WORDS.iter().map(|c| c.to_string()).collect();

        let completer = Box::new(DefaultCompleter::new(commands));

        // Use the interactive menu to select options from the completer
        let completion_menu = Box::new(
            ColumnarMenu::default()
                .with_name("completion_menu")
                .with_marker(&completion_marker().to_string())
                .with_text_style(Style::new().fg(Color::Default))
                .with_selected_text_style(Style::new().fg(Color::Blue).on(Color::DarkGray))
                .with_selected_match_text_style(
                    Style::new().fg(Color::Blue).bold().on(Color::DarkGray),
                ),
        );

        let line_editor = Reedline::create()
            .with_completer(completer)
            .with_menu(ReedlineMenu::EngineCompleter(completion_menu))
            .with_edit_mode(edit_mode())
            .with_highlighter(Box::new(Highlighter::default()));

        Repl {
            line_editor,
            prompt,
        }
    }

    /// Reads the next line. Ctrl-C discards the current line, Ctrl-D ends
    /// the session.
    pub(crate) fn read_line(&mut self) -> Option<String> {
        loop {
            match self.line_editor.read_line(&self.prompt) {
                Ok(Signal::Success(line)) => return Some(line),
                Ok(Signal::CtrlC) => continue,
                Err(err) => {
                    warn!("failed to read from the terminal: {}", err);
                    return None;
                }
                _ => return None,
            }
        }
    }
}

/// Where user input comes from: a line editor when attached to a terminal,
/// otherwise the lines of standard input.
pub(crate) enum Input {
    Editor(Repl),
    Piped(io::Lines<StdinLock<'static>>),
}

impl Input {
    pub(crate) fn editor() -> Input {
        Input::Editor(Repl::new())
    }

    pub(crate) fn piped() -> Input {
        Input::Piped(io::stdin().lock().lines())
    }

    pub(crate) fn next_line(&mut self) -> Option<String> {
        match self {
            Input::Editor(repl) => repl.read_line(),
            Input::Piped(lines) => match lines.next()? {
                Ok(line) => Some(line),
                Err(err) => {
                    warn!("failed to read from standard input: {}", err);
                    None
                }
            },
        }
    }
}
