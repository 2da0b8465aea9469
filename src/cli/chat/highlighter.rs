use nu_ansi_term::Style;

use super::command::Command;
use crate::color::{self, ColorMode};

/// Marks lines that will be run as commands rather than sent to the model.
#[derive(Default)]
pub(crate) struct Highlighter;

impl reedline::Highlighter for Highlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> reedline::StyledText {
        let style = match ColorMode::current() {
            ColorMode::Off => Style::default(),
            ColorMode::On if Command::parse(line).is_command() => *color::COMMAND_TEXT,
            ColorMode::On => *color::USER_TEXT,
        };

        reedline::StyledText {
            buffer: vec![(style, line.to_string())],
        }
    }
}
