use reedline::{PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus};
use std::borrow::Cow;

use crate::color::{self, StyleIfEnabled};

const INPUT_INDICATOR: &str = "[#] ";
const CONTINUATION_INDICATOR: &str = "::: ";
const MENU_MARKER: &str = "[/] ";

/// Precedes every reply, e.g. `[qwen q2] `.
pub(crate) fn model_prompt(model_name: &str) -> String {
    color::MODEL_PROMPT
        .style_if_enabled(format!("[{}] ", model_name))
        .to_string()
}

pub(crate) fn completion_marker() -> String {
    color::USER_PROMPT.style_if_enabled(MENU_MARKER).to_string()
}

/// The line editor prompt. Styles are rendered once, when the editor is
/// created.
pub(crate) struct Prompt {
    indicator: String,
    continuation: String,
}

impl Default for Prompt {
    fn default() -> Self {
        Prompt {
            indicator: color::USER_PROMPT
                .style_if_enabled(INPUT_INDICATOR)
                .to_string(),
            continuation: color::USER_PROMPT
                .style_if_enabled(CONTINUATION_INDICATOR)
                .to_string(),
        }
    }
}

impl reedline::Prompt for Prompt {
    fn render_prompt_left(&self) -> Cow<str> {
        Cow::Borrowed("")
    }

    fn render_prompt_right(&self) -> Cow<str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _edit_mode: PromptEditMode) -> Cow<str> {
        Cow::Borrowed(&self.indicator)
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<str> {
        Cow::Borrowed(&self.continuation)
    }

    fn render_prompt_history_search_indicator(&self, search: PromptHistorySearch) -> Cow<str> {
        let state = match search.status {
            PromptHistorySearchStatus::Passing => "search",
            PromptHistorySearchStatus::Failing => "no match",
        };

        Cow::Owned(format!("({}: {}) ", state, search.term))
    }
}
