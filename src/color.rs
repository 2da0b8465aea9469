//! Terminal styling. Color is decided once at startup and consulted by every
//! styled write through [`StyleIfEnabled`].

use lazy_static::lazy_static;
use nu_ansi_term::{AnsiString, Color, Style};
use std::borrow::Cow;
use std::io::{self, IsTerminal};
use std::sync::atomic::{AtomicBool, Ordering};

/// The `--color` argument.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    clap::ValueEnum,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum RequestedColorMode {
    #[default]
    Auto,
    On,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColorMode {
    On,
    Off,
}

impl ColorMode {
    /// An explicit request wins. Otherwise color is used only when the output
    /// is a terminal and `NO_COLOR` is not set.
    pub(crate) fn resolve(
        requested: RequestedColorMode,
        no_color_set: bool,
        stdout_is_terminal: bool,
    ) -> ColorMode {
        match requested {
            RequestedColorMode::On => ColorMode::On,
            RequestedColorMode::Off => ColorMode::Off,
            RequestedColorMode::Auto if no_color_set || !stdout_is_terminal => ColorMode::Off,
            RequestedColorMode::Auto => ColorMode::On,
        }
    }

    pub(crate) fn from_env(requested: RequestedColorMode) -> ColorMode {
        Self::resolve(
            requested,
            std::env::var_os("NO_COLOR").is_some(),
            io::stdout().is_terminal(),
        )
    }
}

lazy_static! {
    pub(crate) static ref USER_PROMPT: Style = Color::Blue.bold();
    pub(crate) static ref MODEL_PROMPT: Style = Color::Green.bold();
    pub(crate) static ref USER_TEXT: Style = Color::Default.bold();
    pub(crate) static ref COMMAND_TEXT: Style = Color::Cyan.bold();
    pub(crate) static ref ERROR_INDICATOR: Style = Color::Red.bold();
    pub(crate) static ref WARNING_INDICATOR: Style = Color::Yellow.bold();
    pub(crate) static ref ERROR_TEXT: Style = Color::Default.bold();
    pub(crate) static ref WARNING_TEXT: Style = Color::Default.bold();
}

static COLOR_ENABLED: AtomicBool = AtomicBool::new(true);

impl ColorMode {
    /// Makes `self` the mode used by every later styled write.
    pub(crate) fn install(self) {
        COLOR_ENABLED.store(self == ColorMode::On, Ordering::Relaxed);
    }

    pub(crate) fn current() -> ColorMode {
        if COLOR_ENABLED.load(Ordering::Relaxed) {
            ColorMode::On
        } else {
            ColorMode::Off
        }
    }
}

/// Applies a style only while color is on.
pub(crate) trait StyleIfEnabled {
    fn style_for<'a>(&self, mode: ColorMode, text: impl Into<Cow<'a, str>>) -> AnsiString<'a>;

    fn style_if_enabled<'a>(&self, text: impl Into<Cow<'a, str>>) -> AnsiString<'a> {
        self.style_for(ColorMode::current(), text)
    }
}

impl StyleIfEnabled for Style {
    fn style_for<'a>(&self, mode: ColorMode, text: impl Into<Cow<'a, str>>) -> AnsiString<'a> {
        let text: Cow<'a, str> = text.into();

        match mode {
            ColorMode::On => self.paint(text),
            ColorMode::Off => AnsiString::from(text),
        }
    }
}
