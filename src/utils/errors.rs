use crate::color::{self, StyleIfEnabled};

pub const DEFAULT_EXIT_CODE: i32 = 1;

pub(crate) fn error_internal(text: &str) {
    eprintln!(
        "{} {}",
        color::ERROR_INDICATOR.style_if_enabled("error:"),
        color::ERROR_TEXT.style_if_enabled(text)
    );
}

pub(crate) fn warn_internal(text: &str) {
    eprintln!(
        "{} {}",
        color::WARNING_INDICATOR.style_if_enabled("warning:"),
        color::WARNING_TEXT.style_if_enabled(text)
    );
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => ({
        let formatted = format!($($arg)*);
        $crate::utils::errors::warn_internal(&formatted);
    })
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => ({
        let formatted = format!($($arg)*);
        $crate::utils::errors::error_internal(&formatted);
    })
}

#[macro_export]
macro_rules! die {
    ($($arg:tt)*) => ({
        let formatted = format!($($arg)*);
        $crate::utils::errors::error_internal(&formatted);
        ::std::process::exit($crate::utils::errors::DEFAULT_EXIT_CODE);
    })
}
