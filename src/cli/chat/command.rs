pub(crate) const HELP: &str = "\
Commands:
  exit          end the session
  clear         discard the conversation history
  setmax N      limit answers to N words (0 removes the limit)
  max, showmax  show the current word limit
  help          show this message
Anything else is sent to the model.";

pub(crate) const SETMAX_USAGE: &str = "usage: setmax N, where N is a non-negative integer";

/// Words that start a command, used for completion and highlighting.
pub(crate) const COMMAND_WORDS: [&str; 6] = ["exit", "clear", "setmax", "max", "showmax", "help"];

/// A line of user input, interpreted.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Command<'l> {
    Exit,
    Clear,
    SetMax(u32),
    ShowMax,
    Help,
    /// A command which was recognized but used incorrectly
    Invalid(&'static str),
    /// Nothing but whitespace
    Empty,
    /// A message for the model, verbatim
    Send(&'l str),
}

impl<'l> Command<'l> {
    pub(crate) fn parse(line: &'l str) -> Command<'l> {
        let trimmed = line.trim();

        match trimmed {
            "" => return Command::Empty,
            "exit" => return Command::Exit,
            "clear" => return Command::Clear,
            "max" | "showmax" => return Command::ShowMax,
            "help" => return Command::Help,
            _ => {}
        }

        let mut words = trimmed.split_whitespace();

        if words.next() != Some("setmax") {
            return Command::Send(line);
        }

        match (words.next().map(str::parse::<u32>), words.next()) {
            (Some(Ok(n)), None) => Command::SetMax(n),
            _ => Command::Invalid(SETMAX_USAGE),
        }
    }

    pub(crate) fn is_command(&self) -> bool {
        !matches!(self, Command::Send(_) | Command::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("exit"), Command::Exit);
        assert_eq!(Command::parse("  clear "), Command::Clear);
        assert_eq!(Command::parse("max"), Command::ShowMax);
        assert_eq!(Command::parse("showmax"), Command::ShowMax);
        assert_eq!(Command::parse("help"), Command::Help);
        assert_eq!(Command::parse(""), Command::Empty);
        assert_eq!(Command::parse(" \t "), Command::Empty);
    }

    #[test]
    fn test_parse_setmax() {
        assert_eq!(Command::parse("setmax 30"), Command::SetMax(30));
        assert_eq!(Command::parse("setmax   0"), Command::SetMax(0));
        assert_eq!(Command::parse("setmax"), Command::Invalid(SETMAX_USAGE));
        assert_eq!(Command::parse("setmax -3"), Command::Invalid(SETMAX_USAGE));
        assert_eq!(Command::parse("setmax ten"), Command::Invalid(SETMAX_USAGE));
        assert_eq!(Command::parse("setmax 3 4"), Command::Invalid(SETMAX_USAGE));
    }

    #[test]
    fn test_parse_messages() {
        assert_eq!(Command::parse("exit please"), Command::Send("exit please"));
        assert_eq!(Command::parse("Exit"), Command::Send("Exit"));
        assert_eq!(Command::parse("setmaximum"), Command::Send("setmaximum"));
        // Messages are sent untrimmed
        assert_eq!(Command::parse("  hello  "), Command::Send("  hello  "));
    }

    #[test]
    fn test_is_command() {
        assert!(Command::parse("setmax x").is_command());
        assert!(!Command::parse("hi").is_command());
        assert!(!Command::parse("").is_command());
    }
}
