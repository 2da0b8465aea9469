mod command;
mod highlighter;
mod prompt;
mod repl;

use std::error::Error;
use std::io::{self, IsTerminal, Write};

use crate::chat::ConversationHistory;
use crate::completion::assemble::assemble;
use crate::completion::payload::max_output_len;
use crate::completion::transport::{ErrorKind, HttpTransport, Transport};
use crate::completion::{Exchange, ExchangeError};
use crate::config::{self, Overrides, Settings};
use crate::utils::errors::DEFAULT_EXIT_CODE;
use crate::{die, error, version, warn, ChatArgs};

use command::{Command, HELP};
use prompt::model_prompt;
use repl::Input;

/// Whether the session should keep reading input after a command.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Exit,
}

/// The state of one chat session: its settings, the local history, and the
/// exchange used for every turn.
pub(crate) struct Session<T: Transport> {
    settings: Settings,
    history: ConversationHistory,
    exchange: Exchange<T>,
}

impl<T: Transport> Session<T> {
    pub(crate) fn new(settings: Settings, transport: T) -> Session<T> {
        let exchange = Exchange::new(transport, settings.api_url.clone());

        Session {
            settings,
            history: ConversationHistory::new(),
            exchange,
        }
    }

    /// Sends one message. Only successful exchanges are recorded in the
    /// history, and the history itself is never part of the request.
    pub(crate) async fn send(&mut self, input: &str) -> Result<String, ExchangeError> {
        let settings = &self.settings;

        let messages = assemble(
            &settings.system_prompt,
            settings.word_limit(),
            &settings.role,
            input,
        );

        let reply = self
            .exchange
            .run_turn(
                &messages,
                &settings.model_name,
                settings.temperature,
                max_output_len(settings.word_limit()),
            )
            .await?;

        self.history.record_exchange(input.to_string(), reply.clone());

        log::debug!("history holds {} messages", self.history.len());

        Ok(reply)
    }

    fn report_failure(&self, err: &ExchangeError) {
        let mut err_msg = format!("request to {} failed: {}", self.exchange.endpoint(), err);

        if let Some(source) = err.source().and_then(|s| s.source()) {
            err_msg.push_str(&format!("\n{}", source));
        }

        if let ExchangeError::Transport(err) = err {
            if err.kind() == ErrorKind::ConnectFailed {
                err_msg.push_str("\nis the server running?");
            }
        }

        error!("{}", err_msg);
    }

    pub(crate) async fn handle(&mut self, command: Command<'_>) -> Flow {
        match command {
            Command::Exit => return Flow::Exit,
            Command::Empty => {}
            Command::Clear => {
                let n = self.history.clear();
                println!("Conversation cleared ({} messages discarded).", n);
            }
            Command::SetMax(n) => {
                self.settings.set_word_limit(n);
                println!("{}", describe_word_limit(n));
            }
            Command::ShowMax => println!("{}", describe_word_limit(self.settings.word_limit())),
            Command::Help => println!("{}", HELP),
            Command::Invalid(usage) => warn!("{}", usage),
            Command::Send(input) => match self.send(input).await {
                Ok(reply) => println!("{}{}\n", model_prompt(&self.settings.model_name), reply),
                Err(err) => self.report_failure(&err),
            },
        }

        Flow::Continue
    }
}

fn describe_word_limit(word_limit: u32) -> String {
    if word_limit == 0 {
        "Word limit: none".to_string()
    } else {
        format!("Word limit: {} words", word_limit)
    }
}

/// Resolves the word limit flags. An unparsable value is ignored.
fn requested_word_limit(args: &ChatArgs) -> Option<u32> {
    if args.no_limit {
        return Some(0);
    }

    let raw = args.max_words.as_ref()?;

    match raw.trim().parse::<u32>() {
        Ok(n) => Some(n),
        Err(_) => {
            warn!(
                "ignoring word limit \"{}\", expected a non-negative integer",
                raw
            );
            None
        }
    }
}

fn load_settings(args: &ChatArgs) -> (Settings, String) {
    let mut settings = Settings::default();

    let config_path = match config::read_config(args.config.clone()) {
        Some((path, parsed)) => {
            settings.apply_config(&parsed);
            Some(path)
        }
        None => None,
    };

    settings.apply_overrides(Overrides {
        model: args.model.clone(),
        role: args.role.clone(),
        system_prompt: args.system_prompt.clone(),
        api_url: args.api_url.clone(),
        word_limit: requested_word_limit(args),
    });

    let summary = settings.summary(config_path.as_deref());

    (settings, summary)
}

/// Writes the startup lines. A terminal session gets the banner on stdout.
/// Piped input only gets the settings summary, on stderr.
fn announce(
    out: &mut impl Write,
    err: &mut impl Write,
    summary: &str,
    in_terminal: bool,
) -> io::Result<()> {
    if in_terminal {
        writeln!(out, "{} version {}", version::NAME, version::VERSION)?;
        writeln!(out, "{}", summary)?;
        writeln!(out, "Type 'help' for a list of commands.\n")?;
    } else {
        writeln!(err, "{}", summary)?;
    }

    Ok(())
}

pub(crate) async fn chat_cmd(args: &ChatArgs) {
    let in_terminal = io::stdin().is_terminal();

    let (settings, summary) = load_settings(args);

    if settings.include_history {
        warn!("INCLUDE_HISTORY is set, but conversation history is never sent to the model");
    }

    let transport = match HttpTransport::new() {
        Ok(transport) => transport,
        Err(err) => die!("{}", err),
    };

    let mut session = Session::new(settings, transport);

    // A single message given on the command line
    if let Some(prompt) = &args.prompt {
        match session.send(prompt).await {
            Ok(reply) => println!("{}", reply),
            Err(err) => {
                session.report_failure(&err);
                std::process::exit(DEFAULT_EXIT_CODE);
            }
        }

        return;
    }

    if let Err(err) = announce(&mut io::stdout(), &mut io::stderr(), &summary, in_terminal) {
        log::debug!("failed to write the startup banner: {}", err);
    }

    let mut input = if in_terminal {
        Input::editor()
    } else {
        Input::piped()
    };

    while let Some(line) = input.next_line() {
        if session.handle(Command::parse(&line)).await == Flow::Exit {
            break;
        }
    }
}
