//! Chat completions against an OpenAI-style `/v1/chat/completions` endpoint.
//!
//! A turn flows through the submodules in one direction:
//! - [`assemble`]: settings and user input become an ordered list of messages.
//! - [`payload`]: the messages become a JSON request body.
//! - [`transport`]: the body is POSTed and the raw response body comes back.
//! - [`extract`]: the reply text is recovered from the raw body.
//!
//! [`Exchange`] ties the last three together.
//!
//! ## Error Handling
//!
//! Failing to reach the server and receiving a body without a usable reply are
//! different problems with different remedies, so [`ExchangeError`] keeps them
//! apart. Neither is fatal; the caller reports the failure and moves on.

pub(crate) mod assemble;
pub(crate) mod escape;
pub(crate) mod extract;
pub(crate) mod payload;
pub(crate) mod transport;

use thiserror::Error;
use url::Url;

use crate::chat::Message;
use extract::ExtractionError;
use transport::Transport;

#[derive(Debug, Error)]
pub(crate) enum ExchangeError {
    #[error("could not reach the server: {0}")]
    Transport(
        #[from]
        #[source]
        transport::Error,
    ),

    #[error("no valid reply: {0}")]
    Extraction(
        #[from]
        #[source]
        ExtractionError,
    ),
}

/// Performs one request/reply cycle per call against a fixed endpoint.
pub(crate) struct Exchange<T: Transport> {
    transport: T,
    endpoint: Url,
}

impl<T: Transport> Exchange<T> {
    pub(crate) fn new(transport: T, endpoint: Url) -> Exchange<T> {
        Exchange {
            transport,
            endpoint,
        }
    }

    pub(crate) fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub(crate) async fn run_turn(
        &self,
        messages: &[Message],
        model_name: &str,
        temperature: f64,
        max_tokens: u32,
    ) -> Result<String, ExchangeError> {
        let body = payload::build(messages, temperature, model_name, max_tokens);

        log::debug!("request payload: {}", body);

        let raw_body = self.transport.post_json(&self.endpoint, body).await?;

        extract::extract(&raw_body).map_err(|err| {
            log::debug!("extraction failed ({}), raw response: {}", err, err.raw_body());

            err.into()
        })
    }
}
