//! Terminal front end: argument handling and the interactive session.

pub(crate) mod chat;
