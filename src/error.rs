//! Everything that can go wrong while talking to the Github GraphQL API.

use crate::response::GraphQlError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that occur during Github communication, etc.
#[derive(Debug, Error)]
pub enum Error {
    /// The session was already closed when a query was attempted. No network
    /// I/O took place.
    #[error("the session has been closed")]
    Closed,

    /// An empty endpoint URL was given to the builder.
    #[error("the endpoint URL must not be empty")]
    EmptyEndpoint,

    /// The bearer token contains bytes that can't appear in an HTTP header.
    #[error("the bearer token is not a valid header value")]
    InvalidToken,

    /// Anything that failed below the GraphQL layer: unreachable network,
    /// timeouts, non-2xx statuses, or a response body that wasn't JSON.
    #[error("transport failure while calling the GraphQL API")]
    Transport(#[from] reqwest::Error),

    /// A query file was missing or unreadable.
    #[error("couldn't read query file {}", .path.display())]
    QueryFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The server answered, but the reply carried a top-level `errors` list
    /// and raising was requested. Displays as the first error's message.
    #[error("{}", .0.message)]
    GraphQl(GraphQlError),
}

impl Error {
    /// The structured GraphQL error behind a [`Error::GraphQl`], if that's
    /// what this is.
    pub fn graphql_error(&self) -> Option<&GraphQlError> {
        match self {
            Error::GraphQl(e) => Some(e),
            _ => None,
        }
    }

    /// Did the transport give up waiting on the server?
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Transport(e) => e.is_timeout(),
            _ => false,
        }
    }
}
