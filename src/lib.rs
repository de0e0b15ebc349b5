//! A lightweight client for the Github GraphQL API.
//!
//! One [`Session`] wraps one reusable HTTPS connection, carries the bearer
//! token, and knows how to POST a query with variables applied. Replies come
//! back as a [`Response`]: the decoded JSON mapping untouched, with a few
//! accessors layered on top.
//!
//! ```no_run
//! use serde_json::json;
//!
//! # fn main() -> Result<(), hubql::Error> {
//! let session = hubql::Session::new("<GITHUB_API_TOKEN>")?;
//!
//! let reply = session.query_from_file(
//!     "queries/issue.graphql",
//!     Some(json!({ "owner": "fosskers", "name": "aura" })),
//! )?;
//!
//! println!("{:?}", reply.get("repository.issues.edges"));
//! # Ok(())
//! # }
//! ```
//!
//! Whether a reply that carries a GraphQL `errors` entry is handed back for
//! inspection (the default) or fails the call is chosen per session via
//! [`SessionBuilder::raise_on_error`], and can be overridden per call.
//! Failures below the GraphQL layer, a missing query file included, always
//! fail the call; see [`Error`].

mod error;
mod response;
mod session;

pub use crate::error::Error;
pub use crate::response::{GraphQlError, Location, Response};
pub use crate::session::{Session, SessionBuilder, GITHUB_ENDPOINT};
