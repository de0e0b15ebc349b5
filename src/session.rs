//! The session that owns the HTTP connection to the Github GraphQL API.

use crate::error::Error;
use crate::response::Response;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// The never-changing URL to POST to for any Github V4 request.
pub const GITHUB_ENDPOINT: &str = "https://api.github.com/graphql";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configure a [`Session`] before opening it.
pub struct SessionBuilder {
    endpoint: String,
    token: Option<String>,
    raise_on_error: bool,
    timeout: Duration,
}

impl SessionBuilder {
    fn new() -> SessionBuilder {
        SessionBuilder {
            endpoint: GITHUB_ENDPOINT.to_string(),
            token: None,
            raise_on_error: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// The personal access token to authorize requests with.
    pub fn token<S>(mut self, token: S) -> SessionBuilder
    where
        S: Into<String>,
    {
        self.token = Some(token.into());
        self
    }

    /// Query some other GraphQL endpoint than Github's.
    pub fn endpoint<S>(mut self, endpoint: S) -> SessionBuilder
    where
        S: Into<String>,
    {
        self.endpoint = endpoint.into();
        self
    }

    /// Should replies that carry an `errors` entry fail the call instead of
    /// being handed back for inspection? Off unless set here, but each call
    /// can override it either way.
    pub fn raise_on_error(mut self, raise: bool) -> SessionBuilder {
        self.raise_on_error = raise;
        self
    }

    /// How long to wait on the server before giving up. 30 seconds unless
    /// set here.
    pub fn timeout(mut self, timeout: Duration) -> SessionBuilder {
        self.timeout = timeout;
        self
    }

    /// Open the session: preset headers, bounded timeout, reusable
    /// connection.
    pub fn build(self) -> Result<Session, Error> {
        if self.endpoint.is_empty() {
            return Err(Error::EmptyEndpoint);
        }

        let mut headers = HeaderMap::new();

        if let Some(token) = &self.token {
            let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| Error::InvalidToken)?;
            auth.set_sensitive(true);
            headers.insert(AUTHORIZATION, auth);
        }

        // Opt in to Github's new-style global node IDs.
        headers.insert("X-Github-Next-Global-ID", HeaderValue::from_static("1"));

        let agent = Client::builder()
            .default_headers(headers)
            .timeout(self.timeout)
            .build()?;

        Ok(Session {
            endpoint: self.endpoint,
            raise_on_error: self.raise_on_error,
            agent: Some(agent),
        })
    }
}

/// A lightweight Github GraphQL API session.
///
/// Holds one reusable HTTPS connection and the headers every request is sent
/// with. The connection is released when the session is dropped, or earlier
/// via [`Session::close`]; either way exactly once.
///
/// ```no_run
/// # fn main() -> Result<(), hubql::Error> {
/// let session = hubql::Session::new("<GITHUB_API_TOKEN>")?;
/// let reply = session.query("{ viewer { login } }", None)?;
/// println!("{:?}", reply.get("viewer.login"));
/// # Ok(())
/// # }
/// ```
pub struct Session {
    endpoint: String,
    raise_on_error: bool,
    /// `Some` while open. `close` takes it, and with it the connection.
    agent: Option<Client>,
}

impl Session {
    /// A session against [`GITHUB_ENDPOINT`] with the given token and the
    /// default settings. See [`Session::builder`] for the long form.
    pub fn new(token: &str) -> Result<Session, Error> {
        Session::builder().token(token).build()
    }

    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// The URL this session POSTs to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Has [`Session::close`] been called?
    pub fn is_closed(&self) -> bool {
        self.agent.is_none()
    }

    /// Release the underlying connection. Idempotent; any later query fails
    /// with [`Error::Closed`] without touching the network.
    pub fn close(&mut self) {
        self.agent = None;
    }

    /// Send the query with the variables applied and hand back the decoded
    /// reply unchanged. Whether a reply carrying an `errors` entry fails the
    /// call is decided by the session default; [`Session::query_with`] can
    /// override that per call.
    pub fn query(&self, query: &str, variables: Option<Value>) -> Result<Response, Error> {
        self.query_with(query, variables, None)
    }

    /// Like [`Session::query`], but with an explicit say on error raising:
    /// `Some(_)` wins over the session default.
    pub fn query_with(
        &self,
        query: &str,
        variables: Option<Value>,
        raise_on_error: Option<bool>,
    ) -> Result<Response, Error> {
        let agent = self.agent.as_ref().ok_or(Error::Closed)?;

        let body = serde_json::json!({ "query": query, "variables": variables });

        let resp = agent
            .post(&self.endpoint)
            .json(&body)
            .send()?
            .error_for_status()?;

        let decoded: Value = resp.json()?;
        let reply = Response::from(decoded);

        if raise_on_error.unwrap_or(self.raise_on_error) {
            if let Some(first) = reply.first_error() {
                return Err(Error::GraphQl(first));
            }
        }

        Ok(reply)
    }

    /// Read the query from the given file and execute it with the variables
    /// applied, exactly as [`Session::query`] would. Query files are easier
    /// to review and test than inline strings.
    pub fn query_from_file<P>(&self, path: P, variables: Option<Value>) -> Result<Response, Error>
    where
        P: AsRef<Path>,
    {
        self.query_from_file_with(path, variables, None)
    }

    /// Like [`Session::query_from_file`], but with an explicit say on error
    /// raising.
    pub fn query_from_file_with<P>(
        &self,
        path: P,
        variables: Option<Value>,
        raise_on_error: Option<bool>,
    ) -> Result<Response, Error>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let query = fs::read_to_string(path).map_err(|source| Error::QueryFile {
            path: path.to_path_buf(),
            source,
        })?;

        self.query_with(&query, variables, raise_on_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let session = Session::builder().build().unwrap();
        assert_eq!(session.endpoint(), GITHUB_ENDPOINT);
        assert!(!session.is_closed());
    }

    #[test]
    fn builder_rejects_empty_endpoint() {
        match Session::builder().endpoint("").build() {
            Err(Error::EmptyEndpoint) => {}
            _ => panic!("an empty endpoint should not build"),
        }
    }

    #[test]
    fn builder_rejects_unprintable_token() {
        match Session::builder().token("abc\ndef").build() {
            Err(Error::InvalidToken) => {}
            _ => panic!("a token with a newline should not build"),
        }
    }

    #[test]
    fn closed_session_refuses_queries() {
        let mut session = Session::builder()
            .endpoint("http://localhost:1")
            .build()
            .unwrap();

        session.close();
        session.close(); // A second close is harmless.
        assert!(session.is_closed());

        match session.query("{ viewer { login } }", None) {
            Err(Error::Closed) => {}
            _ => panic!("a closed session should refuse to query"),
        }
    }
}
