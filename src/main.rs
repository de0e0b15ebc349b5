//! A command-line runner for GraphQL query files against the Github API.

use anyhow::{anyhow, Context};
use gumdrop::{Options, ParsingStyle};
use hubql::Session;
use serde_json::Value;
use std::path::PathBuf;
use std::process;

/// Run GraphQL query files against the Github API.
#[derive(Debug, Options)]
struct Env {
    /// Print this help text
    help: bool,

    /// Github personal access token (falls back to $GITHUB_TOKEN)
    token: Option<String>,

    /// An alternative GraphQL endpoint to POST to
    endpoint: Option<String>,

    /// Variables to apply to every query, as a JSON object
    variables: Option<String>,

    /// Fail when a reply carries GraphQL errors
    strict: bool,

    /// Query files to run, in order
    #[options(free)]
    queries: Vec<PathBuf>,
}

fn main() {
    let env = Env::parse_args_or_exit(ParsingStyle::AllOptions);
    match work(env) {
        Ok(result) => println!("{}", result),
        Err(e) => {
            eprintln!("{:#}", e);
            process::exit(1)
        }
    }
}

fn work(env: Env) -> anyhow::Result<String> {
    if env.queries.is_empty() {
        return Err(anyhow!("No query files given!"));
    }

    let token = env
        .token
        .or_else(|| std::env::var("GITHUB_TOKEN").ok())
        .unwrap_or_default();

    let variables: Option<Value> = env
        .variables
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .context("The --variables argument wasn't legal JSON.")?;

    let mut builder = Session::builder().token(token).raise_on_error(env.strict);
    if let Some(endpoint) = env.endpoint {
        builder = builder.endpoint(endpoint);
    }
    let session = builder.build()?;

    let mut replies = Vec::new();
    for path in &env.queries {
        let reply = session
            .query_from_file(path, variables.clone())
            .with_context(|| format!("The query in {} failed.", path.display()))?;

        replies.push(serde_json::to_string_pretty(reply.as_value())?);
    }

    Ok(replies.join("\n"))
}
