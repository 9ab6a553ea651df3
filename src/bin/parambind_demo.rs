//! Resolve one path against an in-memory blog and print what the handler or the
//! error channel would receive.
//!
//! ```bash
//! cargo run --bin parambind-demo -- /users/1/posts/7
//! cargo run --bin parambind-demo -- /users/999/posts/7 --log-format pretty
//! ```

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use http::Method;
use parambind::otel::{init_logging_with_config, LogConfig, LogFormat};
use parambind::resolver::parse_raw;
use parambind::{
    continuation, resolver_fn, BindingRegistry, CancelToken, DispatchConfig, DispatchOutcome,
    MetricsHook, ParamDispatcher, RequestInfo, ResolveStatus, RouteDeclaration,
};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "parambind-demo")]
#[command(about = "Resolve route placeholders against sample data", long_about = None)]
struct Cli {
    /// Request path to dispatch, e.g. /users/1/posts/7
    path: String,

    /// Route template the path is matched against
    #[arg(long, default_value = "/users/{user}/posts/{post}")]
    route: String,

    /// Artificial latency added to every lookup, in milliseconds
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,

    /// Cancel the request after this many milliseconds
    #[arg(long)]
    cancel_after_ms: Option<u64>,

    /// Log output format
    #[arg(long, value_enum, env = "PARAMBIND_LOG_FORMAT", default_value = "pretty")]
    log_format: FormatArg,

    /// Print resolution counters after the request
    #[arg(long, default_value_t = false)]
    metrics: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Json,
    Pretty,
}

fn users() -> Value {
    json!({
        "1": { "id": 1, "name": "Mirko" },
        "2": { "id": 2, "name": "Ana" },
    })
}

fn posts() -> Value {
    json!({
        "7": { "id": 7, "author": 1, "title": "Hello" },
        "8": { "id": 8, "author": 2, "title": "Second post" },
    })
}

async fn find_user(raw: String, delay: Duration) -> anyhow::Result<Value> {
    tokio::time::sleep(delay).await;
    let id: u64 = parse_raw(&raw)?;
    let user = users()
        .get(id.to_string())
        .cloned()
        .ok_or_else(|| ResolveStatus::not_found(format!("user {id} does not exist")))?;
    Ok(user)
}

/// Posts are scoped to the user resolved before them.
async fn find_post(raw: String, info: RequestInfo, delay: Duration) -> anyhow::Result<Value> {
    tokio::time::sleep(delay).await;
    let id: u64 = parse_raw(&raw)?;
    let post = posts()
        .get(id.to_string())
        .cloned()
        .ok_or_else(|| ResolveStatus::not_found(format!("post {id} does not exist")))?;

    let author = info
        .resolved_params()
        .and_then(|p| p.get("user"))
        .and_then(|u| u.get("id"))
        .cloned();
    if let Some(author) = author {
        if post["author"] != author {
            return Err(ResolveStatus::not_found(format!(
                "post {id} does not belong to user {author}"
            ))
            .into());
        }
    }
    Ok(post)
}

fn registry(delay: Duration) -> anyhow::Result<BindingRegistry> {
    let mut registry = BindingRegistry::new();
    registry.register("user", resolver_fn(move |raw, _info| find_user(raw, delay)))?;
    registry.register("post", resolver_fn(move |raw, info| find_post(raw, info, delay)))?;
    Ok(registry)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut log_config = LogConfig::from_env();
    log_config.format = match cli.log_format {
        FormatArg::Json => LogFormat::Json,
        FormatArg::Pretty => LogFormat::Pretty,
    };
    let _guard = init_logging_with_config(&log_config)?;

    let route = RouteDeclaration::parse(&cli.route)
        .with_context(|| format!("invalid route template '{}'", cli.route))?;

    let config = DispatchConfig::from_env();
    let metrics = Arc::new(MetricsHook::new());
    let mut dispatcher =
        ParamDispatcher::with_config(Arc::new(registry(Duration::from_millis(cli.delay_ms))?), config);
    dispatcher.add_hook(Arc::clone(&metrics) as Arc<dyn parambind::ResolveHook>);
    for unbound in dispatcher.validate_routes([&route])? {
        eprintln!("warning: {unbound}");
    }

    let Some(params) = route.capture(&cli.path) else {
        eprintln!("path '{}' does not match route '{}'", cli.path, route);
        return Ok(ExitCode::from(2));
    };

    let info = RequestInfo::new(Method::GET, cli.path.as_str());
    let cancel = CancelToken::new();
    if let Some(ms) = cli.cancel_after_ms {
        let token = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            token.cancel();
        });
    }

    let outcome = dispatcher
        .dispatch(
            &params[..],
            &info,
            &cancel,
            continuation(
                |ctx| (0u8, json!({ "status": 200, "context": ctx.to_json() })),
                |err| {
                    let response = err.to_response();
                    (1u8, json!({ "status": response.status, "body": response.body }))
                },
            ),
        )
        .await;

    let code = match outcome {
        DispatchOutcome::Completed((code, body)) => {
            println!("{}", serde_json::to_string_pretty(&body)?);
            code
        }
        DispatchOutcome::Cancelled => {
            eprintln!("request cancelled");
            3
        }
    };

    if cli.metrics {
        println!("{}", serde_json::to_string_pretty(&metrics.snapshot())?);
    }

    Ok(ExitCode::from(code))
}
