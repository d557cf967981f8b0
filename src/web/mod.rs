use crate::compose::{self, merge};
use crate::config::AppConfig;
use crate::error::Result;
use crate::listing;
use anyhow::anyhow;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};
use warp::filters::BoxedFilter;
use warp::http::{StatusCode, Uri};
use warp::{Filter, Rejection, Reply};

pub mod timefmt;
pub mod views;

/// Form body for the exec/run routes
#[derive(Debug, Deserialize)]
struct CommandForm {
    cmd: Option<String>,
}

/// Start the console server. Blocks until the process is terminated.
pub async fn serve(config: Arc<AppConfig>) -> Result<()> {
    let addr = config.bind_addr()?;
    info!(
        "🌐 Convoy console listening on http://{}{}",
        addr,
        config.index_url()
    );
    warp::serve(routes(config)).run(addr).await;
    Ok(())
}

/// Build the full route tree, mounted under the configured base URL.
/// Requests outside the base URL prefix answer 400.
pub fn routes(config: Arc<AppConfig>) -> BoxedFilter<(impl Reply,)> {
    let index_uri: Uri = config
        .index_url()
        .parse()
        .unwrap_or_else(|_| Uri::from_static("/"));

    // Index page
    let config_clone = config.clone();
    let index = warp::path::end().and(warp::get()).and_then(move || {
        let config = config_clone.clone();
        async move {
            let records = listing::build(&config).await;
            let html = views::index_page(&records, &config.index_url());
            Ok::<_, Rejection>(render(html, config.debug))
        }
    });

    // State-changing actions: run the documented command, redirect home
    let index_clone = index_uri.clone();
    let up = warp::path!("up" / String).and(warp::get()).and_then(
        move |service: String| {
            let index = index_clone.clone();
            async move {
                compose::run(&["up", "-d", &service]).await;
                Ok::<_, Rejection>(warp::redirect::found(index))
            }
        },
    );

    let index_clone = index_uri.clone();
    let stop = warp::path!("stop" / String).and(warp::get()).and_then(
        move |service: String| {
            let index = index_clone.clone();
            async move {
                compose::run(&["stop", &service]).await;
                Ok::<_, Rejection>(warp::redirect::found(index))
            }
        },
    );

    let index_clone = index_uri.clone();
    let rm = warp::path!("rm" / String).and(warp::get()).and_then(
        move |service: String| {
            let index = index_clone.clone();
            async move {
                compose::run(&["rm", &service, "-f"]).await;
                Ok::<_, Rejection>(warp::redirect::found(index))
            }
        },
    );

    let index_clone = index_uri.clone();
    let pause = warp::path!("pause" / String).and(warp::get()).and_then(
        move |service: String| {
            let index = index_clone.clone();
            async move {
                compose::run(&["pause", &service]).await;
                Ok::<_, Rejection>(warp::redirect::found(index))
            }
        },
    );

    let index_clone = index_uri.clone();
    let unpause = warp::path!("unpause" / String).and(warp::get()).and_then(
        move |service: String| {
            let index = index_clone.clone();
            async move {
                compose::run(&["unpause", &service]).await;
                Ok::<_, Rejection>(warp::redirect::found(index))
            }
        },
    );

    let index_clone = index_uri.clone();
    let restart = warp::path!("restart" / String).and(warp::get()).and_then(
        move |service: String| {
            let index = index_clone.clone();
            async move {
                compose::run(&["restart", &service]).await;
                Ok::<_, Rejection>(warp::redirect::found(index))
            }
        },
    );

    let index_clone = index_uri.clone();
    let kill = warp::path!("kill" / String).and(warp::get()).and_then(
        move |service: String| {
            let index = index_clone.clone();
            async move {
                compose::run(&["kill", &service]).await;
                Ok::<_, Rejection>(warp::redirect::found(index))
            }
        },
    );

    let index_clone = index_uri.clone();
    let pull = warp::path!("pull" / String).and(warp::get()).and_then(
        move |service: String| {
            let index = index_clone.clone();
            async move {
                compose::run(&["pull", &service]).await;
                Ok::<_, Rejection>(warp::redirect::found(index))
            }
        },
    );

    let index_clone = index_uri.clone();
    let push = warp::path!("push" / String).and(warp::get()).and_then(
        move |service: String| {
            let index = index_clone.clone();
            async move {
                compose::run(&["push", &service]).await;
                Ok::<_, Rejection>(warp::redirect::found(index))
            }
        },
    );

    let index_clone = index_uri.clone();
    let build = warp::path!("build" / String).and(warp::get()).and_then(
        move |service: String| {
            let index = index_clone.clone();
            async move {
                compose::run(&["build", &service]).await;
                Ok::<_, Rejection>(warp::redirect::found(index))
            }
        },
    );

    // Output pages: render whatever the tool printed, line by line
    let config_clone = config.clone();
    let logs = warp::path!("logs" / String).and(warp::get()).and_then(
        move |service: String| {
            let config = config_clone.clone();
            async move {
                let output = compose::run(&["logs", &service, "--no-color"]).await;
                let title = format!("logs: {service}");
                let html = views::lines_page(&title, &output, &config.index_url());
                Ok::<_, Rejection>(render(Ok(html), config.debug))
            }
        },
    );

    let config_clone = config.clone();
    let top = warp::path!("top" / String).and(warp::get()).and_then(
        move |service: String| {
            let config = config_clone.clone();
            async move {
                let output = compose::run(&["top", &service]).await;
                let title = format!("top: {service}");
                let html = views::lines_page(&title, &output, &config.index_url());
                Ok::<_, Rejection>(render(Ok(html), config.debug))
            }
        },
    );

    let config_clone = config.clone();
    let convert = warp::path!("convert" / String).and(warp::get()).and_then(
        move |service: String| {
            let config = config_clone.clone();
            async move {
                let output = compose::run(&["convert", &service]).await;
                let title = format!("convert: {service}");
                let html = views::lines_page(&title, &output, &config.index_url());
                Ok::<_, Rejection>(render(Ok(html), config.debug))
            }
        },
    );

    // Declared configuration for one service, no live data
    let config_clone = config.clone();
    let compose_view = warp::path!("compose" / String).and(warp::get()).and_then(
        move |service: String| {
            let config = config_clone.clone();
            async move {
                let merged = merge::load_merged(&config.compose_files, &config.working_dir);
                let definition = merged
                    .get(&serde_yaml::Value::from("services"))
                    .and_then(serde_yaml::Value::as_mapping)
                    .and_then(|services| {
                        services.get(&serde_yaml::Value::from(service.as_str()))
                    });
                let html = views::compose_page(&service, definition, &config.index_url());
                Ok::<_, Rejection>(render(html, config.debug))
            }
        },
    );

    // Free-form command execution against a service
    let config_clone = config.clone();
    let exec_get = warp::path!("exec" / String).and(warp::get()).and_then(
        move |service: String| {
            let config = config_clone.clone();
            async move {
                let debug = config.debug;
                let html = command_page("exec", service, None, config).await;
                Ok::<_, Rejection>(render(html, debug))
            }
        },
    );

    let config_clone = config.clone();
    let exec_post = warp::path!("exec" / String)
        .and(warp::post())
        .and(warp::body::form::<CommandForm>())
        .and_then(move |service: String, form: CommandForm| {
            let config = config_clone.clone();
            async move {
                let debug = config.debug;
                let html = command_page("exec", service, form.cmd, config).await;
                Ok::<_, Rejection>(render(html, debug))
            }
        });

    let config_clone = config.clone();
    let run_get = warp::path!("run" / String).and(warp::get()).and_then(
        move |service: String| {
            let config = config_clone.clone();
            async move {
                let debug = config.debug;
                let html = command_page("run", service, None, config).await;
                Ok::<_, Rejection>(render(html, debug))
            }
        },
    );

    let config_clone = config.clone();
    let run_post = warp::path!("run" / String)
        .and(warp::post())
        .and(warp::body::form::<CommandForm>())
        .and_then(move |service: String, form: CommandForm| {
            let config = config_clone.clone();
            async move {
                let debug = config.debug;
                let html = command_page("run", service, form.cmd, config).await;
                Ok::<_, Rejection>(render(html, debug))
            }
        });

    let api = index
        .or(up)
        .or(stop)
        .or(rm)
        .or(pause)
        .or(unpause)
        .or(restart)
        .or(kill)
        .or(pull)
        .or(push)
        .or(build)
        .or(logs)
        .or(top)
        .or(convert)
        .or(compose_view)
        .or(exec_get)
        .or(exec_post)
        .or(run_get)
        .or(run_post);

    // Mount under the base URL prefix; anything outside it answers 400
    let mut prefix = warp::any().boxed();
    for segment in config.base_segments() {
        prefix = prefix.and(warp::path(segment)).boxed();
    }

    let not_found = warp::any()
        .map(|| warp::reply::with_status("not found", StatusCode::NOT_FOUND));
    let outside_prefix = warp::any()
        .map(|| warp::reply::with_status("not found", StatusCode::BAD_REQUEST));

    prefix
        .and(api.or(not_found))
        .or(outside_prefix)
        .with(warp::log("convoy"))
        .boxed()
}

/// Render the exec/run page, invoking the tokenized command when one was
/// posted
async fn command_page(
    kind: &'static str,
    service: String,
    command: Option<String>,
    config: Arc<AppConfig>,
) -> Result<String> {
    let records = listing::build(&config).await;
    let output = match &command {
        Some(cmd) => {
            let tokens =
                shell_words::split(cmd).map_err(|e| anyhow!("parse command line: {e}"))?;
            let mut args = vec![kind, service.as_str()];
            args.extend(tokens.iter().map(String::as_str));
            compose::run(&args).await
        }
        None => String::new(),
    };
    views::exec_page(
        kind,
        &service,
        &records,
        command.as_deref(),
        &output,
        &config.index_url(),
    )
}

/// Successful renders answer 200; a render failure surfaces as a 500
/// instead of being swallowed, it indicates a display bug. The error
/// detail only reaches the response body in debug mode.
fn render(result: Result<String>, debug: bool) -> warp::reply::Response {
    match result {
        Ok(html) => warp::reply::html(html).into_response(),
        Err(e) => {
            error!("render failed: {}", e);
            let body = if debug {
                format!("internal error: {e}")
            } else {
                "internal error".to_string()
            };
            warp::reply::with_status(body, StatusCode::INTERNAL_SERVER_ERROR).into_response()
        }
    }
}
