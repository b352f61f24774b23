//! Fetch command - route one request through the worker

use crate::cli::args::{FetchArgs, OutputFormat};
use crate::config::Config;
use crate::error::SwResult;
use crate::net::{create_fetcher, NetworkMode, Request};
use crate::router::{ResponseSource, Routed};
use crate::ui::{self, UiContext};
use crate::worker::ServiceWorker;
use console::style;
use serde::Serialize;

/// Execute the fetch command
pub async fn execute(args: FetchArgs, config: &Config) -> SwResult<()> {
    let origin = config.worker.origin_url()?;
    let url = Request::resolve(&args.target, &origin)?;

    let mut request = Request::new(&args.method, url);
    for (name, value) in &args.headers {
        request = request.with_header(name, value.as_str());
    }

    let fetcher = create_fetcher(config, NetworkMode::from_offline_flag(args.offline))?;
    let worker = ServiceWorker::on_disk(config, fetcher).await?;

    let routed = worker.handle_fetch(&request).await?;

    match args.format {
        OutputFormat::Table => print_table(&request, &routed, args.body),
        OutputFormat::Json => print_json(&request, &routed)?,
        OutputFormat::Plain => print!("{}", routed.response.text()),
    }

    Ok(())
}

fn print_table(request: &Request, routed: &Routed, with_body: bool) {
    let ctx = UiContext::detect();
    let response = &routed.response;

    let status = format!("{} {}", response.status, response.status_text);
    let status = if response.ok() {
        style(status).green()
    } else {
        style(status).yellow()
    };

    println!("{} {}", style(request.method()).bold(), request.url());
    if routed.source == ResponseSource::Fallback {
        ui::step_warn(&ctx, "Network unreachable, served the offline fallback");
    }
    ui::key_value(
        &ctx,
        "route",
        &format!("{} ({})", routed.class, routed.class.strategy_name()),
    );
    ui::key_value(&ctx, "source", &routed.source.to_string());
    ui::key_value(&ctx, "status", &status.to_string());
    ui::key_value(&ctx, "type", &response.response_type.to_string());
    for (name, value) in response.headers.iter() {
        ui::key_value(&ctx, name, value);
    }

    if with_body {
        println!();
        println!("{}", response.text());
    }
}

fn print_json(request: &Request, routed: &Routed) -> SwResult<()> {
    #[derive(Serialize)]
    struct FetchJson<'a> {
        method: &'a str,
        url: &'a str,
        route: String,
        source: String,
        status: u16,
        response_type: String,
        headers: Vec<(&'a str, &'a str)>,
        body: String,
    }

    let response = &routed.response;
    let json = FetchJson {
        method: request.method(),
        url: request.url().as_str(),
        route: routed.class.to_string(),
        source: routed.source.to_string(),
        status: response.status,
        response_type: response.response_type.to_string(),
        headers: response.headers.iter().collect(),
        body: response.text().into_owned(),
    };

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
