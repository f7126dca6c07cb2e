use crate::error::{Error, ErrorCode};
use crate::http::HttpResponse;
use anstyle::{AnsiColor, Style};
use std::io::{self, Write};
use std::sync::Arc;

fn color(c: AnsiColor) -> Style {
    Style::new().fg_color(Some(anstyle::Color::Ansi(c)))
}

fn pretty_print_json_colored(value: &serde_json::Value) -> String {
    use colored_json::{Color, ColoredFormatter, PrettyFormatter, Styler};
    let styler = Styler {
        key: Color::Yellow.bold(),
        ..Default::default()
    };
    let formatter = ColoredFormatter::with_styler(PrettyFormatter::new(), styler);
    formatter
        .to_colored_json_auto(value)
        .unwrap_or_else(|_| serde_json::to_string_pretty(value).unwrap_or_default())
}

fn get_status_style(status: u16) -> Style {
    match status {
        200..=299 => color(AnsiColor::Green).bold(),
        300..=399 => color(AnsiColor::Yellow).bold(),
        400..=599 => color(AnsiColor::Red).bold(),
        _ => color(AnsiColor::White).bold(),
    }
}

fn format_status_line(status: u16) -> String {
    let status_style = get_status_style(status);
    format!(
        "{}Status: {}{}\n",
        status_style.render(),
        status,
        anstyle::Reset.render()
    )
}

fn format_header(name: &str, value: &str) -> String {
    format!(
        "{}{}: {}{}{}\n",
        color(AnsiColor::Blue).render(),
        name,
        color(AnsiColor::White).render(),
        value,
        anstyle::Reset.render()
    )
}

fn format_all_headers(headers: &::http::HeaderMap) -> String {
    headers
        .iter()
        .map(|(name, value)| {
            format_header(
                name.as_str(),
                value.to_str().unwrap_or("<invalid header value>"),
            )
        })
        .collect()
}

fn format_body(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json) => format!("{}\n", pretty_print_json_colored(&json)),
        Err(_) => format!(
            "{}{}{}\n",
            color(AnsiColor::White).render(),
            body,
            anstyle::Reset.render()
        ),
    }
}

/// Renders a successful response: status, headers when verbose, then body
pub fn format_response(resp: &HttpResponse, verbose: bool) -> String {
    let mut output = format_status_line(resp.status);
    if verbose {
        output.push_str(&format_all_headers(&resp.headers));
    }
    output.push_str(&format_body(resp.text()));
    output
}

/// Renders a classified error as `Error [<code>]: <message>`
///
/// Sentinel codes are followed by the name of the rule that produced them.
/// With `verbose`, the headers of the originating response are appended.
pub fn format_error(err: &Error, verbose: bool) -> String {
    let style = color(AnsiColor::Red).bold();
    let mut output = match err.code() {
        ErrorCode::Sentinel(sentinel) => format!(
            "{}Error [{}] ({}): {}{}\n",
            style.render(),
            err.code(),
            sentinel.name(),
            err.message(),
            anstyle::Reset.render()
        ),
        ErrorCode::Status(_) => format!(
            "{}Error [{}]: {}{}\n",
            style.render(),
            err.code(),
            err.message(),
            anstyle::Reset.render()
        ),
    };
    if verbose {
        if let Some(resp) = err.response() {
            output.push_str(&format_all_headers(&resp.headers));
        }
    }
    output
}

pub fn format_outcome(outcome: &Result<Arc<HttpResponse>, Error>, verbose: bool) -> String {
    match outcome {
        Ok(resp) => format_response(resp, verbose),
        Err(err) => format_error(err, verbose),
    }
}

pub fn print_outcome(outcome: &Result<Arc<HttpResponse>, Error>, verbose: bool) {
    let _ = print_outcome_to(&mut io::stdout(), outcome, verbose);
}

fn print_outcome_to<W: Write>(
    writer: &mut W,
    outcome: &Result<Arc<HttpResponse>, Error>,
    verbose: bool,
) -> io::Result<()> {
    write!(writer, "{}", format_outcome(outcome, verbose))
}
