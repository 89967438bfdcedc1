use std::fmt::Write as _;
use std::io::IsTerminal;

use catalog_search::{Item, SearchFeedback, SearchSession};
use clap::Args;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info};

use crate::{load_session, CommonArgs};

#[derive(Args, Debug)]
pub struct ReplArgs {
    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Debug, PartialEq, Eq)]
enum ReplCommand<'a> {
    Query(&'a str),
    Pick(&'a str),
    Add(&'a str),
    Remove(&'a str),
    Clear,
    List(usize),
    Quit,
    Invalid(String),
}

fn parse_line(line: &str) -> ReplCommand<'_> {
    let Some(command) = line.strip_prefix(':') else {
        return ReplCommand::Query(line);
    };
    let (name, rest) = match command.split_once(' ') {
        Some((name, rest)) => (name, rest.trim()),
        None => (command.trim(), ""),
    };
    match name {
        "add" if !rest.is_empty() => ReplCommand::Add(rest),
        "rm" if !rest.is_empty() => ReplCommand::Remove(rest),
        "pick" if !rest.is_empty() => ReplCommand::Pick(rest),
        "add" | "rm" | "pick" => ReplCommand::Invalid(format!(":{} needs a name", name)),
        "clear" => ReplCommand::Clear,
        "list" if rest.is_empty() => ReplCommand::List(1),
        "list" => match rest.parse() {
            Ok(0) => ReplCommand::Invalid("Pages start at 1".to_string()),
            Ok(page) => ReplCommand::List(page),
            Err(_) => ReplCommand::Invalid(format!("Not a page number: {}", rest)),
        },
        "quit" | "q" => ReplCommand::Quit,
        _ => ReplCommand::Invalid(format!("Unknown command :{}", name)),
    }
}

/// Plain-text rendering of one keystroke's feedback.
///
/// Missing characters in the trace are wrapped in brackets.
pub fn render_feedback(feedback: &SearchFeedback) -> String {
    let mut out = String::new();
    if feedback.trace.is_empty() && feedback.exact_match.is_none() {
        return out;
    }

    out.push_str("trace: ");
    for m in &feedback.trace {
        if m.exists {
            out.push(m.ch);
        } else {
            let _ = write!(out, "[{}]", m.ch);
        }
    }
    out.push('\n');

    match feedback.exact_match {
        Some(true) => {
            let _ = writeln!(out, "\"{}\" found!", feedback.query);
        }
        Some(false) => {
            let _ = writeln!(out, "\"{}\" not found.", feedback.query);
        }
        None => {}
    }

    if !feedback.suggestions.is_empty() {
        out.push_str("suggestions:\n");
        for s in &feedback.suggestions {
            let _ = writeln!(out, "  {}", s);
        }
    }

    if let Some(item) = &feedback.found {
        let _ = writeln!(out, "top result: {}", item.name);
        if let Some(description) = &item.description {
            let _ = writeln!(out, "  {}", description);
        }
    }
    out
}

pub fn render_page(session: &SearchSession, page: usize) -> String {
    let per_page = session.config().page_size;
    let catalog = session.catalog();
    let mut out = String::new();
    for item in catalog.page(page, per_page) {
        let _ = writeln!(out, "- {}", item.name);
    }
    let _ = writeln!(
        out,
        "page {} of {} ({} items)",
        page,
        catalog.page_count(per_page),
        catalog.len()
    );
    out
}

pub async fn execute_repl(args: ReplArgs) -> anyhow::Result<()> {
    let mut session = load_session(&args.common).await?;
    let interactive = std::io::stdin().is_terminal();
    let input = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();

    run_repl(&mut session, input, &mut stdout, interactive).await?;

    info!("REPL finished with {} items", session.catalog().len());
    Ok(())
}

/// Answers one line of `input` at a time until `:quit` or end of input.
///
/// Lines are decoded lossily, so stray bytes only spoil their own line.
async fn run_repl<R, W>(
    session: &mut SearchSession,
    mut input: R,
    output: &mut W,
    interactive: bool,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::with_capacity(256);
    loop {
        if interactive {
            output.write_all(b"> ").await?;
            output.flush().await?;
        }
        buf.clear();
        if input.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        let raw = String::from_utf8_lossy(&buf);
        let line = raw.trim_end_matches('\n').trim_end_matches('\r');

        let command = parse_line(line);
        debug!("REPL command: {:?}", command);
        let reply = match command {
            ReplCommand::Query(query) => render_feedback(&session.feedback(query)),
            ReplCommand::Pick(word) => render_feedback(&session.select_suggestion(word)),
            ReplCommand::Add(name) => match session.add(Item::named(name)) {
                Ok(true) => format!("added {}\n", name),
                Ok(false) => format!("{} is already in the catalog\n", name),
                Err(e) => format!("{}\n", e),
            },
            ReplCommand::Remove(name) => {
                if session.remove(name) {
                    format!("removed {}\n", name)
                } else {
                    format!("no item named {}\n", name)
                }
            }
            ReplCommand::Clear => {
                if session.clear() {
                    "catalog cleared\n".to_string()
                } else {
                    "catalog is already empty\n".to_string()
                }
            }
            ReplCommand::List(page) => render_page(session, page),
            ReplCommand::Quit => break,
            ReplCommand::Invalid(message) => format!("{}\n", message),
        };
        output.write_all(reply.as_bytes()).await?;
    }
    output.flush().await?;
    Ok(())
}
