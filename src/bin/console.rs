//! Terminal session shell for ChatUIX.
//!
//! Run with: `cargo run --bin chatuix-console`
//!
//! Type a message to chat. Widgets are listed under each reply with the action
//! they emit; trigger one with `/do <action> [json payload]`, e.g.
//! `/do select_date {"value":"2024-10-28"}`. `/context` prints the context,
//! `/quit` exits.

use std::io::{self, BufRead, Write};

use anyhow::{Context as _, Result};
use chatuix::chat::{Action, ChatSession, Dispatcher, GREETING, Message, Turn, UiComponent};

fn describe(component: &UiComponent) -> String {
    match component {
        UiComponent::Button { label, action, .. } => format!("[button] {label} -> {action}"),
        UiComponent::Input { label, action, .. } => format!("[input] {label} -> {action} {{\"value\":...}}"),
        UiComponent::Form { fields, submit_label, action } => {
            let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
            format!("[form] {submit_label} -> {action} {{{}}}", names.join(", "))
        }
        UiComponent::Table { headers, rows, caption } => format!(
            "[table] {} ({} columns, {} rows)",
            caption.as_deref().unwrap_or("untitled"),
            headers.len(),
            rows.len()
        ),
        UiComponent::Chart { chart_type, data, title, .. } => {
            let points: Vec<String> = data.iter().map(|p| format!("{}={}", p.name, p.value)).collect();
            format!(
                "[{} chart] {}: {}",
                chart_type.as_str(),
                title.as_deref().unwrap_or("untitled"),
                points.join(" ")
            )
        }
        UiComponent::Card { title, content, actions } => {
            let mut text = format!("[card] {title}: {}", content.replace('\n', " / "));
            for action in actions.iter().flatten() {
                text.push_str(&format!("\n      ({} -> {})", action.label, action.action));
            }
            text
        }
        UiComponent::List { items, .. } => format!("[list] {}", items.join("; ")),
        UiComponent::Select { label, options, action } => {
            let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
            format!("[select] {label} -> {action} one of {}", values.join(", "))
        }
    }
}

fn print_message(out: &mut impl Write, message: &Message) -> Result<()> {
    writeln!(out, "{}> {}", message.role, message.content)?;
    for component in message.components.iter().flatten() {
        writeln!(out, "    {}", describe(component))?;
    }
    Ok(())
}

fn parse_action(rest: &str) -> Result<Action> {
    let rest = rest.trim();
    let (name, payload) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    anyhow::ensure!(!name.is_empty(), "usage: /do <action> [json payload]");

    let action = Action::new(name);
    if payload.trim().is_empty() {
        return Ok(action);
    }
    let payload = serde_json::from_str(payload).context("payload is not valid JSON")?;
    Ok(action.with_payload(payload))
}

fn main() -> Result<()> {
    let dispatcher = Dispatcher::new();
    let mut session = ChatSession::new(GREETING);
    let stdin = io::stdin();
    let mut out = io::stdout().lock();

    for message in session.messages() {
        print_message(&mut out, message)?;
    }

    loop {
        write!(out, "you> ")?;
        out.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).context("reading stdin")? == 0 {
            break;
        }
        let line = line.trim_end_matches(['\r', '\n']);

        let turn = match line.trim() {
            "" => continue,
            "/quit" => break,
            "/context" => {
                writeln!(out, "{}", serde_json::to_string_pretty(session.context())?)?;
                continue;
            }
            command if command == "/do" || command.starts_with("/do ") => match parse_action(&command[3..]) {
                Ok(action) => Turn::Action(action),
                Err(e) => {
                    writeln!(out, "error: {e:#}")?;
                    continue;
                }
            },
            _ => Turn::Text(line.to_string()),
        };

        let outcome = session.submit(&dispatcher, turn);
        print_message(&mut out, &outcome.message)?;
    }

    Ok(())
}
