use log::{ info, error };
use std::error::Error;
use std::io::Write;
use tokio::io::{ AsyncBufRead, AsyncBufReadExt };

use crate::render::DisplayRow;
use crate::session::ChatSession;

const HELP_TEXT: &str = "Commands: /history, /clear, /health, /help, /quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetCommand {
    Ask(String),
    History,
    Clear,
    Health,
    Help,
    Quit,
}

impl WidgetCommand {
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "/history" => WidgetCommand::History,
            "/clear" => WidgetCommand::Clear,
            "/health" => WidgetCommand::Health,
            "/help" => WidgetCommand::Help,
            "/quit" | "/exit" => WidgetCommand::Quit,
            _ => WidgetCommand::Ask(line.to_string()),
        }
    }
}

fn is_confirmation(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn print_rows<W: Write>(out: &mut W, rows: &[DisplayRow]) -> std::io::Result<()> {
    for row in rows {
        writeln!(out, "{}", row)?;
    }
    out.flush()
}

/// Line-based chat loop: each input line is a question or a command, every
/// visible change to the log is written to `out`.
pub async fn run_widget<R, W>(
    session: &mut ChatSession,
    input: R,
    out: &mut W
) -> Result<(), Box<dyn Error + Send + Sync>>
    where R: AsyncBufRead + Unpin, W: Write
{
    let mut lines = input.lines();

    let restored = session.restore().to_vec();
    print_rows(out, &restored)?;
    writeln!(out, "{}", HELP_TEXT)?;

    while let Some(line) = lines.next_line().await? {
        match WidgetCommand::parse(&line) {
            WidgetCommand::Quit => break,
            WidgetCommand::Help => writeln!(out, "{}", HELP_TEXT)?,
            WidgetCommand::History => {
                let rows = session.history_rows();
                if rows.is_empty() {
                    writeln!(out, "(no saved conversation)")?;
                }
                print_rows(out, &rows)?;
            }
            WidgetCommand::Health => {
                match session.lifecycle().endpoint().health().await {
                    Ok(health) => {
                        writeln!(
                            out,
                            "Backend status: {} ({})",
                            health.status,
                            health.service.as_deref().unwrap_or("unknown service")
                        )?;
                    }
                    Err(e) => writeln!(out, "Backend unreachable: {}", e)?,
                }
            }
            WidgetCommand::Clear => {
                write!(out, "Clear all the Chat history? [y/N] ")?;
                out.flush()?;
                let answer = lines.next_line().await?.unwrap_or_default();
                let confirmed = is_confirmation(&answer);
                match session.clear_history(|| confirmed) {
                    Ok(true) => print_rows(out, session.transcript())?,
                    Ok(false) => writeln!(out, "Kept chat history.")?,
                    Err(e) => {
                        error!("Clearing chat history failed: {}", e);
                        print_rows(out, session.transcript())?;
                    }
                }
            }
            WidgetCommand::Ask(question) => {
                let Some(pending) = session.start(&question) else {
                    continue;
                };
                print_rows(out, &pending)?;
                if let Some(row) = session.finish().await {
                    print_rows(out, std::slice::from_ref(&row))?;
                }
            }
        }
    }

    info!("Chat widget closed");
    Ok(())
}
