//! Interactive session over line-oriented input.
//!
//! Each line is either a command or a comma-separated drug list to check.

use anyhow::Result;
use ddicheck_client::{Session, render_json, render_report};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const PROMPT: &str = "medications (comma-separated), 'reset' or 'quit'> ";

/// One line of interactive input.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Check(String),
    Reset,
    Quit,
    Blank,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "" => Command::Blank,
            "reset" | ":reset" => Command::Reset,
            "quit" | "exit" | ":q" => Command::Quit,
            text => Command::Check(text.to_string()),
        }
    }
}

/// Read commands until quit or end of input.
pub async fn run<R, W>(mut session: Session, input: R, out: &mut W, json: bool) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();

    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };

        match Command::parse(&line) {
            Command::Blank => continue,
            Command::Quit => break,
            Command::Reset => {
                session.reset();
                writeln!(out, "Results cleared.")?;
            }
            Command::Check(text) => {
                let batch = session.run_check(&text).await;
                if json {
                    writeln!(out, "{}", render_json(batch))?;
                } else {
                    write!(out, "{}", render_report(batch))?;
                }
            }
        }
    }

    Ok(())
}
