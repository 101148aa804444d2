//! Interactive line-oriented shell.

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::TRACING_TARGET_SHELL;
use crate::commands::Command;
use crate::screen::Screen;

/// One line typed into the shell.
#[derive(Debug, Parser)]
#[command(name = "taskdesk", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: Command,
}

/// What to do with a line of input.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Empty,
    Exit,
    Reply(String),
    Run(Command),
}

/// Reads commands from stdin until `exit` or end of input.
pub async fn run(screen: &mut Screen) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    let greeting = match screen.context().identity() {
        Some(identity) => crate::render::identity(&identity),
        None => "Not signed in. Use `login <email> --password <password>`.".to_owned(),
    };
    write_block(&mut stdout, &greeting).await?;
    write_block(&mut stdout, "Type `help` for commands, `exit` to leave.").await?;

    loop {
        stdout
            .write_all(format!("taskdesk:{}> ", screen.current()).as_bytes())
            .await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match interpret(&line) {
            Input::Empty => {}
            Input::Exit => break,
            Input::Reply(text) => write_block(&mut stdout, &text).await?,
            Input::Run(command) => {
                let outcome = screen.run(command).await;
                write_block(&mut stdout, &outcome.text).await?;
            }
        }
    }

    tracing::debug!(target: TRACING_TARGET_SHELL, "Shell closed");
    Ok(())
}

async fn write_block(stdout: &mut tokio::io::Stdout, text: &str) -> std::io::Result<()> {
    stdout.write_all(text.trim_end().as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await
}

fn interpret(line: &str) -> Input {
    let words = match split_line(line) {
        Ok(words) => words,
        Err(message) => return Input::Reply(message),
    };

    match words.first().map(String::as_str) {
        None => Input::Empty,
        Some("exit" | "quit") => Input::Exit,
        Some(_) => match ShellLine::try_parse_from(words) {
            Ok(parsed) => Input::Run(parsed.command),
            Err(error) => Input::Reply(error.render().to_string()),
        },
    }
}

/// Splits a line into words, honouring single and double quotes.
fn split_line(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut word = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some('"') | None, '\\') => {
                if let Some(escaped) = chars.next() {
                    word.push(escaped);
                }
                in_word = true;
            }
            (Some(_), c) => word.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut word));
                    in_word = false;
                }
            }
            (None, c) => {
                word.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err("unterminated quote".to_owned());
    }
    if in_word {
        words.push(word);
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_line_honours_quotes() {
        assert_eq!(
            split_line(r#"create "Write the report" -d 'due friday' --due 2025-04-02"#).unwrap(),
            ["create", "Write the report", "-d", "due friday", "--due", "2025-04-02"]
        );
        assert_eq!(split_line(r#"a\ b "" c"#).unwrap(), ["a b", "", "c"]);
        assert!(split_line("   ").unwrap().is_empty());
        assert!(split_line("create \"open").is_err());
    }

    #[test]
    fn test_interpret() {
        assert_eq!(interpret(""), Input::Empty);
        assert_eq!(interpret("  quit "), Input::Exit);
        assert_eq!(interpret("show 3"), Input::Run(Command::Show { id: 3 }));
        assert!(matches!(interpret("help"), Input::Reply(text) if text.contains("Usage")));
        assert!(matches!(interpret("frobnicate"), Input::Reply(_)));
    }
}
