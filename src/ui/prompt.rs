//! Line-based console input.

use std::io::Write;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::error::{AdminError, Result};
use crate::ui::theme::styles;

/// Source of answers to interactive questions.
#[async_trait]
pub trait Prompt: Send {
    /// Show `question` and return the trimmed answer.
    ///
    /// End of input is an error so that callers never spin on re-prompts.
    async fn ask(&mut self, question: &str) -> Result<String>;
}

/// Reads answers from the process's stdin.
pub struct Console {
    lines: Lines<BufReader<Stdin>>,
}

impl Console {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

#[async_trait]
impl Prompt for Console {
    async fn ask(&mut self, question: &str) -> Result<String> {
        print!("{}", styles::question(question));
        std::io::stdout().flush()?;

        match self.lines.next_line().await? {
            Some(line) => Ok(line.trim().to_string()),
            None => Err(AdminError::InputClosed),
        }
    }
}

/// Ask a y/n question until a recognizable answer is given.
pub async fn ask_yes_no<P: Prompt + ?Sized>(prompt: &mut P, question: &str) -> Result<bool> {
    let question = format!("{} (y/n): ", question);
    loop {
        let answer = prompt.ask(&question).await?;
        match parse_yes_no(&answer) {
            Some(value) => return Ok(value),
            None => println!("Please answer with 'y' or 'n'."),
        }
    }
}

/// Ask a y/n confirmation where anything other than yes counts as no.
pub async fn confirm<P: Prompt + ?Sized>(prompt: &mut P, question: &str) -> Result<bool> {
    let answer = prompt.ask(&format!("{} (y/n): ", question)).await?;
    Ok(parse_yes_no(&answer) == Some(true))
}

fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}
