use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Line reader over stdin shared by every prompt of a session.
pub struct InputReader {
    lines: Lines<BufReader<Stdin>>,
}

impl InputReader {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Print `prompt_text` and return the next line, trimmed. `None` on EOF.
    pub async fn prompt(&mut self, prompt_text: &str) -> Result<Option<String>> {
        print!("{}", prompt_text);
        std::io::stdout().flush()?;
        Ok(self.lines.next_line().await?.map(|l| l.trim().to_string()))
    }

    /// Collect lines until an empty line or EOF.
    pub async fn prompt_block(&mut self, prompt_text: &str) -> Result<String> {
        println!("{}", prompt_text);
        let mut collected = Vec::new();
        while let Some(line) = self.lines.next_line().await? {
            if line.trim().is_empty() {
                break;
            }
            collected.push(line);
        }
        Ok(collected.join("\n"))
    }
}

pub fn is_quit_command(input_text: &str) -> bool {
    matches!(input_text.trim().to_lowercase().as_str(), "/quit" | "/exit")
}

pub fn is_yes(input_text: &str) -> bool {
    matches!(input_text.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_quit_and_yes() {
        assert!(is_quit_command(" /QUIT "));
        assert!(is_quit_command("/exit"));
        assert!(!is_quit_command("quit"));
        assert!(is_yes("Y"));
        assert!(!is_yes(""));
    }
}
