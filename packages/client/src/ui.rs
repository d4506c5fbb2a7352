//! Terminal input and output.

use std::io::Write;

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

/// Where the session shows what it receives
pub trait Console: Send + Sync {
    fn show(&self, line: &str);
}

/// Prints to stdout and redraws the input prompt
pub struct Terminal {
    prompt: String,
}

impl Terminal {
    pub fn new(client_id: &str) -> Self {
        Self {
            prompt: prompt_for(client_id),
        }
    }
}

impl Console for Terminal {
    fn show(&self, line: &str) {
        print!("\r{}\n{}", line, self.prompt);
        std::io::stdout().flush().ok();
    }
}

fn prompt_for(client_id: &str) -> String {
    format!("{}> ", client_id)
}

/// Read stdin lines on a dedicated thread (rustyline is blocking).
///
/// The channel closes on Ctrl+C, Ctrl+D or a readline error, which ends
/// the client.
pub fn spawn_line_reader(client_id: &str) -> mpsc::UnboundedReceiver<String> {
    let (input_tx, input_rx) = mpsc::unbounded_channel();
    let prompt = prompt_for(client_id);

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                tracing::error!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    rl.add_history_entry(line.as_str()).ok();
                    if input_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    tracing::info!("Input closed");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    input_rx
}
