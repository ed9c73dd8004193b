//! Interactive chat with a model served through OpenRouter.
//!
//! # Usage
//!
//! ```bash
//! export OPENROUTER_API_KEY=sk-or-...
//! askcli
//! ```
//!
//! The key may also come from a `.env` file in the working directory.
//!
//! # Commands
//!
//! - `/save [name]` - Save the conversation under `convo_hist/`
//! - `/load <name>` - Replace the conversation with a saved one
//! - `/list` - List saved conversations
//! - `/help` - Show the command list
//! - `/exit` - Exit the application

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use askcli::Renderer;
use askcli::chat::{API_KEY_ENV, ChatConfig, ChatSession, Flow, PlainTextRenderer, help_text};

const BANNER: &str = r#"
  /$$$$$$            /$$        /$$$$$$  /$$      /$$$$$$
 /$$__  $$          | $$       /$$__  $$| $$     |_  $$_/
| $$  \ $$  /$$$$$$$| $$   /$$| $$  \__/| $$       | $$
| $$$$$$$$ /$$_____/| $$  /$$/| $$      | $$       | $$
| $$__  $$|  $$$$$$ | $$$$$$/ | $$      | $$       | $$
| $$  | $$ \____  $$| $$_  $$ | $$    $$| $$       | $$
| $$  | $$ /$$$$$$$/| $$ \  $$|  $$$$$$/| $$$$$$$$/$$$$$$
|__/  |__/|_______/ |__/  \__/ \______/ |________/______/
-----------------------------------------------------------"#;

const RULE: &str = "-----------------------------------------------------------";

/// Main entry point for the askcli application.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ChatConfig::from_env();
    let mut renderer = PlainTextRenderer::with_color(config.use_color);
    if config.api_key.is_none() {
        renderer.print_error(&format!(
            "{API_KEY_ENV} is not set; requests will be rejected by the server"
        ));
    }

    let mut session = ChatSession::new(config)?;
    let mut rl = DefaultEditor::new()?;

    renderer.print_banner(BANNER);
    renderer.print_info(&format!(
        "Starting conversation with {}.",
        session.config().model
    ));
    renderer.print_info(help_text());
    renderer.print_info(RULE);

    loop {
        match rl.readline("\nYou: ") {
            Ok(line) => {
                if session.handle_line(&line, &mut renderer).await == Flow::Exit {
                    break;
                }
            }
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => {
                renderer.print_info("\nConversation ended.");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}
