//! Output rendering for the chat application.
//!
//! The decoder and the session loop never print directly; they hand text to a
//! [`Renderer`].  [`PlainTextRenderer`] writes replies to stdout and errors to
//! stderr by default, or to any writers, with optional ANSI styling.

use std::io::{self, Stderr, Stdout, Write};

/// ANSI escape code for cyan text (used for the banner).
const ANSI_CYAN: &str = "\x1b[96m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// ANSI escape code for bold text (used for the model label).
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// Trait for rendering chat output.
///
/// This abstraction allows for different rendering strategies:
/// - Plain text with ANSI styling
/// - Plain text without styling (for piping/redirecting)
/// - Capturing output in memory
pub trait Renderer: Send {
    /// Print the startup banner.
    fn print_banner(&mut self, banner: &str);

    /// Called before the first fragment of a reply, with the model that produces it.
    fn start_response(&mut self, model: &str);

    /// Print a chunk of regular response text.
    ///
    /// This is called incrementally as fragments are streamed from the API.
    fn print_text(&mut self, text: &str);

    /// Called when a reply is complete, whether or not it carried any text.
    fn finish_response(&mut self);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);
}

/// Plain text renderer with optional ANSI styling.
///
/// Errors go to their own writer when one is given, and otherwise share the
/// output writer.
pub struct PlainTextRenderer<W: Write + Send = Stdout, E: Write + Send = Stderr> {
    out: W,
    err: Option<E>,
    use_color: bool,
}

impl PlainTextRenderer<Stdout, Stderr> {
    /// Creates a new PlainTextRenderer on stdout and stderr with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer on stdout and stderr with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self::with_writers(io::stdout(), io::stderr(), use_color)
    }
}

impl<W: Write + Send> PlainTextRenderer<W, Stderr> {
    /// Creates a renderer that writes everything, errors included, to `out`.
    pub fn with_writer(out: W, use_color: bool) -> Self {
        Self {
            out,
            err: None,
            use_color,
        }
    }
}

impl<W: Write + Send, E: Write + Send> PlainTextRenderer<W, E> {
    /// Creates a renderer that writes output to `out` and errors to `err`.
    pub fn with_writers(out: W, err: E, use_color: bool) -> Self {
        Self {
            out,
            err: Some(err),
            use_color,
        }
    }

    /// Returns the output writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Returns the output writer and the error writer, if separate.
    pub fn into_writers(self) -> (W, Option<E>) {
        (self.out, self.err)
    }

    fn emit(&mut self, text: std::fmt::Arguments<'_>) {
        // Rendering failures (closed pipe) are not worth aborting a chat over.
        let _ = self.out.write_fmt(text);
        let _ = self.out.flush();
    }

    fn emit_error(&mut self, text: std::fmt::Arguments<'_>) {
        let Some(err) = self.err.as_mut() else {
            self.emit(text);
            return;
        };
        let _ = self.out.flush();
        let _ = err.write_fmt(text);
        let _ = err.flush();
    }
}

impl Default for PlainTextRenderer<Stdout, Stderr> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send, E: Write + Send> Renderer for PlainTextRenderer<W, E> {
    fn print_banner(&mut self, banner: &str) {
        if self.use_color {
            self.emit(format_args!("{ANSI_CYAN}{banner}{ANSI_RESET}\n"));
        } else {
            self.emit(format_args!("{banner}\n"));
        }
    }

    fn start_response(&mut self, model: &str) {
        if self.use_color {
            self.emit(format_args!("\n{ANSI_BOLD}{model}:{ANSI_RESET}\n"));
        } else {
            self.emit(format_args!("\n{model}:\n"));
        }
    }

    fn print_text(&mut self, text: &str) {
        self.emit(format_args!("{text}"));
    }

    fn finish_response(&mut self) {
        self.emit(format_args!("\n\n"));
    }

    fn print_error(&mut self, error: &str) {
        if self.use_color {
            self.emit_error(format_args!("{ANSI_RED}Error: {error}{ANSI_RESET}\n"));
        } else {
            self.emit_error(format_args!("Error: {error}\n"));
        }
    }

    fn print_info(&mut self, info: &str) {
        self.emit(format_args!("{info}\n"));
    }
}
