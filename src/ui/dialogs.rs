//! Modal dialogs used by the update checker.
//!
//! [`Dialogs`] is the seam between the update flow and whatever surface shows
//! the prompts. [`TerminalDialogs`] renders them on the terminal: a bold title,
//! the message, and a `[y/N]` prompt that blocks until the user answers.

use colored::Colorize;
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};

/// Yes/no and error dialogs.
#[allow(async_fn_in_trait)]
pub trait Dialogs {
    /// Ask a yes/no question. Resolves to `true` for yes.
    async fn confirm(&mut self, title: &str, message: &str) -> io::Result<bool>;

    /// Show an error the user can only acknowledge.
    async fn show_error(&mut self, title: &str, message: &str) -> io::Result<()>;
}

/// Parse a typed answer. `None` means the input was not understood.
fn parse_answer(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "" | "n" | "no" => Some(false),
        _ => None,
    }
}

/// Terminal-backed dialogs.
///
/// End of input counts as "no", so a closed stdin never triggers an update.
pub struct TerminalDialogs<R, W> {
    reader: R,
    writer: W,
    assume_yes: bool,
}

impl TerminalDialogs<BufReader<Stdin>, io::Stdout> {
    /// Dialogs on the process's stdin/stdout.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), io::stdout())
    }
}

impl<R, W> TerminalDialogs<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            assume_yes: false,
        }
    }

    /// Answer every confirmation with yes without reading input.
    pub fn assume_yes(mut self, assume_yes: bool) -> Self {
        self.assume_yes = assume_yes;
        self
    }

    /// Consume the dialogs, returning the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn write_header(&mut self, title: &str, message: &str) -> io::Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", title.bold())?;
        writeln!(self.writer, "{}", message.trim_end())
    }
}

impl<R, W> Dialogs for TerminalDialogs<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    async fn confirm(&mut self, title: &str, message: &str) -> io::Result<bool> {
        self.write_header(title, message)?;

        if self.assume_yes {
            writeln!(self.writer, "{} {}", "[y/N]:".green(), "y (assumed)".dimmed())?;
            return Ok(true);
        }

        loop {
            write!(self.writer, "{} ", "[y/N]:".green())?;
            self.writer.flush()?;

            let mut response = String::new();
            if self.reader.read_line(&mut response).await? == 0 {
                writeln!(self.writer)?;
                return Ok(false);
            }

            match parse_answer(&response) {
                Some(answer) => return Ok(answer),
                None => writeln!(self.writer, "{}", "Please answer 'y' or 'n'.".yellow())?,
            }
        }
    }

    async fn show_error(&mut self, title: &str, message: &str) -> io::Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", title.red().bold())?;
        writeln!(self.writer, "{}", message.trim_end().red())?;
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dialogs(input: &'static str) -> TerminalDialogs<&'static [u8], Vec<u8>> {
        TerminalDialogs::new(input.as_bytes(), Vec::new())
    }

    #[test]
    fn test_parse_answer() {
        assert_eq!(parse_answer("Y\n"), Some(true));
        assert_eq!(parse_answer(" yes "), Some(true));
        assert_eq!(parse_answer("\n"), Some(false));
        assert_eq!(parse_answer("No"), Some(false));
        assert_eq!(parse_answer("maybe"), None);
    }

    #[tokio::test]
    async fn test_confirm_reads_answer() {
        let mut d = dialogs("y\n");
        assert!(d.confirm("Title", "Proceed?").await.unwrap());

        let output = String::from_utf8(d.into_writer()).unwrap();
        assert!(output.contains("Title"));
        assert!(output.contains("Proceed?"));
    }

    #[tokio::test]
    async fn test_confirm_reprompts_on_garbage() {
        let mut d = dialogs("what\nn\n");
        assert!(!d.confirm("Title", "Proceed?").await.unwrap());

        let output = String::from_utf8(d.into_writer()).unwrap();
        assert!(output.contains("Please answer 'y' or 'n'."));
    }

    #[tokio::test]
    async fn test_confirm_eof_is_no() {
        let mut d = dialogs("");
        assert!(!d.confirm("Title", "Proceed?").await.unwrap());
    }

    #[tokio::test]
    async fn test_assume_yes_skips_input() {
        let mut d = dialogs("").assume_yes(true);
        assert!(d.confirm("Title", "Proceed?").await.unwrap());
    }

    #[tokio::test]
    async fn test_show_error_writes_message() {
        let mut d = dialogs("");
        d.show_error("Title", "Something broke").await.unwrap();
        let output = String::from_utf8(d.into_writer()).unwrap();
        assert!(output.contains("Something broke"));
    }
}
