//! Colored terminal output for build progress.
//!
//! Progress and informational lines go to stdout, errors to stderr. Colors
//! are only emitted when the stream is a terminal.

use cyrup_termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use std::io::{self, IsTerminal, Write};

/// Terminal output manager.
#[derive(Debug, Clone, Copy)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
    stdout_color: ColorChoice,
    stderr_color: ColorChoice,
}

impl OutputManager {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            stdout_color: color_choice(io::stdout().is_terminal()),
            stderr_color: color_choice(io::stderr().is_terminal()),
        }
    }

    /// Plain progress line.
    pub fn progress(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        writeln!(self.stdout().lock(), "{message}")
    }

    /// Highlighted informational line.
    pub fn info(&self, message: &str) -> io::Result<()> {
        self.colored_stdout(Color::Cyan, message)
    }

    /// Only printed with `--verbose`.
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if !self.verbose {
            return Ok(());
        }
        self.progress(message)
    }

    pub fn success(&self, message: &str) -> io::Result<()> {
        self.colored_stdout(Color::Green, message)
    }

    pub fn warn(&self, message: &str) -> io::Result<()> {
        self.colored_stdout(Color::Yellow, message)
    }

    /// Error line on stderr; never suppressed.
    pub fn error(&self, message: &str) -> io::Result<()> {
        let stream = StandardStream::stderr(self.stderr_color);
        let mut lock = stream.lock();
        write_styled(&mut lock, ColorSpec::new().set_fg(Some(Color::Red)), message)
    }

    /// Section header.
    pub fn section(&self, title: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let stream = self.stdout();
        let mut lock = stream.lock();
        writeln!(lock)?;
        write_styled(
            &mut lock,
            ColorSpec::new().set_bold(true),
            &format!("=== {title} ==="),
        )
    }

    /// Indented detail line.
    pub fn indent(&self, message: &str) -> io::Result<()> {
        self.progress(&format!("  {message}"))
    }

    fn stdout(&self) -> StandardStream {
        StandardStream::stdout(self.stdout_color)
    }

    fn colored_stdout(&self, color: Color, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let stream = self.stdout();
        let mut lock = stream.lock();
        write_styled(&mut lock, ColorSpec::new().set_fg(Some(color)), message)
    }
}

/// `Auto` still honors `NO_COLOR` and `TERM=dumb` on a terminal.
fn color_choice(is_terminal: bool) -> ColorChoice {
    if is_terminal {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

fn write_styled<W: WriteColor>(out: &mut W, spec: &ColorSpec, message: &str) -> io::Result<()> {
    out.set_color(spec)?;
    write!(out, "{message}")?;
    out.reset()?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cyrup_termcolor::{Ansi, NoColor};

    #[test]
    fn redirected_streams_get_no_color() {
        assert!(matches!(color_choice(false), ColorChoice::Never));
        assert!(matches!(color_choice(true), ColorChoice::Auto));
    }

    #[test]
    fn plain_writer_has_no_escape_codes() {
        let mut out = NoColor::new(Vec::new());
        write_styled(&mut out, ColorSpec::new().set_fg(Some(Color::Red)), "Build failed").unwrap();
        assert_eq!(out.into_inner(), b"Build failed\n");
    }

    #[test]
    fn terminal_writer_wraps_message_in_color() {
        let mut out = Ansi::new(Vec::new());
        write_styled(&mut out, ColorSpec::new().set_fg(Some(Color::Green)), "done").unwrap();
        let text = String::from_utf8(out.into_inner()).unwrap();
        assert!(text.starts_with('\x1b'));
        assert!(text.contains("done"));
        assert!(text.ends_with("\x1b[0m\n"));
    }
}
