//! Terminal output for the modlink binary.
//!
//! A small wrapper over `termcolor` so the subcommands can emphasize
//! status and headings without each dealing with TTY detection. The
//! `NO_COLOR` environment variable always wins over the `--color`
//! flag.

use std::fmt;
use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Map the `--color` flag value to a `ColorChoice`, honoring `NO_COLOR`.
pub fn resolve_color_choice(flag: Option<&str>) -> ColorChoice {
    if std::env::var_os("NO_COLOR").is_some() {
        return ColorChoice::Never;
    }
    match flag {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}

/// Styled writer shared by the subcommands.
///
/// Write failures are ignored: a closed pipe during output should not
/// turn a successful check into a failure.
pub struct StyledOutput {
    stdout: StandardStream,
    stderr: StandardStream,
}

impl StyledOutput {
    /// Create a writer honoring the given color choice.
    pub fn new(choice: ColorChoice) -> Self {
        Self {
            stdout: StandardStream::stdout(choice),
            stderr: StandardStream::stderr(choice),
        }
    }

    fn styled(&mut self, text: &str, color: Option<Color>, bold: bool) {
        let mut spec = ColorSpec::new();
        spec.set_fg(color).set_bold(bold);
        let _ = self.stdout.set_color(&spec);
        let _ = write!(self.stdout, "{}", text);
        let _ = self.stdout.reset();
    }

    /// Status marker for a passing check.
    pub fn success(&mut self, text: &str) {
        self.styled(text, Some(Color::Green), true);
    }

    /// Module names and other highlighted identifiers.
    pub fn info(&mut self, text: &str) {
        self.styled(text, Some(Color::Cyan), false);
    }

    /// Section headings.
    pub fn bold(&mut self, text: &str) {
        self.styled(text, None, true);
    }

    /// Unstyled text.
    pub fn plain(&mut self, text: &str) {
        let _ = write!(self.stdout, "{}", text);
    }

    /// End the current line.
    pub fn newline(&mut self) {
        let _ = writeln!(self.stdout);
    }

    /// Flush buffered stdout.
    pub fn flush(&mut self) {
        let _ = self.stdout.flush();
    }

    /// Red `error:` prefix plus the message, on stderr.
    ///
    /// Used for validation failures that map to exit code 1.
    pub fn error_line(&mut self, message: &dyn fmt::Display) {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(Color::Red)).set_bold(true);
        let _ = self.stderr.set_color(&spec);
        let _ = write!(self.stderr, "error: ");
        let _ = self.stderr.reset();
        let _ = writeln!(self.stderr, "{}", message);
    }
}
