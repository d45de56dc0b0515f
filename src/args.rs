//! Command-line arguments – the tagged argument model and shell escaping.
//!
//! Every argument handed to the renderer is one of four shapes. The shape
//! alone decides whether a value is escaped, so the command line for a given
//! list of arguments is always the same string.

use std::fmt::Write as _;

/// A value attached to a positional argument or an option.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// Emitted bare when used as an option value.
    Number(f64),
    /// Always shell-escaped.
    Text(String),
}

impl ArgValue {
    /// Whether this value may be written without escaping.
    ///
    /// Non-finite numbers (`NaN`, `inf`) are escaped like text.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ArgValue::Number(n) if n.is_finite())
    }

    fn as_text(&self) -> String {
        match self {
            ArgValue::Number(n) => n.to_string(),
            ArgValue::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::Text(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::Text(value)
    }
}

impl From<f64> for ArgValue {
    fn from(value: f64) -> Self {
        ArgValue::Number(value)
    }
}

impl From<i32> for ArgValue {
    fn from(value: i32) -> Self {
        ArgValue::Number(f64::from(value))
    }
}

impl From<u32> for ArgValue {
    fn from(value: u32) -> Self {
        ArgValue::Number(f64::from(value))
    }
}

/// One entry of a renderer command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Bare flag such as `-q`; never escaped.
    Flag(String),
    /// Positional value; always escaped, even when numeric.
    Positional(ArgValue),
    /// Flag followed by a value; numbers bare, text escaped.
    Option(String, ArgValue),
    /// Fragment that is already escaped, emitted verbatim. A separating
    /// space is inserted when the fragment does not start with whitespace.
    Raw(String),
}

impl Arg {
    pub fn flag(name: impl Into<String>) -> Self {
        Arg::Flag(name.into())
    }

    pub fn positional(value: impl Into<ArgValue>) -> Self {
        Arg::Positional(value.into())
    }

    pub fn option(name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        Arg::Option(name.into(), value.into())
    }

    pub fn raw(fragment: impl Into<String>) -> Self {
        Arg::Raw(fragment.into())
    }

    /// Append this argument, with its leading space, to `out`.
    pub fn write_to(&self, out: &mut String) {
        match self {
            Arg::Flag(name) => {
                let _ = write!(out, " {name}");
            }
            Arg::Positional(value) => {
                let _ = write!(out, " {}", escape_shell_arg(&value.as_text()));
            }
            Arg::Option(name, value) => {
                let rendered = if value.is_numeric() {
                    value.as_text()
                } else {
                    escape_shell_arg(&value.as_text())
                };
                let _ = write!(out, " {name} {rendered}");
            }
            Arg::Raw(fragment) => {
                if !fragment.is_empty() && !fragment.starts_with(char::is_whitespace) {
                    out.push(' ');
                }
                out.push_str(fragment);
            }
        }
    }
}

/// Serialize `args` in order into a single string of space-prefixed tokens.
pub fn serialize_args(args: &[Arg]) -> String {
    let mut out = String::new();
    for arg in args {
        arg.write_to(&mut out);
    }
    out
}

/// Full command line: executable, serialized arguments and the trailing
/// `-` that sends the PDF to stdout.
///
/// The executable is inserted verbatim so callers may pass a path together
/// with interpreter words (e.g. `xvfb-run wkhtmltopdf`).
pub fn command_line(executable: &str, args: &[Arg]) -> String {
    let mut cmd = executable.to_string();
    cmd.push_str(&serialize_args(args));
    cmd.push_str(" -");
    cmd
}

/// Quote `value` as a single shell word.
#[cfg(not(windows))]
pub fn escape_shell_arg(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Quote `value` as a single `cmd.exe` word. `"`, `%` and `!` cannot be
/// quoted there and are replaced with spaces.
#[cfg(windows)]
pub fn escape_shell_arg(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .map(|c| if matches!(c, '"' | '%' | '!') { ' ' } else { c })
        .collect();
    format!("\"{cleaned}\"")
}

#[cfg(all(test, not(windows)))]
mod tests {
    use super::*;

    #[test]
    fn bare_flag_is_not_escaped() {
        assert_eq!(serialize_args(&[Arg::flag("-q")]), " -q");
    }

    #[test]
    fn positional_is_always_escaped() {
        assert_eq!(serialize_args(&[Arg::positional("a b")]), " 'a b'");
        assert_eq!(serialize_args(&[Arg::positional(3)]), " '3'");
    }

    #[test]
    fn option_escapes_text_but_not_numbers() {
        assert_eq!(serialize_args(&[Arg::option("--zoom", 1.5)]), " --zoom 1.5");
        assert_eq!(serialize_args(&[Arg::option("--dpi", 300)]), " --dpi 300");
        assert_eq!(
            serialize_args(&[Arg::option("--title", "a b")]),
            " --title 'a b'"
        );
    }

    #[test]
    fn non_finite_numbers_are_escaped() {
        assert_eq!(
            serialize_args(&[Arg::option("--zoom", f64::NAN)]),
            " --zoom 'NaN'"
        );
    }

    #[test]
    fn raw_fragment_is_verbatim() {
        assert_eq!(
            serialize_args(&[Arg::raw(" toc --toc-header-text 'x'")]),
            " toc --toc-header-text 'x'"
        );
    }

    #[test]
    fn raw_fragment_without_leading_space_is_separated() {
        assert_eq!(command_line("tool", &[Arg::raw("x")]), "tool x -");
        assert_eq!(command_line("tool", &[Arg::raw("")]), "tool -");
    }

    #[test]
    fn single_quotes_are_closed_and_reopened() {
        assert_eq!(escape_shell_arg("it's"), r"'it'\''s'");
        assert_eq!(escape_shell_arg(""), "''");
    }

    #[test]
    fn command_line_ends_with_stdout_marker() {
        let args = vec![Arg::flag("--quiet"), Arg::positional("in.html")];
        assert_eq!(command_line("tool", &args), "tool --quiet 'in.html' -");
        assert_eq!(command_line("tool", &[]), "tool -");
    }

    #[test]
    fn serialization_is_deterministic() {
        let args = vec![
            Arg::option("--title", "Report"),
            Arg::flag("-g"),
            Arg::option("--margin-top", 10),
            Arg::positional("https://example.com/?a=1&b=2"),
        ];
        let first = command_line("wkhtmltopdf", &args);
        for _ in 0..10 {
            assert_eq!(command_line("wkhtmltopdf", &args.clone()), first);
        }
    }
}
