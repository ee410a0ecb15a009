//! Index line rendering helpers

use chrono::{DateTime, Local};
use std::iter::Peekable;
use std::path::Path;
use std::str::Chars;
use std::time::SystemTime;

/// Default line format: display name, encoded path, date
pub const DEFAULT_FORMAT: &str = "- [%s](%s) %s\n";

/// Ensure an extension carries a leading `.`
pub fn normalize_extension(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    }
}

/// Base name with the first matching extension removed.
///
/// `extensions` are tried in order; the first one the file name ends with is
/// stripped. A name matching none is returned whole.
pub fn display_name(rel_path: &str, extensions: &[String]) -> String {
    let file_name = Path::new(rel_path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| rel_path.to_string());
    extensions
        .iter()
        .map(|ext| normalize_extension(ext))
        .find_map(|ext| file_name.strip_suffix(ext.as_str()).map(str::to_string))
        .unwrap_or_else(|| file_name.to_string())
}

/// Markdown link target: forward slashes, spaces as `%20`
pub fn encode_link_path(rel_path: &str) -> String {
    rel_path.replace('\\', "/").replace(' ', "%20")
}

/// Local calendar date of a modification time, `YYYY-MM-DD`
pub fn format_date(time: SystemTime) -> String {
    let datetime: DateTime<Local> = time.into();
    datetime.format("%Y-%m-%d").to_string()
}

/// One `%[flags][width][.precision]verb` directive
#[derive(Debug, Default)]
struct Directive {
    left: bool,
    zero: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

impl Directive {
    fn parse(chars: &mut Peekable<Chars<'_>>) -> Self {
        let mut directive = Directive::default();
        while let Some(&flag) = chars.peek() {
            match flag {
                '-' => directive.left = true,
                '0' => directive.zero = true,
                '+' | '#' | ' ' => {}
                _ => break,
            }
            chars.next();
        }
        directive.width = take_number(chars);
        if chars.peek() == Some(&'.') {
            chars.next();
            directive.precision = Some(take_number(chars).unwrap_or(0));
        }
        directive
    }

    fn render(&self, verb: char, arg: &str, out: &mut String) {
        let truncated: String = match self.precision {
            Some(max) => arg.chars().take(max).collect(),
            None => arg.to_string(),
        };
        let text = match verb {
            's' | 'v' => truncated,
            'q' => format!("{:?}", truncated),
            _ => {
                out.push_str(&format!("%!{}(string={})", verb, arg));
                return;
            }
        };

        let pad = self
            .width
            .unwrap_or(0)
            .saturating_sub(text.chars().count());
        if self.left {
            out.push_str(&text);
            out.extend(std::iter::repeat(' ').take(pad));
        } else {
            let fill = if self.zero { '0' } else { ' ' };
            out.extend(std::iter::repeat(fill).take(pad));
            out.push_str(&text);
        }
    }
}

fn take_number(chars: &mut Peekable<Chars<'_>>) -> Option<usize> {
    let mut value: Option<usize> = None;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(digit as usize));
        chars.next();
    }
    value
}

/// Substitute positional arguments into a printf-style format.
///
/// Every verb consumes the next argument. `%s` and `%v` honor width,
/// precision and the `-`/`0` flags; `%q` quotes; any other verb renders as
/// `%!d(string=arg)`. `%%` is a literal percent. A verb with no argument
/// left renders as `%!s(MISSING)`, a dangling `%` as `%!(NOVERB)`, and
/// surplus arguments are dropped.
pub fn format_line(format: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(format.len() + args.iter().map(|a| a.len()).sum::<usize>());
    let mut args = args.iter();
    let mut chars = format.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }
        let directive = Directive::parse(&mut chars);
        let verb = match chars.next() {
            Some(verb) => verb,
            None => {
                out.push_str("%!(NOVERB)");
                break;
            }
        };
        if verb == '%' {
            out.push('%');
            continue;
        }
        match args.next() {
            Some(arg) => directive.render(verb, arg, &mut out),
            None => out.push_str(&format!("%!{}(MISSING)", verb)),
        }
    }

    out
}
