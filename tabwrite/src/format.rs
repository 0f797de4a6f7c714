//! Format templates turning raw cell values into their textual form.
//!
//! A [Template] is literal text around at most one `{...}` placeholder
//! (`{{` and `}}` escape literal braces). The placeholder spec is a subset
//! of the `std::fmt` grammar:
//!
//! ```text
//! [[fill]align][+][#][0][width][.precision][type]
//! ```
//!
//! with align one of `<`/`^`/`>` and type one of nothing (canonical text),
//! `e`/`E` (scientific notation) or `x`/`X`/`o`/`b` (integer radix). The
//! default template `{}` produces the value's canonical text. Templates also
//! serve as fan-out header templates, with the 1-based slot index as the
//! substituted value.
//!
//! Rounding under a precision is delegated to `std::fmt`, so halfway cases
//! round to even (`{:.1}` renders `7.85` as `7.8`).

use crate::datavalues::{Value, ValueDomain};
use crate::error::Error;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum FormatType {
    Canonical,
    LowerExp,
    UpperExp,
    LowerHex,
    UpperHex,
    Octal,
    Binary,
}

#[derive(Debug, Clone, PartialEq)]
struct Placeholder {
    fill: char,
    align: Option<Align>,
    sign_plus: bool,
    alternate: bool,
    zero_pad: bool,
    width: Option<usize>,
    precision: Option<usize>,
    format_type: FormatType,
}

#[derive(Debug, Clone)]
struct Parsed {
    prefix: String,
    placeholder: Option<Placeholder>,
    suffix: String,
}

/// A parsed format template for one column's cells (or for a fan-out
/// column's headers).
///
/// Construction never fails: a syntactically invalid template is remembered
/// together with the reason and reported as an [Error::Template] on its
/// first application.
#[derive(Debug, Clone)]
pub struct Template {
    raw: String,
    parsed: Result<Parsed, String>,
}

impl Template {
    /// Parse a template from its textual form.
    pub fn new(template: impl Into<String>) -> Self {
        let raw = template.into();
        let parsed = parse(&raw);
        Template { raw, parsed }
    }

    /// The template's original textual form.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Apply the template to one value, producing the cell text.
    pub fn apply(&self, value: &Value) -> Result<String, Error> {
        let parsed = match &self.parsed {
            Ok(parsed) => parsed,
            Err(reason) => {
                return Err(Error::Template {
                    template: self.raw.clone(),
                    reason: reason.clone(),
                })
            }
        };

        let mut text = parsed.prefix.clone();
        if let Some(placeholder) = &parsed.placeholder {
            let cell = placeholder.apply(value).map_err(|domain| Error::IncompatibleFormat {
                template: self.raw.clone(),
                domain,
            })?;
            text.push_str(&cell);
        }
        text.push_str(&parsed.suffix);
        Ok(text)
    }
}

impl Default for Template {
    fn default() -> Self {
        Template::new("{}")
    }
}

impl From<&str> for Template {
    fn from(template: &str) -> Self {
        Template::new(template)
    }
}

impl From<String> for Template {
    fn from(template: String) -> Self {
        Template::new(template)
    }
}

fn parse(raw: &str) -> Result<Parsed, String> {
    let mut prefix = String::new();
    let mut placeholder = None;
    let mut suffix = String::new();

    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        let literal = if placeholder.is_some() {
            &mut suffix
        } else {
            &mut prefix
        };
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                literal.push('{');
            }
            '{' => {
                if placeholder.is_some() {
                    return Err("more than one placeholder".to_string());
                }
                let mut interior = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(inner) => interior.push(inner),
                        None => return Err("unterminated placeholder".to_string()),
                    }
                }
                // the interior is `[argument][:spec]`; only the positional
                // form without an argument is supported
                let spec = match interior.split_once(':') {
                    Some(("", spec)) => spec,
                    Some((argument, _)) => {
                        return Err(format!(
                            "unsupported argument \"{argument}\" in placeholder"
                        ))
                    }
                    None if interior.is_empty() => "",
                    None => {
                        return Err(format!(
                            "unsupported argument \"{interior}\" in placeholder"
                        ))
                    }
                };
                placeholder = Some(parse_spec(spec)?);
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                literal.push('}');
            }
            '}' => return Err("unmatched '}' outside a placeholder".to_string()),
            other => literal.push(other),
        }
    }

    Ok(Parsed {
        prefix,
        placeholder,
        suffix,
    })
}

fn parse_spec(spec: &str) -> Result<Placeholder, String> {
    let chars: Vec<char> = spec.chars().collect();
    let mut placeholder = Placeholder {
        fill: ' ',
        align: None,
        sign_plus: false,
        alternate: false,
        zero_pad: false,
        width: None,
        precision: None,
        format_type: FormatType::Canonical,
    };
    let mut pos = 0;

    let align_of = |c: char| match c {
        '<' => Some(Align::Left),
        '^' => Some(Align::Center),
        '>' => Some(Align::Right),
        _ => None,
    };

    if chars.len() >= 2 && align_of(chars[1]).is_some() {
        placeholder.fill = chars[0];
        placeholder.align = align_of(chars[1]);
        pos = 2;
    } else if !chars.is_empty() && align_of(chars[0]).is_some() {
        placeholder.align = align_of(chars[0]);
        pos = 1;
    }

    if pos < chars.len() && chars[pos] == '+' {
        placeholder.sign_plus = true;
        pos += 1;
    }
    if pos < chars.len() && chars[pos] == '#' {
        placeholder.alternate = true;
        pos += 1;
    }
    if pos < chars.len() && chars[pos] == '0' {
        placeholder.zero_pad = true;
        pos += 1;
    }

    let mut width_digits = String::new();
    while pos < chars.len() && chars[pos].is_ascii_digit() {
        width_digits.push(chars[pos]);
        pos += 1;
    }
    if !width_digits.is_empty() {
        placeholder.width = Some(
            width_digits
                .parse()
                .map_err(|_| "width out of range".to_string())?,
        );
    }

    if pos < chars.len() && chars[pos] == '.' {
        pos += 1;
        let mut precision_digits = String::new();
        while pos < chars.len() && chars[pos].is_ascii_digit() {
            precision_digits.push(chars[pos]);
            pos += 1;
        }
        if precision_digits.is_empty() {
            return Err("missing precision after '.'".to_string());
        }
        placeholder.precision = Some(
            precision_digits
                .parse()
                .map_err(|_| "precision out of range".to_string())?,
        );
    }

    if pos < chars.len() {
        placeholder.format_type = match chars[pos] {
            'e' => FormatType::LowerExp,
            'E' => FormatType::UpperExp,
            'x' => FormatType::LowerHex,
            'X' => FormatType::UpperHex,
            'o' => FormatType::Octal,
            'b' => FormatType::Binary,
            other => return Err(format!("unknown format type '{other}'")),
        };
        pos += 1;
    }
    if pos < chars.len() {
        let rest: String = chars[pos..].iter().collect();
        return Err(format!("trailing characters \"{rest}\""));
    }

    let radix = matches!(
        placeholder.format_type,
        FormatType::LowerHex | FormatType::UpperHex | FormatType::Octal | FormatType::Binary
    );
    if placeholder.alternate && !radix {
        return Err("'#' requires a radix format type".to_string());
    }

    Ok(placeholder)
}

impl Placeholder {
    /// Apply the placeholder to one value; an `Err` carries the domain the
    /// spec is incompatible with.
    fn apply(&self, value: &Value) -> Result<String, ValueDomain> {
        let numeric = value.is_numeric();
        let needs_number = self.sign_plus
            || self.zero_pad
            || self.precision.is_some()
            || matches!(self.format_type, FormatType::LowerExp | FormatType::UpperExp);
        if needs_number && !numeric {
            return Err(value.domain());
        }

        let mut body = match self.format_type {
            FormatType::Canonical => match (value, self.precision) {
                (Value::Integer(i), Some(precision)) => {
                    format!("{:.prec$}", *i as f64, prec = precision)
                }
                (Value::Float(f), Some(precision)) => format!("{f:.prec$}", prec = precision),
                (other, _) => other.to_string(),
            },
            FormatType::LowerExp => {
                let number = value.to_f64().ok_or_else(|| value.domain())?;
                match self.precision {
                    Some(precision) => format!("{number:.prec$e}", prec = precision),
                    None => format!("{number:e}"),
                }
            }
            FormatType::UpperExp => {
                let number = value.to_f64().ok_or_else(|| value.domain())?;
                match self.precision {
                    Some(precision) => format!("{number:.prec$E}", prec = precision),
                    None => format!("{number:E}"),
                }
            }
            FormatType::LowerHex | FormatType::UpperHex | FormatType::Octal | FormatType::Binary => {
                let Value::Integer(i) = value else {
                    return Err(value.domain());
                };
                match (self.format_type, self.alternate) {
                    (FormatType::LowerHex, false) => format!("{i:x}"),
                    (FormatType::LowerHex, true) => format!("{i:#x}"),
                    (FormatType::UpperHex, false) => format!("{i:X}"),
                    (FormatType::UpperHex, true) => format!("{i:#X}"),
                    (FormatType::Octal, false) => format!("{i:o}"),
                    (FormatType::Octal, true) => format!("{i:#o}"),
                    (FormatType::Binary, false) => format!("{i:b}"),
                    (FormatType::Binary, true) => format!("{i:#b}"),
                    _ => unreachable!("non-radix types are handled by the outer match"),
                }
            }
        };

        if self.sign_plus && !body.starts_with('-') {
            body.insert(0, '+');
        }

        if let Some(width) = self.width {
            let length = body.chars().count();
            if length < width {
                let missing = width - length;
                if self.zero_pad && self.align.is_none() {
                    let sign = usize::from(body.starts_with('+') || body.starts_with('-'));
                    body.insert_str(sign, &"0".repeat(missing));
                } else {
                    let fill = self.fill.to_string();
                    let align = self.align.unwrap_or(if numeric {
                        Align::Right
                    } else {
                        Align::Left
                    });
                    match align {
                        Align::Left => body.push_str(&fill.repeat(missing)),
                        Align::Right => body.insert_str(0, &fill.repeat(missing)),
                        Align::Center => {
                            let left = missing / 2;
                            body.insert_str(0, &fill.repeat(left));
                            body.push_str(&fill.repeat(missing - left));
                        }
                    }
                }
            }
        }

        Ok(body)
    }
}
