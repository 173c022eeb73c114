//! Field text templates.
//!
//! A template is literal text with `%(name)s` placeholders naming record
//! fields; `%%` is a literal percent sign. Placeholders take the usual
//! printf-style `-` and `0` flags, a minimum width and a precision, with
//! `s` for text and `d` or `i` for integers. Templates are parsed once
//! when the field is configured.

use crate::error::{LabelError, Result};
use crate::record::Record;
use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conversion {
    Text,
    Integer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Placeholder {
    name: String,
    left_align: bool,
    zero_pad: bool,
    width: usize,
    precision: Option<usize>,
    conversion: Conversion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Placeholder),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

fn digits(chars: &mut Peekable<Chars<'_>>) -> Option<usize> {
    let mut value: Option<usize> = None;
    while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
        chars.next();
        value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(d as usize));
    }
    value
}

/// Pad `body` with spaces to `width` characters.
fn pad(body: String, width: usize, left_align: bool) -> String {
    let len = body.chars().count();
    if len >= width {
        return body;
    }
    let fill = " ".repeat(width - len);
    if left_align {
        body + &fill
    } else {
        fill + &body
    }
}

impl Template {
    pub fn parse(source: &str) -> Result<Self> {
        let syntax = |message: &str| LabelError::TemplateSyntax {
            template: source.to_string(),
            message: message.to_string(),
        };

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }
            match chars.next() {
                Some('%') => literal.push('%'),
                Some('(') => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some(')') => break,
                            Some(c) => name.push(c),
                            None => return Err(syntax("unterminated field name")),
                        }
                    }

                    let mut left_align = false;
                    let mut zero_pad = false;
                    while let Some(&flag) = chars.peek() {
                        match flag {
                            '-' => left_align = true,
                            '0' => zero_pad = true,
                            _ => break,
                        }
                        chars.next();
                    }
                    let width = digits(&mut chars).unwrap_or(0);
                    let precision = if chars.peek() == Some(&'.') {
                        chars.next();
                        Some(digits(&mut chars).unwrap_or(0))
                    } else {
                        None
                    };

                    let conversion = match chars.next() {
                        Some('s') => Conversion::Text,
                        Some('d') | Some('i') => Conversion::Integer,
                        Some(other) => {
                            return Err(syntax(&format!(
                                "unsupported conversion '{}' for field '{}', use s, d or i",
                                other, name
                            )))
                        }
                        None => return Err(syntax("missing conversion after field name")),
                    };

                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(Placeholder {
                        name,
                        left_align,
                        zero_pad,
                        width,
                        precision,
                        conversion,
                    }));
                }
                Some(other) => {
                    return Err(syntax(&format!(
                        "unsupported format '%{}', use '%%' for a literal percent sign",
                        other
                    )))
                }
                None => return Err(syntax("incomplete format at end of template")),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Substitute `record` into the template. A placeholder naming a field
    /// the record lacks is an error, as is an integer placeholder whose
    /// value is not an integer.
    pub fn format(&self, record: &Record) -> Result<String> {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(placeholder) => {
                    let value = record.get(&placeholder.name).ok_or_else(|| LabelError::MissingField {
                        template: self.source.clone(),
                        field: placeholder.name.clone(),
                    })?;
                    out.push_str(&self.convert(placeholder, value)?);
                }
            }
        }
        Ok(out)
    }

    fn convert(&self, placeholder: &Placeholder, value: &str) -> Result<String> {
        match placeholder.conversion {
            Conversion::Text => {
                let text = match placeholder.precision {
                    Some(max) => value.chars().take(max).collect(),
                    None => value.to_string(),
                };
                Ok(pad(text, placeholder.width, placeholder.left_align))
            }
            Conversion::Integer => {
                let number: i64 = value.trim().parse().map_err(|_| LabelError::NotAnInteger {
                    template: self.source.clone(),
                    field: placeholder.name.clone(),
                    value: value.to_string(),
                })?;

                let sign = if number < 0 { "-" } else { "" };
                let mut magnitude = number.unsigned_abs().to_string();
                if let Some(min_digits) = placeholder.precision {
                    if magnitude.len() < min_digits {
                        magnitude = "0".repeat(min_digits - magnitude.len()) + &magnitude;
                    }
                }
                if placeholder.zero_pad && !placeholder.left_align {
                    let len = sign.len() + magnitude.len();
                    if len < placeholder.width {
                        magnitude = "0".repeat(placeholder.width - len) + &magnitude;
                    }
                }
                Ok(pad(
                    format!("{}{}", sign, magnitude),
                    placeholder.width,
                    placeholder.left_align,
                ))
            }
        }
    }
}
