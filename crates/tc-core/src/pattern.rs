//! Translation of `yyyy-MM-dd HH:mm:ss.SSS`-style patterns to chrono strftime.
//!
//! Letters are grouped into runs (`yyyy`, `MM`, `SSS`, ...) and each run maps
//! to one strftime specifier.  Text between single quotes is literal, and `''`
//! is an escaped quote.  Unknown letters are rejected rather than echoed so a
//! typo in a pattern never renders silently wrong output.

use crate::Variant;

/// One lexical piece of a user pattern.
#[derive(Debug, PartialEq)]
enum Piece {
    Field(char, usize),
    Literal(String),
}

fn tokenize(pattern: &str) -> Result<Vec<Piece>, String> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut pieces = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '\'' {
            // Quoted literal; `''` inside or outside quotes is a single quote.
            if chars.get(i + 1) == Some(&'\'') {
                pieces.push(Piece::Literal("'".into()));
                i += 2;
                continue;
            }
            let mut text = String::new();
            i += 1;
            loop {
                match chars.get(i) {
                    None => return Err("unterminated quote".into()),
                    Some('\'') if chars.get(i + 1) == Some(&'\'') => {
                        text.push('\'');
                        i += 2;
                    }
                    Some('\'') => {
                        i += 1;
                        break;
                    }
                    Some(&ch) => {
                        text.push(ch);
                        i += 1;
                    }
                }
            }
            pieces.push(Piece::Literal(text));
        } else if c.is_ascii_alphabetic() {
            let start = i;
            while i < chars.len() && chars[i] == c {
                i += 1;
            }
            pieces.push(Piece::Field(c, i - start));
        } else {
            pieces.push(Piece::Literal(c.to_string()));
            i += 1;
        }
    }
    Ok(pieces)
}

fn specifier(letter: char, count: usize) -> Result<&'static str, String> {
    let spec = match (letter, count) {
        ('y' | 'Y', 2) => "%y",
        ('y' | 'Y', _) => "%Y",
        ('x', _) => "%G",
        ('M', 1) => "%-m",
        ('M', 2) => "%m",
        ('M', 3) => "%b",
        ('M', _) => "%B",
        ('d', 1) => "%-d",
        ('d', _) => "%d",
        ('D', 1 | 2) => "%-j",
        ('D', _) => "%j",
        ('H' | 'k', 1) => "%-H",
        ('H' | 'k', _) => "%H",
        ('h' | 'K', 1) => "%-I",
        ('h' | 'K', _) => "%I",
        ('m', 1) => "%-M",
        ('m', _) => "%M",
        ('s', 1) => "%-S",
        ('s', _) => "%S",
        ('S', 1..=3) => "%3f",
        ('S', 4..=6) => "%6f",
        ('S', _) => "%9f",
        ('a', _) => "%p",
        ('E', 1..=3) => "%a",
        ('E', _) => "%A",
        ('e', _) => "%u",
        ('w', 1) => "%-V",
        ('w', _) => "%V",
        _ => return Err(format!("unsupported pattern letter '{letter}'")),
    };
    Ok(spec)
}

/// Translate a user pattern into a chrono strftime format string.
pub(crate) fn to_strftime(pattern: &str) -> Result<String, String> {
    let mut out = String::with_capacity(pattern.len() * 2);
    for piece in tokenize(pattern)? {
        match piece {
            Piece::Field(letter, count) => out.push_str(specifier(letter, count)?),
            Piece::Literal(text) => out.push_str(&text.replace('%', "%%")),
        }
    }
    Ok(out)
}

/// Field letters used by `pattern`, one per run.
pub(crate) fn letters(pattern: &str) -> Vec<char> {
    match tokenize(pattern) {
        Ok(pieces) => pieces
            .into_iter()
            .filter_map(|p| match p {
                Piece::Field(c, _) => Some(c),
                Piece::Literal(_) => None,
            })
            .collect(),
        Err(_) => pattern.chars().filter(char::is_ascii_alphabetic).collect(),
    }
}

/// Infer the value variant an explicit parse pattern produces: hour letters
/// imply a full datetime, year letters without hours a date, anything else a
/// recurring month-day.
pub(crate) fn infer_variant(pattern: &str) -> Variant {
    let letters = letters(pattern);
    if letters.iter().any(|c| matches!(c, 'H' | 'h' | 'K' | 'k')) {
        Variant::DateTime
    } else if letters.iter().any(|c| matches!(c, 'y' | 'Y')) {
        Variant::Date
    } else {
        Variant::MonthDay
    }
}
