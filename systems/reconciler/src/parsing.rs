//! Text parsing for sidebar rows and player list entries.

use round_recap_core::text::{self, FORMATTING_PREFIX};

const ASCII_COLON: char = ':';
const FULL_WIDTH_COLON: char = '：';

/// Player row parsed from the scoreboard sidebar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ScoreboardRow {
    pub(crate) name: String,
    pub(crate) gold: u32,
}

/// Parses a `name: gold` sidebar row.
///
/// Rows that are empty, indented, lack a separator, or carry no visible name
/// yield `None`.
pub(crate) fn parse_scoreboard_line(line: &str) -> Option<ScoreboardRow> {
    if line.is_empty() || line.starts_with(' ') {
        return None;
    }

    let separator = if line.contains(ASCII_COLON) {
        ASCII_COLON
    } else {
        FULL_WIDTH_COLON
    };
    let (raw_name, raw_gold) = line.split_once(separator)?;

    let name = text::strip_formatting(raw_name).trim().to_owned();
    if name.is_empty() {
        return None;
    }

    Some(ScoreboardRow {
        name,
        gold: parse_gold(raw_gold),
    })
}

/// Extracts gold from the value half of a sidebar row.
///
/// Formatting codes, thousands separators and whitespace are dropped, then the
/// last run of digits is read. Anything unparsable, including overflow, is zero.
pub(crate) fn parse_gold(raw: &str) -> u32 {
    let cleaned: String = text::strip_formatting(raw)
        .chars()
        .filter(|ch| *ch != ',' && !ch.is_whitespace())
        .collect();

    let end = match cleaned.rfind(|ch: char| ch.is_ascii_digit()) {
        Some(index) => index + 1,
        None => return 0,
    };
    let start = cleaned[..end]
        .rfind(|ch: char| !ch.is_ascii_digit())
        .map_or(0, |index| index + cleaned[index..].chars().next().map_or(1, char::len_utf8));

    cleaned[start..end].parse().unwrap_or(0)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Color {
    Default,
    Code(char),
}

impl Color {
    fn is_highlight(self) -> bool {
        matches!(self, Color::Code('e' | '6'))
    }
}

/// Recovers kills from a rendered player list entry.
///
/// Walks the formatted text tracking the active colour and reads the first
/// yellow or gold run of digits that appears after the player's name.
pub(crate) fn kills_from_display(display: &str, name: &str) -> u32 {
    let stripped = text::strip_formatting(display);
    let name_end = if name.is_empty() {
        0
    } else {
        stripped
            .find(name)
            .map_or(0, |index| stripped[..index].chars().count() + name.chars().count())
    };

    let mut color = Color::Default;
    let mut visible = 0usize;
    let mut digits = String::new();
    let mut chars = display.chars();

    while let Some(ch) = chars.next() {
        if ch == FORMATTING_PREFIX {
            if let Some(code) = chars.next() {
                color = apply_code(color, code.to_ascii_lowercase());
            }
            continue;
        }

        let numeric = ch.is_ascii_digit() || ch == ',';
        if digits.is_empty() {
            if visible >= name_end && color.is_highlight() && numeric {
                digits.push(ch);
            }
        } else if color.is_highlight() && numeric {
            digits.push(ch);
        } else {
            break;
        }

        visible += 1;
    }

    digits.retain(|ch| ch != ',');
    digits.parse().unwrap_or(0)
}

fn apply_code(current: Color, code: char) -> Color {
    match code {
        '0'..='9' | 'a'..='f' => Color::Code(code),
        'r' => Color::Default,
        _ => current,
    }
}
