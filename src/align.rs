//! Column alignment for cells carrying ANSI escape sequences.
//!
//! Escape bytes take no room on screen, so every width here is measured on
//! the stripped text while the escapes themselves are left in place.

use unicode_width::UnicodeWidthStr;

use crate::{Alignment, Table};

const ESC: char = '\x1b';
const BEL: char = '\x07';

/// Remove CSI (`ESC [ ... final`), OSC (`ESC ] ... BEL|ESC \`) and two-byte
/// escape sequences.
pub fn strip_ansi(text: &str) -> String {
    if !text.contains(ESC) {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != ESC {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('[') => {
                for c in chars.by_ref() {
                    if ('\x40'..='\x7e').contains(&c) {
                        break;
                    }
                }
            }
            Some(']') => {
                while let Some(c) = chars.next() {
                    if c == BEL {
                        break;
                    }
                    if c == ESC && chars.peek() == Some(&'\\') {
                        chars.next();
                        break;
                    }
                }
            }
            _ => {}
        }
    }
    out
}

/// Printable width of `text` once escape sequences are removed.
pub fn visible_width(text: &str) -> usize {
    if text.contains(ESC) {
        strip_ansi(text).width()
    } else {
        text.width()
    }
}

/// Split `"10.00 ms (↓ 1100.0%)"` into value and parenthesised annotation.
fn split_annotation(cell: &str) -> Option<(&str, &str)> {
    if !cell.ends_with(')') {
        return None;
    }
    let at = cell.rfind(" (")?;
    Some((&cell[..at], &cell[at + 1..]))
}

fn pad_left(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(visible_width(text));
    format!("{}{text}", " ".repeat(fill))
}

fn pad_right(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(visible_width(text));
    format!("{text}{}", " ".repeat(fill))
}

/// Pad one column in place so every cell has the same visible width.
///
/// Right-aligned cells of the form `value (annotation)` are aligned on both
/// parts, so the annotations line up across rows.
fn align_column(rows: &mut [Vec<String>], column: usize, alignment: Alignment) {
    let cells = rows.iter().filter_map(|row| row.get(column));
    let plain_width = cells.clone().map(|c| visible_width(c)).max().unwrap_or(0);

    if alignment == Alignment::Left {
        for cell in rows.iter_mut().filter_map(|row| row.get_mut(column)) {
            *cell = pad_right(cell, plain_width);
        }
        return;
    }

    let (mut value_width, mut note_width) = (0, 0);
    for (value, note) in cells.filter_map(|c| split_annotation(c)) {
        value_width = value_width.max(visible_width(value));
        note_width = note_width.max(visible_width(note));
    }
    let split_width = if note_width > 0 {
        value_width + 1 + note_width
    } else {
        0
    };
    let width = plain_width.max(split_width);

    for cell in rows.iter_mut().filter_map(|row| row.get_mut(column)) {
        let joined = match split_annotation(cell) {
            Some((value, note)) => format!(
                "{} {}",
                pad_left(value, value_width),
                pad_left(note, note_width)
            ),
            None => cell.clone(),
        };
        *cell = pad_left(&joined, width);
    }
}

/// Align every column of `rows` according to `alignment`.
pub fn align_rows(rows: &mut [Vec<String>], alignment: &[Alignment]) {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    for column in 0..columns {
        let align = alignment.get(column).copied().unwrap_or(Alignment::Left);
        align_column(rows, column, align);
    }
}

/// Align `rows` against the table's column alignment and append them.
pub fn align_and_append(mut rows: Vec<Vec<String>>, table: &mut Table) {
    align_rows(&mut rows, &table.alignment);
    table.rows.extend(rows);
}
