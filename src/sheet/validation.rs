use crate::config::ColumnConfig;
use crate::error::ProvisionError;

use super::SheetData;

pub const MIN_HEADLINES: usize = 3;
pub const MAX_HEADLINES: usize = 15;
pub const HEADLINE_MAX_CHARS: usize = 30;
pub const MIN_DESCRIPTIONS: usize = 2;
pub const MAX_DESCRIPTIONS: usize = 4;
pub const DESCRIPTION_MAX_CHARS: usize = 90;
pub const CALLOUT_MAX_CHARS: usize = 25;

const HEADLINE_PREVIEW_CHARS: usize = 40;
const DESCRIPTION_PREVIEW_CHARS: usize = 50;
const CALLOUT_PREVIEW_CHARS: usize = 40;

/// Check the sheet against the responsive search ad and callout bounds.
///
/// Every violation is collected; the error lists all of them at once.
pub fn validate(sheet: &SheetData, columns: &ColumnConfig) -> Result<(), ProvisionError> {
    let mut errors = Vec::new();

    if sheet.keywords.is_empty() {
        errors.push(format!(
            "no keywords found (column {})",
            column_letter(columns.keywords)
        ));
    }

    check_count(&mut errors, "headlines", sheet.headlines.len(), MIN_HEADLINES, MAX_HEADLINES);
    check_lengths(
        &mut errors,
        "Headline",
        &sheet.headlines,
        HEADLINE_MAX_CHARS,
        HEADLINE_PREVIEW_CHARS,
    );

    check_count(
        &mut errors,
        "descriptions",
        sheet.descriptions.len(),
        MIN_DESCRIPTIONS,
        MAX_DESCRIPTIONS,
    );
    check_lengths(
        &mut errors,
        "Description",
        &sheet.descriptions,
        DESCRIPTION_MAX_CHARS,
        DESCRIPTION_PREVIEW_CHARS,
    );

    // Callouts are optional
    check_lengths(
        &mut errors,
        "Callout",
        &sheet.callouts,
        CALLOUT_MAX_CHARS,
        CALLOUT_PREVIEW_CHARS,
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ProvisionError::Validation(errors))
    }
}

fn check_count(errors: &mut Vec<String>, what: &str, found: usize, min: usize, max: usize) {
    if found < min {
        errors.push(format!("minimum {} {} required, found {}", min, what, found));
    } else if found > max {
        errors.push(format!("maximum {} {} allowed, found {}", max, what, found));
    }
}

fn check_lengths(
    errors: &mut Vec<String>,
    what: &str,
    values: &[String],
    max_chars: usize,
    preview_chars: usize,
) {
    for (index, value) in values.iter().enumerate() {
        let length = value.chars().count();
        if length > max_chars {
            errors.push(format!(
                "{} {} has {} characters (max {}): \"{}\"",
                what,
                index + 1,
                length,
                max_chars,
                preview(value, preview_chars)
            ));
        }
    }
}

/// First `max_chars` characters, with an ellipsis when cut
fn preview(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        value.to_string()
    } else {
        let cut: String = value.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}

/// Spreadsheet column letter for a zero-based index (0 = A, 26 = AA)
pub fn column_letter(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}
