//! Numeric text fields.

use egui::{TextEdit, Ui};

use crate::sizing;

/// Keep only what may appear while typing a non-negative number: digits and
/// the first decimal point.
pub fn filter_numeric_input(text: &str) -> String {
    let mut seen_point = false;
    text.chars()
        .filter(|&c| match c {
            '0'..='9' => true,
            '.' if !seen_point => {
                seen_point = true;
                true
            }
            _ => false,
        })
        .collect()
}

/// Single-line numeric field. Returns true when an edit is committed
/// (Enter or focus lost).
///
/// Disallowed characters are dropped as they are typed; coercion to a final
/// value is left to the caller.
pub fn numeric_field(ui: &mut Ui, text: &mut String, hint: &str) -> bool {
    let response = ui.add(
        TextEdit::singleline(text)
            .desired_width(sizing::FIELD_WIDTH)
            .hint_text(hint),
    );
    if response.changed() {
        let filtered = filter_numeric_input(text);
        if filtered != *text {
            *text = filtered;
        }
    }
    response.lost_focus()
}
