//! Per-cell color resolution.
//!
//! Precedence for both background and text color:
//!
//! 1. the row's value in the cell's color column (`bgcolor_col` / `textcolor_col`), if non-empty
//! 2. the cell's static color (`static_bgcolor` / `static_textcolor`), if non-empty
//! 3. the default (`transparent` / `#000`)
//!
//! Whatever wins is then checked against the allow-list: it must start with
//! `#` or be one of [`NAMED_COLORS`] (case-insensitive), and it must not
//! contain characters that would end the CSS declaration. Anything else falls
//! back to the default, so arbitrary CSS cannot ride in on a data value.

use crate::dataset::Row;
use crate::markup::is_safe_css_value;
use crate::template::CellDefinition;

pub const DEFAULT_BACKGROUND: &str = "transparent";
pub const DEFAULT_TEXT_COLOR: &str = "#000";

/// Color names accepted without a `#` prefix.
pub const NAMED_COLORS: &[&str] = &[
    "red",
    "blue",
    "yellow",
    "green",
    "transparent",
    "white",
    "black",
];

/// Background and text color for one cell in one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColors {
    pub background: String,
    pub text: String,
}

/// True if `value` may be used as a color.
pub fn is_allowed_color(value: &str) -> bool {
    (value.starts_with('#') && is_safe_css_value(value))
        || NAMED_COLORS.iter().any(|c| c.eq_ignore_ascii_case(value))
}

fn pick(column: &str, static_value: &str, row: &Row<'_>, default: &str) -> String {
    let chosen = Some(column)
        .filter(|c| !c.is_empty())
        .and_then(|c| row.get_non_empty(c))
        .or(Some(static_value).filter(|s| !s.is_empty()))
        .unwrap_or(default);

    if is_allowed_color(chosen) {
        chosen.to_string()
    } else {
        default.to_string()
    }
}

/// Resolve a cell's background and text color against a row.
pub fn resolve_colors(cell: &CellDefinition, row: &Row<'_>) -> ResolvedColors {
    let style = &cell.style;
    ResolvedColors {
        background: pick(
            &style.bgcolor_col,
            &style.static_bgcolor,
            row,
            DEFAULT_BACKGROUND,
        ),
        text: pick(
            &style.textcolor_col,
            &style.static_textcolor,
            row,
            DEFAULT_TEXT_COLOR,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<String> {
        vec!["Price".into(), "Tint".into()]
    }

    #[test]
    fn test_dynamic_wins_over_static() {
        let cols = columns();
        let values = vec!["1".to_string(), "#00ff00".to_string()];
        let row = Row::new(&cols, &values);
        let cell = CellDefinition::static_text("x")
            .bgcolor_col("Tint")
            .static_bgcolor("red");
        assert_eq!(resolve_colors(&cell, &row).background, "#00ff00");
    }

    #[test]
    fn test_static_used_when_dynamic_empty() {
        let cols = columns();
        let values = vec!["1".to_string(), "".to_string()];
        let row = Row::new(&cols, &values);
        let cell = CellDefinition::static_text("x")
            .bgcolor_col("Tint")
            .static_bgcolor("yellow");
        assert_eq!(resolve_colors(&cell, &row).background, "yellow");
    }

    #[test]
    fn test_static_used_when_dynamic_unset() {
        let cols = columns();
        let values = vec!["1".to_string(), "red".to_string()];
        let row = Row::new(&cols, &values);
        let cell = CellDefinition::static_text("x").static_textcolor("#123456");
        assert_eq!(resolve_colors(&cell, &row).text, "#123456");
    }

    #[test]
    fn test_defaults() {
        let cols = columns();
        let values = vec!["1".to_string(), "".to_string()];
        let row = Row::new(&cols, &values);
        let colors = resolve_colors(&CellDefinition::static_text("x"), &row);
        assert_eq!(colors.background, "transparent");
        assert_eq!(colors.text, "#000");
    }

    #[test]
    fn test_price_column_as_text_color() {
        let cols = columns();
        let cell = CellDefinition::text("Price").textcolor_col("Price");

        let values = vec!["blue".to_string(), "".to_string()];
        let row = Row::new(&cols, &values);
        assert_eq!(resolve_colors(&cell, &row).text, "blue");

        let values = vec!["notacolor".to_string(), "".to_string()];
        let row = Row::new(&cols, &values);
        assert_eq!(resolve_colors(&cell, &row).text, "#000");
    }

    #[test]
    fn test_invalid_values_fall_back_to_default() {
        let cols = columns();
        let values = vec!["1".to_string(), "url(evil)".to_string()];
        let row = Row::new(&cols, &values);
        let cell = CellDefinition::static_text("x")
            .bgcolor_col("Tint")
            .static_textcolor("purple");
        let colors = resolve_colors(&cell, &row);
        assert_eq!(colors.background, "transparent");
        assert_eq!(colors.text, "#000");
    }

    #[test]
    fn test_named_colors_case_insensitive() {
        assert!(is_allowed_color("RED"));
        assert!(is_allowed_color("White"));
        assert!(is_allowed_color("#abc"));
        assert!(!is_allowed_color("orange"));
        assert!(!is_allowed_color(""));
    }

    #[test]
    fn test_hex_value_cannot_add_declarations() {
        let cols = columns();
        let values = vec![
            "1".to_string(),
            "#fff; background-image: url(https://evil.example/x); position: fixed".to_string(),
        ];
        let row = Row::new(&cols, &values);
        let cell = CellDefinition::static_text("x")
            .bgcolor_col("Tint")
            .static_bgcolor("white");
        assert_eq!(resolve_colors(&cell, &row).background, "transparent");
        assert!(!is_allowed_color("#fff}"));
    }

    #[test]
    fn test_missing_color_column_in_row() {
        let cols = columns();
        let values = vec!["1".to_string(), "".to_string()];
        let row = Row::new(&cols, &values);
        let cell = CellDefinition::static_text("x")
            .bgcolor_col("Gone")
            .static_bgcolor("green");
        assert_eq!(resolve_colors(&cell, &row).background, "green");
    }
}
