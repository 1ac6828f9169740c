//! Terminal styles

use console::Style;

/// Dark terminal palette
pub struct DarkTheme;

impl DarkTheme {
    pub fn heading() -> Style {
        Style::new().bold()
    }

    pub fn answer_heading() -> Style {
        Style::new().green().bold()
    }

    pub fn badge() -> Style {
        Style::new().cyan()
    }

    pub fn error() -> Style {
        Style::new().red()
    }

    pub fn muted() -> Style {
        Style::new().dim()
    }
}
