//! Centralized theme definitions for console output.

/// Unicode symbols used throughout the output.
pub mod symbols {
    pub const APP_ICON: &str = "\u{25c9}"; // ◉
    pub const SUCCESS: &str = "\u{2714}"; // ✔
    pub const WARNING: &str = "\u{26a0}"; // ⚠
    pub const ERROR: &str = "\u{2717}"; // ✗
    pub const RULE: &str = "\u{2550}"; // ═
}

/// Color palette for the application.
pub mod colors {
    use crossterm::style::Color;

    /// Accent color (titles, prompts).
    pub const ACCENT: Color = Color::Cyan;
    /// Muted text color.
    pub const TEXT_SECONDARY: Color = Color::DarkGrey;
    /// Success color.
    pub const SUCCESS: Color = Color::Green;
    /// Warning color.
    pub const WARNING: Color = Color::Yellow;
    /// Error color.
    pub const ERROR: Color = Color::Red;
}

/// Pre-styled fragments for common output.
///
/// Styling is dropped when stdout is not a terminal.
pub mod styles {
    use std::io::IsTerminal;
    use std::sync::OnceLock;

    use super::{colors, symbols};
    use crossterm::style::{StyledContent, Stylize};

    fn paint(content: StyledContent<String>) -> String {
        static TERMINAL: OnceLock<bool> = OnceLock::new();
        let colored = *TERMINAL.get_or_init(|| std::io::stdout().is_terminal());
        render(content, colored)
    }

    fn render(content: StyledContent<String>, colored: bool) -> String {
        if colored {
            content.to_string()
        } else {
            content.content().clone()
        }
    }

    /// Section header, e.g. `==== Firewall (nftables) Configuration ====`.
    pub fn header(title: &str) -> String {
        paint(format!("==== {} ====", title).with(colors::ACCENT).bold())
    }

    /// Full-width banner rule.
    pub fn rule(width: usize) -> String {
        paint(symbols::RULE.repeat(width).with(colors::TEXT_SECONDARY))
    }

    pub fn question(text: &str) -> String {
        paint(text.to_string().bold())
    }

    pub fn success(text: &str) -> String {
        paint(format!("{} {}", symbols::SUCCESS, text).with(colors::SUCCESS))
    }

    pub fn warning(text: &str) -> String {
        paint(format!("{} {}", symbols::WARNING, text).with(colors::WARNING))
    }

    pub fn error(text: &str) -> String {
        paint(
            format!("{} {}", symbols::ERROR, text)
                .with(colors::ERROR)
                .bold(),
        )
    }

    /// Muted hint text.
    pub fn hint(text: &str) -> String {
        paint(text.to_string().with(colors::TEXT_SECONDARY))
    }

}
