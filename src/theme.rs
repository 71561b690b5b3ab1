//! Dashboard colours: the KinetiFi neon palette, with hex overrides from
//! the `[theme]` table of config.toml

use ratatui::style::Color;

use crate::config::ThemeOverrides;

/// Theme colors for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    pub accent: Color,        // Active borders, highlights, chart line
    pub accent_alt: Color,    // Secondary accent (purple)
    pub danger: Color,        // Losses, errors, high risk
    pub success: Color,       // Gains, healthy positions, low risk
    pub warning: Color,       // Medium risk, pending transactions
    pub text: Color,
    pub text_dim: Color,
    pub bg: Color,
    pub bg_selected: Color,
    pub inactive: Color,      // Inactive borders
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Rgb(0, 212, 255),      // #00D4FF
            accent_alt: Color::Rgb(139, 92, 246), // #8B5CF6
            danger: Color::Rgb(255, 71, 87),      // #FF4757
            success: Color::Rgb(0, 255, 163),     // #00FFA3
            warning: Color::Rgb(255, 184, 0),     // #FFB800
            text: Color::Rgb(230, 237, 243),
            text_dim: Color::Rgb(125, 133, 144),
            bg: Color::Rgb(10, 14, 23),
            bg_selected: Color::Rgb(30, 41, 59),
            inactive: Color::Rgb(51, 65, 85),
        }
    }
}

impl Theme {
    /// Default palette with any valid overrides applied. Bad hex values are
    /// logged and ignored.
    pub fn load(overrides: &ThemeOverrides) -> Self {
        let mut theme = Self::default();
        let slots: [(&str, &Option<String>, &mut Color); 6] = [
            ("accent", &overrides.accent, &mut theme.accent),
            ("success", &overrides.success, &mut theme.success),
            ("warning", &overrides.warning, &mut theme.warning),
            ("danger", &overrides.danger, &mut theme.danger),
            ("text", &overrides.text, &mut theme.text),
            ("background", &overrides.background, &mut theme.bg),
        ];

        for (name, value, slot) in slots {
            let Some(value) = value else { continue };
            match parse_hex_color(value) {
                Some(color) => *slot = color,
                None => tracing::warn!("Ignoring invalid theme colour {} = {:?}", name, value),
            }
        }

        theme
    }
}

/// Parse a hex color string (#RRGGBB or #RGB)
pub fn parse_hex_color(s: &str) -> Option<Color> {
    let s = s.trim().trim_start_matches('#');
    if !s.is_ascii() {
        return None;
    }

    if s.len() == 6 {
        let r = u8::from_str_radix(&s[0..2], 16).ok()?;
        let g = u8::from_str_radix(&s[2..4], 16).ok()?;
        let b = u8::from_str_radix(&s[4..6], 16).ok()?;
        Some(Color::Rgb(r, g, b))
    } else if s.len() == 3 {
        let r = u8::from_str_radix(&s[0..1], 16).ok()? * 17;
        let g = u8::from_str_radix(&s[1..2], 16).ok()? * 17;
        let b = u8::from_str_radix(&s[2..3], 16).ok()? * 17;
        Some(Color::Rgb(r, g, b))
    } else {
        None
    }
}

/// Fixture colours such as token brand colours; unparsable values fall back
/// to the default text colour
pub fn hex_or(s: &str, fallback: Color) -> Color {
    parse_hex_color(s).unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#00D4FF"), Some(Color::Rgb(0, 212, 255)));
        assert_eq!(parse_hex_color("fff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
        assert_eq!(parse_hex_color("#ééé"), None);
    }

    #[test]
    fn test_overrides_apply() {
        let overrides = ThemeOverrides {
            accent: Some("#FF00AA".to_string()),
            danger: Some("not-a-colour".to_string()),
            background: Some("#000".to_string()),
            ..ThemeOverrides::default()
        };
        let theme = Theme::load(&overrides);

        assert_eq!(theme.accent, Color::Rgb(255, 0, 170));
        assert_eq!(theme.danger, Theme::default().danger);
        assert_eq!(theme.bg, Color::Rgb(0, 0, 0));
    }
}
