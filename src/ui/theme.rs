//! # Theme System
//!
//! Centralized colors for the dashboard.
//!
//! ## Overview
//!
//! Modules never pick concrete colors for their frames. They hand back a
//! semantic [`Tone`] and the renderer resolves it through a [`Palette`]: the
//! active [`Theme`] plus the profile's accent color.
//!
//! ## Built-in Themes
//!
//! - **Catppuccin Mocha** (default) - warm, dark pastel theme
//! - **Catppuccin Macchiato** - medium-dark pastel theme
//! - **Dracula** - dark theme with vivid colors
//! - **Nord** - arctic, north-bluish color palette
//! - **Gruvbox Dark** - retro groove color scheme

use ratatui::style::Color;
use std::str::FromStr;

/// All colors used by the dashboard, grouped by semantic role.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Human-readable name, matched case-insensitively by the `theme` key.
    pub name: &'static str,

    // -- Background colors --
    pub bg: Color,

    // -- Foreground / text colors --
    /// Primary text color.
    pub fg: Color,
    /// Muted text (hints, separators, placeholder titles).
    pub fg_dim: Color,
    /// Frame color for panels that do not ask for anything else.
    pub border: Color,

    // -- Accent / status colors --
    /// Fallback accent when the profile color cannot be parsed.
    pub accent: Color,
    pub ok: Color,
    pub warn: Color,
    pub alert: Color,
}

impl Theme {
    /// Return the list of all built-in themes.
    pub fn all() -> &'static [Theme] {
        &BUILT_IN_THEMES
    }

    /// Find a built-in theme by name (case-insensitive).
    pub fn by_name(name: &str) -> Option<&'static Theme> {
        BUILT_IN_THEMES
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Return the default theme (Catppuccin Mocha).
    pub fn default_theme() -> &'static Theme {
        &BUILT_IN_THEMES[0]
    }
}

/// Semantic color hint carried by a content block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// The profile accent color.
    Accent,
    /// Regular text color.
    Text,
    /// Neutral panel frame.
    Neutral,
    /// Muted, used for placeholders.
    Dim,
    Ok,
    Warn,
    Alert,
    /// An explicit color, bypassing the theme.
    Color(Color),
}

/// A theme with the profile accent applied.
#[derive(Debug, Clone)]
pub struct Palette {
    pub theme: &'static Theme,
    pub accent: Color,
}

impl Palette {
    /// Build a palette from an optional theme name and an accent color name.
    /// Unknown themes fall back to the default; unparsable accents fall back to
    /// bright cyan.
    pub fn new(theme: Option<&str>, accent: &str) -> Self {
        let theme = theme
            .and_then(Theme::by_name)
            .unwrap_or_else(Theme::default_theme);
        Self {
            theme,
            accent: parse_color(accent).unwrap_or(Color::LightCyan),
        }
    }

    /// Resolve a tone to a concrete color.
    pub fn color(&self, tone: Tone) -> Color {
        match tone {
            Tone::Accent => self.accent,
            Tone::Text => self.theme.fg,
            Tone::Neutral => self.theme.border,
            Tone::Dim => self.theme.fg_dim,
            Tone::Ok => self.theme.ok,
            Tone::Warn => self.theme.warn,
            Tone::Alert => self.theme.alert,
            Tone::Color(color) => color,
        }
    }
}

/// Parse a color name as written in profiles.
///
/// Accepts ratatui's names (`lightcyan`, `dark-gray`, `#ff8800`, `42`) and
/// the `bright_*` / `grey` spellings used by most terminal palettes.
pub fn parse_color(name: &str) -> Option<Color> {
    let normalized = name
        .trim()
        .to_lowercase()
        .replace('_', "-")
        .replace("bright-", "light-")
        .replace("grey", "gray");
    if normalized.is_empty() {
        return None;
    }
    Color::from_str(&normalized).ok()
}

// ---------------------------------------------------------------------------
// Built-in theme definitions
// ---------------------------------------------------------------------------

static BUILT_IN_THEMES: [Theme; 5] = [
    // 0 - Catppuccin Mocha (default)
    Theme {
        name: "Catppuccin Mocha",
        bg: Color::Rgb(30, 30, 46),          // base
        fg: Color::Rgb(205, 214, 244),       // text
        fg_dim: Color::Rgb(108, 112, 134),   // overlay0
        border: Color::Rgb(69, 71, 90),      // surface1
        accent: Color::Rgb(137, 180, 250),   // blue
        ok: Color::Rgb(166, 227, 161),       // green
        warn: Color::Rgb(249, 226, 175),     // yellow
        alert: Color::Rgb(243, 139, 168),    // red
    },
    // 1 - Catppuccin Macchiato
    Theme {
        name: "Catppuccin Macchiato",
        bg: Color::Rgb(36, 39, 58),          // base
        fg: Color::Rgb(202, 211, 245),       // text
        fg_dim: Color::Rgb(110, 115, 141),   // overlay0
        border: Color::Rgb(73, 77, 100),     // surface1
        accent: Color::Rgb(138, 173, 244),   // blue
        ok: Color::Rgb(166, 218, 149),       // green
        warn: Color::Rgb(238, 212, 159),     // yellow
        alert: Color::Rgb(237, 135, 150),    // red
    },
    // 2 - Dracula
    Theme {
        name: "Dracula",
        bg: Color::Rgb(40, 42, 54),
        fg: Color::Rgb(248, 248, 242),
        fg_dim: Color::Rgb(98, 114, 164),
        border: Color::Rgb(68, 71, 90),
        accent: Color::Rgb(139, 233, 253), // cyan
        ok: Color::Rgb(80, 250, 123),
        warn: Color::Rgb(241, 250, 140),
        alert: Color::Rgb(255, 85, 85),
    },
    // 3 - Nord
    Theme {
        name: "Nord",
        bg: Color::Rgb(46, 52, 64),
        fg: Color::Rgb(216, 222, 233),
        fg_dim: Color::Rgb(76, 86, 106),
        border: Color::Rgb(67, 76, 94),
        accent: Color::Rgb(136, 192, 208), // frost
        ok: Color::Rgb(163, 190, 140),
        warn: Color::Rgb(235, 203, 139),
        alert: Color::Rgb(191, 97, 106),
    },
    // 4 - Gruvbox Dark
    Theme {
        name: "Gruvbox Dark",
        bg: Color::Rgb(40, 40, 40),
        fg: Color::Rgb(235, 219, 178),
        fg_dim: Color::Rgb(146, 131, 116),
        border: Color::Rgb(80, 73, 69),
        accent: Color::Rgb(131, 165, 152), // blue
        ok: Color::Rgb(184, 187, 38),
        warn: Color::Rgb(250, 189, 47),
        alert: Color::Rgb(251, 73, 52),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    /// Convert a catppuccin color to a ratatui Color via its RGB values.
    fn ctp(color: catppuccin::Color) -> Color {
        Color::Rgb(color.rgb.r, color.rgb.g, color.rgb.b)
    }

    #[test]
    fn test_default_is_mocha() {
        assert_eq!(Theme::default_theme().name, "Catppuccin Mocha");
    }

    #[test]
    fn test_by_name_case_insensitive() {
        assert!(Theme::by_name("catppuccin mocha").is_some());
        assert!(Theme::by_name("NORD").is_some());
        assert!(Theme::by_name("nonexistent").is_none());
    }

    #[test]
    fn test_catppuccin_mocha_matches_palette() {
        let mocha = catppuccin::PALETTE.mocha.colors;
        let theme = Theme::default_theme();
        assert_eq!(theme.bg, ctp(mocha.base));
        assert_eq!(theme.fg, ctp(mocha.text));
        assert_eq!(theme.fg_dim, ctp(mocha.overlay0));
        assert_eq!(theme.border, ctp(mocha.surface1));
        assert_eq!(theme.ok, ctp(mocha.green));
        assert_eq!(theme.warn, ctp(mocha.yellow));
        assert_eq!(theme.alert, ctp(mocha.red));
    }

    #[test]
    fn test_catppuccin_macchiato_matches_palette() {
        let macchiato = catppuccin::PALETTE.macchiato.colors;
        let theme = Theme::by_name("Catppuccin Macchiato").expect("theme exists");
        assert_eq!(theme.bg, ctp(macchiato.base));
        assert_eq!(theme.fg, ctp(macchiato.text));
        assert_eq!(theme.accent, ctp(macchiato.blue));
    }

    #[test]
    fn test_all_themes_have_distinct_names() {
        let names: Vec<&str> = Theme::all().iter().map(|t| t.name).collect();
        let mut unique = names.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(names.len(), unique.len(), "duplicate theme names found");
    }

    #[test]
    fn test_parse_color_names() {
        assert_eq!(parse_color("bright_cyan"), Some(Color::LightCyan));
        assert_eq!(parse_color("magenta"), Some(Color::Magenta));
        assert_eq!(parse_color("dark_grey"), Some(Color::DarkGray));
        assert_eq!(parse_color("#ff8800"), Some(Color::Rgb(255, 136, 0)));
        assert_eq!(parse_color(""), None);
        assert_eq!(parse_color("not-a-color"), None);
    }

    #[test]
    fn test_palette_resolves_tones() {
        let palette = Palette::new(Some("nord"), "magenta");
        let nord = Theme::by_name("Nord").expect("theme exists");
        assert_eq!(palette.color(Tone::Accent), Color::Magenta);
        assert_eq!(palette.color(Tone::Alert), nord.alert);
        assert_eq!(palette.color(Tone::Dim), nord.fg_dim);
        assert_eq!(palette.color(Tone::Color(Color::Red)), Color::Red);
    }

    #[test]
    fn test_palette_falls_back_on_bad_input() {
        let palette = Palette::new(Some("unknown"), "sparkly");
        assert_eq!(palette.theme.name, "Catppuccin Mocha");
        assert_eq!(palette.accent, Color::LightCyan);
    }
}
