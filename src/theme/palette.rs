//! Brand palette and typography.
//!
//! Five families of ten shades, lightest (`_50`) to darkest (`_900`).

use std::io::{self, Write};

use owo_colors::{OwoColorize, Rgb, Style};
use serde::{Deserialize, Serialize};

use super::Paint;

pub const PURPLE_50: Rgb = Rgb(0xa9, 0x80, 0xdb);
pub const PURPLE_100: Rgb = Rgb(0x90, 0x6c, 0xcf);
pub const PURPLE_200: Rgb = Rgb(0x79, 0x58, 0xc3);
pub const PURPLE_300: Rgb = Rgb(0x62, 0x44, 0xb7);
pub const PURPLE_400: Rgb = Rgb(0x4b, 0x30, 0xab);
pub const PURPLE_500: Rgb = Rgb(0x3d, 0x28, 0x96);
pub const PURPLE_600: Rgb = Rgb(0x2f, 0x20, 0x81);
pub const PURPLE_700: Rgb = Rgb(0x21, 0x18, 0x6c);
pub const PURPLE_800: Rgb = Rgb(0x13, 0x10, 0x57);
pub const PURPLE_900: Rgb = Rgb(0x05, 0x08, 0x42);

pub const GREEN_50: Rgb = Rgb(0x80, 0xdb, 0xa9);
pub const GREEN_100: Rgb = Rgb(0x6c, 0xcf, 0x96);
pub const GREEN_200: Rgb = Rgb(0x58, 0xc3, 0x83);
pub const GREEN_300: Rgb = Rgb(0x44, 0xb7, 0x70);
pub const GREEN_400: Rgb = Rgb(0x30, 0xab, 0x5d);
pub const GREEN_500: Rgb = Rgb(0x28, 0x96, 0x4e);
pub const GREEN_600: Rgb = Rgb(0x20, 0x81, 0x3f);
pub const GREEN_700: Rgb = Rgb(0x18, 0x6c, 0x30);
pub const GREEN_800: Rgb = Rgb(0x10, 0x57, 0x21);
pub const GREEN_900: Rgb = Rgb(0x08, 0x42, 0x12);

pub const ORANGE_50: Rgb = Rgb(0xdb, 0xa9, 0x80);
pub const ORANGE_100: Rgb = Rgb(0xcf, 0x96, 0x6c);
pub const ORANGE_200: Rgb = Rgb(0xc3, 0x83, 0x58);
pub const ORANGE_300: Rgb = Rgb(0xb7, 0x70, 0x44);
pub const ORANGE_400: Rgb = Rgb(0xab, 0x5d, 0x30);
pub const ORANGE_500: Rgb = Rgb(0x96, 0x4e, 0x28);
pub const ORANGE_600: Rgb = Rgb(0x81, 0x3f, 0x20);
pub const ORANGE_700: Rgb = Rgb(0x6c, 0x30, 0x18);
pub const ORANGE_800: Rgb = Rgb(0x57, 0x21, 0x10);
pub const ORANGE_900: Rgb = Rgb(0x42, 0x12, 0x08);

pub const RED_50: Rgb = Rgb(0xdb, 0x80, 0x80);
pub const RED_100: Rgb = Rgb(0xcf, 0x6c, 0x6c);
pub const RED_200: Rgb = Rgb(0xc3, 0x58, 0x58);
pub const RED_300: Rgb = Rgb(0xb7, 0x44, 0x44);
pub const RED_400: Rgb = Rgb(0xab, 0x30, 0x30);
pub const RED_500: Rgb = Rgb(0x96, 0x28, 0x28);
pub const RED_600: Rgb = Rgb(0x81, 0x20, 0x20);
pub const RED_700: Rgb = Rgb(0x6c, 0x18, 0x18);
pub const RED_800: Rgb = Rgb(0x57, 0x10, 0x10);
pub const RED_900: Rgb = Rgb(0x42, 0x08, 0x08);

pub const BLUE_50: Rgb = Rgb(0x80, 0xa9, 0xdb);
pub const BLUE_100: Rgb = Rgb(0x6c, 0x96, 0xcf);
pub const BLUE_200: Rgb = Rgb(0x58, 0x83, 0xc3);
pub const BLUE_300: Rgb = Rgb(0x44, 0x70, 0xb7);
pub const BLUE_400: Rgb = Rgb(0x30, 0x5d, 0xab);
pub const BLUE_500: Rgb = Rgb(0x28, 0x4e, 0x96);
pub const BLUE_600: Rgb = Rgb(0x20, 0x3f, 0x81);
pub const BLUE_700: Rgb = Rgb(0x18, 0x30, 0x6c);
pub const BLUE_800: Rgb = Rgb(0x10, 0x21, 0x57);
pub const BLUE_900: Rgb = Rgb(0x08, 0x12, 0x42);

/// Every family in display order, with its name.
pub const FAMILIES: &[(&str, [Rgb; 10])] = &[
    (
        "purple",
        [
            PURPLE_50, PURPLE_100, PURPLE_200, PURPLE_300, PURPLE_400, PURPLE_500, PURPLE_600,
            PURPLE_700, PURPLE_800, PURPLE_900,
        ],
    ),
    (
        "green",
        [
            GREEN_50, GREEN_100, GREEN_200, GREEN_300, GREEN_400, GREEN_500, GREEN_600, GREEN_700,
            GREEN_800, GREEN_900,
        ],
    ),
    (
        "orange",
        [
            ORANGE_50, ORANGE_100, ORANGE_200, ORANGE_300, ORANGE_400, ORANGE_500, ORANGE_600,
            ORANGE_700, ORANGE_800, ORANGE_900,
        ],
    ),
    (
        "red",
        [
            RED_50, RED_100, RED_200, RED_300, RED_400, RED_500, RED_600, RED_700, RED_800,
            RED_900,
        ],
    ),
    (
        "blue",
        [
            BLUE_50, BLUE_100, BLUE_200, BLUE_300, BLUE_400, BLUE_500, BLUE_600, BLUE_700,
            BLUE_800, BLUE_900,
        ],
    ),
];

const SHADE_LABELS: [&str; 10] = ["50", "100", "200", "300", "400", "500", "600", "700", "800", "900"];

/// Terminal background the palette is rendered against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Background {
    Light,
    #[default]
    Dark,
}

/// A color with one variant per terminal background.
#[derive(Debug, Clone, Copy)]
pub struct Adaptive {
    pub light: Rgb,
    pub dark: Rgb,
}

impl Adaptive {
    pub const fn new(light: Rgb, dark: Rgb) -> Self {
        Self { light, dark }
    }

    pub const fn resolve(self, background: Background) -> Rgb {
        match background {
            Background::Light => self.light,
            Background::Dark => self.dark,
        }
    }
}

/// Command and subcommand names.
pub const COMMAND_TEXT: Adaptive = Adaptive::new(PURPLE_400, PURPLE_50);
/// Comment lines in examples.
pub const COMMENT_TEXT: Adaptive = Adaptive::new(GREEN_600, GREEN_50);
/// Environment variable names.
pub const ENV_VAR_TEXT: Adaptive = Adaptive::new(BLUE_400, BLUE_100);
/// Environment variable values, dimmer than the name.
pub const ENV_VAR_VALUE_TEXT: Adaptive = Adaptive::new(BLUE_600, BLUE_300);
/// Flag names.
pub const FLAG_TEXT: Adaptive = Adaptive::new(ORANGE_500, ORANGE_50);
/// Type hints and default values.
pub const FLAG_META_TEXT: Adaptive = Adaptive::new(PURPLE_500, PURPLE_100);
/// Shell operators in examples.
pub const OPERATOR_TEXT: Adaptive = Adaptive::new(RED_500, RED_50);

/// Header backgrounds from H1 (most prominent) to H6.
const HEADING_BACKGROUNDS: [Adaptive; 6] = [
    Adaptive::new(PURPLE_50, PURPLE_200),
    Adaptive::new(PURPLE_100, PURPLE_300),
    Adaptive::new(PURPLE_200, PURPLE_400),
    Adaptive::new(PURPLE_300, PURPLE_500),
    Adaptive::new(PURPLE_400, PURPLE_600),
    Adaptive::new(PURPLE_500, PURPLE_700),
];

/// Header style of the given level, clamped to `1..=6`.
///
/// Bold white text on a purple background, padded by one space.
pub fn heading(level: usize, background: Background) -> Paint {
    let bg = HEADING_BACKGROUNDS[level.clamp(1, 6) - 1].resolve(background);
    Paint::new(
        Style::new()
            .bold()
            .color(Rgb(0xff, 0xff, 0xff))
            .on_color(bg),
    )
    .padded(1)
}

/// Formats a color as `#rrggbb`.
pub fn hex(color: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", color.0, color.1, color.2)
}

/// Writes a swatch grid of every family followed by the heading levels.
pub fn render_swatches(w: &mut dyn Write, background: Background) -> io::Result<()> {
    for (name, shades) in FAMILIES {
        writeln!(w, "{name}")?;
        let blocks: String = shades
            .iter()
            .map(|shade| format!("{}", "        ".on_color(*shade)))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(w, "{blocks}")?;
        let labels: String = SHADE_LABELS
            .iter()
            .map(|label| format!("{label:^8}"))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(w, "{labels}")?;
        writeln!(w)?;
    }

    for level in 1..=6 {
        writeln!(w, "{}", heading(level, background).render(format!("H{level}")))?;
    }
    Ok(())
}
