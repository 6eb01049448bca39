// Appearance preferences.
// Visual theme and font settings, persisted next to likes and bookmarks.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

use crate::cache::store;
use crate::error::Result;

pub const DEFAULT_QUOTE_FONT: FontKey = FontKey::KottaOne;
pub const DEFAULT_AUTHOR_FONT: FontKey = FontKey::PlayfairDisplay;

/// Card colour scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualTheme {
    #[default]
    Black,
    White,
}

impl VisualTheme {
    /// Only "black" selects the black theme; any other name is white.
    pub fn from_name(name: &str) -> Self {
        if name == "black" {
            VisualTheme::Black
        } else {
            VisualTheme::White
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            VisualTheme::Black => "black",
            VisualTheme::White => "white",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            VisualTheme::Black => VisualTheme::White,
            VisualTheme::White => VisualTheme::Black,
        }
    }

    /// Background and text colours as packed ARGB.
    pub fn colors(&self) -> (u32, u32) {
        match self {
            VisualTheme::Black => (0xFF00_0000, 0xFFFF_FFFF),
            VisualTheme::White => (0xFFFF_FFFF, 0xFF00_0000),
        }
    }
}

impl<'de> Deserialize<'de> for VisualTheme {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(VisualTheme::from_name(&name))
    }
}

/// Font choice for quote text or author line, stored by key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontKey {
    KottaOne,
    PlayfairDisplay,
    DroidSans,
    Default,
    SansSerif,
    Serif,
    Monospace,
    Cursive,
    Fantasy,
}

/// Generic family a font key renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFamily {
    Bundled(FontKey),
    Default,
    SansSerif,
    Serif,
    Monospace,
    Cursive,
}

impl FontKey {
    pub const ALL: [FontKey; 9] = [
        FontKey::KottaOne,
        FontKey::PlayfairDisplay,
        FontKey::DroidSans,
        FontKey::Default,
        FontKey::SansSerif,
        FontKey::Serif,
        FontKey::Monospace,
        FontKey::Cursive,
        FontKey::Fantasy,
    ];

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|font| font.key() == key)
    }

    pub fn key(&self) -> &'static str {
        match self {
            FontKey::KottaOne => "kotta_one",
            FontKey::PlayfairDisplay => "playfair_display",
            FontKey::DroidSans => "droid_sans",
            FontKey::Default => "default",
            FontKey::SansSerif => "sans_serif",
            FontKey::Serif => "serif",
            FontKey::Monospace => "monospace",
            FontKey::Cursive => "cursive",
            FontKey::Fantasy => "fantasy",
        }
    }

    /// Name shown in the settings list.
    pub fn display_name(&self) -> &'static str {
        match self {
            FontKey::KottaOne => "Kotta One",
            FontKey::PlayfairDisplay => "Playfair Display",
            FontKey::DroidSans => "Droid Sans",
            FontKey::Default => "Default",
            FontKey::SansSerif => "Sans Serif",
            FontKey::Serif => "Serif",
            FontKey::Monospace => "Monospace",
            FontKey::Cursive => "Cursive",
            FontKey::Fantasy => "Fantasy",
        }
    }

    /// There is no fantasy family to render with, so it shows as sans serif.
    pub fn family(&self) -> FontFamily {
        match self {
            FontKey::KottaOne | FontKey::PlayfairDisplay | FontKey::DroidSans => {
                FontFamily::Bundled(*self)
            }
            FontKey::Default => FontFamily::Default,
            FontKey::SansSerif | FontKey::Fantasy => FontFamily::SansSerif,
            FontKey::Serif => FontFamily::Serif,
            FontKey::Monospace => FontFamily::Monospace,
            FontKey::Cursive => FontFamily::Cursive,
        }
    }
}

impl Serialize for FontKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

fn quote_font_or_default<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<FontKey, D::Error> {
    let key = String::deserialize(deserializer)?;
    Ok(FontKey::from_key(&key).unwrap_or(DEFAULT_QUOTE_FONT))
}

fn author_font_or_default<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<FontKey, D::Error> {
    let key = String::deserialize(deserializer)?;
    Ok(FontKey::from_key(&key).unwrap_or(DEFAULT_AUTHOR_FONT))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Appearance {
    pub theme: VisualTheme,
    #[serde(rename = "quoteFont", deserialize_with = "quote_font_or_default")]
    pub quote_font: FontKey,
    #[serde(rename = "authorFont", deserialize_with = "author_font_or_default")]
    pub author_font: FontKey,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            theme: VisualTheme::default(),
            quote_font: DEFAULT_QUOTE_FONT,
            author_font: DEFAULT_AUTHOR_FONT,
        }
    }
}

impl Appearance {
    /// Load preferences, falling back to defaults when the file is missing or unreadable.
    pub fn load(path: &Path) -> Self {
        match store::read_json::<Appearance>(path) {
            Ok(Some(appearance)) => appearance,
            Ok(None) => Self::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring unreadable appearance file");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        store::write_json(path, self)
    }
}
