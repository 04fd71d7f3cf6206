//! Static art and the type badge registry compiled into the binary.

use std::collections::HashMap;

use ratatui::style::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypeIcon {
    pub label: &'static str,
    pub color: Color,
}

const fn icon(label: &'static str, r: u8, g: u8, b: u8) -> TypeIcon {
    TypeIcon {
        label,
        color: Color::Rgb(r, g, b),
    }
}

/// Type name to badge, in the order the type filter cycles through.
pub const TYPE_ICONS: [(&str, TypeIcon); 18] = [
    ("normal", icon("NORMAL", 168, 168, 120)),
    ("fire", icon("FIRE", 240, 128, 48)),
    ("water", icon("WATER", 104, 144, 240)),
    ("grass", icon("GRASS", 120, 200, 80)),
    ("electric", icon("ELECTRIC", 248, 208, 48)),
    ("ice", icon("ICE", 152, 216, 216)),
    ("fighting", icon("FIGHT", 192, 48, 40)),
    ("poison", icon("POISON", 160, 64, 160)),
    ("ground", icon("GROUND", 224, 192, 104)),
    ("flying", icon("FLYING", 168, 144, 240)),
    ("psychic", icon("PSYCHIC", 248, 88, 136)),
    ("bug", icon("BUG", 168, 184, 32)),
    ("rock", icon("ROCK", 184, 160, 56)),
    ("ghost", icon("GHOST", 112, 88, 152)),
    ("dragon", icon("DRAGON", 112, 56, 248)),
    ("dark", icon("DARK", 112, 88, 72)),
    ("steel", icon("STEEL", 184, 184, 208)),
    ("fairy", icon("FAIRY", 238, 153, 172)),
];

/// Resolves type names to badges by exact name.
#[derive(Clone, Debug)]
pub struct TypeIconRegistry {
    icons: HashMap<&'static str, TypeIcon>,
}

impl Default for TypeIconRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TypeIconRegistry {
    pub fn builtin() -> Self {
        Self::from_entries(&TYPE_ICONS)
    }

    pub fn from_entries(entries: &[(&'static str, TypeIcon)]) -> Self {
        Self {
            icons: entries.iter().copied().collect(),
        }
    }

    pub fn resolve(&self, name: &str) -> Option<&TypeIcon> {
        self.icons.get(name)
    }
}

pub fn type_names() -> impl Iterator<Item = &'static str> {
    TYPE_ICONS.iter().map(|(name, _)| *name)
}

/// Shown where artwork is missing or not yet decoded.
pub const PLACEHOLDER_ART: [&str; 7] = [
    "   ▄███████▄   ",
    " ▄██▀▀▀▀▀▀▀██▄ ",
    " ██▄▄▄▄▄▄▄▄▄██ ",
    " ████▀ ◯ ▀████ ",
    " ▀██▄▄▄▄▄▄▄██▀ ",
    "   ▀███████▀   ",
    "               ",
];

pub const EMPTY_STATE_ART: [&str; 5] = [
    "   (\\__/)   ",
    "   ( ;_; )  ",
    "   /  ⌒ \\   ",
    "  (  )_( )  ",
    "            ",
];

/// Loading indicator frames; the ball bounces over four ticks.
pub const LOADER_FRAMES: [u16; 6] = [0, 1, 2, 3, 2, 1];
pub const LOADER_BALL: [&str; 2] = [" ▄█▀█▄ ", " ▀█▄█▀ "];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_exact_names_only() {
        let registry = TypeIconRegistry::builtin();
        assert_eq!(registry.resolve("fire").map(|icon| icon.label), Some("FIRE"));
        assert!(registry.resolve("Fire").is_none());
        assert!(registry.resolve("stellar").is_none());
    }

    #[test]
    fn custom_registry() {
        let registry = TypeIconRegistry::from_entries(&[("shadow", icon("SHADOW", 0, 0, 0))]);
        assert!(registry.resolve("shadow").is_some());
        assert!(registry.resolve("fire").is_none());
    }

    #[test]
    fn type_names_follow_table_order() {
        let names: Vec<_> = type_names().collect();
        assert_eq!(names.first(), Some(&"normal"));
        assert_eq!(names.len(), 18);
    }
}
