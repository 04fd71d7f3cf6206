//! Data shaping for the expanded detail overlay.

use crate::assets::{TypeIcon, TypeIconRegistry};
use crate::format::{capitalize, extract_roman_numerals, or_na, title_case};
use crate::state::{EntryRecord, EvolutionNode};

pub const FEET_PER_HEIGHT_UNIT: f64 = 0.328084;
pub const POUNDS_PER_WEIGHT_UNIT: f64 = 0.220462262;
pub const POKEDEX_URL: &str = "https://www.pokemon.com/us/pokedex/";

/// Fixed upper bound per stat used to scale the bars.
const STAT_MAXIMUMS: [(&str, u16); 6] = [
    ("hp", 255),
    ("attack", 190),
    ("defense", 250),
    ("special-attack", 194),
    ("special-defense", 250),
    ("speed", 200),
];
const FALLBACK_STAT_MAX: u16 = 255;

pub fn pad_dex_number(id: u16) -> String {
    if id < 10 {
        format!("00{id}")
    } else if id < 100 {
        format!("0{id}")
    } else {
        id.to_string()
    }
}

pub fn height_in_feet(height: u16) -> i64 {
    (f64::from(height) * FEET_PER_HEIGHT_UNIT).round() as i64
}

pub fn weight_in_pounds(weight: u16) -> i64 {
    (f64::from(weight) * POUNDS_PER_WEIGHT_UNIT).round() as i64
}

pub fn stat_label(name: &str) -> String {
    match name {
        "hp" => "HP".to_string(),
        "attack" => "ATK".to_string(),
        "defense" => "DEF".to_string(),
        "special-attack" => "SpA".to_string(),
        "special-defense" => "SpD".to_string(),
        "speed" => "SPD".to_string(),
        _ => name.to_ascii_uppercase(),
    }
}

pub fn max_stat(name: &str) -> u16 {
    STAT_MAXIMUMS
        .iter()
        .find(|(stat, _)| *stat == name)
        .map(|(_, max)| *max)
        .unwrap_or(FALLBACK_STAT_MAX)
}

/// `round(100 * base / max)`, clamped to `0..=100`.
pub fn stat_percentage(base: u16, max: u16) -> u16 {
    if max == 0 {
        return 0;
    }
    let percentage = (100.0 * f64::from(base) / f64::from(max)).round();
    percentage.clamp(0.0, 100.0) as u16
}

/// Evolution members to draw: nothing for single-stage chains, and never the
/// record itself.
pub fn evolution_members(record: &EntryRecord) -> Vec<&EvolutionNode> {
    if record.evolution.len() <= 1 {
        return Vec::new();
    }
    record
        .evolution
        .iter()
        .filter(|node| node.name != record.name.en)
        .collect()
}

pub fn external_link(name: &str) -> String {
    format!("{POKEDEX_URL}{name}")
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatRow {
    pub label: String,
    pub base: u16,
    pub percentage: u16,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbilityRow {
    pub slot: String,
    pub name: String,
    pub hidden: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeBadge {
    pub name: String,
    pub icon: Option<TypeIcon>,
}

/// Everything the overlay prints, derived once from a loaded record.
#[derive(Clone, Debug, PartialEq)]
pub struct DetailSheet<'a> {
    pub dex_number: String,
    pub name_en: String,
    pub name_jp: String,
    pub description: String,
    pub link: String,
    pub types: Vec<TypeBadge>,
    pub height: String,
    pub weight: String,
    pub abilities: Vec<AbilityRow>,
    pub evolution: Vec<&'a EvolutionNode>,
    pub region: String,
    pub generation: String,
    pub stats: Vec<StatRow>,
    pub theme: &'a str,
}

impl<'a> DetailSheet<'a> {
    pub fn new(record: &'a EntryRecord, theme: &'a str, icons: &TypeIconRegistry) -> Self {
        Self {
            dex_number: format!("#{}", pad_dex_number(record.id)),
            name_en: title_case(&record.name.en),
            name_jp: or_na(record.name.jp.as_deref()),
            description: or_na(record.description.as_deref()),
            link: external_link(&record.name.en),
            types: record
                .types
                .iter()
                .map(|name| TypeBadge {
                    name: name.clone(),
                    icon: icons.resolve(name).copied(),
                })
                .collect(),
            height: or_na(record.height.map(|height| format!("{} ft", height_in_feet(height)))),
            weight: or_na(
                record
                    .weight
                    .map(|weight| format!("{} lbs", weight_in_pounds(weight))),
            ),
            abilities: record
                .abilities
                .iter()
                .map(|ability| AbilityRow {
                    slot: format!("Slot {}: ", ability.slot),
                    name: title_case(&ability.name),
                    hidden: ability.hidden,
                })
                .collect(),
            evolution: evolution_members(record),
            region: or_na(record.region.as_deref().map(capitalize)),
            generation: or_na(record.generation.as_deref().and_then(extract_roman_numerals)),
            stats: record
                .stats
                .iter()
                .map(|stat| StatRow {
                    label: stat_label(&stat.name),
                    base: stat.base,
                    percentage: stat_percentage(stat.base, max_stat(&stat.name)),
                })
                .collect(),
            theme,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::tests::record;
    use crate::state::{Ability, StatValue};
    use pretty_assertions::assert_eq;

    fn node(name: &str) -> EvolutionNode {
        EvolutionNode {
            name: name.to_string(),
            artwork: Some(format!("https://img/{name}.png")),
        }
    }

    #[test]
    fn pads_ids_to_three_digits() {
        assert_eq!(pad_dex_number(5), "005");
        assert_eq!(pad_dex_number(45), "045");
        assert_eq!(pad_dex_number(145), "145");
        assert_eq!(pad_dex_number(1025), "1025");
    }

    #[test]
    fn converts_units_with_fixed_factors() {
        assert_eq!(height_in_feet(90), 30);
        assert_eq!(weight_in_pounds(69), 15);
        assert_eq!(height_in_feet(7), 2);
        assert_eq!(weight_in_pounds(0), 0);
    }

    #[test]
    fn stat_percentages_use_lookup_table() {
        assert_eq!(max_stat("hp"), 255);
        assert_eq!(max_stat("speed"), 200);
        assert_eq!(max_stat("accuracy"), 255);
        assert_eq!(stat_percentage(45, max_stat("hp")), 18);
        assert_eq!(stat_percentage(100, max_stat("speed")), 50);
        assert_eq!(stat_percentage(255, 200), 100);
        assert_eq!(stat_percentage(10, 0), 0);
    }

    #[test]
    fn stat_labels() {
        assert_eq!(stat_label("special-attack"), "SpA");
        assert_eq!(stat_label("hp"), "HP");
        assert_eq!(stat_label("evasion"), "EVASION");
    }

    #[test]
    fn single_stage_chain_draws_nothing() {
        let mut entry = record("tauros", false);
        entry.evolution = vec![node("tauros")];
        assert!(evolution_members(&entry).is_empty());
    }

    #[test]
    fn chain_skips_self_and_keeps_order() {
        let mut entry = record("ivysaur", false);
        entry.evolution = vec![node("bulbasaur"), node("ivysaur"), node("venusaur")];
        let names: Vec<_> = evolution_members(&entry)
            .into_iter()
            .map(|node| node.name.as_str())
            .collect();
        assert_eq!(names, vec!["bulbasaur", "venusaur"]);
    }

    #[test]
    fn sheet_formats_every_block() {
        let mut entry = record("pikachu", false);
        entry.height = Some(90);
        entry.weight = Some(69);
        entry.types = vec!["electric".into(), "stellar".into()];
        entry.abilities = vec![
            Ability {
                name: "static".into(),
                slot: 1,
                hidden: false,
            },
            Ability {
                name: "lightning-rod".into(),
                slot: 3,
                hidden: true,
            },
        ];
        entry.stats = vec![StatValue {
            name: "speed".into(),
            base: 90,
        }];
        let registry = TypeIconRegistry::builtin();
        let sheet = DetailSheet::new(&entry, "yellow", &registry);

        assert_eq!(sheet.dex_number, "#025");
        assert_eq!(sheet.name_en, "Pikachu");
        assert_eq!(sheet.link, "https://www.pokemon.com/us/pokedex/pikachu");
        assert_eq!(sheet.height, "30 ft");
        assert_eq!(sheet.weight, "15 lbs");
        assert_eq!(sheet.region, "Kanto");
        assert_eq!(sheet.generation, "I");
        assert!(sheet.types[0].icon.is_some());
        assert!(sheet.types[1].icon.is_none());
        assert_eq!(sheet.abilities[1].slot, "Slot 3: ");
        assert_eq!(sheet.abilities[1].name, "Lightning Rod");
        assert_eq!(
            sheet.stats,
            vec![StatRow {
                label: "SPD".into(),
                base: 90,
                percentage: 45,
            }]
        );
    }

    #[test]
    fn sheet_falls_back_for_missing_fields() {
        let mut entry = record("missingno", false);
        entry.height = None;
        entry.weight = None;
        entry.region = None;
        entry.generation = None;
        entry.description = None;
        entry.name.jp = None;
        let sheet = DetailSheet::new(&entry, "default", &TypeIconRegistry::builtin());
        assert_eq!(sheet.height, "N/A");
        assert_eq!(sheet.weight, "N/A");
        assert_eq!(sheet.region, "N/A");
        assert_eq!(sheet.generation, "N/A");
        assert_eq!(sheet.description, "N/A");
        assert_eq!(sheet.name_jp, "N/A");
    }
}
