//! Text and JSON rendering of catalog items, recipe trees and summaries.

use craftbook_core::{Catalog, Item, ItemId, RecipeTree, Requirements};
use serde::Serialize;
use std::fmt::Write;

/// Parse a user-entered multiplier the lenient way: the longest numeric
/// prefix is used. Unparsable, negative or non-finite input gives `None` so
/// the caller can fall back to its default.
pub fn parse_multiplier(text: &str) -> Option<f64> {
    let text = text.trim();
    let candidate_len = text
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')))
        .unwrap_or(text.len());

    (1..=candidate_len)
        .rev()
        .find_map(|len| text[..len].parse::<f64>().ok())
        .filter(|value| value.is_finite() && *value >= 0.0)
}

/// Format a quantity with at most three decimals, trailing zeros trimmed
/// and thousands separated by commas.
pub fn format_quantity(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let text = format!("{rounded:.3}");

    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", int_part),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let frac_part = frac_part.trim_end_matches('0');
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}

/// One line per matching item: the id and its recipe's job, if any.
pub fn render_list<'a>(items: impl IntoIterator<Item = &'a Item>, filter: Option<&str>) -> String {
    let mut out = String::new();
    let mut count = 0;
    for item in items {
        count += 1;
        match item.recipe.as_ref().and_then(|r| r.job_label()) {
            Some(job) => {
                let _ = writeln!(out, "{} ({job})", item.id);
            }
            None => {
                let _ = writeln!(out, "{}", item.id);
            }
        }
    }
    if count == 0 {
        match filter {
            Some(filter) => {
                let _ = writeln!(out, "No items match '{filter}'.");
            }
            None => out.push_str("The catalog is empty.\n"),
        }
    }
    out
}

/// Item details followed by its recipe tree.
pub fn render_item(item: &Item, catalog: &Catalog, tree: &RecipeTree) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Item: {}", item.id);
    let _ = writeln!(out, "Rarity: {}", item.rarity.as_deref().unwrap_or("-"));
    match item.level {
        Some(level) => {
            let _ = writeln!(out, "Level: {level}");
        }
        None => out.push_str("Level: -\n"),
    }
    let _ = writeln!(out, "Category: {}", item.category.as_deref().unwrap_or("-"));
    if item.image.is_some() {
        out.push_str("Image: embedded PNG\n");
    } else {
        let _ = writeln!(out, "Image: {}", catalog.image_uri(item.id.as_str()));
    }

    out.push_str("\nStats:\n");
    if item.stats.is_empty() {
        out.push_str("  no stats available\n");
    }
    for (name, range) in &item.stats {
        let _ = writeln!(
            out,
            "  {name} : {} to {}",
            format_quantity(range.min),
            format_quantity(range.max)
        );
    }

    let _ = writeln!(out, "\nRecipe (x{}):", format_quantity(tree.multiplier));
    if tree.is_empty() {
        out.push_str("  no recipe\n");
    }
    render_tree_into(&mut out, tree);
    out
}

fn render_tree_into(out: &mut String, tree: &RecipeTree) {
    for (depth, node) in tree.walk() {
        let indent = "  ".repeat(depth + 1);
        let _ = write!(out, "{indent}x{} {}", format_quantity(node.quantity), node.id);
        if node.has_recipe {
            let _ = write!(out, " ({})", node.job.as_deref().unwrap_or("N/A"));
        }
        if node.cyclic {
            out.push_str(" [cycle]");
        }
        out.push('\n');
    }
}

/// Two sections, each sorted by id.
pub fn render_summary(root: &ItemId, multiplier: f64, requirements: &Requirements) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Resources for x{} {root}:",
        format_quantity(multiplier)
    );
    if requirements.is_empty() {
        out.push_str("No resources needed for this craft.\n");
        return out;
    }

    let sections = [
        ("To craft", requirements.sorted_craft()),
        ("Base resources", requirements.sorted_raw()),
    ];
    for (title, entries) in sections {
        let _ = writeln!(out, "\n{title}:");
        if entries.is_empty() {
            out.push_str("  (none)\n");
            continue;
        }
        let quantities: Vec<String> =
            entries.iter().map(|(_, qty)| format_quantity(*qty)).collect();
        let width = quantities.iter().map(String::len).max().unwrap_or(0);
        for ((id, _), qty) in entries.iter().zip(&quantities) {
            let _ = writeln!(out, "  x{qty:>width$}  {id}");
        }
    }
    out
}

#[derive(Debug, Serialize)]
pub struct SummaryReport {
    pub id: String,
    pub multiplier: f64,
    pub craft: Vec<SummaryEntry>,
    pub raw: Vec<SummaryEntry>,
}

#[derive(Debug, Serialize)]
pub struct SummaryEntry {
    pub id: String,
    pub quantity: f64,
    pub image: String,
}

impl SummaryReport {
    pub fn new(
        root: &ItemId,
        multiplier: f64,
        requirements: &Requirements,
        catalog: &Catalog,
    ) -> Self {
        let entries = |bucket: Vec<(&ItemId, f64)>| -> Vec<SummaryEntry> {
            bucket
                .into_iter()
                .map(|(id, quantity)| SummaryEntry {
                    id: id.to_string(),
                    quantity,
                    image: catalog.image_uri(id.as_str()),
                })
                .collect()
        };
        Self {
            id: root.to_string(),
            multiplier,
            craft: entries(requirements.sorted_craft()),
            raw: entries(requirements.sorted_raw()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use craftbook_core::test_utils::*;
    use craftbook_core::{ExpandPolicy, aggregate};

    #[test]
    fn parse_multiplier_accepts_numeric_prefix() {
        assert_eq!(parse_multiplier("5"), Some(5.0));
        assert_eq!(parse_multiplier(" 2.5 "), Some(2.5));
        assert_eq!(parse_multiplier("3units"), Some(3.0));
        assert_eq!(parse_multiplier("1e2"), Some(100.0));
        assert_eq!(parse_multiplier(".5"), Some(0.5));
        assert_eq!(parse_multiplier("0"), Some(0.0));
    }

    #[test]
    fn parse_multiplier_rejects_unusable_input() {
        assert_eq!(parse_multiplier(""), None);
        assert_eq!(parse_multiplier("abc"), None);
        assert_eq!(parse_multiplier("-4"), None);
        assert_eq!(parse_multiplier("inf"), None);
        assert_eq!(parse_multiplier("1e999"), None);
    }

    #[test]
    fn format_quantity_trims_and_groups() {
        assert_eq!(format_quantity(6.0), "6");
        assert_eq!(format_quantity(0.5), "0.5");
        assert_eq!(format_quantity(1234.0), "1,234");
        assert_eq!(format_quantity(12345.5), "12,345.5");
        assert_eq!(format_quantity(1234567.125), "1,234,567.125");
        assert_eq!(format_quantity(1.0 / 3.0), "0.333");
        assert_eq!(format_quantity(2.0004), "2");
        assert_eq!(format_quantity(-0.0001), "0");
        assert_eq!(format_quantity(-1500.25), "-1,500.25");
    }

    #[test]
    fn list_shows_jobs_and_empty_matches() {
        let catalog = workshop_catalog();
        let out = render_list(catalog.search("ingot"), Some("ingot"));
        assert_eq!(out, "ingot (SMITH)\n");

        let out = render_list(catalog.search("diamond"), Some("diamond"));
        assert_eq!(out, "No items match 'diamond'.\n");

        let out = render_list(catalog.search("coal"), None);
        assert_eq!(out, "coal\n");
    }

    #[test]
    fn item_view_lists_metadata_stats_and_tree() {
        let catalog = workshop_catalog();
        let sword = catalog.find_by_id("sword").unwrap();
        let tree = RecipeTree::expand(sword, 2.0, &catalog, &ExpandPolicy::collapsed());

        let out = render_item(sword, &catalog, &tree);
        let expected = "\
Item: sword
Rarity: RARE
Level: 12
Category: WEAPON
Image: ./img/item-vanilla/sword.png

Stats:
  damage : 8 to 14
  speed : 1.2 to 1.2

Recipe (x2):
  x2 ingot (SMITH)
  x2 hilt (CARPENTER)
";
        assert_eq!(out, expected);
    }

    #[test]
    fn item_view_without_recipe_or_stats() {
        let catalog = workshop_catalog();
        let coal = catalog.find_by_id("coal").unwrap();
        let tree = RecipeTree::expand(coal, 1.0, &catalog, &ExpandPolicy::collapsed());

        let out = render_item(coal, &catalog, &tree);
        assert!(out.contains("Level: -\n"));
        assert!(out.contains("  no stats available\n"));
        assert!(out.contains("  no recipe\n"));
    }

    #[test]
    fn tree_marks_unknown_jobs_and_cycles() {
        let catalog = catalog_of([
            crafted("egg", "COOK", &[("chicken", 1.0), ("shell", 1.0)]),
            crafted("chicken", "COOK", &[("egg", 2.0)]),
            crafted("shell", "", &[("chalk", 1.0)]),
        ]);
        let egg = catalog.find_by_id("egg").unwrap();
        let tree = RecipeTree::expand(egg, 1.0, &catalog, &ExpandPolicy::crafting());

        let mut out = String::new();
        render_tree_into(&mut out, &tree);
        assert_eq!(
            out,
            "  x1 chicken (COOK)\n    x2 egg (COOK) [cycle]\n  x1 shell (N/A)\n    x1 chalk\n"
        );
    }

    #[test]
    fn summary_sorts_and_aligns() {
        let catalog = workshop_catalog();
        let sword = catalog.find_by_id("sword").unwrap();
        let req = aggregate(sword, 1000.0, &catalog).unwrap();

        let out = render_summary(&sword.id, 1000.0, &req);
        let expected = "\
Resources for x1,000 sword:

To craft:
  x1,000  hilt
  x2,000  ingot

Base resources:
  x2,000  coal
  x6,000  ore
  x2,000  plank
";
        assert_eq!(out, expected);
    }

    #[test]
    fn summary_for_item_without_recipe() {
        let req = Requirements::default();
        let out = render_summary(&ItemId::from("coal"), 1.0, &req);
        assert_eq!(out, "Resources for x1 coal:\nNo resources needed for this craft.\n");
    }

    #[test]
    fn summary_report_serializes_sorted_entries() {
        let catalog = workshop_catalog();
        let sword = catalog.find_by_id("sword").unwrap();
        let req = aggregate(sword, 1.0, &catalog).unwrap();

        let report = SummaryReport::new(&sword.id, 1.0, &req, &catalog);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["id"], "sword");
        assert_eq!(json["craft"][0]["id"], "hilt");
        assert_eq!(json["raw"][0]["id"], "coal");
        assert_eq!(json["raw"][0]["quantity"], 2.0);
        assert_eq!(json["raw"][0]["image"], "./img/item-vanilla/coal.png");
    }
}
