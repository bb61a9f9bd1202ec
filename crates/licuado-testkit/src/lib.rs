// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use licuado_app::{Catalog, Ingredient, Recipe, RecipeIngredient, Tag};
use licuado_catalog::catalog_from_raw;

/// Raw JSON fixtures in the exact wire shape the catalog endpoints serve.
/// The sample deliberately includes a recipe referencing an ingredient and a
/// tag that are absent from their catalogs, so placeholder synthesis stays
/// covered by anything built on these fixtures.
pub const SAMPLE_RECIPES_JSON: &str = r#"[
  {
    "id": "green-machine",
    "name": "Green Machine",
    "description": "Earthy greens rounded out with sweet mango.",
    "ingredients": [
      {"name": "Spinach", "amount": "2", "unit": "cups"},
      {"name": "Mango", "amount": "1", "unit": "cup"},
      {"name": "Almond Milk", "amount": "1", "unit": "cup"}
    ],
    "proTips": ["Blend the spinach with the liquid first for a smoother texture."],
    "tags": ["Green", "Breakfast"]
  },
  {
    "id": "berry-blast",
    "name": "Berry Blast",
    "description": "Tart berries with a honey finish.",
    "ingredients": [
      {"name": "Strawberry", "amount": "8", "unit": "pieces"},
      {"name": "Blueberry", "amount": "1", "unit": "cup"},
      {"name": "Honey", "amount": "1", "unit": "tbsp"},
      {"name": "Greek Yogurt", "amount": "0.5", "unit": "cup"}
    ],
    "proTips": ["Frozen berries make it extra thick."],
    "tags": ["Breakfast"]
  },
  {
    "id": "tropical-sunrise",
    "name": "Tropical Sunrise",
    "description": "Pineapple and mango over banana.",
    "ingredients": [
      {"name": "Pineapple", "amount": "1", "unit": "cup"},
      {"name": "Mango", "amount": "1", "unit": "cup"},
      {"name": "Banana", "amount": "1", "unit": "piece"}
    ],
    "proTips": [],
    "tags": ["Tropical"]
  },
  {
    "id": "protein-punch",
    "name": "Protein Punch",
    "description": "Peanut butter and banana with a mystery booster.",
    "ingredients": [
      {"name": "Peanut Butter", "amount": "2", "unit": "tbsp"},
      {"name": "Banana", "amount": "1", "unit": "piece"},
      {"name": "Maca Powder", "amount": "1", "unit": "tsp"}
    ],
    "proTips": ["Add the powder last to avoid clumps."],
    "tags": ["Protein"]
  }
]"#;

pub const SAMPLE_INGREDIENTS_JSON: &str = r#"[
  {"name": "Banana", "emoji": "🍌"},
  {"name": "Mango", "emoji": "🥭"},
  {"name": "Spinach", "emoji": "🥬"},
  {"name": "Kale", "emoji": "🥬"},
  {"name": "Strawberry", "emoji": "🍓"},
  {"name": "Blueberry", "emoji": "🫐"},
  {"name": "Pineapple", "emoji": "🍍"},
  {"name": "Greek Yogurt", "emoji": "🥛"},
  {"name": "Almond Milk", "emoji": "🥛"},
  {"name": "Peanut Butter", "emoji": "🥜"},
  {"name": "Chia Seeds", "emoji": "🌱"},
  {"name": "Honey", "emoji": "🍯"}
]"#;

pub const SAMPLE_TAGS_JSON: &str = r#"[
  {"name": "Breakfast", "color": "yellow"},
  {"name": "Green", "color": "green"},
  {"name": "Protein", "color": "purple"}
]"#;

/// Deterministic catalog built through the real wire-conversion path.
pub fn sample_catalog() -> Result<Catalog> {
    catalog_from_raw(
        SAMPLE_RECIPES_JSON,
        SAMPLE_INGREDIENTS_JSON,
        SAMPLE_TAGS_JSON,
    )
}

pub fn ingredient(name: &str, emoji: &str) -> Ingredient {
    Ingredient {
        name: name.to_owned(),
        emoji: emoji.to_owned(),
    }
}

pub fn tag(name: &str, color: &str) -> Tag {
    Tag {
        name: name.to_owned(),
        color: color.to_owned(),
    }
}

/// Minimal recipe whose ingredient lines carry the given names, for tests
/// that only care about matching.
pub fn recipe_with_ingredients(id: &str, name: &str, ingredient_names: &[&str]) -> Recipe {
    Recipe {
        id: id.to_owned(),
        name: name.to_owned(),
        description: String::new(),
        ingredients: ingredient_names
            .iter()
            .map(|ingredient_name| RecipeIngredient {
                ingredient: ingredient(ingredient_name, "🍹"),
                amount: "1".to_owned(),
                unit: "cup".to_owned(),
            })
            .collect(),
        pro_tips: Vec::new(),
        tags: Vec::new(),
    }
}
