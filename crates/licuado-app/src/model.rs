// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

/// Emoji used for ingredient references that resolve to nothing in the
/// ingredient catalog.
pub const PLACEHOLDER_EMOJI: &str = "🥄";

/// Color used for tag references that resolve to nothing in the tag catalog.
pub const UNKNOWN_TAG_COLOR: &str = "gray";

/// Canonical comparison form of an ingredient or tag name: lowercased, then
/// trimmed of surrounding whitespace. Two names refer to the same ingredient
/// or tag exactly when their normalized forms are byte-equal.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase().trim().to_owned()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub emoji: String,
}

impl Ingredient {
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }

    /// Stand-in for an ingredient name a recipe references but the catalog
    /// does not carry.
    pub fn placeholder(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            emoji: PLACEHOLDER_EMOJI.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub color: String,
}

impl Tag {
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }

    pub fn unknown(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            color: UNKNOWN_TAG_COLOR.to_owned(),
        }
    }
}

/// One quantity line of a recipe, pointing at a catalog ingredient (or a
/// synthesized placeholder).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub ingredient: Ingredient,
    pub amount: String,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub description: String,
    pub ingredients: Vec<RecipeIngredient>,
    pub pro_tips: Vec<String>,
    pub tags: Vec<Tag>,
}

impl Recipe {
    /// Whether any ingredient line of this recipe matches the given
    /// normalized name.
    pub fn contains_ingredient(&self, normalized: &str) -> bool {
        self.ingredients
            .iter()
            .any(|line| line.ingredient.normalized_name() == normalized)
    }
}

/// The three loaded collections. Replaced wholesale on every successful load,
/// never partially merged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub recipes: Vec<Recipe>,
    pub ingredients: Vec<Ingredient>,
    pub tags: Vec<Tag>,
}
