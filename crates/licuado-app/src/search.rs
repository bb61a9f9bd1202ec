// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::model::{Ingredient, Recipe, normalize_name};
use crate::state::AppState;

/// Recipes that contain every selected ingredient, in catalog order.
///
/// An empty selection imposes no constraint: all recipes pass. Matching is
/// set containment of the selected normalized names within the recipe's
/// ingredient-name set, never an any-of match.
pub fn filtered_recipes(recipes: &[Recipe], selection: &[Ingredient]) -> Vec<Recipe> {
    if selection.is_empty() {
        return recipes.to_vec();
    }

    let wanted: Vec<String> = selection
        .iter()
        .map(Ingredient::normalized_name)
        .collect();

    recipes
        .iter()
        .filter(|recipe| wanted.iter().all(|name| recipe.contains_ingredient(name)))
        .cloned()
        .collect()
}

/// Catalog ingredients not yet selected, in catalog order. Feeds the
/// autocomplete candidate pool and the empty-state prompts.
pub fn suggested_ingredients(ingredients: &[Ingredient], selection: &[Ingredient]) -> Vec<Ingredient> {
    let taken: Vec<String> = selection
        .iter()
        .map(Ingredient::normalized_name)
        .collect();

    ingredients
        .iter()
        .filter(|ingredient| !taken.contains(&ingredient.normalized_name()))
        .cloned()
        .collect()
}

/// Autocomplete candidates for a free-text query: unselected ingredients
/// whose normalized name contains the normalized query, capped at `limit`.
/// An empty query yields no candidates.
pub fn autocomplete(
    ingredients: &[Ingredient],
    selection: &[Ingredient],
    query: &str,
    limit: usize,
) -> Vec<Ingredient> {
    let query = normalize_name(query);
    if query.is_empty() {
        return Vec::new();
    }

    suggested_ingredients(ingredients, selection)
        .into_iter()
        .filter(|ingredient| ingredient.normalized_name().contains(&query))
        .take(limit)
        .collect()
}

/// Memoized derived views over an [`AppState`]. Recomputed only when the
/// state revision has moved since the last refresh; never mutated directly.
#[derive(Debug, Clone, Default)]
pub struct Derived {
    revision: Option<u64>,
    pub filtered_recipes: Vec<Recipe>,
    pub suggested_ingredients: Vec<Ingredient>,
}

impl Derived {
    /// Returns true when the views were recomputed.
    pub fn refresh(&mut self, state: &AppState) -> bool {
        if self.revision == Some(state.revision()) {
            return false;
        }

        self.filtered_recipes = filtered_recipes(state.recipes(), state.selected_ingredients());
        self.suggested_ingredients =
            suggested_ingredients(state.ingredients(), state.selected_ingredients());
        self.revision = Some(state.revision());
        true
    }
}
