// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::model::{Catalog, Ingredient, Recipe, normalize_name};

/// Full mutable application state: loaded catalogs, the ordered selection of
/// ingredients, the recipe open for detail viewing, and load lifecycle flags.
///
/// All mutation goes through [`AppState::dispatch`]; derived views (filtered
/// recipes, suggestions) are recomputed from the state by callers, keyed off
/// [`AppState::revision`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    catalog: Catalog,
    selected_ingredients: Vec<Ingredient>,
    selected_recipe: Option<Recipe>,
    is_loading: bool,
    error: Option<String>,
    revision: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            catalog: Catalog::default(),
            selected_ingredients: Vec::new(),
            selected_recipe: None,
            is_loading: false,
            error: None,
            revision: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    AddIngredient(Ingredient),
    RemoveIngredient(String),
    ClearIngredients,
    OpenRecipe(Recipe),
    CloseRecipe,
    LoadStarted,
    LoadFinished(Result<Catalog, String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    IngredientAdded(Ingredient),
    IngredientRemoved(Ingredient),
    SelectionCleared,
    RecipeOpened(String),
    RecipeClosed,
    LoadStarted,
    CatalogReplaced {
        recipes: usize,
        ingredients: usize,
        tags: usize,
    },
    LoadFailed(String),
}

impl AppState {
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.catalog.recipes
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.catalog.ingredients
    }

    pub fn selected_ingredients(&self) -> &[Ingredient] {
        &self.selected_ingredients
    }

    pub fn selected_recipe(&self) -> Option<&Recipe> {
        self.selected_recipe.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Bumped on every mutation that can change a derived view. Callers cache
    /// derived results against this value.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_selected(&self, name: &str) -> bool {
        let normalized = normalize_name(name);
        self.selected_ingredients
            .iter()
            .any(|selected| selected.normalized_name() == normalized)
    }

    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::AddIngredient(ingredient) => {
                if self.is_selected(&ingredient.name) {
                    return Vec::new();
                }
                self.selected_ingredients.push(ingredient.clone());
                self.bump();
                vec![AppEvent::IngredientAdded(ingredient)]
            }
            AppCommand::RemoveIngredient(name) => {
                let normalized = normalize_name(&name);
                let Some(index) = self
                    .selected_ingredients
                    .iter()
                    .position(|selected| selected.normalized_name() == normalized)
                else {
                    return Vec::new();
                };
                let removed = self.selected_ingredients.remove(index);
                self.bump();
                vec![AppEvent::IngredientRemoved(removed)]
            }
            AppCommand::ClearIngredients => {
                if self.selected_ingredients.is_empty() {
                    return Vec::new();
                }
                self.selected_ingredients.clear();
                self.bump();
                vec![AppEvent::SelectionCleared]
            }
            AppCommand::OpenRecipe(recipe) => {
                let id = recipe.id.clone();
                self.selected_recipe = Some(recipe);
                vec![AppEvent::RecipeOpened(id)]
            }
            AppCommand::CloseRecipe => {
                if self.selected_recipe.take().is_none() {
                    return Vec::new();
                }
                vec![AppEvent::RecipeClosed]
            }
            AppCommand::LoadStarted => {
                self.is_loading = true;
                self.error = None;
                vec![AppEvent::LoadStarted]
            }
            AppCommand::LoadFinished(Ok(catalog)) => {
                let counts = AppEvent::CatalogReplaced {
                    recipes: catalog.recipes.len(),
                    ingredients: catalog.ingredients.len(),
                    tags: catalog.tags.len(),
                };
                self.catalog = catalog;
                self.is_loading = false;
                self.error = None;
                self.bump();
                vec![counts]
            }
            AppCommand::LoadFinished(Err(message)) => {
                self.is_loading = false;
                self.error = Some(message.clone());
                vec![AppEvent::LoadFailed(message)]
            }
        }
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
