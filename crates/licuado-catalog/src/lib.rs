// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use licuado_app::{Catalog, Ingredient, Recipe, RecipeIngredient, Tag, normalize_name};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::thread;
use std::time::Duration;
use url::Url;

pub const RECIPES_RESOURCE: &str = "recipes.json";
pub const INGREDIENTS_RESOURCE: &str = "ingredients.json";
pub const TAGS_RESOURCE: &str = "tags.json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IngredientDto {
    pub name: String,
    pub emoji: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TagDto {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecipeIngredientDto {
    pub name: String,
    pub amount: String,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecipeDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub ingredients: Vec<RecipeIngredientDto>,
    #[serde(rename = "proTips", default)]
    pub pro_tips: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Blocking HTTP client for the three static catalog resources.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("source.base_url must not be empty");
        }
        Url::parse(&base_url).with_context(|| format!("invalid source.base_url {base_url:?}"))?;

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetches recipes, ingredients, and tags concurrently and converts them
    /// into one catalog. The load succeeds only if all three fetches succeed;
    /// a partial catalog is never produced.
    pub fn fetch_catalog(&self) -> Result<Catalog> {
        let (recipes, ingredients, tags) = thread::scope(|scope| {
            let recipes = scope.spawn(|| self.fetch::<Vec<RecipeDto>>(RECIPES_RESOURCE));
            let ingredients = scope.spawn(|| self.fetch::<Vec<IngredientDto>>(INGREDIENTS_RESOURCE));
            let tags = scope.spawn(|| self.fetch::<Vec<TagDto>>(TAGS_RESOURCE));
            (
                join_fetch(recipes.join(), RECIPES_RESOURCE),
                join_fetch(ingredients.join(), INGREDIENTS_RESOURCE),
                join_fetch(tags.join(), TAGS_RESOURCE),
            )
        });

        Ok(build_catalog(recipes?, ingredients?, tags?))
    }

    fn fetch<T: DeserializeOwned>(&self, resource: &str) -> Result<T> {
        let response = self
            .http
            .get(format!("{}/{resource}", self.base_url))
            .send()
            .map_err(|error| connection_error(&self.base_url, resource, &error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(status_error(resource, status, &body));
        }

        response
            .json()
            .with_context(|| format!("decode {resource}"))
    }
}

fn join_fetch<T>(
    joined: std::thread::Result<Result<T>>,
    resource: &str,
) -> Result<T> {
    match joined {
        Ok(result) => result,
        Err(_) => Err(anyhow!("fetch {resource}: worker thread panicked")),
    }
}

fn connection_error(base_url: &str, resource: &str, error: &reqwest::Error) -> anyhow::Error {
    anyhow!("fetch {resource}: cannot reach {base_url} ({error})")
}

fn status_error(resource: &str, status: StatusCode, body: &str) -> anyhow::Error {
    if body.len() < 100 && !body.trim().is_empty() && !body.contains('{') {
        return anyhow!(
            "fetch {resource}: server returned {} ({})",
            status.as_u16(),
            body.trim()
        );
    }
    anyhow!("fetch {resource}: server returned {}", status.as_u16())
}

/// Builds a catalog from raw JSON documents, for demo data and tests.
pub fn catalog_from_raw(
    recipes_json: &str,
    ingredients_json: &str,
    tags_json: &str,
) -> Result<Catalog> {
    let recipes: Vec<RecipeDto> =
        serde_json::from_str(recipes_json).context("decode recipes document")?;
    let ingredients: Vec<IngredientDto> =
        serde_json::from_str(ingredients_json).context("decode ingredients document")?;
    let tags: Vec<TagDto> = serde_json::from_str(tags_json).context("decode tags document")?;
    Ok(build_catalog(recipes, ingredients, tags))
}

/// Converts the three raw collections into view models. Ingredient and tag
/// references inside recipes resolve by normalized name against the converted
/// catalogs; misses synthesize placeholders and are never errors.
pub fn build_catalog(
    recipes: Vec<RecipeDto>,
    ingredients: Vec<IngredientDto>,
    tags: Vec<TagDto>,
) -> Catalog {
    let ingredients: Vec<Ingredient> = ingredients
        .into_iter()
        .map(|dto| Ingredient {
            name: dto.name,
            emoji: dto.emoji,
        })
        .collect();

    let tags: Vec<Tag> = tags
        .into_iter()
        .map(|dto| Tag {
            name: dto.name,
            color: dto.color,
        })
        .collect();

    let recipes = recipes
        .into_iter()
        .map(|dto| convert_recipe(dto, &ingredients, &tags))
        .collect();

    Catalog {
        recipes,
        ingredients,
        tags,
    }
}

fn convert_recipe(dto: RecipeDto, ingredients: &[Ingredient], tags: &[Tag]) -> Recipe {
    let lines = dto
        .ingredients
        .into_iter()
        .map(|line| {
            let normalized = normalize_name(&line.name);
            let ingredient = ingredients
                .iter()
                .find(|candidate| candidate.normalized_name() == normalized)
                .cloned()
                .unwrap_or_else(|| Ingredient::placeholder(&line.name));
            RecipeIngredient {
                ingredient,
                amount: line.amount,
                unit: line.unit,
            }
        })
        .collect();

    let recipe_tags = dto
        .tags
        .into_iter()
        .map(|name| {
            let normalized = normalize_name(&name);
            tags.iter()
                .find(|candidate| candidate.normalized_name() == normalized)
                .cloned()
                .unwrap_or_else(|| Tag::unknown(&name))
        })
        .collect();

    Recipe {
        id: dto.id,
        name: dto.name,
        description: dto.description,
        ingredients: lines,
        pro_tips: dto.pro_tips,
        tags: recipe_tags,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Client, IngredientDto, RecipeDto, RecipeIngredientDto, TagDto, build_catalog,
        catalog_from_raw,
    };
    use anyhow::Result;
    use std::time::Duration;

    fn ingredient_dto(name: &str, emoji: &str) -> IngredientDto {
        IngredientDto {
            name: name.to_owned(),
            emoji: emoji.to_owned(),
        }
    }

    fn recipe_dto(id: &str, ingredient_names: &[&str], tag_names: &[&str]) -> RecipeDto {
        RecipeDto {
            id: id.to_owned(),
            name: id.to_uppercase(),
            description: String::new(),
            ingredients: ingredient_names
                .iter()
                .map(|name| RecipeIngredientDto {
                    name: (*name).to_owned(),
                    amount: "1".to_owned(),
                    unit: "cup".to_owned(),
                })
                .collect(),
            pro_tips: Vec::new(),
            tags: tag_names.iter().map(|name| (*name).to_owned()).collect(),
        }
    }

    #[test]
    fn known_references_resolve_against_the_catalogs() {
        let catalog = build_catalog(
            vec![recipe_dto("r1", &["Mango "], &["VEGAN"])],
            vec![ingredient_dto("mango", "🥭")],
            vec![TagDto {
                name: "Vegan".to_owned(),
                color: "green".to_owned(),
            }],
        );

        let recipe = &catalog.recipes[0];
        assert_eq!(recipe.ingredients[0].ingredient.name, "mango");
        assert_eq!(recipe.ingredients[0].ingredient.emoji, "🥭");
        assert_eq!(recipe.ingredients[0].amount, "1");
        assert_eq!(recipe.tags[0].name, "Vegan");
        assert_eq!(recipe.tags[0].color, "green");
    }

    #[test]
    fn unknown_ingredient_reference_synthesizes_a_placeholder() {
        let catalog = build_catalog(
            vec![recipe_dto("r1", &["dragon fruit"], &[])],
            vec![ingredient_dto("mango", "🥭")],
            Vec::new(),
        );

        let line = &catalog.recipes[0].ingredients[0];
        assert_eq!(line.ingredient.name, "dragon fruit");
        assert!(!line.ingredient.emoji.is_empty());
    }

    #[test]
    fn unknown_tag_reference_synthesizes_gray() {
        let catalog = build_catalog(
            vec![recipe_dto("r1", &[], &["Seasonal"])],
            Vec::new(),
            Vec::new(),
        );

        let tag = &catalog.recipes[0].tags[0];
        assert_eq!(tag.name, "Seasonal");
        assert_eq!(tag.color, "gray");
    }

    #[test]
    fn catalog_from_raw_parses_the_wire_shape() -> Result<()> {
        let catalog = catalog_from_raw(
            r#"[{"id":"r1","name":"Berry Blast","description":"Tart.",
                "ingredients":[{"name":"Strawberry","amount":"8","unit":"pieces"}],
                "proTips":["Freeze the berries first."],
                "tags":["Breakfast"]}]"#,
            r#"[{"name":"Strawberry","emoji":"🍓"}]"#,
            r#"[{"name":"Breakfast","color":"yellow"}]"#,
        )?;

        assert_eq!(catalog.recipes.len(), 1);
        assert_eq!(catalog.recipes[0].pro_tips.len(), 1);
        assert_eq!(catalog.recipes[0].tags[0].color, "yellow");
        assert_eq!(catalog.ingredients[0].emoji, "🍓");
        Ok(())
    }

    #[test]
    fn catalog_from_raw_rejects_malformed_documents() {
        let error = catalog_from_raw("not json", "[]", "[]")
            .expect_err("malformed recipes document should fail");
        assert!(error.to_string().contains("decode recipes document"));
    }

    #[test]
    fn client_rejects_empty_and_malformed_base_urls() {
        let error = Client::new("", Duration::from_secs(1))
            .expect_err("empty base url should fail");
        assert!(error.to_string().contains("must not be empty"));

        let error = Client::new("not a url", Duration::from_secs(1))
            .expect_err("malformed base url should fail");
        assert!(error.to_string().contains("invalid source.base_url"));
    }

    #[test]
    fn client_trims_trailing_slashes() -> Result<()> {
        let client = Client::new("http://localhost:4200/assets///", Duration::from_secs(1))?;
        assert_eq!(client.base_url(), "http://localhost:4200/assets");
        Ok(())
    }
}
