//! Recipe catalog
//!
//! Static ingredient and recipe tables plus the lookups the session engine needs.
//! A `Catalog` is validated once at construction so gameplay code never has to
//! deal with dangling ingredient ids or an empty difficulty tier.

use rand::Rng;
use serde::Serialize;
use thiserror::Error;

/// Display language for ingredient and recipe names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Language {
    #[default]
    Vi,
    En,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Vi => "vi",
            Language::En => "en",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "vi" | "vietnamese" => Some(Language::Vi),
            "en" | "english" => Some(Language::En),
            _ => None,
        }
    }
}

/// Ingredient category (drives grouping in the pantry UI)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Vegetable,
    Meat,
    Spice,
    Dairy,
    Grain,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Vegetable,
        Category::Meat,
        Category::Spice,
        Category::Dairy,
        Category::Grain,
    ];
}

/// Recipe difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Difficulty of the orders handed out at a given level
    pub fn for_level(level: u32) -> Self {
        match level {
            0..=3 => Difficulty::Easy,
            4..=6 => Difficulty::Medium,
            _ => Difficulty::Hard,
        }
    }

    /// Scoring factor applied to a recipe's base score
    pub fn score_multiplier(&self) -> f64 {
        match self {
            Difficulty::Easy => 1.0,
            Difficulty::Medium => 1.2,
            Difficulty::Hard => 1.5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// A single ingredient the player can drop into the pan
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub id: &'static str,
    pub name: &'static str,
    pub name_en: &'static str,
    pub emoji: &'static str,
    pub category: Category,
}

impl Ingredient {
    pub fn name_in(&self, lang: Language) -> &'static str {
        match lang {
            Language::Vi => self.name,
            Language::En => self.name_en,
        }
    }
}

/// A dish customers can order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: &'static str,
    pub name: &'static str,
    pub name_en: &'static str,
    /// Required ingredient ids (order is irrelevant)
    pub ingredients: &'static [&'static str],
    pub difficulty: Difficulty,
    pub base_score: u32,
    /// Seconds the customer is willing to wait
    pub time_limit: u32,
}

impl Recipe {
    pub fn name_in(&self, lang: Language) -> &'static str {
        match lang {
            Language::Vi => self.name,
            Language::En => self.name_en,
        }
    }

    /// Number of required ingredients present in `pan` (duplicates count once)
    pub fn covered_by(&self, pan: &[String]) -> usize {
        self.ingredients
            .iter()
            .filter(|required| pan.iter().any(|id| id.as_str() == **required))
            .count()
    }

    /// True when every required ingredient is in the pan. Extras are fine.
    pub fn is_satisfied_by(&self, pan: &[String]) -> bool {
        self.covered_by(pan) == self.ingredients.len()
    }
}

/// Catalog construction failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("duplicate ingredient id `{0}`")]
    DuplicateIngredient(&'static str),
    #[error("duplicate recipe id `{0}`")]
    DuplicateRecipe(&'static str),
    #[error("recipe `{recipe}` references unknown ingredient `{ingredient}`")]
    UnknownIngredient {
        recipe: &'static str,
        ingredient: &'static str,
    },
    #[error("recipe `{0}` has no ingredients")]
    EmptyRecipe(&'static str),
    #[error("recipe `{0}` needs a positive base score and time limit")]
    InvalidRecipe(&'static str),
    #[error("no {} recipes in catalog", .0.as_str())]
    EmptyDifficulty(Difficulty),
}

/// Validated ingredient + recipe tables
#[derive(Debug, Clone)]
pub struct Catalog {
    ingredients: Vec<Ingredient>,
    recipes: Vec<Recipe>,
}

impl Catalog {
    /// Build a catalog, rejecting anything gameplay could trip over later
    pub fn new(ingredients: Vec<Ingredient>, recipes: Vec<Recipe>) -> Result<Self, CatalogError> {
        for (i, ing) in ingredients.iter().enumerate() {
            if ingredients[..i].iter().any(|other| other.id == ing.id) {
                return Err(CatalogError::DuplicateIngredient(ing.id));
            }
        }

        for (i, recipe) in recipes.iter().enumerate() {
            if recipes[..i].iter().any(|other| other.id == recipe.id) {
                return Err(CatalogError::DuplicateRecipe(recipe.id));
            }
            if recipe.ingredients.is_empty() {
                return Err(CatalogError::EmptyRecipe(recipe.id));
            }
            if recipe.base_score == 0 || recipe.time_limit == 0 {
                return Err(CatalogError::InvalidRecipe(recipe.id));
            }
            if let Some(missing) = recipe
                .ingredients
                .iter()
                .find(|id| !ingredients.iter().any(|ing| ing.id == **id))
            {
                return Err(CatalogError::UnknownIngredient {
                    recipe: recipe.id,
                    ingredient: *missing,
                });
            }
        }

        // Every tier must be able to produce an order
        for difficulty in Difficulty::ALL {
            if !recipes.iter().any(|r| r.difficulty == difficulty) {
                return Err(CatalogError::EmptyDifficulty(difficulty));
            }
        }

        Ok(Self {
            ingredients,
            recipes,
        })
    }

    /// The built-in kitchen
    pub fn standard() -> Self {
        let ingredients = INGREDIENTS
            .iter()
            .map(|&(id, name, name_en, emoji, category)| Ingredient {
                id,
                name,
                name_en,
                emoji,
                category,
            })
            .collect();
        let recipes = RECIPES.to_vec();
        // Static tables, checked by `standard_catalog_is_valid`
        Self::new(ingredients, recipes).expect("built-in catalog tables are invalid")
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Look up an ingredient by id
    pub fn ingredient(&self, id: &str) -> Option<&Ingredient> {
        self.ingredients.iter().find(|ing| ing.id == id)
    }

    /// Resolve a list of ids, silently dropping the unknown ones
    pub fn ingredients_by_ids<S: AsRef<str>>(&self, ids: &[S]) -> Vec<&Ingredient> {
        ids.iter()
            .filter_map(|id| self.ingredient(id.as_ref()))
            .collect()
    }

    pub fn ingredients_in(&self, category: Category) -> impl Iterator<Item = &Ingredient> {
        self.ingredients
            .iter()
            .filter(move |ing| ing.category == category)
    }

    pub fn recipe(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    /// Pick a recipe uniformly, optionally restricted to one difficulty.
    ///
    /// Returns `None` only for an empty selection, which a catalog built through
    /// [`Catalog::new`] cannot produce.
    pub fn random_recipe<R: Rng>(
        &self,
        rng: &mut R,
        difficulty: Option<Difficulty>,
    ) -> Option<&Recipe> {
        let candidates: Vec<&Recipe> = self
            .recipes
            .iter()
            .filter(|r| difficulty.is_none_or(|d| r.difficulty == d))
            .collect();
        if candidates.is_empty() {
            return None;
        }
        let idx = rng.random_range(0..candidates.len());
        Some(candidates[idx])
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

// -----------------------------------------------------------------------------
// Built-in tables: (id, Vietnamese name, English name, emoji, category)
// -----------------------------------------------------------------------------

const INGREDIENTS: &[(&str, &str, &str, &str, Category)] = &[
    ("tomato", "Cà chua", "Tomato", "🍅", Category::Vegetable),
    ("onion", "Hành tây", "Onion", "🧅", Category::Vegetable),
    ("carrot", "Cà rốt", "Carrot", "🥕", Category::Vegetable),
    ("potato", "Khoai tây", "Potato", "🥔", Category::Vegetable),
    ("lettuce", "Rau xà lách", "Lettuce", "🥬", Category::Vegetable),
    ("cucumber", "Dưa chuột", "Cucumber", "🥒", Category::Vegetable),
    ("bell-pepper", "Ớt chuông", "Bell pepper", "🫑", Category::Vegetable),
    ("mushroom", "Nấm", "Mushroom", "🍄", Category::Vegetable),
    ("chicken", "Thịt gà", "Chicken", "🍗", Category::Meat),
    ("beef", "Thịt bò", "Beef", "🥩", Category::Meat),
    ("pork", "Thịt heo", "Pork", "🥓", Category::Meat),
    ("fish", "Cá", "Fish", "🐟", Category::Meat),
    ("shrimp", "Tôm", "Shrimp", "🦐", Category::Meat),
    ("salt", "Muối", "Salt", "🧂", Category::Spice),
    ("pepper", "Tiêu", "Pepper", "🫚", Category::Spice),
    ("garlic", "Tỏi", "Garlic", "🧄", Category::Spice),
    ("ginger", "Gừng", "Ginger", "🫚", Category::Spice),
    ("chili", "Ớt", "Chili", "🌶️", Category::Spice),
    ("cheese", "Phô mai", "Cheese", "🧀", Category::Dairy),
    ("milk", "Sữa", "Milk", "🥛", Category::Dairy),
    ("butter", "Bơ", "Butter", "🧈", Category::Dairy),
    ("egg", "Trứng", "Egg", "🥚", Category::Dairy),
    ("rice", "Cơm", "Rice", "🍚", Category::Grain),
    ("bread", "Bánh mì", "Bread", "🍞", Category::Grain),
    ("pasta", "Mì ống", "Pasta", "🍝", Category::Grain),
    ("noodles", "Mì", "Noodles", "🍜", Category::Grain),
];

const RECIPES: &[Recipe] = &[
    Recipe {
        id: "simple-salad",
        name: "Salad Đơn Giản",
        name_en: "Simple Salad",
        ingredients: &["lettuce", "tomato", "cucumber"],
        difficulty: Difficulty::Easy,
        base_score: 100,
        time_limit: 30,
    },
    Recipe {
        id: "scrambled-eggs",
        name: "Trứng Chiên",
        name_en: "Scrambled Eggs",
        ingredients: &["egg", "butter", "salt"],
        difficulty: Difficulty::Easy,
        base_score: 120,
        time_limit: 25,
    },
    Recipe {
        id: "grilled-cheese",
        name: "Bánh Mì Phô Mai Nướng",
        name_en: "Grilled Cheese",
        ingredients: &["bread", "cheese", "butter"],
        difficulty: Difficulty::Easy,
        base_score: 110,
        time_limit: 35,
    },
    Recipe {
        id: "chicken-stir-fry",
        name: "Gà Xào",
        name_en: "Chicken Stir-Fry",
        ingredients: &["chicken", "onion", "bell-pepper", "garlic", "salt"],
        difficulty: Difficulty::Medium,
        base_score: 200,
        time_limit: 45,
    },
    Recipe {
        id: "pasta-marinara",
        name: "Mì Sốt Cà Chua",
        name_en: "Pasta Marinara",
        ingredients: &["pasta", "tomato", "onion", "garlic", "salt"],
        difficulty: Difficulty::Medium,
        base_score: 180,
        time_limit: 40,
    },
    Recipe {
        id: "beef-noodles",
        name: "Mì Bò",
        name_en: "Beef Noodles",
        ingredients: &["noodles", "beef", "onion", "garlic", "salt"],
        difficulty: Difficulty::Medium,
        base_score: 220,
        time_limit: 50,
    },
    Recipe {
        id: "complex-stir-fry",
        name: "Xào Tổng Hợp",
        name_en: "Mixed Stir-Fry",
        ingredients: &[
            "chicken",
            "shrimp",
            "onion",
            "bell-pepper",
            "mushroom",
            "garlic",
            "ginger",
            "salt",
        ],
        difficulty: Difficulty::Hard,
        base_score: 350,
        time_limit: 60,
    },
    Recipe {
        id: "gourmet-salad",
        name: "Salad Thượng Hạng",
        name_en: "Gourmet Salad",
        ingredients: &[
            "lettuce", "tomato", "cucumber", "cheese", "onion", "salt", "pepper",
        ],
        difficulty: Difficulty::Hard,
        base_score: 300,
        time_limit: 55,
    },
    Recipe {
        id: "seafood-pasta",
        name: "Mì Hải Sản",
        name_en: "Seafood Pasta",
        ingredients: &[
            "pasta", "shrimp", "fish", "tomato", "onion", "garlic", "salt", "pepper",
        ],
        difficulty: Difficulty::Hard,
        base_score: 400,
        time_limit: 65,
    },
];
