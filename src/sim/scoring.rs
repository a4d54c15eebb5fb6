//! Score for a served dish

use super::state::Order;
use crate::config::GameConfig;

/// Percentage of the order's time still left, rounded down (0..=100).
///
/// Integer math so e.g. 29/50 is exactly 58. Float division would give
/// 57.99… and floor to 57.
pub fn time_bonus(order: &Order) -> u64 {
    if order.max_time == 0 {
        return 0;
    }
    let left = order.time_left.min(order.max_time) as u64;
    left * 100 / order.max_time as u64
}

/// `floor((base * difficulty + time_bonus) * multiplier ^ (level - 1))`
pub fn dish_score(order: &Order, level: u32, config: &GameConfig) -> u64 {
    let base = order.recipe.base_score as f64 * order.recipe.difficulty.score_multiplier();
    let raw = (base + time_bonus(order) as f64) * config.level_multiplier(level);
    // `as` saturates, so absurd levels cap at u64::MAX instead of wrapping
    raw.floor() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn order(recipe_id: &str, time_left: u32) -> Order {
        let recipe = Catalog::standard().recipe(recipe_id).unwrap().clone();
        let mut order = Order::new("order_1".into(), recipe);
        order.time_left = time_left;
        order
    }

    #[test]
    fn test_time_bonus() {
        assert_eq!(time_bonus(&order("scrambled-eggs", 25)), 100);
        assert_eq!(time_bonus(&order("scrambled-eggs", 7)), 28);
        assert_eq!(time_bonus(&order("scrambled-eggs", 0)), 0);
        assert_eq!(time_bonus(&order("beef-noodles", 29)), 58);
        // Never more than 100
        assert_eq!(time_bonus(&order("scrambled-eggs", 99)), 100);
    }

    #[test]
    fn test_easy_level_one() {
        let config = GameConfig::default();
        // 120 * 1.0 + 100, no level multiplier yet
        assert_eq!(dish_score(&order("scrambled-eggs", 25), 1, &config), 220);
        // 100 + floor(15/30*100) = 150
        assert_eq!(dish_score(&order("simple-salad", 15), 1, &config), 150);
    }

    #[test]
    fn test_difficulty_multiplier() {
        let config = GameConfig::default();
        // beef-noodles: 220 * 1.2 = 264, full time bonus 100
        assert_eq!(dish_score(&order("beef-noodles", 50), 1, &config), 364);
        // seafood-pasta: 400 * 1.5 = 600, bonus 0
        assert_eq!(dish_score(&order("seafood-pasta", 0), 1, &config), 600);
    }

    #[test]
    fn test_level_multiplier() {
        let config = GameConfig::default();
        // (120 + 100) * 1.3 = 286
        assert_eq!(dish_score(&order("scrambled-eggs", 25), 2, &config), 286);
        // (120 + 100) * 1.69 = 371.8
        assert_eq!(dish_score(&order("scrambled-eggs", 25), 3, &config), 371);
    }
}
