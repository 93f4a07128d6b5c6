//! Menu contents and preparation-time model.
//!
//! Item names never influence scheduling; only the item *counts* feed the
//! preparation time:
//!
//! ```text
//! base      = MAIN_SECS + SIDE_SECS × sides + DRINK_SECS × drinks
//! prep_secs = max(min_prep_secs, base × U(1 − VARIABILITY, 1 + VARIABILITY))
//! ```

use cb_core::SimRng;

pub const MAIN_SECS: f64 = 240.0;
pub const SIDE_SECS: f64 = 60.0;
pub const DRINK_SECS: f64 = 20.0;
/// Symmetric spread applied to the item-derived base time.
pub const VARIABILITY: f64 = 0.25;
pub const MAX_SIDES: usize = 2;

pub const MAINS: &[&str] = &[
    "Burger", "Cheeseburger", "Chicken Sandwich", "Veggie Burger",
    "Grilled Cheese", "Pulled-Pork Sandwich", "BLT",
    "Chicken Wrap", "Falafel Wrap", "Beef Taco", "Fish Taco",
    "Pizza", "Margherita Pizza", "Pepperoni Pizza",
    "Chicken Alfredo Pasta", "Spaghetti & Meatballs",
    "Chicken Teriyaki Bowl", "Burrito Bowl",
    "Caesar Salad", "Greek Salad", "Cobb Salad",
];

pub const SIDES: &[&str] = &[
    "Fries", "Sweet-Potato Fries", "Onion Rings", "Tater Tots",
    "Potato Wedges", "Mozzarella Sticks", "Garlic Bread",
    "Cole Slaw", "Side Salad", "Fruit Cup", "Mac & Cheese",
    "Chips & Salsa", "Guacamole & Chips", "Cup of Chili",
    "Tomato Soup", "Chicken Noodle Soup", "Steamed Veggies",
];

pub const DRINKS: &[&str] = &[
    "Soda", "Diet Soda", "Root Beer", "Lemonade", "Iced Tea",
    "Sweet Tea", "Orange Juice", "Apple Juice", "Sports Drink",
    "Sparkling Water", "Bottled Water",
    "Coffee", "Latte", "Cappuccino", "Hot Tea", "Hot Chocolate",
    "Smoothie", "Milkshake", "Iced Coffee",
];

/// What a customer asked for: one main, up to two distinct sides, and at
/// most one drink.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MenuSelection {
    pub main:  &'static str,
    pub sides: Vec<&'static str>,
    pub drink: Option<&'static str>,
}

impl MenuSelection {
    pub fn random(rng: &mut SimRng) -> Self {
        let main = rng.choose(MAINS).copied().unwrap_or("Burger");
        let side_count = rng.gen_range(0..=MAX_SIDES);
        let sides = rng.choose_multiple(SIDES, side_count);
        let drink = if rng.gen_bool(0.5) { rng.choose(DRINKS).copied() } else { None };
        Self { main, sides, drink }
    }

    /// Item-derived preparation time before variability.
    pub fn base_prep_secs(&self) -> f64 {
        MAIN_SECS + SIDE_SECS * self.sides.len() as f64 + DRINK_SECS * self.drink.map_or(0.0, |_| 1.0)
    }

    /// Randomised preparation time, never below `min_prep_secs`.
    pub fn prep_secs(&self, min_prep_secs: f64, rng: &mut SimRng) -> f64 {
        let factor = rng.gen_range((1.0 - VARIABILITY)..=(1.0 + VARIABILITY));
        (self.base_prep_secs() * factor).max(min_prep_secs)
    }
}

impl std::fmt::Display for MenuSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.main)?;
        for side in &self.sides {
            write!(f, " + {side}")?;
        }
        if let Some(drink) = self.drink {
            write!(f, " + {drink}")?;
        }
        Ok(())
    }
}
