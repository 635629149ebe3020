#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use titleforge::item::Item;

pub fn as_of() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
}

/// An item published `age_days` before [`as_of`].
pub fn item(title: &str, views: f64, age_days: i64) -> Item {
    Item::new(title, views, as_of() - Duration::days(age_days)).unwrap()
}

pub const OUTLIER_TITLES: [&str; 5] = [
    "5 Mistakes That Ruin Sourdough Bread",
    "7 Secrets Of Crispy Crust Baking",
    "3 Reasons Your Dough Never Rises",
    "10 Ways To Bake Better Bread Today",
    "4 Tricks For Perfect Homemade Bread",
];

const NORMAL_TITLES: [&str; 25] = [
    "Baking Sourdough At Home",
    "My Morning Bread Routine",
    "How To Shape A Boule",
    "Focaccia Art Experiment",
    "Rye Bread Deep Dive",
    "Why Is My Bread Flat?",
    "Baguettes At Home: Honest Results",
    "Cinnamon Rolls The Slow Way",
    "Weekend Bake With Me",
    "Whole Wheat vs White Flour",
    "Proofing Basket Review",
    "Bagels From Scratch",
    "Pizza Night Dough Walkthrough",
    "Oven Spring Explained",
    "Milk Bread Buns",
    "Croissant Lamination Attempt",
    "Gluten Free Loaf Experiment",
    "Brioche Is Easier Than You Think",
    "What Hydration Does To Dough",
    "Bakery Tour | Paris",
    "Banana Bread For Breakfast",
    "Testing A New Dutch Oven",
    "Scoring Patterns For Loaves",
    "Soft Pretzels From Scratch",
    "English Muffins On The Griddle",
];

/// 30 videos, all 10 days old. 25 sit within about 10% of 100 views/day;
/// the 5 outliers run at 2000 views/day and their titles start with a digit.
pub fn scenario_items() -> Vec<Item> {
    let mut items: Vec<Item> = NORMAL_TITLES
        .iter()
        .enumerate()
        .map(|(i, t)| item(t, 1000.0 + 8.0 * (i as f64 - 12.0), 10))
        .collect();
    items.extend(OUTLIER_TITLES.iter().map(|t| item(t, 20_000.0, 10)));
    items
}

pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}
