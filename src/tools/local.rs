use super::tool::{JokeParams, Tool, ToolFuture};
use rand::seq::IndexedRandom;

/// Categories served by the local joke table
pub const CATEGORIES: [&str; 3] = ["programming", "animal", "food"];

const PROGRAMMING_JOKES: [&str; 3] = [
    "Why do programmers prefer dark mode? Because light attracts bugs!",
    "Why did the programmer quit his job? Because he didn't get arrays!",
    "How many programmers does it take to change a light bulb? None, that's a hardware problem!",
];

const ANIMAL_JOKES: [&str; 3] = [
    "Why don't oysters donate to charity? Because they're shellfish!",
    "What do you call a bear with no teeth? A gummy bear!",
    "Why don't ants get sick? Because they have tiny ant-ibodies!",
];

const FOOD_JOKES: [&str; 3] = [
    "Why did the tomato blush? Because it saw the salad dressing!",
    "What do you call a fake noodle? An impasta!",
    "Why did the cookie go to the doctor? Because it was feeling crumbly!",
];

/// Jokes for a category, matched case-insensitively
pub fn jokes_for(category: &str) -> Option<&'static [&'static str]> {
    match category.to_lowercase().as_str() {
        "programming" => Some(&PROGRAMMING_JOKES),
        "animal" => Some(&ANIMAL_JOKES),
        "food" => Some(&FOOD_JOKES),
        _ => None,
    }
}

/// Apology returned in place of a joke for unknown categories
pub fn unknown_category_message(category: &str) -> String {
    format!(
        "Sorry, I don't have any jokes for the category '{}'. Try 'programming', 'animal', or 'food'.",
        category
    )
}

/// Pick a joke from the local table.
///
/// Unknown categories are not an error: the apology is the joke.
pub fn pick_joke(category: &str) -> String {
    match jokes_for(category).and_then(|jokes| jokes.choose(&mut rand::rng())) {
        Some(joke) => (*joke).to_string(),
        None => unknown_category_message(category),
    }
}

/// Joke tool backed by a fixed in-memory table
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalJokeTool;

impl LocalJokeTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for LocalJokeTool {
    fn name(&self) -> &'static str {
        "generate_joke"
    }

    fn description(&self) -> &'static str {
        "Generate a random joke based on the given category (programming, animal, or food)"
    }

    fn execute(&self, parameters: serde_json::Value) -> ToolFuture<'_> {
        Box::pin(async move {
            let params = JokeParams::from_value(parameters)?;
            Ok(pick_joke(&params.category))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_known_categories_return_table_members() {
        for category in CATEGORIES {
            let jokes = jokes_for(category).unwrap();
            let joke = pick_joke(category);
            assert!(!joke.is_empty());
            assert!(jokes.contains(&joke.as_str()), "{joke} not in {category}");
        }
    }

    #[test]
    fn test_lookup_ignores_case() {
        let joke = pick_joke("AnImAl");
        assert!(ANIMAL_JOKES.contains(&joke.as_str()));
    }

    #[test]
    fn test_unknown_category_keeps_original_spelling() {
        assert_eq!(
            pick_joke("Knock-Knock"),
            "Sorry, I don't have any jokes for the category 'Knock-Knock'. Try 'programming', 'animal', or 'food'."
        );
    }

    #[test]
    fn test_tool_execute() {
        let joke = tokio_test::block_on(
            LocalJokeTool::new().execute(serde_json::json!({"category": "Programming"})),
        )
        .unwrap();
        assert!(PROGRAMMING_JOKES.contains(&joke.as_str()));
    }

    #[test]
    fn test_every_joke_is_eventually_picked() {
        let mut seen = HashSet::new();
        for _ in 0..500 {
            seen.insert(pick_joke("food"));
            if seen.len() == FOOD_JOKES.len() {
                break;
            }
        }
        assert_eq!(seen.len(), FOOD_JOKES.len());
    }
}
