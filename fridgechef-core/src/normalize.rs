//! Recipe text normalization.
//!
//! The backend relays three payload dialects (public dataset, AI output,
//! user uploads) whose ingredient and instruction fields are free text.
//! These are lossy, best-effort heuristics: they must tolerate missing
//! fields and partial data and never panic.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::models::{num_field, str_field};

/// "STEP 3" markers (any case) or numbered markers like "2." / "2)" at the
/// start of the text or of a line, or after sentence-ending punctuation.
static STEP_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?P<step>STEP\s*\d+\s*[.:)]?\s*)|(?:^|\n|[.!?]\s)\s*(?P<num>\d{1,2}\s*[.)]\s+)")
        .unwrap()
});

/// Sentence-ending punctuation followed by whitespace.
static SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]\s+").unwrap());

/// Ingredient list separators: comma, middle dot, newline, semicolon.
static INGREDIENT_SEP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[,·\n;]+").unwrap());

/// Parenthesized qualifiers like "(한 접시)".
static PAREN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\([^)]*\)").unwrap());

/// Quantity words that end the product-name part of an ingredient line.
const UNIT_WORDS: &[&str] = &[
    "g", "kg", "mg", "ml", "l", "cc", "개", "컵", "큰술", "작은술", "스푼", "티스푼", "숟갈",
    "조각", "장", "마리", "줌", "모", "봉", "봉지", "캔", "팩", "알", "톨", "쪽", "꼬집", "인분",
    "cup", "cups", "tbsp", "tsp", "oz", "lb",
];

/// Split free-form instruction text into steps.
///
/// Strategies in order, first one producing more than one piece wins:
/// explicit step markers, newlines, sentence boundaries. Otherwise the whole
/// text is one step.
pub fn split_steps(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let by_marker = split_on_markers(trimmed);
    if by_marker.len() > 1 {
        return by_marker;
    }

    let by_newline: Vec<String> = trimmed
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    if by_newline.len() > 1 {
        return by_newline;
    }

    let by_sentence = split_on_sentences(trimmed);
    if by_sentence.len() > 1 {
        return by_sentence;
    }

    vec![trimmed.to_string()]
}

fn split_on_markers(text: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece_start = 0;
    let mut seen_marker = false;

    for caps in STEP_MARKER.captures_iter(text) {
        // The numbered-marker alternative consumes the punctuation that ends
        // the previous step; that punctuation belongs to the previous piece,
        // so the boundary is where the marker itself starts.
        let Some(marker) = caps.name("step").or_else(|| caps.name("num")) else {
            continue;
        };
        let piece = text[piece_start..marker.start()].trim();
        if !piece.is_empty() {
            pieces.push(piece.to_string());
        }
        seen_marker = true;
        piece_start = marker.end();
    }

    if !seen_marker {
        return Vec::new();
    }

    let tail = text[piece_start..].trim();
    if !tail.is_empty() {
        pieces.push(tail.to_string());
    }
    pieces
}

fn split_on_sentences(text: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for sep in SENTENCE_END.find_iter(text) {
        // Keep the punctuation with its sentence.
        let end = sep.start() + 1;
        let piece = text[start..end].trim();
        if !piece.is_empty() {
            pieces.push(piece.to_string());
        }
        start = sep.end();
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        pieces.push(tail.to_string());
    }
    pieces
}

/// Split an ingredient blob into individual entries.
pub fn split_ingredients(text: &str) -> Vec<String> {
    INGREDIENT_SEP
        .split(text)
        .map(|piece| piece.trim().trim_start_matches(['-', '–', '•']).trim_start())
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

/// Extract a product-search term from one ingredient line.
///
/// Strips parenthesized qualifiers, cuts at the first comma, then keeps
/// leading tokens until one contains a digit or is a unit word. If nothing
/// was kept, falls back to stripping from the first digit onward.
pub fn shopping_query(line: &str) -> String {
    let no_paren = PAREN.replace_all(line, " ");
    let before_comma = no_paren.split(',').next().unwrap_or("").trim().to_string();

    let mut kept: Vec<&str> = Vec::new();
    for token in before_comma.split_whitespace() {
        if token.chars().any(|c| c.is_ascii_digit()) || is_unit_token(token) {
            break;
        }
        kept.push(token);
    }
    if !kept.is_empty() {
        return kept.join(" ");
    }

    match before_comma.find(|c: char| c.is_ascii_digit()) {
        Some(idx) => before_comma[..idx].trim().to_string(),
        None => before_comma,
    }
}

fn is_unit_token(token: &str) -> bool {
    let bare = token
        .trim_matches(|c: char| c.is_ascii_punctuation())
        .to_lowercase();
    UNIT_WORDS.contains(&bare.as_str())
}

/// Render an optional minute range as "{min}분 ~ {max}분".
pub fn format_cook_time(min: Option<u32>, max: Option<u32>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("{min}분 ~ {max}분"),
        (Some(v), None) | (None, Some(v)) => format!("{v}분"),
        (None, None) => String::new(),
    }
}

/// Uniform display shape for a recipe, whichever dialect it arrived in.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecipeView {
    pub title: String,
    pub image_url: Option<String>,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub difficulty: Option<String>,
    pub cook_time: String,
    pub nutrition: Option<String>,
}

/// Normalize one recipe payload into a [`RecipeView`].
pub fn normalize_recipe(value: &Value) -> RecipeView {
    let title = str_field(value, &["title", "name", "foodName", "RCP_NM"])
        .unwrap_or("제목 없음")
        .to_string();

    let image_url =
        str_field(value, &["imageUrl", "image", "ATT_FILE_NO_MAIN"]).map(str::to_string);

    let ingredients = str_field(value, &["ingredients", "RCP_PARTS_DTLS"])
        .map(split_ingredients)
        .unwrap_or_default();

    let mut steps = manual_steps(value);
    if steps.is_empty() {
        steps = str_field(value, &["steps", "instructions", "description", "RCP_WAY2", "manual"])
            .map(split_steps)
            .unwrap_or_default();
    }

    let difficulty = str_field(value, &["difficulty", "level"]).map(str::to_string);

    let cook_time = str_field(value, &["cookTime"])
        .map(str::to_string)
        .unwrap_or_else(|| {
            format_cook_time(
                num_field(value, &["cookTimeMin"]).and_then(|n| u32::try_from(n).ok()),
                num_field(value, &["cookTimeMax"]).and_then(|n| u32::try_from(n).ok()),
            )
        });

    let nutrition = str_field(value, &["nutrition", "INFO_ENG"])
        .map(str::to_string)
        .or_else(|| num_field(value, &["INFO_ENG"]).map(|kcal| format!("{kcal}kcal")));

    RecipeView {
        title,
        image_url,
        ingredients,
        steps,
        difficulty,
        cook_time,
        nutrition,
    }
}

/// Public-dataset recipes carry steps as MANUAL01..MANUAL20 fields.
fn manual_steps(value: &Value) -> Vec<String> {
    (1..=20)
        .filter_map(|i| {
            value
                .get(format!("MANUAL{i:02}"))
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_split_steps_step_markers() {
        let text = "STEP 1 물을 끓인다 STEP 2 면을 넣는다 STEP 3 스프를 넣는다";
        let steps = split_steps(text);
        assert_eq!(
            steps,
            vec!["물을 끓인다", "면을 넣는다", "스프를 넣는다"]
        );
    }

    #[test]
    fn test_split_steps_numbered_markers() {
        let text = "1. 양파를 썬다.\n2. 팬에 볶는다.\n3. 소금으로 간한다.";
        let steps = split_steps(text);
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0], "양파를 썬다.");
        assert_eq!(steps[2], "소금으로 간한다.");
    }

    #[test]
    fn test_split_steps_newline_fallback() {
        let text = "양파를 썰어 준비\n팬에 기름을 두르고 볶기";
        assert_eq!(
            split_steps(text),
            vec!["양파를 썰어 준비", "팬에 기름을 두르고 볶기"]
        );
    }

    #[test]
    fn test_split_steps_sentence_fallback() {
        let text = "물을 끓인다. 면을 넣는다. 스프를 넣는다.";
        let steps = split_steps(text);
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0], "물을 끓인다.");
    }

    #[test]
    fn test_split_steps_single_piece() {
        assert_eq!(
            split_steps("  고소한 맛이 나는 요리  "),
            vec!["고소한 맛이 나는 요리"]
        );
    }

    #[test]
    fn test_split_steps_empty() {
        assert!(split_steps("   ").is_empty());
    }

    #[test]
    fn test_split_ingredients_mixed_separators() {
        let text = "감자 2개, 양파 1개·대파\n- 다진 마늘; ";
        assert_eq!(
            split_ingredients(text),
            vec!["감자 2개", "양파 1개", "대파", "다진 마늘"]
        );
    }

    #[test]
    fn test_shopping_query_unit_suffix() {
        assert_eq!(shopping_query("애호박 200g"), "애호박");
        assert_eq!(shopping_query("우유 1컵"), "우유");
    }

    #[test]
    fn test_shopping_query_paren_qualifier() {
        assert_eq!(shopping_query("다진 마늘(한 접시)"), "다진 마늘");
    }

    #[test]
    fn test_shopping_query_plain_name_unchanged() {
        assert_eq!(shopping_query("  깻잎  "), "깻잎");
        assert_eq!(shopping_query("다진 소고기"), "다진 소고기");
    }

    #[test]
    fn test_shopping_query_comma_cut() {
        assert_eq!(shopping_query("두부, 부침용"), "두부");
    }

    #[test]
    fn test_shopping_query_digit_fallback() {
        // The first token already contains a digit, so token-keeping fails
        // and the digit-strip fallback applies.
        assert_eq!(shopping_query("애호박200g"), "애호박");
    }

    #[test]
    fn test_format_cook_time() {
        assert_eq!(format_cook_time(Some(10), Some(20)), "10분 ~ 20분");
        assert_eq!(format_cook_time(Some(15), None), "15분");
        assert_eq!(format_cook_time(None, Some(30)), "30분");
        assert_eq!(format_cook_time(None, None), "");
    }

    #[test]
    fn test_normalize_public_dataset_recipe() {
        let view = normalize_recipe(&json!({
            "RCP_NM": "김치찌개",
            "ATT_FILE_NO_MAIN": "http://img/1.jpg",
            "RCP_PARTS_DTLS": "김치, 돼지고기, 두부",
            "MANUAL01": "김치를 볶는다",
            "MANUAL02": "물을 붓고 끓인다",
            "MANUAL03": "",
            "INFO_ENG": 320
        }));
        assert_eq!(view.title, "김치찌개");
        assert_eq!(view.ingredients, vec!["김치", "돼지고기", "두부"]);
        assert_eq!(view.steps, vec!["김치를 볶는다", "물을 붓고 끓인다"]);
        assert_eq!(view.nutrition.as_deref(), Some("320kcal"));
    }

    #[test]
    fn test_normalize_ai_recipe_with_time_range() {
        let view = normalize_recipe(&json!({
            "title": "크림 파스타",
            "description": "면을 삶는다. 소스를 만든다. 버무린다.",
            "difficulty": "보통",
            "cookTimeMin": 20,
            "cookTimeMax": 30
        }));
        assert_eq!(view.title, "크림 파스타");
        assert_eq!(view.steps.len(), 3);
        assert_eq!(view.difficulty.as_deref(), Some("보통"));
        assert_eq!(view.cook_time, "20분 ~ 30분");
    }

    #[test]
    fn test_normalize_tolerates_empty_payload() {
        let view = normalize_recipe(&json!({}));
        assert_eq!(view.title, "제목 없음");
        assert!(view.ingredients.is_empty());
        assert!(view.steps.is_empty());
        assert_eq!(view.cook_time, "");
    }
}
