//! Client-side filtering and re-ranking of result lists.
//!
//! The backend owns the real ranking; this is the display-side pass that
//! drops results conflicting with the user's allergies and floats results
//! matching more of their keywords, keeping the backend order for ties.

use serde_json::Value;

use crate::models::RecipeSummary;
use crate::normalize::split_ingredients;
use crate::wizard::{PreferenceDraft, NONE_ALLERGY};

/// Filter out allergy conflicts, then stable-sort by descending keyword
/// match count.
pub fn rerank(items: Vec<Value>, draft: &PreferenceDraft) -> Vec<Value> {
    let allergies: Vec<&str> = draft
        .allergies
        .iter()
        .map(String::as_str)
        .filter(|a| *a != NONE_ALLERGY && !a.trim().is_empty())
        .collect();

    let mut keywords: Vec<String> = split_ingredients(&draft.ingredients);
    for single in [
        &draft.food_preference,
        &draft.meal_time,
        &draft.flavor,
        &draft.weather,
    ] {
        if !single.trim().is_empty() {
            keywords.push(single.clone());
        }
    }

    let mut scored: Vec<(usize, Value)> = items
        .into_iter()
        .filter_map(|item| {
            let text = searchable_text(&item);
            if allergies.iter().any(|a| text.contains(a)) {
                return None;
            }
            let score = keywords.iter().filter(|k| text.contains(k.as_str())).count();
            Some((score, item))
        })
        .collect();

    // Vec::sort_by is stable, so equal scores keep the backend's order.
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, item)| item).collect()
}

fn searchable_text(item: &Value) -> String {
    let summary = RecipeSummary::new(item.clone());
    let mut text = summary.title().to_string();
    if let Some(ingredients) = summary.ingredients_text() {
        text.push(' ');
        text.push_str(ingredients);
    }
    if let Some(description) = summary.description_text() {
        text.push(' ');
        text.push_str(description);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft(ingredients: &str, allergies: &[&str]) -> PreferenceDraft {
        PreferenceDraft {
            ingredients: ingredients.to_string(),
            allergies: allergies.iter().map(|s| s.to_string()).collect(),
            ..PreferenceDraft::default()
        }
    }

    #[test]
    fn test_allergy_conflicts_are_dropped() {
        let items = vec![
            json!({ "title": "계란찜", "ingredients": "계란, 파" }),
            json!({ "title": "감자조림", "ingredients": "감자, 간장" }),
        ];
        let ranked = rerank(items, &draft("감자", &["계란"]));
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0]["title"], "감자조림");
    }

    #[test]
    fn test_more_matches_rank_first() {
        let items = vec![
            json!({ "title": "파전", "ingredients": "파, 밀가루" }),
            json!({ "title": "감자양파볶음", "ingredients": "감자, 양파" }),
        ];
        let ranked = rerank(items, &draft("감자, 양파", &[]));
        assert_eq!(ranked[0]["title"], "감자양파볶음");
        assert_eq!(ranked[1]["title"], "파전");
    }

    #[test]
    fn test_ties_keep_original_order() {
        let items = vec![
            json!({ "title": "첫번째", "ingredients": "감자" }),
            json!({ "title": "두번째", "ingredients": "감자" }),
            json!({ "title": "세번째", "ingredients": "감자" }),
        ];
        let ranked = rerank(items.clone(), &draft("감자", &[]));
        assert_eq!(ranked[0]["title"], "첫번째");
        assert_eq!(ranked[1]["title"], "두번째");
        assert_eq!(ranked[2]["title"], "세번째");
    }

    #[test]
    fn test_none_allergy_marker_does_not_filter() {
        let items = vec![json!({ "title": "없음도 포함된 제목" })];
        let ranked = rerank(items, &draft("", &[NONE_ALLERGY]));
        assert_eq!(ranked.len(), 1);
    }
}
