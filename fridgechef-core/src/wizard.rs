//! AI preference wizard: the draft, the step state machine, and the
//! fixed-order submission sequence.
//!
//! The wizard walks an ordered list of question steps, accumulates a
//! [`PreferenceDraft`], and submits it as one backend session. Which
//! question is shown is decoupled from which network calls fire: the state
//! machine knows nothing about the transport, and the submission sequence
//! in [`Wizard::submit`] is the only place the session endpoints are called.

use serde::Serialize;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::Recommendation;

/// Selecting this allergy chip clears the whole set ("none").
pub const NONE_ALLERGY: &str = "없음";

/// Preference draft accumulated across the wizard steps.
///
/// Single-select fields hold at most one value (empty string = unanswered);
/// `allergies` is a duplicate-free set in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PreferenceDraft {
    pub food_preference: String,
    pub allergies: Vec<String>,
    pub difficulty: String,
    pub meal_time: String,
    pub flavor: String,
    pub weather: String,
    pub ingredients: String,
}

impl PreferenceDraft {
    /// Toggle an allergy chip: present removes, absent adds, "없음" clears.
    pub fn toggle_allergy(&mut self, value: &str) {
        if value == NONE_ALLERGY {
            self.allergies.clear();
            return;
        }
        if let Some(pos) = self.allergies.iter().position(|a| a == value) {
            self.allergies.remove(pos);
        } else {
            self.allergies.push(value.to_string());
        }
    }

    /// Add a free-text allergy; blank input and duplicates are no-ops.
    pub fn add_allergy(&mut self, value: &str) {
        let value = value.trim();
        if value.is_empty() || self.allergies.iter().any(|a| a == value) {
            return;
        }
        self.allergies.push(value.to_string());
    }
}

/// The single-select fields of the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingleSelect {
    FoodPreference,
    Difficulty,
    MealTime,
    Flavor,
    Weather,
}

/// Wizard states: the question screens in order, then the terminal
/// submitting screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    FoodPreference,
    Allergies,
    Difficulty,
    MealTime,
    Flavor,
    Weather,
    Ingredients,
    Submitting,
}

impl WizardStep {
    /// Question screens in display order. `Submitting` is reachable only
    /// through an explicit submit.
    pub const QUESTIONS: &'static [WizardStep] = &[
        WizardStep::FoodPreference,
        WizardStep::Allergies,
        WizardStep::Difficulty,
        WizardStep::MealTime,
        WizardStep::Flavor,
        WizardStep::Weather,
        WizardStep::Ingredients,
    ];

    /// Next question screen; the last question and the terminal state stay
    /// put (plain `next` never enters `Submitting`).
    pub fn next(self) -> WizardStep {
        match self.question_index() {
            Some(i) if i + 1 < Self::QUESTIONS.len() => Self::QUESTIONS[i + 1],
            _ => self,
        }
    }

    /// Previous question screen, floored at the first.
    pub fn prev(self) -> WizardStep {
        match self.question_index() {
            Some(i) if i > 0 => Self::QUESTIONS[i - 1],
            Some(_) => self,
            // Backing out of the terminal state returns to the last input.
            None => WizardStep::Ingredients,
        }
    }

    fn question_index(self) -> Option<usize> {
        Self::QUESTIONS.iter().position(|s| *s == self)
    }

    /// The question shown for this step.
    pub fn prompt(&self) -> &'static str {
        match self {
            WizardStep::FoodPreference => "안녕하세요! 오늘 어떤 음식을 드시고 싶으신가요?",
            WizardStep::Allergies => "알러지는 있으신가요?",
            WizardStep::Difficulty => "요리 난이도는 어떤 걸 원하시나요?",
            WizardStep::MealTime => "식사 시간대는 언제인가요?",
            WizardStep::Flavor => "어떤 맛을 선호하시나요?",
            WizardStep::Weather => "오늘 날씨는 어떤가요?",
            WizardStep::Ingredients => "가지고 있는 재료를 입력해주세요 (예: 달걀, 감자, 치킨)",
            WizardStep::Submitting => "AI가 레시피를 찾는 중…",
        }
    }

    /// Preset choices for this step, if it is chip-based.
    pub fn choices(&self) -> &'static [&'static str] {
        match self {
            WizardStep::FoodPreference => &["한식", "양식", "중식", "일식", "동남아", "그 외"],
            WizardStep::Allergies => {
                &["우유", "계란", "대두", "밀", "갑각류", "견과류", NONE_ALLERGY]
            }
            WizardStep::Difficulty => &["쉬움", "보통", "어려움", "상관없음"],
            WizardStep::MealTime => &["아침", "점심", "저녁", "간식", "그 외"],
            WizardStep::Flavor => {
                &["단맛", "짠맛", "매운맛", "고소함", "담백함", "새콤함", "그 외"]
            }
            WizardStep::Weather => &["맑음", "흐림", "비", "추움", "더움", "그 외"],
            WizardStep::Ingredients | WizardStep::Submitting => &[],
        }
    }
}

/// Events driving the wizard state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardEvent {
    Next,
    Prev,
    /// Replace a single-select value and auto-advance.
    Select(SingleSelect, String),
    ToggleAllergy(String),
    AddAllergy(String),
    SetIngredients(String),
    /// Enter the terminal submitting state (from the ingredients step only).
    Submit,
    /// A failed submission returns to the last input step, not to the start.
    SubmitFailed,
}

/// The wizard: current step plus the draft being accumulated.
///
/// Reopening the wizard means constructing a fresh one; the draft never
/// survives a close.
#[derive(Debug, Clone, Default)]
pub struct Wizard {
    step_state: WizardStep,
    pub draft: PreferenceDraft,
}

impl Default for WizardStep {
    fn default() -> Self {
        WizardStep::FoodPreference
    }
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        self.step_state
    }

    /// Apply one event to the state machine.
    pub fn apply(&mut self, event: WizardEvent) {
        match event {
            WizardEvent::Next => self.step_state = self.step_state.next(),
            WizardEvent::Prev => self.step_state = self.step_state.prev(),
            WizardEvent::Select(field, value) => {
                match field {
                    SingleSelect::FoodPreference => self.draft.food_preference = value,
                    SingleSelect::Difficulty => self.draft.difficulty = value,
                    SingleSelect::MealTime => self.draft.meal_time = value,
                    SingleSelect::Flavor => self.draft.flavor = value,
                    SingleSelect::Weather => self.draft.weather = value,
                }
                self.step_state = self.step_state.next();
            }
            WizardEvent::ToggleAllergy(value) => self.draft.toggle_allergy(&value),
            WizardEvent::AddAllergy(value) => self.draft.add_allergy(&value),
            WizardEvent::SetIngredients(value) => self.draft.ingredients = value,
            WizardEvent::Submit => {
                if self.step_state == WizardStep::Ingredients {
                    self.step_state = WizardStep::Submitting;
                }
            }
            WizardEvent::SubmitFailed => {
                if self.step_state == WizardStep::Submitting {
                    self.step_state = WizardStep::Ingredients;
                }
            }
        }
    }

    /// Validate and submit the draft.
    ///
    /// Validation failures reject before any network call and leave the step
    /// unchanged. A failure during the sequence reverts to the ingredients
    /// step and surfaces a single error; some backend calls may already have
    /// taken effect (accepted inconsistency).
    pub async fn submit(&mut self, client: &ApiClient) -> Result<Vec<Recommendation>, ApiError> {
        if self.draft.ingredients.trim().is_empty() {
            return Err(ApiError::Validation("재료를 입력해주세요".to_string()));
        }
        if !client.session().is_logged_in().await {
            return Err(ApiError::AuthRequired);
        }

        self.apply(WizardEvent::Submit);
        match submit_draft(client, &self.draft).await {
            Ok(recommendations) => Ok(recommendations),
            Err(e) => {
                tracing::warn!(error = %e, "AI recommendation failed");
                self.apply(WizardEvent::SubmitFailed);
                Err(e)
            }
        }
    }
}

/// Run the backend session sequence for a draft.
///
/// The order is a backend contract: start, preference, mealtime, weather,
/// difficulty, flavor, one call per allergy, then ingredients. Empty fields
/// skip their call; any failure aborts the rest.
pub async fn submit_draft(
    client: &ApiClient,
    draft: &PreferenceDraft,
) -> Result<Vec<Recommendation>, ApiError> {
    let session = client.ai_start().await?;
    tracing::debug!(session = %session, "AI session started");

    if !draft.food_preference.is_empty() {
        client
            .ai_set_preference(&session, &draft.food_preference)
            .await?;
    }
    if !draft.meal_time.is_empty() {
        client.ai_set_meal_time(&session, &draft.meal_time).await?;
    }
    if !draft.weather.is_empty() {
        client.ai_set_weather(&session, &draft.weather).await?;
    }
    if !draft.difficulty.is_empty() {
        client.ai_set_difficulty(&session, &draft.difficulty).await?;
    }
    if !draft.flavor.is_empty() {
        client.ai_set_flavor(&session, &draft.flavor).await?;
    }
    for allergy in &draft.allergies {
        client.ai_set_allergy(&session, allergy).await?;
    }

    let payload = client.ai_recommend(&session, &draft.ingredients).await?;
    Ok(Recommendation::list_from_payload(&payload))
}
