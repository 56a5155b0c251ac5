//! The AI recommendation flow: an interactive question loop over the wizard
//! state machine, or a one-shot run when everything is given as flags.

use std::io::{BufRead, Write};

use anyhow::Result;
use clap::Args;

use fridgechef_core::{
    normalize_recipe, rerank, ApiClient, SingleSelect, Wizard, WizardEvent, WizardStep,
};

#[derive(Args)]
pub struct RecommendArgs {
    /// Ingredients on hand, comma separated. Omit to answer interactively.
    #[arg(long)]
    ingredients: Option<String>,
    /// Cuisine preference, e.g. 한식
    #[arg(long)]
    cuisine: Option<String>,
    /// Allergies; repeat the flag for several
    #[arg(long)]
    allergy: Vec<String>,
    /// Cooking difficulty, e.g. 쉬움
    #[arg(long)]
    difficulty: Option<String>,
    /// Meal time, e.g. 저녁
    #[arg(long)]
    meal_time: Option<String>,
    /// Flavor preference, e.g. 매운맛
    #[arg(long)]
    flavor: Option<String>,
    /// Today's weather, e.g. 비
    #[arg(long)]
    weather: Option<String>,
}

pub async fn run(client: &ApiClient, args: RecommendArgs) -> Result<()> {
    let mut wizard = Wizard::new();

    if let Some(ingredients) = &args.ingredients {
        fill_from_flags(&mut wizard, &args, ingredients);
    } else {
        ask_questions(&mut wizard)?;
    }

    println!("{}", WizardStep::Submitting.prompt());
    let recommendations = wizard.submit(client).await?;
    let ranked = rerank(
        recommendations.into_iter().map(|r| r.raw).collect(),
        &wizard.draft,
    );

    if ranked.is_empty() {
        println!("추천 결과가 없습니다. 재료를 바꿔 다시 시도해보세요.");
        return Ok(());
    }
    for (i, item) in ranked.iter().enumerate() {
        let view = normalize_recipe(item);
        println!("\n{}. {}", i + 1, view.title);
        if let Some(url) = &view.image_url {
            println!("   {url}");
        }
        if !view.ingredients.is_empty() {
            println!("   재료: {}", view.ingredients.join(", "));
        }
    }
    Ok(())
}

/// Non-interactive path: every answer comes from flags and the wizard is
/// driven straight to the last step.
fn fill_from_flags(wizard: &mut Wizard, args: &RecommendArgs, ingredients: &str) {
    if let Some(v) = &args.cuisine {
        wizard.apply(WizardEvent::Select(
            SingleSelect::FoodPreference,
            v.clone(),
        ));
    }
    for allergy in &args.allergy {
        wizard.apply(WizardEvent::AddAllergy(allergy.clone()));
    }
    if let Some(v) = &args.difficulty {
        wizard.apply(WizardEvent::Select(SingleSelect::Difficulty, v.clone()));
    }
    if let Some(v) = &args.meal_time {
        wizard.apply(WizardEvent::Select(SingleSelect::MealTime, v.clone()));
    }
    if let Some(v) = &args.flavor {
        wizard.apply(WizardEvent::Select(SingleSelect::Flavor, v.clone()));
    }
    if let Some(v) = &args.weather {
        wizard.apply(WizardEvent::Select(SingleSelect::Weather, v.clone()));
    }
    wizard.apply(WizardEvent::SetIngredients(ingredients.to_string()));
    while wizard.step() != WizardStep::Ingredients {
        wizard.apply(WizardEvent::Next);
    }
}

/// Interactive path: walk the question steps, reading one answer per prompt.
///
/// A number picks a chip, free text is taken as-is where the step allows it,
/// an empty line skips the question, and "b" goes back.
fn ask_questions(wizard: &mut Wizard) -> Result<()> {
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        let step = wizard.step();
        println!("\n{}", step.prompt());
        let choices = step.choices();
        for (i, choice) in choices.iter().enumerate() {
            println!("  {}) {choice}", i + 1);
        }
        match step {
            WizardStep::Allergies => {
                if !wizard.draft.allergies.is_empty() {
                    println!("  선택됨: {}", wizard.draft.allergies.join(", "));
                }
                println!("  (번호로 선택/해제, 직접 입력 가능, 빈 줄이면 다음으로)");
            }
            WizardStep::Ingredients => {}
            _ => println!("  (번호 또는 직접 입력, 빈 줄이면 건너뛰기, b는 이전으로)"),
        }
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else {
            // stdin closed mid-wizard; treat remaining questions as skipped.
            while wizard.step() != WizardStep::Ingredients {
                wizard.apply(WizardEvent::Next);
            }
            return Ok(());
        };
        let input = line?.trim().to_string();

        if input == "b" {
            wizard.apply(WizardEvent::Prev);
            continue;
        }

        match step {
            WizardStep::Ingredients => {
                wizard.apply(WizardEvent::SetIngredients(input));
                return Ok(());
            }
            WizardStep::Allergies => {
                if input.is_empty() {
                    wizard.apply(WizardEvent::Next);
                } else if let Some(choice) = pick(choices, &input) {
                    wizard.apply(WizardEvent::ToggleAllergy(choice.to_string()));
                } else {
                    wizard.apply(WizardEvent::AddAllergy(input));
                }
            }
            _ => {
                if input.is_empty() {
                    wizard.apply(WizardEvent::Next);
                    continue;
                }
                let value = pick(choices, &input).map(str::to_string).unwrap_or(input);
                if let Some(field) = single_select_field(step) {
                    wizard.apply(WizardEvent::Select(field, value));
                }
            }
        }
    }
}

fn single_select_field(step: WizardStep) -> Option<SingleSelect> {
    match step {
        WizardStep::FoodPreference => Some(SingleSelect::FoodPreference),
        WizardStep::Difficulty => Some(SingleSelect::Difficulty),
        WizardStep::MealTime => Some(SingleSelect::MealTime),
        WizardStep::Flavor => Some(SingleSelect::Flavor),
        WizardStep::Weather => Some(SingleSelect::Weather),
        _ => None,
    }
}

/// Interpret the input as a 1-based chip number.
fn pick<'a>(choices: &'a [&'a str], input: &str) -> Option<&'a str> {
    let index: usize = input.parse().ok()?;
    (1..=choices.len())
        .contains(&index)
        .then(|| choices[index - 1])
}
