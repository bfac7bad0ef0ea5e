//! Deterministic health metric formulas.
//!
//! The agent runtime exposes these same calculations as tools and is
//! instructed to base every recommendation on them, so the arithmetic here
//! must match what the runtime computes to the digit. Pure functions, no
//! failure modes: unknown activity levels and gender values fall back
//! instead of erroring.

use serde::Serialize;

/// Metric equivalents of an imperial height/weight pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metric {
    pub height_m: f64,
    pub weight_kg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BmiResult {
    pub bmi: f64,
    pub category: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacroBreakdown {
    pub protein_g: i64,
    pub carbs_g: i64,
    pub fat_g: i64,
    pub protein_calories: i64,
    pub carbs_calories: i64,
    pub fat_calories: i64,
    pub total_calories: i64,
    pub protein_percentage: i64,
    pub carb_percentage: i64,
    pub fat_percentage: i64,
}

pub fn imperial_to_metric(weight_lbs: f64, height_feet: i32, height_inches: f64) -> Metric {
    let total_inches = (height_feet * 12) as f64 + height_inches;
    Metric {
        height_m: total_inches * 0.0254,
        weight_kg: weight_lbs * 0.453592,
    }
}

/// Category buckets are half-open: 25.0 is already "Overweight".
pub fn bmi_category(bmi: f64) -> &'static str {
    if bmi < 18.5 {
        "Underweight"
    } else if bmi < 25.0 {
        "Normal weight"
    } else if bmi < 30.0 {
        "Overweight"
    } else {
        "Obese"
    }
}

pub fn calculate_bmi(weight_lbs: f64, height_feet: i32, height_inches: f64) -> BmiResult {
    let metric = imperial_to_metric(weight_lbs, height_feet, height_inches);
    let bmi = (metric.weight_kg / (metric.height_m * metric.height_m) * 10.0).round() / 10.0;
    BmiResult {
        bmi,
        category: bmi_category(bmi),
    }
}

/// Mifflin-St Jeor basal metabolic rate, calories/day.
///
/// Gender matching is case-insensitive; anything other than male/female
/// gets the mean of both formulas. Truncated, not rounded.
pub fn calculate_bmr(
    weight_lbs: f64,
    height_feet: i32,
    height_inches: f64,
    age: i32,
    gender: &str,
) -> i64 {
    let metric = imperial_to_metric(weight_lbs, height_feet, height_inches);
    let base = 10.0 * metric.weight_kg + 6.25 * metric.height_m * 100.0 - 5.0 * age as f64;
    let male_bmr = base + 5.0;
    let female_bmr = base - 161.0;

    match gender.to_lowercase().as_str() {
        "male" => male_bmr as i64,
        "female" => female_bmr as i64,
        _ => ((male_bmr + female_bmr) / 2.0) as i64,
    }
}

/// Total daily energy expenditure. Unrecognized activity levels fall back
/// to the moderate multiplier rather than failing.
pub fn calculate_tdee(bmr: i64, activity_level: &str) -> f64 {
    let multiplier = match activity_level.to_lowercase().as_str() {
        "sedentary" => 1.2,
        "light" => 1.375,
        "moderate" => 1.55,
        "active" => 1.725,
        "very_active" => 1.9,
        _ => 1.55,
    };
    bmr as f64 * multiplier
}

/// Adjust TDEE for the fitness goal: 20% deficit to lose, 15% surplus to
/// gain, unchanged otherwise.
pub fn calorie_goal(tdee: f64, goal: &str) -> f64 {
    match goal {
        "lose_weight" => tdee * 0.8,
        "gain_weight" => tdee * 1.15,
        _ => tdee,
    }
}

/// Daily macro targets for the goal-adjusted calorie budget.
///
/// Protein scales with body weight, fat is a fixed share of calories, and
/// carbs absorb the remainder. The remainder can go negative when protein
/// plus fat exceed the budget (very heavy user, steep deficit); that is
/// deliberately left unclamped and surfaced as-is.
pub fn calculate_macros(tdee: f64, goal: &str, weight_lbs: f64) -> MacroBreakdown {
    let calories = calorie_goal(tdee, goal);

    let (protein_per_lb, fat_ratio) = match goal {
        "lose_weight" => (1.1, 0.27),
        "gain_weight" => (0.9, 0.25),
        _ => (1.0, 0.27),
    };

    let protein_grams = weight_lbs * protein_per_lb;
    let protein_calories = protein_grams * 4.0;

    let fat_calories = calories * fat_ratio;
    let fat_grams = fat_calories / 9.0;

    let carbs_calories = calories - (protein_calories + fat_calories);
    let carbs_grams = carbs_calories / 4.0;

    MacroBreakdown {
        protein_g: protein_grams.round() as i64,
        carbs_g: carbs_grams.round() as i64,
        fat_g: fat_grams.round() as i64,
        protein_calories: protein_calories.round() as i64,
        carbs_calories: carbs_calories.round() as i64,
        fat_calories: fat_calories.round() as i64,
        total_calories: calories.round() as i64,
        protein_percentage: (protein_calories / calories * 100.0).round() as i64,
        carb_percentage: (carbs_calories / calories * 100.0).round() as i64,
        fat_percentage: (fat_calories / calories * 100.0).round() as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn converts_imperial_to_metric() {
        let metric = imperial_to_metric(150.0, 5, 8.0);
        assert!((metric.height_m - 68.0 * 0.0254).abs() < 1e-9);
        assert!((metric.weight_kg - 68.0388).abs() < 1e-4);
    }

    #[test]
    fn bmi_category_boundaries_are_exact() {
        assert_eq!(bmi_category(18.4), "Underweight");
        assert_eq!(bmi_category(18.5), "Normal weight");
        assert_eq!(bmi_category(24.999), "Normal weight");
        assert_eq!(bmi_category(25.0), "Overweight");
        assert_eq!(bmi_category(29.999), "Overweight");
        assert_eq!(bmi_category(30.0), "Obese");
    }

    #[test]
    fn bmi_is_monotonic_in_weight_and_height() {
        let mut previous = 0.0;
        for weight in (100..=300).step_by(10) {
            let result = calculate_bmi(weight as f64, 5, 8.0);
            assert!(result.bmi >= previous);
            previous = result.bmi;
        }

        let shorter = calculate_bmi(170.0, 5, 4.0);
        let taller = calculate_bmi(170.0, 6, 2.0);
        assert!(taller.bmi <= shorter.bmi);
    }

    #[test]
    fn bmi_rounds_to_one_decimal() {
        let result = calculate_bmi(150.0, 5, 8.0);
        assert_eq!(result.bmi, 22.8);
        assert_eq!(result.category, "Normal weight");
    }

    #[test]
    fn bmr_gender_constants_differ_by_166() {
        let male = calculate_bmr(150.0, 5, 8.0, 30, "male");
        let female = calculate_bmr(150.0, 5, 8.0, 30, "female");
        assert_eq!(male - female, 166);
        assert_eq!(male, 1614);
        assert_eq!(female, 1448);
    }

    #[test]
    fn bmr_gender_match_is_case_insensitive() {
        assert_eq!(
            calculate_bmr(150.0, 5, 8.0, 30, "MALE"),
            calculate_bmr(150.0, 5, 8.0, 30, "male")
        );
        assert_eq!(
            calculate_bmr(150.0, 5, 8.0, 30, "Female"),
            calculate_bmr(150.0, 5, 8.0, 30, "female")
        );
    }

    #[test]
    fn bmr_other_gender_is_truncated_mean() {
        // raw male 1614.888, raw female 1448.888, mean 1531.888
        assert_eq!(calculate_bmr(150.0, 5, 8.0, 30, "nonbinary"), 1531);
    }

    #[test]
    fn tdee_unknown_level_falls_back_to_moderate() {
        assert_eq!(
            calculate_tdee(1750, "unknown_level"),
            calculate_tdee(1750, "moderate")
        );
        assert_eq!(calculate_tdee(1750, "moderate"), 2712.5);
        assert_eq!(calculate_tdee(1750, "VERY_ACTIVE"), 1750.0 * 1.9);
    }

    #[test]
    fn calorie_goal_adjusts_by_goal() {
        assert_eq!(calorie_goal(2500.0, "lose_weight"), 2000.0);
        assert_eq!(calorie_goal(2000.0, "gain_weight"), 2300.0);
        assert_eq!(calorie_goal(2200.0, "maintain"), 2200.0);
        assert_eq!(calorie_goal(2200.0, "anything_else"), 2200.0);
    }

    #[test]
    fn macros_for_weight_loss() {
        let macros = calculate_macros(2500.0, "lose_weight", 170.0);
        assert_eq!(macros.total_calories, 2000);
        assert_eq!(macros.protein_g, 187); // 170 * 1.1
        assert_eq!(macros.protein_calories, 748);
        assert_eq!(macros.fat_calories, 540); // 27% of 2000
        assert_eq!(macros.fat_g, 60);
        assert_eq!(macros.carbs_calories, 712);
        assert_eq!(macros.carbs_g, 178);
    }

    #[test]
    fn macro_calories_reconstruct_total_within_rounding() {
        for goal in ["lose_weight", "gain_weight", "maintain"] {
            let macros = calculate_macros(2712.5, goal, 180.0);
            let sum = macros.protein_calories + macros.carbs_calories + macros.fat_calories;
            assert!(
                (sum - macros.total_calories).abs() <= 2,
                "goal {goal}: {sum} vs {}",
                macros.total_calories
            );
        }
    }

    #[test]
    fn macro_percentages_sum_near_100() {
        // Independently rounded, so the sum is not guaranteed to be exactly 100.
        let macros = calculate_macros(2500.0, "lose_weight", 170.0);
        let sum = macros.protein_percentage + macros.carb_percentage + macros.fat_percentage;
        assert!((sum - 100).abs() <= 2, "percentage sum was {sum}");
    }

    #[test]
    fn carb_calories_can_go_negative_unclamped() {
        // 330 g protein alone exceeds an 800 calorie budget.
        let macros = calculate_macros(1000.0, "lose_weight", 300.0);
        assert_eq!(macros.total_calories, 800);
        assert_eq!(macros.carbs_calories, -736);
        assert_eq!(macros.carbs_g, -184);
    }
}
