//! Prompt templates for the two-phase plan generation protocol.
//!
//! Phase one is a free-form analysis prompt that embeds the full profile
//! and walks the model through the calculation tools; phase two pins the
//! exact JSON shape the assembler expects. The separation matters: the
//! model reasons better unconstrained and is only then held to a schema.

use crate::models::UserProfile;

const NOT_PROVIDED: &str = "Not provided";

/// The rendered prompt set for one generation request
#[derive(Debug, Clone)]
pub struct PromptBundle {
    pub system: String,
    pub analysis: String,
    pub structuring: String,
}

impl PromptBundle {
    pub fn for_profile(profile: &UserProfile) -> Self {
        Self {
            system: system_prompt().to_string(),
            analysis: analysis_prompt(profile),
            structuring: structuring_prompt().to_string(),
        }
    }
}

pub fn system_prompt() -> &'static str {
    "You are FitAgent, an expert fitness trainer and nutritionist with 10+ years of experience.

PERSONALITY:
- Encouraging and motivational
- Evidence-based recommendations
- Practical and realistic advice
- Supportive but honest about challenges

AVAILABLE TOOLS:
- calculate_bmi: Calculate BMI and health category
- calculate_bmr: Calculate basal metabolic rate
- calculate_tdee: Calculate total daily energy expenditure
- calculate_macros: Calculate optimal protein/carbs/fat targets

WORKFLOW:
1. ALWAYS use calculation tools to get accurate user metrics
2. Base all recommendations on scientific calculations
3. Create realistic, achievable plans
4. Explain your reasoning clearly
5. Provide structured workout and meal plans"
}

fn display_i32(value: Option<i32>) -> String {
    value.map_or_else(|| NOT_PROVIDED.to_string(), |v| v.to_string())
}

fn display_f64(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_PROVIDED.to_string(), |v| v.to_string())
}

fn display_str(value: Option<&str>) -> String {
    value.map_or_else(|| NOT_PROVIDED.to_string(), |v| v.to_string())
}

/// Phase one: free-form analysis. Every profile field appears, missing
/// values rendered as an explicit sentinel rather than omitted.
pub fn analysis_prompt(profile: &UserProfile) -> String {
    format!(
        "Analyze this user's fitness profile and create a comprehensive plan using your calculation tools:

USER PROFILE:
- Age: {age}
- Weight: {weight} lbs
- Height: {feet}'{inches}\"
- Gender: {gender}
- Fitness Goal: {goal}
- Activity Level: {activity}
- Workout Days/Week: {days}
- Workout Duration: {duration} minutes
- Available Equipment: {equipment:?}
- Dietary Preferences: {dietary:?}

ANALYSIS STEPS:
1. Calculate BMI and assess health status
2. Calculate BMR for baseline metabolism
3. Calculate TDEE for daily calorie needs
4. Calculate optimal macro targets (protein/carbs/fat)
5. Design specific workout routines for their goals and equipment
6. Create detailed meal planning recommendations
7. Identify key success strategies and potential challenges

Provide a thorough analysis with all calculations, specific workout details, meal suggestions, and practical advice. Be comprehensive - this analysis will be structured later.",
        age = display_i32(profile.age),
        weight = display_f64(profile.weight_lbs),
        feet = display_i32(profile.height_feet),
        inches = profile.height_inches.unwrap_or(0.0),
        gender = display_str(profile.gender.as_deref()),
        goal = display_str(profile.fitness_goal.as_deref()),
        activity = profile.activity_level.as_deref().unwrap_or("moderate"),
        days = profile.workout_days_per_week.unwrap_or(3),
        duration = profile.workout_duration_minutes.unwrap_or(45),
        equipment = profile.available_equipment.0,
        dietary = profile.dietary_preferences.0,
    )
}

/// Phase two: structure the analysis. The JSON shape here is the wire
/// contract the assembler validates against; key names must not drift.
pub fn structuring_prompt() -> &'static str {
    r#"CRITICAL: Format your response as a valid JSON object with EXACTLY these keys and structure:

{
    "health_metrics": {
        "bmi": number,
        "bmr": number,
        "tdee": number,
        "target_calories": number,
        "macro_targets": {"protein_g": number, "carbs_g": number, "fat_g": number}
    },
    "workout_plan": {
        "monday": {
            "workout_type": "string",
            "exercises": [
                {"name": "string", "sets": number, "reps": "string", "notes": "string"}
            ],
            "duration_minutes": number
        },
        "tuesday": null,
        "wednesday": null,
        "thursday": {
            "workout_type": "string",
            "exercises": [
                {"name": "string", "sets": number, "reps": "string", "notes": "string"}
            ],
            "duration_minutes": number
        },
        "friday": null,
        "saturday": null,
        "sunday": null,
        "weekly_summary": "string"
    },
    "meal_plan": {
        "day_meal": {
            "breakfast": {"name": "string", "calories": number, "protein_g": number, "carbs_g": number, "fat_g": number, "ingredients": ["string"], "preparation": "string"},
            "lunch": {"name": "string", "calories": number, "protein_g": number, "carbs_g": number, "fat_g": number, "ingredients": ["string"], "preparation": "string"},
            "dinner": {"name": "string", "calories": number, "protein_g": number, "carbs_g": number, "fat_g": number, "ingredients": ["string"], "preparation": "string"},
            "snacks": [{"name": "string", "calories": number, "protein_g": number, "carbs_g": number, "fat_g": number}]
        },
        "weekly_summary": "string",
        "daily_targets": {"calories": number, "protein_g": number, "carbs_g": number, "fat_g": number}
    },
    "tips": ["string", "string", "string", "string", "string"]
}

RULES:
- Use EXACT key names shown above
- Include ALL required fields
- Use null for rest days
- Numbers must be actual numbers, not strings
- Follow the exact structure - no extra nesting"#
}
