use nutriwise_client::{
    ActivityLevel, FitnessGoal, MealPlan, Profile, Sex, WeeklyPlanEntry,
};

pub fn complete_profile() -> Profile {
    Profile {
        age: Some(28),
        sex: Some(Sex::Male),
        weight: Some(80.0),
        height: Some(182.0),
        activity_level: Some(ActivityLevel::Active),
        fitness_goal: Some(FitnessGoal::MuscleGain),
        dietary_preferences: "high protein".to_string(),
        medical_conditions: Some("none reported".to_string()),
        bmi: Some(24.2),
    }
}

pub fn week_plan(name: &str) -> MealPlan {
    let days = [
        "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
    ];
    MealPlan {
        name: Some(name.to_string()),
        description: Some("A balanced week".to_string()),
        plan: days
            .iter()
            .map(|day| WeeklyPlanEntry {
                slot: (*day).to_string(),
                breakfast: "Oatmeal".to_string(),
                lunch: "Chicken salad".to_string(),
                dinner: "Salmon and rice".to_string(),
                snack: "Greek yogurt".to_string(),
                macros: "2200 kcal".to_string(),
            })
            .collect(),
    }
}
