use crate::{
    api::{ApiError, NutritionApi},
    errors::{api_message, StoreError, StoreResult},
    MealPlan, Profile, WeeklyPlanEntry,
};
use chrono::{Datelike, Local};
use std::sync::{Arc, Mutex};

/// Retrieves the current weekly meal plan and triggers generation of a new
/// one. The stored week is replaced wholesale on every successful fetch or
/// generation, never patched.
pub struct PlanStore {
    api: Arc<dyn NutritionApi>,
    entries: Mutex<Vec<WeeklyPlanEntry>>,
}

impl PlanStore {
    #[must_use]
    pub fn new(api: Arc<dyn NutritionApi>) -> Self {
        Self {
            api,
            entries: Mutex::new(Vec::new()),
        }
    }

    /// The last fetched or generated week. Empty until a plan exists.
    #[must_use]
    pub fn entries(&self) -> Vec<WeeklyPlanEntry> {
        self.entries.lock().expect("plan state poisoned").clone()
    }

    /// Fetch the existing weekly plan. "No plan yet" (backend 404) is a
    /// valid, displayable state and yields an empty week, not an error.
    pub async fn fetch_current(&self, user_id: &str) -> StoreResult<Vec<WeeklyPlanEntry>> {
        match self.api.get_user_meal_plan(user_id).await {
            Ok(plan) => {
                self.replace(plan.plan.clone());
                Ok(plan.plan)
            }
            Err(ApiError::NotFound) => {
                tracing::debug!(user_id, "no meal plan generated yet");
                self.replace(Vec::new());
                Ok(Vec::new())
            }
            Err(error) => {
                Err(StoreError::FetchFailed(api_message(&error, "Failed to get user meal plan")))
            }
        }
    }

    /// Request generation of a new plan. Requires a complete profile with
    /// medical conditions supplied; the precondition is checked here
    /// explicitly and no request is issued when it fails.
    pub async fn generate(&self, user_id: &str, profile: &Profile) -> StoreResult<MealPlan> {
        let has_conditions = profile
            .medical_conditions
            .as_deref()
            .is_some_and(|text| !text.trim().is_empty());
        if profile.is_incomplete() || !has_conditions {
            return Err(StoreError::PrerequisiteMissing);
        }

        let plan = self
            .api
            .create_meal_plan(user_id)
            .await
            .map_err(|error| StoreError::FetchFailed(api_message(&error, "Failed to create meal plan")))?;
        self.replace(plan.plan.clone());
        Ok(plan)
    }

    fn replace(&self, entries: Vec<WeeklyPlanEntry>) {
        *self.entries.lock().expect("plan state poisoned") = entries;
    }
}

/// Monday-first index of today's weekday, 0..=6. Used for highlighting the
/// current plan cell; never affects stored data.
#[must_use]
pub fn today_index() -> usize {
    monday_first_index(Local::now().weekday().num_days_from_sunday())
}

/// Map a Sunday=0..Saturday=6 day-of-week onto a Monday-first 0..=6 index.
#[must_use]
pub fn monday_first_index(day_of_week: u32) -> usize {
    if day_of_week == 0 {
        6
    } else {
        day_of_week as usize - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monday_first_index_pins_the_weekday_mapping() {
        assert_eq!(monday_first_index(0), 6); // Sunday
        assert_eq!(monday_first_index(1), 0); // Monday
        assert_eq!(monday_first_index(2), 1);
        assert_eq!(monday_first_index(5), 4);
        assert_eq!(monday_first_index(6), 5); // Saturday
    }

    #[test]
    fn today_index_is_always_in_range() {
        assert!(today_index() < 7);
    }
}
