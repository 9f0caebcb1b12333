use crate::{
    api::{ApiError, NutritionApi},
    errors::{api_message, StoreError, StoreResult},
    Profile,
};
use std::{
    collections::BTreeMap,
    fmt,
    sync::{Arc, Mutex},
    time::Duration,
};

/// How long the view should show transient "Saved!" feedback.
pub const SAVED_FEEDBACK: Duration = Duration::from_millis(1800);

/// Wait between provisioning a new profile record and retrying the load,
/// tolerating the backend's read-after-write lag.
pub const CREATE_USER_RETRY_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ProfileField {
    Age,
    Sex,
    Weight,
    Height,
    ActivityLevel,
    FitnessGoal,
    DietaryPreferences,
}

impl ProfileField {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Sex => "sex",
            Self::Weight => "weight",
            Self::Height => "height",
            Self::ActivityLevel => "activity_level",
            Self::FitnessGoal => "fitness_goal",
            Self::DietaryPreferences => "dietary_preferences",
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field name to error message mapping produced by [`validate`]. Empty when
/// the draft is acceptable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<ProfileField, String>);

impl ValidationErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn get(&self, field: ProfileField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProfileField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    fn insert(&mut self, field: ProfileField, message: &str) {
        self.0.insert(field, message.to_string());
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Check a profile draft against the form constraints. Pure; suitable for
/// running on every keystroke without touching the network.
#[must_use]
pub fn validate(draft: &Profile) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    match draft.age {
        None => errors.insert(ProfileField::Age, "Age is required"),
        Some(age) if !(12..=120).contains(&age) => {
            errors.insert(ProfileField::Age, "Age must be between 12 and 120");
        }
        Some(_) => {}
    }

    if draft.sex.is_none() {
        errors.insert(ProfileField::Sex, "Sex is required");
    }

    match draft.weight {
        None => errors.insert(ProfileField::Weight, "Weight is required"),
        Some(weight) if !(30.0..=300.0).contains(&weight) => {
            errors.insert(ProfileField::Weight, "Weight must be between 30 and 300 kg");
        }
        Some(_) => {}
    }

    match draft.height {
        None => errors.insert(ProfileField::Height, "Height is required"),
        Some(height) if !(100.0..=250.0).contains(&height) => {
            errors.insert(ProfileField::Height, "Height must be between 100 and 250 cm");
        }
        Some(_) => {}
    }

    if draft.activity_level.is_none() {
        errors.insert(ProfileField::ActivityLevel, "Activity level is required");
    }
    if draft.fitness_goal.is_none() {
        errors.insert(ProfileField::FitnessGoal, "Fitness goal is required");
    }
    if draft.dietary_preferences.trim().is_empty() {
        errors.insert(ProfileField::DietaryPreferences, "Dietary preferences are required");
    }

    errors
}

impl Profile {
    /// True while any required field is unset. Medical conditions and the
    /// backend-derived BMI do not count toward completeness.
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        self.age.is_none()
            || self.sex.is_none()
            || self.weight.is_none()
            || self.height.is_none()
            || self.activity_level.is_none()
            || self.fitness_goal.is_none()
            || self.dietary_preferences.trim().is_empty()
    }
}

/// Fetches, validates, and persists a user's profile. The cached profile is
/// only ever replaced on a successful load or save; failures leave it as it
/// was.
pub struct ProfileStore {
    api: Arc<dyn NutritionApi>,
    profile: Mutex<Option<Profile>>,
    retry_delay: Duration,
}

impl ProfileStore {
    #[must_use]
    pub fn new(api: Arc<dyn NutritionApi>) -> Self {
        Self {
            api,
            profile: Mutex::new(None),
            retry_delay: CREATE_USER_RETRY_DELAY,
        }
    }

    /// Override the provisioning retry delay. Tests pass `Duration::ZERO`.
    #[must_use]
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// The last successfully loaded or saved profile, if any.
    #[must_use]
    pub fn profile(&self) -> Option<Profile> {
        self.profile.lock().expect("profile state poisoned").clone()
    }

    /// Fetch the profile. A missing record is provisioned via `create_user`
    /// and the load retried exactly once after [`CREATE_USER_RETRY_DELAY`].
    pub async fn load(&self, user_id: &str) -> StoreResult<Profile> {
        match self.api.get_user(user_id).await {
            Ok(profile) => Ok(self.store(profile)),
            Err(ApiError::NotFound) => {
                tracing::debug!(user_id, "profile not found, provisioning a new record");
                self.api
                    .create_user(user_id)
                    .await
                    .map_err(|error| StoreError::FetchFailed(api_message(&error, "Failed to create user")))?;
                tokio::time::sleep(self.retry_delay).await;
                match self.api.get_user(user_id).await {
                    Ok(profile) => Ok(self.store(profile)),
                    Err(ApiError::NotFound) => Err(StoreError::NotFound),
                    Err(error) => {
                        Err(StoreError::FetchFailed(api_message(&error, "Failed to fetch profile")))
                    }
                }
            }
            Err(error) => Err(StoreError::FetchFailed(api_message(&error, "Failed to fetch profile"))),
        }
    }

    /// Validate and persist a draft. Validation errors short-circuit before
    /// any network call and are returned unchanged; a backend failure leaves
    /// both the draft and the cached profile unpersisted.
    pub async fn save(&self, user_id: &str, draft: &Profile) -> StoreResult<()> {
        let errors = validate(draft);
        if !errors.is_empty() {
            return Err(StoreError::Validation(errors));
        }

        self.api
            .update_profile_data(user_id, draft)
            .await
            .map_err(|error| StoreError::SaveFailed(api_message(&error, "Failed to update profile")))?;

        *self.profile.lock().expect("profile state poisoned") = Some(draft.clone());
        tracing::debug!(user_id, "profile saved");
        Ok(())
    }

    fn store(&self, profile: Profile) -> Profile {
        *self.profile.lock().expect("profile state poisoned") = Some(profile.clone());
        profile
    }
}
