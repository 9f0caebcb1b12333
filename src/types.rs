use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Biological sex as recorded by the backend (`"M"` / `"F"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Sex {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
        }
    }
}

/// Self-reported activity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Sedentary,
    Moderate,
    Active,
}

impl ActivityLevel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sedentary => "sedentary",
            Self::Moderate => "moderate",
            Self::Active => "active",
        }
    }
}

/// The goal the generated plans optimize for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessGoal {
    WeightLoss,
    Maintenance,
    MuscleGain,
}

impl FitnessGoal {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WeightLoss => "weight_loss",
            Self::Maintenance => "maintenance",
            Self::MuscleGain => "muscle_gain",
        }
    }
}

/// A user's profile attributes. Freshly provisioned records have every field
/// unset; the same type doubles as the draft edited by the profile form.
///
/// The backend serializes unset enum fields as either `null` or `""`; both
/// deserialize to `None` here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub age: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub sex: Option<Sex>,
    /// Body weight in kilograms.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub weight: Option<f64>,
    /// Height in centimeters.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub height: Option<f64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub activity_level: Option<ActivityLevel>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub fitness_goal: Option<FitnessGoal>,
    #[serde(default)]
    pub dietary_preferences: String,
    /// Free-text medical conditions, maintained through the upload flow
    /// rather than the profile form.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub medical_conditions: Option<String>,
    /// Computed by the backend from weight and height; read-only here.
    #[serde(default)]
    pub bmi: Option<f64>,
}

/// One day of the weekly meal plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyPlanEntry {
    /// Weekday label, e.g. `"Monday"`.
    #[serde(rename = "meal_slot")]
    pub slot: String,
    pub breakfast: String,
    pub lunch: String,
    pub dinner: String,
    pub snack: String,
    /// Estimated daily macros as free text.
    #[serde(default)]
    pub macros: String,
}

/// A generated weekly plan. The `plan` sequence holds one entry per weekday
/// in week order and is always replaced wholesale, never patched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MealPlan {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub plan: Vec<WeeklyPlanEntry>,
}

/// A file selected or dropped by the user, held in memory until committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub name: String,
    /// Modification timestamp in milliseconds, as reported by the picker.
    pub last_modified: u64,
    pub bytes: Vec<u8>,
}

impl LocalFile {
    #[must_use]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Stable identity used to dedupe repeated selections of the same file.
    #[must_use]
    pub fn upload_id(&self) -> String {
        format!("{}|{}|{}", self.name, self.bytes.len(), self.last_modified)
    }
}

/// Deserialize `null` and `""` as `None`, anything else as the inner type.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: de::DeserializeOwned,
{
    match Option::<Value>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(value) => T::deserialize(value).map(Some).map_err(de::Error::custom),
    }
}
