use crate::{LocalFile, MealPlan, Profile};
use async_trait::async_trait;
use reqwest::{multipart, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8001";

#[derive(Debug, Error)]
pub enum ApiError {
    /// The requested record does not exist (HTTP 404).
    #[error("Not found")]
    NotFound,
    /// The request to the backend failed or the response body could not be
    /// read.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The backend returned a non-OK status code other than 404.
    #[error("Status error: {1} (Status {0})")]
    Status(StatusCode, String),
    /// The response body did not match the expected shape.
    #[error("Unexpected response body: {0}")]
    Decode(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// The NutriWise backend endpoints the client consumes. Stores depend on this
/// trait rather than on the HTTP transport, so tests can substitute a mock.
#[async_trait]
pub trait NutritionApi: Send + Sync {
    async fn get_user(&self, user_id: &str) -> ApiResult<Profile>;
    async fn create_user(&self, user_id: &str) -> ApiResult<()>;
    async fn update_profile_data(&self, user_id: &str, profile: &Profile) -> ApiResult<()>;
    async fn update_medical_conditions(&self, user_id: &str, text: &str) -> ApiResult<()>;
    async fn process_file(&self, user_id: &str, file: &LocalFile) -> ApiResult<()>;
    async fn create_meal_plan(&self, user_id: &str) -> ApiResult<MealPlan>;
    async fn get_user_meal_plan(&self, user_id: &str) -> ApiResult<MealPlan>;
}

#[derive(Clone, Default)]
pub struct HttpApiOptions {
    /// Base URL of the backend. Defaults to [`DEFAULT_BASE_URL`].
    pub base_url: Option<String>,
    /// Shared `reqwest` client to reuse; a new one is created when absent.
    pub client: Option<Client>,
}

/// `reqwest`-backed implementation of [`NutritionApi`].
pub struct HttpApi {
    base_url: String,
    client: Client,
}

impl HttpApi {
    #[must_use]
    pub fn new(options: HttpApiOptions) -> Self {
        let HttpApiOptions { base_url, client } = options;

        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let client = client.unwrap_or_else(Client::new);

        Self { base_url, client }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl Default for HttpApi {
    fn default() -> Self {
        Self::new(HttpApiOptions::default())
    }
}

/// Map 404 and other error statuses before the body is consumed.
async fn check_status(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound);
    }
    if status.is_client_error() || status.is_server_error() {
        return Err(ApiError::Status(
            status,
            response.text().await.unwrap_or_default(),
        ));
    }
    Ok(response)
}

/// Decode a JSON body, tolerating the legacy double encoding where the
/// backend returns a JSON string that itself contains JSON.
fn decode_json<T: DeserializeOwned>(body: &str) -> ApiResult<T> {
    let value: Value =
        serde_json::from_str(body).map_err(|error| ApiError::Decode(error.to_string()))?;
    let value = match value {
        Value::String(inner) => {
            serde_json::from_str(&inner).map_err(|error| ApiError::Decode(error.to_string()))?
        }
        other => other,
    };
    serde_json::from_value(value).map_err(|error| ApiError::Decode(error.to_string()))
}

#[async_trait]
impl NutritionApi for HttpApi {
    async fn get_user(&self, user_id: &str) -> ApiResult<Profile> {
        let response = self
            .client
            .get(self.url("/api/users/get_user"))
            .query(&[("user_id", user_id)])
            .send()
            .await?;
        let body = check_status(response).await?.text().await?;
        decode_json(&body)
    }

    async fn create_user(&self, user_id: &str) -> ApiResult<()> {
        tracing::debug!(user_id, "creating user record");
        let response = self
            .client
            .post(self.url("/api/users/create_user"))
            .query(&[("user_id", user_id)])
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn update_profile_data(&self, user_id: &str, profile: &Profile) -> ApiResult<()> {
        // The endpoint takes every attribute as a query parameter; unset
        // fields are omitted rather than sent as empty strings.
        let mut query: Vec<(&str, String)> = vec![("user_id", user_id.to_string())];
        if let Some(weight) = profile.weight {
            query.push(("weight", weight.to_string()));
        }
        if let Some(height) = profile.height {
            query.push(("height", height.to_string()));
        }
        if let Some(age) = profile.age {
            query.push(("age", age.to_string()));
        }
        if let Some(sex) = profile.sex {
            query.push(("sex", sex.as_str().to_string()));
        }
        if let Some(goal) = profile.fitness_goal {
            query.push(("fitness_goal", goal.as_str().to_string()));
        }
        if !profile.dietary_preferences.is_empty() {
            query.push(("dietary_preferences", profile.dietary_preferences.clone()));
        }
        if let Some(level) = profile.activity_level {
            query.push(("activity_level", level.as_str().to_string()));
        }

        let response = self
            .client
            .patch(self.url("/api/users/update_profile_data"))
            .query(&query)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn update_medical_conditions(&self, user_id: &str, text: &str) -> ApiResult<()> {
        let response = self
            .client
            .patch(self.url("/api/users/update_medical_conditions"))
            .query(&[("user_id", user_id), ("medical_conditions_text", text)])
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn process_file(&self, user_id: &str, file: &LocalFile) -> ApiResult<()> {
        tracing::debug!(user_id, file = %file.name, size = file.size(), "uploading document");
        let part = multipart::Part::bytes(file.bytes.clone()).file_name(file.name.clone());
        let form = multipart::Form::new().part("uploaded_file", part);

        let response = self
            .client
            .post(self.url("/api/files/process_file"))
            .query(&[("user_id", user_id)])
            .multipart(form)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn create_meal_plan(&self, user_id: &str) -> ApiResult<MealPlan> {
        tracing::debug!(user_id, "requesting meal plan generation");
        let response = self
            .client
            .post(self.url("/api/meal_plans/create_meal_plan"))
            .query(&[("user_id", user_id)])
            .send()
            .await?;
        let body = check_status(response).await?.text().await?;
        decode_json(&body)
    }

    async fn get_user_meal_plan(&self, user_id: &str) -> ApiResult<MealPlan> {
        let response = self
            .client
            .get(self.url("/api/meal_plans/get_user_meal_plan"))
            .query(&[("user_id", user_id)])
            .send()
            .await?;
        let body = check_status(response).await?.text().await?;
        decode_json(&body)
    }
}
