//! Mock backend for testing stores without a network, in the spirit of the
//! real thing: enqueue predefined results per endpoint and inspect the exact
//! calls issued afterwards.

use crate::{
    api::{ApiError, ApiResult, NutritionApi},
    LocalFile, MealPlan, Profile,
};
use async_trait::async_trait;
use std::{collections::VecDeque, sync::Mutex};

/// One recorded backend call, in issue order.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    GetUser { user_id: String },
    CreateUser { user_id: String },
    UpdateProfileData { user_id: String, profile: Profile },
    UpdateMedicalConditions { user_id: String, text: String },
    ProcessFile { user_id: String, file_name: String },
    CreateMealPlan { user_id: String },
    GetUserMealPlan { user_id: String },
}

#[derive(Default)]
struct MockApiState {
    get_user_results: VecDeque<ApiResult<Profile>>,
    create_user_results: VecDeque<ApiResult<()>>,
    update_profile_results: VecDeque<ApiResult<()>>,
    update_medical_results: VecDeque<ApiResult<()>>,
    process_file_results: VecDeque<ApiResult<()>>,
    create_meal_plan_results: VecDeque<ApiResult<MealPlan>>,
    get_meal_plan_results: VecDeque<ApiResult<MealPlan>>,
    calls: Vec<ApiCall>,
}

/// A mock [`NutritionApi`] that yields enqueued results and tracks every
/// call. An endpoint invoked without an enqueued result yields a decode
/// error naming the endpoint, so a test failure points at the missing stub.
#[derive(Default)]
pub struct MockApi {
    state: Mutex<MockApiState>,
}

impl MockApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue_get_user(&self, result: ApiResult<Profile>) -> &Self {
        self.state.lock().expect("mock state poisoned").get_user_results.push_back(result);
        self
    }

    pub fn enqueue_create_user(&self, result: ApiResult<()>) -> &Self {
        self.state.lock().expect("mock state poisoned").create_user_results.push_back(result);
        self
    }

    pub fn enqueue_update_profile_data(&self, result: ApiResult<()>) -> &Self {
        self.state.lock().expect("mock state poisoned").update_profile_results.push_back(result);
        self
    }

    pub fn enqueue_update_medical_conditions(&self, result: ApiResult<()>) -> &Self {
        self.state.lock().expect("mock state poisoned").update_medical_results.push_back(result);
        self
    }

    pub fn enqueue_process_file(&self, result: ApiResult<()>) -> &Self {
        self.state.lock().expect("mock state poisoned").process_file_results.push_back(result);
        self
    }

    pub fn enqueue_create_meal_plan(&self, result: ApiResult<MealPlan>) -> &Self {
        self.state.lock().expect("mock state poisoned").create_meal_plan_results.push_back(result);
        self
    }

    pub fn enqueue_get_user_meal_plan(&self, result: ApiResult<MealPlan>) -> &Self {
        self.state.lock().expect("mock state poisoned").get_meal_plan_results.push_back(result);
        self
    }

    /// Every call issued so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<ApiCall> {
        self.state.lock().expect("mock state poisoned").calls.clone()
    }

    /// Clear tracked calls without touching enqueued results.
    pub fn reset(&self) {
        self.state.lock().expect("mock state poisoned").calls.clear();
    }
}

fn missing(endpoint: &str) -> ApiError {
    ApiError::Decode(format!("no mocked {endpoint} results available"))
}

#[async_trait]
impl NutritionApi for MockApi {
    async fn get_user(&self, user_id: &str) -> ApiResult<Profile> {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.calls.push(ApiCall::GetUser {
            user_id: user_id.to_string(),
        });
        state.get_user_results.pop_front().unwrap_or_else(|| Err(missing("get_user")))
    }

    async fn create_user(&self, user_id: &str) -> ApiResult<()> {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.calls.push(ApiCall::CreateUser {
            user_id: user_id.to_string(),
        });
        state.create_user_results.pop_front().unwrap_or_else(|| Err(missing("create_user")))
    }

    async fn update_profile_data(&self, user_id: &str, profile: &Profile) -> ApiResult<()> {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.calls.push(ApiCall::UpdateProfileData {
            user_id: user_id.to_string(),
            profile: profile.clone(),
        });
        state
            .update_profile_results
            .pop_front()
            .unwrap_or_else(|| Err(missing("update_profile_data")))
    }

    async fn update_medical_conditions(&self, user_id: &str, text: &str) -> ApiResult<()> {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.calls.push(ApiCall::UpdateMedicalConditions {
            user_id: user_id.to_string(),
            text: text.to_string(),
        });
        state
            .update_medical_results
            .pop_front()
            .unwrap_or_else(|| Err(missing("update_medical_conditions")))
    }

    async fn process_file(&self, user_id: &str, file: &LocalFile) -> ApiResult<()> {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.calls.push(ApiCall::ProcessFile {
            user_id: user_id.to_string(),
            file_name: file.name.clone(),
        });
        state.process_file_results.pop_front().unwrap_or_else(|| Err(missing("process_file")))
    }

    async fn create_meal_plan(&self, user_id: &str) -> ApiResult<MealPlan> {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.calls.push(ApiCall::CreateMealPlan {
            user_id: user_id.to_string(),
        });
        state
            .create_meal_plan_results
            .pop_front()
            .unwrap_or_else(|| Err(missing("create_meal_plan")))
    }

    async fn get_user_meal_plan(&self, user_id: &str) -> ApiResult<MealPlan> {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.calls.push(ApiCall::GetUserMealPlan {
            user_id: user_id.to_string(),
        });
        state
            .get_meal_plan_results
            .pop_front()
            .unwrap_or_else(|| Err(missing("get_user_meal_plan")))
    }
}
