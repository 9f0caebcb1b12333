mod common;

use common::{complete_profile, week_plan};
use nutriwise_client::{
    testing::{ApiCall, MockApi},
    ApiError, PlanStore, Profile, StatusCode, StoreError,
};
use std::sync::Arc;

#[tokio::test]
async fn no_plan_yet_is_an_empty_week_not_an_error() {
    let api = Arc::new(MockApi::new());
    api.enqueue_get_user_meal_plan(Err(ApiError::NotFound));
    let plans = PlanStore::new(api.clone());

    let entries = plans.fetch_current("u1").await.unwrap();
    assert!(entries.is_empty());
    assert!(plans.entries().is_empty());
}

#[tokio::test]
async fn fetch_replaces_the_stored_week_wholesale() {
    let api = Arc::new(MockApi::new());
    api.enqueue_get_user_meal_plan(Ok(week_plan("Week A")))
        .enqueue_get_user_meal_plan(Ok(week_plan("Week B")));
    let plans = PlanStore::new(api.clone());

    plans.fetch_current("u1").await.unwrap();
    let first = plans.entries();
    plans.fetch_current("u1").await.unwrap();

    assert_eq!(first.len(), 7);
    assert_eq!(plans.entries().len(), 7);
    assert_eq!(plans.entries(), week_plan("Week B").plan);
}

#[tokio::test]
async fn fetch_failure_keeps_the_previous_week() {
    let api = Arc::new(MockApi::new());
    api.enqueue_get_user_meal_plan(Ok(week_plan("Week A")))
        .enqueue_get_user_meal_plan(Err(ApiError::Status(
            StatusCode::INTERNAL_SERVER_ERROR,
            String::new(),
        )));
    let plans = PlanStore::new(api.clone());

    plans.fetch_current("u1").await.unwrap();
    let error = plans.fetch_current("u1").await.unwrap_err();

    assert!(matches!(error, StoreError::FetchFailed(_)));
    assert_eq!(plans.entries(), week_plan("Week A").plan);
}

#[tokio::test]
async fn generate_requires_a_complete_profile() {
    let api = Arc::new(MockApi::new());
    let plans = PlanStore::new(api.clone());

    let error = plans.generate("u1", &Profile::default()).await.unwrap_err();
    assert!(matches!(error, StoreError::PrerequisiteMissing));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn generate_requires_medical_conditions() {
    let api = Arc::new(MockApi::new());
    let plans = PlanStore::new(api.clone());

    let mut profile = complete_profile();
    profile.medical_conditions = Some("   ".to_string());

    let error = plans.generate("u1", &profile).await.unwrap_err();
    assert!(matches!(error, StoreError::PrerequisiteMissing));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn generate_stores_the_new_week() {
    let api = Arc::new(MockApi::new());
    api.enqueue_create_meal_plan(Ok(week_plan("Fresh")));
    let plans = PlanStore::new(api.clone());

    let plan = plans.generate("u1", &complete_profile()).await.unwrap();
    assert_eq!(plan.name.as_deref(), Some("Fresh"));
    assert_eq!(plans.entries(), week_plan("Fresh").plan);
    assert_eq!(
        api.calls(),
        vec![ApiCall::CreateMealPlan {
            user_id: "u1".to_string()
        }]
    );
}

#[tokio::test]
async fn generate_failure_keeps_the_previous_week() {
    let api = Arc::new(MockApi::new());
    api.enqueue_get_user_meal_plan(Ok(week_plan("Week A")))
        .enqueue_create_meal_plan(Err(ApiError::Status(
            StatusCode::INTERNAL_SERVER_ERROR,
            String::new(),
        )));
    let plans = PlanStore::new(api.clone());

    plans.fetch_current("u1").await.unwrap();
    let error = plans.generate("u1", &complete_profile()).await.unwrap_err();

    assert_eq!(error.to_string(), "Failed to create meal plan");
    assert_eq!(plans.entries(), week_plan("Week A").plan);
}
