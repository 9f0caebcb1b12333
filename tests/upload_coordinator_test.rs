use nutriwise_client::{
    testing::{ApiCall, MockApi},
    ApiError, LocalFile, StatusCode, StoreError, UploadCoordinator,
};
use std::sync::Arc;

fn file(name: &str) -> LocalFile {
    LocalFile {
        name: name.to_string(),
        last_modified: 1_700_000_000_000,
        bytes: vec![1, 2, 3],
    }
}

#[tokio::test]
async fn commit_without_a_session_makes_no_network_call() {
    let api = Arc::new(MockApi::new());
    let uploads = UploadCoordinator::new(api.clone());
    uploads.enqueue(file("report.pdf"));

    let error = uploads.commit(None, "diabetes").await.unwrap_err();
    assert!(matches!(error, StoreError::NotAuthenticated));
    assert!(api.calls().is_empty());
    assert_eq!(uploads.pending().len(), 1);
}

#[tokio::test]
async fn commit_with_two_pending_files_is_refused_with_zero_network_calls() {
    let api = Arc::new(MockApi::new());
    let uploads = UploadCoordinator::new(api.clone());
    uploads.enqueue(file("a.pdf"));
    uploads.enqueue(file("b.pdf"));

    let error = uploads.commit(Some("u1"), "diabetes").await.unwrap_err();
    assert!(matches!(error, StoreError::TooManyFiles));
    assert!(api.calls().is_empty());
    assert_eq!(uploads.pending().len(), 2);
}

#[tokio::test]
async fn blank_text_and_empty_queue_succeed_trivially() {
    let api = Arc::new(MockApi::new());
    let uploads = UploadCoordinator::new(api.clone());

    uploads.commit(Some("u1"), "   ").await.unwrap();
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn medical_conditions_failure_aborts_before_the_upload() {
    let api = Arc::new(MockApi::new());
    api.enqueue_update_medical_conditions(Err(ApiError::Status(
        StatusCode::INTERNAL_SERVER_ERROR,
        String::new(),
    )));
    let uploads = UploadCoordinator::new(api.clone());
    uploads.enqueue(file("report.pdf"));

    let error = uploads.commit(Some("u1"), "diabetes").await.unwrap_err();
    assert_eq!(error.to_string(), "Failed to save medical conditions");
    assert_eq!(
        api.calls(),
        vec![ApiCall::UpdateMedicalConditions {
            user_id: "u1".to_string(),
            text: "diabetes".to_string(),
        }]
    );
    // The queue survives a failed commit so the user can retry.
    assert_eq!(uploads.pending().len(), 1);
}

#[tokio::test]
async fn upload_failure_is_surfaced_and_keeps_the_queue() {
    let api = Arc::new(MockApi::new());
    api.enqueue_process_file(Err(ApiError::Status(
        StatusCode::INTERNAL_SERVER_ERROR,
        String::new(),
    )));
    let uploads = UploadCoordinator::new(api.clone());
    uploads.enqueue(file("report.pdf"));

    let error = uploads.commit(Some("u1"), "").await.unwrap_err();
    assert_eq!(error.to_string(), "Failed to upload file");
    assert_eq!(uploads.pending().len(), 1);
}

#[tokio::test]
async fn full_commit_saves_text_then_uploads_and_clears_the_queue() {
    let api = Arc::new(MockApi::new());
    api.enqueue_update_medical_conditions(Ok(())).enqueue_process_file(Ok(()));
    let uploads = UploadCoordinator::new(api.clone());
    uploads.enqueue(file("report.pdf"));

    uploads.commit(Some("u1"), "diabetes, hypertension").await.unwrap();

    assert_eq!(
        api.calls(),
        vec![
            ApiCall::UpdateMedicalConditions {
                user_id: "u1".to_string(),
                text: "diabetes, hypertension".to_string(),
            },
            ApiCall::ProcessFile {
                user_id: "u1".to_string(),
                file_name: "report.pdf".to_string(),
            },
        ]
    );
    assert!(uploads.pending().is_empty());
}

#[tokio::test]
async fn blank_text_skips_the_medical_conditions_patch() {
    let api = Arc::new(MockApi::new());
    api.enqueue_process_file(Ok(()));
    let uploads = UploadCoordinator::new(api.clone());
    uploads.enqueue(file("report.pdf"));

    uploads.commit(Some("u1"), "").await.unwrap();
    assert_eq!(
        api.calls(),
        vec![ApiCall::ProcessFile {
            user_id: "u1".to_string(),
            file_name: "report.pdf".to_string(),
        }]
    );
    assert!(uploads.pending().is_empty());
}
