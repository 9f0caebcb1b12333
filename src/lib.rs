mod api;
mod errors;
mod plan;
mod profile;
mod session;
pub mod testing;
mod types;
mod upload;

pub use api::{ApiError, ApiResult, HttpApi, HttpApiOptions, NutritionApi, DEFAULT_BASE_URL};
pub use reqwest::StatusCode;
pub use errors::{StoreError, StoreResult};
pub use plan::{monday_first_index, today_index, PlanStore};
pub use profile::{
    validate, ProfileField, ProfileStore, ValidationErrors, CREATE_USER_RETRY_DELAY, SAVED_FEEDBACK,
};
pub use session::{SessionObserver, Subscription};
pub use types::*;
pub use upload::{PendingUpload, UploadCoordinator};
