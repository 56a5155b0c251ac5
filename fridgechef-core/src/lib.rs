pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod rank;
pub mod transport;
pub mod wizard;

pub use api::{AiSession, ApiClient};
pub use auth::{DiskTokenStore, MemoryTokenStore, Session, TokenStore, Tokens};
pub use config::Config;
pub use error::ApiError;
pub use normalize::{
    format_cook_time, normalize_recipe, shopping_query, split_ingredients, split_steps, RecipeView,
};
pub use rank::rerank;
pub use transport::{
    ApiRequest, ApiResponse, HttpTransport, MockResponse, MockTransport, RecordedCall, Transport,
};
pub use wizard::{
    PreferenceDraft, SingleSelect, Wizard, WizardEvent, WizardStep, NONE_ALLERGY,
};
