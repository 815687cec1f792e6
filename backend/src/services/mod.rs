//! Business logic services for the FarmLink platform

pub mod auth;
pub mod crop;
pub mod crop_recommendation;
pub mod discussion;
pub mod farmland;
pub mod irrigation;
pub mod rate_limiter;
pub mod user;
pub mod weather;

pub use auth::AuthService;
pub use crop::{CropCatalog, CropService};
pub use crop_recommendation::{CropRecommendationService, RecommendedCrop};
pub use discussion::{DiscussionService, LikeTarget};
pub use farmland::FarmlandService;
pub use irrigation::IrrigationService;
pub use rate_limiter::{AttemptOutcome, LoginRateLimiter};
pub use user::{UserPhone, UserService};
pub use weather::WeatherService;
