//! HTTP request handlers

pub mod auth;
pub mod crop;
pub mod discussion;
pub mod farmland;
pub mod health;
pub mod irrigation;
pub mod user;
pub mod weather;

pub use auth::{login, logout, register};
pub use crop::{add_crop, gpt_recommendation, list_crops, manual_recommendation};
pub use discussion::{
    add_comment, add_reply, create_post, delete_comment, delete_reply, get_post, like_comment,
    like_post, like_reply, list_posts,
};
pub use farmland::{add_farmland, get_farmland};
pub use health::health_check;
pub use irrigation::{create_schedule, get_schedules};
pub use user::get_user;
pub use weather::get_weather;
