//! External API integrations

pub mod openai;
pub mod sms;
pub mod weather;

pub use openai::{CropAdvisor, MockCropAdvisor, OpenAiClient};
pub use sms::{LogSmsSender, SmsSender, TwilioClient};
pub use weather::{OpenWeatherClient, WeatherProvider};
