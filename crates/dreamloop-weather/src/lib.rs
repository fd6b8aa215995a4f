//! Best-effort current-weather lookup used to flavour the daily prompt.

pub mod client;
mod codes;
pub mod error;

pub use client::WeatherClient;
pub use codes::describe_weather_code;
pub use error::WeatherError;
