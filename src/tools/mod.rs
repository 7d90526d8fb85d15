//! Built-in Tools for Agent Capabilities
//!
//! Tools let an [`LlmAgent`](crate::agents::LlmAgent) act beyond text generation.
//! The model is offered each tool's JSON schema; requested calls are dispatched
//! through the [`ToolRegistry`].
//!
//! # Available Tools
//!
//! - `get_weather` - current conditions for a city
//! - `get_current_time` - local time and timezone for a city
//!
//! Both accept Chinese city names for the cities in
//! [`CITY_NAME_MAP`](crate::tools::weather::CITY_NAME_MAP).
//!
//! ```ignore
//! let registry = ToolRegistry::with_weather_tools(WeatherApiClient::new(key, base));
//! let result = registry.execute("get_weather", json!({"city": "伦敦"})).await?;
//! ```

/// Tool trait and registry.
pub mod registry;
/// weatherapi.com backed tools.
pub mod weather;

pub use registry::{Tool, ToolRegistry};
pub use weather::{CurrentTimeTool, WeatherApiClient, WeatherTool};
