pub mod app_state;
pub mod cookie_config;
pub mod security_config;

pub use app_state::AppState;
pub use cookie_config::CookieConfig;
pub use security_config::{MasterBypass, SecurityConfig};
