pub mod session;
pub mod settings;

pub use session::{Session, SessionStore};
pub use settings::AppConfig;
