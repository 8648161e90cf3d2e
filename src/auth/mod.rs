pub mod session;

pub use session::{SessionService, SESSION_COOKIE};
