pub mod killzone;

pub use killzone::{current_session, session_at, Session};
