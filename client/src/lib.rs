pub mod cursors;
pub mod session;
pub mod urls;

pub use cursors::CursorRegistry;
pub use session::{Input, Session, SessionEvent};
pub use urls::{build_hub_url, build_puzzle_url, session_path};
