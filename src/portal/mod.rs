pub mod client;
pub mod credential;
pub mod endpoints;
pub mod error;
pub mod gate;
pub mod login;
pub mod session;

pub use self::client::{ApiResponse, PortalClient};
pub use self::error::{Error, Result};
pub use self::gate::{is_authorized, AllowList, IdentityClaim};
pub use self::session::{AuthMethod, Session, SessionStore};
