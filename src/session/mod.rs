mod store;
mod token;

pub use store::{FileTokenStore, MemoryTokenStore, Session, SessionStore, TokenStore};
pub use token::{decode_claims, Claims};
