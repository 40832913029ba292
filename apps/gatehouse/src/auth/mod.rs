pub mod claims;
pub mod jwt;
pub mod revocation;

pub use claims::Claims;
pub use jwt::{IssuedToken, TokenError, TokenService};
pub use revocation::RevocationList;
