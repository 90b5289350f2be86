//! Authentication utilities

mod jwt;
mod password;

pub use jwt::{Claims, JwtService, NonceAction, SessionToken, TokenType};
pub use password::{hash_password, verify_password, PasswordPolicy, PasswordService};
