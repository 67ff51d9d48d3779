//! Administrator accounts: password hashing and startup bootstrap.

pub mod bootstrap;
pub mod password;
