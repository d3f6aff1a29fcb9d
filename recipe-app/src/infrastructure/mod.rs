pub mod identity;
pub mod security;
pub mod seed;
