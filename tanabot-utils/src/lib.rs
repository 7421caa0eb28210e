/// Generic embed builders shared across commands and handlers.
pub mod embed;
/// Permission helper utilities over the guild cache.
pub mod permissions;
