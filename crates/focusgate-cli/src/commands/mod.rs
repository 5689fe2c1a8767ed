pub mod classify;
pub mod contextualize;
pub mod domains;
pub mod helpers;
pub mod session;
