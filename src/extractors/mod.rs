mod current_user;
mod query;
pub use current_user::{CurrentUser, TOKEN_COOKIE};
pub use query::Query;
