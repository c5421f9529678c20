mod article;
mod category;
mod membership;
pub mod permission;
mod role;
mod session;
mod user;
pub use article::{publication_time, Article, ArticleInput, OwnerScope};
pub use category::Category;
pub use membership::Membership;
pub use permission::Capability;
pub use role::Role;
pub use session::{ActiveContext, Session};
pub use user::User;
