//! Database models - SQLx-compatible structs for PostgreSQL tables

mod meta;
mod post;
mod user;
mod view_stat;

pub use meta::MetaModel;
pub use post::PostModel;
pub use user::UserModel;
pub use view_stat::{DailyViewModel, ViewStatModel};
