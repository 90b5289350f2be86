//! Domain entities - core business objects

mod post;
mod relation;
mod user;
mod view_stat;

pub use post::{NewPost, Post, PostStatus, PostType};
pub use relation::{EngagementRelation, RelationKind, ToggleOutcome, ToggleState};
pub use user::{NewUser, Role, User};
pub use view_stat::{DailyViews, StatsSnapshot, ViewKind, ViewStat, MAX_DAILY_BUCKETS};
