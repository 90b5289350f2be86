//! Value objects - immutable types that represent domain concepts

mod capabilities;
mod entity_id;
mod meta_key;

pub use capabilities::Capabilities;
pub use entity_id::{EntityId, EntityIdParseError};
pub use meta_key::{parse_non_negative, MetaKey, MetaKind, MetaValue, MAX_TEXT_LENGTH};
