//! Domain events

mod domain_event;

pub use domain_event::{
    CountersReconciledEvent, DomainEvent, MetaUpdatedEvent, PostEvent, RelationChangedEvent,
    UserRegisteredEvent, ViewRecordedEvent,
};
