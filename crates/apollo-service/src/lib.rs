//! # apollo-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;

pub use services::{
    AuthService, EngagementService, EventBus, HealthService, MetaService, PostService, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult, SiteClock, ViewTrackingService,
};
