//! Application layer: orchestration of the template pipeline.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use services::{
    GenerateReport, GenerateRequest, GenerateService, ResolvedSource, ResolverConfig,
    SourceResolver, TempArtifacts,
};
