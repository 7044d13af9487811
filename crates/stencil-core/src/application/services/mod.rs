//! Application services.

pub mod generate;
pub mod resolver;

pub use generate::{GenerateReport, GenerateRequest, GenerateService};
pub use resolver::{ResolvedSource, ResolverConfig, SourceResolver, TempArtifacts};
