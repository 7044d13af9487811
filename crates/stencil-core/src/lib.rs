//! Stencil Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Stencil
//! template renderer, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          stencil-cli (CLI)              │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │   (GenerateService, SourceResolver)     │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Driven: Fs, Download, Unpack, Render)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    stencil-adapters (Infrastructure)    │
//! │  (LocalFilesystem, UreqDownloader, …)   │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │ (reference classification, splitext,    │
//! │  ArchiveFormat, RenderContext)          │
//! │        No External Dependencies         │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stencil_core::{
//!     application::{GenerateRequest, GenerateService},
//!     domain::{RenderContext, RenderSelection},
//! };
//!
//! // 1. Describe what to generate
//! let request = GenerateRequest {
//!     target_dir: "./myapp".into(),
//!     reference: Some("https://example.com/tpl.tar.gz".into()),
//!     default_template_dir: "/usr/share/stencil/default".into(),
//!     selection: RenderSelection::from_args(&["rs,toml".into()], &[]),
//!     context: RenderContext::new("myapp"),
//! };
//!
//! // 2. Use the application service (with injected adapters)
//! let service = GenerateService::new(downloader, unpacker, renderer, filesystem);
//! service.generate(&request).unwrap();
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        GenerateReport, GenerateRequest, GenerateService, ResolvedSource, ResolverConfig,
        SourceResolver, TempArtifacts,
        ports::{ContentRenderer, Downloader, Filesystem, Unpacker},
    };
    pub use crate::domain::{ArchiveFormat, RenderContext, RenderSelection};
    pub use crate::error::{StencilError, StencilResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
