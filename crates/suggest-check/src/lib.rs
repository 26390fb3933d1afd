#![warn(missing_docs)]
//! Suggest Check - remote grammar checking and session orchestration for `suggest-core`
//!
//! # Overview
//!
//! This crate supplies the asynchronous half of the suggestion pipeline:
//!
//! - [`GrammarService`]: one sentence in, one [`CheckResponse`](suggest_core::CheckResponse)
//!   out. [`HttpGrammarService`] implements it over `reqwest`.
//! - [`SuggestionCache`]: responses keyed by trimmed sentence text, shared across scans.
//! - [`SentenceChecker`]: cache-aware checking that degrades to "no suggestions" on failure.
//! - [`DocumentScanner`]: concurrent checking of every sentence in a document.
//! - [`SuggestionSession`]: refresh, open, apply and ignore, with stale-result rejection.
//!
//! # Example
//!
//! ```rust,no_run
//! use suggest_check::{HttpGrammarService, SuggestConfig, SuggestionSession};
//! use suggest_core::{RichDocument, SharedDocument};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SuggestConfig::default();
//! let service = HttpGrammarService::from_config(&config)?;
//! let session = SuggestionSession::new(service, config);
//!
//! let doc = SharedDocument::new(RichDocument::from_paragraphs(["The cta sat."]));
//! let outcome = session.refresh(&doc).await;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod checker;
pub mod config;
pub mod error;
pub mod scanner;
pub mod service;
pub mod session;

pub use cache::SuggestionCache;
pub use checker::SentenceChecker;
pub use config::{DEFAULT_ENDPOINT, SuggestConfig};
pub use error::{CheckError, ConfigError};
pub use scanner::DocumentScanner;
pub use service::{GrammarService, HttpGrammarService};
pub use session::{RefreshOutcome, SuggestionSession};
