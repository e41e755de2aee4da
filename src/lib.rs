//! Personal catalogue of public web APIs.
//!
//! apidex keeps a checked-in JSON dataset of public APIs and gives you a
//! filterable, sortable view over it, live "try it" probes against the
//! catalogued endpoints, and the maintenance tooling around the dataset
//! (status updates, progress stats, bulk health checks, markdown import,
//! pre-commit validation).
//!
//! # Quick Start
//!
//! ```no_run
//! use apidex::{compute_view, Criteria, Dataset, Dispatcher, SortKey};
//! use apidex::source::FileSource;
//!
//! #[tokio::main]
//! async fn main() -> apidex::Result<()> {
//!     // Load the dataset once; it is read-only for the session.
//!     let source = FileSource::new("data/apis.json");
//!     let dataset = Dataset::load(&source).await?;
//!
//!     // Compute a filtered, sorted view.
//!     let criteria = Criteria {
//!         free_text: "dog".to_string(),
//!         ..Default::default()
//!     };
//!     let view = compute_view(dataset.entries(), &criteria, SortKey::Name, true);
//!     println!("{} matching entries", view.len());
//!
//!     // Probe the first testable match.
//!     let dispatcher = Dispatcher::new()?;
//!     if let Some(tryit) = view.iter().find_map(|e| e.try_it.as_ref()) {
//!         let url = apidex::UrlTemplate::parse(&tryit.url)
//!             .resolve_encoded(&tryit.default_params());
//!         let outcome = dispatcher.dispatch(&url, &tryit.response_type).await;
//!         println!("{}", apidex::PrettyPrint::pretty_print(&outcome));
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! The core is three small, pure-ish pieces:
//!
//! - [`compute_view`] is the query engine: AND-ed filter clauses plus a
//!   stable sort, a pure function of its arguments.
//! - [`UrlTemplate`] handles `{name}` placeholder resolution, tokenized
//!   once; unresolved placeholders stay verbatim.
//! - [`Dispatcher`] performs one GET per call, categorized into a
//!   [`CallOutcome`] instead of an error path.
//!
//! Everything else is dataset plumbing ([`Dataset`], [`source`]) and the
//! CLI collaborator tools ([`healthcheck`], [`markdown`], [`validate`],
//! [`stats`]).

pub mod cli;
pub mod dataset;
pub mod dispatch;
pub mod error;
pub mod healthcheck;
pub mod markdown;
pub mod models;
pub mod output;
pub mod query;
pub mod source;
pub mod stats;
pub mod template;
pub mod validate;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use dataset::{apply_update, find_matches, find_one, suggest, Dataset, EntryUpdate, TryItChange};
pub use dispatch::{CallOutcome, Dispatcher, Payload, DEFAULT_TIMEOUT};
pub use error::{ApidexError, Result};
pub use output::PrettyPrint;
pub use query::{compute_view, Criteria, SortKey};
pub use source::{source_for, DataSource, FileSource, HttpSource};
pub use stats::{by_category, closest_to_completion, CategoryProgress, ProgressSort, StatusCounts};
pub use template::{resolve, UrlTemplate};

// Re-export models
pub use models::{ApiEntry, Auth, Cors, ResponseKind, Status, TryIt};
