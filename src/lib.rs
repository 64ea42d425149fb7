//! FankyGPT Local Brain
//!
//! The local model behind the FankyGPT chat app:
//! - Append-only example store of input/output training pairs
//! - Bag-of-words naive-Bayes classifier, refit over the full store on
//!   every new example
//! - Math-expression fast path that evaluates arithmetic input directly
//! - Best-effort artifact sync to Supabase Storage
//!
//! # Example
//!
//! ```ignore
//! use fankygpt::classifier::Classifier;
//! use fankygpt::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let classifier = Classifier::from_config(&Config::load()?)?;
//!     classifier.train("hello", "hi").await?;
//!     println!("{}", classifier.predict("hello")?);
//!     Ok(())
//! }
//! ```

pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod mathexpr;
pub mod model;
pub mod remote;
pub mod store;
pub mod text;
pub mod web;

// Re-export commonly used types for convenience
pub use classifier::Classifier;
pub use config::Config;
pub use error::{MathError, PredictError, TrainError};
pub use model::{Artifact, CountVectorizer, MultinomialNb};
pub use remote::SupabaseStorage;
pub use store::{Example, ExampleStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get the library info
pub fn info() -> String {
    format!("{} v{} - FankyGPT Local Brain", NAME, VERSION)
}
