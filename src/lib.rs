// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # gideon
//!
//! A small personal assistant: classify a free-text utterance into an intent,
//! answer it from a restricted arithmetic evaluator or an external provider,
//! and keep the whole system behind a keyword gate with a persistent panic lock.
//!
//! ## Architecture
//!
//! - **Intent router** (`intent`): ordered matchers, first claim wins
//! - **Evaluator** (`math`): expression extraction and a recursive-descent parser
//! - **Providers** (`providers`): weather, encyclopedia, translation, jokes
//! - **Session & gate** (`session`, `lock`): keyword check, SOS lock, unlock code
//! - **Assistant** (`assistant`): dispatch, fixed reply sentences, transcript
//!
//! ## Library usage
//!
//! ```
//! use gideon::intent::{route, Intent};
//!
//! match route("12 times 3") {
//!     Intent::Math { value, .. } => assert_eq!(value, 36.0),
//!     other => panic!("unexpected intent: {other:?}"),
//! }
//! ```

pub mod assistant;
pub mod config;
pub mod conversation;
pub mod error;
pub mod intent;
pub mod lock;
pub mod math;
pub mod paths;
pub mod providers;
pub mod render;
pub mod session;
