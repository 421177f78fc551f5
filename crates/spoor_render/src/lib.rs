//! Value rendering for spoor.
//!
//! Converts [`spoor_foundation`] values into human-readable text: scalars on
//! one line, composites broken across nested lines when they would not fit,
//! structural objects walked through their class-level descriptions with
//! cycle detection. Output is buffered as (nest, text) lines so callers can
//! apply their own indentation policy.
//!
//! # Example
//!
//! ```
//! use spoor_foundation::Value;
//! use spoor_render::{render_to_string, FormatSettings};
//!
//! let settings = FormatSettings::default();
//! let value = Value::seq("Vec", (1..=3).map(Value::Int));
//! assert_eq!(render_to_string(&settings, &value), "(Vec size:3)[1, 2, 3]");
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod buffer;
pub mod cycle;
pub mod render;
pub mod settings;

pub use buffer::{LineBuffer, RenderedLine};
pub use cycle::{CycleGuard, ObjectId};
pub use render::{lines_to_string, render_to_string, Renderer, TextCache};
pub use settings::{FormatSettings, SettingsError};
