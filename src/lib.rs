//! Interactive terminal forms compiled from a nested, declarative field spec.
//!
//! A spec is a tree of mappings. Mappings whose keys all start with `^` are
//! fields (`^label`, `^type`, `^default`, ...); mappings with no such keys are
//! named groups. [`Form`] compiles the tree, runs the session on the terminal
//! and returns the collected values nested the same way.

pub mod app;
pub mod callbacks;
pub mod config;
pub mod error;
pub mod model;
pub mod nav;
pub mod theme;
pub mod tree;
pub mod ui;
pub mod widgets;

pub use app::{Form, FormOutcome, LoopResult};
pub use callbacks::{CallbackArgs, CallbackRegistry};
pub use config::SessionConfig;
pub use error::{FormError, Result};
pub use model::FormSpec;
pub use theme::{Palette, ThemeMode};
