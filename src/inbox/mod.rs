pub mod controller;
pub mod engine;

pub use controller::{InboxController, Selection, ViewState};
pub use engine::{Filter, Section, compute_sections};
