// src/ui/widgets/mod.rs

pub mod disclaimer_popup;
pub mod footer;
pub mod input;
pub mod log_view;
pub mod progress; // Job gauge and stage timeline.
pub mod sections_view; // Per-tool output browser.
