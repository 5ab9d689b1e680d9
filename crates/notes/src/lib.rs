//! Notes domain module.
//!
//! Concrete model objects for a note-taking application, built on
//! `modelkit-core`: notes with a frame on a board, an optional tag and a
//! checklist.

pub mod checklist;
pub mod note;
pub mod tag;

pub use checklist::ChecklistItem;
pub use note::Note;
pub use tag::Tag;
