//! Core logic for mdparts.
//!
//! Finds numbered chapter directories under a scan root and merges the
//! markdown files in each into a single `part_<prefix>.md` document.

pub mod discover;
pub mod merger;
pub mod ordering;
pub mod run;
