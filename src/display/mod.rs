//! Public site sections.
//!
//! A section loads its list once on mount and renders one of four views.
//! Its heading always comes from the current [`SectionConfig`], so a
//! config refresh relabels it without refetching the list.

pub mod section;

pub use section::{PublicSection, SectionView};
