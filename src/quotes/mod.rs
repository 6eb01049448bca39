// Quote records and the operations the reader performs on a loaded quote list.
// Theme ranking, search, flipped variants, and like/bookmark sets.

pub mod catalog;
pub mod flip;
pub mod marks;
pub mod types;

pub use catalog::{
    ALL_THEMES, DEFAULT_THEME_LIMIT, filter_by_theme, position_of, rank_themes, search,
    suggestions,
};
pub use flip::{fill_flipped, flip_quote};
pub use marks::{MarkKind, MarkSet};
pub use types::{Quote, QuoteKey};
