pub mod categories;
pub mod entries;
pub mod preferences;

pub use categories::{CategoryInput, CategoryService};
pub use entries::{EntryInput, EntryPage, EntryService};
pub use preferences::PreferencesService;
