pub mod card;
pub mod catalog;
pub mod loader;
pub mod profile;
pub mod validate;

pub use card::{Card, CardCategory, DpsModel, DpsModelKind, Scaling};
pub use catalog::Catalog;
pub use loader::{builtin_catalog, load_catalog, load_catalog_or_default};
pub use profile::{load_default_profile, load_profile, SimulationProfile};
