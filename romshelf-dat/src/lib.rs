pub mod catalog;
pub mod error;
pub mod listxml;
pub mod search_list;

pub use catalog::{GameCatalog, GameEntry, ResolutionState};
pub use error::DatError;
pub use listxml::{LoadReport, load_listxml, parse_listxml};
pub use search_list::SearchList;
