#![deny(missing_docs)]
#![doc = "Deterministic pretty-printer: renders a document tree to text with fixed group ordering, participant and coupling-scheme bands, and width-aware attribute wrapping. Existing documents are read back with [`parse_document`] so they can be re-canonicalized."]

mod escape;
mod options;
mod printer;
mod rank;
mod reader;

pub use escape::escape_attribute;
pub use options::RenderOptions;
pub use printer::{render, PrettyPrinter};
pub use rank::{RankTable, PARTICIPANT_ORDER, TOP_LEVEL_ORDER};
pub use reader::parse_document;
