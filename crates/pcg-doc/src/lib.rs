#![deny(missing_docs)]
#![doc = "Tree of tagged, attributed elements and the builder that assembles data, mesh, participant, m2n and coupling-scheme declarations into one document."]

mod builder;
mod tree;

pub use builder::build;
pub use tree::{Attribute, Document, Element, ROOT_TAG};
