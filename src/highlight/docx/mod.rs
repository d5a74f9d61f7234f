//! Word-processor (`.docx`) highlighting.

pub mod analyser;
pub mod mutator;
pub mod package;
pub mod xml;

pub use analyser::DocxAnalyser;
pub use mutator::{BatchMutator, RunHighlight};
pub use package::DocxPackage;
pub use xml::{NodeId, XmlTree};
