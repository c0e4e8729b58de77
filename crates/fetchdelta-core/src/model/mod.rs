pub mod identifier;
pub mod request;
pub mod snapshot;

pub use identifier::{Attributes, FetchedObject, Identifier, PrimaryKey, SafeObject};
pub use request::{FetchRequest, SortDescriptor};
pub use snapshot::{Entry, IndexPath, Section, SectionInfo, Snapshot};
