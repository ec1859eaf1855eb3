// Literature search clients

pub mod pubmed;

pub use pubmed::{PaperRecord, PubMedClient};
