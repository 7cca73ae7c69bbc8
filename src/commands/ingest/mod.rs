mod noise;
mod run;
mod source;
#[cfg(test)]
mod tests;

pub use noise::NoiseFilter;
pub use run::run;
pub use source::{DocumentSource, RawDocument, ingest_document, load_document};
