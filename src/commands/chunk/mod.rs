mod chunker;
mod clauses;
mod heading;
mod run;
mod segment;
#[cfg(test)]
mod tests;

pub use chunker::ClauseChunker;
pub use run::run;
