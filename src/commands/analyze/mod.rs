mod classify;
mod client;
mod pipeline;
mod retry;
mod run;
mod session;
mod summary;
mod validation;

pub use run::run;
