// Library root: the almanac pipeline and every stage it runs, exposed so the
// binary and the integration tests drive the same code.

pub mod almanac;
pub mod enrich;
pub mod leaderboard;
pub mod lore;
pub mod metrics;
pub mod pipeline;
pub mod reference;
pub mod roster;
pub mod source;
pub mod stats;

pub use almanac::Almanac;
pub use pipeline::{run, PipelineError, RunReport, SourcePaths};
