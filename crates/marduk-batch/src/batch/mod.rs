//! The batching core.
//!
//! Flow: drawable → [`GeometrySink`] → [`SpriteBatch`] (accumulate)
//! → [`SortStrategy`] (order, at flush) → run coalescer (merge) → render target.

mod coalesce;
mod mode;
mod sink;
mod sprite_batch;

pub use coalesce::{FlushStats, Run};
pub use mode::{BatchMode, DepthSort, Deferred, SortStrategy, TextureSort};
pub use sink::{Batchable, GeometrySink};
pub use sprite_batch::{BatchConfig, SpriteBatch};
