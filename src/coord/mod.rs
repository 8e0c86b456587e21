//! Lockstep distributed Dijkstra
//!
//! Every worker owns a private `DistanceState`. The only cross-worker
//! contract is the payload and tie-break rule of the per-round agreement,
//! plus the final element-wise minimum over the distance vector.

pub mod dijkstra;
pub mod partition;
pub mod round;
pub mod state;
pub mod types;

pub use dijkstra::*;
pub use partition::*;
pub use round::*;
pub use state::*;
pub use types::*;
