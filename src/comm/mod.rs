/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Message-passing layer
//!
//! The factorizer and the inverter never share memory across ranks. Everything they
//! need from each other moves through a [`Communicator`]: one-to-all broadcasts for
//! pivot rows, tagged point-to-point messages for the final row gathers, and
//! barriers. All calls block.
//!
//! [`LocalWorld`] provides an in-process substrate where every rank is an OS thread
//! connected to its peers only through channels.

pub mod errors;
pub mod local;

pub use errors::{CommError, Result};
pub use local::{CollectiveCall, LocalCommunicator, LocalWorld};

/// Rank that coordinates gathers and owns user-facing I/O
pub const ROOT: usize = 0;

/// Correlation key for point-to-point messages; the pipeline uses row indices
pub type Tag = usize;

/// Element types that may travel through a communicator
pub trait Payload: Copy + Send + 'static {}

impl Payload for f64 {}
impl Payload for f32 {}
impl Payload for i32 {}
impl Payload for i64 {}
impl Payload for u32 {}
impl Payload for u64 {}
impl Payload for usize {}

/// Capability offered by a message-passing substrate
///
/// Every rank must issue the same sequence of collective calls ([`broadcast`] and
/// [`barrier`]); a rank that skips or reorders one blocks its peers.
///
/// [`broadcast`]: Communicator::broadcast
/// [`barrier`]: Communicator::barrier
pub trait Communicator {
    /// Rank of the calling process, fixed for the run
    fn rank(&self) -> usize;

    /// Number of ranks in the world, fixed for the run
    fn size(&self) -> usize;

    /// Replace `buf` on every rank with the contents held by `root`
    fn broadcast<T: Payload>(&mut self, buf: &mut [T], root: usize) -> Result<()>;

    /// Deliver `buf` to `dest`, correlated by `tag`
    fn send<T: Payload>(&mut self, buf: &[T], dest: usize, tag: Tag) -> Result<()>;

    /// Block until the message sent by `source` under `tag` arrives
    fn receive<T: Payload>(&mut self, source: usize, tag: Tag) -> Result<Vec<T>>;

    /// Block until every rank has reached the barrier
    fn barrier(&mut self) -> Result<()>;

    /// Whether this rank is the coordinating rank
    fn is_root(&self) -> bool {
        self.rank() == ROOT
    }
}
