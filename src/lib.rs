//! Core engine of a lossy-network-link emulator.
//!
//! Each link direction owns one loss queue: packets are ingested as they
//! arrive, dropped or admitted by a configured stochastic process, and
//! drained to a write endpoint in strict FIFO order. The queue also tells
//! the driving event loop how long it may safely sleep before the next
//! mandatory check, so link-state flips are never missed without the loop
//! having to busy-wait.

pub mod clock;
pub mod link;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use link::{
    BurstyLoss, GilbertElliottLoss, IidLoss, LinkError, LinkQueue, LinkResult, LinkStats,
    LossConfig, LossModel, LossQueue, PacketQueue, PeriodicSwitchingLink, StateLog,
    StochasticSwitchingLink, WAIT_CAP_MS,
};
