//! Loss models for one direction of an emulated unreliable link.
//!
//! Five drop/keep processes share a single queue-and-scheduling contract:
//! independent per-packet loss, two flavors of two-state Markov loss, and
//! two on/off switching links (exponential and fixed sojourns). The set is
//! closed; the event loop selects one at startup via [`LossConfig`].

pub mod bursty;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod gilbert_elliott;
pub mod iid;
pub mod queue;
pub mod switching;

pub use bursty::BurstyLoss;
pub use config::LossConfig;
pub use diagnostics::StateLog;
pub use error::{LinkError, LinkResult};
pub use gilbert_elliott::GilbertElliottLoss;
pub use iid::IidLoss;
pub use queue::{LinkQueue, LinkStats, LossModel, LossQueue, PacketQueue, WAIT_CAP_MS};
pub use switching::{PeriodicSwitchingLink, StochasticSwitchingLink};

use rand::distributions::Bernoulli;

/// Builds a Bernoulli draw, naming the parameter on an out-of-range value.
pub(crate) fn bernoulli(name: &'static str, p: f64) -> LinkResult<Bernoulli> {
    Bernoulli::new(p).map_err(|_| LinkError::InvalidProbability { name, value: p })
}
