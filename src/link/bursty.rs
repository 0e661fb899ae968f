//! Bursty loss: a two-state Markov chain stepped once per packet.

use std::path::Path;

use rand::distributions::{Bernoulli, Distribution};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::link::bernoulli;
use crate::link::diagnostics::StateLog;
use crate::link::error::LinkResult;
use crate::link::queue::LossModel;

/// Alternates between a loss state and a no-loss state, dropping packets
/// (with probability `loss_rate`) only while in the loss state. The chain
/// steps on every packet arrival, not on elapsed time.
pub struct BurstyLoss {
    in_loss_state: bool,
    leave_loss: Bernoulli,
    leave_no_loss: Bernoulli,
    drop_dist: Bernoulli,
    log: Option<StateLog>,
    rng: StdRng,
}

impl BurstyLoss {
    pub fn new(
        loss_rate: f64,
        prob_leave_loss: f64,
        prob_leave_no_loss: f64,
        log_path: Option<&Path>,
    ) -> LinkResult<Self> {
        let drop_dist = bernoulli("loss_rate", loss_rate)?;
        let leave_loss = bernoulli("prob_leave_loss", prob_leave_loss)?;
        let leave_no_loss = bernoulli("prob_leave_no_loss", prob_leave_no_loss)?;

        let log = log_path
            .map(|path| {
                StateLog::create(
                    path,
                    &format!(
                        "model: bursty loss_rate={loss_rate} prob_leave_loss={prob_leave_loss} \
                         prob_leave_no_loss={prob_leave_no_loss}"
                    ),
                )
            })
            .transpose()?;

        tracing::info!(
            loss_rate,
            prob_leave_loss,
            prob_leave_no_loss,
            "bursty loss link"
        );

        Ok(Self {
            in_loss_state: false,
            leave_loss,
            leave_no_loss,
            drop_dist,
            log,
            rng: StdRng::from_entropy(),
        })
    }
}

impl LossModel for BurstyLoss {
    fn drop_packet(&mut self, now_ms: u64, _packet: &[u8]) -> bool {
        if self.in_loss_state {
            self.in_loss_state = !self.leave_loss.sample(&mut self.rng);
        } else {
            self.in_loss_state = self.leave_no_loss.sample(&mut self.rng);
        }

        let dropped = self.in_loss_state && self.drop_dist.sample(&mut self.rng);
        if let Some(log) = &mut self.log {
            log.record(now_ms, self.in_loss_state, dropped);
        }
        dropped
    }
}
