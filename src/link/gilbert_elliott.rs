//! Gilbert-Elliott loss: a two-state Markov chain with a loss rate per
//! state and rate-limited transition checks.

use std::path::Path;

use rand::distributions::{Bernoulli, Distribution};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::link::bernoulli;
use crate::link::diagnostics::StateLog;
use crate::link::error::LinkResult;
use crate::link::queue::LossModel;

/// Minimum spacing between Markov transition checks. Keeps state churn on
/// a frame-interval scale instead of tracking per-packet arrival rate; the
/// per-packet drop draw is unaffected.
const TRANSITION_CHECK_INTERVAL_MS: u64 = 33;

/// Good/bad channel with distinct drop probabilities per state. The chain
/// is re-evaluated at most once per [`TRANSITION_CHECK_INTERVAL_MS`]; the
/// state is frozen in between.
pub struct GilbertElliottLoss {
    in_bad_state: bool,
    last_transition_check: Option<u64>,
    leave_bad: Bernoulli,
    leave_good: Bernoulli,
    drop_bad: Bernoulli,
    drop_good: Bernoulli,
    log: Option<StateLog>,
    rng: StdRng,
}

impl GilbertElliottLoss {
    pub fn new(
        bad_loss_rate: f64,
        prob_leave_bad: f64,
        prob_leave_good: f64,
        good_loss_rate: f64,
        log_path: Option<&Path>,
    ) -> LinkResult<Self> {
        let drop_bad = bernoulli("bad_loss_rate", bad_loss_rate)?;
        let drop_good = bernoulli("good_loss_rate", good_loss_rate)?;
        let leave_bad = bernoulli("prob_leave_bad", prob_leave_bad)?;
        let leave_good = bernoulli("prob_leave_good", prob_leave_good)?;

        let log = log_path
            .map(|path| {
                StateLog::create(
                    path,
                    &format!(
                        "model: gilbert_elliott bad_loss_rate={bad_loss_rate} \
                         prob_leave_bad={prob_leave_bad} prob_leave_good={prob_leave_good} \
                         good_loss_rate={good_loss_rate}"
                    ),
                )
            })
            .transpose()?;

        tracing::info!(
            bad_loss_rate,
            prob_leave_bad,
            prob_leave_good,
            good_loss_rate,
            "GE loss link"
        );

        Ok(Self {
            in_bad_state: false,
            last_transition_check: None,
            leave_bad,
            leave_good,
            drop_bad,
            drop_good,
            log,
            rng: StdRng::from_entropy(),
        })
    }
}

impl LossModel for GilbertElliottLoss {
    fn drop_packet(&mut self, now_ms: u64, _packet: &[u8]) -> bool {
        let check_due = match self.last_transition_check {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= TRANSITION_CHECK_INTERVAL_MS,
        };
        if check_due {
            if self.in_bad_state {
                self.in_bad_state = !self.leave_bad.sample(&mut self.rng);
            } else {
                self.in_bad_state = self.leave_good.sample(&mut self.rng);
            }
            self.last_transition_check = Some(now_ms);
        }

        let drop_dist = if self.in_bad_state {
            &self.drop_bad
        } else {
            &self.drop_good
        };
        let dropped = drop_dist.sample(&mut self.rng);
        if let Some(log) = &mut self.log {
            log.record(now_ms, self.in_bad_state, dropped);
        }
        dropped
    }
}
