//! On/off switching links: renewal processes that drop every packet while
//! the link is off.
//!
//! Both variants keep an absolute `next_switch_time` and catch it up to
//! "now" (flipping as many times as the elapsed interval requires) before
//! answering a drop decision or a scheduling-hint query.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Exp};

use crate::link::error::{LinkError, LinkResult};
use crate::link::queue::LossModel;

const MS_PER_SECOND: f64 = 1000.0;

/// Largest single sojourn, in milliseconds. Accumulating draws into the
/// 64-bit switch-time clock stays far from wraparound.
pub(crate) const MAX_SOJOURN_MS: u64 = 1 << 30;

/// Clamps a raw millisecond duration into `[0, MAX_SOJOURN_MS]`.
pub(crate) fn bounded_draw(raw_ms: f64) -> u64 {
    if !(raw_ms > 0.0) {
        return 0;
    }
    if raw_ms >= MAX_SOJOURN_MS as f64 {
        return MAX_SOJOURN_MS;
    }
    raw_ms as u64
}

/// Draws one sojourn, clamped into `[1, MAX_SOJOURN_MS]`. The 1 ms floor
/// keeps the catch-up loop finite when a mean duration of zero makes the
/// exponential degenerate (every sample zero).
fn sojourn_ms(dist: &Exp<f64>, rng: &mut StdRng) -> u64 {
    bounded_draw(dist.sample(rng)).max(1)
}

fn exp_sojourn(name: &'static str, mean_secs: f64) -> LinkResult<Exp<f64>> {
    if !mean_secs.is_finite() || mean_secs < 0.0 {
        return Err(LinkError::InvalidDuration {
            name,
            value: mean_secs,
        });
    }
    // A zero mean gives an infinite rate; Exp then samples zero and the
    // sojourn floor above takes over.
    Exp::new((MS_PER_SECOND * mean_secs).recip()).map_err(|_| LinkError::InvalidDuration {
        name,
        value: mean_secs,
    })
}

fn fixed_duration(name: &'static str, secs: f64) -> LinkResult<u64> {
    if !secs.is_finite() || secs < 0.0 {
        return Err(LinkError::InvalidDuration { name, value: secs });
    }
    Ok(bounded_draw(MS_PER_SECOND * secs))
}

/// Link whose on/off sojourns are exponential with the configured means.
///
/// Starts off, with the first flip scheduled one off-sojourn after
/// construction.
pub struct StochasticSwitchingLink {
    link_is_on: bool,
    on_sojourn: Exp<f64>,
    off_sojourn: Exp<f64>,
    next_switch_time: u64,
    rng: StdRng,
}

impl StochasticSwitchingLink {
    /// `now_ms` anchors the switch schedule to the caller's clock.
    pub fn new(mean_on_secs: f64, mean_off_secs: f64, now_ms: u64) -> LinkResult<Self> {
        let on_sojourn = exp_sojourn("mean_on_time", mean_on_secs)?;
        let off_sojourn = exp_sojourn("mean_off_time", mean_off_secs)?;
        let mut rng = StdRng::from_entropy();
        let first_flip = now_ms + sojourn_ms(&off_sojourn, &mut rng);

        tracing::info!(mean_on_secs, mean_off_secs, "stochastic switching link");

        Ok(Self {
            link_is_on: false,
            on_sojourn,
            off_sojourn,
            next_switch_time: first_flip,
            rng,
        })
    }

    fn advance_to(&mut self, now_ms: u64) {
        while self.next_switch_time <= now_ms {
            self.link_is_on = !self.link_is_on;
            let dist = if self.link_is_on {
                &self.on_sojourn
            } else {
                &self.off_sojourn
            };
            self.next_switch_time += sojourn_ms(dist, &mut self.rng);
        }
    }
}

impl LossModel for StochasticSwitchingLink {
    fn drop_packet(&mut self, now_ms: u64, _packet: &[u8]) -> bool {
        self.advance_to(now_ms);
        !self.link_is_on
    }

    fn wait_bound(&mut self, now_ms: u64) -> u64 {
        self.advance_to(now_ms);
        self.next_switch_time - now_ms
    }
}

/// Link that alternates with fixed on/off durations.
///
/// Starts off, with the first flip one full off-duration after
/// construction. A single zero duration is legal (that phase is re-flipped
/// through instantly inside the catch-up loop); both zero is rejected.
pub struct PeriodicSwitchingLink {
    link_is_on: bool,
    on_ms: u64,
    off_ms: u64,
    next_switch_time: u64,
}

impl PeriodicSwitchingLink {
    pub fn new(on_secs: f64, off_secs: f64, now_ms: u64) -> LinkResult<Self> {
        let on_ms = fixed_duration("on_time", on_secs)?;
        let off_ms = fixed_duration("off_time", off_secs)?;
        if on_ms == 0 && off_ms == 0 {
            return Err(LinkError::DegenerateSchedule);
        }

        tracing::info!(on_secs, off_secs, "periodic switching link");

        Ok(Self {
            link_is_on: false,
            on_ms,
            off_ms,
            next_switch_time: now_ms + off_ms,
        })
    }

    fn advance_to(&mut self, now_ms: u64) {
        // Terminates: the durations are not both zero, so every two flips
        // move the schedule forward.
        while self.next_switch_time <= now_ms {
            self.link_is_on = !self.link_is_on;
            self.next_switch_time += if self.link_is_on {
                self.on_ms
            } else {
                self.off_ms
            };
        }
    }
}

impl LossModel for PeriodicSwitchingLink {
    fn drop_packet(&mut self, now_ms: u64, _packet: &[u8]) -> bool {
        self.advance_to(now_ms);
        !self.link_is_on
    }

    fn wait_bound(&mut self, now_ms: u64) -> u64 {
        self.advance_to(now_ms);
        self.next_switch_time - now_ms
    }
}
