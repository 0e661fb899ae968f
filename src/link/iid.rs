//! Independent per-packet loss.

use rand::distributions::{Bernoulli, Distribution};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::link::bernoulli;
use crate::link::error::LinkResult;
use crate::link::queue::LossModel;

/// Drops each packet independently with a fixed probability.
pub struct IidLoss {
    drop_dist: Bernoulli,
    rng: StdRng,
}

impl IidLoss {
    pub fn new(loss_rate: f64) -> LinkResult<Self> {
        Ok(Self {
            drop_dist: bernoulli("loss_rate", loss_rate)?,
            rng: StdRng::from_entropy(),
        })
    }
}

impl LossModel for IidLoss {
    fn drop_packet(&mut self, _now_ms: u64, _packet: &[u8]) -> bool {
        self.drop_dist.sample(&mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::error::LinkError;

    #[test]
    fn zero_rate_never_drops() {
        let mut model = IidLoss::new(0.0).unwrap();
        for t in 0..1000 {
            assert!(!model.drop_packet(t, b"payload"));
        }
    }

    #[test]
    fn unit_rate_always_drops() {
        let mut model = IidLoss::new(1.0).unwrap();
        for t in 0..1000 {
            assert!(model.drop_packet(t, b"payload"));
        }
    }

    #[test]
    fn half_rate_drops_about_half() {
        let mut model = IidLoss::new(0.5).unwrap();
        let total = 10_000;
        let dropped = (0..total).filter(|&t| model.drop_packet(t, b"x")).count();

        let rate = dropped as f64 / total as f64;
        assert!(rate > 0.45 && rate < 0.55, "observed rate {rate}");
    }

    #[test]
    fn out_of_range_rate_is_rejected() {
        for bad in [-0.1, 1.5, f64::NAN] {
            match IidLoss::new(bad).err() {
                Some(LinkError::InvalidProbability { name, .. }) => assert_eq!(name, "loss_rate"),
                other => panic!("expected InvalidProbability, got {other:?}"),
            }
        }
    }
}
