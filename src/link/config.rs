//! Construction parameters for the loss models.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::link::bursty::BurstyLoss;
use crate::link::error::{LinkError, LinkResult};
use crate::link::gilbert_elliott::GilbertElliottLoss;
use crate::link::iid::IidLoss;
use crate::link::queue::{LinkQueue, LossQueue};
use crate::link::switching::{PeriodicSwitchingLink, StochasticSwitchingLink};

/// One configured loss process for a single link direction.
///
/// Probabilities are in `[0, 1]`; durations and mean durations are in
/// seconds. Each direction of a link gets its own instance built from its
/// own config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum LossConfig {
    Iid {
        loss_rate: f64,
    },
    Bursty {
        loss_rate: f64,
        prob_leave_loss: f64,
        prob_leave_no_loss: f64,
        #[serde(default)]
        log_path: Option<PathBuf>,
    },
    GilbertElliott {
        bad_loss_rate: f64,
        prob_leave_bad: f64,
        prob_leave_good: f64,
        good_loss_rate: f64,
        #[serde(default)]
        log_path: Option<PathBuf>,
    },
    StochasticSwitching {
        mean_on_time: f64,
        mean_off_time: f64,
    },
    PeriodicSwitching {
        on_time: f64,
        off_time: f64,
    },
}

impl LossConfig {
    /// Range-checks every parameter without constructing a model.
    pub fn validate(&self) -> LinkResult<()> {
        match *self {
            LossConfig::Iid { loss_rate } => probability("loss_rate", loss_rate),
            LossConfig::Bursty {
                loss_rate,
                prob_leave_loss,
                prob_leave_no_loss,
                ..
            } => {
                probability("loss_rate", loss_rate)?;
                probability("prob_leave_loss", prob_leave_loss)?;
                probability("prob_leave_no_loss", prob_leave_no_loss)
            }
            LossConfig::GilbertElliott {
                bad_loss_rate,
                prob_leave_bad,
                prob_leave_good,
                good_loss_rate,
                ..
            } => {
                probability("bad_loss_rate", bad_loss_rate)?;
                probability("prob_leave_bad", prob_leave_bad)?;
                probability("prob_leave_good", prob_leave_good)?;
                probability("good_loss_rate", good_loss_rate)
            }
            LossConfig::StochasticSwitching {
                mean_on_time,
                mean_off_time,
            } => {
                duration("mean_on_time", mean_on_time)?;
                duration("mean_off_time", mean_off_time)
            }
            LossConfig::PeriodicSwitching { on_time, off_time } => {
                duration("on_time", on_time)?;
                duration("off_time", off_time)?;
                if on_time == 0.0 && off_time == 0.0 {
                    return Err(LinkError::DegenerateSchedule);
                }
                Ok(())
            }
        }
    }

    /// Builds the configured model bound to `clock`, boxed behind the
    /// shared queue contract. Fails loudly on any invalid parameter or an
    /// unopenable log path; no half-initialized model is ever returned.
    pub fn build<C: Clock + 'static>(&self, clock: C) -> LinkResult<Box<dyn LinkQueue>> {
        self.validate()?;
        let now = clock.now_ms();
        Ok(match self {
            LossConfig::Iid { loss_rate } => {
                Box::new(LossQueue::new(IidLoss::new(*loss_rate)?, clock))
            }
            LossConfig::Bursty {
                loss_rate,
                prob_leave_loss,
                prob_leave_no_loss,
                log_path,
            } => Box::new(LossQueue::new(
                BurstyLoss::new(
                    *loss_rate,
                    *prob_leave_loss,
                    *prob_leave_no_loss,
                    log_path.as_deref(),
                )?,
                clock,
            )),
            LossConfig::GilbertElliott {
                bad_loss_rate,
                prob_leave_bad,
                prob_leave_good,
                good_loss_rate,
                log_path,
            } => Box::new(LossQueue::new(
                GilbertElliottLoss::new(
                    *bad_loss_rate,
                    *prob_leave_bad,
                    *prob_leave_good,
                    *good_loss_rate,
                    log_path.as_deref(),
                )?,
                clock,
            )),
            LossConfig::StochasticSwitching {
                mean_on_time,
                mean_off_time,
            } => Box::new(LossQueue::new(
                StochasticSwitchingLink::new(*mean_on_time, *mean_off_time, now)?,
                clock,
            )),
            LossConfig::PeriodicSwitching { on_time, off_time } => Box::new(LossQueue::new(
                PeriodicSwitchingLink::new(*on_time, *off_time, now)?,
                clock,
            )),
        })
    }
}

fn probability(name: &'static str, value: f64) -> LinkResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(LinkError::InvalidProbability { name, value })
    }
}

fn duration(name: &'static str, value: f64) -> LinkResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(LinkError::InvalidDuration { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_names_the_offending_parameter() {
        let config = LossConfig::GilbertElliott {
            bad_loss_rate: 0.5,
            prob_leave_bad: 1.2,
            prob_leave_good: 0.1,
            good_loss_rate: 0.0,
            log_path: None,
        };
        match config.validate().err() {
            Some(LinkError::InvalidProbability { name, value }) => {
                assert_eq!(name, "prob_leave_bad");
                assert_eq!(value, 1.2);
            }
            other => panic!("expected InvalidProbability, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_negative_mean_durations() {
        let config = LossConfig::StochasticSwitching {
            mean_on_time: 1.0,
            mean_off_time: -2.0,
        };
        match config.validate().err() {
            Some(LinkError::InvalidDuration { name, .. }) => assert_eq!(name, "mean_off_time"),
            other => panic!("expected InvalidDuration, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_degenerate_periodic_schedule() {
        let config = LossConfig::PeriodicSwitching {
            on_time: 0.0,
            off_time: 0.0,
        };
        assert!(matches!(
            config.validate().err(),
            Some(LinkError::DegenerateSchedule)
        ));
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = LossConfig::Bursty {
            loss_rate: 0.3,
            prob_leave_loss: 0.25,
            prob_leave_no_loss: 0.05,
            log_path: Some(PathBuf::from("/tmp/bursty.log")),
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"model\":\"bursty\""));
        let parsed: LossConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn log_path_is_optional_in_serialized_form() {
        let parsed: LossConfig =
            serde_json::from_str(r#"{"model":"iid","loss_rate":0.1}"#).unwrap();
        assert_eq!(parsed, LossConfig::Iid { loss_rate: 0.1 });

        let parsed: LossConfig = serde_json::from_str(
            r#"{"model":"gilbert_elliott","bad_loss_rate":0.5,"prob_leave_bad":0.2,
                "prob_leave_good":0.01,"good_loss_rate":0.0}"#,
        )
        .unwrap();
        assert!(matches!(
            parsed,
            LossConfig::GilbertElliott { log_path: None, .. }
        ));
    }
}
