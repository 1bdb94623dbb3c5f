//! Synthetic interest-rate dataset for running without a CSV.
//!
//! Generates one observation per (series, year) following a mean-reverting
//! path around an era-dependent baseline: rates climb into the early-1980s
//! peak and settle back down afterwards, which is the classic shape of
//! historical policy-rate series. The generator is deterministic for a given
//! seed so sessions and bug reports are reproducible.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{Dataset, RateRecord};
use crate::error::AppError;

const COUNTRY: &str = "PHILIPPINES";
const YEAR_MIN: i32 = 1950;
const YEAR_MAX: i32 = 2008;

/// Year the baseline bump peaks (the early-80s rate spike).
const PEAK_YEAR: f64 = 1982.0;
/// Width (std dev, years) of the baseline bump.
const PEAK_WIDTH: f64 = 7.0;
/// Mean-reversion speed toward the baseline.
const REVERSION: f64 = 0.4;
/// Rates never go below this floor (percent).
const RATE_FLOOR: f64 = 0.5;

/// (description, long-run base %, bump amplitude %, noise std dev %).
///
/// The mix is chosen so the generated dataset exercises both sectors and all
/// three risk bands: treasury series and the average lending rate clear 20%
/// around the peak, deposit rates stay mostly below 10%.
const SERIES: [(&str, f64, f64, f64); 6] = [
    ("TREASURY BILL RATE", 6.0, 16.0, 0.9),
    ("TREASURY BOND RATE (10-YEAR)", 8.0, 14.0, 0.8),
    ("ADVANCE RATE (END OF PERIOD)", 7.5, 10.0, 0.7),
    ("SAVINGS DEPOSIT RATE", 4.0, 6.0, 0.4),
    ("TIME DEPOSIT RATE (61-90 DAYS)", 6.5, 9.0, 0.6),
    ("LENDING RATE (AVERAGE)", 10.0, 14.0, 0.9),
];

/// Generate the synthetic dataset.
pub fn generate_sample(seed: u64) -> Result<Dataset, AppError> {
    let mut rng = StdRng::seed_from_u64(sample_seed(seed));
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::runtime(format!("Noise distribution error: {e}")))?;

    let mut records = Vec::with_capacity(SERIES.len() * (YEAR_MAX - YEAR_MIN + 1) as usize);

    for (description, base, amp, sigma) in SERIES {
        let mut level = baseline(base, amp, YEAR_MIN);
        for year in YEAR_MIN..=YEAR_MAX {
            let target = baseline(base, amp, year);
            let z: f64 = normal.sample(&mut rng);
            level += REVERSION * (target - level) + sigma * z;
            level = level.max(RATE_FLOOR);

            records.push(RateRecord::new(
                COUNTRY.to_string(),
                year,
                description.to_string(),
                round2(level),
            ));
        }
    }

    Dataset::new(format!("sample (seed {seed})"), records)
}

/// Era-dependent baseline: long-run base plus a Gaussian bump at the peak.
fn baseline(base: f64, amp: f64, year: i32) -> f64 {
    let d = (year as f64 - PEAK_YEAR) / PEAK_WIDTH;
    base + amp * (-0.5 * d * d).exp()
}

/// Derive the RNG seed from every generation parameter, so changing the
/// series table or the year span also changes the stream.
fn sample_seed(seed: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    YEAR_MIN.hash(&mut hasher);
    YEAR_MAX.hash(&mut hasher);
    for (description, base, amp, sigma) in SERIES {
        description.hash(&mut hasher);
        base.to_bits().hash(&mut hasher);
        amp.to_bits().hash(&mut hasher);
        sigma.to_bits().hash(&mut hasher);
    }
    hasher.finish()
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RiskLevel, SectorType};

    #[test]
    fn generation_is_deterministic() {
        let a = generate_sample(42).unwrap();
        let b = generate_sample(42).unwrap();
        assert_eq!(a.records(), b.records());

        let c = generate_sample(43).unwrap();
        assert_ne!(a.records(), c.records());
    }

    #[test]
    fn covers_expected_shape() {
        let dataset = generate_sample(42).unwrap();

        assert_eq!(dataset.descriptions().len(), SERIES.len());
        assert_eq!(dataset.year_min(), YEAR_MIN);
        assert_eq!(dataset.year_max(), YEAR_MAX);
        assert_eq!(
            dataset.records().len(),
            SERIES.len() * (YEAR_MAX - YEAR_MIN + 1) as usize
        );

        // Values stay at or above the floor.
        assert!(dataset.records().iter().all(|r| r.value >= RATE_FLOOR));
    }

    #[test]
    fn covers_both_sectors_and_all_risk_bands() {
        let dataset = generate_sample(42).unwrap();

        for sector in SectorType::ALL {
            assert!(
                dataset.records().iter().any(|r| r.sector == sector),
                "missing sector {sector:?}"
            );
        }
        for risk in RiskLevel::ALL {
            assert!(
                dataset.records().iter().any(|r| r.risk == risk),
                "missing risk band {risk:?}"
            );
        }
    }

    #[test]
    fn baseline_peaks_at_the_peak_year() {
        let at_peak = baseline(6.0, 16.0, PEAK_YEAR as i32);
        assert!((at_peak - 22.0).abs() < 1e-9);
        assert!(baseline(6.0, 16.0, 1950) < at_peak);
        assert!(baseline(6.0, 16.0, 2008) < at_peak);
    }
}
