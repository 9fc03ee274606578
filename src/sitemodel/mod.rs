//! Discrete site-rate categories
//!
//! Across-site rate variation is approximated by a small number of equal-
//! probability rate categories drawn from a Weibull or gamma distribution
//! (median quantiles, normalized so the proportion-weighted mean rate is 1),
//! optionally preceded by an invariant-sites category at rate 0.

use thiserror::Error;

use crate::stats::gamma_quantile;

/// Errors raised by an invalid site-rate configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SiteModelError {
    /// Shape parameter must be positive
    #[error("shape parameter must be positive, got {0}")]
    InvalidShape(f64),

    /// Proportion of invariant sites must lie in [0, 1)
    #[error("proportion of invariant sites must lie in [0, 1), got {0}")]
    InvalidProportionInvariant(f64),

    /// Not enough categories for the requested model
    #[error("need at least {needed} rate categories, got {got}")]
    TooFewCategories {
        /// Minimum category count for this configuration
        needed: usize,
        /// Configured category count
        got: usize,
    },
}

/// Shape family of the across-site rate distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RateDistribution {
    /// Weibull-distributed rates (quantile has a closed form)
    #[default]
    Weibull,

    /// Gamma-distributed rates with mean 1 (scale = 1/shape)
    Gamma,
}

/// Rate and proportion vectors for one category layout.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteRateCategories {
    /// Per-category relative rate; proportion-weighted mean is 1
    pub rates: Vec<f64>,

    /// Per-category site proportion; sums to 1
    pub proportions: Vec<f64>,
}

/// Site-rate category model.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SiteRateModel {
    /// Rate-shape family
    pub distribution: RateDistribution,

    /// Shape parameter; `None` collapses to a single variable-rate category
    pub shape: Option<f64>,

    /// Total category count, including the invariant slot when present
    pub category_count: usize,

    /// Proportion of invariant sites
    pub proportion_invariant: f64,

    /// Reserve category 0 (rate 0) for the invariant sites
    pub has_invariant_category: bool,
}

impl Default for SiteRateModel {
    fn default() -> Self {
        Self {
            distribution: RateDistribution::Weibull,
            shape: Some(1.0),
            category_count: 4,
            proportion_invariant: 0.0,
            has_invariant_category: false,
        }
    }
}

impl SiteRateModel {
    /// A plain `k`-category model with the given distribution and shape.
    pub fn new(distribution: RateDistribution, shape: f64, category_count: usize) -> Self {
        Self {
            distribution,
            shape: Some(shape),
            category_count,
            ..Self::default()
        }
    }

    /// Fill the category rate and proportion vectors.
    pub fn category_rates(&self) -> Result<SiteRateCategories, SiteModelError> {
        let p_inv = self.proportion_invariant;
        if !(0.0..1.0).contains(&p_inv) {
            return Err(SiteModelError::InvalidProportionInvariant(p_inv));
        }
        if self.category_count == 0 {
            return Err(SiteModelError::TooFewCategories {
                needed: 1,
                got: 0,
            });
        }

        let mut rates = vec![0.0; self.category_count];
        let mut proportions = vec![0.0; self.category_count];

        let mut prop_variable = 1.0;
        let mut cat = 0;
        if p_inv > 0.0 {
            if self.has_invariant_category {
                rates[0] = 0.0;
                proportions[0] = p_inv;
                cat = 1;
            }
            prop_variable = 1.0 - p_inv;
        }

        match self.shape {
            Some(shape) => {
                if !(shape > 0.0) {
                    return Err(SiteModelError::InvalidShape(shape));
                }
                let variable_cats = self.category_count - cat;
                if variable_cats == 0 {
                    return Err(SiteModelError::TooFewCategories {
                        needed: cat + 1,
                        got: self.category_count,
                    });
                }

                let mut mean = 0.0;
                for i in 0..variable_cats {
                    let quantile = (2.0 * i as f64 + 1.0) / (2.0 * variable_cats as f64);
                    rates[i + cat] = match self.distribution {
                        // Weibull quantile: (-ln(1 - q))^(1/shape)
                        RateDistribution::Weibull => {
                            (-(1.0 - quantile).ln()).powf(1.0 / shape)
                        }
                        RateDistribution::Gamma => gamma_quantile(shape, 1.0 / shape, quantile),
                    };
                    mean += rates[i + cat];
                    proportions[i + cat] = prop_variable / variable_cats as f64;
                }

                // Normalize so the proportion-weighted mean rate is 1
                mean = prop_variable * mean / variable_cats as f64;
                for rate in rates[cat..].iter_mut() {
                    *rate /= mean;
                }
            }
            None => {
                rates[cat] = 1.0 / prop_variable;
                proportions[cat] = prop_variable;
            }
        }

        Ok(SiteRateCategories { rates, proportions })
    }
}
