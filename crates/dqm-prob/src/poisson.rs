//! Poisson confidence intervals via the chi-square relation.

use dqm_core::{Error, Result};
use statrs::function::erf::erf_inv;
use statrs::function::gamma::{checked_gamma_lr, ln_gamma};

/// Central 68.27% confidence level ("1 sigma").
pub const ONE_SIGMA_CL: f64 = 0.6827;

/// Gamma shape above which the Wilson–Hilferty cube is used without
/// refinement. Its quantile error there is below 1e-3.
const WILSON_HILFERTY_SHAPE: f64 = 1e4;

const MAX_HALLEY_STEPS: usize = 12;
const REL_TOL: f64 = 1e-12;
/// Below this the small-shape power law is exact to double precision.
const TINY_QUANTILE: f64 = 1e-10;

/// Standard normal quantile.
fn normal_quantile(p: f64) -> f64 {
    std::f64::consts::SQRT_2 * erf_inv(2.0 * p - 1.0)
}

/// Wilson–Hilferty approximation of the `p` quantile of Gamma(`a`, 1).
fn wilson_hilferty(p: f64, a: f64) -> f64 {
    let z = normal_quantile(p);
    let c = 1.0 - 1.0 / (9.0 * a) + z / (3.0 * a.sqrt());
    a * c * c * c
}

/// `p` quantile of Gamma(`a`, 1), by Halley steps on the regularized lower
/// incomplete gamma function.
///
/// Starts from Wilson–Hilferty for `a > 1`, from a small-shape power law
/// otherwise. Quantiles in the far lower tail are taken from
/// `(p * Γ(1 + a))^(1 / a)` directly.
fn gamma_quantile(p: f64, a: f64) -> f64 {
    if a >= WILSON_HILFERTY_SHAPE {
        return wilson_hilferty(p, a).max(0.0);
    }

    let ln_gamma_a = ln_gamma(a);
    let mut y = if a > 1.0 {
        wilson_hilferty(p, a).max(1e-3)
    } else {
        let t = 1.0 - a * (0.253 + a * 0.12);
        if p < t { (p / t).powf(1.0 / a) } else { 1.0 - (1.0 - (p - t) / (1.0 - t)).ln() }
    };
    if y < TINY_QUANTILE {
        // P(a, y) ~ y^a / Γ(1 + a) this close to 0.
        return ((p.ln() + ln_gamma(1.0 + a)) / a).exp();
    }

    for _ in 0..MAX_HALLEY_STEPS {
        if y <= 0.0 {
            return 0.0;
        }
        let Ok(cdf) = checked_gamma_lr(a, y) else {
            return f64::NAN;
        };
        let density = ((a - 1.0) * y.ln() - y - ln_gamma_a).exp();
        if density == 0.0 || !density.is_finite() {
            break;
        }
        let t = (cdf - p) / density;
        let step = t / (1.0 - 0.5 * f64::min(1.0, t * ((a - 1.0) / y - 1.0)));
        y -= step;
        if y <= 0.0 {
            // Overshot past zero: halve the previous iterate instead.
            y = 0.5 * (y + step);
        }
        if step.abs() < REL_TOL * y {
            break;
        }
    }
    y
}

/// `p` quantile of the chi-square distribution with `dof` degrees of
/// freedom. Non-positive or non-finite `dof` yields NaN.
pub fn chi2_quantile(p: f64, dof: f64) -> f64 {
    if !dof.is_finite() || dof <= 0.0 || !(p > 0.0 && p < 1.0) {
        return f64::NAN;
    }
    2.0 * gamma_quantile(p, 0.5 * dof)
}

/// Equal-tail interval of a chi-square distribution with `dof` degrees of
/// freedom containing probability `confidence`.
///
/// Degenerate `dof` (zero, negative, non-finite) yields `(NaN, NaN)`; callers
/// decide how to treat it.
pub fn chi2_interval(confidence: f64, dof: f64) -> Result<(f64, f64)> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(Error::Validation(format!(
            "confidence must be in (0, 1), got {}",
            confidence
        )));
    }
    let alpha = 1.0 - confidence;
    Ok((chi2_quantile(alpha / 2.0, dof), chi2_quantile(1.0 - alpha / 2.0, dof)))
}

/// Asymmetric `(lower, upper)` error of a Poisson mean `v`.
///
/// Each bound `q` of the chi-square interval with `2v` degrees of freedom is
/// turned into a distance `|q/2 - 1 - v|`. Non-finite results (`v <= 0` or
/// non-finite `v`) become 0.
pub fn errors(v: f64, confidence: f64) -> Result<(f64, f64)> {
    let (q_lo, q_hi) = chi2_interval(confidence, 2.0 * v)?;
    let to_err = |q: f64| {
        let e = (q / 2.0 - 1.0 - v).abs();
        if e.is_finite() { e } else { 0.0 }
    };
    Ok((to_err(q_lo), to_err(q_hi)))
}
