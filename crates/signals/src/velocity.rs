//! Sales velocity and the policy for degenerate velocities.
//!
//! Velocity is kept as an exact ratio of units to days. Floor arithmetic on
//! it (days until stockout, units needed to cover a period) is done in
//! integers, so a velocity like 2/7 units per day covers exactly 2 units in
//! a week instead of 1.999...

use rust_decimal::Decimal;
use tracing::warn;

/// Units sold per day, as `units / days`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Velocity {
    units: u64,
    days: u64,
}

impl Velocity {
    /// One unit per day.
    pub const UNIT: Self = Self { units: 1, days: 1 };

    /// Create a velocity of `units` over `days`.
    ///
    /// Returns `None` when `days` is zero, since the rate is undefined.
    #[must_use]
    pub const fn new(units: u64, days: u64) -> Option<Self> {
        if days == 0 {
            None
        } else {
            Some(Self { units, days })
        }
    }

    /// Whether nothing sells at this rate.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.units == 0
    }

    /// Units per day as a decimal, at full precision.
    #[must_use]
    pub fn per_day(&self) -> Decimal {
        Decimal::from(self.units) / Decimal::from(self.days)
    }

    /// Units per day rounded to cents for reporting.
    ///
    /// Rounds half to even, except that a non-zero rate below one cent
    /// reports as `0.01` so it never reads as zero.
    #[must_use]
    pub fn per_day_rounded(&self) -> Decimal {
        let rounded = self.per_day().round_dp(2);
        if rounded.is_zero() && !self.is_zero() {
            Decimal::new(1, 2)
        } else {
            rounded
        }
    }

    /// Whole days until `stock` units are used up, rounded down.
    ///
    /// A zero velocity never depletes stock and yields `u64::MAX`.
    #[must_use]
    pub fn days_to_deplete(&self, stock: u64) -> u64 {
        if self.units == 0 {
            return u64::MAX;
        }
        let days = u128::from(stock) * u128::from(self.days) / u128::from(self.units);
        u64::try_from(days).unwrap_or(u64::MAX)
    }

    /// Whole units demanded over `days` days, rounded down.
    #[must_use]
    pub fn demand_over(&self, days: u64) -> u64 {
        let units = u128::from(self.units) * u128::from(days) / u128::from(self.days);
        u64::try_from(units).unwrap_or(u64::MAX)
    }
}

/// Decides the velocity to use when the observed one is missing or zero.
///
/// Implementations must return a non-zero velocity so that stockout
/// projection stays a finite division.
pub trait VelocityFallback {
    /// Resolve the velocity to forecast with.
    ///
    /// `observed` is `None` when the trailing window held no sales days.
    fn resolve(&self, observed: Option<Velocity>) -> Velocity;
}

/// Substitutes one unit per day for a missing or zero velocity.
///
/// Slow movers therefore still get a finite stockout horizon and a refill
/// suggestion instead of disappearing behind an infinite one.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitVelocityFallback;

impl VelocityFallback for UnitVelocityFallback {
    fn resolve(&self, observed: Option<Velocity>) -> Velocity {
        match observed {
            Some(velocity) if !velocity.is_zero() => velocity,
            _ => Velocity::UNIT,
        }
    }
}

/// Apply `policy`, falling back to [`Velocity::UNIT`] if it returns zero.
pub(crate) fn resolve_velocity<F: VelocityFallback>(
    policy: &F,
    observed: Option<Velocity>,
) -> Velocity {
    let velocity = policy.resolve(observed);
    if velocity.is_zero() {
        warn!("Velocity fallback policy returned zero; using one unit per day");
        Velocity::UNIT
    } else {
        velocity
    }
}
