use std::{fmt, io};

use jiff::{civil::Date, Span, Zoned};

use crate::{rotator::Rotate, Destination};

/// Calendar distance that must separate two rotations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Period {
    pub years: u32,
    pub months: u32,
    pub days: u32,
}
impl Period {
    pub fn years(years: u32) -> Self {
        Self {
            years,
            ..Self::default()
        }
    }

    pub fn months(months: u32) -> Self {
        Self {
            months,
            ..Self::default()
        }
    }

    pub fn days(days: u32) -> Self {
        Self {
            days,
            ..Self::default()
        }
    }

    /// `day` moved back by this period, with an overflowing day of month
    /// carried into the following month (Mar 31 less one month is Mar 2).
    ///
    /// `None` when the result falls before the earliest supported date.
    fn before(self, day: Date) -> Option<Date> {
        let months = i64::from(day.year()) * 12 + i64::from(day.month()) - 1
            - i64::from(self.years) * 12
            - i64::from(self.months);
        let year = i16::try_from(months.div_euclid(12)).ok()?;
        let month = i8::try_from(months.rem_euclid(12) + 1).ok()?;
        let days = Span::new()
            .try_days(i64::from(day.day()) - 1 - i64::from(self.days))
            .ok()?;
        Date::new(year, month, 1).ok()?.checked_add(days).ok()
    }
}

/// Rotates once the current calendar day is at least `period` past the day
/// of the last rotation.
///
/// `create` is given the start of the new day, in the clock's time zone.
/// The clock defaults to [`Zoned::now`].
pub struct TimeBucket<F, C = fn() -> Zoned> {
    period: Period,
    last_rotation: Option<Date>,
    clock: C,
    create: F,
}
impl<F> TimeBucket<F> {
    pub fn new<D>(period: Period, create: F) -> Self
    where
        F: FnMut(Zoned) -> io::Result<D>,
    {
        Self {
            period,
            last_rotation: None,
            clock: Zoned::now,
            create,
        }
    }
}
impl<F, C> TimeBucket<F, C> {
    pub fn with_clock<C2>(self, clock: C2) -> TimeBucket<F, C2>
    where
        C2: FnMut() -> Zoned,
    {
        TimeBucket {
            period: self.period,
            last_rotation: self.last_rotation,
            clock,
            create: self.create,
        }
    }

    pub fn period(&self) -> Period {
        self.period
    }

    /// Day of the last successful rotation, if any.
    pub fn last_rotation(&self) -> Option<Date> {
        self.last_rotation
    }

    fn is_due(&self, today: Date) -> bool {
        let Some(last_rotation) = self.last_rotation else {
            return true;
        };
        match self.period.before(today) {
            Some(threshold) => last_rotation <= threshold,
            None => false,
        }
    }
}
impl<F, C, D> Rotate for TimeBucket<F, C>
where
    F: FnMut(Zoned) -> io::Result<D>,
    C: FnMut() -> Zoned,
    D: Destination,
{
    type Destination = D;

    fn next(&mut self) -> io::Result<Option<D>> {
        let now = (self.clock)();
        let today = now.date();
        if !self.is_due(today) {
            return Ok(None);
        }

        let start_of_day = today
            .to_zoned(now.time_zone().clone())
            .map_err(io::Error::other)?;
        let destination = (self.create)(start_of_day)?;
        self.last_rotation = Some(today);
        Ok(Some(destination))
    }
}

impl<F, C> fmt::Debug for TimeBucket<F, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimeBucket")
            .field("period", &self.period)
            .field("last_rotation", &self.last_rotation)
            .finish_non_exhaustive()
    }
}
