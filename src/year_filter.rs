use chrono::Datelike;

/// Oldest publication year the filter accepts.
pub const MIN_YEAR: i32 = 1900;

/// Publication-year range with the invariant `min <= max` after every
/// single edit. Editing one bound past the other drags the other bound
/// along rather than rejecting the edit: raising `min` above `max` pulls
/// `max` up to match, and lowering `max` below `min` pulls `min` down.
/// Both bounds stay inside [1900, current calendar year].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    min: i32,
    max: i32,
}

impl YearRange {
    /// The full range: 1900 through the current calendar year.
    pub fn all() -> YearRange {
        YearRange {
            min: MIN_YEAR,
            max: current_year(),
        }
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn set_min(&mut self, proposed: i32) {
        self.min = proposed.clamp(MIN_YEAR, current_year());
        if self.min > self.max {
            self.max = self.min;
        }
    }

    pub fn set_max(&mut self, proposed: i32) {
        self.max = proposed.clamp(MIN_YEAR, current_year());
        if self.max < self.min {
            self.min = self.max;
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.min <= year && year <= self.max
    }
}

fn current_year() -> i32 {
    chrono::Local::now().year()
}

#[test]
fn test_raising_min_pulls_max_up() {
    let mut range = YearRange::all();
    range.set_max(2010);
    range.set_min(2015);
    assert_eq!(range.min(), 2015);
    assert_eq!(range.max(), 2015);
}

#[test]
fn test_lowering_max_pulls_min_down() {
    let mut range = YearRange::all();
    range.set_min(2015);
    range.set_max(2005);
    assert_eq!(range.min(), 2005);
    assert_eq!(range.max(), 2005);
}

#[test]
fn test_bounds_are_floored_and_capped() {
    let mut range = YearRange::all();
    range.set_min(1492);
    assert_eq!(range.min(), MIN_YEAR);

    range.set_max(9999);
    assert_eq!(range.max(), current_year());

    range.set_min(9999);
    assert_eq!(range.min(), current_year());
}

#[test]
fn test_invariant_holds_after_any_single_edit() {
    let mut range = YearRange::all();
    for edit in [1800, 2030, 1999, 2012, 1900, 2500, 1901] {
        range.set_min(edit);
        assert!(range.min() <= range.max());
        assert!(range.min() >= MIN_YEAR);
        assert!(range.max() <= current_year());

        range.set_max(edit);
        assert!(range.min() <= range.max());
        assert!(range.min() >= MIN_YEAR);
        assert!(range.max() <= current_year());
    }
}

#[test]
fn test_contains_is_inclusive() {
    let mut range = YearRange::all();
    range.set_min(2000);
    range.set_max(2010);
    assert!(range.contains(2000));
    assert!(range.contains(2010));
    assert!(!range.contains(1999));
    assert!(!range.contains(2011));
}
