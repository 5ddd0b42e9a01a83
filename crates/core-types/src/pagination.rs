use serde::Serialize;

/// Page size of the workout listing.
pub const WORKOUTS_PER_PAGE: u32 = 3;
/// Page size of the exercise listing.
pub const EXERCISES_PER_PAGE: u32 = 3;
/// Page size of the exercise list inside a workout's detail view.
pub const WORKOUT_EXERCISES_PER_PAGE: u32 = 4;

/// Splits a result set into fixed-size pages.
///
/// A page cursor never produces an error: a missing, non-numeric or
/// non-positive cursor resolves to the first page, and a cursor past the end
/// resolves to the last page. An empty result set still has one (empty) page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    per_page: u32,
}

impl Paginator {
    pub fn new(per_page: u32) -> Self {
        Self {
            per_page: per_page.max(1),
        }
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Number of pages needed for `total` rows.
    pub fn num_pages(&self, total: u64) -> u64 {
        if total == 0 {
            1
        } else {
            total.div_ceil(u64::from(self.per_page))
        }
    }

    /// Resolves the raw `page` query value against the size of the result set.
    pub fn locate(&self, raw_page: Option<&str>, total: u64) -> PageWindow {
        let num_pages = self.num_pages(total);
        let number = match raw_page.map(str::trim) {
            Some(raw) => match raw.parse::<i64>() {
                Ok(requested) if requested >= 1 => (requested as u64).min(num_pages),
                Ok(_) => 1,
                // Too large for an integer is still past the end.
                Err(_) if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) => num_pages,
                Err(_) => 1,
            },
            None => 1,
        };

        PageWindow {
            number,
            num_pages,
            per_page: self.per_page,
            total,
        }
    }
}

/// The slice of a result set selected by [`Paginator::locate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: u64,
    pub num_pages: u64,
    pub per_page: u32,
    pub total: u64,
}

impl PageWindow {
    /// Rows to skip, for `OFFSET`.
    pub fn offset(&self) -> i64 {
        ((self.number - 1) * u64::from(self.per_page)) as i64
    }

    /// Rows to take, for `LIMIT`.
    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    pub fn into_page<T>(self, items: Vec<T>) -> Page<T> {
        Page {
            items,
            number: self.number,
            num_pages: self.num_pages,
            total: self.total,
            has_previous: self.number > 1,
            has_next: self.number < self.num_pages,
            previous_page: (self.number > 1).then(|| self.number - 1),
            next_page: (self.number < self.num_pages).then(|| self.number + 1),
        }
    }
}

/// One page of results, as handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub total: u64,
    pub has_previous: bool,
    pub has_next: bool,
    pub previous_page: Option<u64>,
    pub next_page: Option<u64>,
}
