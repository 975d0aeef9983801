use crate::errors::{MaterializeError, ValidationError};
use crate::generators::{draw_distinct_indices, seeded_rng};

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::iter::FusedIterator;
use std::path::Path;
use std::time::Instant;

use rand::Rng;
use tracing::{debug, info};

pub const DEFAULT_PREFIX: &str = "013";
pub const DEFAULT_MIDDLE_LEN: u32 = 6;
pub const DEFAULT_LAST_TWO: &str = "29";

/// Widest middle segment whose space size still fits in a `u64`.
pub const MAX_MIDDLE_LEN: u32 = 19;

#[cfg(windows)]
const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
const LINE_ENDING: &str = "\n";

/// Every string of the form `prefix + zero_padded(middle, middle_len) + last_two`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberSpace {
    prefix: String,
    middle_len: u32,
    last_two: String,
    size: u64,
}

impl NumberSpace {
    pub fn new(prefix: &str, middle_len: u32, last_two: &str) -> Result<Self, ValidationError> {
        if last_two.len() != 2 {
            return Err(ValidationError::new(format!(
                "last_two must be exactly 2 digits (e.g. '29'), got '{}'",
                last_two
            )));
        }

        if !is_numeric(prefix) || !is_numeric(last_two) {
            return Err(ValidationError::new(format!(
                "prefix and last_two must be numeric strings, got '{}' and '{}'",
                prefix, last_two
            )));
        }

        if middle_len == 0 || middle_len > MAX_MIDDLE_LEN {
            return Err(ValidationError::new(format!(
                "middle_len must be between 1 and {}, got {}",
                MAX_MIDDLE_LEN, middle_len
            )));
        }

        Ok(Self {
            prefix: prefix.to_string(),
            middle_len,
            last_two: last_two.to_string(),
            size: 10u64.pow(middle_len),
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn middle_len(&self) -> u32 {
        self.middle_len
    }

    pub fn last_two(&self) -> &str {
        &self.last_two
    }

    /// Number of members, `10^middle_len`.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Renders the member at `index`.
    pub fn member(&self, index: u64) -> Result<String, ValidationError> {
        self.check_index(index)?;
        Ok(self.render(index))
    }

    /// Recovers the middle index of `number`, or `None` if it is not a member.
    pub fn index_of(&self, number: &str) -> Option<u64> {
        let middle = number
            .strip_prefix(self.prefix.as_str())?
            .strip_suffix(self.last_two.as_str())?;

        if middle.len() != self.middle_len as usize || !is_numeric(middle) {
            return None;
        }

        middle.parse().ok()
    }

    /// Lazily walks the whole space in ascending index order.
    pub fn iter(&self) -> Numbers {
        Numbers {
            space: self.clone(),
            front: 0,
            back: self.size,
        }
    }

    /// Lazily walks the members whose index lies in `start..=end`.
    pub fn range(&self, start: u64, end: u64) -> Result<Numbers, ValidationError> {
        if start > end || end >= self.size {
            return Err(ValidationError::new(format!(
                "start/end out of valid range: need 0 <= {} <= {} < {}",
                start, end, self.size
            )));
        }

        Ok(Numbers {
            space: self.clone(),
            front: start,
            back: end + 1,
        })
    }

    pub fn sample_contiguous_range(&self, start: u64, end: u64) -> Result<Vec<String>, ValidationError> {
        Ok(self.range(start, end)?.collect())
    }

    /// Picks `n` distinct members at random, sorted by index.
    ///
    /// With a `seed` the draw is reproducible; otherwise the generator is
    /// seeded from the operating system.
    pub fn sample(&self, n: u64, seed: Option<u64>) -> Result<Vec<String>, ValidationError> {
        let mut rng = seeded_rng(seed);
        self.sample_with(&mut rng, n)
    }

    pub fn sample_with<R: Rng + ?Sized>(&self, rng: &mut R, n: u64) -> Result<Vec<String>, ValidationError> {
        self.check_sample_size(n)?;

        let picks = draw_distinct_indices(rng, n, self.size);
        debug!(n, size = self.size, "sampled space");

        Ok(picks.into_iter().map(|i| self.render(i)).collect())
    }

    /// Streams every member to `writer`, one per line. Returns the line count.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<u64> {
        let mut written = 0;

        for number in self.iter() {
            writer.write_all(number.as_bytes())?;
            writer.write_all(LINE_ENDING.as_bytes())?;
            written += 1;
        }

        writer.flush()?;

        Ok(written)
    }

    /// Writes the whole space to `destination`, replacing its contents.
    ///
    /// The file is written in place: a failure midway leaves it partially written.
    pub fn materialize(&self, destination: &Path) -> Result<u64, MaterializeError> {
        let start = Instant::now();

        let file = File::create(destination).map_err(|e| {
            MaterializeError::with_source(format!("could not create {}: {}", destination.display(), e), e)
        })?;
        let written = self.write_to(BufWriter::new(file))?;

        info!(
            destination = %destination.display(),
            lines = written,
            elapsed = ?start.elapsed(),
            "materialized number space"
        );

        Ok(written)
    }

    fn check_index(&self, index: u64) -> Result<(), ValidationError> {
        if index >= self.size {
            return Err(ValidationError::new(format!(
                "index {} out of valid range 0..{}",
                index, self.size
            )));
        }
        Ok(())
    }

    fn check_sample_size(&self, n: u64) -> Result<(), ValidationError> {
        if n > self.size {
            return Err(ValidationError::new(format!(
                "n cannot be larger than the total number of combinations ({} > {})",
                n, self.size
            )));
        }
        Ok(())
    }

    fn render(&self, index: u64) -> String {
        format!(
            "{}{:0width$}{}",
            self.prefix,
            index,
            self.last_two,
            width = self.middle_len as usize
        )
    }
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Iterator over a contiguous run of a [`NumberSpace`].
#[derive(Debug, Clone)]
pub struct Numbers {
    space: NumberSpace,
    front: u64,
    back: u64,
}

impl Iterator for Numbers {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.front >= self.back {
            return None;
        }

        let number = self.space.render(self.front);
        self.front += 1;
        Some(number)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.back - self.front) {
            Ok(remaining) => (remaining, Some(remaining)),
            Err(_) => (usize::MAX, None),
        }
    }

    fn nth(&mut self, n: usize) -> Option<String> {
        self.front = self.front.saturating_add(n as u64).min(self.back);
        self.next()
    }
}

impl DoubleEndedIterator for Numbers {
    fn next_back(&mut self) -> Option<String> {
        if self.front >= self.back {
            return None;
        }

        self.back -= 1;
        Some(self.space.render(self.back))
    }
}

impl FusedIterator for Numbers {}

pub fn enumerate(prefix: &str, middle_len: u32, last_two: &str) -> Result<Numbers, ValidationError> {
    Ok(NumberSpace::new(prefix, middle_len, last_two)?.iter())
}

pub fn materialize_to_storage(
    destination: &Path,
    prefix: &str,
    middle_len: u32,
    last_two: &str,
) -> Result<u64, MaterializeError> {
    let space = NumberSpace::new(prefix, middle_len, last_two)?;
    space.materialize(destination)
}

pub fn sample_without_replacement(
    n: u64,
    prefix: &str,
    middle_len: u32,
    last_two: &str,
    seed: Option<u64>,
) -> Result<Vec<String>, ValidationError> {
    NumberSpace::new(prefix, middle_len, last_two)?.sample(n, seed)
}

pub fn sample_contiguous_range(
    start_index: u64,
    end_index: u64,
    prefix: &str,
    middle_len: u32,
    last_two: &str,
) -> Result<Vec<String>, ValidationError> {
    NumberSpace::new(prefix, middle_len, last_two)?.sample_contiguous_range(start_index, end_index)
}
