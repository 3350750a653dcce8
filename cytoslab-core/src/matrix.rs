//! In-memory event matrix.

use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Events-by-channels matrix of `f64` values stored channel-major.
///
/// Logically the matrix has `n_events` rows and `n_channels` columns; column
/// `c` is the contiguous run `values[c * n_events..(c + 1) * n_events]`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawEventMatrix"))]
pub struct EventMatrix {
    n_events: usize,
    n_channels: usize,
    values: Vec<f64>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    labels: Option<Vec<String>>,
}

/// Unchecked wire form; validated on conversion into [`EventMatrix`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawEventMatrix {
    n_events: usize,
    n_channels: usize,
    values: Vec<f64>,
    #[serde(default)]
    labels: Option<Vec<String>>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawEventMatrix> for EventMatrix {
    type Error = Error;

    fn try_from(raw: RawEventMatrix) -> Result<Self> {
        let matrix = Self::from_channel_major(raw.n_events, raw.n_channels, raw.values)?;
        match raw.labels {
            Some(labels) => matrix.with_labels(labels),
            None => Ok(matrix),
        }
    }
}

impl EventMatrix {
    /// Wraps a channel-major buffer.
    ///
    /// # Errors
    /// Returns [`Error::ShapeMismatch`] if `values.len() != n_events * n_channels`.
    pub fn from_channel_major(
        n_events: usize,
        n_channels: usize,
        values: Vec<f64>,
    ) -> Result<Self> {
        let expected = n_events.checked_mul(n_channels).ok_or_else(|| {
            Error::ShapeMismatch(format!("{n_events} x {n_channels} overflows usize"))
        })?;
        if values.len() != expected {
            return Err(Error::ShapeMismatch(format!(
                "buffer has {} values, expected {n_events} x {n_channels}",
                values.len()
            )));
        }
        Ok(Self {
            n_events,
            n_channels,
            values,
            labels: None,
        })
    }

    /// Builds a matrix from per-channel columns of equal length.
    ///
    /// # Errors
    /// Returns [`Error::ShapeMismatch`] if the columns differ in length.
    pub fn from_columns(columns: &[Vec<f64>]) -> Result<Self> {
        let n_events = columns.first().map_or(0, Vec::len);
        let mut values = Vec::with_capacity(n_events * columns.len());
        for (idx, column) in columns.iter().enumerate() {
            if column.len() != n_events {
                return Err(Error::ShapeMismatch(format!(
                    "column {idx} has {} events, expected {n_events}",
                    column.len()
                )));
            }
            values.extend_from_slice(column);
        }
        Self::from_channel_major(n_events, columns.len(), values)
    }

    /// A matrix with no rows and `n_channels` columns.
    #[must_use]
    pub fn empty(n_channels: usize) -> Self {
        Self {
            n_events: 0,
            n_channels,
            values: Vec::new(),
            labels: None,
        }
    }

    /// Attaches column labels.
    ///
    /// # Errors
    /// Returns [`Error::ShapeMismatch`] if the label count differs from the channel count.
    pub fn with_labels(mut self, labels: Vec<String>) -> Result<Self> {
        if labels.len() != self.n_channels {
            return Err(Error::ShapeMismatch(format!(
                "{} labels for {} channels",
                labels.len(),
                self.n_channels
            )));
        }
        self.labels = Some(labels);
        Ok(self)
    }

    #[must_use]
    pub fn n_events(&self) -> usize {
        self.n_events
    }

    #[must_use]
    pub fn n_channels(&self) -> usize {
        self.n_channels
    }

    /// Returns (rows, columns), i.e. (events, channels).
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_events, self.n_channels)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Channel-major backing buffer.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn labels(&self) -> Option<&[String]> {
        self.labels.as_deref()
    }

    /// Values of one column.
    ///
    /// # Panics
    /// Panics if `channel >= n_channels`.
    #[must_use]
    pub fn column(&self, channel: usize) -> &[f64] {
        assert!(channel < self.n_channels, "column {channel} out of range");
        let start = channel * self.n_events;
        &self.values[start..start + self.n_events]
    }

    /// Value at (event, channel), or `None` outside the matrix.
    #[must_use]
    pub fn get(&self, event: usize, channel: usize) -> Option<f64> {
        if event >= self.n_events || channel >= self.n_channels {
            return None;
        }
        self.values.get(channel * self.n_events + event).copied()
    }

    /// Iterates over columns in channel order.
    pub fn columns(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.n_channels).map(move |c| self.column(c))
    }
}
