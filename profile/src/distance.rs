use crate::{math::quantize, C};
use serde::{Serialize, Serializer};
use std::fmt;

/// Distance along a profile with a fixed precision of one tenth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Distance {
    tenths: i64,
}

impl Distance {
    /// Rounds `value` half up to the nearest tenth.
    pub fn new(value: C) -> Self {
        Self {
            tenths: quantize(value, 1),
        }
    }

    pub fn from_tenths(tenths: i64) -> Self {
        Self { tenths }
    }

    pub fn tenths(self) -> i64 {
        self.tenths
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn get(self) -> C {
        self.tenths as C / 10.0
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.tenths < 0 { "-" } else { "" };
        let tenths = self.tenths.unsigned_abs();
        write!(f, "{sign}{}.{}", tenths / 10, tenths % 10)
    }
}

impl Serialize for Distance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.get())
    }
}
