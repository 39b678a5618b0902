//! Badge status colours

use serde::{Deserialize, Serialize};
use std::fmt;

/// Colour a coverage badge is rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    /// 30 % or less
    Red,
    /// 31 % to 75 %
    Yellow,
    /// More than 75 %
    Green,
    /// Fallback when no range applies
    Blue,
}

impl StatusColor {
    /// Classify a whole-number percentage
    ///
    /// | percent | colour |
    /// |---------|--------|
    /// | ≤ 30    | red    |
    /// | 31–75   | yellow |
    /// | > 75    | green  |
    #[must_use]
    pub const fn from_percent(percent: i64) -> Self {
        if percent <= 30 {
            return Self::Red;
        }
        if percent > 30 && percent <= 75 {
            return Self::Yellow;
        }
        if percent > 75 {
            return Self::Green;
        }
        Self::Blue
    }

    /// Lowercase label as used in badge URLs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Blue => "blue",
        }
    }
}

impl fmt::Display for StatusColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_partition_boundaries() {
        assert_eq!(StatusColor::from_percent(0), StatusColor::Red);
        assert_eq!(StatusColor::from_percent(30), StatusColor::Red);
        assert_eq!(StatusColor::from_percent(31), StatusColor::Yellow);
        assert_eq!(StatusColor::from_percent(75), StatusColor::Yellow);
        assert_eq!(StatusColor::from_percent(76), StatusColor::Green);
        assert_eq!(StatusColor::from_percent(100), StatusColor::Green);
    }

    #[test]
    fn test_out_of_range_values_still_classified() {
        assert_eq!(StatusColor::from_percent(-5), StatusColor::Red);
        assert_eq!(StatusColor::from_percent(250), StatusColor::Green);
    }

    #[test]
    fn test_labels() {
        assert_eq!(StatusColor::Red.to_string(), "red");
        assert_eq!(StatusColor::Yellow.as_str(), "yellow");
        assert_eq!(StatusColor::Green.as_str(), "green");
        assert_eq!(StatusColor::Blue.as_str(), "blue");
    }

    proptest! {
        #[test]
        fn prop_integer_input_never_blue(percent in any::<i64>()) {
            prop_assert_ne!(StatusColor::from_percent(percent), StatusColor::Blue);
        }

        #[test]
        fn prop_monotonic(a in 0i64..=100, b in 0i64..=100) {
            let rank = |c: StatusColor| match c {
                StatusColor::Red => 0,
                StatusColor::Yellow => 1,
                StatusColor::Green => 2,
                StatusColor::Blue => 3,
            };
            if a <= b {
                prop_assert!(rank(StatusColor::from_percent(a)) <= rank(StatusColor::from_percent(b)));
            }
        }
    }
}
