#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use crate::segment::{self, CopyNumberSegment, DEFAULT_PHRED_DECIMALS};

/// Formatting options for segments files. Construct one up front and
/// pass it to the writers; the precision is read every time a row is
/// formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct FormatConfig {
    /// Number of digits after the decimal point in quality scores
    #[cfg_attr(feature = "serde1", serde(default = "default_phred_decimals"))]
    pub phred_decimals: usize,
}

#[cfg(feature = "serde1")]
fn default_phred_decimals() -> usize {
    DEFAULT_PHRED_DECIMALS
}

impl Default for FormatConfig {
    fn default() -> Self {
        FormatConfig {
            phred_decimals: DEFAULT_PHRED_DECIMALS,
        }
    }
}

impl FormatConfig {
    pub fn new(phred_decimals: usize) -> Self {
        FormatConfig { phred_decimals }
    }

    pub fn format_quality(&self, quality: Option<f64>) -> String {
        segment::format_quality(quality, self.phred_decimals)
    }

    pub fn format_row(&self, segment: &CopyNumberSegment) -> String {
        segment.to_row(self.phred_decimals)
    }

    #[cfg(feature = "serde1")]
    pub fn from_json_str(input: &str) -> serde_json::Result<Self> {
        serde_json::from_str(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_precision() {
        let config = FormatConfig::default();
        assert_eq!(config.phred_decimals, 2);
        assert_eq!(config.format_quality(Some(3.14159)), "3.14");
        assert_eq!(config.format_quality(None), ".");
    }

    #[test]
    fn precision_is_read_when_formatting() {
        let mut segment = CopyNumberSegment::new("chr2", 10, 20, 1, 1, 2);
        segment.set_some_quality(3.14159).unwrap();

        let mut config = FormatConfig::new(0);
        assert_eq!(config.format_row(&segment), "chr2\t10\t20\t1\t1\t2\t3\t.\t.\t.");

        config.phred_decimals = 3;
        assert_eq!(
            config.format_row(&segment),
            "chr2\t10\t20\t1\t1\t2\t3.142\t.\t.\t."
        );
    }

    #[cfg(feature = "serde1")]
    #[test]
    fn config_from_json() {
        let config = FormatConfig::from_json_str(r#"{"phred_decimals": 4}"#).unwrap();
        assert_eq!(config, FormatConfig::new(4));

        let config = FormatConfig::from_json_str("{}").unwrap();
        assert_eq!(config, FormatConfig::default());

        assert!(FormatConfig::from_json_str(r#"{"phred_decimals": -1}"#).is_err());
    }
}
