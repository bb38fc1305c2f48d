use std::fmt::Display;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const ASPECT_RATIO_TOLERANCE: f64 = 0.05;

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AspectRatio {
    Landscape,
    Portrait,
    #[default]
    Other,
}

impl AspectRatio {
    pub fn classify(width: u32, height: u32) -> Self {
        if width == 0 || height == 0 {
            return AspectRatio::Other;
        }

        let ratio = f64::from(width) / f64::from(height);
        if (ratio - 16.0 / 9.0).abs() < ASPECT_RATIO_TOLERANCE {
            AspectRatio::Landscape
        } else if (ratio - 9.0 / 16.0).abs() < ASPECT_RATIO_TOLERANCE {
            AspectRatio::Portrait
        } else {
            AspectRatio::Other
        }
    }

    /// Classifies the first stream in `ffprobe -print_format json -show_streams` output
    /// that reports both dimensions.
    pub fn from_probe_json(raw: &[u8]) -> Result<Self> {
        let probe: ProbeOutput =
            serde_json::from_slice(raw).context("failed to unmarshal ffprobe output")?;

        let dimensions = probe
            .streams
            .iter()
            .find(|stream| stream.width > 0 && stream.height > 0)
            .map(|stream| (stream.width, stream.height));

        Ok(match dimensions {
            Some((width, height)) => Self::classify(width, height),
            None => AspectRatio::Other,
        })
    }

    /// Storage key namespace for this orientation.
    pub fn orientation_prefix(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "landscape",
            AspectRatio::Portrait => "portrait",
            AspectRatio::Other => "other",
        }
    }
}

impl Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ratio = match self {
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Other => "other",
        };
        write!(f, "{}", ratio)
    }
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
}
