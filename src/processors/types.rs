//! Types used in tensor processing operations
//!
//! This module defines the layout descriptors shared by the flip transforms
//! and the batch orchestration.
use ndarray::Axis;
use serde::{Deserialize, Serialize};

/// Specifies the order of axes in a single image or prediction tensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChannelOrder {
    /// Channel, Height, Width order (common in PyTorch)
    #[default]
    CHW,
    /// Height, Width, Channel order (common in TensorFlow)
    HWC,
}

impl ChannelOrder {
    /// Axis holding image rows. Reversing it is a vertical flip.
    pub fn height_axis(self) -> Axis {
        match self {
            ChannelOrder::CHW => Axis(1),
            ChannelOrder::HWC => Axis(0),
        }
    }

    /// Axis holding image columns. Reversing it is a horizontal flip.
    pub fn width_axis(self) -> Axis {
        match self {
            ChannelOrder::CHW => Axis(2),
            ChannelOrder::HWC => Axis(1),
        }
    }
}

impl std::fmt::Display for ChannelOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelOrder::CHW => write!(f, "CHW"),
            ChannelOrder::HWC => write!(f, "HWC"),
        }
    }
}
