use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the renderer's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Background,

    // Grid
    GridLine,
    AxisTick,
    AxisText,
    LaneLabelText,

    // Operation bars (machine view)
    BarOnTime,
    BarOnTimeBorder,
    BarLate,
    BarLateBorder,
    BarLabelText,
    BarSelected,

    // Routing view priority groups
    Priority0,
    Priority1,
    Priority2,
    PriorityDefault,
    ConnectorLine,

    // Tooltip
    TooltipBackground,
    TooltipText,
}
