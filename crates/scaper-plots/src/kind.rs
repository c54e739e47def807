//! Plot kinds understood by the bundled engines

use std::fmt;
use std::str::FromStr;

use scaper_core::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlotKind {
    // Basic 2D plots
    Scatter,
    Bar,
    Histogram,

    // Two-way summaries
    Histogram2d,
    Fluctuation,

    // Multi-dimensional plots
    ParallelCoordinates,

    // Free text
    Note,
}

impl PlotKind {
    pub const ALL: [PlotKind; 7] = [
        PlotKind::Scatter,
        PlotKind::Bar,
        PlotKind::Histogram,
        PlotKind::Histogram2d,
        PlotKind::Fluctuation,
        PlotKind::ParallelCoordinates,
        PlotKind::Note,
    ];

    /// Canonical name
    pub fn name(&self) -> &'static str {
        match self {
            PlotKind::Scatter => "scatter",
            PlotKind::Bar => "bar",
            PlotKind::Histogram => "histogram",
            PlotKind::Histogram2d => "histogram2d",
            PlotKind::Fluctuation => "fluctuation",
            PlotKind::ParallelCoordinates => "pcoords",
            PlotKind::Note => "note",
        }
    }
}

impl FromStr for PlotKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scatter" => Ok(PlotKind::Scatter),
            "bar" => Ok(PlotKind::Bar),
            "histogram" | "histo" => Ok(PlotKind::Histogram),
            "histogram2d" | "histo2d" => Ok(PlotKind::Histogram2d),
            "fluctuation" | "fluct" => Ok(PlotKind::Fluctuation),
            "pcoords" | "parallel" => Ok(PlotKind::ParallelCoordinates),
            "note" | "noteplot" => Ok(PlotKind::Note),
            _ => Err(EngineError::UnsupportedPlotType(s.to_string())),
        }
    }
}

impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for kind in PlotKind::ALL {
            assert_eq!(kind.name().parse::<PlotKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_aliases_and_unknown() {
        assert_eq!("histo".parse::<PlotKind>(), Ok(PlotKind::Histogram));
        assert_eq!("Fluct".parse::<PlotKind>(), Ok(PlotKind::Fluctuation));
        assert_eq!(
            "pie".parse::<PlotKind>(),
            Err(EngineError::UnsupportedPlotType("pie".to_string()))
        );
    }
}
