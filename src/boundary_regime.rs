use crate::WorkingPrecision;

/// How a boundary segment is treated during one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryRegime {
    /// Tidal height and edge-normal velocity are imposed
    Specified,

    /// Interior state is extrapolated onto the boundary
    Open,
}

impl BoundaryRegime {
    pub fn is_open(self) -> bool {
        self == BoundaryRegime::Open
    }
}

/// Classifies a mixed segment from the tidal phase and which half of the channel it sits in.
///
/// While `cos(omega * t) >= 0` (ebb) segments north of `y_threshold` are open and the southern
/// ones specified; during flood the roles swap. Nothing is remembered between calls.
pub fn select_regime(
    omega: WorkingPrecision,
    time: WorkingPrecision,
    y: WorkingPrecision,
    y_threshold: WorkingPrecision,
) -> BoundaryRegime {
    let ebb = (omega * time).cos() >= 0.0;
    let north = y > y_threshold;

    if ebb == north {
        BoundaryRegime::Open
    } else {
        BoundaryRegime::Specified
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;

    const OMEGA: WorkingPrecision = 2.0 * PI / (12.0 * 3600.0);

    #[test]
    fn ebb_opens_the_northern_half() {
        assert_eq!(select_regime(OMEGA, 0.0, 2000.0, 1500.0), BoundaryRegime::Open);
        assert_eq!(
            select_regime(OMEGA, 0.0, 1000.0, 1500.0),
            BoundaryRegime::Specified
        );
    }

    #[test]
    fn flood_opens_the_southern_half() {
        let flood = 6.0 * 3600.0;
        assert_eq!(
            select_regime(OMEGA, flood, 2000.0, 1500.0),
            BoundaryRegime::Specified
        );
        assert_eq!(select_regime(OMEGA, flood, 1000.0, 1500.0), BoundaryRegime::Open);
    }

    #[test]
    fn threshold_itself_belongs_to_the_southern_half() {
        assert_eq!(
            select_regime(OMEGA, 0.0, 1500.0, 1500.0),
            BoundaryRegime::Specified
        );
    }

    #[test]
    fn selection_is_idempotent() {
        for step in 0..100 {
            let time = step as WorkingPrecision * 997.0;
            for &y in &[0.0, 1499.0, 1501.0, 3000.0] {
                assert_eq!(
                    select_regime(OMEGA, time, y, 1500.0),
                    select_regime(OMEGA, time, y, 1500.0)
                );
            }
        }
    }
}
