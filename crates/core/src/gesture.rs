//! Drag-to-pan gesture state machine: `Idle -> Panning -> Idle`.
//!
//! Each move reports the delta since the *previous* event of the same
//! gesture, not since the press — successive deltas are incremental, so a
//! long drag cannot accelerate away from the cursor.

/// State of the pan gesture, with the last recorded cursor x as payload.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PanGesture {
    #[default]
    Idle,
    Panning {
        last_x: f64,
    },
}

/// Effect of feeding one pointer event into the state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanEffect {
    None,
    /// An active drag moved by this many pixels since the last event.
    Moved { delta_px: f64 },
    /// A drag just started; any open tooltip must be suppressed.
    Started,
    Ended,
}

impl PanGesture {
    pub fn is_panning(&self) -> bool {
        matches!(self, Self::Panning { .. })
    }

    /// Pointer pressed on the chart surface.
    pub fn press(&mut self, x: f64) -> PanEffect {
        *self = Self::Panning { last_x: x };
        PanEffect::Started
    }

    /// Pointer moved. Outside a gesture this is hover, not panning.
    pub fn movement(&mut self, x: f64) -> PanEffect {
        match *self {
            Self::Idle => PanEffect::None,
            Self::Panning { last_x } => {
                *self = Self::Panning { last_x: x };
                PanEffect::Moved {
                    delta_px: x - last_x,
                }
            }
        }
    }

    /// Pointer released or left the drawing surface: unconditionally ends
    /// an in-progress gesture.
    pub fn release(&mut self) -> PanEffect {
        if self.is_panning() {
            *self = Self::Idle;
            PanEffect::Ended
        } else {
            PanEffect::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deltas_are_incremental_not_cumulative() {
        let mut g = PanGesture::default();
        assert_eq!(g.press(100.0), PanEffect::Started);
        assert_eq!(g.movement(110.0), PanEffect::Moved { delta_px: 10.0 });
        // A second move measures from 110, not from the press point.
        assert_eq!(g.movement(115.0), PanEffect::Moved { delta_px: 5.0 });
        assert_eq!(g.release(), PanEffect::Ended);
    }

    #[test]
    fn moves_outside_a_gesture_are_hover() {
        let mut g = PanGesture::default();
        assert_eq!(g.movement(50.0), PanEffect::None);
        assert_eq!(g.release(), PanEffect::None);
    }

    #[test]
    fn leave_mid_drag_cancels() {
        let mut g = PanGesture::default();
        g.press(0.0);
        g.movement(20.0);
        assert_eq!(g.release(), PanEffect::Ended);
        assert!(!g.is_panning());
        // Events after the cancel are ignored until the next press.
        assert_eq!(g.movement(40.0), PanEffect::None);
    }
}
