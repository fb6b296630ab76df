use tracing::info;

/// Mouse button a gesture maps to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    Left,
    Right,
}

/// A queued pointer mutation.
///
/// Motion and clicks travel through one bounded queue to the pointer task,
/// so ordering between a move and a click planned from the same frame is
/// preserved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerAction {
    Move { dx: i32, dy: i32 },
    Click(Button),
}

#[derive(Debug, thiserror::Error)]
pub enum PointerError {
    #[error("pointer backend failed: {0}")]
    Backend(String),
}

/// Seam over the OS pointer device. Only the pointer task calls this.
pub trait Pointer: Send {
    fn move_rel(&mut self, dx: i32, dy: i32) -> Result<(), PointerError>;
    fn click(&mut self, button: Button) -> Result<(), PointerError>;
}

/// Pointer that only logs. Default backend when the `pointer` feature is
/// off, and a safe stand-in on machines where grabbing the mouse is
/// unwelcome.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingPointer;

impl Pointer for TracingPointer {
    fn move_rel(&mut self, dx: i32, dy: i32) -> Result<(), PointerError> {
        info!(dx, dy, "pointer move");
        Ok(())
    }

    fn click(&mut self, button: Button) -> Result<(), PointerError> {
        info!(?button, "pointer click");
        Ok(())
    }
}

#[cfg(feature = "pointer")]
pub use enigo_backend::EnigoPointer;

#[cfg(feature = "pointer")]
mod enigo_backend {
    use enigo::{Button as EnigoButton, Coordinate, Direction, Enigo, Mouse, Settings};

    use super::{Button, Pointer, PointerError};

    /// Real OS pointer via enigo.
    pub struct EnigoPointer {
        enigo: Enigo,
    }

    impl EnigoPointer {
        pub fn new() -> Result<Self, PointerError> {
            let enigo = Enigo::new(&Settings::default())
                .map_err(|e| PointerError::Backend(e.to_string()))?;
            Ok(Self { enigo })
        }
    }

    impl Pointer for EnigoPointer {
        fn move_rel(&mut self, dx: i32, dy: i32) -> Result<(), PointerError> {
            self.enigo
                .move_mouse(dx, dy, Coordinate::Rel)
                .map_err(|e| PointerError::Backend(e.to_string()))
        }

        fn click(&mut self, button: Button) -> Result<(), PointerError> {
            let button = match button {
                Button::Left => EnigoButton::Left,
                Button::Right => EnigoButton::Right,
            };
            self.enigo
                .button(button, Direction::Click)
                .map_err(|e| PointerError::Backend(e.to_string()))
        }
    }
}
