//! Player input shared with the UI thread
//!
//! The UI writes, the simulation reads at the next tick boundary. Values are
//! single atomics so there is no lock on the render loop; the latest write
//! wins.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

#[derive(Debug)]
struct InputCell {
    /// f32 bits of the target x; NaN bits mean "no target yet"
    target_x: AtomicU32,
    shockwave_requested: AtomicBool,
}

/// Cloneable handle to the shared input cell
#[derive(Debug, Clone)]
pub struct InputHandle {
    cell: Arc<InputCell>,
}

impl Default for InputHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandle {
    pub fn new() -> Self {
        Self {
            cell: Arc::new(InputCell {
                target_x: AtomicU32::new(f32::NAN.to_bits()),
                shockwave_requested: AtomicBool::new(false),
            }),
        }
    }

    /// Absolute horizontal pixel target for the ship
    pub fn set_target_x(&self, x: f32) {
        self.cell.target_x.store(x.to_bits(), Ordering::Release);
    }

    /// Ask for the shockwave on the next tick
    pub fn request_shockwave(&self) {
        self.cell.shockwave_requested.store(true, Ordering::Release);
    }

    /// Latest target, if one was ever written
    pub fn target_x(&self) -> Option<f32> {
        let x = f32::from_bits(self.cell.target_x.load(Ordering::Acquire));
        x.is_finite().then_some(x)
    }

    /// Consume a pending shockwave request
    pub fn take_shockwave_request(&self) -> bool {
        self.cell.shockwave_requested.swap(false, Ordering::AcqRel)
    }
}
