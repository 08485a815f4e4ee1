//! Page-wide pointer ownership.
//!
//! Cards on the same page share one arbiter so that only the card that saw a
//! pointer-down may act on the matching pointer-up.

use std::cell::Cell;
use std::rc::Rc;

#[derive(Clone, Debug, Default)]
pub struct PointerArbiter {
    claimed: Rc<Cell<Option<i32>>>,
}

impl PointerArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `pointer_id`. Succeeds when nothing is claimed or the same
    /// pointer already holds the claim.
    pub fn try_claim(&self, pointer_id: i32) -> bool {
        match self.claimed.get() {
            None => {
                self.claimed.set(Some(pointer_id));
                true
            }
            Some(held) => held == pointer_id,
        }
    }

    /// Release the claim if `pointer_id` holds it.
    pub fn release(&self, pointer_id: i32) {
        if self.claimed.get() == Some(pointer_id) {
            self.claimed.set(None);
        }
    }

    pub fn holds(&self, pointer_id: i32) -> bool {
        self.claimed.get() == Some(pointer_id)
    }

    pub fn claimed(&self) -> Option<i32> {
        self.claimed.get()
    }
}
