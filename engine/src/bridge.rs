//! One-shot hand-off from the root node to the blocked caller

use crate::outcome::Evaluation;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};

/// The root decision node's parent: a single-use completion slot.
#[derive(Debug)]
pub(crate) struct Bridge {
    slot: Sender<Evaluation>,
    fulfilled: AtomicBool,
}

impl Bridge {
    /// Create the slot and the receiving end the caller blocks on.
    pub fn open() -> (Bridge, Receiver<Evaluation>) {
        let (slot, answer) = bounded(1);
        let bridge = Bridge {
            slot,
            fulfilled: AtomicBool::new(false),
        };
        (bridge, answer)
    }

    /// Deliver the final result. Fulfilling twice is a broken invariant.
    pub fn fulfil(&self, result: Evaluation) {
        let already = self.fulfilled.swap(true, Ordering::AcqRel);
        assert!(!already, "root bridge fulfilled twice");
        if self.slot.send(result).is_err() {
            log::debug!("search caller gone, dropping root result");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivers_once() {
        let (bridge, answer) = Bridge::open();
        bridge.fulfil(Evaluation::leaf(0.5));
        assert_eq!(answer.recv().unwrap(), Evaluation::leaf(0.5));
    }

    #[test]
    #[should_panic(expected = "root bridge fulfilled twice")]
    fn test_double_fulfil_panics() {
        let (bridge, _answer) = Bridge::open();
        bridge.fulfil(Evaluation::leaf(0.0));
        bridge.fulfil(Evaluation::leaf(1.0));
    }

    #[test]
    fn test_receiver_gone_is_tolerated() {
        let (bridge, answer) = Bridge::open();
        drop(answer);
        bridge.fulfil(Evaluation::leaf(0.0));
    }
}
