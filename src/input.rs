//! Scripted keyboard input, which replaces a real window in the headless demo.

use std::collections::BTreeMap;

use crate::events::Key;

/// Sequence of key presses bound to frame numbers.
#[derive(Debug, Default, Clone)]
pub struct InputScript {
    presses: BTreeMap<u32, Vec<Key>>,
}

impl InputScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a press of `key` at `frame`.
    /// Several keys pressed at the same frame are reported in the order of addition.
    pub fn press(mut self, frame: u32, key: Key) -> Self {
        self.presses.entry(frame).or_default().push(key);
        self
    }

    /// Script of the demo level: the player flies around and stops.
    pub fn demo() -> Self {
        Self::new()
            .press(10, Key::Right)
            .press(40, Key::Up)
            .press(70, Key::Left)
            .press(90, Key::Down)
            .press(110, Key::Space)
    }

    /// Keys pressed at `frame`.
    pub fn keys_at(&self, frame: u32) -> &[Key] {
        self.presses.get(&frame).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of scripted presses.
    pub fn len(&self) -> usize {
        self.presses.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.presses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_at() {
        let script = InputScript::new()
            .press(2, Key::Right)
            .press(0, Key::Up)
            .press(2, Key::Space);

        assert_eq!(script.keys_at(0), &[Key::Up]);
        assert!(script.keys_at(1).is_empty());
        assert_eq!(script.keys_at(2), &[Key::Right, Key::Space]);
        assert_eq!(script.len(), 3);
        assert!(InputScript::new().is_empty());
    }
}
