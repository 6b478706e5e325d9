/*
Copyright 2020 Anish Jewalikar

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! The 16-key keypad latch. Mutated by the driver before `step()`;
//! `last_key` is cleared by the VM itself once a non-blocking
//! instruction completes.

pub const KEY_COUNT: usize = 16;

#[derive(Debug, Clone)]
pub struct InputLatch {
    keys: [bool; KEY_COUNT],
    last_key: Option<u8>,
}

impl Default for InputLatch {
    fn default() -> Self {
        Self::new()
    }
}

impl InputLatch {
    pub fn new() -> Self {
        Self {
            keys: [false; KEY_COUNT],
            last_key: None,
        }
    }

    /// Sets the pressed state of `key` (0..=15). Setting it pressed also
    /// latches `last_key`.
    pub fn set_key_state(&mut self, key: u8, pressed: bool) {
        self.keys[key as usize & 0xF] = pressed;
        if pressed {
            self.last_key = Some(key & 0xF);
        }
    }

    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys[key as usize & 0xF]
    }

    pub fn clear(&mut self) {
        self.keys.iter_mut().for_each(|k| *k = false);
        self.clear_last_key();
    }

    pub fn clear_last_key(&mut self) {
        self.last_key = None;
    }

    pub fn last_key(&self) -> Option<u8> {
        self.last_key
    }

    pub fn has_last_key(&self) -> bool {
        self.last_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setting_a_key_pressed_latches_last_key() {
        let mut inp = InputLatch::new();
        assert!(!inp.has_last_key());
        inp.set_key_state(4, true);
        assert!(inp.is_pressed(4));
        assert_eq!(inp.last_key(), Some(4));
    }

    #[test]
    fn releasing_a_key_does_not_latch() {
        let mut inp = InputLatch::new();
        inp.set_key_state(4, true);
        inp.clear_last_key();
        inp.set_key_state(4, false);
        assert!(!inp.is_pressed(4));
        assert!(!inp.has_last_key());
    }

    #[test]
    fn clear_resets_everything() {
        let mut inp = InputLatch::new();
        inp.set_key_state(9, true);
        inp.clear();
        assert!(!inp.is_pressed(9));
        assert!(!inp.has_last_key());
    }
}
