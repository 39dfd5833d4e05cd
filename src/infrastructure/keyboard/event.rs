//! `struct input_event` wire records understood by ydotoold

/// Size of one record on the wire
pub const EVENT_SIZE: usize = 24;

/// `EV_SYN`
pub const EV_SYN: u16 = 0;
/// `EV_KEY`
pub const EV_KEY: u16 = 1;
/// `SYN_REPORT`
pub const SYN_REPORT: u16 = 0;

/// One kernel input event.
///
/// The 16 leading timestamp bytes are left zero; the daemon stamps events
/// itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub kind: u16,
    pub code: u16,
    pub value: i32,
}

impl InputEvent {
    /// Key press (`pressed`) or release
    pub fn key(code: u16, pressed: bool) -> Self {
        Self {
            kind: EV_KEY,
            code,
            value: i32::from(pressed),
        }
    }

    /// Report terminator that makes the preceding key event take effect
    pub fn sync() -> Self {
        Self {
            kind: EV_SYN,
            code: SYN_REPORT,
            value: 0,
        }
    }

    /// Encode as a little-endian `input_event`
    pub fn to_bytes(self) -> [u8; EVENT_SIZE] {
        let mut buf = [0u8; EVENT_SIZE];
        buf[16..18].copy_from_slice(&self.kind.to_le_bytes());
        buf[18..20].copy_from_slice(&self.code.to_le_bytes());
        buf[20..24].copy_from_slice(&self.value.to_le_bytes());
        buf
    }

    /// Decode a record produced by [`InputEvent::to_bytes`]
    pub fn from_bytes(buf: &[u8; EVENT_SIZE]) -> Self {
        Self {
            kind: u16::from_le_bytes([buf[16], buf[17]]),
            code: u16::from_le_bytes([buf[18], buf[19]]),
            value: i32::from_le_bytes([buf[20], buf[21], buf[22], buf[23]]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_press_layout() {
        let bytes = InputEvent::key(30, true).to_bytes();
        assert_eq!(&bytes[..16], &[0u8; 16]);
        assert_eq!(&bytes[16..18], &[1, 0]);
        assert_eq!(&bytes[18..20], &[30, 0]);
        assert_eq!(&bytes[20..24], &[1, 0, 0, 0]);
    }

    #[test]
    fn key_release_layout() {
        let bytes = InputEvent::key(183, false).to_bytes();
        assert_eq!(&bytes[16..18], &[1, 0]);
        assert_eq!(&bytes[18..20], &[183, 0]);
        assert_eq!(&bytes[20..24], &[0, 0, 0, 0]);
    }

    #[test]
    fn sync_is_all_zero() {
        assert_eq!(InputEvent::sync().to_bytes(), [0u8; EVENT_SIZE]);
    }

    #[test]
    fn codes_above_255_use_both_bytes() {
        let bytes = InputEvent::key(0x102, true).to_bytes();
        assert_eq!(&bytes[18..20], &[0x02, 0x01]);
        assert_eq!(InputEvent::from_bytes(&bytes).code, 0x102);
    }
}
