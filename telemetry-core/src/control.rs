// Control datagrams that ask the simulator to start and keep streaming.
// Invariants: every payload is three little-endian i32 values, 12 bytes total.

pub const CONTROL_DATAGRAM_LEN: usize = 12;

const IDENTIFIER: i32 = 1;
const VERSION: i32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlDatagram {
    Handshake,
    Subscribe,
}

impl ControlDatagram {
    pub fn operation(self) -> i32 {
        match self {
            ControlDatagram::Handshake => 0,
            ControlDatagram::Subscribe => 1,
        }
    }

    pub fn encode(self) -> [u8; CONTROL_DATAGRAM_LEN] {
        let mut out = [0u8; CONTROL_DATAGRAM_LEN];
        out[0..4].copy_from_slice(&IDENTIFIER.to_le_bytes());
        out[4..8].copy_from_slice(&VERSION.to_le_bytes());
        out[8..12].copy_from_slice(&self.operation().to_le_bytes());
        out
    }
}
