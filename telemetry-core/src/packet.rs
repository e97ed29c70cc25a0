// Frame layout of the simulator telemetry export.
// Invariants: offsets are protocol constants; every read is bounds-checked against the slice.

/// Byte positions of the fields this bridge decodes.
///
/// The export format carries no length or version header, so a layout
/// change is an edit to [`FRAME_LAYOUT`] and nothing else.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameLayout {
    pub speed: usize,
    pub throttle: usize,
    pub rpm: usize,
    pub max_rpm: usize,
    pub min_len: usize,
}

pub const FRAME_LAYOUT: FrameLayout = FrameLayout {
    speed: 12,
    throttle: 56,
    rpm: 68,
    max_rpm: 72,
    min_len: 80,
};

pub const MIN_FRAME_LEN: usize = FRAME_LAYOUT.min_len;

pub(crate) fn read_f32(payload: &[u8], offset: usize) -> Option<f32> {
    let bytes = payload.get(offset..offset + 4)?;
    Some(f32::from_le_bytes(bytes.try_into().ok()?))
}
