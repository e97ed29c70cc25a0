// Assetto Corsa telemetry decoder.
// Invariants: pure and allocation-free; only the offsets in FRAME_LAYOUT are read.

use thiserror::Error;

use crate::model::TelemetrySample;
use crate::packet::{read_f32, FRAME_LAYOUT};

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("frame too short: {len} bytes, need at least {min}")]
    TooShort { len: usize, min: usize },
}

pub fn decode(frame: &[u8]) -> Result<TelemetrySample, DecodeError> {
    let layout = FRAME_LAYOUT;
    let too_short = DecodeError::TooShort {
        len: frame.len(),
        min: layout.min_len,
    };
    if frame.len() < layout.min_len {
        return Err(too_short);
    }

    let field = |offset| read_f32(frame, offset).ok_or(too_short);
    Ok(TelemetrySample {
        speed: field(layout.speed)?,
        throttle: field(layout.throttle)?,
        rpm: field(layout.rpm)?,
        max_rpm: field(layout.max_rpm)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with(len: usize, fields: &[(usize, f32)]) -> Vec<u8> {
        let mut buf = vec![0u8; len];
        for (offset, value) in fields {
            buf[*offset..*offset + 4].copy_from_slice(&value.to_le_bytes());
        }
        buf
    }

    #[test]
    fn rejects_short_frame() {
        let frame = vec![0u8; 40];
        assert_eq!(
            decode(&frame),
            Err(DecodeError::TooShort { len: 40, min: 80 })
        );
    }

    #[test]
    fn rejects_empty_frame() {
        assert!(matches!(decode(&[]), Err(DecodeError::TooShort { len: 0, .. })));
    }

    #[test]
    fn one_byte_short_is_rejected() {
        assert!(decode(&[0u8; 79]).is_err());
        assert!(decode(&[0u8; 80]).is_ok());
    }

    #[test]
    fn reads_fields_at_fixed_offsets() {
        let frame = frame_with(80, &[(12, 187.5), (56, 0.75), (68, 6250.0), (72, 8500.0)]);
        let sample = decode(&frame).expect("valid frame");
        assert_eq!(sample.speed, 187.5);
        assert_eq!(sample.throttle, 0.75);
        assert_eq!(sample.rpm, 6250.0);
        assert_eq!(sample.max_rpm, 8500.0);
    }

    #[test]
    fn ignores_trailing_bytes() {
        let mut frame = frame_with(328, &[(68, 4000.0), (72, 8000.0)]);
        frame[80..].fill(0xFF);
        let sample = decode(&frame).expect("valid frame");
        assert_eq!(sample.rpm, 4000.0);
        assert_eq!(sample.max_rpm, 8000.0);
    }

    #[test]
    fn ignores_bytes_between_fields() {
        let mut frame = vec![0xAAu8; 80];
        for offset in [12, 56, 68, 72] {
            frame[offset..offset + 4].copy_from_slice(&1.0f32.to_le_bytes());
        }
        let sample = decode(&frame).expect("valid frame");
        assert_eq!(sample.speed, 1.0);
        assert_eq!(sample.throttle, 1.0);
        assert_eq!(sample.rpm, 1.0);
        assert_eq!(sample.max_rpm, 1.0);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(proptest::test_runner::Config::with_cases(500))]

            #[test]
            fn prop_short_frame_is_too_short(
                data in proptest::collection::vec(any::<u8>(), 0usize..80)
            ) {
                let len = data.len();
                prop_assert_eq!(decode(&data), Err(DecodeError::TooShort { len, min: 80 }));
            }

            #[test]
            fn prop_arbitrary_bytes_never_panic(
                data in proptest::collection::vec(any::<u8>(), 0usize..512)
            ) {
                let _ = decode(&data);
            }

            #[test]
            fn prop_placed_values_are_read_back(
                speed in any::<f32>().prop_filter("finite", |v| v.is_finite()),
                throttle in 0.0f32..=1.0,
                rpm in 0.0f32..=20000.0,
                max_rpm in -1.0f32..=20000.0,
                extra in 0usize..256,
            ) {
                let frame = frame_with(
                    80 + extra,
                    &[(12, speed), (56, throttle), (68, rpm), (72, max_rpm)],
                );
                let sample = decode(&frame).map_err(|e| TestCaseError::fail(format!("{e:?}")))?;
                prop_assert_eq!(sample.speed.to_bits(), speed.to_bits());
                prop_assert_eq!(sample.throttle.to_bits(), throttle.to_bits());
                prop_assert_eq!(sample.rpm.to_bits(), rpm.to_bits());
                prop_assert_eq!(sample.max_rpm.to_bits(), max_rpm.to_bits());
            }
        }
    }
}
