//! Little-endian primitive and fixed-width string helpers

use std::io::{Read, Write};

use glam::IVec3;

use crate::error::{Result, read_error};

fn read_array<R: Read, const N: usize>(r: &mut R) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    r.read_exact(&mut buf).map_err(read_error)?;
    Ok(buf)
}

/// Read a 16-bit signed little-endian integer
pub(crate) fn read_i16<R: Read>(r: &mut R) -> Result<i16> {
    Ok(i16::from_le_bytes(read_array(r)?))
}

/// Read a 16-bit unsigned little-endian integer
pub(crate) fn read_u16<R: Read>(r: &mut R) -> Result<u16> {
    Ok(u16::from_le_bytes(read_array(r)?))
}

/// Read a 32-bit signed little-endian integer
pub(crate) fn read_i32<R: Read>(r: &mut R) -> Result<i32> {
    Ok(i32::from_le_bytes(read_array(r)?))
}

/// Read a 32-bit little-endian float
pub(crate) fn read_f32<R: Read>(r: &mut R) -> Result<f32> {
    Ok(f32::from_le_bytes(read_array(r)?))
}

/// Read three consecutive i32 values
pub(crate) fn read_ivec3<R: Read>(r: &mut R) -> Result<IVec3> {
    Ok(IVec3::new(read_i32(r)?, read_i32(r)?, read_i32(r)?))
}

pub(crate) fn write_i16<W: Write>(w: &mut W, value: i16) -> Result<()> {
    w.write_all(&value.to_le_bytes())?;
    Ok(())
}

pub(crate) fn write_u16<W: Write>(w: &mut W, value: u16) -> Result<()> {
    w.write_all(&value.to_le_bytes())?;
    Ok(())
}

pub(crate) fn write_i32<W: Write>(w: &mut W, value: i32) -> Result<()> {
    w.write_all(&value.to_le_bytes())?;
    Ok(())
}

pub(crate) fn write_f32<W: Write>(w: &mut W, value: f32) -> Result<()> {
    w.write_all(&value.to_le_bytes())?;
    Ok(())
}

pub(crate) fn write_ivec3<W: Write>(w: &mut W, value: IVec3) -> Result<()> {
    write_i32(w, value.x)?;
    write_i32(w, value.y)?;
    write_i32(w, value.z)
}

/// Read an `n`-byte zero-padded string field
///
/// Exactly `n` bytes are consumed. Every zero byte is dropped, wherever it
/// sits in the field, and the remaining bytes are decoded as UTF-8 with
/// invalid sequences replaced.
pub fn read_fixed_string<R: Read>(r: &mut R, n: usize) -> Result<String> {
    let mut buf = vec![0u8; n];
    r.read_exact(&mut buf).map_err(read_error)?;
    buf.retain(|&b| b != 0);
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write a string into an `n`-byte zero-padded field
///
/// Strings longer than `n` bytes are cut to their first `n` bytes.
pub fn write_fixed_string<W: Write>(w: &mut W, s: &str, n: usize) -> Result<()> {
    let mut buf = vec![0u8; n];
    let bytes = s.as_bytes();
    let copy_len = bytes.len().min(n);
    buf[..copy_len].copy_from_slice(&bytes[..copy_len]);
    w.write_all(&buf)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Md3Error;
    use proptest::prelude::*;
    use std::io::Cursor;

    #[test]
    fn test_little_endian_layout() {
        let mut out = Vec::new();
        write_i16(&mut out, -2).unwrap();
        write_i32(&mut out, 0x0102_0304).unwrap();
        write_f32(&mut out, 1.0).unwrap();
        assert_eq!(
            out,
            [0xFE, 0xFF, 0x04, 0x03, 0x02, 0x01, 0x00, 0x00, 0x80, 0x3F]
        );

        let mut cursor = Cursor::new(&out[..]);
        assert_eq!(read_i16(&mut cursor).unwrap(), -2);
        assert_eq!(read_i32(&mut cursor).unwrap(), 0x0102_0304);
        assert_eq!(read_f32(&mut cursor).unwrap(), 1.0);
    }

    #[test]
    fn test_read_past_end() {
        let mut cursor = Cursor::new(&[1u8, 2, 3][..]);
        assert!(matches!(read_i32(&mut cursor), Err(Md3Error::UnexpectedEof)));
    }

    #[test]
    fn test_read_fixed_string_strips_all_zeros() {
        let mut cursor = Cursor::new(&b"ab\0cd\0\0\0"[..]);
        assert_eq!(read_fixed_string(&mut cursor, 8).unwrap(), "abcd");
        assert_eq!(cursor.position(), 8);
    }

    #[test]
    fn test_write_fixed_string_pads() {
        let mut out = Vec::new();
        write_fixed_string(&mut out, "tag", 6).unwrap();
        assert_eq!(out, b"tag\0\0\0");
    }

    #[test]
    fn test_exact_width_name_round_trips() {
        let name = "x".repeat(64);
        let mut out = Vec::new();
        write_fixed_string(&mut out, &name, 64).unwrap();
        assert_eq!(out.len(), 64);
        let back = read_fixed_string(&mut Cursor::new(&out[..]), 64).unwrap();
        assert_eq!(back, name);
    }

    #[test]
    fn test_overlong_name_truncates_without_overflow() {
        let name = format!("{}Z", "y".repeat(64));
        let mut out = Vec::new();
        write_fixed_string(&mut out, &name, 64).unwrap();
        write_i32(&mut out, 7).unwrap();
        assert_eq!(out.len(), 68);

        let mut cursor = Cursor::new(&out[..]);
        assert_eq!(read_fixed_string(&mut cursor, 64).unwrap(), "y".repeat(64));
        assert_eq!(read_i32(&mut cursor).unwrap(), 7);
    }

    proptest! {
        #[test]
        fn prop_names_without_zero_round_trip(name in "[a-zA-Z0-9_./]{0,64}") {
            let mut out = Vec::new();
            write_fixed_string(&mut out, &name, 64).unwrap();
            prop_assert_eq!(out.len(), 64);
            let back = read_fixed_string(&mut Cursor::new(&out[..]), 64).unwrap();
            prop_assert_eq!(back, name);
        }

        #[test]
        fn prop_long_names_decode_to_prefix(name in "[a-z]{17,40}") {
            let mut out = Vec::new();
            write_fixed_string(&mut out, &name, 16).unwrap();
            prop_assert_eq!(out.len(), 16);
            let back = read_fixed_string(&mut Cursor::new(&out[..]), 16).unwrap();
            prop_assert_eq!(back.as_str(), &name[..16]);
        }
    }
}
