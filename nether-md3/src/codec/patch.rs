//! Reserve-then-patch offset slots
//!
//! Phase one writes a zero in place of an offset and remembers where it went.
//! Phase two, once the dependent block has been written, overwrites the slot
//! with a positioned write and returns the cursor to the write head.

use std::io::{Seek, SeekFrom, Write};

use crate::error::{Md3Error, Result};
use crate::primitives::write_i32;

/// Position of an i32 placeholder in the output stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Placeholder {
    pos: u64,
}

impl Placeholder {
    /// Write a zero i32 and remember its position
    pub(crate) fn reserve<W: Write + Seek>(w: &mut W) -> Result<Self> {
        let pos = w.stream_position()?;
        write_i32(w, 0)?;
        Ok(Self { pos })
    }

    pub(crate) fn position(&self) -> u64 {
        self.pos
    }

    /// Overwrite the slot with `value`, then seek back to where we were
    pub(crate) fn patch<W: Write + Seek>(self, w: &mut W, value: i32) -> Result<()> {
        let resume = w.stream_position()?;
        w.seek(SeekFrom::Start(self.pos))?;
        write_i32(w, value)?;
        w.seek(SeekFrom::Start(resume))?;
        tracing::trace!(at = self.pos, value, "patched offset");
        Ok(())
    }

    /// Patch the slot with the current position relative to `base`
    ///
    /// Returns the value that was written.
    pub(crate) fn patch_here<W: Write + Seek>(self, w: &mut W, base: u64) -> Result<i32> {
        let here = w.stream_position()?;
        let relative = here
            .checked_sub(base)
            .ok_or(Md3Error::OffsetOverflow(here))?;
        let value = i32::try_from(relative).map_err(|_| Md3Error::OffsetOverflow(relative))?;
        self.patch(w, value)?;
        Ok(value)
    }
}

/// Reserve `N` consecutive placeholders
pub(crate) fn reserve_slots<W: Write + Seek, const N: usize>(
    w: &mut W,
) -> Result<[Placeholder; N]> {
    let mut slots = [Placeholder { pos: 0 }; N];
    for slot in &mut slots {
        *slot = Placeholder::reserve(w)?;
    }
    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reserve_and_patch() {
        let mut cursor = Cursor::new(Vec::new());
        cursor.write_all(b"HEAD").unwrap();
        let slot = Placeholder::reserve(&mut cursor).unwrap();
        assert_eq!(slot.position(), 4);

        cursor.write_all(b"body").unwrap();
        let value = slot.patch_here(&mut cursor, 0).unwrap();
        assert_eq!(value, 12);
        assert_eq!(cursor.position(), 12);

        cursor.write_all(b"!").unwrap();
        let data = cursor.into_inner();
        assert_eq!(&data[4..8], &12i32.to_le_bytes());
        assert_eq!(&data[8..], b"body!");
    }

    #[test]
    fn test_patch_relative_to_base() {
        let mut cursor = Cursor::new(vec![0u8; 100]);
        cursor.set_position(100);
        let [a, b] = reserve_slots::<_, 2>(&mut cursor).unwrap();
        assert_eq!(a.position(), 100);
        assert_eq!(b.position(), 104);

        cursor.write_all(&[0u8; 10]).unwrap();
        assert_eq!(b.patch_here(&mut cursor, 100).unwrap(), 18);
        assert_eq!(a.patch_here(&mut cursor, 100).unwrap(), 18);
        assert_eq!(cursor.position(), 118);
    }

    #[test]
    fn test_base_after_cursor_is_rejected() {
        let mut cursor = Cursor::new(Vec::new());
        let slot = Placeholder::reserve(&mut cursor).unwrap();
        assert!(matches!(
            slot.patch_here(&mut cursor, 50),
            Err(Md3Error::OffsetOverflow(4))
        ));
    }
}
