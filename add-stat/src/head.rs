//! Updates to the font header

use write_fonts::{
    from_obj::FromTableRef,
    read::{
        tables::{
            compute_checksum,
            head::{Flags, Head as ReadHead},
        },
        FontRef, ReadError, TopLevelTable,
    },
    tables::head::Head,
};

use crate::Error;

/// Byte offset of checksumAdjustment in the head table
const CHECKSUM_ADJUSTMENT_OFFSET: usize = 8;
/// The whole font must sum to this
const CHECKSUM_MAGIC: u32 = 0xB1B0_AFBA;

/// Make an owned copy of `head` for the output font.
///
/// Sets bit 3 of head.flags (force integer ppem) and zeroes
/// checksumAdjustment, which is filled in by [`fix_checksum_adjustment`] once
/// the font has been assembled.
pub fn update_head(head: &ReadHead) -> Head {
    let mut head = Head::from_table_ref(head);
    head.flags |= Flags::FORCE_INTEGER_PPEM;
    head.checksum_adjustment = 0;
    head
}

/// Recompute checksumAdjustment for a fully assembled font.
///
/// Whatever value the field holds is discarded first, so this must be the
/// last change made to `font_data`.
pub fn fix_checksum_adjustment(font_data: &mut [u8]) -> Result<(), Error> {
    let head_offset = {
        let font = FontRef::new(font_data)?;
        font.table_directory()
            .table_records()
            .iter()
            .find(|record| record.tag() == ReadHead::TAG)
            .map(|record| record.offset() as usize)
            .ok_or(Error::MissingTable(ReadHead::TAG))?
    };
    let start = head_offset + CHECKSUM_ADJUSTMENT_OFFSET;
    font_data
        .get_mut(start..start + 4)
        .ok_or(ReadError::OutOfBounds)?
        .fill(0);
    let adjustment = CHECKSUM_MAGIC.wrapping_sub(compute_checksum(font_data));
    font_data[start..start + 4].copy_from_slice(&adjustment.to_be_bytes());
    Ok(())
}
