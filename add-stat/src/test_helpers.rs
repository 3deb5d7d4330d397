//! Small in-memory fonts for unit tests

use write_fonts::{
    read::tables::name::Name as ReadName,
    tables::name::{Name, NameRecord},
    types::{NameId, Tag},
    FontBuilder,
};

/// (platform, encoding, language) for Windows / Unicode BMP / US English
pub(crate) const WIN_EN: (u16, u16, u16) = (3, 1, 0x0409);

pub(crate) const PASSTHROUGH_TAG: Tag = Tag::new(b"TEST");
pub(crate) const PASSTHROUGH_DATA: &[u8] = b"left alone";

pub(crate) type NameSpec<'a> = ((u16, u16, u16), u16, &'a str);

pub(crate) fn name(records: &[NameSpec]) -> Name {
    let mut table = Name::default();
    table.name_record = records
        .iter()
        .map(|((platform, encoding, language), id, text)| {
            NameRecord::new(
                *platform,
                *encoding,
                *language,
                NameId::new(*id),
                text.to_string().into(),
            )
        })
        .collect();
    table.name_record.sort();
    table
}

/// A compiled name table.
pub(crate) fn name_table(records: &[NameSpec]) -> Vec<u8> {
    write_fonts::dump_table(&name(records)).unwrap()
}

pub(crate) type RawNameSpec<'a> = ((u16, u16, u16), u16, &'a [u8]);

/// A version 0 name table with already encoded strings, records in the
/// order given.
pub(crate) fn raw_name_table(records: &[RawNameSpec]) -> Vec<u8> {
    let storage_offset = 6 + 12 * records.len() as u16;
    let mut data = Vec::new();
    data.extend_from_slice(&0u16.to_be_bytes());
    data.extend_from_slice(&(records.len() as u16).to_be_bytes());
    data.extend_from_slice(&storage_offset.to_be_bytes());
    let mut storage = Vec::new();
    for ((platform, encoding, language), id, string) in records {
        for field in [
            *platform,
            *encoding,
            *language,
            *id,
            string.len() as u16,
            storage.len() as u16,
        ] {
            data.extend_from_slice(&field.to_be_bytes());
        }
        storage.extend_from_slice(string);
    }
    data.extend_from_slice(&storage);
    data
}

/// Every record of `name`, with its string as stored.
pub(crate) fn raw_records(name: &ReadName) -> Vec<((u16, u16, u16), u16, Vec<u8>)> {
    let storage = name.string_data();
    name.name_record()
        .iter()
        .map(|record| {
            let start = record.string_offset().to_u32() as usize;
            let end = start + record.length() as usize;
            (
                (
                    record.platform_id(),
                    record.encoding_id(),
                    record.language_id(),
                ),
                record.name_id().to_u16(),
                storage.as_bytes()[start..end].to_vec(),
            )
        })
        .collect()
}

pub(crate) const HEAD_TAG: Tag = Tag::new(b"head");
pub(crate) const NAME_TAG: Tag = Tag::new(b"name");

/// A version 1.0 head table with the given flags.
pub(crate) fn head(flags: u16) -> Vec<u8> {
    let mut data = Vec::with_capacity(54);
    data.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // version
    data.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // font revision
    data.extend_from_slice(&0u32.to_be_bytes()); // checksum adjustment
    data.extend_from_slice(&0x5F0F_3CF5u32.to_be_bytes()); // magic
    data.extend_from_slice(&flags.to_be_bytes());
    data.extend_from_slice(&1000u16.to_be_bytes()); // units per em
    data.extend_from_slice(&[0; 16]); // created, modified
    for bound in [-100i16, -250, 900, 800] {
        data.extend_from_slice(&bound.to_be_bytes());
    }
    data.extend_from_slice(&0u16.to_be_bytes()); // mac style
    data.extend_from_slice(&8u16.to_be_bytes()); // lowest rec ppem
    data.extend_from_slice(&2i16.to_be_bytes()); // font direction hint
    data.extend_from_slice(&0i16.to_be_bytes()); // index to loc format
    data.extend_from_slice(&0i16.to_be_bytes()); // glyph data format
    data
}

/// A font with head, name and one opaque table.
pub(crate) fn font(records: &[NameSpec], head_flags: u16) -> Vec<u8> {
    font_with_name_table(name_table(records), head_flags)
}

/// Like [`font`], with a name table that has already been compiled.
pub(crate) fn font_with_name_table(name: Vec<u8>, head_flags: u16) -> Vec<u8> {
    let mut builder = FontBuilder::new();
    builder
        .add_raw(NAME_TAG, name)
        .add_raw(HEAD_TAG, head(head_flags))
        .add_raw(PASSTHROUGH_TAG, PASSTHROUGH_DATA);
    builder.build()
}

/// A font with head and one opaque table, but no name table.
pub(crate) fn font_without_name() -> Vec<u8> {
    let mut builder = FontBuilder::new();
    builder
        .add_raw(HEAD_TAG, head(0))
        .add_raw(PASSTHROUGH_TAG, PASSTHROUGH_DATA);
    builder.build()
}
