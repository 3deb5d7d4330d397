//! Look up and allocate entries in the name table

use std::collections::{BTreeSet, HashMap};

use write_fonts::{
    read::{
        tables::name::{Name as ReadName, NameRecord as ReadNameRecord},
        FontData, TopLevelTable,
    },
    types::NameId,
};

use crate::Error;

pub const WINDOWS_PLATFORM_ID: u16 = 3;
pub const WINDOWS_UNICODE_BMP_ENCODING_ID: u16 = 1;
pub const WINDOWS_ENGLISH_US_LANGUAGE_ID: u16 = 0x0409;

/// Ids below this are reserved by the OpenType spec for predefined names.
const FIRST_FONT_SPECIFIC_NAME_ID: u16 = 256;

/// An owned name table that can hand out ids for strings.
///
/// Only Windows / Unicode BMP / US English records take part in lookups and
/// only records of that kind are ever added. Ids of records on every other
/// platform are still considered taken.
///
/// Existing records keep their encoded string bytes exactly, whatever their
/// encoding, so records that cannot be decoded are written back unchanged.
#[derive(Clone, Debug)]
pub struct NameTable {
    version: u16,
    records: Vec<RawNameRecord>,
    // encoded (UTF-16BE) language tags of a version 1 table
    lang_tags: Vec<Vec<u8>>,
    // (id, text) of every decodable Windows English record, in table order
    windows_english: Vec<(NameId, String)>,
    used_ids: BTreeSet<u16>,
}

/// A name record whose string is still in its original encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
struct RawNameRecord {
    platform_id: u16,
    encoding_id: u16,
    language_id: u16,
    name_id: NameId,
    string: Vec<u8>,
}

impl RawNameRecord {
    fn sort_key(&self) -> (u16, u16, u16, u16) {
        (
            self.platform_id,
            self.encoding_id,
            self.language_id,
            self.name_id.to_u16(),
        )
    }
}

impl NameTable {
    /// Take an owned copy of the font's name table.
    pub fn new(name: &ReadName) -> Self {
        let data = name.string_data();
        let mut windows_english = Vec::new();
        for record in name.name_record() {
            if !is_windows_english(record) {
                continue;
            }
            match decode_string(record, data) {
                Ok(text) => windows_english.push((record.name_id(), text)),
                Err(reason) => {
                    log::debug!("ignoring name record {}: {reason}", record.name_id())
                }
            }
        }

        let used_ids = name
            .name_record()
            .iter()
            .map(|record| record.name_id().to_u16())
            .collect();

        let storage = data.as_bytes();
        let records = name
            .name_record()
            .iter()
            .map(|record| RawNameRecord {
                platform_id: record.platform_id(),
                encoding_id: record.encoding_id(),
                language_id: record.language_id(),
                name_id: record.name_id(),
                string: stored_bytes(
                    storage,
                    record.string_offset().to_u32() as usize,
                    record.length(),
                )
                .unwrap_or_else(|| {
                    log::warn!(
                        "name record {} points past the string storage, writing it empty",
                        record.name_id()
                    );
                    Vec::new()
                }),
            })
            .collect();

        let lang_tags = name
            .lang_tag_record()
            .unwrap_or_default()
            .iter()
            .map(|record| {
                stored_bytes(
                    storage,
                    record.lang_tag_offset().to_u32() as usize,
                    record.length(),
                )
                .unwrap_or_else(|| {
                    log::warn!("language tag points past the string storage, writing it empty");
                    Vec::new()
                })
            })
            .collect();

        NameTable {
            version: name.version(),
            records,
            lang_tags,
            windows_english,
            used_ids,
        }
    }

    /// Return the id of a Windows English record with this exact text,
    /// adding a new record if none exists.
    ///
    /// New records get the smallest unused id that is at least 256.
    pub fn ensure_name(&mut self, text: &str) -> Result<NameId, Error> {
        if let Some(id) = self.find(text) {
            log::debug!("reusing name {id} for '{text}'");
            return Ok(id);
        }

        let id = self.next_free_id().ok_or(Error::NameIdsExhausted)?;
        self.records.push(RawNameRecord {
            platform_id: WINDOWS_PLATFORM_ID,
            encoding_id: WINDOWS_UNICODE_BMP_ENCODING_ID,
            language_id: WINDOWS_ENGLISH_US_LANGUAGE_ID,
            name_id: id,
            string: text.encode_utf16().flat_map(u16::to_be_bytes).collect(),
        });
        self.windows_english.push((id, text.to_owned()));
        self.used_ids.insert(id.to_u16());
        log::debug!("added name {id} for '{text}'");
        Ok(id)
    }

    /// The Windows English string for `id`, if there is one.
    pub fn get(&self, id: NameId) -> Option<&str> {
        self.windows_english
            .iter()
            .find(|(candidate, _)| *candidate == id)
            .map(|(_, text)| text.as_str())
    }

    /// The total number of records, on all platforms.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serialize the table.
    ///
    /// Records are sorted by (platform, encoding, language, name id) and
    /// identical strings share storage. A version 1 table keeps its language
    /// tags.
    pub fn compile(&self) -> Result<Vec<u8>, Error> {
        let mut records = self.records.iter().collect::<Vec<_>>();
        records.sort_by_key(|record| record.sort_key());

        let mut storage = StringStorage::default();
        let mut header = Vec::new();
        for record in &records {
            let (length, offset) = storage.add(&record.string)?;
            for field in [
                record.platform_id,
                record.encoding_id,
                record.language_id,
                record.name_id.to_u16(),
                length,
                offset,
            ] {
                header.extend_from_slice(&field.to_be_bytes());
            }
        }

        let version = self.version.min(1);
        if version == 1 {
            let count = u16::try_from(self.lang_tags.len())
                .map_err(|_| too_large("too many language tags"))?;
            header.extend_from_slice(&count.to_be_bytes());
            for tag in &self.lang_tags {
                let (length, offset) = storage.add(tag)?;
                header.extend_from_slice(&length.to_be_bytes());
                header.extend_from_slice(&offset.to_be_bytes());
            }
        }

        let count =
            u16::try_from(records.len()).map_err(|_| too_large("too many name records"))?;
        // version, count and storageOffset come first
        let storage_offset = u16::try_from(6 + header.len())
            .map_err(|_| too_large("name records do not fit before the storage"))?;

        let mut data = Vec::with_capacity(storage_offset as usize + storage.data.len());
        data.extend_from_slice(&version.to_be_bytes());
        data.extend_from_slice(&count.to_be_bytes());
        data.extend_from_slice(&storage_offset.to_be_bytes());
        data.extend_from_slice(&header);
        data.extend_from_slice(&storage.data);
        Ok(data)
    }

    fn find(&self, text: &str) -> Option<NameId> {
        self.windows_english
            .iter()
            .find(|(_, candidate)| candidate == text)
            .map(|(id, _)| *id)
    }

    fn next_free_id(&self) -> Option<NameId> {
        (FIRST_FONT_SPECIFIC_NAME_ID..=u16::MAX)
            .find(|id| !self.used_ids.contains(id))
            .map(NameId::new)
    }
}

/// The string storage area of a name table being written.
#[derive(Default)]
struct StringStorage {
    data: Vec<u8>,
    offsets: HashMap<Vec<u8>, u16>,
}

impl StringStorage {
    /// Add `string`, returning its length and offset.
    fn add(&mut self, string: &[u8]) -> Result<(u16, u16), Error> {
        let length =
            u16::try_from(string.len()).map_err(|_| too_large("name string is too long"))?;
        if let Some(offset) = self.offsets.get(string) {
            return Ok((length, *offset));
        }
        let offset = u16::try_from(self.data.len())
            .map_err(|_| too_large("string storage is larger than 64K"))?;
        self.data.extend_from_slice(string);
        self.offsets.insert(string.to_vec(), offset);
        Ok((length, offset))
    }
}

fn too_large(reason: &str) -> Error {
    Error::CompileError {
        tag: ReadName::TAG,
        reason: reason.to_owned(),
    }
}

fn stored_bytes(storage: &[u8], offset: usize, length: u16) -> Option<Vec<u8>> {
    storage
        .get(offset..offset + length as usize)
        .map(<[u8]>::to_vec)
}

fn is_windows_english(record: &ReadNameRecord) -> bool {
    record.platform_id() == WINDOWS_PLATFORM_ID
        && record.encoding_id() == WINDOWS_UNICODE_BMP_ENCODING_ID
        && record.language_id() == WINDOWS_ENGLISH_US_LANGUAGE_ID
}

/// Decode a record's string, treating lossy decoding as a failure.
fn decode_string(record: &ReadNameRecord, data: FontData) -> Result<String, String> {
    let text: String = record
        .string(data)
        .map_err(|e| e.to_string())?
        .chars()
        .collect();
    if text.contains(char::REPLACEMENT_CHARACTER) {
        return Err("string is not valid UTF-16".into());
    }
    Ok(text)
}
