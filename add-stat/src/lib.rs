//! Add a STAT table to static fonts.
//!
//! The style of each font (regular, bold or italic) is inferred from its file
//! name. From that a STAT table with `wght` and `ital` axes is built, the
//! names it refers to are added to the name table, and bit 3 of head.flags is
//! set. All other tables are copied unchanged.
mod head;
mod name;
mod stat;
mod style;

#[cfg(test)]
mod test_helpers;

pub use head::{fix_checksum_adjustment, update_head};
pub use name::NameTable;
pub use stat::{
    compile_stat, AxisSpec, AxisValueSpec, StatDescriptor, ITALIC_AXIS, WEIGHT_AXIS,
};
pub use style::Style;

use std::path::{Path, PathBuf};

use thiserror::Error;
use write_fonts::{
    read::{
        tables::{head::Head, name::Name, stat::Stat},
        FontRef, ReadError, TableProvider, TopLevelTable,
    },
    types::Tag,
    FontBuilder,
};

#[derive(Debug, Error)]
pub enum Error {
    #[error("Error accessing '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Error reading font data: {0}")]
    ReadError(#[from] ReadError),

    #[error("Font has no '{0}' table")]
    MissingTable(Tag),

    #[error("Compiling table '{tag}' failed: {reason}")]
    CompileError { tag: Tag, reason: String },

    #[error("No unused name ids are left")]
    NameIdsExhausted,
}

/// Add a STAT table for `style` to `font`, returning the new font data.
///
/// Any existing STAT table is replaced.
pub fn add_stat(font: &FontRef, style: Style) -> Result<Vec<u8>, Error> {
    let name = font.name().map_err(|e| missing_or_malformed(e, Name::TAG))?;
    let head = font.head().map_err(|e| missing_or_malformed(e, Head::TAG))?;

    let mut names = NameTable::new(&name);
    let stat = StatDescriptor::for_style(style).resolve(&mut names)?;
    let stat = compile_stat(&stat)?;
    let name = names.compile()?;
    let head = update_head(&head);

    let mut builder = FontBuilder::new();
    builder
        .add_raw(Stat::TAG, stat)
        .add_raw(Name::TAG, name)
        .add_table(&head)
        .map_err(|e| Error::CompileError {
            tag: e.tag,
            reason: e.inner.to_string(),
        })?
        .copy_missing_tables(font.clone());
    log::info!("attached STAT for {style} style");

    let mut data = builder.build();
    // keep the flavour (TrueType / CFF) of the input; this invalidates the
    // checksumAdjustment written by the builder
    let sfnt_version = font.table_directory().sfnt_version();
    data[..4].copy_from_slice(&sfnt_version.to_be_bytes());
    fix_checksum_adjustment(&mut data)?;
    Ok(data)
}

/// Add a STAT table to the font at `path`, overwriting the file.
///
/// The style is taken from the file name. Nothing is written unless the new
/// font was built successfully.
pub fn add_stat_to_file(path: &Path) -> Result<Style, Error> {
    let data = std::fs::read(path).map_err(|source| Error::Io {
        path: path.to_owned(),
        source,
    })?;
    let font = FontRef::new(&data)?;
    let style = Style::from_path(path);
    log::info!("{} classified as {style}", path.display());

    let output = add_stat(&font, style)?;
    std::fs::write(path, output).map_err(|source| Error::Io {
        path: path.to_owned(),
        source,
    })?;
    Ok(style)
}

fn missing_or_malformed(error: ReadError, tag: Tag) -> Error {
    match error {
        ReadError::TableIsMissing(_) => Error::MissingTable(tag),
        other => Error::ReadError(other),
    }
}
