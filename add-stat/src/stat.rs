//! Build the STAT table for a static font
//!
//! Every font gets the same two design axes, `wght` and `ital`, and one
//! axis value on each. Which values, and whether they are elidable, depends
//! on the [`Style`] of the font.

use write_fonts::{
    read::{tables::stat::Stat as ReadStat, TopLevelTable},
    tables::stat::{AxisRecord, AxisValue, AxisValueTableFlags, Stat},
    types::{Fixed, NameId, Tag},
};

use crate::{name::NameTable, Error, Style};

pub const WEIGHT_AXIS: Tag = Tag::new(b"wght");
pub const ITALIC_AXIS: Tag = Tag::new(b"ital");

/// The compiled table is STAT 1.1.
///
/// The serializer always writes 1.2, which only adds format 4 axis values.
const STAT_MINOR_VERSION: u16 = 1;

const WEIGHT_AXIS_INDEX: u16 = 0;
const ITALIC_AXIS_INDEX: u16 = 1;

/// A design axis, with its name as text.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisSpec {
    pub tag: Tag,
    pub name: &'static str,
    pub ordering: u16,
}

/// A single named value on a design axis.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisValueSpec {
    pub axis_index: u16,
    pub name: &'static str,
    pub value: f64,
    /// The paired value on the same axis, e.g. italic for roman.
    pub linked_value: Option<f64>,
    pub elidable: bool,
}

impl AxisValueSpec {
    /// Format 3 when there is a linked value, format 1 otherwise.
    pub fn format(&self) -> u16 {
        if self.linked_value.is_some() {
            3
        } else {
            1
        }
    }

    fn flags(&self) -> AxisValueTableFlags {
        if self.elidable {
            AxisValueTableFlags::ELIDABLE_AXIS_VALUE_NAME
        } else {
            AxisValueTableFlags::empty()
        }
    }

    fn to_axis_value(&self, value_name_id: NameId) -> AxisValue {
        let value = Fixed::from_f64(self.value);
        match self.linked_value {
            Some(linked_value) => AxisValue::format_3(
                self.axis_index,
                self.flags(),
                value_name_id,
                value,
                Fixed::from_f64(linked_value),
            ),
            None => AxisValue::format_1(self.axis_index, self.flags(), value_name_id, value),
        }
    }
}

/// The contents of a STAT table, before name ids are assigned.
#[derive(Clone, Debug, PartialEq)]
pub struct StatDescriptor {
    pub axes: Vec<AxisSpec>,
    pub values: Vec<AxisValueSpec>,
    pub elided_fallback_name: &'static str,
}

impl StatDescriptor {
    pub fn for_style(style: Style) -> Self {
        let weight = match style {
            Style::Italic => AxisValueSpec {
                axis_index: WEIGHT_AXIS_INDEX,
                name: "Regular",
                value: 400.0,
                linked_value: None,
                elidable: false,
            },
            Style::Bold => AxisValueSpec {
                axis_index: WEIGHT_AXIS_INDEX,
                name: "Bold",
                value: 700.0,
                linked_value: None,
                elidable: false,
            },
            Style::Regular => AxisValueSpec {
                axis_index: WEIGHT_AXIS_INDEX,
                name: "Regular",
                value: 400.0,
                linked_value: None,
                elidable: true,
            },
        };
        let italic = match style {
            Style::Italic => AxisValueSpec {
                axis_index: ITALIC_AXIS_INDEX,
                name: "Italic",
                value: 1.0,
                linked_value: None,
                elidable: false,
            },
            Style::Bold | Style::Regular => AxisValueSpec {
                axis_index: ITALIC_AXIS_INDEX,
                name: "Roman",
                value: 0.0,
                linked_value: Some(1.0),
                elidable: true,
            },
        };

        StatDescriptor {
            axes: vec![
                AxisSpec {
                    tag: WEIGHT_AXIS,
                    name: "Weight",
                    ordering: 0,
                },
                AxisSpec {
                    tag: ITALIC_AXIS,
                    name: "Italic",
                    ordering: 1,
                },
            ],
            values: vec![weight, italic],
            elided_fallback_name: "Regular",
        }
    }

    /// Assign name ids, adding names to `names` as needed.
    ///
    /// Names are resolved in order: axes, then axis values, then the elided
    /// fallback name.
    pub fn resolve(&self, names: &mut NameTable) -> Result<Stat, Error> {
        let design_axes = self
            .axes
            .iter()
            .map(|axis| {
                names
                    .ensure_name(axis.name)
                    .map(|name_id| AxisRecord::new(axis.tag, name_id, axis.ordering))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let axis_values = self
            .values
            .iter()
            .map(|value| {
                names
                    .ensure_name(value.name)
                    .map(|name_id| value.to_axis_value(name_id))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let elided_fallback_name_id = names.ensure_name(self.elided_fallback_name)?;

        Ok(Stat::new(design_axes, axis_values, elided_fallback_name_id))
    }
}

/// Serialize a STAT table, pinning its version to 1.1.
pub fn compile_stat(stat: &Stat) -> Result<Vec<u8>, Error> {
    let mut data = write_fonts::dump_table(stat).map_err(|e| Error::CompileError {
        tag: ReadStat::TAG,
        reason: e.to_string(),
    })?;
    // majorVersion, minorVersion are the first two fields
    let minor_version = data.get_mut(2..4).ok_or_else(|| Error::CompileError {
        tag: ReadStat::TAG,
        reason: "table is too short".into(),
    })?;
    minor_version.copy_from_slice(&STAT_MINOR_VERSION.to_be_bytes());
    Ok(data)
}
