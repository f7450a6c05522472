//! The fixed messages the type-directed codec is built on.
//!
//! Every value is carried by exactly one of these shapes. Scalars omit
//! default values, so an empty buffer decodes as zero / empty.
//!
//! | Message | Fields |
//! |---|---|
//! | [`IntegerValue`] | `int64 value = 1` |
//! | [`FloatValue`] | `double value = 1` |
//! | [`StringValue`] | `bytes value = 1` |
//! | [`ArchiveMember`] | `bytes data = 1` |
//! | [`SequenceValue`] | `repeated ArchiveMember values = 1` |
//! | [`AssociateEntry`] | `ArchiveMember key = 1; ArchiveMember value = 2` |
//! | [`AssociateValue`] | `repeated AssociateEntry values = 1` |
//! | [`Archive`] | `repeated ArchiveMember members = 1` |

use alloc::vec::Vec;

use crate::{Message, WireError, WireValue, WireWriter};

// -----------------------------------------------------------------------------
// Scalars

/// Carrier for every integer-like value.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntegerValue {
    pub value: i64,
}

impl Message for IntegerValue {
    fn encode_fields(&self, writer: &mut WireWriter) {
        if self.value != 0 {
            writer.write_int64(1, self.value);
        }
    }

    fn merge_field(&mut self, number: u32, value: WireValue<'_>) -> Result<(), WireError> {
        if number == 1 {
            self.value = value.as_int64(number)?;
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.value = 0;
    }
}

/// Carrier for every floating-point value.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FloatValue {
    pub value: f64,
}

impl Message for FloatValue {
    fn encode_fields(&self, writer: &mut WireWriter) {
        // `-0.0` is not the default and is kept.
        if self.value.to_bits() != 0 {
            writer.write_double(1, self.value);
        }
    }

    fn merge_field(&mut self, number: u32, value: WireValue<'_>) -> Result<(), WireError> {
        if number == 1 {
            self.value = value.as_double(number)?;
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.value = 0.0;
    }
}

/// Carrier for text and raw byte strings.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct StringValue {
    pub value: Vec<u8>,
}

impl Message for StringValue {
    fn encode_fields(&self, writer: &mut WireWriter) {
        if !self.value.is_empty() {
            writer.write_bytes(1, &self.value);
        }
    }

    fn merge_field(&mut self, number: u32, value: WireValue<'_>) -> Result<(), WireError> {
        if number == 1 {
            self.value.clear();
            self.value.extend_from_slice(value.as_bytes(number)?);
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.value.clear();
    }
}

// -----------------------------------------------------------------------------
// Containers

/// One independently encoded value.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct ArchiveMember {
    pub data: Vec<u8>,
}

impl ArchiveMember {
    #[inline]
    pub const fn new(data: Vec<u8>) -> Self {
        Self { data }
    }
}

impl Message for ArchiveMember {
    fn encode_fields(&self, writer: &mut WireWriter) {
        if !self.data.is_empty() {
            writer.write_bytes(1, &self.data);
        }
    }

    fn merge_field(&mut self, number: u32, value: WireValue<'_>) -> Result<(), WireError> {
        if number == 1 {
            self.data.clear();
            self.data.extend_from_slice(value.as_bytes(number)?);
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.data.clear();
    }
}

/// Elements of a sequence or set, in encounter order.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct SequenceValue {
    pub values: Vec<ArchiveMember>,
}

impl Message for SequenceValue {
    fn encode_fields(&self, writer: &mut WireWriter) {
        for member in &self.values {
            writer.write_message(1, member);
        }
    }

    fn merge_field(&mut self, number: u32, value: WireValue<'_>) -> Result<(), WireError> {
        if number == 1 {
            let mut member = ArchiveMember::default();
            value.merge_into(number, &mut member)?;
            self.values.push(member);
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.values.clear();
    }
}

/// A key/value pair of a map.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct AssociateEntry {
    pub key: ArchiveMember,
    pub value: ArchiveMember,
}

impl Message for AssociateEntry {
    fn encode_fields(&self, writer: &mut WireWriter) {
        writer.write_message(1, &self.key);
        writer.write_message(2, &self.value);
    }

    fn merge_field(&mut self, number: u32, value: WireValue<'_>) -> Result<(), WireError> {
        match number {
            1 => value.merge_into(number, &mut self.key),
            2 => value.merge_into(number, &mut self.value),
            _ => Ok(()),
        }
    }

    fn clear(&mut self) {
        self.key.clear();
        self.value.clear();
    }
}

/// Entries of a map, in encounter order.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct AssociateValue {
    pub values: Vec<AssociateEntry>,
}

impl Message for AssociateValue {
    fn encode_fields(&self, writer: &mut WireWriter) {
        for entry in &self.values {
            writer.write_message(1, entry);
        }
    }

    fn merge_field(&mut self, number: u32, value: WireValue<'_>) -> Result<(), WireError> {
        if number == 1 {
            let mut entry = AssociateEntry::default();
            value.merge_into(number, &mut entry)?;
            self.values.push(entry);
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.values.clear();
    }
}

/// An ordered, untyped list of encoded values.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct Archive {
    pub members: Vec<ArchiveMember>,
}

impl Message for Archive {
    fn encode_fields(&self, writer: &mut WireWriter) {
        for member in &self.members {
            writer.write_message(1, member);
        }
    }

    fn merge_field(&mut self, number: u32, value: WireValue<'_>) -> Result<(), WireError> {
        if number == 1 {
            let mut member = ArchiveMember::default();
            value.merge_into(number, &mut member)?;
            self.members.push(member);
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.members.clear();
    }
}

// -----------------------------------------------------------------------------
// Tests
