use alloc::vec::Vec;

use crate::{WireError, WireReader, WireValue, WireWriter};

/// A type with a fixed wire layout.
///
/// Implementors provide field-level hooks; the provided methods handle whole
/// buffers. Decoding follows the usual merge rules: scalar fields overwrite,
/// repeated fields append, unknown field numbers are skipped.
pub trait Message {
    /// Writes every present field.
    fn encode_fields(&self, writer: &mut WireWriter);

    /// Applies one decoded field.
    ///
    /// Field numbers the message does not know must be ignored.
    fn merge_field(&mut self, number: u32, value: WireValue<'_>) -> Result<(), WireError>;

    /// Resets every field to its default.
    fn clear(&mut self);

    /// Encodes the message into a fresh buffer.
    fn encode(&self) -> Vec<u8> {
        let mut writer = WireWriter::new();
        self.encode_fields(&mut writer);
        writer.into_bytes()
    }

    /// Merges `bytes` into the current contents.
    fn merge(&mut self, bytes: &[u8]) -> Result<(), WireError> {
        let mut reader = WireReader::new(bytes);
        while let Some((number, value)) = reader.next_field()? {
            self.merge_field(number, value)?;
        }
        Ok(())
    }

    /// Replaces the current contents with `bytes`.
    ///
    /// On error the message is left cleared.
    fn parse(&mut self, bytes: &[u8]) -> Result<(), WireError> {
        self.clear();
        let result = self.merge(bytes);
        if result.is_err() {
            self.clear();
        }
        result
    }

    /// Decodes a new message from `bytes`.
    fn decode(bytes: &[u8]) -> Result<Self, WireError>
    where
        Self: Default + Sized,
    {
        let mut message = Self::default();
        message.merge(bytes)?;
        Ok(message)
    }
}
