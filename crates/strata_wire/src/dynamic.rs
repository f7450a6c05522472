use alloc::collections::BTreeMap;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::{FieldKind, Message, MessageDescriptor, WireError, WireValue, WireWriter};

/// A message whose layout comes from a runtime [`MessageDescriptor`].
///
/// Every field is optional: a field is either absent or holds a value,
/// possibly an empty one. Present fields are written in declaration order.
///
/// ```
/// use strata_wire::{DynamicMessage, FieldDescriptor, Message, SchemaPool};
///
/// let mut pool = SchemaPool::new();
/// let desc = pool
///     .build_message("PointDynProto", "Point.proto", [FieldDescriptor::bytes("x", 1)])
///     .unwrap();
///
/// let mut msg = DynamicMessage::new(desc.clone());
/// msg.set_by_name("x", vec![1, 2]).unwrap();
///
/// let mut back = DynamicMessage::new(desc);
/// back.parse(&msg.encode()).unwrap();
/// assert_eq!(back.get(1), Some(&[1u8, 2][..]));
/// ```
#[derive(Debug, Clone)]
pub struct DynamicMessage {
    descriptor: Arc<MessageDescriptor>,
    values: BTreeMap<u32, Vec<u8>>,
}

impl DynamicMessage {
    pub fn new(descriptor: Arc<MessageDescriptor>) -> Self {
        Self {
            descriptor,
            values: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn descriptor(&self) -> &Arc<MessageDescriptor> {
        &self.descriptor
    }

    /// The value of field `number`, if present.
    pub fn get(&self, number: u32) -> Option<&[u8]> {
        self.values.get(&number).map(Vec::as_slice)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&[u8]> {
        let field = self.descriptor.field_by_name(name)?;
        self.get(field.number())
    }

    #[inline]
    pub fn has(&self, number: u32) -> bool {
        self.values.contains_key(&number)
    }

    /// Sets field `number`, which must be declared by the schema.
    pub fn set(&mut self, number: u32, value: Vec<u8>) -> Result<(), WireError> {
        if self.descriptor.field_by_number(number).is_none() {
            return Err(WireError::UndeclaredField(number));
        }
        self.values.insert(number, value);
        Ok(())
    }

    /// Sets a field by name. Returns `None` if the schema has no such field.
    pub fn set_by_name(&mut self, name: &str, value: Vec<u8>) -> Option<()> {
        let number = self.descriptor.field_by_name(name)?.number();
        self.values.insert(number, value);
        Some(())
    }

    /// Removes field `number` and returns its value.
    pub fn take(&mut self, number: u32) -> Option<Vec<u8>> {
        self.values.remove(&number)
    }
}

impl Message for DynamicMessage {
    fn encode_fields(&self, writer: &mut WireWriter) {
        for field in self.descriptor.fields() {
            if let Some(value) = self.values.get(&field.number()) {
                match field.kind() {
                    FieldKind::Bytes => writer.write_bytes(field.number(), value),
                }
            }
        }
    }

    fn merge_field(&mut self, number: u32, value: WireValue<'_>) -> Result<(), WireError> {
        let Some(field) = self.descriptor.field_by_number(number) else {
            return Ok(());
        };
        match field.kind() {
            FieldKind::Bytes => {
                let bytes = value.as_bytes(number)?;
                self.values.insert(number, bytes.to_vec());
            }
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldDescriptor, SchemaPool};
    use alloc::vec;

    fn descriptor() -> Arc<MessageDescriptor> {
        let mut pool = SchemaPool::new();
        pool.build_message(
            "WeaponDynProto",
            "Weapon.proto",
            [FieldDescriptor::bytes("type", 2), FieldDescriptor::bytes("name", 1)],
        )
        .unwrap()
    }

    #[test]
    fn empty_value_is_present() {
        let desc = descriptor();
        let mut msg = DynamicMessage::new(desc.clone());
        msg.set(1, Vec::new()).unwrap();

        let bytes = msg.encode();
        assert_eq!(bytes, vec![0x0A, 0x00]);

        let mut back = DynamicMessage::new(desc);
        back.parse(&bytes).unwrap();
        assert!(back.has(1));
        assert!(!back.has(2));
    }

    #[test]
    fn declaration_order() {
        let mut msg = DynamicMessage::new(descriptor());
        msg.set(1, vec![b'a']).unwrap();
        msg.set(2, vec![b'b']).unwrap();
        assert_eq!(msg.encode(), vec![0x12, 0x01, b'b', 0x0A, 0x01, b'a']);
    }

    #[test]
    fn undeclared_fields() {
        let mut msg = DynamicMessage::new(descriptor());
        assert_eq!(msg.set(9, vec![1]), Err(WireError::UndeclaredField(9)));
        assert_eq!(msg.set_by_name("nope", vec![1]), None);

        let mut w = WireWriter::new();
        w.write_bytes(9, b"skip");
        w.write_bytes(2, b"keep");
        msg.parse(&w.into_bytes()).unwrap();
        assert_eq!(msg.get_by_name("type"), Some(&b"keep"[..]));
        assert_eq!(msg.get(9), None);
    }
}
