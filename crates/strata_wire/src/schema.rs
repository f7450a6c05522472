use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt::{self, Write};

use strata_utils::hash::HashMap;

use crate::{MAX_FIELD_NUMBER, SchemaError};

// -----------------------------------------------------------------------------
// FieldDescriptor

/// The payload kind of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum FieldKind {
    /// An opaque length-delimited byte string.
    Bytes,
}

impl FieldKind {
    /// Name used in definition text.
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Bytes => "bytes",
        }
    }
}

/// One optional field of a runtime message schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: Box<str>,
    number: u32,
    kind: FieldKind,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<Box<str>>, number: u32, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            number,
            kind,
        }
    }

    /// Shorthand for an optional `bytes` field.
    pub fn bytes(name: impl Into<Box<str>>, number: u32) -> Self {
        Self::new(name, number, FieldKind::Bytes)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn number(&self) -> u32 {
        self.number
    }

    #[inline]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }
}

// -----------------------------------------------------------------------------
// MessageDescriptor

/// A message schema built at runtime.
///
/// Fields keep their declaration order; lookups by number and by name are
/// indexed.
#[derive(Debug)]
pub struct MessageDescriptor {
    name: Box<str>,
    file: Box<str>,
    fields: Vec<FieldDescriptor>,
    by_number: BTreeMap<u32, usize>,
    by_name: HashMap<Box<str>, usize>,
}

impl MessageDescriptor {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The file the message was declared in.
    #[inline]
    pub fn file(&self) -> &str {
        &self.file
    }

    #[inline]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field_by_number(&self, number: u32) -> Option<&FieldDescriptor> {
        self.by_number.get(&number).map(|&i| &self.fields[i])
    }

    pub fn field_by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.by_name.get(name).map(|&i| &self.fields[i])
    }

    /// Writes the proto-like definition of this message.
    pub fn write_definition(&self, out: &mut impl Write) -> fmt::Result {
        let message: &str = match self.name.rsplit_once('.') {
            Some((package, message)) => {
                writeln!(out, "package {package};\n")?;
                message
            }
            None => &self.name,
        };
        writeln!(out, "message {message} {{")?;
        for field in &self.fields {
            writeln!(
                out,
                "  optional {} {} = {};",
                field.kind.keyword(),
                field.name,
                field.number
            )?;
        }
        out.write_str("}\n")
    }

    /// The proto-like definition of this message.
    ///
    /// ```
    /// use strata_wire::{FieldDescriptor, SchemaPool};
    ///
    /// let mut pool = SchemaPool::new();
    /// let weapon = pool
    ///     .build_message(
    ///         "WeaponDynProto",
    ///         "Weapon.proto",
    ///         [FieldDescriptor::bytes("type", 1), FieldDescriptor::bytes("name", 2)],
    ///     )
    ///     .unwrap();
    ///
    /// assert_eq!(
    ///     weapon.definition(),
    ///     "message WeaponDynProto {\n  optional bytes type = 1;\n  optional bytes name = 2;\n}\n",
    /// );
    /// ```
    pub fn definition(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_definition(&mut out);
        out
    }
}

// -----------------------------------------------------------------------------
// SchemaPool

/// A namespace of runtime message schemas.
///
/// Messages are only ever added; a built [`MessageDescriptor`] stays valid
/// for the lifetime of the pool and can be shared through its `Arc`.
#[derive(Debug, Default)]
pub struct SchemaPool {
    messages: Vec<Arc<MessageDescriptor>>,
    by_name: HashMap<Box<str>, usize>,
}

impl SchemaPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and adds a message schema.
    ///
    /// # Errors
    ///
    /// Fails if the message name is taken or not an identifier, or if a field
    /// name or number is invalid or repeated. The pool is unchanged on error.
    pub fn build_message(
        &mut self,
        name: &str,
        file: &str,
        fields: impl IntoIterator<Item = FieldDescriptor>,
    ) -> Result<Arc<MessageDescriptor>, SchemaError> {
        if !is_full_name(name) {
            return Err(SchemaError::InvalidName(name.into()));
        }
        if self.by_name.contains_key(name) {
            return Err(SchemaError::DuplicateMessage(name.into()));
        }

        let fields: Vec<FieldDescriptor> = fields.into_iter().collect();
        let mut by_number = BTreeMap::new();
        let mut by_name = HashMap::with_capacity_and_hasher(fields.len(), Default::default());

        for (index, field) in fields.iter().enumerate() {
            if !is_identifier(&field.name) {
                return Err(SchemaError::InvalidName(field.name.clone()));
            }
            if field.number == 0 {
                return Err(SchemaError::ZeroFieldNumber {
                    message: name.into(),
                    field: field.name.clone(),
                });
            }
            if field.number > MAX_FIELD_NUMBER {
                return Err(SchemaError::FieldNumberOutOfRange {
                    message: name.into(),
                    field: field.name.clone(),
                    number: field.number,
                });
            }
            if by_number.insert(field.number, index).is_some() {
                return Err(SchemaError::DuplicateFieldNumber {
                    message: name.into(),
                    number: field.number,
                });
            }
            if by_name.insert(field.name.clone(), index).is_some() {
                return Err(SchemaError::DuplicateFieldName {
                    message: name.into(),
                    field: field.name.clone(),
                });
            }
        }

        let descriptor = Arc::new(MessageDescriptor {
            name: name.into(),
            file: file.into(),
            fields,
            by_number,
            by_name,
        });

        log::trace!("schema pool: built message `{name}` ({file})");

        self.by_name.insert(name.into(), self.messages.len());
        self.messages.push(Arc::clone(&descriptor));
        Ok(descriptor)
    }

    pub fn find(&self, name: &str) -> Option<&Arc<MessageDescriptor>> {
        self.by_name.get(name).map(|&i| &self.messages[i])
    }

    /// Like [`find`](Self::find) but with an error for absent names.
    pub fn get(&self, name: &str) -> Result<&Arc<MessageDescriptor>, SchemaError> {
        self.find(name)
            .ok_or_else(|| SchemaError::UnknownMessage(name.into()))
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Messages in the order they were built.
    pub fn messages(&self) -> impl ExactSizeIterator<Item = &Arc<MessageDescriptor>> {
        self.messages.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Dot-separated identifiers, e.g. `game.WeaponDynProto`.
fn is_full_name(s: &str) -> bool {
    s.split('.').all(is_identifier)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    fn weapon(pool: &mut SchemaPool) -> Result<Arc<MessageDescriptor>, SchemaError> {
        pool.build_message(
            "WeaponDynProto",
            "Weapon.proto",
            [FieldDescriptor::bytes("type", 1), FieldDescriptor::bytes("name", 2)],
        )
    }

    #[test]
    fn lookup() {
        let mut pool = SchemaPool::new();
        let desc = weapon(&mut pool).unwrap();
        assert_eq!(desc.file(), "Weapon.proto");
        assert_eq!(desc.field_by_number(2).map(FieldDescriptor::name), Some("name"));
        assert_eq!(desc.field_by_name("type").map(FieldDescriptor::number), Some(1));
        assert!(desc.field_by_number(3).is_none());
        assert!(pool.contains("WeaponDynProto"));
        assert!(Arc::ptr_eq(pool.find("WeaponDynProto").unwrap(), &desc));
    }

    #[test]
    fn duplicate_message() {
        let mut pool = SchemaPool::new();
        weapon(&mut pool).unwrap();
        assert_eq!(
            weapon(&mut pool).unwrap_err(),
            SchemaError::DuplicateMessage("WeaponDynProto".into())
        );
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn invalid_fields() {
        let mut pool = SchemaPool::new();

        let err = pool
            .build_message("A", "a", [FieldDescriptor::bytes("x", 0)])
            .unwrap_err();
        assert!(matches!(err, SchemaError::ZeroFieldNumber { .. }));

        let err = pool
            .build_message(
                "A",
                "a",
                [FieldDescriptor::bytes("x", 1), FieldDescriptor::bytes("y", 1)],
            )
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateFieldNumber { number: 1, .. }));

        let err = pool
            .build_message(
                "A",
                "a",
                [FieldDescriptor::bytes("x", 1), FieldDescriptor::bytes("x", 2)],
            )
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateFieldName { .. }));

        let err = pool
            .build_message("A", "a", [FieldDescriptor::bytes("x", MAX_FIELD_NUMBER + 1)])
            .unwrap_err();
        assert!(matches!(err, SchemaError::FieldNumberOutOfRange { .. }));

        let err = pool
            .build_message("A", "a", [FieldDescriptor::bytes("1x", 1)])
            .unwrap_err();
        assert_eq!(err, SchemaError::InvalidName("1x".into()));

        assert!(pool.is_empty());
    }

    #[test]
    fn dotted_name_writes_package() {
        let mut pool = SchemaPool::new();
        let record = pool
            .build_message(
                "game.PlayerRecord",
                "Player.proto",
                [FieldDescriptor::bytes("name", 1)],
            )
            .unwrap();
        assert_eq!(
            record.definition(),
            "package game;\n\nmessage PlayerRecord {\n  optional bytes name = 1;\n}\n"
        );

        let nested = pool
            .build_message("a.b.C", "C.proto", [FieldDescriptor::bytes("x", 1)])
            .unwrap();
        assert!(nested.definition().starts_with("package a.b;\n\nmessage C {\n"));
        assert!(weapon(&mut pool).unwrap().definition().starts_with("message WeaponDynProto {"));
    }

    #[test]
    fn names() {
        assert!(is_full_name("game.Weapon_2"));
        assert!(!is_full_name("game..Weapon"));
        assert!(!is_full_name(""));
        assert!(!is_identifier("a-b"));
    }

    #[test]
    fn unknown_message() {
        let pool = SchemaPool::new();
        assert_eq!(
            pool.get("Nope").unwrap_err(),
            SchemaError::UnknownMessage("Nope".into())
        );
    }
}
