use alloc::vec::Vec;

use strata_wire::{Archive, ArchiveMember, Message};

use crate::CodecError;
use crate::codec::{Codec, Context, Shape};

/// An ordered, untyped list of independently encoded values.
///
/// Values are pushed and popped in the same order (FIFO); no type
/// information is stored, so the reader must pop the types that were
/// pushed. An archiver is itself a message-shaped [`Codec`] and can be
/// pushed into another archiver or stored in any container.
///
/// # Example
///
/// ```
/// use strata_reflect::Archiver;
///
/// let mut ar = Archiver::new();
/// ar.push(&7_u32).unwrap();
/// ar.push(&String::from("seven")).unwrap();
///
/// let bytes = strata_reflect::serialize(&ar).unwrap();
///
/// let mut ar2 = Archiver::new();
/// strata_reflect::deserialize(&mut ar2, &bytes).unwrap();
///
/// let (mut n, mut s) = (0_u32, String::new());
/// assert!(ar2.pop(&mut n).unwrap());
/// assert!(ar2.pop(&mut s).unwrap());
/// assert!(!ar2.pop(&mut n).unwrap());
/// assert_eq!((n, s.as_str()), (7, "seven"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Archiver<'a> {
    archive: Archive,
    cursor: usize,
    cx: Context<'a>,
}

impl<'a> Archiver<'a> {
    /// An empty archiver with a default [`Context`].
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty archiver encoding its members with `cx`.
    #[inline]
    pub fn with_context(cx: Context<'a>) -> Self {
        Self {
            archive: Archive::default(),
            cursor: 0,
            cx,
        }
    }

    #[inline]
    pub fn context(&self) -> &Context<'a> {
        &self.cx
    }

    /// Replaces the context used by [`push`](Self::push) and
    /// [`pop`](Self::pop).
    ///
    /// Decoding an archiver never changes its context, so an archiver
    /// rebuilt from bytes (for instance inside a container) starts with a
    /// default one.
    #[inline]
    pub fn set_context(&mut self, cx: Context<'a>) {
        self.cx = cx;
    }

    /// Appends the encoding of `value`.
    #[inline]
    pub fn push<T: Codec + ?Sized>(&mut self, value: &T) -> Result<(), CodecError> {
        let cx = self.cx;
        self.push_with(value, &cx)
    }

    /// Appends the encoding of `value` made with `cx` instead of the
    /// archiver's own context.
    pub fn push_with<T: Codec + ?Sized>(
        &mut self,
        value: &T,
        cx: &Context<'_>,
    ) -> Result<(), CodecError> {
        let data = value.encode(cx)?;
        self.archive.members.push(ArchiveMember::new(data));
        Ok(())
    }

    /// Decodes the member at the cursor into `value` and advances.
    ///
    /// Returns `Ok(false)` and leaves `value` untouched once every member
    /// has been read. The cursor advances even if decoding fails.
    #[inline]
    pub fn pop<T: Codec + ?Sized>(&mut self, value: &mut T) -> Result<bool, CodecError> {
        let cx = self.cx;
        self.pop_with(value, &cx)
    }

    /// Like [`pop`](Self::pop), decoding with `cx` instead of the
    /// archiver's own context.
    pub fn pop_with<T: Codec + ?Sized>(
        &mut self,
        value: &mut T,
        cx: &Context<'_>,
    ) -> Result<bool, CodecError> {
        let Some(member) = self.archive.members.get(self.cursor) else {
            return Ok(false);
        };
        self.cursor += 1;
        value.decode(&member.data, cx)?;
        Ok(true)
    }

    /// Number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.archive.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.archive.members.is_empty()
    }

    /// Members not yet popped.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.len().saturating_sub(self.cursor)
    }

    /// Moves the cursor back to the first member.
    #[inline]
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Drops every member and resets the cursor.
    pub fn clear(&mut self) {
        self.archive.members.clear();
        self.cursor = 0;
    }

    #[inline]
    pub fn members(&self) -> &[ArchiveMember] {
        &self.archive.members
    }

    #[inline]
    pub fn into_archive(self) -> Archive {
        self.archive
    }
}

impl From<Archive> for Archiver<'_> {
    fn from(archive: Archive) -> Self {
        Self {
            archive,
            cursor: 0,
            cx: Context::new(),
        }
    }
}

impl Codec for Archiver<'_> {
    const SHAPE: Shape = Shape::Message;

    #[inline]
    fn encode(&self, _: &Context<'_>) -> Result<Vec<u8>, CodecError> {
        Ok(Message::encode(&self.archive))
    }

    /// Replaces the members and rewinds. The archiver keeps its own
    /// context; use [`Archiver::pop_with`] or [`Archiver::set_context`] to
    /// read members that need the decoding context.
    fn decode(&mut self, bytes: &[u8], _: &Context<'_>) -> Result<(), CodecError> {
        self.archive = <Archive as Message>::decode(bytes)?;
        self.cursor = 0;
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests
