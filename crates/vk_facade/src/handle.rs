//! Non-owning native handles
//!
//! The facade hands out handles and forgets them. Whoever receives a
//! [`Handle`] owns the native object and must destroy it through the native
//! API; there is no `Drop` implementation and no reference counting.

use ash::vk;
use std::fmt;

/// Non-owning wrapper around a native object handle
///
/// A `Handle` returned by a factory is always valid at the time it is
/// returned: the native status code indicated success. Copying it does not
/// duplicate the object, and dropping it does not destroy anything.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Handle<T: vk::Handle + Copy>(T);

impl<T: vk::Handle + Copy> Handle<T> {
    /// Wrap a raw handle returned by a successful native call
    pub const fn new(raw: T) -> Self {
        Self(raw)
    }

    /// Get the raw native handle
    pub fn raw(self) -> T {
        self.0
    }

    /// Native object type of the handle
    pub const fn object_type(&self) -> vk::ObjectType {
        T::TYPE
    }

    /// Raw 64-bit value of the handle, for debug names and logging
    pub fn as_raw(self) -> u64 {
        self.0.as_raw()
    }
}

impl<T: vk::Handle + Copy> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle<{:?}>({:#x})", T::TYPE, self.0.as_raw())
    }
}

impl<T: vk::Handle + Copy> From<Handle<T>> for u64 {
    fn from(handle: Handle<T>) -> Self {
        handle.0.as_raw()
    }
}

/// Unwrap a slice of handles into raw handles for native calls
pub fn raw_handles<T: vk::Handle + Copy>(handles: &[Handle<T>]) -> Vec<T> {
    handles.iter().map(|handle| handle.raw()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ash::vk::Handle as _;

    #[test]
    fn test_handle_is_plain_value() {
        let buffer = Handle::new(vk::Buffer::from_raw(0x42));
        let copy = buffer;

        assert_eq!(buffer, copy);
        assert_eq!(copy.raw(), vk::Buffer::from_raw(0x42));
        assert_eq!(buffer.as_raw(), 0x42);
        assert_eq!(buffer.object_type(), vk::ObjectType::BUFFER);
        assert_eq!(u64::from(buffer), 0x42);
    }

    #[test]
    fn test_debug_shows_type_and_value() {
        let fence = Handle::new(vk::Fence::from_raw(0x10));
        assert_eq!(format!("{fence:?}"), "Handle<FENCE>(0x10)");
    }

    #[test]
    fn test_raw_handles_preserves_order() {
        let views = [
            Handle::new(vk::ImageView::from_raw(3)),
            Handle::new(vk::ImageView::from_raw(1)),
        ];
        assert_eq!(
            raw_handles(&views),
            vec![vk::ImageView::from_raw(3), vk::ImageView::from_raw(1)]
        );
    }
}
