/*
 * Typed views over raw event records. Each view interprets the `wparam` /
 * `lparam` pair of one event kind and exposes named accessors. Views that read
 * through `lparam` pointers alias memory owned by the OS for the duration of
 * the dispatch call, so every view carries a lifetime that the registration
 * API ties to a single handler invocation.
 *
 * Window-message views live in `wm`, common-control notification views in
 * `notify`.
 */

use crate::types::{NativeHandle, RawEvent};
use std::marker::PhantomData;

macro_rules! event_view {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name<'a> {
            raw: $crate::types::RawEvent,
            _scope: ::std::marker::PhantomData<&'a mut ()>,
        }

        impl<'a> $name<'a> {
            /// Wraps the parameters of one delivery.
            ///
            /// # Safety
            /// `raw` must be the parameters of a live delivery of a message this
            /// view describes; accessors dereference pointers carried in them.
            pub unsafe fn from_raw(raw: $crate::types::RawEvent) -> Self {
                Self {
                    raw,
                    _scope: ::std::marker::PhantomData,
                }
            }

            pub fn raw(&self) -> $crate::types::RawEvent {
                self.raw
            }
        }
    };
}

pub mod notify;
pub mod wm;

event_view!(
    /// Untyped view used by the escape-hatch registrations and by kinds that
    /// carry no parameters.
    Wm
);

impl Wm<'_> {
    pub fn wparam(&self) -> usize {
        self.raw.wparam
    }

    pub fn lparam(&self) -> isize {
        self.raw.lparam
    }
}

/// Reads a NUL-terminated UTF-16 string.
///
/// # Safety
/// `ptr` must be null or address a NUL-terminated buffer that outlives `'b`.
pub(crate) unsafe fn wide_until_nul<'b>(ptr: *const u16) -> &'b [u16] {
    if ptr.is_null() {
        return &[];
    }
    let mut len = 0usize;
    unsafe {
        while *ptr.add(len) != 0 {
            len += 1;
        }
        std::slice::from_raw_parts(ptr, len)
    }
}

pub(crate) fn handle_from_wparam(wparam: usize) -> NativeHandle {
    NativeHandle::from_raw(wparam as isize)
}

/// Notification view: `lparam` addresses a structure that starts with the
/// common `NMHDR` header, followed by kind-specific data of type `T`.
#[derive(Debug)]
pub struct Notify<'a, T> {
    raw: RawEvent,
    _scope: PhantomData<&'a mut T>,
}

impl<'a, T> Notify<'a, T> {
    /// # Safety
    /// `raw.lparam` must address a live `T` whose first member is the common
    /// notification header, valid for the duration of the dispatch call.
    pub unsafe fn from_raw(raw: RawEvent) -> Self {
        Notify {
            raw,
            _scope: PhantomData,
        }
    }

    pub fn raw(&self) -> RawEvent {
        self.raw
    }

    pub fn header(&self) -> &notify::NotifyHeader {
        unsafe { &*(self.raw.lparam as *const notify::NotifyHeader) }
    }

    pub fn info(&self) -> &T {
        unsafe { &*(self.raw.lparam as *const T) }
    }

    /// For notifications whose structure the receiver fills in (display
    /// info requests, label edits, custom draw...).
    pub fn info_mut(&mut self) -> &mut T {
        unsafe { &mut *(self.raw.lparam as *mut T) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_until_nul_stops_at_terminator() {
        let text: Vec<u16> = "hi!\0tail".encode_utf16().collect();
        let read = unsafe { wide_until_nul(text.as_ptr()) };
        assert_eq!(String::from_utf16_lossy(read), "hi!");
    }

    #[test]
    fn wide_until_nul_of_null_is_empty() {
        let read = unsafe { wide_until_nul(std::ptr::null()) };
        assert!(read.is_empty());
    }

    #[test]
    fn untyped_view_exposes_both_words_unchanged() {
        let raw = RawEvent::new(usize::MAX, isize::MIN);
        let view = unsafe { Wm::from_raw(raw) };
        assert_eq!(view.wparam(), usize::MAX);
        assert_eq!(view.lparam(), isize::MIN);
    }
}
