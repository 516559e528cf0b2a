/*
 * Platform-agnostic value types used across the dispatch core: the raw event
 * record, the three registry key families, host flavor, and small geometry
 * mirrors. Nothing here touches the OS, so these types are available (and
 * tested) on every target.
 */

/// Opaque native object handle (window, font, menu, device context...).
///
/// Stored as a machine word so it can cross threads and live in atomics; the
/// crate never dereferences it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NativeHandle(isize);

impl NativeHandle {
    pub const NULL: NativeHandle = NativeHandle(0);

    pub const fn from_raw(raw: isize) -> Self {
        NativeHandle(raw)
    }

    pub const fn raw(self) -> isize {
        self.0
    }

    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// `None` for the null handle.
    pub const fn non_null(self) -> Option<NativeHandle> {
        if self.0 == 0 { None } else { Some(self) }
    }
}

#[cfg(target_os = "windows")]
impl From<windows::Win32::Foundation::HWND> for NativeHandle {
    fn from(hwnd: windows::Win32::Foundation::HWND) -> Self {
        NativeHandle(hwnd.0 as isize)
    }
}

#[cfg(target_os = "windows")]
impl NativeHandle {
    pub(crate) fn as_hwnd(self) -> windows::Win32::Foundation::HWND {
        windows::Win32::Foundation::HWND(self.0 as *mut std::ffi::c_void)
    }
}

/// The two machine words the OS delivers with every message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawEvent {
    pub wparam: usize,
    pub lparam: isize,
}

impl RawEvent {
    pub const fn new(wparam: usize, lparam: isize) -> Self {
        RawEvent { wparam, lparam }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub u32);

/// Command identifier carried in the low word of `WM_COMMAND`'s `wparam`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(pub u16);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId(u16);

impl ControlId {
    pub const fn new(raw: u16) -> Self {
        ControlId(raw)
    }

    pub const fn raw(self) -> u16 {
        self.0
    }
}

/// Notification code as found in `NMHDR::code`, kept signed because the
/// common-control ranges are defined as negative offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotifyCode(pub i32);

impl NotifyCode {
    pub const fn from_header_code(code: u32) -> Self {
        NotifyCode(code as i32)
    }
}

/// Key of the notification registry: the sender's `idFrom` and the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotifyKey {
    pub id_from: usize,
    pub code: NotifyCode,
}

impl NotifyKey {
    pub const fn new(control: ControlId, code: NotifyCode) -> Self {
        NotifyKey {
            id_from: control.0 as usize,
            code,
        }
    }
}

/// Dialog procedures and window procedures disagree on the return value that
/// means "handled", so every router knows which kind of host it serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostFlavor {
    Window,
    Dialog,
}

impl HostFlavor {
    /// Result returned by a registered handler that produces no value.
    pub const fn handled_sentinel(self) -> isize {
        match self {
            HostFlavor::Window => 0,
            HostFlavor::Dialog => 1,
        }
    }
}

/// Role of a host inside the application; decides the built-in behavior at
/// teardown and which fallback handlers are installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostRole {
    /// Owns the message loop; teardown requests loop exit.
    Main,
    Modal,
    /// Tracked by its parent so the parent's loop services it.
    Modeless,
    Control,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub cx: i32,
    pub cy: i32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

#[inline]
pub const fn loword(value: usize) -> u16 {
    (value & 0xFFFF) as u16
}

#[inline]
pub const fn hiword(value: usize) -> u16 {
    ((value >> 16) & 0xFFFF) as u16
}

#[inline]
pub const fn lobyte(value: u16) -> u8 {
    (value & 0xFF) as u8
}

#[inline]
pub const fn hibyte(value: u16) -> u8 {
    (value >> 8) as u8
}

/// Signed x coordinate packed in the low word (`GET_X_LPARAM`).
#[inline]
pub const fn get_x_lparam(lparam: isize) -> i32 {
    (lparam as u16) as i16 as i32
}

/// Signed y coordinate packed in the high word (`GET_Y_LPARAM`).
#[inline]
pub const fn get_y_lparam(lparam: isize) -> i32 {
    ((lparam >> 16) as u16) as i16 as i32
}

#[inline]
pub const fn make_wparam(lo: u16, hi: u16) -> usize {
    (lo as usize) | ((hi as usize) << 16)
}

#[inline]
pub const fn make_lparam(lo: u16, hi: u16) -> isize {
    ((lo as u32) | ((hi as u32) << 16)) as i32 as isize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_coordinates_keep_their_sign() {
        let lparam = make_lparam((-5_i16) as u16, (-300_i16) as u16);
        assert_eq!(get_x_lparam(lparam), -5);
        assert_eq!(get_y_lparam(lparam), -300);
    }

    #[test]
    fn word_helpers_split_wparam() {
        let wp = make_wparam(501, 0x0300);
        assert_eq!(loword(wp), 501);
        assert_eq!(hiword(wp), 0x0300);
        assert_eq!(lobyte(0x1234), 0x34);
        assert_eq!(hibyte(0x1234), 0x12);
    }

    #[test]
    fn dialog_and_window_disagree_on_handled_sentinel() {
        assert_eq!(HostFlavor::Window.handled_sentinel(), 0);
        assert_eq!(HostFlavor::Dialog.handled_sentinel(), 1);
    }

    #[test]
    fn notify_key_built_from_control_id_matches_header_key() {
        let from_control = NotifyKey::new(ControlId::new(42), NotifyCode(-101));
        let from_header = NotifyKey {
            id_from: 42,
            code: NotifyCode::from_header_code((-101_i32) as u32),
        };
        assert_eq!(from_control, from_header);
    }
}
