/*
 * Mirrors of the common-control notification structures delivered through
 * `WM_NOTIFY`. Each one starts with `NotifyHeader`, so a `Notify<'_, T>` view
 * can always hand out the header regardless of `T`. Layouts follow the
 * Unicode (`...W`) declarations.
 */

use crate::types::{NativeHandle, NotifyCode, Point, Rect};
use std::ffi::c_void;

/// Mirror of `NMHDR`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotifyHeader {
    pub hwnd_from: isize,
    pub id_from: usize,
    pub code: u32,
}

impl NotifyHeader {
    pub fn sender(&self) -> NativeHandle {
        NativeHandle::from_raw(self.hwnd_from)
    }

    pub fn notify_code(&self) -> NotifyCode {
        NotifyCode::from_header_code(self.code)
    }
}

/// Mirror of `NMLISTVIEW`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct NmListView {
    pub hdr: NotifyHeader,
    pub i_item: i32,
    pub i_sub_item: i32,
    pub u_new_state: u32,
    pub u_old_state: u32,
    pub u_changed: u32,
    pub pt_action: Point,
    pub l_param: isize,
}

impl NmListView {
    const LVIF_STATE: u32 = 0x0008;
    const LVIS_SELECTED: u32 = 0x0002;

    pub fn state_changed(&self) -> bool {
        self.u_changed & Self::LVIF_STATE != 0
    }

    pub fn became_selected(&self) -> bool {
        self.state_changed()
            && self.u_new_state & Self::LVIS_SELECTED != 0
            && self.u_old_state & Self::LVIS_SELECTED == 0
    }
}

/// Mirror of `NMITEMACTIVATE`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct NmItemActivate {
    pub hdr: NotifyHeader,
    pub i_item: i32,
    pub i_sub_item: i32,
    pub u_new_state: u32,
    pub u_old_state: u32,
    pub u_changed: u32,
    pub pt_action: Point,
    pub l_param: isize,
    pub u_key_flags: u32,
}

/// Mirror of `NMLVKEYDOWN`, `NMTVKEYDOWN` and `NMTCKEYDOWN`, declared with
/// one-byte packing by the headers. Read fields by value.
#[repr(C, packed(1))]
#[derive(Debug, Clone, Copy, Default)]
pub struct NmKeyDown {
    pub hdr: NotifyHeader,
    pub w_vkey: u16,
    pub flags: u32,
}

impl NmKeyDown {
    pub fn vkey(&self) -> u16 {
        self.w_vkey
    }

    pub fn key_flags(&self) -> u32 {
        self.flags
    }
}

/// Mirror of `LVITEMW`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct LvItem {
    pub mask: u32,
    pub i_item: i32,
    pub i_sub_item: i32,
    pub state: u32,
    pub state_mask: u32,
    pub psz_text: *mut u16,
    pub cch_text_max: i32,
    pub i_image: i32,
    pub l_param: isize,
    pub i_indent: i32,
    pub i_group_id: i32,
    pub c_columns: u32,
    pub pu_columns: *mut u32,
    pub pi_col_fmt: *mut i32,
    pub i_group: i32,
}

/// Mirror of `NMLVDISPINFOW`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct NmLvDispInfo {
    pub hdr: NotifyHeader,
    pub item: LvItem,
}

/// Mirror of `NMLVCACHEHINT`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct NmLvCacheHint {
    pub hdr: NotifyHeader,
    pub i_from: i32,
    pub i_to: i32,
}

/// Mirror of `LVFINDINFOW`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct LvFindInfo {
    pub flags: u32,
    pub psz: *const u16,
    pub l_param: isize,
    pub pt: Point,
    pub vk_direction: u32,
}

/// Mirror of `NMLVFINDITEMW`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct NmLvFindItem {
    pub hdr: NotifyHeader,
    pub i_start: i32,
    pub lvfi: LvFindInfo,
}

/// Mirror of `NMLVSCROLL`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct NmLvScroll {
    pub hdr: NotifyHeader,
    pub dx: i32,
    pub dy: i32,
}

/// Mirror of `NMLVGETINFOTIPW`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct NmLvGetInfoTip {
    pub hdr: NotifyHeader,
    pub dw_flags: u32,
    pub psz_text: *mut u16,
    pub cch_text_max: i32,
    pub i_item: i32,
    pub i_sub_item: i32,
    pub l_param: isize,
}

/// Mirror of `NMLVODSTATECHANGE`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct NmLvOdStateChange {
    pub hdr: NotifyHeader,
    pub i_from: i32,
    pub i_to: i32,
    pub u_new_state: u32,
    pub u_old_state: u32,
}

pub const L_MAX_URL_LENGTH: usize = 2048 + 32 + 4;

/// Mirror of `NMLVEMPTYMARKUP`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct NmLvEmptyMarkup {
    pub hdr: NotifyHeader,
    pub dw_flags: u32,
    pub sz_markup: [u16; L_MAX_URL_LENGTH],
}

impl NmLvEmptyMarkup {
    /// Copies `text` into the markup buffer, truncating and NUL-terminating.
    pub fn set_markup(&mut self, text: &str) {
        let mut written = 0;
        for (slot, unit) in self.sz_markup.iter_mut().zip(text.encode_utf16()) {
            if written == L_MAX_URL_LENGTH - 1 {
                break;
            }
            *slot = unit;
            written += 1;
        }
        self.sz_markup[written] = 0;
    }
}

/// Mirror of `NMCUSTOMDRAW`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct NmCustomDraw {
    pub hdr: NotifyHeader,
    pub dw_draw_stage: u32,
    pub hdc: isize,
    pub rc: Rect,
    pub dw_item_spec: usize,
    pub u_item_state: u32,
    pub l_item_lparam: isize,
}

/// Mirror of `NMLVCUSTOMDRAW`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct NmLvCustomDraw {
    pub nmcd: NmCustomDraw,
    pub clr_text: u32,
    pub clr_text_bk: u32,
    pub i_sub_item: i32,
    pub dw_item_type: u32,
    pub clr_face: u32,
    pub i_icon_effect: i32,
    pub i_icon_phase: i32,
    pub i_part_id: i32,
    pub i_state_id: i32,
    pub rc_text: Rect,
    pub u_align: u32,
}

/// Mirror of `TVITEMW`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct TvItem {
    pub mask: u32,
    pub h_item: isize,
    pub state: u32,
    pub state_mask: u32,
    pub psz_text: *mut u16,
    pub cch_text_max: i32,
    pub i_image: i32,
    pub i_selected_image: i32,
    pub c_children: i32,
    pub l_param: isize,
}

/// Mirror of `NMTREEVIEWW`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct NmTreeView {
    pub hdr: NotifyHeader,
    pub action: u32,
    pub item_old: TvItem,
    pub item_new: TvItem,
    pub pt_drag: Point,
}

impl NmTreeView {
    const TVE_COLLAPSE: u32 = 0x0001;
    const TVE_EXPAND: u32 = 0x0002;

    pub fn is_expanding(&self) -> bool {
        self.action & Self::TVE_EXPAND != 0
    }

    pub fn is_collapsing(&self) -> bool {
        self.action & Self::TVE_COLLAPSE != 0
    }
}

/// Mirror of `NMTVDISPINFOW`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct NmTvDispInfo {
    pub hdr: NotifyHeader,
    pub item: TvItem,
}

/// Mirror of `NMTVCUSTOMDRAW`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct NmTvCustomDraw {
    pub nmcd: NmCustomDraw,
    pub clr_text: u32,
    pub clr_text_bk: u32,
    pub i_level: i32,
}

/// Mirror of `NMTVITEMCHANGE`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct NmTvItemChange {
    pub hdr: NotifyHeader,
    pub u_changed: u32,
    pub h_item: isize,
    pub u_state_new: u32,
    pub u_state_old: u32,
    pub l_param: isize,
}

/// Mirror of `NMTVGETINFOTIPW`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct NmTvGetInfoTip {
    pub hdr: NotifyHeader,
    pub psz_text: *mut u16,
    pub cch_text_max: i32,
    pub h_item: isize,
    pub l_param: isize,
}

/// Mirror of `NMUPDOWN`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct NmUpDown {
    pub hdr: NotifyHeader,
    pub i_pos: i32,
    pub i_delta: i32,
}

/// Mirror of `SYSTEMTIME`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemTime {
    pub w_year: u16,
    pub w_month: u16,
    pub w_day_of_week: u16,
    pub w_day: u16,
    pub w_hour: u16,
    pub w_minute: u16,
    pub w_second: u16,
    pub w_milliseconds: u16,
}

/// Mirror of `NMDATETIMECHANGE`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct NmDateTimeChange {
    pub hdr: NotifyHeader,
    pub dw_flags: u32,
    pub st: SystemTime,
}

impl NmDateTimeChange {
    const GDT_NONE: u32 = 1;

    /// False when the picker's check box was cleared (`GDT_NONE`).
    pub fn has_value(&self) -> bool {
        self.dw_flags != Self::GDT_NONE
    }
}

/// Mirror of `NMSELCHANGE` (month calendar).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct NmSelChange {
    pub hdr: NotifyHeader,
    pub st_sel_start: SystemTime,
    pub st_sel_end: SystemTime,
}

/// Mirror of `NMMOUSE`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct NmMouse {
    pub hdr: NotifyHeader,
    pub dw_item_spec: usize,
    pub dw_item_data: usize,
    pub pt: Point,
    pub dw_hit_info: isize,
}

/// Mirror of `NMTRBTHUMBPOSCHANGING`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct NmTrbThumbPosChanging {
    pub hdr: NotifyHeader,
    pub dw_pos: u32,
    pub n_reason: i32,
}

/// Mirror of `NMOBJECTNOTIFY`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct NmObjectNotify {
    pub hdr: NotifyHeader,
    pub i_item: i32,
    pub piid: *const c_void,
    pub p_object: *mut c_void,
    pub h_result: i32,
    pub dw_flags: u32,
}


#[cfg(all(test, target_os = "windows"))]
mod layout_tests {
    use super::*;
    use crate::types::Size;
    use std::mem::{align_of, offset_of, size_of};
    use windows::Win32::Foundation::{POINT, RECT, SIZE, SYSTEMTIME};
    use windows::Win32::UI::Controls::*;

    macro_rules! same_layout {
        ($($ours:ty => $theirs:ty),* $(,)?) => {
            $(
                assert_eq!(
                    size_of::<$ours>(),
                    size_of::<$theirs>(),
                    "size of {}",
                    stringify!($ours)
                );
                assert_eq!(
                    align_of::<$ours>(),
                    align_of::<$theirs>(),
                    "alignment of {}",
                    stringify!($ours)
                );
            )*
        };
    }

    #[test]
    fn mirrors_match_the_system_declarations() {
        same_layout! {
            Point => POINT,
            Size => SIZE,
            Rect => RECT,
            NotifyHeader => NMHDR,
            NmListView => NMLISTVIEW,
            NmItemActivate => NMITEMACTIVATE,
            NmKeyDown => NMLVKEYDOWN,
            LvItem => LVITEMW,
            NmLvDispInfo => NMLVDISPINFOW,
            NmLvCacheHint => NMLVCACHEHINT,
            LvFindInfo => LVFINDINFOW,
            NmLvFindItem => NMLVFINDITEMW,
            NmLvScroll => NMLVSCROLL,
            NmLvGetInfoTip => NMLVGETINFOTIPW,
            NmLvOdStateChange => NMLVODSTATECHANGE,
            NmLvEmptyMarkup => NMLVEMPTYMARKUP,
            NmCustomDraw => NMCUSTOMDRAW,
            NmLvCustomDraw => NMLVCUSTOMDRAW,
            TvItem => TVITEMW,
            NmTreeView => NMTREEVIEWW,
            NmTvDispInfo => NMTVDISPINFOW,
            NmTvCustomDraw => NMTVCUSTOMDRAW,
            NmTvItemChange => NMTVITEMCHANGE,
            NmTvGetInfoTip => NMTVGETINFOTIPW,
            NmUpDown => NMUPDOWN,
            SystemTime => SYSTEMTIME,
            NmDateTimeChange => NMDATETIMECHANGE,
            NmSelChange => NMSELCHANGE,
            NmMouse => NMMOUSE,
            NmTrbThumbPosChanging => NMTRBTHUMBPOSCHANGING,
            NmObjectNotify => NMOBJECTNOTIFY,
        }
    }

    #[test]
    fn key_fields_sit_at_the_system_offsets() {
        assert_eq!(offset_of!(NotifyHeader, id_from), offset_of!(NMHDR, idFrom));
        assert_eq!(offset_of!(NotifyHeader, code), offset_of!(NMHDR, code));
        assert_eq!(offset_of!(NmListView, l_param), offset_of!(NMLISTVIEW, lParam));
        assert_eq!(offset_of!(NmKeyDown, flags), offset_of!(NMLVKEYDOWN, flags));
        assert_eq!(offset_of!(NmCustomDraw, rc), offset_of!(NMCUSTOMDRAW, rc));
        assert_eq!(offset_of!(LvItem, i_group), offset_of!(LVITEMW, iGroup));
        assert_eq!(offset_of!(NmTreeView, item_new), offset_of!(NMTREEVIEWW, itemNew));
        assert_eq!(offset_of!(NmDateTimeChange, st), offset_of!(NMDATETIMECHANGE, st));
        assert_eq!(offset_of!(NmMouse, dw_hit_info), offset_of!(NMMOUSE, dwHitInfo));
    }
}
