/*
 * Window-message views. Accessors mirror the packing documented for each
 * message: coordinates are sign-extended, handles are returned as
 * `NativeHandle`, and pointer parameters are exposed as references to
 * `repr(C)` mirrors that live only as long as the view.
 */

use super::{handle_from_wparam, wide_until_nul};
use crate::constants::{
    MK_CONTROL, MK_LBUTTON, MK_MBUTTON, MK_RBUTTON, MK_SHIFT, MK_XBUTTON1, MK_XBUTTON2,
};
use crate::types::{
    NativeHandle, Point, Rect, Size, get_x_lparam, get_y_lparam, hibyte, hiword, lobyte, loword,
};
use std::ffi::c_void;

fn signed_point(lparam: isize) -> Point {
    Point {
        x: get_x_lparam(lparam),
        y: get_y_lparam(lparam),
    }
}

fn unsigned_size(lparam: isize) -> Size {
    let packed = lparam as usize;
    Size {
        cx: loword(packed) as i32,
        cy: hiword(packed) as i32,
    }
}

// ---------------------------------------------------------------------------
// OS structure mirrors
// ---------------------------------------------------------------------------

/// Mirror of `CREATESTRUCTW`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CreateStruct {
    pub lp_create_params: *mut c_void,
    pub h_instance: isize,
    pub h_menu: isize,
    pub hwnd_parent: isize,
    pub cy: i32,
    pub cx: i32,
    pub y: i32,
    pub x: i32,
    pub style: i32,
    pub lpsz_name: *const u16,
    pub lpsz_class: *const u16,
    pub dw_ex_style: u32,
}

/// Mirror of `MINMAXINFO`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct MinMaxInfo {
    pub pt_reserved: Point,
    pub pt_max_size: Point,
    pub pt_max_position: Point,
    pub pt_min_track_size: Point,
    pub pt_max_track_size: Point,
}

/// Mirror of `WINDOWPOS`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowPos {
    pub hwnd: isize,
    pub hwnd_insert_after: isize,
    pub x: i32,
    pub y: i32,
    pub cx: i32,
    pub cy: i32,
    pub flags: u32,
}

/// Mirror of `DRAWITEMSTRUCT`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawItemStruct {
    pub ctl_type: u32,
    pub ctl_id: u32,
    pub item_id: u32,
    pub item_action: u32,
    pub item_state: u32,
    pub hwnd_item: isize,
    pub hdc: isize,
    pub rc_item: Rect,
    pub item_data: usize,
}

/// Mirror of `MEASUREITEMSTRUCT`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct MeasureItemStruct {
    pub ctl_type: u32,
    pub ctl_id: u32,
    pub item_id: u32,
    pub item_width: u32,
    pub item_height: u32,
    pub item_data: usize,
}

/// Mirror of `DELETEITEMSTRUCT`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteItemStruct {
    pub ctl_type: u32,
    pub ctl_id: u32,
    pub item_id: u32,
    pub hwnd_item: isize,
    pub item_data: usize,
}

/// Mirror of `COMPAREITEMSTRUCT`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct CompareItemStruct {
    pub ctl_type: u32,
    pub ctl_id: u32,
    pub hwnd_item: isize,
    pub item_id1: u32,
    pub item_data1: usize,
    pub item_id2: u32,
    pub item_data2: usize,
    pub dw_locale_id: u32,
}

/// Mirror of `STYLESTRUCT`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleStruct {
    pub style_old: u32,
    pub style_new: u32,
}

/// Mirror of `COPYDATASTRUCT`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CopyDataStruct {
    pub dw_data: usize,
    pub cb_data: u32,
    pub lp_data: *const c_void,
}

/// Mirror of `HELPINFO`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct HelpInfo {
    pub cb_size: u32,
    pub i_context_type: i32,
    pub i_ctrl_id: i32,
    pub h_item_handle: isize,
    pub dw_context_id: usize,
    pub mouse_pos: Point,
}

/// Mirror of `NCCALCSIZE_PARAMS`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct NcCalcSizeParams {
    pub rgrc: [Rect; 3],
    pub lppos: *mut WindowPos,
}

/// Mirror of `MSG`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Msg {
    pub hwnd: isize,
    pub message: u32,
    pub wparam: usize,
    pub lparam: isize,
    pub time: u32,
    pub pt: Point,
}

// ---------------------------------------------------------------------------
// Packed flag words
// ---------------------------------------------------------------------------

/// `MK_*` virtual-key state carried by mouse messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseKeys(pub u16);

impl MouseKeys {
    pub fn has_ctrl(self) -> bool {
        self.0 & MK_CONTROL != 0
    }
    pub fn has_shift(self) -> bool {
        self.0 & MK_SHIFT != 0
    }
    pub fn has_left_button(self) -> bool {
        self.0 & MK_LBUTTON != 0
    }
    pub fn has_middle_button(self) -> bool {
        self.0 & MK_MBUTTON != 0
    }
    pub fn has_right_button(self) -> bool {
        self.0 & MK_RBUTTON != 0
    }
    pub fn has_xbutton1(self) -> bool {
        self.0 & MK_XBUTTON1 != 0
    }
    pub fn has_xbutton2(self) -> bool {
        self.0 & MK_XBUTTON2 != 0
    }
}

/// Keystroke `lparam` of the key and character messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyState(pub u32);

impl KeyState {
    pub fn repeat_count(self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }
    pub fn scan_code(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }
    pub fn is_extended_key(self) -> bool {
        self.0 & (1 << 24) != 0
    }
    pub fn has_alt_key(self) -> bool {
        self.0 & (1 << 29) != 0
    }
    pub fn key_previously_down(self) -> bool {
        self.0 & (1 << 30) != 0
    }
    pub fn key_being_released(self) -> bool {
        self.0 & (1 << 31) != 0
    }
}

/// `ENDSESSION_*` flags of the session messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndSessionFlags(pub u32);

impl EndSessionFlags {
    pub fn is_close_app(self) -> bool {
        self.0 & 0x0000_0001 != 0
    }
    pub fn is_critical(self) -> bool {
        self.0 & 0x4000_0000 != 0
    }
    pub fn is_logoff(self) -> bool {
        self.0 & 0x8000_0000 != 0
    }
    pub fn is_shutdown(self) -> bool {
        self.0 == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeRequest {
    Restored,
    Minimized,
    Maximized,
    MaxShow,
    MaxHide,
    Other(usize),
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

event_view!(WmActivate);
impl WmActivate<'_> {
    pub fn state(&self) -> u16 {
        loword(self.raw.wparam)
    }
    pub fn is_inactive(&self) -> bool {
        self.state() == 0
    }
    pub fn is_active(&self) -> bool {
        self.state() == 1
    }
    pub fn is_click_active(&self) -> bool {
        self.state() == 2
    }
    pub fn is_minimized(&self) -> bool {
        hiword(self.raw.wparam) != 0
    }
    /// Window being activated or deactivated in exchange; may be null.
    pub fn swapped_window(&self) -> NativeHandle {
        NativeHandle::from_raw(self.raw.lparam)
    }
}

event_view!(WmActivateApp);
impl WmActivateApp<'_> {
    pub fn is_being_activated(&self) -> bool {
        self.raw.wparam != 0
    }
    pub fn thread_id(&self) -> u32 {
        self.raw.lparam as u32
    }
}

event_view!(WmAppCommand);
impl WmAppCommand<'_> {
    pub fn owner(&self) -> NativeHandle {
        handle_from_wparam(self.raw.wparam)
    }
    pub fn app_command(&self) -> u16 {
        hiword(self.raw.lparam as usize) & !0xF000
    }
    pub fn device(&self) -> u16 {
        hiword(self.raw.lparam as usize) & 0xF000
    }
    pub fn keys(&self) -> MouseKeys {
        MouseKeys(loword(self.raw.lparam as usize))
    }
}

event_view!(WmCaptureChanged);
impl WmCaptureChanged<'_> {
    pub fn window_gaining_capture(&self) -> NativeHandle {
        NativeHandle::from_raw(self.raw.lparam)
    }
}

event_view!(
    /// `WM_CHAR`, `WM_DEADCHAR`, `WM_SYSCHAR`, `WM_SYSDEADCHAR`.
    WmChar
);
impl WmChar<'_> {
    pub fn char_code(&self) -> u16 {
        self.raw.wparam as u16
    }
    pub fn key_state(&self) -> KeyState {
        KeyState(self.raw.lparam as u32)
    }
}

event_view!(
    /// `WM_KEYDOWN`, `WM_KEYUP`, `WM_SYSKEYDOWN`, `WM_SYSKEYUP`.
    WmKey
);
impl WmKey<'_> {
    pub fn vkey(&self) -> u16 {
        self.raw.wparam as u16
    }
    pub fn key_state(&self) -> KeyState {
        KeyState(self.raw.lparam as u32)
    }
}

event_view!(
    /// `WM_CHARTOITEM` and `WM_VKEYTOITEM` from an owner list box.
    WmListBoxKey
);
impl WmListBoxKey<'_> {
    pub fn key(&self) -> u16 {
        loword(self.raw.wparam)
    }
    pub fn caret_pos(&self) -> u16 {
        hiword(self.raw.wparam)
    }
    pub fn list_box(&self) -> NativeHandle {
        NativeHandle::from_raw(self.raw.lparam)
    }
}

event_view!(WmCommand);
impl WmCommand<'_> {
    pub fn is_from_menu(&self) -> bool {
        hiword(self.raw.wparam) == 0 && self.raw.lparam == 0
    }
    pub fn is_from_accelerator(&self) -> bool {
        hiword(self.raw.wparam) == 1 && self.raw.lparam == 0
    }
    pub fn is_from_control(&self) -> bool {
        self.raw.lparam != 0
    }
    pub fn control_id(&self) -> u16 {
        loword(self.raw.wparam)
    }
    pub fn notify_code(&self) -> u16 {
        hiword(self.raw.wparam)
    }
    pub fn control(&self) -> NativeHandle {
        NativeHandle::from_raw(self.raw.lparam)
    }
}

event_view!(WmCompacting);
impl WmCompacting<'_> {
    /// CPU time spent compacting, in 1/0xFFFF units.
    pub fn cpu_time_ratio(&self) -> u32 {
        self.raw.wparam as u32
    }
}

event_view!(WmCompareItem);
impl WmCompareItem<'_> {
    pub fn control_id(&self) -> u32 {
        self.raw.wparam as u32
    }
    pub fn item(&self) -> &CompareItemStruct {
        unsafe { &*(self.raw.lparam as *const CompareItemStruct) }
    }
}

event_view!(WmContextMenu);
impl WmContextMenu<'_> {
    pub fn target(&self) -> NativeHandle {
        handle_from_wparam(self.raw.wparam)
    }
    pub fn pos(&self) -> Point {
        signed_point(self.raw.lparam)
    }
    /// Invoked from the keyboard (SHIFT+F10 or the menu key): position is (-1, -1).
    pub fn is_from_keyboard(&self) -> bool {
        self.raw.lparam as u32 == u32::MAX
    }
}

event_view!(WmCopyData);
impl WmCopyData<'_> {
    pub fn sender(&self) -> NativeHandle {
        handle_from_wparam(self.raw.wparam)
    }
    pub fn copy_data(&self) -> &CopyDataStruct {
        unsafe { &*(self.raw.lparam as *const CopyDataStruct) }
    }
    pub fn bytes(&self) -> &[u8] {
        let cds = self.copy_data();
        if cds.lp_data.is_null() || cds.cb_data == 0 {
            return &[];
        }
        unsafe { std::slice::from_raw_parts(cds.lp_data as *const u8, cds.cb_data as usize) }
    }
}

event_view!(
    /// `WM_CREATE` and `WM_NCCREATE`.
    WmCreate
);
impl WmCreate<'_> {
    pub fn create_struct(&self) -> &CreateStruct {
        unsafe { &*(self.raw.lparam as *const CreateStruct) }
    }
    pub fn window_name(&self) -> String {
        String::from_utf16_lossy(unsafe { wide_until_nul(self.create_struct().lpsz_name) })
    }
}

event_view!(
    /// The `WM_CTLCOLOR*` family.
    WmCtlColor
);
impl WmCtlColor<'_> {
    pub fn hdc(&self) -> NativeHandle {
        handle_from_wparam(self.raw.wparam)
    }
    pub fn control(&self) -> NativeHandle {
        NativeHandle::from_raw(self.raw.lparam)
    }
}

event_view!(WmDeleteItem);
impl WmDeleteItem<'_> {
    pub fn control_id(&self) -> u32 {
        self.raw.wparam as u32
    }
    pub fn item(&self) -> &DeleteItemStruct {
        unsafe { &*(self.raw.lparam as *const DeleteItemStruct) }
    }
}

event_view!(WmDeviceChange);
impl WmDeviceChange<'_> {
    pub fn event(&self) -> u32 {
        self.raw.wparam as u32
    }
    pub fn data(&self) -> isize {
        self.raw.lparam
    }
}

event_view!(WmDisplayChange);
impl WmDisplayChange<'_> {
    pub fn bits_per_pixel(&self) -> u32 {
        self.raw.wparam as u32
    }
    pub fn size(&self) -> Size {
        unsigned_size(self.raw.lparam)
    }
}

event_view!(WmDrawItem);
impl WmDrawItem<'_> {
    pub fn control_id(&self) -> u32 {
        self.raw.wparam as u32
    }
    pub fn is_from_menu(&self) -> bool {
        self.raw.wparam == 0
    }
    pub fn item(&self) -> &DrawItemStruct {
        unsafe { &*(self.raw.lparam as *const DrawItemStruct) }
    }
}

event_view!(WmDropFiles);
impl WmDropFiles<'_> {
    pub fn hdrop(&self) -> NativeHandle {
        handle_from_wparam(self.raw.wparam)
    }
}

event_view!(WmEnable);
impl WmEnable<'_> {
    pub fn has_been_enabled(&self) -> bool {
        self.raw.wparam != 0
    }
}

event_view!(WmEndSession);
impl WmEndSession<'_> {
    pub fn is_session_being_ended(&self) -> bool {
        self.raw.wparam != 0
    }
    pub fn flags(&self) -> EndSessionFlags {
        EndSessionFlags(self.raw.lparam as u32)
    }
}

event_view!(WmQueryEndSession);
impl WmQueryEndSession<'_> {
    pub fn flags(&self) -> EndSessionFlags {
        EndSessionFlags(self.raw.lparam as u32)
    }
}

event_view!(WmEnterIdle);
impl WmEnterIdle<'_> {
    pub fn is_dialog_displayed(&self) -> bool {
        self.raw.wparam == 0
    }
    pub fn is_menu_displayed(&self) -> bool {
        self.raw.wparam == 2
    }
    pub fn source(&self) -> NativeHandle {
        NativeHandle::from_raw(self.raw.lparam)
    }
}

event_view!(
    /// `WM_ENTERMENULOOP` and `WM_EXITMENULOOP`.
    WmMenuLoop
);
impl WmMenuLoop<'_> {
    pub fn is_track_popup_menu(&self) -> bool {
        self.raw.wparam != 0
    }
}

event_view!(WmEraseBkgnd);
impl WmEraseBkgnd<'_> {
    pub fn hdc(&self) -> NativeHandle {
        handle_from_wparam(self.raw.wparam)
    }
}

event_view!(WmGetDlgCode);
impl WmGetDlgCode<'_> {
    pub fn vkey(&self) -> u16 {
        self.raw.wparam as u16
    }
    /// The message being checked; `None` when the system only queries.
    pub fn msg(&self) -> Option<&Msg> {
        unsafe { (self.raw.lparam as *const Msg).as_ref() }
    }
}

event_view!(WmGetIcon);
impl WmGetIcon<'_> {
    pub fn icon_type(&self) -> u8 {
        self.raw.wparam as u8
    }
    pub fn is_big(&self) -> bool {
        self.raw.wparam == 1
    }
    pub fn dpi(&self) -> u32 {
        self.raw.lparam as u32
    }
}

event_view!(WmGetMinMaxInfo);
impl WmGetMinMaxInfo<'_> {
    pub fn info(&self) -> &MinMaxInfo {
        unsafe { &*(self.raw.lparam as *const MinMaxInfo) }
    }
    pub fn info_mut(&mut self) -> &mut MinMaxInfo {
        unsafe { &mut *(self.raw.lparam as *mut MinMaxInfo) }
    }
}

event_view!(WmGetText);
impl WmGetText<'_> {
    pub fn buffer_size(&self) -> usize {
        self.raw.wparam
    }
    /// Destination buffer, `buffer_size()` UTF-16 units including the NUL.
    pub fn buffer_mut(&mut self) -> &mut [u16] {
        if self.raw.lparam == 0 || self.raw.wparam == 0 {
            return &mut [];
        }
        unsafe { std::slice::from_raw_parts_mut(self.raw.lparam as *mut u16, self.raw.wparam) }
    }
}

event_view!(WmHelp);
impl WmHelp<'_> {
    pub fn info(&self) -> &HelpInfo {
        unsafe { &*(self.raw.lparam as *const HelpInfo) }
    }
}

event_view!(WmHotKey);
impl WmHotKey<'_> {
    /// Negative for the system-defined hot keys (`IDHOT_SNAPDESKTOP`...).
    pub fn hotkey_id(&self) -> i32 {
        self.raw.wparam as isize as i32
    }
    pub fn modifiers(&self) -> u16 {
        loword(self.raw.lparam as usize)
    }
    pub fn vkey(&self) -> u16 {
        hiword(self.raw.lparam as usize)
    }
}

event_view!(
    /// `WM_HSCROLL` and `WM_VSCROLL`.
    WmScroll
);
impl WmScroll<'_> {
    pub fn request(&self) -> u16 {
        loword(self.raw.wparam)
    }
    pub fn box_pos(&self) -> u16 {
        hiword(self.raw.wparam)
    }
    /// Null when the message comes from a standard window scroll bar.
    pub fn scroll_bar(&self) -> NativeHandle {
        NativeHandle::from_raw(self.raw.lparam)
    }
}

event_view!(WmInitDialog);
impl WmInitDialog<'_> {
    pub fn focused_control(&self) -> NativeHandle {
        handle_from_wparam(self.raw.wparam)
    }
    pub fn init_param(&self) -> isize {
        self.raw.lparam
    }
}

event_view!(WmInitMenu);
impl WmInitMenu<'_> {
    pub fn menu(&self) -> NativeHandle {
        handle_from_wparam(self.raw.wparam)
    }
}

event_view!(WmInitMenuPopup);
impl WmInitMenuPopup<'_> {
    pub fn menu(&self) -> NativeHandle {
        handle_from_wparam(self.raw.wparam)
    }
    pub fn relative_pos(&self) -> u16 {
        loword(self.raw.lparam as usize)
    }
    pub fn is_window_menu(&self) -> bool {
        hiword(self.raw.lparam as usize) != 0
    }
}

event_view!(WmUninitMenuPopup);
impl WmUninitMenuPopup<'_> {
    pub fn menu(&self) -> NativeHandle {
        handle_from_wparam(self.raw.wparam)
    }
}

event_view!(
    /// `WM_SETFOCUS` and `WM_KILLFOCUS`.
    WmFocus
);
impl WmFocus<'_> {
    /// Window losing focus (`WM_SETFOCUS`) or receiving it (`WM_KILLFOCUS`).
    pub fn other_window(&self) -> NativeHandle {
        handle_from_wparam(self.raw.wparam)
    }
}

event_view!(
    /// Client-area mouse messages: move, hover and button up/down/double-click.
    WmMouse
);
impl WmMouse<'_> {
    pub fn keys(&self) -> MouseKeys {
        MouseKeys(loword(self.raw.wparam))
    }
    pub fn pos(&self) -> Point {
        signed_point(self.raw.lparam)
    }
}

event_view!(
    /// `WM_MOUSEWHEEL` and `WM_MOUSEHWHEEL`.
    WmMouseWheel
);
impl WmMouseWheel<'_> {
    pub fn wheel_delta(&self) -> i16 {
        hiword(self.raw.wparam) as i16
    }
    pub fn keys(&self) -> MouseKeys {
        MouseKeys(loword(self.raw.wparam))
    }
    /// Screen coordinates.
    pub fn pos(&self) -> Point {
        signed_point(self.raw.lparam)
    }
}

event_view!(WmMeasureItem);
impl WmMeasureItem<'_> {
    pub fn item(&self) -> &MeasureItemStruct {
        unsafe { &*(self.raw.lparam as *const MeasureItemStruct) }
    }
    pub fn item_mut(&mut self) -> &mut MeasureItemStruct {
        unsafe { &mut *(self.raw.lparam as *mut MeasureItemStruct) }
    }
}

event_view!(WmMenuChar);
impl WmMenuChar<'_> {
    pub fn char_code(&self) -> u16 {
        loword(self.raw.wparam)
    }
    pub fn menu_type(&self) -> u16 {
        hiword(self.raw.wparam)
    }
    pub fn is_window_menu(&self) -> bool {
        self.menu_type() == 0x2000
    }
    pub fn menu(&self) -> NativeHandle {
        NativeHandle::from_raw(self.raw.lparam)
    }
}

event_view!(WmMenuSelect);
impl WmMenuSelect<'_> {
    pub fn item(&self) -> u16 {
        loword(self.raw.wparam)
    }
    pub fn flags(&self) -> u16 {
        hiword(self.raw.wparam)
    }
    pub fn menu(&self) -> NativeHandle {
        NativeHandle::from_raw(self.raw.lparam)
    }
    pub fn is_menu_closed(&self) -> bool {
        self.flags() == 0xFFFF && self.raw.lparam == 0
    }
}

event_view!(
    /// `WM_MENURBUTTONUP` and `WM_MENUDRAG`: an item position inside a menu.
    WmMenuItemRef
);
impl WmMenuItemRef<'_> {
    pub fn index(&self) -> u32 {
        self.raw.wparam as u32
    }
    pub fn menu(&self) -> NativeHandle {
        NativeHandle::from_raw(self.raw.lparam)
    }
}

event_view!(WmMouseActivate);
impl WmMouseActivate<'_> {
    pub fn top_level(&self) -> NativeHandle {
        handle_from_wparam(self.raw.wparam)
    }
    pub fn hit_test_code(&self) -> i16 {
        loword(self.raw.lparam as usize) as i16
    }
    pub fn mouse_msg(&self) -> u16 {
        hiword(self.raw.lparam as usize)
    }
}

event_view!(WmMove);
impl WmMove<'_> {
    pub fn client_area_pos(&self) -> Point {
        signed_point(self.raw.lparam)
    }
}

event_view!(WmMoving);
impl WmMoving<'_> {
    pub fn screen_rect(&self) -> &Rect {
        unsafe { &*(self.raw.lparam as *const Rect) }
    }
    pub fn screen_rect_mut(&mut self) -> &mut Rect {
        unsafe { &mut *(self.raw.lparam as *mut Rect) }
    }
}

event_view!(WmSizing);
impl WmSizing<'_> {
    /// `WMSZ_*` edge being dragged.
    pub fn edge(&self) -> u32 {
        self.raw.wparam as u32
    }
    pub fn screen_rect(&self) -> &Rect {
        unsafe { &*(self.raw.lparam as *const Rect) }
    }
    pub fn screen_rect_mut(&mut self) -> &mut Rect {
        unsafe { &mut *(self.raw.lparam as *mut Rect) }
    }
}

event_view!(WmNcActivate);
impl WmNcActivate<'_> {
    pub fn is_active(&self) -> bool {
        self.raw.wparam != 0
    }
    pub fn update_region(&self) -> isize {
        self.raw.lparam
    }
}

event_view!(WmNcCalcSize);
impl WmNcCalcSize<'_> {
    /// True when `lparam` addresses `NCCALCSIZE_PARAMS` rather than a `RECT`.
    pub fn has_params(&self) -> bool {
        self.raw.wparam != 0
    }
    pub fn params_mut(&mut self) -> Option<&mut NcCalcSizeParams> {
        if self.has_params() {
            Some(unsafe { &mut *(self.raw.lparam as *mut NcCalcSizeParams) })
        } else {
            None
        }
    }
    pub fn rect_mut(&mut self) -> Option<&mut Rect> {
        if self.has_params() {
            None
        } else {
            Some(unsafe { &mut *(self.raw.lparam as *mut Rect) })
        }
    }
}

event_view!(WmNcHitTest);
impl WmNcHitTest<'_> {
    pub fn pos(&self) -> Point {
        signed_point(self.raw.lparam)
    }
}

event_view!(
    /// Non-client mouse messages carrying a hit-test code in `wparam`.
    WmNcMouse
);
impl WmNcMouse<'_> {
    pub fn hit_test_code(&self) -> i32 {
        self.raw.wparam as isize as i32
    }
    /// Screen coordinates.
    pub fn pos(&self) -> Point {
        signed_point(self.raw.lparam)
    }
}

event_view!(WmNcXButton);
impl WmNcXButton<'_> {
    pub fn hit_test_code(&self) -> i16 {
        loword(self.raw.wparam) as i16
    }
    /// `XBUTTON1` (1) or `XBUTTON2` (2).
    pub fn button(&self) -> u16 {
        hiword(self.raw.wparam)
    }
    pub fn pos(&self) -> Point {
        signed_point(self.raw.lparam)
    }
}

event_view!(WmNcPaint);
impl WmNcPaint<'_> {
    pub fn update_region(&self) -> NativeHandle {
        handle_from_wparam(self.raw.wparam)
    }
}

event_view!(WmNextDlgCtl);
impl WmNextDlgCtl<'_> {
    pub fn has_control_receiving_focus(&self) -> bool {
        loword(self.raw.lparam as usize) != 0
    }
    pub fn control_receiving_focus(&self) -> Option<NativeHandle> {
        if self.has_control_receiving_focus() {
            handle_from_wparam(self.raw.wparam).non_null()
        } else {
            None
        }
    }
    pub fn focus_next(&self) -> bool {
        !self.has_control_receiving_focus() && self.raw.wparam == 0
    }
}

event_view!(WmNotifyFormat);
impl WmNotifyFormat<'_> {
    pub fn window_from(&self) -> NativeHandle {
        handle_from_wparam(self.raw.wparam)
    }
    pub fn is_query_from_control(&self) -> bool {
        self.raw.lparam == 3
    }
    pub fn is_requery(&self) -> bool {
        self.raw.lparam == 4
    }
}

event_view!(WmParentNotify);
impl WmParentNotify<'_> {
    pub fn event_message(&self) -> u16 {
        loword(self.raw.wparam)
    }
    pub fn child_id(&self) -> u16 {
        hiword(self.raw.wparam)
    }
    /// Child window for create/destroy events.
    pub fn child(&self) -> NativeHandle {
        NativeHandle::from_raw(self.raw.lparam)
    }
    /// Cursor position for mouse-button events.
    pub fn pos(&self) -> Point {
        signed_point(self.raw.lparam)
    }
}

event_view!(WmPowerBroadcast);
impl WmPowerBroadcast<'_> {
    pub fn event(&self) -> u32 {
        self.raw.wparam as u32
    }
    pub fn data(&self) -> isize {
        self.raw.lparam
    }
}

event_view!(
    /// `WM_PRINT` and `WM_PRINTCLIENT`.
    WmPrint
);
impl WmPrint<'_> {
    pub fn hdc(&self) -> NativeHandle {
        handle_from_wparam(self.raw.wparam)
    }
    pub fn drawing_options(&self) -> u32 {
        self.raw.lparam as u32
    }
}

event_view!(WmSetCursor);
impl WmSetCursor<'_> {
    pub fn cursor_over(&self) -> NativeHandle {
        handle_from_wparam(self.raw.wparam)
    }
    pub fn hit_test_code(&self) -> i16 {
        loword(self.raw.lparam as usize) as i16
    }
    pub fn mouse_msg(&self) -> u16 {
        hiword(self.raw.lparam as usize)
    }
}

event_view!(WmSetFont);
impl WmSetFont<'_> {
    pub fn font(&self) -> NativeHandle {
        handle_from_wparam(self.raw.wparam)
    }
    pub fn should_redraw(&self) -> bool {
        loword(self.raw.lparam as usize) != 0
    }
}

event_view!(WmSetHotKey);
impl WmSetHotKey<'_> {
    pub fn vkey(&self) -> u8 {
        lobyte(loword(self.raw.wparam))
    }
    pub fn modifiers(&self) -> u8 {
        hibyte(loword(self.raw.wparam))
    }
}

event_view!(WmSetIcon);
impl WmSetIcon<'_> {
    pub fn icon_type(&self) -> u8 {
        self.raw.wparam as u8
    }
    pub fn is_big(&self) -> bool {
        self.raw.wparam == 1
    }
    pub fn icon(&self) -> NativeHandle {
        NativeHandle::from_raw(self.raw.lparam)
    }
}

event_view!(WmSetRedraw);
impl WmSetRedraw<'_> {
    pub fn can_redraw(&self) -> bool {
        self.raw.wparam != 0
    }
}

event_view!(WmSetText);
impl WmSetText<'_> {
    pub fn text(&self) -> &[u16] {
        unsafe { wide_until_nul(self.raw.lparam as *const u16) }
    }
    pub fn text_lossy(&self) -> String {
        String::from_utf16_lossy(self.text())
    }
}

event_view!(WmSettingChange);
impl WmSettingChange<'_> {
    pub fn flag(&self) -> u32 {
        self.raw.wparam as u32
    }
    /// Name of the changed area (`"Policy"`, `"intl"`...), when supplied.
    pub fn area(&self) -> Option<String> {
        if self.raw.lparam == 0 {
            return None;
        }
        let wide = unsafe { wide_until_nul(self.raw.lparam as *const u16) };
        Some(String::from_utf16_lossy(wide))
    }
}

event_view!(WmShowWindow);
impl WmShowWindow<'_> {
    pub fn is_being_shown(&self) -> bool {
        self.raw.wparam != 0
    }
    pub fn status(&self) -> u32 {
        self.raw.lparam as u32
    }
    pub fn is_from_show_window_call(&self) -> bool {
        self.status() == 0
    }
    pub fn is_parent_closing(&self) -> bool {
        self.status() == 1
    }
    pub fn is_other_zoom(&self) -> bool {
        self.status() == 2
    }
    pub fn is_parent_opening(&self) -> bool {
        self.status() == 3
    }
    pub fn is_other_unzoom(&self) -> bool {
        self.status() == 4
    }
}

event_view!(WmSize);
impl WmSize<'_> {
    pub fn request(&self) -> SizeRequest {
        match self.raw.wparam {
            0 => SizeRequest::Restored,
            1 => SizeRequest::Minimized,
            2 => SizeRequest::Maximized,
            3 => SizeRequest::MaxShow,
            4 => SizeRequest::MaxHide,
            other => SizeRequest::Other(other),
        }
    }
    pub fn client_area_size(&self) -> Size {
        unsigned_size(self.raw.lparam)
    }
}

event_view!(
    /// `WM_STYLECHANGING` and `WM_STYLECHANGED`.
    WmStyleChange
);
impl WmStyleChange<'_> {
    /// `GWL_STYLE` (-16) or `GWL_EXSTYLE` (-20).
    pub fn change(&self) -> i32 {
        self.raw.wparam as isize as i32
    }
    pub fn is_style(&self) -> bool {
        self.change() == -16
    }
    pub fn is_ex_style(&self) -> bool {
        self.change() == -20
    }
    pub fn styles(&self) -> &StyleStruct {
        unsafe { &*(self.raw.lparam as *const StyleStruct) }
    }
    /// Only meaningful for `WM_STYLECHANGING`.
    pub fn styles_mut(&mut self) -> &mut StyleStruct {
        unsafe { &mut *(self.raw.lparam as *mut StyleStruct) }
    }
}

event_view!(WmSysCommand);
impl WmSysCommand<'_> {
    pub fn command(&self) -> usize {
        self.raw.wparam
    }
    /// `SC_*` value; the low four bits are used internally by the system.
    pub fn command_type(&self) -> usize {
        self.raw.wparam & 0xFFF0
    }
    pub fn pos(&self) -> Point {
        signed_point(self.raw.lparam)
    }
}

event_view!(WmTimer);
impl WmTimer<'_> {
    pub fn timer_id(&self) -> usize {
        self.raw.wparam
    }
    pub fn callback(&self) -> isize {
        self.raw.lparam
    }
}

event_view!(
    /// `WM_WINDOWPOSCHANGING` and `WM_WINDOWPOSCHANGED`.
    WmWindowPos
);
impl WmWindowPos<'_> {
    pub fn window_pos(&self) -> &WindowPos {
        unsafe { &*(self.raw.lparam as *const WindowPos) }
    }
    pub fn window_pos_mut(&mut self) -> &mut WindowPos {
        unsafe { &mut *(self.raw.lparam as *mut WindowPos) }
    }
}

event_view!(WmInputLangChange);
impl WmInputLangChange<'_> {
    pub fn charset(&self) -> u32 {
        self.raw.wparam as u32
    }
    pub fn keyboard_layout(&self) -> NativeHandle {
        NativeHandle::from_raw(self.raw.lparam)
    }
}

event_view!(WmInputLangChangeRequest);
impl WmInputLangChangeRequest<'_> {
    pub fn flags(&self) -> u32 {
        self.raw.wparam as u32
    }
    pub fn keyboard_layout(&self) -> NativeHandle {
        NativeHandle::from_raw(self.raw.lparam)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RawEvent, make_lparam, make_wparam};

    #[test]
    fn size_reports_request_and_unsigned_dimensions() {
        let raw = RawEvent::new(2, make_lparam(1920, 40_000));
        let view = unsafe { WmSize::from_raw(raw) };
        assert_eq!(view.request(), SizeRequest::Maximized);
        assert_eq!(view.client_area_size(), Size { cx: 1920, cy: 40_000 });
    }

    #[test]
    fn mouse_position_is_sign_extended() {
        let raw = RawEvent::new(
            (MK_CONTROL | MK_LBUTTON) as usize,
            make_lparam((-12_i16) as u16, 7),
        );
        let view = unsafe { WmMouse::from_raw(raw) };
        assert_eq!(view.pos(), Point { x: -12, y: 7 });
        assert!(view.keys().has_ctrl());
        assert!(view.keys().has_left_button());
        assert!(!view.keys().has_shift());
    }

    #[test]
    fn wheel_delta_keeps_direction() {
        let raw = RawEvent::new(make_wparam(0, (-120_i16) as u16), 0);
        let view = unsafe { WmMouseWheel::from_raw(raw) };
        assert_eq!(view.wheel_delta(), -120);
    }

    #[test]
    fn key_state_bits_are_decoded() {
        let lparam = (3u32 | (0x1E << 16) | (1 << 24) | (1 << 29) | (1 << 30) | (1 << 31)) as i32;
        let view = unsafe { WmChar::from_raw(RawEvent::new('a' as usize, lparam as isize)) };
        let state = view.key_state();
        assert_eq!(view.char_code(), 'a' as u16);
        assert_eq!(state.repeat_count(), 3);
        assert_eq!(state.scan_code(), 0x1E);
        assert!(state.is_extended_key());
        assert!(state.has_alt_key());
        assert!(state.key_previously_down());
        assert!(state.key_being_released());
    }

    #[test]
    fn min_max_info_is_writable_through_the_view() {
        let mut info = MinMaxInfo::default();
        let raw = RawEvent::new(0, &mut info as *mut MinMaxInfo as isize);
        {
            let mut view = unsafe { WmGetMinMaxInfo::from_raw(raw) };
            view.info_mut().pt_min_track_size = Point { x: 640, y: 480 };
        }
        assert_eq!(info.pt_min_track_size, Point { x: 640, y: 480 });
    }

    #[test]
    fn command_origin_is_told_apart() {
        let menu = unsafe { WmCommand::from_raw(RawEvent::new(make_wparam(501, 0), 0)) };
        assert!(menu.is_from_menu());
        assert!(!menu.is_from_accelerator());

        let accel = unsafe { WmCommand::from_raw(RawEvent::new(make_wparam(501, 1), 0)) };
        assert!(accel.is_from_accelerator());

        let button = unsafe { WmCommand::from_raw(RawEvent::new(make_wparam(7, 0), 0x5150)) };
        assert!(button.is_from_control());
        assert!(!button.is_from_menu());
        assert_eq!(button.control_id(), 7);
        assert_eq!(button.notify_code(), 0);
        assert_eq!(button.control(), NativeHandle::from_raw(0x5150));
    }

    #[test]
    fn set_text_reads_the_borrowed_string() {
        let title: Vec<u16> = "Main window\0".encode_utf16().collect();
        let view = unsafe { WmSetText::from_raw(RawEvent::new(0, title.as_ptr() as isize)) };
        assert_eq!(view.text_lossy(), "Main window");
    }

    #[test]
    fn copy_data_exposes_payload_bytes() {
        let payload = [1u8, 2, 3, 4];
        let cds = CopyDataStruct {
            dw_data: 77,
            cb_data: payload.len() as u32,
            lp_data: payload.as_ptr() as *const c_void,
        };
        let view = unsafe {
            WmCopyData::from_raw(RawEvent::new(0x10, &cds as *const CopyDataStruct as isize))
        };
        assert_eq!(view.copy_data().dw_data, 77);
        assert_eq!(view.bytes(), &payload);
        assert_eq!(view.sender(), NativeHandle::from_raw(0x10));
    }

    #[test]
    fn context_menu_from_keyboard_is_detected() {
        let view = unsafe { WmContextMenu::from_raw(RawEvent::new(0x42, -1)) };
        assert!(view.is_from_keyboard());
        assert_eq!(view.pos(), Point { x: -1, y: -1 });
    }

    #[test]
    fn nc_calc_size_exposes_the_matching_pointer_shape() {
        let mut rect = Rect {
            left: 0,
            top: 0,
            right: 100,
            bottom: 50,
        };
        let mut view =
            unsafe { WmNcCalcSize::from_raw(RawEvent::new(0, &mut rect as *mut Rect as isize)) };
        assert!(view.params_mut().is_none());
        if let Some(r) = view.rect_mut() {
            r.top = 20;
        }
        assert_eq!(rect.top, 20);
    }
}

#[cfg(all(test, target_os = "windows"))]
mod layout_tests {
    use super::*;
    use std::mem::{offset_of, size_of};
    use windows::Win32::UI::Controls::{
        COMPAREITEMSTRUCT, DELETEITEMSTRUCT, DRAWITEMSTRUCT, MEASUREITEMSTRUCT,
    };
    use windows::Win32::UI::WindowsAndMessaging::{
        CREATESTRUCTW, MINMAXINFO, MSG, NCCALCSIZE_PARAMS, STYLESTRUCT, WINDOWPOS,
    };

    #[test]
    fn message_mirrors_match_the_system_declarations() {
        assert_eq!(size_of::<CreateStruct>(), size_of::<CREATESTRUCTW>());
        assert_eq!(size_of::<MinMaxInfo>(), size_of::<MINMAXINFO>());
        assert_eq!(size_of::<WindowPos>(), size_of::<WINDOWPOS>());
        assert_eq!(size_of::<DrawItemStruct>(), size_of::<DRAWITEMSTRUCT>());
        assert_eq!(size_of::<MeasureItemStruct>(), size_of::<MEASUREITEMSTRUCT>());
        assert_eq!(size_of::<DeleteItemStruct>(), size_of::<DELETEITEMSTRUCT>());
        assert_eq!(size_of::<CompareItemStruct>(), size_of::<COMPAREITEMSTRUCT>());
        assert_eq!(size_of::<StyleStruct>(), size_of::<STYLESTRUCT>());
        assert_eq!(size_of::<NcCalcSizeParams>(), size_of::<NCCALCSIZE_PARAMS>());
        assert_eq!(size_of::<Msg>(), size_of::<MSG>());

        assert_eq!(offset_of!(CreateStruct, dw_ex_style), offset_of!(CREATESTRUCTW, dwExStyle));
        assert_eq!(offset_of!(WindowPos, flags), offset_of!(WINDOWPOS, flags));
        assert_eq!(offset_of!(DrawItemStruct, rc_item), offset_of!(DRAWITEMSTRUCT, rcItem));
        assert_eq!(offset_of!(Msg, pt), offset_of!(MSG, pt));
    }
}
