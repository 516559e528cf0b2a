/*
 * Registration API. `EventProxy` is what application code receives from
 * `host.on()`: one strongly-typed method per known event kind plus escape
 * hatches for arbitrary messages, commands and notifications.
 *
 * The typed methods are generated from two tables (window messages and
 * common-control notifications). Each row names the method, the message id or
 * notification code, the typed view handed to the callback, the default-return
 * rule and the callback's return type. The same tables are exported as the
 * `MESSAGE_KINDS` / `NOTIFY_KINDS` catalogues.
 */

use crate::constants::*;
use crate::error::{PlatformError, Result as PlatformResult};
use crate::params::notify::*;
use crate::params::wm::*;
use crate::params::{Notify, Wm};
use crate::registry::Handler;
use crate::types::{
    CommandId, ControlId, HostFlavor, MessageId, NativeHandle, NotifyCode, NotifyKey,
};

/// How the result word of a registered handler is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnRule {
    /// Handled sentinel of the host flavor: 0 for windows, TRUE for dialogs.
    Handled,
    /// A fixed value regardless of flavor.
    Fixed(isize),
    /// Whatever the callback returned.
    FromCallback,
}

impl ReturnRule {
    pub const fn resolve(self, flavor: HostFlavor, produced: isize) -> isize {
        match self {
            ReturnRule::Handled => flavor.handled_sentinel(),
            ReturnRule::Fixed(value) => value,
            ReturnRule::FromCallback => produced,
        }
    }
}

/// Conversion of a callback's return value into the result word.
pub trait IntoLresult {
    fn into_lresult(self) -> isize;
}

impl IntoLresult for () {
    fn into_lresult(self) -> isize {
        0
    }
}

impl IntoLresult for bool {
    fn into_lresult(self) -> isize {
        self as isize
    }
}

impl IntoLresult for i32 {
    fn into_lresult(self) -> isize {
        self as isize
    }
}

impl IntoLresult for u32 {
    fn into_lresult(self) -> isize {
        self as isize
    }
}

impl IntoLresult for u16 {
    fn into_lresult(self) -> isize {
        self as isize
    }
}

impl IntoLresult for u8 {
    fn into_lresult(self) -> isize {
        self as isize
    }
}

impl IntoLresult for isize {
    fn into_lresult(self) -> isize {
        self
    }
}

impl IntoLresult for NativeHandle {
    fn into_lresult(self) -> isize {
        self.raw()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindKey {
    Message(u32),
    Notify(i32),
}

/// One row of the event-kind catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventKind {
    pub name: &'static str,
    pub key: KindKey,
    pub rule: ReturnRule,
}

/// First catalogue entry for a window message id.
pub fn message_kind(msg: u32) -> Option<&'static EventKind> {
    MESSAGE_KINDS
        .iter()
        .find(|kind| kind.key == KindKey::Message(msg))
}

/// Catalogue entry by registration method name.
pub fn kind_by_name(name: &str) -> Option<&'static EventKind> {
    MESSAGE_KINDS
        .iter()
        .chain(NOTIFY_KINDS.iter())
        .find(|kind| kind.name == name)
}

/// Receiver of type-erased registrations. Implemented by every object that
/// owns a router (hosts and subclassed controls).
pub trait HandlerSink {
    fn flavor(&self) -> HostFlavor;
    fn register_message(&self, id: MessageId, handler: Handler) -> PlatformResult<()>;
    fn register_command(&self, id: CommandId, handler: Handler) -> PlatformResult<()>;
    fn register_notify(&self, key: NotifyKey, handler: Handler) -> PlatformResult<()>;
}

pub struct EventProxy<'h> {
    sink: &'h dyn HandlerSink,
    flavor: HostFlavor,
}

impl<'h> EventProxy<'h> {
    pub fn new(sink: &'h dyn HandlerSink) -> Self {
        EventProxy {
            flavor: sink.flavor(),
            sink,
        }
    }

    pub fn flavor(&self) -> HostFlavor {
        self.flavor
    }

    /// Handler for an arbitrary message id; the callback's value is returned
    /// to the OS unchanged.
    ///
    /// `WM_COMMAND` and `WM_NOTIFY` registered here are never reached, and the
    /// crate's private coordination messages are rejected.
    pub fn wm<F>(&self, msg: u32, f: F) -> PlatformResult<()>
    where
        F: Fn(Wm<'_>) -> isize + 'static,
    {
        self.wm_many(&[msg], f)
    }

    /// Same handler for several message ids.
    pub fn wm_many<F>(&self, msgs: &[u32], f: F) -> PlatformResult<()>
    where
        F: Fn(Wm<'_>) -> isize + 'static,
    {
        if let Some(reserved) = msgs.iter().find(|m| is_reserved_private_message(**m)) {
            return Err(PlatformError::InvalidState(format!(
                "message {reserved:#x} is reserved for internal coordination"
            )));
        }
        if msgs.iter().any(|m| *m == WM_COMMAND || *m == WM_NOTIFY) {
            log::warn!(
                "EventProxy: plain registration for WM_COMMAND/WM_NOTIFY is never dispatched; use wm_command/wm_notify."
            );
        }
        let handler = Handler::new(move |raw| f(unsafe { Wm::from_raw(raw) }));
        for msg in msgs {
            self.sink.register_message(MessageId(*msg), handler.clone())?;
        }
        Ok(())
    }

    /// Handler for `WM_COMMAND` with the given command id (menu item,
    /// accelerator or control id).
    pub fn wm_command<F>(&self, id: u16, f: F) -> PlatformResult<()>
    where
        F: Fn(WmCommand<'_>) + 'static,
    {
        self.wm_command_many(&[id], f)
    }

    pub fn wm_command_many<F>(&self, ids: &[u16], f: F) -> PlatformResult<()>
    where
        F: Fn(WmCommand<'_>) + 'static,
    {
        let flavor = self.flavor;
        let handler = Handler::new(move |raw| {
            f(unsafe { WmCommand::from_raw(raw) });
            flavor.handled_sentinel()
        });
        for id in ids {
            self.sink.register_command(CommandId(*id), handler.clone())?;
        }
        Ok(())
    }

    /// Handler for any `WM_NOTIFY` code from one control; the callback's value
    /// is returned to the OS unchanged. Prefer the typed notification methods.
    pub fn wm_notify<F>(&self, ctrl: ControlId, code: NotifyCode, f: F) -> PlatformResult<()>
    where
        F: Fn(Notify<'_, NotifyHeader>) -> isize + 'static,
    {
        self.wm_notify_many(ctrl, &[code], f)
    }

    pub fn wm_notify_many<F>(&self, ctrl: ControlId, codes: &[NotifyCode], f: F) -> PlatformResult<()>
    where
        F: Fn(Notify<'_, NotifyHeader>) -> isize + 'static,
    {
        let handler = Handler::new(move |raw| f(unsafe { Notify::from_raw(raw) }));
        for code in codes {
            self.sink
                .register_notify(NotifyKey::new(ctrl, *code), handler.clone())?;
        }
        Ok(())
    }
}

macro_rules! message_kinds {
    ($( $name:ident => $msg:expr, $view:ident, $rule:expr, $ret:ty; )*) => {
        impl EventProxy<'_> {
            $(
                pub fn $name<F>(&self, f: F) -> PlatformResult<()>
                where
                    F: Fn($view<'_>) -> $ret + 'static,
                {
                    let flavor = self.flavor;
                    self.sink.register_message(
                        MessageId($msg),
                        Handler::new(move |raw| {
                            let produced = f(unsafe { $view::from_raw(raw) }).into_lresult();
                            $rule.resolve(flavor, produced)
                        }),
                    )
                }
            )*
        }

        /// Every typed window-message registration, in table order.
        pub static MESSAGE_KINDS: &[EventKind] = &[
            $( EventKind { name: stringify!($name), key: KindKey::Message($msg), rule: $rule }, )*
        ];
    };
}

macro_rules! notify_kinds {
    ($( $name:ident => $code:expr, $info:ty, $rule:expr, $ret:ty; )*) => {
        impl EventProxy<'_> {
            $(
                pub fn $name<F>(&self, ctrl: ControlId, f: F) -> PlatformResult<()>
                where
                    F: Fn(Notify<'_, $info>) -> $ret + 'static,
                {
                    let flavor = self.flavor;
                    self.sink.register_notify(
                        NotifyKey::new(ctrl, NotifyCode($code)),
                        Handler::new(move |raw| {
                            let produced =
                                f(unsafe { Notify::<$info>::from_raw(raw) }).into_lresult();
                            $rule.resolve(flavor, produced)
                        }),
                    )
                }
            )*
        }

        /// Every typed notification registration, in table order. Codes shared
        /// by several control classes (`NM_CLICK`...) appear once per class.
        pub static NOTIFY_KINDS: &[EventKind] = &[
            $( EventKind { name: stringify!($name), key: KindKey::Notify($code), rule: $rule }, )*
        ];
    };
}

use ReturnRule::{FromCallback, Fixed, Handled};

message_kinds! {
    wm_activate => WM_ACTIVATE, WmActivate, Handled, ();
    wm_activate_app => WM_ACTIVATEAPP, WmActivateApp, Handled, ();
    wm_app_command => WM_APPCOMMAND, WmAppCommand, Fixed(1), ();
    wm_cancel_mode => WM_CANCELMODE, Wm, Handled, ();
    wm_capture_changed => WM_CAPTURECHANGED, WmCaptureChanged, Handled, ();
    wm_char => WM_CHAR, WmChar, Handled, ();
    wm_char_to_item => WM_CHARTOITEM, WmListBoxKey, FromCallback, i32;
    wm_child_activate => WM_CHILDACTIVATE, Wm, Handled, ();
    wm_clipboard_update => WM_CLIPBOARDUPDATE, Wm, Handled, ();
    wm_close => WM_CLOSE, Wm, Handled, ();
    wm_compacting => WM_COMPACTING, WmCompacting, Handled, ();
    wm_compare_item => WM_COMPAREITEM, WmCompareItem, FromCallback, i32;
    wm_context_menu => WM_CONTEXTMENU, WmContextMenu, Handled, ();
    wm_copy_data => WM_COPYDATA, WmCopyData, FromCallback, bool;
    wm_create => WM_CREATE, WmCreate, FromCallback, i32;
    wm_ctl_color_btn => WM_CTLCOLORBTN, WmCtlColor, FromCallback, NativeHandle;
    wm_ctl_color_dlg => WM_CTLCOLORDLG, WmCtlColor, FromCallback, NativeHandle;
    wm_ctl_color_edit => WM_CTLCOLOREDIT, WmCtlColor, FromCallback, NativeHandle;
    wm_ctl_color_list_box => WM_CTLCOLORLISTBOX, WmCtlColor, FromCallback, NativeHandle;
    wm_ctl_color_scroll_bar => WM_CTLCOLORSCROLLBAR, WmCtlColor, FromCallback, NativeHandle;
    wm_ctl_color_static => WM_CTLCOLORSTATIC, WmCtlColor, FromCallback, NativeHandle;
    wm_dead_char => WM_DEADCHAR, WmChar, Handled, ();
    wm_delete_item => WM_DELETEITEM, WmDeleteItem, Fixed(1), ();
    wm_destroy => WM_DESTROY, Wm, Handled, ();
    wm_dev_mode_change => WM_DEVMODECHANGE, Wm, Handled, ();
    wm_device_change => WM_DEVICECHANGE, WmDeviceChange, FromCallback, u32;
    wm_display_change => WM_DISPLAYCHANGE, WmDisplayChange, Handled, ();
    wm_draw_item => WM_DRAWITEM, WmDrawItem, Fixed(1), ();
    wm_drop_files => WM_DROPFILES, WmDropFiles, Handled, ();
    wm_enable => WM_ENABLE, WmEnable, Handled, ();
    wm_end_session => WM_ENDSESSION, WmEndSession, Handled, ();
    wm_enter_idle => WM_ENTERIDLE, WmEnterIdle, Handled, ();
    wm_enter_menu_loop => WM_ENTERMENULOOP, WmMenuLoop, Handled, ();
    wm_enter_size_move => WM_ENTERSIZEMOVE, Wm, Handled, ();
    wm_erase_bkgnd => WM_ERASEBKGND, WmEraseBkgnd, FromCallback, i32;
    wm_exit_menu_loop => WM_EXITMENULOOP, WmMenuLoop, Handled, ();
    wm_exit_size_move => WM_EXITSIZEMOVE, Wm, Handled, ();
    wm_font_change => WM_FONTCHANGE, Wm, Handled, ();
    wm_get_dlg_code => WM_GETDLGCODE, WmGetDlgCode, FromCallback, u16;
    wm_get_font => WM_GETFONT, Wm, FromCallback, NativeHandle;
    wm_get_hot_key => WM_GETHOTKEY, Wm, FromCallback, u16;
    wm_get_icon => WM_GETICON, WmGetIcon, FromCallback, NativeHandle;
    wm_get_min_max_info => WM_GETMINMAXINFO, WmGetMinMaxInfo, Handled, ();
    wm_get_text => WM_GETTEXT, WmGetText, FromCallback, u32;
    wm_get_text_length => WM_GETTEXTLENGTH, Wm, FromCallback, u32;
    wm_help => WM_HELP, WmHelp, Fixed(1), ();
    wm_hot_key => WM_HOTKEY, WmHotKey, Handled, ();
    wm_h_scroll => WM_HSCROLL, WmScroll, Handled, ();
    wm_init_dialog => WM_INITDIALOG, WmInitDialog, FromCallback, bool;
    wm_init_menu => WM_INITMENU, WmInitMenu, Handled, ();
    wm_init_menu_popup => WM_INITMENUPOPUP, WmInitMenuPopup, Handled, ();
    wm_input_lang_change => WM_INPUTLANGCHANGE, WmInputLangChange, Fixed(1), ();
    wm_input_lang_change_request => WM_INPUTLANGCHANGEREQUEST, WmInputLangChangeRequest, Handled, ();
    wm_key_down => WM_KEYDOWN, WmKey, Handled, ();
    wm_key_up => WM_KEYUP, WmKey, Handled, ();
    wm_kill_focus => WM_KILLFOCUS, WmFocus, Handled, ();
    wm_l_button_dbl_clk => WM_LBUTTONDBLCLK, WmMouse, Handled, ();
    wm_l_button_down => WM_LBUTTONDOWN, WmMouse, Handled, ();
    wm_l_button_up => WM_LBUTTONUP, WmMouse, Handled, ();
    wm_m_button_dbl_clk => WM_MBUTTONDBLCLK, WmMouse, Handled, ();
    wm_m_button_down => WM_MBUTTONDOWN, WmMouse, Handled, ();
    wm_m_button_up => WM_MBUTTONUP, WmMouse, Handled, ();
    wm_measure_item => WM_MEASUREITEM, WmMeasureItem, Fixed(1), ();
    wm_menu_char => WM_MENUCHAR, WmMenuChar, FromCallback, u32;
    wm_menu_drag => WM_MENUDRAG, WmMenuItemRef, FromCallback, u8;
    wm_menu_get_object => WM_MENUGETOBJECT, Wm, FromCallback, u32;
    wm_menu_r_button_up => WM_MENURBUTTONUP, WmMenuItemRef, Handled, ();
    wm_menu_select => WM_MENUSELECT, WmMenuSelect, Handled, ();
    wm_mouse_activate => WM_MOUSEACTIVATE, WmMouseActivate, FromCallback, u8;
    wm_mouse_hover => WM_MOUSEHOVER, WmMouse, Handled, ();
    wm_mouse_h_wheel => WM_MOUSEHWHEEL, WmMouseWheel, Handled, ();
    wm_mouse_leave => WM_MOUSELEAVE, Wm, Handled, ();
    wm_mouse_move => WM_MOUSEMOVE, WmMouse, Handled, ();
    wm_mouse_wheel => WM_MOUSEWHEEL, WmMouseWheel, Handled, ();
    wm_move => WM_MOVE, WmMove, Handled, ();
    wm_moving => WM_MOVING, WmMoving, Fixed(1), ();
    wm_nc_activate => WM_NCACTIVATE, WmNcActivate, FromCallback, bool;
    wm_nc_calc_size => WM_NCCALCSIZE, WmNcCalcSize, FromCallback, u16;
    wm_nc_create => WM_NCCREATE, WmCreate, FromCallback, bool;
    wm_nc_destroy => WM_NCDESTROY, Wm, Handled, ();
    wm_nc_hit_test => WM_NCHITTEST, WmNcHitTest, FromCallback, i32;
    wm_nc_l_button_dbl_clk => WM_NCLBUTTONDBLCLK, WmNcMouse, Handled, ();
    wm_nc_l_button_down => WM_NCLBUTTONDOWN, WmNcMouse, Handled, ();
    wm_nc_l_button_up => WM_NCLBUTTONUP, WmNcMouse, Handled, ();
    wm_nc_m_button_dbl_clk => WM_NCMBUTTONDBLCLK, WmNcMouse, Handled, ();
    wm_nc_m_button_down => WM_NCMBUTTONDOWN, WmNcMouse, Handled, ();
    wm_nc_m_button_up => WM_NCMBUTTONUP, WmNcMouse, Handled, ();
    wm_nc_mouse_hover => WM_NCMOUSEHOVER, WmNcMouse, Handled, ();
    wm_nc_mouse_leave => WM_NCMOUSELEAVE, Wm, Handled, ();
    wm_nc_mouse_move => WM_NCMOUSEMOVE, WmNcMouse, Handled, ();
    wm_nc_paint => WM_NCPAINT, WmNcPaint, Handled, ();
    wm_nc_r_button_dbl_clk => WM_NCRBUTTONDBLCLK, WmNcMouse, Handled, ();
    wm_nc_r_button_down => WM_NCRBUTTONDOWN, WmNcMouse, Handled, ();
    wm_nc_r_button_up => WM_NCRBUTTONUP, WmNcMouse, Handled, ();
    wm_nc_x_button_dbl_clk => WM_NCXBUTTONDBLCLK, WmNcXButton, Fixed(1), ();
    wm_nc_x_button_down => WM_NCXBUTTONDOWN, WmNcXButton, Fixed(1), ();
    wm_nc_x_button_up => WM_NCXBUTTONUP, WmNcXButton, Fixed(1), ();
    wm_next_dlg_ctl => WM_NEXTDLGCTL, WmNextDlgCtl, Handled, ();
    wm_next_menu => WM_NEXTMENU, Wm, Handled, ();
    wm_notify_format => WM_NOTIFYFORMAT, WmNotifyFormat, FromCallback, u8;
    wm_paint => WM_PAINT, Wm, Handled, ();
    wm_parent_notify => WM_PARENTNOTIFY, WmParentNotify, Handled, ();
    wm_power_broadcast => WM_POWERBROADCAST, WmPowerBroadcast, Fixed(1), ();
    wm_print => WM_PRINT, WmPrint, Handled, ();
    wm_print_client => WM_PRINTCLIENT, WmPrint, Handled, ();
    wm_query_drag_icon => WM_QUERYDRAGICON, Wm, FromCallback, NativeHandle;
    wm_query_end_session => WM_QUERYENDSESSION, WmQueryEndSession, FromCallback, bool;
    wm_query_new_palette => WM_QUERYNEWPALETTE, Wm, FromCallback, bool;
    wm_query_open => WM_QUERYOPEN, Wm, FromCallback, bool;
    wm_r_button_dbl_clk => WM_RBUTTONDBLCLK, WmMouse, Handled, ();
    wm_r_button_down => WM_RBUTTONDOWN, WmMouse, Handled, ();
    wm_r_button_up => WM_RBUTTONUP, WmMouse, Handled, ();
    wm_set_cursor => WM_SETCURSOR, WmSetCursor, FromCallback, bool;
    wm_set_focus => WM_SETFOCUS, WmFocus, Handled, ();
    wm_set_font => WM_SETFONT, WmSetFont, Handled, ();
    wm_set_hot_key => WM_SETHOTKEY, WmSetHotKey, FromCallback, i32;
    wm_set_icon => WM_SETICON, WmSetIcon, FromCallback, NativeHandle;
    wm_set_redraw => WM_SETREDRAW, WmSetRedraw, Handled, ();
    wm_set_text => WM_SETTEXT, WmSetText, FromCallback, i32;
    wm_setting_change => WM_SETTINGCHANGE, WmSettingChange, Handled, ();
    wm_show_window => WM_SHOWWINDOW, WmShowWindow, Handled, ();
    wm_size => WM_SIZE, WmSize, Handled, ();
    wm_sizing => WM_SIZING, WmSizing, Fixed(1), ();
    wm_spooler_status => WM_SPOOLERSTATUS, Wm, Handled, ();
    wm_style_changed => WM_STYLECHANGED, WmStyleChange, Handled, ();
    wm_style_changing => WM_STYLECHANGING, WmStyleChange, Handled, ();
    wm_sync_paint => WM_SYNCPAINT, Wm, Handled, ();
    wm_sys_char => WM_SYSCHAR, WmChar, Handled, ();
    wm_sys_color_change => WM_SYSCOLORCHANGE, Wm, Handled, ();
    wm_sys_command => WM_SYSCOMMAND, WmSysCommand, Handled, ();
    wm_sys_dead_char => WM_SYSDEADCHAR, WmChar, Handled, ();
    wm_sys_key_down => WM_SYSKEYDOWN, WmKey, Handled, ();
    wm_sys_key_up => WM_SYSKEYUP, WmKey, Handled, ();
    wm_time_change => WM_TIMECHANGE, Wm, Handled, ();
    wm_timer => WM_TIMER, WmTimer, Handled, ();
    wm_un_init_menu_popup => WM_UNINITMENUPOPUP, WmUninitMenuPopup, Handled, ();
    wm_vkey_to_item => WM_VKEYTOITEM, WmListBoxKey, FromCallback, i32;
    wm_v_scroll => WM_VSCROLL, WmScroll, Handled, ();
    wm_window_pos_changed => WM_WINDOWPOSCHANGED, WmWindowPos, Handled, ();
    wm_window_pos_changing => WM_WINDOWPOSCHANGING, WmWindowPos, Handled, ();
}

notify_kinds! {
    dtn_close_up => DTN_CLOSEUP, NotifyHeader, Handled, ();
    dtn_date_time_change => DTN_DATETIMECHANGE, NmDateTimeChange, Handled, ();
    dtn_drop_down => DTN_DROPDOWN, NotifyHeader, Handled, ();
    dtn_kill_focus => NM_KILLFOCUS, NotifyHeader, Handled, ();
    dtn_set_focus => NM_SETFOCUS, NotifyHeader, Handled, ();

    lvn_begin_drag => LVN_BEGINDRAG, NmListView, Handled, ();
    lvn_begin_label_edit => LVN_BEGINLABELEDITW, NmLvDispInfo, FromCallback, bool;
    lvn_begin_r_drag => LVN_BEGINRDRAG, NmListView, Handled, ();
    lvn_begin_scroll => LVN_BEGINSCROLL, NmLvScroll, Handled, ();
    lvn_column_click => LVN_COLUMNCLICK, NmListView, Handled, ();
    lvn_column_drop_down => LVN_COLUMNDROPDOWN, NmListView, Handled, ();
    lvn_column_overflow_click => LVN_COLUMNOVERFLOWCLICK, NmListView, Handled, ();
    lvn_delete_all_items => LVN_DELETEALLITEMS, NmListView, FromCallback, bool;
    lvn_delete_item => LVN_DELETEITEM, NmListView, Handled, ();
    lvn_end_label_edit => LVN_ENDLABELEDITW, NmLvDispInfo, FromCallback, bool;
    lvn_end_scroll => LVN_ENDSCROLL, NmLvScroll, Handled, ();
    lvn_get_disp_info => LVN_GETDISPINFOW, NmLvDispInfo, Handled, ();
    lvn_get_empty_markup => LVN_GETEMPTYMARKUP, NmLvEmptyMarkup, FromCallback, bool;
    lvn_get_info_tip => LVN_GETINFOTIPW, NmLvGetInfoTip, Handled, ();
    lvn_hot_track => LVN_HOTTRACK, NmListView, FromCallback, i32;
    lvn_incremental_search => LVN_INCREMENTALSEARCHW, NmLvFindItem, Handled, ();
    lvn_insert_item => LVN_INSERTITEM, NmListView, Handled, ();
    lvn_item_activate => LVN_ITEMACTIVATE, NmItemActivate, Handled, ();
    lvn_item_changed => LVN_ITEMCHANGED, NmListView, Handled, ();
    lvn_item_changing => LVN_ITEMCHANGING, NmListView, FromCallback, bool;
    lvn_key_down => LVN_KEYDOWN, NmKeyDown, Handled, ();
    lvn_marquee_begin => LVN_MARQUEEBEGIN, NotifyHeader, FromCallback, i32;
    lvn_od_cache_hint => LVN_ODCACHEHINT, NmLvCacheHint, Handled, ();
    lvn_od_find_item => LVN_ODFINDITEMW, NmLvFindItem, FromCallback, i32;
    lvn_od_state_changed => LVN_ODSTATECHANGED, NmLvOdStateChange, Handled, ();
    lvn_set_disp_info => LVN_SETDISPINFOW, NmLvDispInfo, Handled, ();
    lvn_click => NM_CLICK, NmItemActivate, Handled, ();
    lvn_custom_draw => NM_CUSTOMDRAW, NmLvCustomDraw, FromCallback, u32;
    lvn_dbl_clk => NM_DBLCLK, NmItemActivate, Handled, ();
    lvn_hover => NM_HOVER, NotifyHeader, FromCallback, i32;
    lvn_kill_focus => NM_KILLFOCUS, NotifyHeader, Handled, ();
    lvn_r_click => NM_RCLICK, NmItemActivate, Handled, ();
    lvn_r_dbl_clk => NM_RDBLCLK, NmItemActivate, Handled, ();
    lvn_released_capture => NM_RELEASEDCAPTURE, NotifyHeader, Handled, ();
    lvn_return => NM_RETURN, NotifyHeader, Handled, ();
    lvn_set_focus => NM_SETFOCUS, NotifyHeader, Handled, ();

    mcn_sel_change => MCN_SELCHANGE, NmSelChange, Handled, ();
    mcn_select => MCN_SELECT, NmSelChange, Handled, ();
    mcn_released_capture => NM_RELEASEDCAPTURE, NotifyHeader, Handled, ();

    sbn_simple_mode_change => SBN_SIMPLEMODECHANGE, NotifyHeader, Handled, ();
    sbn_click => NM_CLICK, NmMouse, Handled, ();
    sbn_dbl_clk => NM_DBLCLK, NmMouse, Handled, ();
    sbn_r_click => NM_RCLICK, NmMouse, Handled, ();
    sbn_r_dbl_clk => NM_RDBLCLK, NmMouse, Handled, ();

    tcn_focus_change => TCN_FOCUSCHANGE, NotifyHeader, Handled, ();
    tcn_get_object => TCN_GETOBJECT, NmObjectNotify, Handled, ();
    tcn_key_down => TCN_KEYDOWN, NmKeyDown, Handled, ();
    tcn_sel_change => TCN_SELCHANGE, NotifyHeader, Handled, ();
    tcn_sel_changing => TCN_SELCHANGING, NotifyHeader, FromCallback, bool;
    tcn_click => NM_CLICK, NotifyHeader, Handled, ();
    tcn_dbl_clk => NM_DBLCLK, NotifyHeader, FromCallback, i32;
    tcn_r_click => NM_RCLICK, NotifyHeader, FromCallback, i32;
    tcn_r_dbl_clk => NM_RDBLCLK, NotifyHeader, FromCallback, i32;
    tcn_released_capture => NM_RELEASEDCAPTURE, NotifyHeader, Handled, ();

    trbn_thumb_pos_changing => TRBN_THUMBPOSCHANGING, NmTrbThumbPosChanging, Handled, ();
    trbn_custom_draw => NM_CUSTOMDRAW, NmCustomDraw, FromCallback, u32;
    trbn_released_capture => NM_RELEASEDCAPTURE, NotifyHeader, Handled, ();

    tvn_begin_drag => TVN_BEGINDRAGW, NmTreeView, Handled, ();
    tvn_begin_label_edit => TVN_BEGINLABELEDITW, NmTvDispInfo, FromCallback, bool;
    tvn_begin_r_drag => TVN_BEGINRDRAGW, NmTreeView, Handled, ();
    tvn_delete_item => TVN_DELETEITEMW, NmTreeView, Handled, ();
    tvn_end_label_edit => TVN_ENDLABELEDITW, NmTvDispInfo, FromCallback, bool;
    tvn_get_disp_info => TVN_GETDISPINFOW, NmTvDispInfo, Handled, ();
    tvn_get_info_tip => TVN_GETINFOTIPW, NmTvGetInfoTip, Handled, ();
    tvn_item_changed => TVN_ITEMCHANGEDW, NmTvItemChange, Handled, ();
    tvn_item_changing => TVN_ITEMCHANGINGW, NmTvItemChange, FromCallback, bool;
    tvn_item_expanded => TVN_ITEMEXPANDEDW, NmTreeView, Handled, ();
    tvn_item_expanding => TVN_ITEMEXPANDINGW, NmTreeView, FromCallback, bool;
    tvn_key_down => TVN_KEYDOWN, NmKeyDown, FromCallback, bool;
    tvn_sel_changed => TVN_SELCHANGEDW, NmTreeView, Handled, ();
    tvn_sel_changing => TVN_SELCHANGINGW, NmTreeView, FromCallback, bool;
    tvn_set_disp_info => TVN_SETDISPINFOW, NmTvDispInfo, Handled, ();
    tvn_single_expand => TVN_SINGLEEXPAND, NmTreeView, FromCallback, u8;
    tvn_click => NM_CLICK, NotifyHeader, Handled, ();
    tvn_custom_draw => NM_CUSTOMDRAW, NmTvCustomDraw, FromCallback, u32;
    tvn_dbl_clk => NM_DBLCLK, NotifyHeader, Handled, ();
    tvn_kill_focus => NM_KILLFOCUS, NotifyHeader, Handled, ();
    tvn_r_click => NM_RCLICK, NotifyHeader, Handled, ();
    tvn_r_dbl_clk => NM_RDBLCLK, NotifyHeader, Handled, ();
    tvn_return => NM_RETURN, NotifyHeader, Handled, ();
    tvn_set_cursor => NM_SETCURSOR, NmMouse, FromCallback, i32;
    tvn_set_focus => NM_SETFOCUS, NotifyHeader, Handled, ();

    udn_delta_pos => UDN_DELTAPOS, NmUpDown, FromCallback, i32;
    udn_released_capture => NM_RELEASEDCAPTURE, NotifyHeader, Handled, ();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::{Dispatched, EventKey, MessageRouter};
    use crate::types::{RawEvent, make_wparam};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    struct TestSink {
        router: RefCell<MessageRouter>,
    }

    impl TestSink {
        fn new(flavor: HostFlavor) -> Self {
            TestSink {
                router: RefCell::new(MessageRouter::new(flavor)),
            }
        }

        fn dispatch(&self, msg: u32, raw: RawEvent) -> Dispatched {
            unsafe { self.router.borrow().dispatch(msg, raw) }
        }
    }

    impl HandlerSink for TestSink {
        fn flavor(&self) -> HostFlavor {
            self.router.borrow().flavor()
        }

        fn register_message(&self, id: MessageId, handler: Handler) -> PlatformResult<()> {
            self.router.borrow_mut().add(EventKey::Message(id), handler);
            Ok(())
        }

        fn register_command(&self, id: CommandId, handler: Handler) -> PlatformResult<()> {
            self.router.borrow_mut().add(EventKey::Command(id), handler);
            Ok(())
        }

        fn register_notify(&self, key: NotifyKey, handler: Handler) -> PlatformResult<()> {
            self.router.borrow_mut().add(EventKey::Notify(key), handler);
            Ok(())
        }
    }

    #[test]
    fn close_handler_returns_the_flavor_default_each_time() {
        for (flavor, expected) in [(HostFlavor::Window, 0), (HostFlavor::Dialog, 1)] {
            let sink = TestSink::new(flavor);
            let count = Rc::new(Cell::new(0));
            let c = Rc::clone(&count);
            EventProxy::new(&sink)
                .wm_close(move |_| c.set(c.get() + 1))
                .unwrap();

            for _ in 0..2 {
                assert_eq!(
                    sink.dispatch(WM_CLOSE, RawEvent::default()),
                    Dispatched::Handled(expected)
                );
            }
            assert_eq!(count.get(), 2);
        }
    }

    #[test]
    fn fixed_rule_ignores_flavor() {
        let sink = TestSink::new(HostFlavor::Window);
        EventProxy::new(&sink).wm_sizing(|_| {}).unwrap();
        let mut rect = crate::types::Rect::default();
        let raw = RawEvent::new(1, &mut rect as *mut _ as isize);
        assert_eq!(sink.dispatch(WM_SIZING, raw), Dispatched::Handled(1));
    }

    #[test]
    fn callback_values_are_forwarded_without_narrowing() {
        let sink = TestSink::new(HostFlavor::Dialog);
        let proxy = EventProxy::new(&sink);
        proxy.wm_nc_hit_test(|_| -1).unwrap();
        proxy
            .wm_ctl_color_btn(|_| NativeHandle::from_raw(0x7fff_1234))
            .unwrap();
        proxy.wm_menu_char(|_| 0x0003_0002).unwrap();

        assert_eq!(sink.dispatch(WM_NCHITTEST, RawEvent::default()), Dispatched::Handled(-1));
        assert_eq!(
            sink.dispatch(WM_CTLCOLORBTN, RawEvent::default()),
            Dispatched::Handled(0x7fff_1234)
        );
        assert_eq!(
            sink.dispatch(WM_MENUCHAR, RawEvent::default()),
            Dispatched::Handled(0x0003_0002)
        );
    }

    #[test]
    fn typed_view_reads_the_raw_parameters() {
        let sink = TestSink::new(HostFlavor::Window);
        let seen = Rc::new(Cell::new((0, 0)));
        let s = Rc::clone(&seen);
        EventProxy::new(&sink)
            .wm_size(move |p| {
                let size = p.client_area_size();
                s.set((size.cx, size.cy));
            })
            .unwrap();

        let raw = RawEvent::new(0, crate::types::make_lparam(640, 480));
        sink.dispatch(WM_SIZE, raw);
        assert_eq!(seen.get(), (640, 480));
    }

    #[test]
    fn command_handler_uses_the_handled_sentinel() {
        let sink = TestSink::new(HostFlavor::Dialog);
        let fired = Rc::new(Cell::new(0u16));
        let f = Rc::clone(&fired);
        EventProxy::new(&sink)
            .wm_command_many(&[501, 502], move |p| f.set(p.control_id()))
            .unwrap();

        let out = sink.dispatch(WM_COMMAND, RawEvent::new(make_wparam(502, 0), 0));
        assert_eq!(out, Dispatched::Handled(1));
        assert_eq!(fired.get(), 502);
    }

    #[test]
    fn typed_notification_is_keyed_by_control_and_code() {
        let sink = TestSink::new(HostFlavor::Window);
        EventProxy::new(&sink)
            .lvn_item_changing(ControlId::new(7), |p| p.info().u_new_state != 0)
            .unwrap();

        let mut info = NmListView::default();
        info.hdr.id_from = 7;
        info.hdr.code = LVN_ITEMCHANGING as u32;
        info.u_new_state = 2;
        let raw = RawEvent::new(7, &mut info as *mut _ as isize);
        assert_eq!(sink.dispatch(WM_NOTIFY, raw), Dispatched::Handled(1));

        info.hdr.id_from = 8;
        let raw = RawEvent::new(8, &mut info as *mut _ as isize);
        assert_eq!(sink.dispatch(WM_NOTIFY, raw), Dispatched::Unhandled);
    }

    #[test]
    fn escape_hatch_rejects_reserved_private_messages() {
        let sink = TestSink::new(HostFlavor::Window);
        let proxy = EventProxy::new(&sink);
        let err = proxy.wm(WM_UI_WORK_THREAD, |_| 0).unwrap_err();
        assert!(matches!(err, PlatformError::InvalidState(_)));
        assert!(proxy.wm_many(&[WM_USER, WM_MODELESS_DESTROYED], |_| 0).is_err());
        assert!(sink.router.borrow().is_empty());

        proxy.wm(WM_USER + 1, |p| p.lparam() * 2).unwrap();
        assert_eq!(
            sink.dispatch(WM_USER + 1, RawEvent::new(0, 21)),
            Dispatched::Handled(42)
        );
    }

    #[test]
    fn catalogue_maps_each_message_to_its_own_id() {
        assert_eq!(message_kind(WM_COPYDATA).map(|k| k.name), Some("wm_copy_data"));
        assert_eq!(message_kind(WM_GETHOTKEY).map(|k| k.name), Some("wm_get_hot_key"));
        assert_eq!(
            message_kind(WM_QUERYDRAGICON).map(|k| k.name),
            Some("wm_query_drag_icon")
        );
        let lang = message_kind(WM_INPUTLANGCHANGE).unwrap();
        assert_eq!(lang.name, "wm_input_lang_change");
        assert_eq!(lang.rule, ReturnRule::Fixed(1));
        assert_eq!(message_kind(WM_CREATE).map(|k| k.name), Some("wm_create"));
    }

    #[test]
    fn catalogue_has_no_duplicate_message_ids_or_framing_ids() {
        for (i, a) in MESSAGE_KINDS.iter().enumerate() {
            assert_ne!(a.key, KindKey::Message(WM_COMMAND));
            assert_ne!(a.key, KindKey::Message(WM_NOTIFY));
            for b in &MESSAGE_KINDS[i + 1..] {
                assert_ne!(a.key, b.key, "{} and {} share an id", a.name, b.name);
            }
        }
        assert!(kind_by_name("tvn_single_expand").is_some());
        assert!(kind_by_name("wm_nonexistent").is_none());
    }

    #[test]
    fn into_lresult_keeps_sign_and_width() {
        assert_eq!((-1_i32).into_lresult(), -1);
        assert_eq!(u32::MAX.into_lresult(), u32::MAX as isize);
        assert_eq!(true.into_lresult(), 1);
        assert_eq!(0xFFFF_u16.into_lresult(), 0xFFFF);
        assert_eq!(().into_lresult(), 0);
    }
}
