/*
 * Message identifiers and notification codes known to the dispatch core.
 * Duplicated from the Win32 headers so the portable router and its tests do
 * not depend on the `windows` crate.
 */

pub const WM_NULL: u32 = 0x0000;
pub const WM_CREATE: u32 = 0x0001;
pub const WM_DESTROY: u32 = 0x0002;
pub const WM_MOVE: u32 = 0x0003;
pub const WM_SIZE: u32 = 0x0005;
pub const WM_ACTIVATE: u32 = 0x0006;
pub const WM_SETFOCUS: u32 = 0x0007;
pub const WM_KILLFOCUS: u32 = 0x0008;
pub const WM_ENABLE: u32 = 0x000A;
pub const WM_SETREDRAW: u32 = 0x000B;
pub const WM_SETTEXT: u32 = 0x000C;
pub const WM_GETTEXT: u32 = 0x000D;
pub const WM_GETTEXTLENGTH: u32 = 0x000E;
pub const WM_PAINT: u32 = 0x000F;
pub const WM_CLOSE: u32 = 0x0010;
pub const WM_QUERYENDSESSION: u32 = 0x0011;
pub const WM_QUERYOPEN: u32 = 0x0013;
pub const WM_ERASEBKGND: u32 = 0x0014;
pub const WM_SYSCOLORCHANGE: u32 = 0x0015;
pub const WM_ENDSESSION: u32 = 0x0016;
pub const WM_SHOWWINDOW: u32 = 0x0018;
pub const WM_SETTINGCHANGE: u32 = 0x001A;
pub const WM_DEVMODECHANGE: u32 = 0x001B;
pub const WM_ACTIVATEAPP: u32 = 0x001C;
pub const WM_FONTCHANGE: u32 = 0x001D;
pub const WM_TIMECHANGE: u32 = 0x001E;
pub const WM_CANCELMODE: u32 = 0x001F;
pub const WM_SETCURSOR: u32 = 0x0020;
pub const WM_MOUSEACTIVATE: u32 = 0x0021;
pub const WM_CHILDACTIVATE: u32 = 0x0022;
pub const WM_GETMINMAXINFO: u32 = 0x0024;
pub const WM_NEXTDLGCTL: u32 = 0x0028;
pub const WM_SPOOLERSTATUS: u32 = 0x002A;
pub const WM_DRAWITEM: u32 = 0x002B;
pub const WM_MEASUREITEM: u32 = 0x002C;
pub const WM_DELETEITEM: u32 = 0x002D;
pub const WM_VKEYTOITEM: u32 = 0x002E;
pub const WM_CHARTOITEM: u32 = 0x002F;
pub const WM_SETFONT: u32 = 0x0030;
pub const WM_GETFONT: u32 = 0x0031;
pub const WM_SETHOTKEY: u32 = 0x0032;
pub const WM_GETHOTKEY: u32 = 0x0033;
pub const WM_QUERYDRAGICON: u32 = 0x0037;
pub const WM_COMPAREITEM: u32 = 0x0039;
pub const WM_COMPACTING: u32 = 0x0041;
pub const WM_WINDOWPOSCHANGING: u32 = 0x0046;
pub const WM_WINDOWPOSCHANGED: u32 = 0x0047;
pub const WM_COPYDATA: u32 = 0x004A;
pub const WM_NOTIFY: u32 = 0x004E;
pub const WM_INPUTLANGCHANGEREQUEST: u32 = 0x0050;
pub const WM_INPUTLANGCHANGE: u32 = 0x0051;
pub const WM_HELP: u32 = 0x0053;
pub const WM_NOTIFYFORMAT: u32 = 0x0055;
pub const WM_CONTEXTMENU: u32 = 0x007B;
pub const WM_STYLECHANGING: u32 = 0x007C;
pub const WM_STYLECHANGED: u32 = 0x007D;
pub const WM_DISPLAYCHANGE: u32 = 0x007E;
pub const WM_GETICON: u32 = 0x007F;
pub const WM_SETICON: u32 = 0x0080;
pub const WM_NCCREATE: u32 = 0x0081;
pub const WM_NCDESTROY: u32 = 0x0082;
pub const WM_NCCALCSIZE: u32 = 0x0083;
pub const WM_NCHITTEST: u32 = 0x0084;
pub const WM_NCPAINT: u32 = 0x0085;
pub const WM_NCACTIVATE: u32 = 0x0086;
pub const WM_GETDLGCODE: u32 = 0x0087;
pub const WM_SYNCPAINT: u32 = 0x0088;
pub const WM_NCMOUSEMOVE: u32 = 0x00A0;
pub const WM_NCLBUTTONDOWN: u32 = 0x00A1;
pub const WM_NCLBUTTONUP: u32 = 0x00A2;
pub const WM_NCLBUTTONDBLCLK: u32 = 0x00A3;
pub const WM_NCRBUTTONDOWN: u32 = 0x00A4;
pub const WM_NCRBUTTONUP: u32 = 0x00A5;
pub const WM_NCRBUTTONDBLCLK: u32 = 0x00A6;
pub const WM_NCMBUTTONDOWN: u32 = 0x00A7;
pub const WM_NCMBUTTONUP: u32 = 0x00A8;
pub const WM_NCMBUTTONDBLCLK: u32 = 0x00A9;
pub const WM_NCXBUTTONDOWN: u32 = 0x00AB;
pub const WM_NCXBUTTONUP: u32 = 0x00AC;
pub const WM_NCXBUTTONDBLCLK: u32 = 0x00AD;
pub const WM_KEYDOWN: u32 = 0x0100;
pub const WM_KEYUP: u32 = 0x0101;
pub const WM_CHAR: u32 = 0x0102;
pub const WM_DEADCHAR: u32 = 0x0103;
pub const WM_SYSKEYDOWN: u32 = 0x0104;
pub const WM_SYSKEYUP: u32 = 0x0105;
pub const WM_SYSCHAR: u32 = 0x0106;
pub const WM_SYSDEADCHAR: u32 = 0x0107;
pub const WM_INITDIALOG: u32 = 0x0110;
pub const WM_COMMAND: u32 = 0x0111;
pub const WM_SYSCOMMAND: u32 = 0x0112;
pub const WM_TIMER: u32 = 0x0113;
pub const WM_HSCROLL: u32 = 0x0114;
pub const WM_VSCROLL: u32 = 0x0115;
pub const WM_INITMENU: u32 = 0x0116;
pub const WM_INITMENUPOPUP: u32 = 0x0117;
pub const WM_MENUSELECT: u32 = 0x011F;
pub const WM_MENUCHAR: u32 = 0x0120;
pub const WM_ENTERIDLE: u32 = 0x0121;
pub const WM_MENURBUTTONUP: u32 = 0x0122;
pub const WM_MENUDRAG: u32 = 0x0123;
pub const WM_MENUGETOBJECT: u32 = 0x0124;
pub const WM_UNINITMENUPOPUP: u32 = 0x0125;
pub const WM_CTLCOLOREDIT: u32 = 0x0133;
pub const WM_CTLCOLORLISTBOX: u32 = 0x0134;
pub const WM_CTLCOLORBTN: u32 = 0x0135;
pub const WM_CTLCOLORDLG: u32 = 0x0136;
pub const WM_CTLCOLORSCROLLBAR: u32 = 0x0137;
pub const WM_CTLCOLORSTATIC: u32 = 0x0138;
pub const WM_MOUSEMOVE: u32 = 0x0200;
pub const WM_LBUTTONDOWN: u32 = 0x0201;
pub const WM_LBUTTONUP: u32 = 0x0202;
pub const WM_LBUTTONDBLCLK: u32 = 0x0203;
pub const WM_RBUTTONDOWN: u32 = 0x0204;
pub const WM_RBUTTONUP: u32 = 0x0205;
pub const WM_RBUTTONDBLCLK: u32 = 0x0206;
pub const WM_MBUTTONDOWN: u32 = 0x0207;
pub const WM_MBUTTONUP: u32 = 0x0208;
pub const WM_MBUTTONDBLCLK: u32 = 0x0209;
pub const WM_MOUSEWHEEL: u32 = 0x020A;
pub const WM_MOUSEHWHEEL: u32 = 0x020E;
pub const WM_PARENTNOTIFY: u32 = 0x0210;
pub const WM_ENTERMENULOOP: u32 = 0x0211;
pub const WM_EXITMENULOOP: u32 = 0x0212;
pub const WM_NEXTMENU: u32 = 0x0213;
pub const WM_SIZING: u32 = 0x0214;
pub const WM_CAPTURECHANGED: u32 = 0x0215;
pub const WM_MOVING: u32 = 0x0216;
pub const WM_POWERBROADCAST: u32 = 0x0218;
pub const WM_DEVICECHANGE: u32 = 0x0219;
pub const WM_ENTERSIZEMOVE: u32 = 0x0231;
pub const WM_EXITSIZEMOVE: u32 = 0x0232;
pub const WM_DROPFILES: u32 = 0x0233;
pub const WM_MOUSEHOVER: u32 = 0x02A1;
pub const WM_MOUSELEAVE: u32 = 0x02A3;
pub const WM_NCMOUSEHOVER: u32 = 0x02A0;
pub const WM_NCMOUSELEAVE: u32 = 0x02A2;
pub const WM_CLIPBOARDUPDATE: u32 = 0x031D;
pub const WM_QUERYNEWPALETTE: u32 = 0x030F;
pub const WM_HOTKEY: u32 = 0x0312;
pub const WM_PRINT: u32 = 0x0317;
pub const WM_PRINTCLIENT: u32 = 0x0318;
pub const WM_APPCOMMAND: u32 = 0x0319;
pub const WM_THEMECHANGED: u32 = 0x031A;
pub const WM_USER: u32 = 0x0400;
pub const WM_APP: u32 = 0x8000;

/// Background-work job delivery (`lparam` addresses the job slot).
pub const WM_UI_WORK_THREAD: u32 = WM_APP + 0x3fff;
/// Sent by a modeless child to its parent once created.
pub const WM_MODELESS_CREATED: u32 = WM_APP + 0x3ffd;
/// Sent by a modeless child to its parent during teardown.
pub const WM_MODELESS_DESTROYED: u32 = WM_APP + 0x3ffe;
/// `wparam` stamp of every private coordination message.
pub const PRIVATE_MESSAGE_MAGIC: usize = 0xc0de_f00d;

pub const RESERVED_PRIVATE_MESSAGES: [u32; 3] =
    [WM_UI_WORK_THREAD, WM_MODELESS_CREATED, WM_MODELESS_DESTROYED];

pub const fn is_reserved_private_message(msg: u32) -> bool {
    msg == WM_UI_WORK_THREAD || msg == WM_MODELESS_CREATED || msg == WM_MODELESS_DESTROYED
}

// Generic common-control notifications.
pub const NM_OUTOFMEMORY: i32 = -1;
pub const NM_CLICK: i32 = -2;
pub const NM_DBLCLK: i32 = -3;
pub const NM_RETURN: i32 = -4;
pub const NM_RCLICK: i32 = -5;
pub const NM_RDBLCLK: i32 = -6;
pub const NM_SETFOCUS: i32 = -7;
pub const NM_KILLFOCUS: i32 = -8;
pub const NM_CUSTOMDRAW: i32 = -12;
pub const NM_HOVER: i32 = -13;
pub const NM_RELEASEDCAPTURE: i32 = -16;
pub const NM_SETCURSOR: i32 = -17;

// List view.
pub const LVN_ITEMCHANGING: i32 = -100;
pub const LVN_ITEMCHANGED: i32 = -101;
pub const LVN_INSERTITEM: i32 = -102;
pub const LVN_DELETEITEM: i32 = -103;
pub const LVN_DELETEALLITEMS: i32 = -104;
pub const LVN_COLUMNCLICK: i32 = -108;
pub const LVN_BEGINDRAG: i32 = -109;
pub const LVN_BEGINRDRAG: i32 = -111;
pub const LVN_ODCACHEHINT: i32 = -113;
pub const LVN_ITEMACTIVATE: i32 = -114;
pub const LVN_ODSTATECHANGED: i32 = -115;
pub const LVN_HOTTRACK: i32 = -121;
pub const LVN_KEYDOWN: i32 = -155;
pub const LVN_MARQUEEBEGIN: i32 = -156;
pub const LVN_GETINFOTIPW: i32 = -158;
pub const LVN_INCREMENTALSEARCHW: i32 = -163;
pub const LVN_COLUMNDROPDOWN: i32 = -164;
pub const LVN_COLUMNOVERFLOWCLICK: i32 = -166;
pub const LVN_BEGINLABELEDITW: i32 = -175;
pub const LVN_ENDLABELEDITW: i32 = -176;
pub const LVN_GETDISPINFOW: i32 = -177;
pub const LVN_SETDISPINFOW: i32 = -178;
pub const LVN_ODFINDITEMW: i32 = -179;
pub const LVN_BEGINSCROLL: i32 = -180;
pub const LVN_ENDSCROLL: i32 = -181;
pub const LVN_GETEMPTYMARKUP: i32 = -187;

// Tree view.
pub const TVN_KEYDOWN: i32 = -412;
pub const TVN_GETINFOTIPW: i32 = -414;
pub const TVN_SINGLEEXPAND: i32 = -415;
pub const TVN_ITEMCHANGINGW: i32 = -417;
pub const TVN_ITEMCHANGEDW: i32 = -419;
pub const TVN_SELCHANGINGW: i32 = -450;
pub const TVN_SELCHANGEDW: i32 = -451;
pub const TVN_GETDISPINFOW: i32 = -452;
pub const TVN_SETDISPINFOW: i32 = -453;
pub const TVN_ITEMEXPANDINGW: i32 = -454;
pub const TVN_ITEMEXPANDEDW: i32 = -455;
pub const TVN_BEGINDRAGW: i32 = -456;
pub const TVN_BEGINRDRAGW: i32 = -457;
pub const TVN_DELETEITEMW: i32 = -458;
pub const TVN_BEGINLABELEDITW: i32 = -459;
pub const TVN_ENDLABELEDITW: i32 = -460;

// Tab control.
pub const TCN_KEYDOWN: i32 = -550;
pub const TCN_SELCHANGE: i32 = -551;
pub const TCN_SELCHANGING: i32 = -552;
pub const TCN_GETOBJECT: i32 = -553;
pub const TCN_FOCUSCHANGE: i32 = -554;

// Up-down, date-time picker, month calendar, trackbar, status bar.
pub const UDN_DELTAPOS: i32 = -722;
pub const MCN_SELECT: i32 = -746;
pub const MCN_SELCHANGE: i32 = -749;
pub const DTN_CLOSEUP: i32 = -753;
pub const DTN_DROPDOWN: i32 = -754;
pub const DTN_DATETIMECHANGE: i32 = -759;
pub const SBN_SIMPLEMODECHANGE: i32 = -880;
pub const TRBN_THUMBPOSCHANGING: i32 = -1502;

// Custom-draw return flags.
pub const CDRF_DODEFAULT: u32 = 0x0000_0000;
pub const CDRF_NEWFONT: u32 = 0x0000_0002;
pub const CDRF_SKIPDEFAULT: u32 = 0x0000_0004;
pub const CDRF_NOTIFYITEMDRAW: u32 = 0x0000_0020;
pub const CDRF_NOTIFYSUBITEMDRAW: u32 = 0x0000_0020;
pub const CDRF_NOTIFYPOSTPAINT: u32 = 0x0000_0010;

// Custom-draw stages.
pub const CDDS_PREPAINT: u32 = 0x0000_0001;
pub const CDDS_POSTPAINT: u32 = 0x0000_0002;
pub const CDDS_ITEM: u32 = 0x0001_0000;
pub const CDDS_ITEMPREPAINT: u32 = CDDS_ITEM | CDDS_PREPAINT;
pub const CDDS_ITEMPOSTPAINT: u32 = CDDS_ITEM | CDDS_POSTPAINT;
pub const CDDS_SUBITEM: u32 = 0x0002_0000;

// Mouse virtual-key state flags (`MK_*`).
pub const MK_LBUTTON: u16 = 0x0001;
pub const MK_RBUTTON: u16 = 0x0002;
pub const MK_SHIFT: u16 = 0x0004;
pub const MK_CONTROL: u16 = 0x0008;
pub const MK_MBUTTON: u16 = 0x0010;
pub const MK_XBUTTON1: u16 = 0x0020;
pub const MK_XBUTTON2: u16 = 0x0040;

pub const IDOK: isize = 1;
pub const IDCANCEL: isize = 2;

// Window and class styles used by the host defaults.
pub const CS_DBLCLKS: u32 = 0x0008;
pub const COLOR_BTNFACE: i32 = 15;

pub const WS_CHILD: u32 = 0x4000_0000;
pub const WS_VISIBLE: u32 = 0x1000_0000;
pub const WS_CLIPSIBLINGS: u32 = 0x0400_0000;
pub const WS_CLIPCHILDREN: u32 = 0x0200_0000;
pub const WS_CAPTION: u32 = 0x00C0_0000;
pub const WS_BORDER: u32 = 0x0080_0000;
pub const WS_SYSMENU: u32 = 0x0008_0000;
pub const WS_GROUP: u32 = 0x0002_0000;
pub const WS_TABSTOP: u32 = 0x0001_0000;

pub const WS_EX_DLGMODALFRAME: u32 = 0x0000_0001;
pub const WS_EX_TOOLWINDOW: u32 = 0x0000_0080;
pub const WS_EX_CLIENTEDGE: u32 = 0x0000_0200;

/// `IDC_ARROW`, the default class cursor.
pub const IDC_ARROW: u16 = 32512;

/// Logical pixels per inch at 100% scaling.
pub const USER_DEFAULT_SCREEN_DPI: i32 = 96;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn private_messages_live_in_the_application_range() {
        for msg in RESERVED_PRIVATE_MESSAGES {
            assert!((WM_APP..=0xBFFF).contains(&msg));
            assert!(is_reserved_private_message(msg));
        }
        assert!(!is_reserved_private_message(WM_APP));
    }

    #[test]
    fn private_messages_do_not_collide() {
        assert_ne!(WM_UI_WORK_THREAD, WM_MODELESS_CREATED);
        assert_ne!(WM_UI_WORK_THREAD, WM_MODELESS_DESTROYED);
        assert_ne!(WM_MODELESS_CREATED, WM_MODELESS_DESTROYED);
    }
}
