/*
 * Win32 glue shared by every host: window class registration, native window
 * creation, and the two OS procedures that connect a native object to its
 * `HostCore`.
 *
 * The host travels into the procedure as the creation parameter
 * (`lpCreateParams` for windows, the `DialogBoxParamW`/`CreateDialogParamW`
 * init parameter for dialogs). At `WM_NCCREATE`/`WM_INITDIALOG` the procedure
 * takes one strong reference, stores it in `GWLP_USERDATA` and reports the
 * native handle to the host; at `WM_NCDESTROY` it reports teardown and drops
 * that reference. Every call in between holds its own temporary reference so
 * a handler that destroys its own window cannot free the host under its feet.
 */

use crate::constants::{USER_DEFAULT_SCREEN_DPI, WM_NCDESTROY, WM_NCPAINT, WS_EX_CLIENTEDGE};
use crate::error::{PlatformError, Result as PlatformResult};
use crate::host::HostCore;
use crate::router::Dispatched;
use crate::setup::Cursor;
use crate::types::{NativeHandle, Point, RawEvent, Rect, Size};
use std::ffi::c_void;
use std::rc::Rc;
use windows::Win32::Foundation::{GetLastError, HINSTANCE, HWND, LPARAM, LRESULT, RECT, WPARAM};
use windows::Win32::Graphics::Gdi::{
    ExcludeClipRect, GetDC, GetDeviceCaps, GetWindowDC, HBRUSH, LOGPIXELSX, ReleaseDC,
};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::Controls::{
    CloseThemeData, DrawThemeBackground, IsAppThemed, IsThemeActive, OpenThemeData,
};
use windows::Win32::UI::WindowsAndMessaging::{
    CREATESTRUCTW, CreateWindowExW, DefWindowProcW, GWL_EXSTYLE, GWLP_USERDATA, GetClassInfoExW,
    GetWindowLongPtrW, GetWindowRect, HCURSOR, HICON, HMENU, LoadCursorW, LoadIconW,
    RegisterClassExW, SetWindowLongPtrW, WINDOW_EX_STYLE, WINDOW_STYLE, WM_INITDIALOG,
    WM_NCCREATE, WNDCLASS_STYLES, WNDCLASSEXW,
};
use windows::core::{HSTRING, PCWSTR, w};

/// List-view item part and its normal state, used for the themed border.
const LVP_LISTITEM: i32 = 1;
const LISS_NORMAL: i32 = 1;

/// Module handle of the running executable.
pub(crate) fn instance() -> PlatformResult<HINSTANCE> {
    let module = unsafe { GetModuleHandleW(None) }?;
    Ok(HINSTANCE(module.0))
}

/// `MAKEINTRESOURCEW`.
pub(crate) fn int_resource(id: u16) -> PCWSTR {
    PCWSTR(id as usize as *const u16)
}

/// Class-level options of a window host.
#[derive(Debug, Clone)]
pub(crate) struct ClassSpec<'a> {
    pub name: &'a str,
    pub style: u32,
    /// Icon resource id in the executable; 0 for none.
    pub icon_id: u16,
    pub cursor: Cursor,
    /// System color index; the class brush is `index + 1`.
    pub background: i32,
}

/*
 * Registers a window class routed to `hosted_window_proc`. A class already
 * registered under the same name is reused as-is.
 */
pub(crate) fn register_window_class(spec: &ClassSpec<'_>) -> PlatformResult<()> {
    let h_instance = instance()?;
    let class_name = HSTRING::from(spec.name);
    let class_name_pcwstr = PCWSTR(class_name.as_ptr());

    unsafe {
        let mut existing = WNDCLASSEXW::default();
        if GetClassInfoExW(Some(h_instance), class_name_pcwstr, &mut existing).is_ok() {
            log::debug!("Platform: window class '{}' already registered.", spec.name);
            return Ok(());
        }

        let icon = if spec.icon_id == 0 {
            HICON::default()
        } else {
            LoadIconW(Some(h_instance), int_resource(spec.icon_id))?
        };
        let wc = WNDCLASSEXW {
            cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
            style: WNDCLASS_STYLES(spec.style),
            lpfnWndProc: Some(hosted_window_proc),
            cbClsExtra: 0,
            cbWndExtra: 0,
            hInstance: h_instance,
            hIcon: icon,
            hCursor: load_cursor(h_instance, spec.cursor)?,
            hbrBackground: HBRUSH((spec.background + 1) as isize as *mut c_void),
            lpszMenuName: PCWSTR::null(),
            lpszClassName: class_name_pcwstr,
            hIconSm: icon,
        };

        if RegisterClassExW(&wc) == 0 {
            let error = GetLastError();
            log::error!("Platform: RegisterClassExW failed for '{}': {error:?}", spec.name);
            Err(PlatformError::InitializationFailed(format!(
                "RegisterClassExW failed for '{}': {error:?}",
                spec.name
            )))
        } else {
            log::debug!("Platform: window class '{}' registered.", spec.name);
            Ok(())
        }
    }
}

fn load_cursor(h_instance: HINSTANCE, cursor: Cursor) -> PlatformResult<HCURSOR> {
    let loaded = match cursor {
        Cursor::System(id) => unsafe { LoadCursorW(None, int_resource(id)) },
        Cursor::Resource(id) => unsafe { LoadCursorW(Some(h_instance), int_resource(id)) },
    };
    loaded.map_err(|e| {
        log::error!("Platform: LoadCursorW failed for {cursor:?}: {e:?}");
        PlatformError::from(e)
    })
}

/// Horizontal DPI of the screen; 96 when it cannot be queried.
pub(crate) fn system_dpi() -> i32 {
    unsafe {
        let hdc = GetDC(None);
        if hdc.is_invalid() {
            log::warn!("Platform: no screen DC; assuming {USER_DEFAULT_SCREEN_DPI} DPI.");
            return USER_DEFAULT_SCREEN_DPI;
        }
        let dpi = GetDeviceCaps(Some(hdc), LOGPIXELSX);
        let _ = ReleaseDC(None, hdc);
        if dpi > 0 { dpi } else { USER_DEFAULT_SCREEN_DPI }
    }
}

/// Screen rectangle of `window`.
pub(crate) fn window_rect(window: NativeHandle) -> PlatformResult<Rect> {
    let mut rc = RECT::default();
    unsafe { GetWindowRect(window.as_hwnd(), &mut rc) }?;
    Ok(Rect {
        left: rc.left,
        top: rc.top,
        right: rc.right,
        bottom: rc.bottom,
    })
}

/*
 * Default non-client painting, then, for a window with a client edge while
 * visual styles are active, the sunken edge is repainted with the themed
 * list-view border so the control matches the themed common controls.
 */
pub(crate) unsafe fn paint_themed_border(hwnd: HWND, wparam: WPARAM, lparam: LPARAM) {
    unsafe {
        DefWindowProcW(hwnd, WM_NCPAINT, wparam, lparam);

        let ex_style = GetWindowLongPtrW(hwnd, GWL_EXSTYLE) as u32;
        if ex_style & WS_EX_CLIENTEDGE == 0
            || !IsThemeActive().as_bool()
            || !IsAppThemed().as_bool()
        {
            return;
        }
        let mut wr = RECT::default();
        if GetWindowRect(hwnd, &mut wr).is_err() {
            return;
        }
        let (w, h) = (wr.right - wr.left, wr.bottom - wr.top);
        if w <= 4 || h <= 4 {
            return;
        }

        let hdc = GetWindowDC(Some(hwnd));
        if hdc.is_invalid() {
            return;
        }
        let theme = OpenThemeData(Some(hwnd), w!("LISTVIEW"));
        if !theme.is_invalid() {
            let outer = RECT {
                left: 0,
                top: 0,
                right: w,
                bottom: h,
            };
            // Only the 2px edge is painted; the client area is left alone.
            let _ = ExcludeClipRect(hdc, 2, 2, w - 2, h - 2);
            if let Err(e) =
                DrawThemeBackground(theme, hdc, LVP_LISTITEM, LISS_NORMAL, &outer, None)
            {
                log::warn!("Platform: themed border painting failed: {e:?}");
            }
            let _ = CloseThemeData(theme);
        }
        let _ = ReleaseDC(Some(hwnd), hdc);
    }
}

/// Everything `CreateWindowExW` needs besides the class.
#[derive(Debug, Clone)]
pub(crate) struct CreateSpec<'a> {
    pub class_name: &'a str,
    pub title: &'a str,
    pub style: u32,
    pub ex_style: u32,
    pub pos: Point,
    pub size: Size,
    pub parent: Option<NativeHandle>,
    /// Menu handle for top-level windows, control id for child windows.
    pub menu: isize,
}

/*
 * Creates a native window bound to `host`. The host must already be in
 * `NativeCreationRequested`; it becomes live inside this call, at
 * `WM_NCCREATE`.
 */
pub(crate) fn create_hosted_window(
    host: &Rc<HostCore>,
    spec: &CreateSpec<'_>,
) -> PlatformResult<NativeHandle> {
    let h_instance = instance()?;
    let hwnd = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE(spec.ex_style),
            &HSTRING::from(spec.class_name),
            &HSTRING::from(spec.title),
            WINDOW_STYLE(spec.style),
            spec.pos.x,
            spec.pos.y,
            spec.size.cx,
            spec.size.cy,
            spec.parent.map(NativeHandle::as_hwnd),
            Some(HMENU(spec.menu as *mut c_void)),
            Some(h_instance),
            Some(Rc::as_ptr(host) as *const c_void),
        )
    }
    .map_err(|e| {
        log::error!("Platform: CreateWindowExW failed for class '{}': {e:?}", spec.class_name);
        PlatformError::from(e)
    })?;
    Ok(NativeHandle::from(hwnd))
}

/// Init parameter handed to the dialog creation calls.
pub(crate) fn dialog_init_param(host: &Rc<HostCore>) -> LPARAM {
    LPARAM(Rc::as_ptr(host) as isize)
}

/// Stores one strong reference to the host behind `ptr` in the window.
unsafe fn attach(hwnd: HWND, ptr: *const HostCore) {
    unsafe {
        Rc::increment_strong_count(ptr);
        SetWindowLongPtrW(hwnd, GWLP_USERDATA, ptr as isize);
        if let Err(e) = (*ptr).on_native_created(NativeHandle::from(hwnd)) {
            log::error!("Platform: host rejected its native handle {:?}: {e}", hwnd);
        }
    }
}

/// Temporary strong reference to the host stored in `hwnd`, if any.
unsafe fn attached(hwnd: HWND) -> Option<Rc<HostCore>> {
    let ptr = unsafe { GetWindowLongPtrW(hwnd, GWLP_USERDATA) } as *const HostCore;
    if ptr.is_null() {
        return None;
    }
    unsafe {
        Rc::increment_strong_count(ptr);
        Some(Rc::from_raw(ptr))
    }
}

/// Reports teardown and releases the reference stored by `attach`.
unsafe fn detach(hwnd: HWND, host: &Rc<HostCore>) {
    unsafe {
        SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0);
        host.on_native_destroyed();
        drop(Rc::from_raw(Rc::as_ptr(host)));
    }
}

/*
 * Window procedure of every window host. Unhandled messages, and messages
 * arriving before `WM_NCCREATE`, go to `DefWindowProcW`.
 */
pub(crate) unsafe extern "system" fn hosted_window_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    if msg == WM_NCCREATE {
        let create_struct = unsafe { &*(lparam.0 as *const CREATESTRUCTW) };
        let ptr = create_struct.lpCreateParams as *const HostCore;
        if !ptr.is_null() {
            unsafe { attach(hwnd, ptr) };
        }
    }

    let Some(host) = (unsafe { attached(hwnd) }) else {
        return unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) };
    };

    let result = match unsafe { host.dispatch(msg, RawEvent::new(wparam.0, lparam.0)) } {
        Dispatched::Handled(value) => LRESULT(value),
        Dispatched::Unhandled => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    };

    if msg == WM_NCDESTROY {
        unsafe { detach(hwnd, &host) };
    }
    result
}

/*
 * Dialog procedure of every dialog host. Messages before `WM_INITDIALOG` and
 * unhandled messages return FALSE so the dialog manager applies its default.
 */
pub(crate) unsafe extern "system" fn hosted_dialog_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> isize {
    if msg == WM_INITDIALOG {
        let ptr = lparam.0 as *const HostCore;
        if !ptr.is_null() {
            unsafe { attach(hwnd, ptr) };
        }
    }

    let Some(host) = (unsafe { attached(hwnd) }) else {
        return 0;
    };

    let result = unsafe { host.dispatch(msg, RawEvent::new(wparam.0, lparam.0)) }.result_or(0);

    if msg == WM_NCDESTROY {
        unsafe { detach(hwnd, &host) };
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_resource_encodes_the_id_in_the_pointer() {
        assert_eq!(int_resource(101).0 as usize, 101);
    }

    #[test]
    fn system_dpi_is_positive() {
        assert!(system_dpi() > 0);
    }

    /// In-memory `DLGTEMPLATE` with one static control (id 100), as dwords so
    /// the template and its item stay aligned.
    fn template_with_one_static() -> Vec<u32> {
        const WS_POPUP: u32 = 0x8000_0000;
        const WS_CHILD_VISIBLE: u32 = 0x5000_0000;
        let mut words: Vec<u16> = Vec::new();
        let push32 = |words: &mut Vec<u16>, v: u32| {
            words.push(v as u16);
            words.push((v >> 16) as u16);
        };
        push32(&mut words, WS_POPUP);
        push32(&mut words, 0);
        words.extend_from_slice(&[1, 0, 0, 100, 50]);
        words.extend_from_slice(&[0, 0, 0]);
        assert_eq!(words.len() % 2, 0);

        push32(&mut words, WS_CHILD_VISIBLE);
        push32(&mut words, 0);
        words.extend_from_slice(&[5, 5, 50, 10, 100]);
        words.extend_from_slice(&[0xFFFF, 0x0082, 0, 0]);
        if words.len() % 2 != 0 {
            words.push(0);
        }
        words
            .chunks(2)
            .map(|pair| pair[0] as u32 | (pair[1] as u32) << 16)
            .collect()
    }

    #[test]
    fn dialog_host_goes_live_and_themed_before_its_init_handler() {
        use crate::host::HostState;
        use crate::theme::UiTheme;
        use crate::types::{HostFlavor, HostRole};
        use std::cell::Cell;
        use std::sync::Arc;
        use windows::Win32::UI::WindowsAndMessaging::{
            CreateDialogIndirectParamW, DLGTEMPLATE, DestroyWindow, GetDlgItem, SendMessageW,
            WM_GETFONT,
        };

        let theme = Arc::new(UiTheme::system().unwrap());
        let font = theme.font().raw();
        let host = Rc::new(HostCore::new(HostFlavor::Dialog, HostRole::Modeless).with_theme(theme));
        let init_ok = Rc::new(Cell::new(false));
        let own_font = Rc::new(Cell::new(NativeHandle::NULL));

        let received = Rc::clone(&own_font);
        host.on().wm_set_font(move |p| received.set(p.font())).unwrap();
        let own = Rc::clone(&own_font);
        let weak = Rc::downgrade(&host);
        let ok = Rc::clone(&init_ok);
        host.on()
            .wm_init_dialog(move |_| {
                let host = weak.upgrade().unwrap();
                let dialog = host.handle().as_hwnd();
                let static_font = unsafe {
                    let child = GetDlgItem(Some(dialog), 100).unwrap();
                    SendMessageW(child, WM_GETFONT, None, None).0
                };
                ok.set(
                    host.state() == HostState::Live
                        && static_font == font
                        && own.get().raw() == font,
                );
                true
            })
            .unwrap();

        let template = template_with_one_static();
        host.begin_native_creation().unwrap();
        let dialog = unsafe {
            CreateDialogIndirectParamW(
                Some(instance().unwrap()),
                template.as_ptr() as *const DLGTEMPLATE,
                None,
                Some(hosted_dialog_proc),
                dialog_init_param(&host),
            )
        }
        .unwrap();
        assert!(init_ok.get());
        assert_eq!(host.handle(), NativeHandle::from(dialog));
        assert_eq!(Rc::strong_count(&host), 2);

        unsafe { DestroyWindow(dialog) }.unwrap();
        assert_eq!(host.state(), HostState::TornDown);
        assert_eq!(Rc::strong_count(&host), 1);
    }
}
