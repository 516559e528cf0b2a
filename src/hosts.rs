/*
 * Concrete Win32 hosts. Each one wraps a shared `HostCore`, installs the
 * built-in fallback handlers of its role, creates the native object and, for
 * main hosts, runs the message loop.
 *
 *   WindowMain      top-level window, owns the loop
 *   WindowModal     popup that disables its parent and runs a nested loop
 *   WindowModeless  owned tool window, serviced by its parent's loop
 *   WindowControl   custom child window drawn by the application
 *   DialogMain      dialog from a resource template, owns the loop
 *   DialogModal     DialogBoxParamW wrapper
 *   DialogModeless  CreateDialogParamW wrapper, serviced by its parent's loop
 *   DialogControl   child control built from a dialog template
 *
 * Fallbacks are installed right before native creation and only for messages
 * the application left unregistered. Window sizes, and control positions,
 * are scaled from 96 DPI to the system DPI at creation.
 */

use crate::constants::{IDCANCEL, WM_ACTIVATE, WM_CLOSE, WM_NCPAINT, WM_SETFOCUS};
use crate::error::{PlatformError, Result as PlatformResult};
use crate::host::{HostCore, HostState};
use crate::main_loop::{self, LoopTargets, ModalLoop};
use crate::params::wm::WmActivate;
use crate::proxy::EventProxy;
use crate::registry::Handler;
use crate::setup::{
    ControlSetup, DialogSetup, WindowSetup, centered_over, modeless_origin, scale_point,
    scale_size,
};
use crate::theme::UiTheme;
use crate::types::{HostFlavor, HostRole, MessageId, NativeHandle, Point, Rect, Size};
use crate::ui_work::UiWork;
use crate::window_common::{
    self, ClassSpec, CreateSpec, create_hosted_window, dialog_init_param, hosted_dialog_proc,
    int_resource, paint_themed_border, register_window_class, system_dpi, window_rect,
};
use std::cell::Cell;
use std::rc::{Rc, Weak};
use std::sync::{Arc, OnceLock};
use windows::Win32::Foundation::{GetLastError, LPARAM, WPARAM};
use windows::Win32::Graphics::Gdi::UpdateWindow;
use windows::Win32::UI::Controls::{
    ICC_DATE_CLASSES, ICC_STANDARD_CLASSES, ICC_WIN95_CLASSES, INITCOMMONCONTROLSEX,
    InitCommonControlsEx,
};
use windows::Win32::UI::Input::KeyboardAndMouse::{EnableWindow, GetFocus, SetFocus};
use windows::Win32::UI::WindowsAndMessaging::{
    CreateDialogParamW, DestroyWindow, DialogBoxParamW, EndDialog, GWLP_ID, GetDlgCtrlID,
    GetNextDlgTabItem, GetSystemMetrics, ICON_BIG, ICON_SMALL, IsChild, LoadIconW, SM_CXSCREEN,
    SM_CYSCREEN, SW_SHOW, SHOW_WINDOW_CMD, SWP_NOSIZE, SWP_NOZORDER, SendMessageW,
    SetWindowLongPtrW, SetWindowPos, ShowWindow, WM_SETICON,
};

/// Registers the common-control window classes once per process.
fn init_common_controls() -> PlatformResult<()> {
    static INIT: OnceLock<bool> = OnceLock::new();
    let ok = *INIT.get_or_init(|| {
        let icc = INITCOMMONCONTROLSEX {
            dwSize: std::mem::size_of::<INITCOMMONCONTROLSEX>() as u32,
            dwICC: ICC_WIN95_CLASSES | ICC_DATE_CLASSES | ICC_STANDARD_CLASSES,
        };
        let ok = unsafe { InitCommonControlsEx(&icc) }.as_bool();
        if ok {
            log::debug!("Platform: common controls initialized.");
        } else {
            log::error!("Platform: InitCommonControlsEx failed.");
        }
        ok
    });
    if ok {
        Ok(())
    } else {
        Err(PlatformError::InitializationFailed(
            "InitCommonControlsEx failed".into(),
        ))
    }
}

fn require_parent(parent: NativeHandle, what: &str) -> PlatformResult<NativeHandle> {
    parent
        .non_null()
        .ok_or_else(|| PlatformError::InvalidHandle(format!("{what} needs a parent window")))
}

/// Handler that runs `f` with the host's native handle and returns the
/// flavor's handled sentinel.
fn with_handle(host: &Rc<HostCore>, f: impl Fn(NativeHandle) + 'static) -> Handler {
    let weak: Weak<HostCore> = Rc::downgrade(host);
    let handled = host.flavor().handled_sentinel();
    Handler::new(move |_| {
        if let Some(host) = weak.upgrade()
            && let Some(handle) = host.handle().non_null()
        {
            f(handle);
        }
        handled
    })
}

fn install_close_by_destroy(host: &Rc<HostCore>) {
    host.install_fallback(
        MessageId(WM_CLOSE),
        with_handle(host, |handle| unsafe {
            if let Err(e) = DestroyWindow(handle.as_hwnd()) {
                log::error!("Platform: DestroyWindow on WM_CLOSE failed: {e:?}");
            }
        }),
    );
}

/// When the window itself receives the focus it hands it to the first tab
/// stop.
fn install_focus_to_first_tab_stop(host: &Rc<HostCore>) {
    host.install_fallback(
        MessageId(WM_SETFOCUS),
        with_handle(host, |handle| unsafe {
            let hwnd = handle.as_hwnd();
            if GetFocus() == hwnd
                && let Ok(first) = GetNextDlgTabItem(hwnd, None, false)
            {
                let _ = SetFocus(Some(first));
            }
        }),
    );
}

/*
 * A main window remembers which child had the focus when it is deactivated
 * and gives it back on reactivation.
 */
fn install_focus_keeping(host: &Rc<HostCore>) {
    let previous_focus = Rc::new(Cell::new(NativeHandle::NULL));
    let weak = Rc::downgrade(host);
    host.install_fallback(
        MessageId(WM_ACTIVATE),
        Handler::new(move |raw| {
            let p = unsafe { WmActivate::from_raw(raw) };
            let Some(host) = weak.upgrade() else {
                return 0;
            };
            if p.is_minimized() {
                return 0;
            }
            let hwnd = host.handle().as_hwnd();
            unsafe {
                if p.is_inactive() {
                    let focused = GetFocus();
                    if !focused.is_invalid() && IsChild(hwnd, focused).as_bool() {
                        previous_focus.set(NativeHandle::from(focused));
                    }
                } else if let Some(child) = previous_focus.get().non_null() {
                    let _ = SetFocus(Some(child.as_hwnd()));
                }
            }
            0
        }),
    );
    install_focus_to_first_tab_stop(host);
}

fn show(handle: NativeHandle, cmd: i32) {
    unsafe {
        let _ = ShowWindow(handle.as_hwnd(), SHOW_WINDOW_CMD(cmd));
        let _ = UpdateWindow(handle.as_hwnd());
    }
}

fn run_loop(
    host: &HostCore,
    main_is_dialog: bool,
    accelerators: Option<NativeHandle>,
) -> PlatformResult<i32> {
    main_loop::run(LoopTargets {
        main: host.handle(),
        main_is_dialog,
        accelerators,
        children: host.modeless_children(),
    })
}

macro_rules! host_accessors {
    ($host:ty) => {
        impl $host {
            /// Handler registration; fails once native creation was requested.
            pub fn on(&self) -> EventProxy<'_> {
                self.core.on()
            }

            /// Native handle; null before creation and after teardown.
            pub fn handle(&self) -> NativeHandle {
                self.core.handle()
            }

            pub fn core(&self) -> &HostCore {
                &self.core
            }

            pub fn ui_work(&self) -> UiWork {
                self.core.ui_work()
            }

            /// Runs `work` on a detached background thread.
            pub fn run_in_background<W>(&self, work: W) -> PlatformResult<()>
            where
                W: FnOnce(UiWork) + Send + 'static,
            {
                self.core.run_in_background(work)
            }
        }
    };
}

/* ------------------------------------------------------------------------ */

#[derive(Debug)]
pub struct WindowMain {
    core: Rc<HostCore>,
    setup: WindowSetup,
}

host_accessors!(WindowMain);

impl WindowMain {
    pub fn new(setup: WindowSetup) -> Self {
        WindowMain {
            core: Rc::new(HostCore::new(HostFlavor::Window, HostRole::Main)),
            setup,
        }
    }

    pub fn setup(&self) -> &WindowSetup {
        &self.setup
    }

    /// Creates the window, shows it with `show_cmd` (`SW_*`) and runs the
    /// message loop until the window is destroyed. Returns the loop's exit
    /// code.
    pub fn run_as_main(&self, show_cmd: i32) -> PlatformResult<i32> {
        init_common_controls()?;
        install_focus_keeping(&self.core);

        let class_name = self.setup.effective_class_name();
        register_window_class(&ClassSpec {
            name: &class_name,
            style: self.setup.class_style,
            icon_id: self.setup.icon_id,
            cursor: self.setup.effective_cursor(),
            background: self.setup.background,
        })?;

        self.core.begin_native_creation()?;
        let size = scale_size(self.setup.size, system_dpi());
        let pos = self.setup.pos.unwrap_or_else(|| {
            let screen = unsafe {
                Rect {
                    left: 0,
                    top: 0,
                    right: GetSystemMetrics(SM_CXSCREEN),
                    bottom: GetSystemMetrics(SM_CYSCREEN),
                }
            };
            centered_over(screen, size)
        });
        let handle = create_hosted_window(
            &self.core,
            &CreateSpec {
                class_name: &class_name,
                title: &self.setup.title,
                style: self.setup.style,
                ex_style: self.setup.ex_style,
                pos,
                size,
                parent: None,
                menu: self.setup.menu.map_or(0, NativeHandle::raw),
            },
        )?;
        show(handle, show_cmd);
        run_loop(&self.core, false, self.setup.accelerators)
    }
}

/* ------------------------------------------------------------------------ */

/*
 * Modal popup window. `show` disables the parent, creates the window centered
 * over it and pumps a nested loop until the window is destroyed. The default
 * WM_CLOSE re-enables the parent before destroying the window, then gives
 * the focus back to whatever had it before.
 */
#[derive(Debug)]
pub struct WindowModal {
    core: Rc<HostCore>,
    setup: WindowSetup,
}

host_accessors!(WindowModal);

impl WindowModal {
    pub fn new(setup: WindowSetup) -> Self {
        WindowModal {
            core: Rc::new(HostCore::new(HostFlavor::Window, HostRole::Modal)),
            setup,
        }
    }

    pub fn setup(&self) -> &WindowSetup {
        &self.setup
    }

    /// Blocks until the window is closed.
    pub fn show(&self, parent: NativeHandle) -> PlatformResult<()> {
        let parent = require_parent(parent, "a modal window")?;
        let previous_focus = NativeHandle::from(unsafe { GetFocus() });
        install_focus_to_first_tab_stop(&self.core);
        self.core.install_fallback(
            MessageId(WM_CLOSE),
            with_handle(&self.core, move |handle| unsafe {
                let _ = EnableWindow(parent.as_hwnd(), true);
                if let Err(e) = DestroyWindow(handle.as_hwnd()) {
                    log::error!("Platform: DestroyWindow on modal WM_CLOSE failed: {e:?}");
                }
                if let Some(focus) = previous_focus.non_null() {
                    let _ = SetFocus(Some(focus.as_hwnd()));
                }
            }),
        );

        let class_name = self.setup.effective_class_name();
        register_window_class(&ClassSpec {
            name: &class_name,
            style: self.setup.class_style,
            icon_id: self.setup.icon_id,
            cursor: self.setup.effective_cursor(),
            background: self.setup.background,
        })?;

        let size = scale_size(self.setup.size, system_dpi());
        let pos = match self.setup.pos {
            Some(pos) => pos,
            None => centered_over(window_rect(parent)?, size),
        };
        self.core.begin_native_creation()?;
        unsafe {
            let _ = EnableWindow(parent.as_hwnd(), false);
        }
        let created = create_hosted_window(
            &self.core,
            &CreateSpec {
                class_name: &class_name,
                title: &self.setup.title,
                style: self.setup.style,
                ex_style: self.setup.ex_style,
                pos,
                size,
                parent: Some(parent),
                menu: 0,
            },
        );
        let outcome = created.and_then(|_| ModalLoop { host: &self.core }.run());
        // Also covers a modal destroyed without WM_CLOSE, or never created.
        unsafe {
            let _ = EnableWindow(parent.as_hwnd(), true);
        }
        outcome
    }
}

/* ------------------------------------------------------------------------ */

#[derive(Debug)]
pub struct WindowModeless {
    core: Rc<HostCore>,
    setup: WindowSetup,
}

host_accessors!(WindowModeless);

impl WindowModeless {
    pub fn new(setup: WindowSetup) -> Self {
        WindowModeless {
            core: Rc::new(HostCore::new(HostFlavor::Window, HostRole::Modeless)),
            setup,
        }
    }

    /// Creates the window owned by `parent`, which starts servicing it in its
    /// message loop.
    pub fn create(&self, parent: NativeHandle) -> PlatformResult<()> {
        let parent = require_parent(parent, "a modeless window")?;
        install_close_by_destroy(&self.core);
        self.core.set_modeless_parent(parent)?;

        let class_name = self.setup.effective_class_name();
        register_window_class(&ClassSpec {
            name: &class_name,
            style: self.setup.class_style,
            icon_id: self.setup.icon_id,
            cursor: self.setup.effective_cursor(),
            background: self.setup.background,
        })?;

        let size = scale_size(self.setup.size, system_dpi());
        let pos = match self.setup.pos {
            Some(pos) => pos,
            None => modeless_origin(window_rect(parent)?, size),
        };
        self.core.begin_native_creation()?;
        create_hosted_window(
            &self.core,
            &CreateSpec {
                class_name: &class_name,
                title: &self.setup.title,
                style: self.setup.style,
                ex_style: self.setup.ex_style,
                pos,
                size,
                parent: Some(parent),
                menu: 0,
            },
        )?;
        Ok(())
    }
}

/* ------------------------------------------------------------------------ */

#[derive(Debug)]
pub struct WindowControl {
    core: Rc<HostCore>,
    setup: ControlSetup,
}

host_accessors!(WindowControl);

impl WindowControl {
    pub fn new(setup: ControlSetup) -> Self {
        WindowControl {
            core: Rc::new(HostCore::new(HostFlavor::Window, HostRole::Control)),
            setup,
        }
    }

    /// Creates the control as a child of `parent` with the given control id.
    pub fn create(&self, parent: NativeHandle, control_id: u16) -> PlatformResult<()> {
        let parent = require_parent(parent, "a control")?;
        self.setup.validate()?;

        let class_name = self.setup.effective_class_name();
        register_window_class(&ClassSpec {
            name: &class_name,
            style: self.setup.class_style,
            icon_id: 0,
            cursor: self.setup.effective_cursor(),
            background: self.setup.background,
        })?;

        let dpi = system_dpi();
        self.core.begin_native_creation()?;
        create_hosted_window(
            &self.core,
            &CreateSpec {
                class_name: &class_name,
                title: "",
                style: self.setup.style,
                ex_style: self.setup.ex_style,
                pos: scale_point(self.setup.pos, dpi),
                size: scale_size(self.setup.size, dpi),
                parent: Some(parent),
                menu: control_id as isize,
            },
        )?;
        Ok(())
    }

    pub fn control_id(&self) -> u16 {
        if self.handle().is_null() {
            return 0;
        }
        unsafe { GetDlgCtrlID(self.handle().as_hwnd()) as u16 }
    }
}

/* ------------------------------------------------------------------------ */

fn dialog_core(role: HostRole, theme: Option<Arc<UiTheme>>) -> Rc<HostCore> {
    let core = HostCore::new(HostFlavor::Dialog, role);
    Rc::new(match theme {
        Some(theme) => core.with_theme(theme),
        None => core,
    })
}

fn create_dialog(
    core: &Rc<HostCore>,
    setup: &DialogSetup,
    parent: Option<NativeHandle>,
) -> PlatformResult<NativeHandle> {
    let hwnd = unsafe {
        CreateDialogParamW(
            Some(window_common::instance()?),
            int_resource(setup.dialog_id),
            parent.map(NativeHandle::as_hwnd),
            Some(hosted_dialog_proc),
            dialog_init_param(core),
        )
    }
    .map_err(|e| {
        log::error!(
            "Platform: CreateDialogParamW failed for template {}: {e:?}",
            setup.dialog_id
        );
        PlatformError::from(e)
    })?;
    Ok(NativeHandle::from(hwnd))
}

#[derive(Debug)]
pub struct DialogMain {
    core: Rc<HostCore>,
    setup: DialogSetup,
}

host_accessors!(DialogMain);

impl DialogMain {
    /// `theme` is applied to every control of the template at creation.
    pub fn new(setup: DialogSetup, theme: Option<Arc<UiTheme>>) -> Self {
        DialogMain {
            core: dialog_core(HostRole::Main, theme),
            setup,
        }
    }

    pub fn run_as_main(&self, show_cmd: i32) -> PlatformResult<i32> {
        self.setup.validate()?;
        init_common_controls()?;
        install_close_by_destroy(&self.core);

        self.core.begin_native_creation()?;
        let handle = create_dialog(&self.core, &self.setup, None)?;
        if self.setup.icon_id != 0 {
            self.set_icon(handle)?;
        }
        show(handle, show_cmd);
        run_loop(&self.core, true, self.setup.accelerators)
    }

    fn set_icon(&self, handle: NativeHandle) -> PlatformResult<()> {
        let icon = unsafe {
            LoadIconW(
                Some(window_common::instance()?),
                int_resource(self.setup.icon_id),
            )
        }?;
        for size in [ICON_SMALL, ICON_BIG] {
            unsafe {
                SendMessageW(
                    handle.as_hwnd(),
                    WM_SETICON,
                    Some(WPARAM(size as usize)),
                    Some(LPARAM(icon.0 as isize)),
                );
            }
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct DialogModal {
    core: Rc<HostCore>,
    setup: DialogSetup,
}

host_accessors!(DialogModal);

impl DialogModal {
    pub fn new(setup: DialogSetup, theme: Option<Arc<UiTheme>>) -> Self {
        DialogModal {
            core: dialog_core(HostRole::Modal, theme),
            setup,
        }
    }

    /// Shows the dialog and blocks until it ends; returns the `EndDialog`
    /// result (`IDCANCEL` when closed by the user).
    pub fn show(&self, parent: NativeHandle) -> PlatformResult<isize> {
        let parent = require_parent(parent, "a modal dialog")?;
        self.setup.validate()?;
        self.core.install_fallback(
            MessageId(WM_CLOSE),
            with_handle(&self.core, |handle| unsafe {
                if let Err(e) = EndDialog(handle.as_hwnd(), IDCANCEL) {
                    log::error!("Platform: EndDialog on WM_CLOSE failed: {e:?}");
                }
            }),
        );

        self.core.begin_native_creation()?;
        let result = unsafe {
            DialogBoxParamW(
                Some(window_common::instance()?),
                int_resource(self.setup.dialog_id),
                Some(parent.as_hwnd()),
                Some(hosted_dialog_proc),
                dialog_init_param(&self.core),
            )
        };
        // 0 without a creation callback means the parent was rejected.
        let never_created = self.core.state() == HostState::NativeCreationRequested;
        if result == -1 || (result == 0 && never_created) {
            let error = unsafe { GetLastError() };
            log::error!(
                "Platform: DialogBoxParamW failed for template {}: {error:?}",
                self.setup.dialog_id
            );
            return Err(PlatformError::OperationFailed(format!(
                "DialogBoxParamW failed for template {}: {error:?}",
                self.setup.dialog_id
            )));
        }
        Ok(result)
    }
}

#[derive(Debug)]
pub struct DialogModeless {
    core: Rc<HostCore>,
    setup: DialogSetup,
}

host_accessors!(DialogModeless);

impl DialogModeless {
    pub fn new(setup: DialogSetup, theme: Option<Arc<UiTheme>>) -> Self {
        DialogModeless {
            core: dialog_core(HostRole::Modeless, theme),
            setup,
        }
    }

    /// Creates and shows the dialog; `parent`'s loop starts servicing it.
    pub fn create(&self, parent: NativeHandle) -> PlatformResult<()> {
        let parent = require_parent(parent, "a modeless dialog")?;
        self.setup.validate()?;
        install_close_by_destroy(&self.core);
        self.core.set_modeless_parent(parent)?;

        self.core.begin_native_creation()?;
        let handle = create_dialog(&self.core, &self.setup, Some(parent))?;
        show(handle, SW_SHOW.0);
        Ok(())
    }
}

/*
 * Custom control built from a dialog template (child style, control flag).
 * The default WM_NCPAINT repaints a client edge with the themed border.
 */
#[derive(Debug)]
pub struct DialogControl {
    core: Rc<HostCore>,
    setup: DialogSetup,
}

host_accessors!(DialogControl);

impl DialogControl {
    pub fn new(setup: DialogSetup, theme: Option<Arc<UiTheme>>) -> Self {
        DialogControl {
            core: dialog_core(HostRole::Control, theme),
            setup,
        }
    }

    /// Creates the control inside `parent`, normally while the parent
    /// handles WM_CREATE or WM_INITDIALOG. `size` of `None` keeps the size of
    /// the template.
    pub fn create(
        &self,
        parent: NativeHandle,
        control_id: u16,
        pos: Point,
        size: Option<Size>,
    ) -> PlatformResult<()> {
        let parent = require_parent(parent, "a dialog control")?;
        self.setup.validate()?;
        let weak = Rc::downgrade(&self.core);
        self.core.install_fallback(
            MessageId(WM_NCPAINT),
            Handler::new(move |raw| {
                if let Some(host) = weak.upgrade()
                    && let Some(handle) = host.handle().non_null()
                {
                    unsafe {
                        paint_themed_border(
                            handle.as_hwnd(),
                            WPARAM(raw.wparam),
                            LPARAM(raw.lparam),
                        )
                    };
                }
                HostFlavor::Dialog.handled_sentinel()
            }),
        );

        self.core.begin_native_creation()?;
        let handle = create_dialog(&self.core, &self.setup, Some(parent))?;
        let hwnd = handle.as_hwnd();
        let size = size.unwrap_or_default();
        let mut flags = SWP_NOZORDER;
        if size == Size::default() {
            flags |= SWP_NOSIZE;
        }
        unsafe {
            SetWindowLongPtrW(hwnd, GWLP_ID, control_id as isize);
            SetWindowPos(hwnd, None, pos.x, pos.y, size.cx, size.cy, flags)?;
        }
        Ok(())
    }

    pub fn control_id(&self) -> u16 {
        if self.handle().is_null() {
            return 0;
        }
        unsafe { GetDlgCtrlID(self.handle().as_hwnd()) as u16 }
    }
}
