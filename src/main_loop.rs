/*
 * Message-loop plumbing. The portable half records loop-exit requests (so
 * failure containment and teardown can be observed in tests) and keeps the
 * list of modeless children a main host services. The Windows half holds the
 * two `GetMessageW` pumps: the main one, which routes keyboard navigation to
 * modeless dialogs and accelerators before dispatching, and the nested one
 * of a modal window, which lasts as long as that window.
 */

use crate::types::NativeHandle;
use std::cell::{Cell, RefCell};

thread_local! {
    static EXIT_REQUEST: Cell<Option<i32>> = const { Cell::new(None) };
}

/// Asks the current thread's message loop to finish with `code`.
///
/// On Windows this posts `WM_QUIT`; on every platform the request is also
/// recorded and can be read back with [`take_exit_request`].
pub fn request_exit(code: i32) {
    log::debug!("MainLoop: exit requested with code {code}.");
    EXIT_REQUEST.with(|slot| slot.set(Some(code)));
    #[cfg(target_os = "windows")]
    unsafe {
        windows::Win32::UI::WindowsAndMessaging::PostQuitMessage(code);
    }
}

pub fn exit_requested() -> bool {
    EXIT_REQUEST.with(|slot| slot.get().is_some())
}

/// Returns and clears the pending exit request of the current thread.
pub fn take_exit_request() -> Option<i32> {
    EXIT_REQUEST.with(|slot| slot.take())
}

/// Live modeless children of a main host, in creation order.
#[derive(Debug, Default)]
pub struct ModelessChildren {
    children: RefCell<Vec<NativeHandle>>,
}

impl ModelessChildren {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the child was already tracked or is null.
    pub fn add(&self, child: NativeHandle) -> bool {
        if child.is_null() {
            log::warn!("MainLoop: refusing to track a null modeless child.");
            return false;
        }
        let mut children = self.children.borrow_mut();
        if children.contains(&child) {
            return false;
        }
        children.push(child);
        log::debug!(
            "MainLoop: tracking modeless child {:#x} ({} total).",
            child.raw(),
            children.len()
        );
        true
    }

    pub fn remove(&self, child: NativeHandle) -> bool {
        let mut children = self.children.borrow_mut();
        let before = children.len();
        children.retain(|c| *c != child);
        let removed = children.len() != before;
        if removed {
            log::debug!("MainLoop: modeless child {:#x} released.", child.raw());
        }
        removed
    }

    pub fn contains(&self, child: NativeHandle) -> bool {
        self.children.borrow().contains(&child)
    }

    pub fn snapshot(&self) -> Vec<NativeHandle> {
        self.children.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.children.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.borrow().is_empty()
    }
}

#[cfg(target_os = "windows")]
pub(crate) use native::run;

#[cfg(target_os = "windows")]
mod native {
    use super::ModelessChildren;
    use crate::error::{PlatformError, Result as PlatformResult};
    use crate::host::{HostCore, HostState};
    use crate::types::NativeHandle;
    use windows::Win32::Foundation::GetLastError;
    use windows::Win32::UI::WindowsAndMessaging::{
        DispatchMessageW, GA_ROOT, GetAncestor, GetMessageW, HACCEL, IsDialogMessageW, MSG,
        TranslateAcceleratorW, TranslateMessage,
    };

    fn get_message(msg: &mut MSG) -> PlatformResult<bool> {
        let status = unsafe { GetMessageW(msg, None, 0, 0) };
        if status.0 == -1 {
            let error = unsafe { GetLastError() };
            log::error!("MainLoop: GetMessageW failed: {error:?}");
            return Err(PlatformError::OperationFailed(format!(
                "GetMessageW failed: {error:?}"
            )));
        }
        Ok(status.0 != 0)
    }

    /// What the pump needs to know about the main host.
    pub(crate) struct LoopTargets<'a> {
        pub main: NativeHandle,
        pub main_is_dialog: bool,
        pub accelerators: Option<NativeHandle>,
        pub children: &'a ModelessChildren,
    }

    /*
     * Pulls messages until WM_QUIT and returns its exit code. Each message is
     * first offered to the modeless children (keyboard navigation), then to the
     * accelerator table, then to the main dialog's navigation, and only then
     * translated and dispatched.
     */
    pub(crate) fn run(targets: LoopTargets<'_>) -> PlatformResult<i32> {
        super::take_exit_request();
        let mut msg = MSG::default();
        while get_message(&mut msg)? {
            if is_modeless_child_message(targets.children, &msg) {
                continue;
            }

            if let Some(accel) = targets.accelerators
                && unsafe {
                    TranslateAcceleratorW(
                        targets.main.as_hwnd(),
                        HACCEL(accel.raw() as *mut _),
                        &msg,
                    )
                } != 0
            {
                continue;
            }

            if targets.main_is_dialog
                && unsafe { IsDialogMessageW(targets.main.as_hwnd(), &msg) }.as_bool()
            {
                continue;
            }

            unsafe {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }
        let code = msg.wParam.0 as i32;
        log::debug!("MainLoop: WM_QUIT received, exit code {code}.");
        Ok(code)
    }

    /// Nested pump of a modal window.
    pub(crate) struct ModalLoop<'a> {
        pub host: &'a HostCore,
    }

    impl ModalLoop<'_> {
        /*
         * Runs while the modal host is live. Keyboard navigation goes to the
         * top-level window the message is for. A WM_QUIT ends the modal and is
         * posted again so the outer loop sees it too.
         */
        pub(crate) fn run(&self) -> PlatformResult<()> {
            let mut msg = MSG::default();
            while self.host.state() == HostState::Live {
                if !get_message(&mut msg)? {
                    let code = msg.wParam.0 as i32;
                    log::debug!("MainLoop: WM_QUIT inside a modal loop, forwarding {code}.");
                    super::request_exit(code);
                    break;
                }

                let top = unsafe { GetAncestor(msg.hwnd, GA_ROOT) };
                if !top.is_invalid() && unsafe { IsDialogMessageW(top, &msg) }.as_bool() {
                    continue;
                }
                unsafe {
                    let _ = TranslateMessage(&msg);
                    DispatchMessageW(&msg);
                }
            }
            Ok(())
        }
    }

    fn is_modeless_child_message(children: &ModelessChildren, msg: &MSG) -> bool {
        children
            .snapshot()
            .into_iter()
            .any(|child| unsafe { IsDialogMessageW(child.as_hwnd(), msg) }.as_bool())
    }
}

#[cfg(target_os = "windows")]
pub(crate) use native::{LoopTargets, ModalLoop};
