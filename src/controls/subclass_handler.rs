/*
 * Subclassing of existing native controls. A `Subclass` collects plain-message
 * handlers, then attaches itself to a control through the common-controls
 * subclass chain (`SetWindowSubclass`), carrying its core in the reference
 * data. The control's own window data and procedure are never touched, so a
 * subclassed control may itself be a hosted window, and other subclasses may
 * come and go around ours. Handled messages return the handler's result;
 * everything else continues down the chain through `DefSubclassProc`. At
 * `WM_NCDESTROY` the subclass removes itself.
 *
 * Commands and notifications are delivered to the control's parent, not to
 * the control, so registering them here is rejected. Registration is also
 * rejected once the subclass is installed.
 */

use crate::error::{PlatformError, Result as PlatformResult};
use crate::proxy::{EventProxy, HandlerSink};
use crate::registry::Handler;
use crate::router::{Dispatched, EventKey, MessageRouter};
use crate::types::{CommandId, HostFlavor, MessageId, NativeHandle, NotifyKey, RawEvent};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug)]
pub(crate) struct SubclassCore {
    router: RefCell<MessageRouter>,
    target: Cell<NativeHandle>,
}

impl SubclassCore {
    fn new() -> Self {
        SubclassCore {
            router: RefCell::new(MessageRouter::new(HostFlavor::Window)),
            target: Cell::new(NativeHandle::NULL),
        }
    }

    fn is_bound(&self) -> bool {
        !self.target.get().is_null()
    }

    /// Marks the subclass as installed on `control`.
    pub(crate) fn bind(&self, control: NativeHandle) -> PlatformResult<()> {
        if control.is_null() {
            return Err(PlatformError::InvalidHandle(
                "cannot subclass a null control".into(),
            ));
        }
        if self.is_bound() {
            return Err(PlatformError::InvalidState(format!(
                "subclass already installed on {:#x}",
                self.target.get().raw()
            )));
        }
        self.target.set(control);
        log::debug!(
            "Subclass: bound to {:#x} with {} handlers.",
            control.raw(),
            self.router.borrow().len()
        );
        Ok(())
    }

    /// Detaches from the control; returns the previous target.
    pub(crate) fn unbind(&self) -> NativeHandle {
        let previous = self.target.replace(NativeHandle::NULL);
        if !previous.is_null() {
            log::debug!("Subclass: detached from {:#x}.", previous.raw());
        }
        previous
    }

    /// # Safety
    /// Same contract as `MessageRouter::dispatch`.
    pub(crate) unsafe fn dispatch(&self, msg: u32, raw: RawEvent) -> Dispatched {
        if !self.is_bound() {
            return Dispatched::Unhandled;
        }
        unsafe { self.router.borrow().dispatch(msg, raw) }
    }
}

impl HandlerSink for SubclassCore {
    fn flavor(&self) -> HostFlavor {
        HostFlavor::Window
    }

    fn register_message(&self, id: MessageId, handler: Handler) -> PlatformResult<()> {
        if self.is_bound() {
            log::error!("Subclass: registration for {id:?} after installation.");
            return Err(PlatformError::InvalidState(
                "cannot register a subclass handler after installation".into(),
            ));
        }
        self.router.borrow_mut().add(EventKey::Message(id), handler);
        Ok(())
    }

    fn register_command(&self, id: CommandId, _handler: Handler) -> PlatformResult<()> {
        Err(PlatformError::InvalidState(format!(
            "a subclassed control does not receive commands ({id:?})"
        )))
    }

    fn register_notify(&self, key: NotifyKey, _handler: Handler) -> PlatformResult<()> {
        Err(PlatformError::InvalidState(format!(
            "a subclassed control does not receive notifications ({key:?})"
        )))
    }
}

/// Plain-message router layered over an existing control.
#[derive(Debug, Clone)]
pub struct Subclass {
    core: Rc<SubclassCore>,
}

impl Default for Subclass {
    fn default() -> Self {
        Self::new()
    }
}

impl Subclass {
    pub fn new() -> Self {
        Subclass {
            core: Rc::new(SubclassCore::new()),
        }
    }

    /// Registration API; only plain-message kinds are accepted.
    pub fn on(&self) -> EventProxy<'_> {
        EventProxy::new(&*self.core)
    }

    pub fn is_installed(&self) -> bool {
        self.core.is_bound()
    }

    /// Control currently subclassed (null when not installed).
    pub fn target(&self) -> NativeHandle {
        self.core.target.get()
    }
}

#[cfg(target_os = "windows")]
mod native {
    use super::{Subclass, SubclassCore};
    use crate::constants::WM_NCDESTROY;
    use crate::error::{PlatformError, Result as PlatformResult};
    use crate::router::Dispatched;
    use crate::types::{NativeHandle, RawEvent};
    use std::rc::Rc;
    use windows::Win32::Foundation::{GetLastError, HWND, LPARAM, LRESULT, WPARAM};
    use windows::Win32::UI::Shell::{DefSubclassProc, RemoveWindowSubclass, SetWindowSubclass};

    impl Subclass {
        /// Attaches the subclass to `control`. Fails if this subclass is
        /// already installed.
        pub fn install_on(&self, control: NativeHandle) -> PlatformResult<()> {
            self.core.bind(control)?;
            // The chain keeps one strong reference until removal.
            let core_ptr = Rc::into_raw(Rc::clone(&self.core));
            let id = core_ptr as usize;
            let installed =
                unsafe { SetWindowSubclass(control.as_hwnd(), Some(subclass_proc), id, id) };
            if !installed.as_bool() {
                let error = unsafe { GetLastError() };
                unsafe { drop(Rc::from_raw(core_ptr)) };
                self.core.unbind();
                log::error!(
                    "Subclass: SetWindowSubclass on {:#x} failed: {error:?}",
                    control.raw()
                );
                return Err(PlatformError::OperationFailed(format!(
                    "SetWindowSubclass failed: {error:?}"
                )));
            }
            Ok(())
        }

        /// Detaches from the control before its destruction. Must run on the
        /// control's thread.
        pub fn uninstall(&self) -> PlatformResult<()> {
            let target = self.core.target.get();
            if target.is_null() {
                return Err(PlatformError::InvalidState(
                    "subclass is not installed".into(),
                ));
            }
            unsafe { SubclassCore::remove(target.as_hwnd(), &self.core) }
        }
    }

    impl SubclassCore {
        fn chain_id(core: &Rc<SubclassCore>) -> usize {
            Rc::as_ptr(core) as usize
        }

        /// Leaves the subclass chain and drops the reference the chain held.
        unsafe fn remove(hwnd: HWND, core: &Rc<SubclassCore>) -> PlatformResult<()> {
            let id = Self::chain_id(core);
            let removed = unsafe { RemoveWindowSubclass(hwnd, Some(subclass_proc), id) };
            if !removed.as_bool() {
                log::error!("Subclass: RemoveWindowSubclass on {:?} failed.", hwnd);
                return Err(PlatformError::OperationFailed(
                    "RemoveWindowSubclass failed".into(),
                ));
            }
            core.unbind();
            unsafe { drop(Rc::from_raw(Rc::as_ptr(core))) };
            Ok(())
        }
    }

    unsafe extern "system" fn subclass_proc(
        hwnd: HWND,
        msg: u32,
        wparam: WPARAM,
        lparam: LPARAM,
        _id: usize,
        ref_data: usize,
    ) -> LRESULT {
        let ptr = ref_data as *const SubclassCore;
        if ptr.is_null() {
            return unsafe { DefSubclassProc(hwnd, msg, wparam, lparam) };
        }
        // Held for the whole call; `remove` may drop the chain's reference.
        let core = unsafe {
            Rc::increment_strong_count(ptr);
            Rc::from_raw(ptr)
        };

        let result = match unsafe { core.dispatch(msg, RawEvent::new(wparam.0, lparam.0)) } {
            Dispatched::Handled(value) => LRESULT(value),
            Dispatched::Unhandled => unsafe { DefSubclassProc(hwnd, msg, wparam, lparam) },
        };

        if msg == WM_NCDESTROY
            && let Err(e) = unsafe { SubclassCore::remove(hwnd, &core) }
        {
            log::error!("Subclass: detaching at WM_NCDESTROY failed: {e}");
        }
        result
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{WM_COMMAND, WM_KEYDOWN, WM_UI_WORK_THREAD};
    use crate::types::ControlId;

    #[test]
    fn plain_handlers_run_only_while_installed() {
        let subclass = Subclass::new();
        subclass.on().wm_key_down(|_| {}).unwrap();
        let raw = RawEvent::new(0x41, 0);

        assert_eq!(unsafe { subclass.core.dispatch(WM_KEYDOWN, raw) }, Dispatched::Unhandled);
        subclass.core.bind(NativeHandle::from_raw(0x77)).unwrap();
        assert!(subclass.is_installed());
        assert_eq!(unsafe { subclass.core.dispatch(WM_KEYDOWN, raw) }, Dispatched::Handled(0));
        assert_eq!(
            unsafe { subclass.core.dispatch(WM_COMMAND, raw) },
            Dispatched::Unhandled
        );

        assert_eq!(subclass.core.unbind(), NativeHandle::from_raw(0x77));
        assert_eq!(unsafe { subclass.core.dispatch(WM_KEYDOWN, raw) }, Dispatched::Unhandled);
    }

    #[test]
    fn commands_and_notifications_are_rejected() {
        let subclass = Subclass::new();
        assert!(matches!(
            subclass.on().wm_command(1, |_| {}),
            Err(PlatformError::InvalidState(_))
        ));
        assert!(subclass.on().lvn_click(ControlId::new(3), |_| {}).is_err());
        assert!(subclass.on().wm(WM_UI_WORK_THREAD, |_| 0).is_err());
    }

    #[test]
    fn registration_closes_at_installation() {
        let subclass = Subclass::new();
        subclass.core.bind(NativeHandle::from_raw(0x10)).unwrap();
        assert!(subclass.on().wm_key_down(|_| {}).is_err());
        assert!(matches!(
            subclass.core.bind(NativeHandle::from_raw(0x20)),
            Err(PlatformError::InvalidState(_))
        ));
        assert_eq!(subclass.target(), NativeHandle::from_raw(0x10));
    }

    #[test]
    fn null_control_cannot_be_subclassed() {
        let subclass = Subclass::new();
        assert!(matches!(
            subclass.core.bind(NativeHandle::NULL),
            Err(PlatformError::InvalidHandle(_))
        ));
        assert!(!subclass.is_installed());
    }
}
