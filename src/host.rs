/*
 * Host core: the part of every window/dialog host that does not need the OS.
 * It owns the router, the native handle and the lifecycle state machine
 *
 *   Unconfigured -> Configuring -> NativeCreationRequested -> Live -> TornDown
 *
 * and bridges creation, teardown and per-message OS callbacks to the router.
 * The concrete Win32 hosts wrap a `HostCore` and forward their window or
 * dialog procedure to `dispatch` and the two lifecycle callbacks.
 *
 * Registration is accepted only before native creation is requested. Dispatch
 * only happens while `Live`; anything arriving earlier or later is inert.
 * The native handle is an atomic so background threads can read it through
 * `UiWork`; it is written on the UI thread only (set once, cleared once).
 */

use crate::constants::{
    PRIVATE_MESSAGE_MAGIC, WM_MODELESS_CREATED, WM_MODELESS_DESTROYED, WM_UI_WORK_THREAD,
    is_reserved_private_message,
};
use crate::error::{PlatformError, Result as PlatformResult};
use crate::main_loop::{self, ModelessChildren};
use crate::proxy::{EventProxy, HandlerSink};
use crate::registry::Handler;
use crate::router::{Dispatched, EventKey, MessageRouter};
use crate::theme::UiTheme;
use crate::types::{
    CommandId, HostFlavor, HostRole, MessageId, NativeHandle, NotifyKey, RawEvent,
};
use crate::ui_work::{self, UiMessenger, UiWork};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicIsize, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostState {
    Unconfigured,
    Configuring,
    NativeCreationRequested,
    Live,
    TornDown,
}

pub struct HostCore {
    flavor: HostFlavor,
    role: HostRole,
    state: Cell<HostState>,
    handle: Arc<AtomicIsize>,
    router: RefCell<MessageRouter>,
    messenger: Arc<dyn UiMessenger>,
    theme: Option<Arc<UiTheme>>,
    modeless_parent: Cell<Option<NativeHandle>>,
    children: ModelessChildren,
}

impl fmt::Debug for HostCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostCore")
            .field("flavor", &self.flavor)
            .field("role", &self.role)
            .field("state", &self.state.get())
            .field("handle", &self.handle())
            .field("handlers", &self.router.borrow().len())
            .finish_non_exhaustive()
    }
}

impl HostCore {
    pub fn new(flavor: HostFlavor, role: HostRole) -> Self {
        HostCore {
            flavor,
            role,
            state: Cell::new(HostState::Unconfigured),
            handle: Arc::new(AtomicIsize::new(0)),
            router: RefCell::new(MessageRouter::new(flavor)),
            messenger: ui_work::default_messenger(),
            theme: None,
            modeless_parent: Cell::new(None),
            children: ModelessChildren::new(),
        }
    }

    /// Replaces the transport used for background-work delivery and for the
    /// modeless-child notifications sent to the parent.
    pub fn with_messenger(mut self, messenger: Arc<dyn UiMessenger>) -> Self {
        self.messenger = messenger;
        self
    }

    pub fn with_theme(mut self, theme: Arc<UiTheme>) -> Self {
        self.theme = Some(theme);
        self
    }

    /// Registration API. Every registration fails with `InvalidState` once
    /// native creation has been requested.
    pub fn on(&self) -> EventProxy<'_> {
        EventProxy::new(self)
    }

    pub fn state(&self) -> HostState {
        self.state.get()
    }

    pub fn flavor(&self) -> HostFlavor {
        self.flavor
    }

    pub fn role(&self) -> HostRole {
        self.role
    }

    pub fn theme(&self) -> Option<&Arc<UiTheme>> {
        self.theme.as_ref()
    }

    /// Native handle; null before creation and after teardown.
    pub fn handle(&self) -> NativeHandle {
        NativeHandle::from_raw(self.handle.load(Ordering::Acquire))
    }

    /// Modeless children registered with this host (only a main host's loop
    /// services them).
    pub fn modeless_children(&self) -> &ModelessChildren {
        &self.children
    }

    /// Parent that tracks this host as a modeless child. Must be set before
    /// native creation.
    pub fn set_modeless_parent(&self, parent: NativeHandle) -> PlatformResult<()> {
        if self.role != HostRole::Modeless {
            return Err(PlatformError::InvalidState(format!(
                "a {:?} host cannot have a modeless parent",
                self.role
            )));
        }
        self.ensure_configurable("set a modeless parent")?;
        self.modeless_parent.set(parent.non_null());
        Ok(())
    }

    pub fn modeless_parent(&self) -> Option<NativeHandle> {
        self.modeless_parent.get()
    }

    pub fn ui_work(&self) -> UiWork {
        UiWork::new(Arc::clone(&self.handle), Arc::clone(&self.messenger))
    }

    /// Runs `work` on a detached thread; it may call back into this host's UI
    /// thread through the `UiWork` it receives.
    pub fn run_in_background<W>(&self, work: W) -> PlatformResult<()>
    where
        W: FnOnce(UiWork) + Send + 'static,
    {
        ui_work::background_work(self.ui_work(), work)
    }

    fn ensure_configurable(&self, what: &str) -> PlatformResult<()> {
        match self.state.get() {
            HostState::Unconfigured => {
                self.state.set(HostState::Configuring);
                log::debug!("HostCore: {:?}/{:?} -> Configuring.", self.flavor, self.role);
                Ok(())
            }
            HostState::Configuring => Ok(()),
            other => {
                log::error!("HostCore: cannot {what} in state {other:?}.");
                Err(PlatformError::InvalidState(format!(
                    "cannot {what} after native creation was requested (state {other:?})"
                )))
            }
        }
    }

    fn register(&self, key: EventKey, handler: Handler) -> PlatformResult<()> {
        self.ensure_configurable("register a handler")?;
        self.router.borrow_mut().add(key, handler);
        Ok(())
    }

    /// Installs a built-in handler unless the application registered the
    /// same message itself. Returns whether it was installed.
    pub(crate) fn install_fallback(&self, id: MessageId, handler: Handler) -> bool {
        if !matches!(
            self.state.get(),
            HostState::Unconfigured | HostState::Configuring
        ) {
            log::warn!("HostCore: fallback for {id:?} ignored in state {:?}.", self.state.get());
            return false;
        }
        let key = EventKey::Message(id);
        let mut router = self.router.borrow_mut();
        if router.contains(key) {
            log::debug!("HostCore: {id:?} has an application handler; fallback skipped.");
            return false;
        }
        router.add(key, handler);
        true
    }

    /// Ends configuration. Must be called exactly once, right before the OS
    /// call that creates the native object.
    pub fn begin_native_creation(&self) -> PlatformResult<()> {
        match self.state.get() {
            HostState::Unconfigured | HostState::Configuring => {
                self.state.set(HostState::NativeCreationRequested);
                log::debug!(
                    "HostCore: {:?}/{:?} -> NativeCreationRequested ({} handlers).",
                    self.flavor,
                    self.role,
                    self.router.borrow().len()
                );
                Ok(())
            }
            other => Err(PlatformError::InvalidState(format!(
                "native creation already requested (state {other:?})"
            ))),
        }
    }

    /// Creation callback: records the native handle and makes the host live.
    pub fn on_native_created(&self, handle: NativeHandle) -> PlatformResult<()> {
        if handle.is_null() {
            return Err(PlatformError::InvalidHandle(
                "creation callback without a native handle".into(),
            ));
        }
        if self.state.get() != HostState::NativeCreationRequested {
            return Err(PlatformError::InvalidState(format!(
                "creation callback in state {:?}",
                self.state.get()
            )));
        }
        self.handle.store(handle.raw(), Ordering::Release);
        self.state.set(HostState::Live);
        log::debug!(
            "HostCore: {:?}/{:?} live with handle {:#x}.",
            self.flavor,
            self.role,
            handle.raw()
        );

        if self.flavor == HostFlavor::Dialog
            && let Some(theme) = &self.theme
        {
            theme.apply_to(handle);
            match theme.apply_to_children(handle) {
                Ok(count) => log::debug!("HostCore: UI font applied to {count} dialog controls."),
                Err(e) => log::error!("HostCore: applying the UI font failed: {e}"),
            }
        }

        if let Some(parent) = self.modeless_parent.get() {
            self.notify_parent(parent, WM_MODELESS_CREATED, handle);
        }
        Ok(())
    }

    /// Teardown callback. Clears the handle and runs the role's teardown
    /// behavior; returns false (and does nothing) unless the host was live.
    pub fn on_native_destroyed(&self) -> bool {
        if self.state.get() != HostState::Live {
            return false;
        }
        let handle = NativeHandle::from_raw(self.handle.swap(0, Ordering::AcqRel));
        self.state.set(HostState::TornDown);
        log::debug!(
            "HostCore: {:?}/{:?} {:#x} torn down.",
            self.flavor,
            self.role,
            handle.raw()
        );

        if self.role == HostRole::Main {
            main_loop::request_exit(0);
        }
        if let Some(parent) = self.modeless_parent.get() {
            self.notify_parent(parent, WM_MODELESS_DESTROYED, handle);
        }
        true
    }

    fn notify_parent(&self, parent: NativeHandle, msg: u32, child: NativeHandle) {
        let raw = RawEvent::new(PRIVATE_MESSAGE_MAGIC, child.raw());
        if let Err(e) = self.messenger.send(parent, msg, raw) {
            log::error!(
                "HostCore: notifying parent {:#x} about modeless child {:#x} failed: {e}",
                parent.raw(),
                child.raw()
            );
        }
    }

    /// Built-in handling of the private coordination messages.
    fn handle_private(&self, msg: u32, raw: RawEvent) -> Option<Dispatched> {
        if !is_reserved_private_message(msg) || raw.wparam != PRIVATE_MESSAGE_MAGIC {
            return None;
        }
        let result = match msg {
            WM_UI_WORK_THREAD => unsafe { ui_work::run_delivered_job(raw) },
            WM_MODELESS_CREATED => {
                self.children.add(NativeHandle::from_raw(raw.lparam));
                0
            }
            WM_MODELESS_DESTROYED => {
                self.children.remove(NativeHandle::from_raw(raw.lparam));
                0
            }
            _ => return None,
        };
        Some(Dispatched::Handled(result))
    }

    /// Per-message entry point for the OS callback.
    ///
    /// # Safety
    /// `msg` and `raw` must be the parameters of a live OS delivery to this
    /// host's native object (or simulate one faithfully, including every
    /// pointer they carry).
    pub unsafe fn dispatch(&self, msg: u32, raw: RawEvent) -> Dispatched {
        if self.state.get() != HostState::Live {
            log::trace!(
                "HostCore: message {msg:#06x} ignored in state {:?}.",
                self.state.get()
            );
            return Dispatched::Unhandled;
        }
        if let Some(done) = self.handle_private(msg, raw) {
            return done;
        }
        unsafe { self.router.borrow().dispatch(msg, raw) }
    }
}

impl HandlerSink for HostCore {
    fn flavor(&self) -> HostFlavor {
        self.flavor
    }

    fn register_message(&self, id: MessageId, handler: Handler) -> PlatformResult<()> {
        if is_reserved_private_message(id.0) {
            return Err(PlatformError::InvalidState(format!(
                "message {:#x} is reserved for internal coordination",
                id.0
            )));
        }
        self.register(EventKey::Message(id), handler)
    }

    fn register_command(&self, id: CommandId, handler: Handler) -> PlatformResult<()> {
        self.register(EventKey::Command(id), handler)
    }

    fn register_notify(&self, key: NotifyKey, handler: Handler) -> PlatformResult<()> {
        self.register(EventKey::Notify(key), handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{
        WM_CLOSE, WM_COMMAND, WM_INITDIALOG, WM_NCPAINT, WM_SETFOCUS, WM_SIZE, WM_USER,
    };
    use crate::types::make_wparam;
    use std::rc::Rc;
    use std::sync::Mutex;
    use std::sync::mpsc;

    /// Records every send and answers 0.
    #[derive(Default)]
    struct RecordingMessenger {
        sent: Mutex<Vec<(NativeHandle, u32, RawEvent)>>,
    }

    impl UiMessenger for RecordingMessenger {
        fn send(&self, target: NativeHandle, msg: u32, raw: RawEvent) -> PlatformResult<isize> {
            self.sent.lock().unwrap().push((target, msg, raw));
            Ok(0)
        }
    }

    fn live(host: &HostCore, handle: isize) {
        host.begin_native_creation().unwrap();
        host.on_native_created(NativeHandle::from_raw(handle)).unwrap();
    }

    #[test]
    fn close_counter_scenario() {
        let host = HostCore::new(HostFlavor::Window, HostRole::Main);
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        host.on().wm_close(move |_| c.set(c.get() + 1)).unwrap();
        live(&host, 0x100);

        for _ in 0..2 {
            let out = unsafe { host.dispatch(WM_CLOSE, RawEvent::default()) };
            assert_eq!(out, Dispatched::Handled(0));
        }
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn registration_is_legal_only_before_creation() {
        let host = HostCore::new(HostFlavor::Dialog, HostRole::Modal);
        assert_eq!(host.state(), HostState::Unconfigured);
        host.on().wm_size(|_| {}).unwrap();
        assert_eq!(host.state(), HostState::Configuring);
        host.on().wm_command(10, |_| {}).unwrap();

        host.begin_native_creation().unwrap();
        let late = host.on().wm_close(|_| {});
        assert!(matches!(late, Err(PlatformError::InvalidState(_))));

        host.on_native_created(NativeHandle::from_raw(0x200)).unwrap();
        assert!(host.on().wm_command(11, |_| {}).is_err());
        assert!(host.on().wm(WM_USER, |_| 0).is_err());
        assert!(host.begin_native_creation().is_err());
    }

    #[test]
    fn events_before_creation_or_after_teardown_are_inert() {
        let host = HostCore::new(HostFlavor::Window, HostRole::Control);
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        host.on().wm_size(move |_| c.set(c.get() + 1)).unwrap();

        assert_eq!(unsafe { host.dispatch(WM_SIZE, RawEvent::default()) }, Dispatched::Unhandled);
        host.begin_native_creation().unwrap();
        assert_eq!(unsafe { host.dispatch(WM_SIZE, RawEvent::default()) }, Dispatched::Unhandled);

        host.on_native_created(NativeHandle::from_raw(0x300)).unwrap();
        assert!(unsafe { host.dispatch(WM_SIZE, RawEvent::default()) }.is_handled());

        assert!(host.on_native_destroyed());
        assert_eq!(unsafe { host.dispatch(WM_SIZE, RawEvent::default()) }, Dispatched::Unhandled);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn teardown_is_idempotent() {
        main_loop::take_exit_request();
        let host = HostCore::new(HostFlavor::Window, HostRole::Main);
        live(&host, 0x400);
        assert_eq!(host.handle(), NativeHandle::from_raw(0x400));

        assert!(host.on_native_destroyed());
        assert!(host.handle().is_null());
        assert_eq!(main_loop::take_exit_request(), Some(0));

        assert!(!host.on_native_destroyed());
        assert!(host.handle().is_null());
        assert_eq!(host.state(), HostState::TornDown);
        assert_eq!(main_loop::take_exit_request(), None);
    }

    #[test]
    fn creation_callback_needs_a_request_and_a_handle() {
        let host = HostCore::new(HostFlavor::Window, HostRole::Main);
        assert!(matches!(
            host.on_native_created(NativeHandle::from_raw(1)),
            Err(PlatformError::InvalidState(_))
        ));
        host.begin_native_creation().unwrap();
        assert!(matches!(
            host.on_native_created(NativeHandle::NULL),
            Err(PlatformError::InvalidHandle(_))
        ));
        assert_eq!(host.state(), HostState::NativeCreationRequested);
    }

    #[test]
    fn unhandled_messages_report_unhandled_for_the_flavor_fallback() {
        let host = HostCore::new(HostFlavor::Dialog, HostRole::Modal);
        live(&host, 0x500);
        let out = unsafe { host.dispatch(WM_COMMAND, RawEvent::new(make_wparam(501, 0), 0)) };
        assert_eq!(out, Dispatched::Unhandled);
        assert_eq!(out.result_or(0), 0);
    }

    #[test]
    fn fallbacks_never_override_application_handlers() {
        let host = HostCore::new(HostFlavor::Window, HostRole::Modeless);
        host.on().wm_close(|_| {}).unwrap();
        assert!(!host.install_fallback(MessageId(WM_CLOSE), Handler::new(|_| 99)));
        assert!(host.install_fallback(MessageId(WM_SETFOCUS), Handler::new(|_| 7)));
        live(&host, 0x600);

        assert_eq!(
            unsafe { host.dispatch(WM_CLOSE, RawEvent::default()) },
            Dispatched::Handled(0)
        );
        assert_eq!(
            unsafe { host.dispatch(WM_SETFOCUS, RawEvent::default()) },
            Dispatched::Handled(7)
        );
        assert!(!host.install_fallback(MessageId(WM_SIZE), Handler::new(|_| 0)));
    }

    #[test]
    fn modeless_child_notifies_its_parent_on_creation_and_teardown() {
        let messenger = Arc::new(RecordingMessenger::default());
        let parent = NativeHandle::from_raw(0x1000);
        let child = HostCore::new(HostFlavor::Dialog, HostRole::Modeless)
            .with_messenger(messenger.clone());
        child.set_modeless_parent(parent).unwrap();
        live(&child, 0x2000);
        assert!(child.on_native_destroyed());

        let sent = messenger.sent.lock().unwrap().clone();
        assert_eq!(
            sent,
            vec![
                (
                    parent,
                    WM_MODELESS_CREATED,
                    RawEvent::new(PRIVATE_MESSAGE_MAGIC, 0x2000)
                ),
                (
                    parent,
                    WM_MODELESS_DESTROYED,
                    RawEvent::new(PRIVATE_MESSAGE_MAGIC, 0x2000)
                ),
            ]
        );
    }

    #[test]
    fn main_host_tracks_modeless_children() {
        let main = HostCore::new(HostFlavor::Window, HostRole::Main);
        live(&main, 0x10);
        let child = RawEvent::new(PRIVATE_MESSAGE_MAGIC, 0x20);

        assert!(unsafe { main.dispatch(WM_MODELESS_CREATED, child) }.is_handled());
        assert!(main.modeless_children().contains(NativeHandle::from_raw(0x20)));
        assert!(unsafe { main.dispatch(WM_MODELESS_DESTROYED, child) }.is_handled());
        assert!(main.modeless_children().is_empty());

        let forged = RawEvent::new(0, 0x30);
        assert_eq!(
            unsafe { main.dispatch(WM_MODELESS_CREATED, forged) },
            Dispatched::Unhandled
        );
        assert!(main.modeless_children().is_empty());
    }

    #[test]
    fn dialog_init_runs_on_a_live_host_and_returns_its_value() {
        let host = Rc::new(
            HostCore::new(HostFlavor::Dialog, HostRole::Modal)
                .with_theme(Arc::new(UiTheme::system().unwrap())),
        );
        let seen = Rc::new(Cell::new(NativeHandle::NULL));
        let weak = Rc::downgrade(&host);
        let s = Rc::clone(&seen);
        host.on()
            .wm_init_dialog(move |_| {
                let host = weak.upgrade().unwrap();
                assert_eq!(host.state(), HostState::Live);
                s.set(host.handle());
                true
            })
            .unwrap();
        host.on().wm_close(|_| {}).unwrap();

        host.begin_native_creation().unwrap();
        assert!(host.on().wm_size(|_| {}).is_err());
        host.on_native_created(NativeHandle::from_raw(0x900)).unwrap();

        let init = unsafe { host.dispatch(WM_INITDIALOG, RawEvent::default()) };
        assert_eq!(init, Dispatched::Handled(1));
        assert_eq!(seen.get(), NativeHandle::from_raw(0x900));
        assert_eq!(
            unsafe { host.dispatch(WM_CLOSE, RawEvent::default()) },
            Dispatched::Handled(HostFlavor::Dialog.handled_sentinel())
        );
    }

    #[test]
    fn dialog_without_init_handler_leaves_the_default_to_the_dialog_manager() {
        let host = HostCore::new(HostFlavor::Dialog, HostRole::Control);
        assert!(host.install_fallback(MessageId(WM_NCPAINT), Handler::new(|_| 1)));
        live(&host, 0xa00);

        let init = unsafe { host.dispatch(WM_INITDIALOG, RawEvent::default()) };
        assert_eq!(init, Dispatched::Unhandled);
        assert_eq!(init.result_or(0), 0);
        assert_eq!(
            unsafe { host.dispatch(WM_NCPAINT, RawEvent::new(1, 0)) },
            Dispatched::Handled(1)
        );
        assert!(host.on().wm_nc_paint(|_| {}).is_err());
        assert!(!host.install_fallback(MessageId(WM_CLOSE), Handler::new(|_| 1)));
    }

    #[test]
    fn modeless_parent_is_only_for_modeless_hosts() {
        let host = HostCore::new(HostFlavor::Window, HostRole::Main);
        assert!(host.set_modeless_parent(NativeHandle::from_raw(1)).is_err());
    }

    /// Delivers each message to the test thread, which plays the UI thread by
    /// calling the host's dispatch entry point.
    struct ChannelMessenger {
        tx: Mutex<mpsc::Sender<(u32, RawEvent, mpsc::Sender<isize>)>>,
    }

    impl UiMessenger for ChannelMessenger {
        fn send(&self, _target: NativeHandle, msg: u32, raw: RawEvent) -> PlatformResult<isize> {
            let (reply_tx, reply_rx) = mpsc::channel();
            self.tx
                .lock()
                .unwrap()
                .send((msg, raw, reply_tx))
                .map_err(|e| PlatformError::OperationFailed(e.to_string()))?;
            reply_rx
                .recv()
                .map_err(|e| PlatformError::OperationFailed(e.to_string()))
        }
    }

    #[test]
    fn worker_marshal_runs_through_host_dispatch() {
        use std::sync::atomic::AtomicUsize;

        let (tx, deliveries) = mpsc::channel();
        let host = HostCore::new(HostFlavor::Window, HostRole::Main)
            .with_messenger(Arc::new(ChannelMessenger { tx: Mutex::new(tx) }));
        live(&host, 0x700);

        let counter = Arc::new(AtomicUsize::new(0));
        let (done_tx, done_rx) = mpsc::channel();
        let c = Arc::clone(&counter);
        host.run_in_background(move |ui| {
            let inner = Arc::clone(&c);
            let result = ui.run_on_ui_thread(move || {
                inner.fetch_add(1, Ordering::SeqCst);
            });
            done_tx.send((result, c.load(Ordering::SeqCst))).unwrap();
        })
        .unwrap();

        let (msg, raw, reply) = deliveries.recv().unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        let out = unsafe { host.dispatch(msg, raw) };
        assert_eq!(out, Dispatched::Handled(0));
        reply.send(out.result_or(0)).unwrap();

        let (result, seen) = done_rx.recv().unwrap();
        assert_eq!(result, Ok(()));
        assert_eq!(seen, 1);
    }
}
