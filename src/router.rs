/*
 * Dispatch router: classifies a raw (message, wparam, lparam) triple into one
 * of three framings, resolves the key in the matching registry and runs the
 * handler inside the failure-containment boundary.
 *
 * Framing is mutually exclusive. `WM_COMMAND` is always a command keyed by the
 * low word of `wparam`; `WM_NOTIFY` is always a notification keyed by the
 * header's (idFrom, code); every other id is a plain message. A plain-message
 * registration for `WM_COMMAND` or `WM_NOTIFY` is therefore never consulted.
 */

use crate::constants::{WM_COMMAND, WM_NOTIFY};
use crate::failure::FailurePolicy;
use crate::params::notify::NotifyHeader;
use crate::registry::{Handler, Registry};
use crate::types::{
    CommandId, HostFlavor, MessageId, NotifyCode, NotifyKey, RawEvent, loword,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKey {
    Message(MessageId),
    Command(CommandId),
    Notify(NotifyKey),
}

/// Outcome of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// A handler ran (or panicked and was contained); this is the result word.
    Handled(isize),
    /// No handler matched; the caller applies its flavor's fallback
    /// (default window procedure, FALSE for dialogs, previous procedure for
    /// subclassed controls).
    Unhandled,
}

impl Dispatched {
    pub fn is_handled(self) -> bool {
        matches!(self, Dispatched::Handled(_))
    }

    pub fn result_or(self, fallback: isize) -> isize {
        match self {
            Dispatched::Handled(value) => value,
            Dispatched::Unhandled => fallback,
        }
    }
}

/// Determines which registry an event belongs to.
///
/// Returns `None` only for a `WM_NOTIFY` without a header.
///
/// # Safety
/// For `WM_NOTIFY`, `raw.lparam` must be null or address a live `NMHDR`.
pub unsafe fn classify(msg: u32, raw: RawEvent) -> Option<EventKey> {
    match msg {
        WM_COMMAND => Some(EventKey::Command(CommandId(loword(raw.wparam)))),
        WM_NOTIFY => {
            let header = unsafe { (raw.lparam as *const NotifyHeader).as_ref() }?;
            Some(EventKey::Notify(NotifyKey {
                id_from: header.id_from,
                code: NotifyCode::from_header_code(header.code),
            }))
        }
        other => Some(EventKey::Message(MessageId(other))),
    }
}

#[derive(Debug)]
pub struct MessageRouter {
    flavor: HostFlavor,
    policy: FailurePolicy,
    msgs: Registry<MessageId>,
    cmds: Registry<CommandId>,
    nfys: Registry<NotifyKey>,
}

impl MessageRouter {
    pub fn new(flavor: HostFlavor) -> Self {
        MessageRouter {
            flavor,
            policy: FailurePolicy::QuitLoop,
            msgs: Registry::new("messages"),
            cmds: Registry::new("commands"),
            nfys: Registry::new("notifications"),
        }
    }

    pub fn flavor(&self) -> HostFlavor {
        self.flavor
    }

    pub fn add(&mut self, key: EventKey, handler: Handler) {
        match key {
            EventKey::Message(id) => self.msgs.add(id, handler),
            EventKey::Command(id) => self.cmds.add(id, handler),
            EventKey::Notify(key) => self.nfys.add(key, handler),
        }
    }

    pub fn contains(&self, key: EventKey) -> bool {
        match key {
            EventKey::Message(id) => self.msgs.contains(id),
            EventKey::Command(id) => self.cmds.contains(id),
            EventKey::Notify(key) => self.nfys.contains(key),
        }
    }

    pub fn len(&self) -> usize {
        self.msgs.len() + self.cmds.len() + self.nfys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn find(&self, key: EventKey) -> Option<&Handler> {
        match key {
            EventKey::Message(id) => self.msgs.find(id),
            EventKey::Command(id) => self.cmds.find(id),
            EventKey::Notify(key) => self.nfys.find(key),
        }
    }

    /// Classifies, resolves and runs the matching handler.
    ///
    /// # Safety
    /// `msg` and `raw` must come from a live OS delivery (or point at
    /// structures that stay valid for the whole call).
    pub unsafe fn dispatch(&self, msg: u32, raw: RawEvent) -> Dispatched {
        let Some(key) = (unsafe { classify(msg, raw) }) else {
            log::warn!("Router: WM_NOTIFY without a header (lparam is null); ignoring.");
            return Dispatched::Unhandled;
        };

        let Some(handler) = self.find(key) else {
            return Dispatched::Unhandled;
        };

        if log::log_enabled!(log::Level::Trace) {
            let kind = match key {
                EventKey::Message(MessageId(id)) => crate::proxy::message_kind(id).map(|k| k.name),
                _ => None,
            };
            log::trace!(
                "Router: dispatching {key:?} ({}) to {:?} handler.",
                kind.unwrap_or("untyped"),
                self.flavor
            );
        }
        let context = format!("Router {key:?}");
        match self
            .policy
            .contain(&context, || unsafe { handler.invoke(raw) })
        {
            Some(result) => Dispatched::Handled(result),
            None => Dispatched::Handled(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::main_loop;
    use crate::types::{ControlId, make_wparam};
    use std::cell::Cell;
    use std::rc::Rc;

    fn recorder(log: &Rc<Cell<u32>>, tag: u32, result: isize) -> Handler {
        let log = Rc::clone(log);
        Handler::new(move |_| {
            log.set(log.get() * 10 + tag);
            result
        })
    }

    #[test]
    fn each_framing_resolves_only_its_own_registry() {
        let mut router = MessageRouter::new(HostFlavor::Window);
        let calls = Rc::new(Cell::new(0));
        router.add(EventKey::Message(MessageId(0x0010)), recorder(&calls, 1, 11));
        router.add(EventKey::Command(CommandId(0x0010)), recorder(&calls, 2, 22));

        let plain = unsafe { router.dispatch(0x0010, RawEvent::default()) };
        assert_eq!(plain, Dispatched::Handled(11));
        assert_eq!(calls.get(), 1);

        let cmd = unsafe { router.dispatch(WM_COMMAND, RawEvent::new(make_wparam(0x10, 0), 0)) };
        assert_eq!(cmd, Dispatched::Handled(22));
        assert_eq!(calls.get(), 12);
    }

    #[test]
    fn command_501_does_not_fire_for_plain_message_501() {
        let mut router = MessageRouter::new(HostFlavor::Window);
        let calls = Rc::new(Cell::new(0));
        router.add(EventKey::Command(CommandId(501)), recorder(&calls, 1, 0));

        let as_command =
            unsafe { router.dispatch(WM_COMMAND, RawEvent::new(make_wparam(501, 0), 0)) };
        assert!(as_command.is_handled());
        assert_eq!(calls.get(), 1);

        let as_plain = unsafe { router.dispatch(501, RawEvent::new(make_wparam(501, 0), 0)) };
        assert_eq!(as_plain, Dispatched::Unhandled);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn plain_registration_for_framing_ids_is_never_consulted() {
        let mut router = MessageRouter::new(HostFlavor::Window);
        let calls = Rc::new(Cell::new(0));
        router.add(EventKey::Message(MessageId(WM_COMMAND)), recorder(&calls, 1, 1));

        let out = unsafe { router.dispatch(WM_COMMAND, RawEvent::new(7, 0)) };
        assert_eq!(out, Dispatched::Unhandled);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn notification_key_is_read_from_the_header() {
        let mut router = MessageRouter::new(HostFlavor::Dialog);
        let calls = Rc::new(Cell::new(0));
        let key = NotifyKey::new(ControlId::new(40), NotifyCode(-101));
        router.add(EventKey::Notify(key), recorder(&calls, 3, 5));

        let header = NotifyHeader {
            hwnd_from: 0x1234,
            id_from: 40,
            code: (-101_i32) as u32,
        };
        let raw = RawEvent::new(40, &header as *const NotifyHeader as isize);
        assert_eq!(unsafe { classify(WM_NOTIFY, raw) }, Some(EventKey::Notify(key)));
        assert_eq!(unsafe { router.dispatch(WM_NOTIFY, raw) }, Dispatched::Handled(5));

        let other = NotifyHeader {
            code: (-102_i32) as u32,
            ..header
        };
        let raw = RawEvent::new(40, &other as *const NotifyHeader as isize);
        assert_eq!(unsafe { router.dispatch(WM_NOTIFY, raw) }, Dispatched::Unhandled);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn notify_without_header_is_unhandled() {
        let router = MessageRouter::new(HostFlavor::Window);
        assert_eq!(unsafe { classify(WM_NOTIFY, RawEvent::default()) }, None);
        assert_eq!(
            unsafe { router.dispatch(WM_NOTIFY, RawEvent::default()) },
            Dispatched::Unhandled
        );
    }

    #[test]
    fn panicking_handler_is_contained_and_requests_exit() {
        main_loop::take_exit_request();
        let mut router = MessageRouter::new(HostFlavor::Window);
        router.add(
            EventKey::Message(MessageId(0x0005)),
            Handler::new(|_| panic!("handler failure")),
        );

        let out = unsafe { router.dispatch(0x0005, RawEvent::default()) };
        assert_eq!(out, Dispatched::Handled(0));
        assert_eq!(main_loop::take_exit_request(), Some(1));
    }

    #[test]
    fn classification_is_deterministic() {
        let raw = RawEvent::new(make_wparam(9, 3), 0);
        assert_eq!(
            unsafe { classify(WM_COMMAND, raw) },
            Some(EventKey::Command(CommandId(9)))
        );
        assert_eq!(
            unsafe { classify(0x0200, raw) },
            Some(EventKey::Message(MessageId(0x0200)))
        );
    }
}
