/*
 * lambdawnd: closure-based Win32 message handling. Application code registers
 * typed closures per window message, command id or (control id, notification
 * code) pair on a host before its native window exists; the host's window or
 * dialog procedure then routes every OS delivery to the matching closure.
 *
 * The dispatch core (typed views, registries, router, host lifecycle,
 * background-work bridge) is portable so it builds and is tested on every
 * target. Window classes, procedures, concrete hosts, control subclassing and
 * the message pump are Windows-only.
 */
pub mod constants;
pub mod controls;
pub mod error;
pub mod failure;
pub mod host;
#[cfg(target_os = "windows")]
pub mod hosts;
pub mod main_loop;
pub mod params;
pub mod proxy;
pub mod registry;
pub mod router;
pub mod setup;
pub mod theme;
pub mod types;
pub mod ui_work;
#[cfg(target_os = "windows")]
pub(crate) mod window_common;

pub use controls::Subclass;
pub use error::{PlatformError, Result as PlatformResult};
pub use failure::FailurePolicy;
pub use host::{HostCore, HostState};
#[cfg(target_os = "windows")]
pub use hosts::{
    DialogControl, DialogMain, DialogModal, DialogModeless, WindowControl, WindowMain, WindowModal,
    WindowModeless,
};
pub use proxy::{EventKind, EventProxy, HandlerSink, ReturnRule};
pub use router::{Dispatched, MessageRouter};
pub use setup::{ControlSetup, Cursor, DialogSetup, WindowSetup};
pub use theme::{FontDescription, FontWeight, UiTheme};
pub use types::{
    CommandId, ControlId, HostFlavor, HostRole, MessageId, NativeHandle, NotifyCode, NotifyKey,
    RawEvent,
};
pub use ui_work::{UiMessenger, UiWork};
