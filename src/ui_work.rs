/*
 * Background-work bridge. A detached worker receives a `UiWork` handle and may
 * marshal closures back onto the host's UI thread with `run_on_ui_thread`,
 * which blocks the worker until the closure has run there.
 *
 * Delivery uses the private `WM_UI_WORK_THREAD` message sent synchronously
 * (`SendMessageW` on Windows). `lparam` addresses a job slot living on the
 * worker's stack; the worker stays blocked in the send for as long as the UI
 * side may touch it.
 */

use crate::constants::{PRIVATE_MESSAGE_MAGIC, WM_UI_WORK_THREAD};
use crate::error::{PlatformError, Result as PlatformResult};
use crate::failure::FailurePolicy;
use crate::types::{NativeHandle, RawEvent};
use std::sync::atomic::{AtomicBool, AtomicIsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

/// Synchronous cross-thread message transport.
///
/// `send` must not return before the target thread has processed (or
/// discarded) the message.
pub trait UiMessenger: Send + Sync {
    fn send(&self, target: NativeHandle, msg: u32, raw: RawEvent) -> PlatformResult<isize>;
}

/// Messenger used where no native transport exists; every send fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnboundMessenger;

impl UiMessenger for UnboundMessenger {
    fn send(&self, target: NativeHandle, msg: u32, _raw: RawEvent) -> PlatformResult<isize> {
        Err(PlatformError::OperationFailed(format!(
            "no message transport to deliver {msg:#x} to {:#x}",
            target.raw()
        )))
    }
}

#[cfg(target_os = "windows")]
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32Messenger;

#[cfg(target_os = "windows")]
impl UiMessenger for Win32Messenger {
    fn send(&self, target: NativeHandle, msg: u32, raw: RawEvent) -> PlatformResult<isize> {
        use windows::Win32::Foundation::{LPARAM, WPARAM};
        use windows::Win32::UI::WindowsAndMessaging::SendMessageW;

        let result = unsafe {
            SendMessageW(
                target.as_hwnd(),
                msg,
                Some(WPARAM(raw.wparam)),
                Some(LPARAM(raw.lparam)),
            )
        };
        Ok(result.0)
    }
}

/// The platform's native messenger.
pub fn default_messenger() -> Arc<dyn UiMessenger> {
    #[cfg(target_os = "windows")]
    {
        Arc::new(Win32Messenger)
    }
    #[cfg(not(target_os = "windows"))]
    {
        Arc::new(UnboundMessenger)
    }
}

type Job = Box<dyn FnOnce() + Send>;

struct JobSlot {
    job: Mutex<Option<Job>>,
    panicked: AtomicBool,
}

fn lock_job(slot: &JobSlot) -> MutexGuard<'_, Option<Job>> {
    slot.job.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle given to background work; cheap to clone and `Send`.
#[derive(Clone)]
pub struct UiWork {
    target: Arc<AtomicIsize>,
    messenger: Arc<dyn UiMessenger>,
}

impl std::fmt::Debug for UiWork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiWork")
            .field("target", &self.target())
            .finish_non_exhaustive()
    }
}

impl UiWork {
    pub(crate) fn new(target: Arc<AtomicIsize>, messenger: Arc<dyn UiMessenger>) -> Self {
        UiWork { target, messenger }
    }

    /// Current native handle of the owning host (null before creation and
    /// after teardown).
    pub fn target(&self) -> NativeHandle {
        NativeHandle::from_raw(self.target.load(Ordering::Acquire))
    }

    /// Runs `job` on the UI thread and waits for it to finish.
    ///
    /// Fails if the host has no native handle, if the transport fails, if the
    /// UI thread discarded the message without running the job, or if the job
    /// panicked there (the UI loop is then asked to exit). Blocks without a
    /// timeout: the UI thread must be pumping messages.
    pub fn run_on_ui_thread<F>(&self, job: F) -> PlatformResult<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let Some(target) = self.target().non_null() else {
            log::warn!("UiWork: host has no native handle; job rejected.");
            return Err(PlatformError::InvalidHandle(
                "run_on_ui_thread on a host without a native handle".into(),
            ));
        };

        let slot = JobSlot {
            job: Mutex::new(Some(Box::new(job))),
            panicked: AtomicBool::new(false),
        };
        let raw = RawEvent::new(PRIVATE_MESSAGE_MAGIC, &slot as *const JobSlot as isize);
        log::trace!("UiWork: marshalling job to {:#x}.", target.raw());
        self.messenger.send(target, WM_UI_WORK_THREAD, raw)?;

        if lock_job(&slot).is_some() {
            log::warn!("UiWork: job was not run by the UI thread of {:#x}.", target.raw());
            return Err(PlatformError::OperationFailed(
                "the UI thread did not run the job".into(),
            ));
        }
        if slot.panicked.load(Ordering::Acquire) {
            return Err(PlatformError::OperationFailed(
                "the job panicked on the UI thread".into(),
            ));
        }
        Ok(())
    }
}

/// UI-thread side of `run_on_ui_thread`. Returns the result word for the
/// private message.
///
/// # Safety
/// When `raw.wparam` carries the private magic, `raw.lparam` must address a
/// job slot whose sender is blocked waiting for this call.
pub(crate) unsafe fn run_delivered_job(raw: RawEvent) -> isize {
    if raw.wparam != PRIVATE_MESSAGE_MAGIC || raw.lparam == 0 {
        log::warn!("UiWork: malformed job delivery ignored.");
        return 0;
    }
    let slot = unsafe { &*(raw.lparam as *const JobSlot) };
    let Some(job) = lock_job(slot).take() else {
        return 0;
    };
    if FailurePolicy::QuitLoop.contain("UiWork", job).is_none() {
        slot.panicked.store(true, Ordering::Release);
    }
    0
}

/// Runs `work` on a new detached thread named `ui-background-work`.
///
/// A panic escaping `work` aborts the process.
pub fn background_work<W>(ui: UiWork, work: W) -> PlatformResult<()>
where
    W: FnOnce(UiWork) + Send + 'static,
{
    thread::Builder::new()
        .name("ui-background-work".into())
        .spawn(move || {
            FailurePolicy::AbortProcess.contain("UiWork background", || work(ui));
        })
        .map(|_| ())
        .map_err(|e| {
            log::error!("UiWork: failed to spawn background thread: {e}");
            PlatformError::OperationFailed(format!("failed to spawn background thread: {e}"))
        })
}
