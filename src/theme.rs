/*
 * Shared UI font. The application owns one `UiTheme` (usually behind an
 * `Arc`) and hands it to the hosts that should use it. Dialog hosts re-apply
 * it to every child control right after creation, since controls created from
 * a dialog template do not inherit the font of their parent.
 *
 * The native font is created on construction and deleted on drop. Off Windows
 * only the description is kept and the handle stays null.
 */

use crate::error::Result as PlatformResult;
use crate::types::NativeHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FontDescription {
    /// Face name; `None` picks the dialog default ("MS Shell Dlg 2").
    pub name: Option<String>,
    /// Point size; `None` lets the font mapper choose.
    pub size: Option<i32>,
    pub weight: Option<FontWeight>,
}

impl FontDescription {
    pub const DEFAULT_FACE: &'static str = "MS Shell Dlg 2";

    pub fn face(&self) -> &str {
        self.name.as_deref().unwrap_or(Self::DEFAULT_FACE)
    }

    pub fn is_bold(&self) -> bool {
        self.weight == Some(FontWeight::Bold)
    }
}

#[derive(Debug)]
pub struct UiTheme {
    description: FontDescription,
    font: NativeHandle,
}

impl UiTheme {
    pub fn description(&self) -> &FontDescription {
        &self.description
    }

    /// Native font handle (null off Windows).
    pub fn font(&self) -> NativeHandle {
        self.font
    }
}

#[cfg(not(target_os = "windows"))]
impl UiTheme {
    pub fn from_description(description: FontDescription) -> PlatformResult<Self> {
        Ok(UiTheme {
            description,
            font: NativeHandle::NULL,
        })
    }

    /// The system message-box font.
    pub fn system() -> PlatformResult<Self> {
        Self::from_description(FontDescription {
            name: Some("Segoe UI".into()),
            size: Some(9),
            weight: Some(FontWeight::Normal),
        })
    }

    pub fn apply_to(&self, _window: NativeHandle) {}

    /// Number of child windows that received the font.
    pub fn apply_to_children(&self, _parent: NativeHandle) -> PlatformResult<usize> {
        Ok(0)
    }
}

#[cfg(target_os = "windows")]
mod native {
    use super::{FontDescription, FontWeight, UiTheme};
    use crate::error::{PlatformError, Result as PlatformResult};
    use crate::types::NativeHandle;
    use std::ffi::c_void;
    use windows::Win32::Foundation::{GetLastError, HWND, LPARAM, WPARAM};
    use windows::Win32::Graphics::Gdi::{
        CLIP_DEFAULT_PRECIS, CreateFontIndirectW, CreateFontW, DEFAULT_CHARSET, DEFAULT_QUALITY,
        DeleteObject, FF_DONTCARE, FW_BOLD, FW_NORMAL, GetDC, GetDeviceCaps, HGDIOBJ, LOGPIXELSY,
        OUT_DEFAULT_PRECIS, ReleaseDC,
    };
    use windows::Win32::System::WindowsProgramming::MulDiv;
    use windows::Win32::UI::WindowsAndMessaging::{
        EnumChildWindows, NONCLIENTMETRICSW, SPI_GETNONCLIENTMETRICS,
        SYSTEM_PARAMETERS_INFO_UPDATE_FLAGS, SendMessageW, SystemParametersInfoW, WM_SETFONT,
    };
    use windows::core::{BOOL, HSTRING};

    struct ChildFontPass {
        font: NativeHandle,
        count: usize,
    }

    unsafe extern "system" fn set_font_on_child(hwnd: HWND, lparam: LPARAM) -> BOOL {
        let pass = unsafe { &mut *(lparam.0 as *mut ChildFontPass) };
        unsafe {
            SendMessageW(
                hwnd,
                WM_SETFONT,
                Some(WPARAM(pass.font.raw() as usize)),
                Some(LPARAM(0)),
            );
        }
        pass.count += 1;
        BOOL(1)
    }

    impl UiTheme {
        pub fn from_description(description: FontDescription) -> PlatformResult<Self> {
            let hdc_screen = unsafe { GetDC(None) };
            if hdc_screen.is_invalid() {
                return Err(PlatformError::OperationFailed(
                    "Platform: could not acquire screen DC for font creation".into(),
                ));
            }
            let logical_height = if let Some(pt) = description.size {
                -unsafe { MulDiv(pt, GetDeviceCaps(Some(hdc_screen), LOGPIXELSY), 72) }
            } else {
                0
            };
            unsafe { ReleaseDC(None, hdc_screen) };

            let weight = match description.weight {
                Some(FontWeight::Bold) => FW_BOLD.0 as i32,
                _ => FW_NORMAL.0 as i32,
            };
            let face = HSTRING::from(description.face());
            let hfont = unsafe {
                CreateFontW(
                    logical_height,
                    0,
                    0,
                    0,
                    weight,
                    0,
                    0,
                    0,
                    DEFAULT_CHARSET,
                    OUT_DEFAULT_PRECIS,
                    CLIP_DEFAULT_PRECIS,
                    DEFAULT_QUALITY,
                    FF_DONTCARE.0 as u32,
                    &face,
                )
            };
            if hfont.is_invalid() {
                let error = unsafe { GetLastError() };
                log::error!("Platform: CreateFontW failed for {description:?}: {error:?}");
                return Err(PlatformError::InitializationFailed(format!(
                    "CreateFontW failed: {error:?}"
                )));
            }
            log::debug!("Platform: UI font {:?} created for {description:?}.", hfont);
            Ok(UiTheme {
                description,
                font: NativeHandle::from_raw(hfont.0 as isize),
            })
        }

        /// The system message-box font (`NONCLIENTMETRICS::lfMessageFont`).
        pub fn system() -> PlatformResult<Self> {
            let mut metrics = NONCLIENTMETRICSW {
                cbSize: std::mem::size_of::<NONCLIENTMETRICSW>() as u32,
                ..Default::default()
            };
            unsafe {
                SystemParametersInfoW(
                    SPI_GETNONCLIENTMETRICS,
                    metrics.cbSize,
                    Some(&mut metrics as *mut _ as *mut c_void),
                    SYSTEM_PARAMETERS_INFO_UPDATE_FLAGS(0),
                )?;
            }

            let log_font = metrics.lfMessageFont;
            let hfont = unsafe { CreateFontIndirectW(&log_font) };
            if hfont.is_invalid() {
                let error = unsafe { GetLastError() };
                log::error!("Platform: CreateFontIndirectW failed for the system font: {error:?}");
                return Err(PlatformError::InitializationFailed(format!(
                    "CreateFontIndirectW failed: {error:?}"
                )));
            }

            let face_len = log_font
                .lfFaceName
                .iter()
                .position(|c| *c == 0)
                .unwrap_or(log_font.lfFaceName.len());
            let description = FontDescription {
                name: Some(String::from_utf16_lossy(&log_font.lfFaceName[..face_len])),
                size: None,
                weight: Some(if log_font.lfWeight >= FW_BOLD.0 as i32 {
                    FontWeight::Bold
                } else {
                    FontWeight::Normal
                }),
            };
            log::debug!("Platform: system UI font {:?} ({}).", hfont, description.face());
            Ok(UiTheme {
                description,
                font: NativeHandle::from_raw(hfont.0 as isize),
            })
        }

        pub fn apply_to(&self, window: NativeHandle) {
            unsafe {
                SendMessageW(
                    window.as_hwnd(),
                    WM_SETFONT,
                    Some(WPARAM(self.font.raw() as usize)),
                    Some(LPARAM(0)),
                );
            }
        }

        /// Sends `WM_SETFONT` to every descendant of `parent`; returns how many
        /// windows received it.
        pub fn apply_to_children(&self, parent: NativeHandle) -> PlatformResult<usize> {
            if parent.is_null() {
                return Err(PlatformError::InvalidHandle(
                    "apply_to_children on a null parent".into(),
                ));
            }
            let mut pass = ChildFontPass {
                font: self.font,
                count: 0,
            };
            unsafe {
                let _ = EnumChildWindows(
                    Some(parent.as_hwnd()),
                    Some(set_font_on_child),
                    LPARAM(&mut pass as *mut ChildFontPass as isize),
                );
            }
            Ok(pass.count)
        }
    }

    impl Drop for UiTheme {
        fn drop(&mut self) {
            if !self.font.is_null() {
                log::debug!("Platform: deleting UI font {:#x}.", self.font.raw());
                unsafe {
                    let _ = DeleteObject(HGDIOBJ(self.font.raw() as *mut c_void));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_defaults_to_the_dialog_face() {
        let plain = FontDescription::default();
        assert_eq!(plain.face(), FontDescription::DEFAULT_FACE);
        assert!(!plain.is_bold());

        let bold = FontDescription {
            name: Some("Tahoma".into()),
            size: Some(10),
            weight: Some(FontWeight::Bold),
        };
        assert_eq!(bold.face(), "Tahoma");
        assert!(bold.is_bold());
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn portable_theme_keeps_the_description_without_a_font() {
        let theme = UiTheme::system().unwrap();
        assert!(theme.font().is_null());
        assert!(theme.description().name.is_some());
        assert_eq!(theme.apply_to_children(NativeHandle::from_raw(1)), Ok(0));
    }
}
