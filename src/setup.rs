/*
 * Creation options of the concrete hosts. Plain structs with defaults that
 * produce a usable host; they are consumed once, when the host creates its
 * native object, and are read-only afterwards.
 *
 * Positions and sizes are given at 96 DPI and scaled to the system DPI when
 * the native object is created.
 */

use crate::constants::{
    COLOR_BTNFACE, CS_DBLCLKS, IDC_ARROW, USER_DEFAULT_SCREEN_DPI, WS_BORDER, WS_CAPTION,
    WS_CHILD, WS_CLIPCHILDREN, WS_CLIPSIBLINGS, WS_EX_DLGMODALFRAME, WS_EX_TOOLWINDOW, WS_GROUP,
    WS_SYSMENU, WS_TABSTOP, WS_VISIBLE,
};
use crate::error::{PlatformError, Result as PlatformResult};
use crate::types::{NativeHandle, Point, Rect, Size};

/// Vertical offset of a modeless window below its parent's top edge.
const MODELESS_TOP_OFFSET: i32 = 34;

/// Class cursor of a window host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    /// Predefined system cursor (`IDC_*`).
    System(u16),
    /// Cursor resource in the executable.
    Resource(u16),
}

impl Default for Cursor {
    fn default() -> Self {
        Cursor::System(IDC_ARROW)
    }
}

impl Cursor {
    /// Short tag folded into generated class names.
    fn class_tag(self) -> String {
        match self {
            Cursor::System(id) => format!("s{id:x}"),
            Cursor::Resource(id) => format!("r{id:x}"),
        }
    }
}

/// `MulDiv(value, dpi, 96)`: rounds half away from zero.
pub fn scale_for_dpi(value: i32, dpi: i32) -> i32 {
    let product = value as i64 * dpi as i64;
    let base = USER_DEFAULT_SCREEN_DPI as i64;
    let half = base / 2;
    let rounded = if product >= 0 {
        (product + half) / base
    } else {
        (product - half) / base
    };
    rounded as i32
}

pub fn scale_size(size: Size, dpi: i32) -> Size {
    Size {
        cx: scale_for_dpi(size.cx, dpi),
        cy: scale_for_dpi(size.cy, dpi),
    }
}

pub fn scale_point(point: Point, dpi: i32) -> Point {
    Point {
        x: scale_for_dpi(point.x, dpi),
        y: scale_for_dpi(point.y, dpi),
    }
}

/// Top-left corner that centers a window of `size` over `parent` (screen
/// coordinates).
pub fn centered_over(parent: Rect, size: Size) -> Point {
    Point {
        x: parent.left + parent.width() / 2 - size.cx / 2,
        y: parent.top + parent.height() / 2 - size.cy / 2,
    }
}

/// Default placement of a modeless window: flush with the parent's right
/// edge, just below its caption.
pub fn modeless_origin(parent: Rect, size: Size) -> Point {
    Point {
        x: parent.right - size.cx,
        y: parent.top + MODELESS_TOP_OFFSET,
    }
}

/// Options of the window hosts (`WindowMain`, `WindowModal`, `WindowModeless`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSetup {
    /// Window class name; generated from the class options when empty.
    pub class_name: String,
    pub class_style: u32,
    /// Icon resource id in the executable; 0 for none.
    pub icon_id: u16,
    /// `None` is the arrow.
    pub cursor: Option<Cursor>,
    /// System color index used for the class background brush.
    pub background: i32,
    pub title: String,
    pub style: u32,
    pub ex_style: u32,
    /// Top-left corner; `None` centers a main window on the screen, a modal
    /// window over its parent, and puts a modeless window at the parent's
    /// top-right corner.
    pub pos: Option<Point>,
    pub size: Size,
    /// Menu bar of a main window.
    pub menu: Option<NativeHandle>,
    /// Accelerator table serviced by a main window's loop.
    pub accelerators: Option<NativeHandle>,
}

impl Default for WindowSetup {
    fn default() -> Self {
        WindowSetup {
            class_name: String::new(),
            class_style: CS_DBLCLKS,
            icon_id: 0,
            cursor: None,
            background: COLOR_BTNFACE,
            title: String::new(),
            style: WS_CAPTION | WS_SYSMENU | WS_CLIPCHILDREN | WS_BORDER,
            ex_style: 0,
            pos: None,
            size: Size { cx: 600, cy: 500 },
            menu: None,
            accelerators: None,
        }
    }
}

impl WindowSetup {
    /// Defaults for a modeless tool window.
    pub fn modeless() -> Self {
        WindowSetup {
            style: WS_CAPTION | WS_CLIPCHILDREN | WS_BORDER | WS_VISIBLE,
            ex_style: WS_EX_TOOLWINDOW,
            size: Size { cx: 300, cy: 200 },
            ..Self::default()
        }
    }

    /// Defaults for a modal popup window.
    pub fn modal() -> Self {
        WindowSetup {
            style: WS_CAPTION | WS_SYSMENU | WS_CLIPCHILDREN | WS_BORDER | WS_VISIBLE,
            ex_style: WS_EX_DLGMODALFRAME,
            size: Size { cx: 500, cy: 400 },
            ..Self::default()
        }
    }

    pub fn effective_cursor(&self) -> Cursor {
        self.cursor.unwrap_or_default()
    }

    /// The class name to register: the chosen one, or one derived from the
    /// class options.
    pub fn effective_class_name(&self) -> String {
        if self.class_name.is_empty() {
            format!(
                "lambdawnd.{:x}.{:x}.{}.{:x}",
                self.class_style,
                self.icon_id,
                self.effective_cursor().class_tag(),
                self.background
            )
        } else {
            self.class_name.clone()
        }
    }
}

/// Options of the dialog hosts; the template comes from the executable's
/// resources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogSetup {
    /// Dialog template resource id; required.
    pub dialog_id: u16,
    /// Icon resource id (main dialog only); 0 for none.
    pub icon_id: u16,
    /// Accelerator table serviced by a main dialog's loop.
    pub accelerators: Option<NativeHandle>,
}

impl DialogSetup {
    pub fn new(dialog_id: u16) -> Self {
        DialogSetup {
            dialog_id,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> PlatformResult<()> {
        if self.dialog_id == 0 {
            return Err(PlatformError::InvalidState(
                "no dialog template resource id was set".into(),
            ));
        }
        Ok(())
    }
}

/// Options of a custom child-window control (`WindowControl`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlSetup {
    pub class_name: String,
    pub class_style: u32,
    /// `None` is the arrow.
    pub cursor: Option<Cursor>,
    pub background: i32,
    pub pos: Point,
    pub size: Size,
    pub style: u32,
    pub ex_style: u32,
}

impl Default for ControlSetup {
    fn default() -> Self {
        ControlSetup {
            class_name: String::new(),
            class_style: CS_DBLCLKS,
            cursor: None,
            background: COLOR_BTNFACE,
            pos: Point::default(),
            size: Size { cx: 100, cy: 100 },
            style: WS_CHILD | WS_TABSTOP | WS_GROUP | WS_VISIBLE | WS_CLIPCHILDREN | WS_CLIPSIBLINGS,
            ex_style: 0,
        }
    }
}

impl ControlSetup {
    pub fn effective_cursor(&self) -> Cursor {
        self.cursor.unwrap_or_default()
    }

    pub fn effective_class_name(&self) -> String {
        if self.class_name.is_empty() {
            format!(
                "lambdawnd.ctl.{:x}.{}.{:x}",
                self.class_style,
                self.effective_cursor().class_tag(),
                self.background
            )
        } else {
            self.class_name.clone()
        }
    }

    pub fn validate(&self) -> PlatformResult<()> {
        if self.style & WS_CHILD == 0 {
            return Err(PlatformError::InvalidState(
                "a control must have the WS_CHILD style".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialog_without_template_is_rejected() {
        assert!(matches!(
            DialogSetup::default().validate(),
            Err(PlatformError::InvalidState(_))
        ));
        assert_eq!(DialogSetup::new(101).validate(), Ok(()));
    }

    #[test]
    fn class_name_is_generated_only_when_empty() {
        let generated = WindowSetup::default().effective_class_name();
        assert_eq!(generated, WindowSetup::default().effective_class_name());
        assert!(generated.starts_with("lambdawnd."));

        let named = WindowSetup {
            class_name: "MyApp.Main".into(),
            ..WindowSetup::default()
        };
        assert_eq!(named.effective_class_name(), "MyApp.Main");
        assert_ne!(
            ControlSetup::default().effective_class_name(),
            generated
        );
    }

    #[test]
    fn main_window_is_centered_on_the_screen() {
        let screen = Rect {
            left: 0,
            top: 0,
            right: 1920,
            bottom: 1080,
        };
        let pos = centered_over(screen, WindowSetup::default().size);
        assert_eq!(pos, Point { x: 660, y: 290 });
    }

    #[test]
    fn modeless_defaults_are_a_visible_tool_window() {
        let setup = WindowSetup::modeless();
        assert_ne!(setup.style & WS_VISIBLE, 0);
        assert_eq!(setup.ex_style, WS_EX_TOOLWINDOW);
        assert_eq!(setup.size, Size { cx: 300, cy: 200 });
    }

    #[test]
    fn cursor_is_part_of_the_generated_class_name() {
        let arrow = WindowSetup::default();
        assert_eq!(arrow.effective_cursor(), Cursor::System(IDC_ARROW));
        let explicit_arrow = WindowSetup {
            cursor: Some(Cursor::System(IDC_ARROW)),
            ..WindowSetup::default()
        };
        assert_eq!(arrow.effective_class_name(), explicit_arrow.effective_class_name());

        let hand = WindowSetup {
            cursor: Some(Cursor::System(32649)),
            ..WindowSetup::default()
        };
        let custom = WindowSetup {
            cursor: Some(Cursor::Resource(32649)),
            ..WindowSetup::default()
        };
        assert_ne!(hand.effective_class_name(), arrow.effective_class_name());
        assert_ne!(hand.effective_class_name(), custom.effective_class_name());

        let control = ControlSetup {
            cursor: Some(Cursor::Resource(7)),
            ..ControlSetup::default()
        };
        assert_ne!(
            control.effective_class_name(),
            ControlSetup::default().effective_class_name()
        );
    }

    #[test]
    fn dpi_scaling_rounds_like_muldiv() {
        assert_eq!(scale_for_dpi(500, 96), 500);
        assert_eq!(scale_for_dpi(500, 144), 750);
        assert_eq!(scale_for_dpi(3, 120), 4);
        assert_eq!(scale_for_dpi(1, 144), 2);
        assert_eq!(scale_for_dpi(-1, 144), -2);
        assert_eq!(scale_for_dpi(0, 192), 0);
        assert_eq!(
            scale_size(Size { cx: 300, cy: 200 }, 120),
            Size { cx: 375, cy: 250 }
        );
        assert_eq!(
            scale_point(Point { x: 10, y: -10 }, 192),
            Point { x: 20, y: -20 }
        );
    }

    #[test]
    fn modal_is_centered_over_its_parent() {
        let parent = Rect {
            left: 100,
            top: 50,
            right: 900,
            bottom: 650,
        };
        let pos = centered_over(parent, Size { cx: 500, cy: 400 });
        assert_eq!(pos, Point { x: 250, y: 150 });

        let setup = WindowSetup::modal();
        assert_eq!(setup.ex_style, WS_EX_DLGMODALFRAME);
        assert_ne!(setup.style & WS_VISIBLE, 0);
    }

    #[test]
    fn modeless_sits_at_the_parent_top_right() {
        let parent = Rect {
            left: 100,
            top: 50,
            right: 900,
            bottom: 650,
        };
        let pos = modeless_origin(parent, Size { cx: 300, cy: 200 });
        assert_eq!(pos, Point { x: 600, y: 84 });
    }

    #[test]
    fn control_requires_child_style() {
        assert_eq!(ControlSetup::default().validate(), Ok(()));
        let popup = ControlSetup {
            style: WS_VISIBLE,
            ..ControlSetup::default()
        };
        assert!(popup.validate().is_err());
    }
}
