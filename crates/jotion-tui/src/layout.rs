//! Sidebar/navbar geometry controller.
//!
//! The controller owns the sidebar's collapsed/expanded state and the width
//! of the sidebar while it is dragged, and keeps the navbar next to it. All
//! sizes are in abstract pixel units; the renderer decides how many units a
//! terminal cell is worth.
//!
//! Geometry is written through [`LayoutController::geometry`] as [`Extent`]
//! values resolved against the viewport at draw time, so the high-frequency
//! pointer-move path only touches three numbers.
//!
//! Transitions set `resetting` for [`RESET_DURATION`] so the renderer can
//! animate. Each transition schedules its own clear and none are cancelled;
//! an older deadline may end `resetting` early, which only shortens the
//! animation.

use std::time::{Duration, Instant};

pub const MIN_WIDTH: u16 = 240;
pub const MAX_WIDTH: u16 = 480;
pub const DEFAULT_WIDTH: u16 = 240;
/// Viewports at or below this width use the mobile layout.
pub const MOBILE_BREAKPOINT: u16 = 768;
pub const RESET_DURATION: Duration = Duration::from_millis(300);

pub fn is_mobile_width(width: u16) -> bool {
    width <= MOBILE_BREAKPOINT
}

/// A length relative to the viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extent {
    Zero,
    Fixed(u16),
    /// The whole viewport.
    Full,
    /// The viewport minus a fixed amount.
    FullMinus(u16),
}

impl Extent {
    pub fn resolve(self, viewport: u16) -> u16 {
        match self {
            Extent::Zero => 0,
            Extent::Fixed(n) => n.min(viewport),
            Extent::Full => viewport,
            Extent::FullMinus(n) => viewport.saturating_sub(n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub sidebar_width: Extent,
    pub navbar_left: Extent,
    pub navbar_width: Extent,
}

impl Geometry {
    /// What the elements look like before any transition ran.
    fn initial(is_mobile: bool) -> Self {
        if is_mobile {
            Self::collapsed()
        } else {
            Self::with_sidebar(DEFAULT_WIDTH)
        }
    }

    fn collapsed() -> Self {
        Self {
            sidebar_width: Extent::Zero,
            navbar_left: Extent::Zero,
            navbar_width: Extent::Full,
        }
    }

    fn expanded(is_mobile: bool) -> Self {
        if is_mobile {
            // Sidebar takes the screen, navbar is pushed off the right edge
            Self {
                sidebar_width: Extent::Full,
                navbar_left: Extent::Full,
                navbar_width: Extent::Zero,
            }
        } else {
            Self::with_sidebar(DEFAULT_WIDTH)
        }
    }

    fn with_sidebar(width: u16) -> Self {
        Self {
            sidebar_width: Extent::Fixed(width),
            navbar_left: Extent::Fixed(width),
            navbar_width: Extent::FullMinus(width),
        }
    }

    pub fn resolve(&self, viewport: u16) -> ResolvedGeometry {
        ResolvedGeometry {
            sidebar_width: self.sidebar_width.resolve(viewport),
            navbar_left: self.navbar_left.resolve(viewport),
            navbar_width: self.navbar_width.resolve(viewport),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedGeometry {
    pub sidebar_width: u16,
    pub navbar_left: u16,
    pub navbar_width: u16,
}

/// Pointer-down delivered to the resize handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub x: u16,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl PointerEvent {
    pub fn new(x: u16) -> Self {
        Self {
            x,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutState {
    pub collapsed: bool,
    pub resetting: bool,
    pub resizing: bool,
}

#[derive(Debug, Default)]
pub struct LayoutController {
    state: LayoutState,
    is_mobile: bool,
    viewport_width: u16,
    /// `None` until the sidebar and navbar have been rendered.
    geometry: Option<Geometry>,
    /// Set while a drag owns every pointer move/up, wherever it happens.
    pointer_capture: bool,
    reset_deadlines: Vec<Instant>,
}

impl LayoutController {
    pub fn new() -> Self {
        Self::default()
    }

    /// The sidebar and navbar exist now; apply the layout for the viewport.
    pub fn mount(&mut self, viewport_width: u16, now: Instant) {
        let is_mobile = is_mobile_width(viewport_width);

        self.viewport_width = viewport_width;
        self.is_mobile = is_mobile;
        self.state.collapsed = is_mobile;
        self.geometry = Some(Geometry::initial(is_mobile));

        if is_mobile {
            self.collapse(now);
        } else {
            self.reset_width(now);
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.geometry.is_some()
    }

    pub fn state(&self) -> &LayoutState {
        &self.state
    }

    pub fn is_collapsed(&self) -> bool {
        self.state.collapsed
    }

    pub fn is_resetting(&self) -> bool {
        self.state.resetting
    }

    pub fn is_resizing(&self) -> bool {
        self.state.resizing
    }

    pub fn is_mobile(&self) -> bool {
        self.is_mobile
    }

    pub fn viewport_width(&self) -> u16 {
        self.viewport_width
    }

    pub fn captures_pointer(&self) -> bool {
        self.pointer_capture
    }

    pub fn geometry(&self) -> Option<Geometry> {
        self.geometry
    }

    pub fn resolved(&self) -> Option<ResolvedGeometry> {
        self.geometry.map(|g| g.resolve(self.viewport_width))
    }

    /// Track the viewport width, switching layouts when the breakpoint is crossed.
    pub fn on_viewport_resize(&mut self, width: u16, now: Instant) {
        if !self.is_mounted() {
            return;
        }

        self.viewport_width = width;

        let is_mobile = is_mobile_width(width);
        if is_mobile != self.is_mobile {
            self.on_viewport_mode_change(is_mobile, now);
        }
    }

    pub fn on_viewport_mode_change(&mut self, is_mobile: bool, now: Instant) {
        if !self.is_mounted() {
            return;
        }

        self.is_mobile = is_mobile;
        if is_mobile {
            self.collapse(now);
        } else {
            self.reset_width(now);
        }
    }

    /// Navigating on mobile hides the sidebar.
    pub fn on_route_change(&mut self, now: Instant) {
        if self.is_mobile {
            self.collapse(now);
        }
    }

    /// Start a drag from the resize handle. The event is consumed.
    pub fn begin_resize(&mut self, event: &mut PointerEvent) {
        if !self.is_mounted() {
            return;
        }

        event.prevent_default();
        event.stop_propagation();

        self.state.resizing = true;
        self.pointer_capture = true;
    }

    pub fn on_pointer_move(&mut self, pointer_x: u16) {
        if !self.state.resizing {
            return;
        }
        let Some(geometry) = self.geometry.as_mut() else {
            return;
        };

        let width = pointer_x.clamp(MIN_WIDTH, MAX_WIDTH);
        *geometry = Geometry::with_sidebar(width);
    }

    /// Finish a drag. Returns whether pointer capture was released by this call.
    pub fn end_resize(&mut self) -> bool {
        self.state.resizing = false;
        std::mem::replace(&mut self.pointer_capture, false)
    }

    pub fn collapse(&mut self, now: Instant) {
        let Some(geometry) = self.geometry.as_mut() else {
            return;
        };

        self.state.collapsed = true;
        self.state.resetting = true;
        *geometry = Geometry::collapsed();
        self.reset_deadlines.push(now + RESET_DURATION);
    }

    pub fn reset_width(&mut self, now: Instant) {
        let Some(geometry) = self.geometry.as_mut() else {
            return;
        };

        self.state.collapsed = false;
        self.state.resetting = true;
        *geometry = Geometry::expanded(self.is_mobile);
        self.reset_deadlines.push(now + RESET_DURATION);
    }

    /// Fire every reset timer due at `now`. Returns true if `resetting` was cleared.
    pub fn tick(&mut self, now: Instant) -> bool {
        let before = self.reset_deadlines.len();
        self.reset_deadlines.retain(|deadline| *deadline > now);

        if self.reset_deadlines.len() == before {
            return false;
        }

        let was_resetting = self.state.resetting;
        self.state.resetting = false;
        was_resetting
    }
}
