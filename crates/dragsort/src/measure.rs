#![forbid(unsafe_code)]

//! Geometry provider seam.
//!
//! The engine never touches a rendering tree. It asks the host for element
//! rectangles through [`GeometryProvider`] and tolerates failures: an element
//! that cannot be measured is skipped for the current pass and reported
//! through the diagnostics hook.

use std::fmt;

use bitflags::bitflags;
use dragsort_core::geometry::{Point, Rect};
use dragsort_core::warn;

use crate::container::ContainerKey;
use crate::item::ItemKey;

/// Something the engine may ask the host to measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Element {
    Container(ContainerKey),
    Item(ItemKey),
}

bitflags! {
    /// Axes along which a container's content can scroll.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ScrollAxes: u8 {
        const HORIZONTAL = 0b01;
        const VERTICAL = 0b10;
        const BOTH = Self::HORIZONTAL.bits() | Self::VERTICAL.bits();
    }
}

/// Why a measurement could not be used.
#[derive(Debug, Clone, PartialEq)]
pub enum MeasureError {
    /// The host could not produce a rect (detached, hidden, not yet laid out).
    Unavailable { reason: String },
    /// The host produced a rect with non-finite values or negative size.
    Degenerate { rect: Rect },
}

impl MeasureError {
    /// Convenience constructor for [`MeasureError::Unavailable`].
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for MeasureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable { reason } => write!(f, "element unavailable: {reason}"),
            Self::Degenerate { rect } => write!(f, "degenerate rect {rect:?}"),
        }
    }
}

impl std::error::Error for MeasureError {}

/// Host-side geometry source.
///
/// All rects are client-space. `measure` is called at drag start and on first
/// entry into a sibling container, never on every pointer move.
pub trait GeometryProvider {
    /// Current bounding rect of `element`.
    fn measure(&self, element: Element) -> Result<Rect, MeasureError>;

    /// Rect of the scrollable page viewport, if the host has one.
    fn viewport(&self) -> Option<Rect> {
        None
    }

    /// Current page scroll position.
    fn viewport_scroll(&self) -> Point {
        Point::ZERO
    }

    /// Axes along which `container` itself scrolls.
    fn scroll_axes(&self, _container: ContainerKey) -> ScrollAxes {
        ScrollAxes::empty()
    }
}

impl<G: GeometryProvider + ?Sized> GeometryProvider for &G {
    fn measure(&self, element: Element) -> Result<Rect, MeasureError> {
        (**self).measure(element)
    }

    fn viewport(&self) -> Option<Rect> {
        (**self).viewport()
    }

    fn viewport_scroll(&self) -> Point {
        (**self).viewport_scroll()
    }

    fn scroll_axes(&self, container: ContainerKey) -> ScrollAxes {
        (**self).scroll_axes(container)
    }
}

/// A skipped measurement, handed to the diagnostics hook.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub element: Element,
    pub error: MeasureError,
}

/// Callback receiving measurement anomalies.
pub type DiagnosticsHook = Box<dyn FnMut(&Diagnostic)>;

/// Routes measurement anomalies to the log and the optional host hook.
#[derive(Default)]
pub(crate) struct DiagnosticsSink {
    hook: Option<DiagnosticsHook>,
    reported: u64,
}

impl fmt::Debug for DiagnosticsSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticsSink")
            .field("hook", &self.hook.as_ref().map(|_| ".."))
            .field("reported", &self.reported)
            .finish()
    }
}

impl DiagnosticsSink {
    pub(crate) fn set_hook(&mut self, hook: Option<DiagnosticsHook>) {
        self.hook = hook;
    }

    pub(crate) fn reported(&self) -> u64 {
        self.reported
    }

    pub(crate) fn report(&mut self, diagnostic: Diagnostic) {
        warn!(element = ?diagnostic.element, error = %diagnostic.error, "skipping unmeasurable element");
        self.reported += 1;
        if let Some(hook) = self.hook.as_mut() {
            hook(&diagnostic);
        }
    }

    /// Measure `element`, rejecting degenerate rects. Failures are reported
    /// and yield `None`.
    pub(crate) fn measure<G: GeometryProvider + ?Sized>(
        &mut self,
        geometry: &G,
        element: Element,
    ) -> Option<Rect> {
        let result = geometry.measure(element).and_then(|rect| {
            if rect.is_degenerate() {
                Err(MeasureError::Degenerate { rect })
            } else {
                Ok(rect)
            }
        });
        match result {
            Ok(rect) => Some(rect),
            Err(error) => {
                self.report(Diagnostic { element, error });
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Fixed(Result<Rect, MeasureError>);

    impl GeometryProvider for Fixed {
        fn measure(&self, _element: Element) -> Result<Rect, MeasureError> {
            self.0.clone()
        }
    }

    #[test]
    fn measure_passes_valid_rects() {
        let mut sink = DiagnosticsSink::default();
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let got = sink.measure(&Fixed(Ok(rect)), Element::Item(ItemKey(1)));
        assert_eq!(got, Some(rect));
        assert_eq!(sink.reported(), 0);
    }

    #[test]
    fn degenerate_rect_is_reported_and_skipped() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let mut sink = DiagnosticsSink::default();
        sink.set_hook(Some(Box::new(move |d: &Diagnostic| {
            log.borrow_mut().push(d.clone());
        })));

        let bad = Rect::new(0.0, f32::NAN, 10.0, 10.0);
        let got = sink.measure(&Fixed(Ok(bad)), Element::Container(ContainerKey(2)));
        assert_eq!(got, None);
        assert_eq!(sink.reported(), 1);
        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].element, Element::Container(ContainerKey(2)));
        assert!(matches!(seen[0].error, MeasureError::Degenerate { .. }));
    }

    #[test]
    fn provider_error_is_reported() {
        let mut sink = DiagnosticsSink::default();
        let got = sink.measure(
            &Fixed(Err(MeasureError::unavailable("detached"))),
            Element::Item(ItemKey(5)),
        );
        assert_eq!(got, None);
        assert_eq!(sink.reported(), 1);
        assert_eq!(
            MeasureError::unavailable("detached").to_string(),
            "element unavailable: detached"
        );
    }

    #[test]
    fn scroll_axes_flags() {
        assert!(ScrollAxes::BOTH.contains(ScrollAxes::VERTICAL));
        assert!(ScrollAxes::default().is_empty());
    }
}
