//! Lifecycle points.
//!
//! The fixed set of named moments in request processing at which
//! registered hooks may run. The order here is the firing order the
//! dispatcher guarantees; the two framework points bracket the whole
//! process rather than a single request.

use thiserror::Error;

/// A named moment in request processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum LifecyclePoint {
    /// Process bootstrap, before any request is dispatched.
    FrameworkStart = 1,
    /// Before the route registry is consulted.
    BeforeRouting = 2,
    /// After matching, with the match (or route-not-found data).
    RouteMatched = 3,
    /// Before the handler's owner is resolved.
    BeforeControllerLoad = 4,
    /// After the handler's owner is resolved.
    AfterControllerLoad = 5,
    /// Immediately before the handler runs.
    BeforeActionExecute = 6,
    /// Immediately after the handler returns.
    AfterActionExecute = 7,
    /// Before the view is rendered (skipped when no view was requested).
    BeforeViewRender = 8,
    /// After the view is rendered (skipped when no view was requested).
    AfterViewRender = 9,
    /// Process shutdown.
    FrameworkShutdown = 10,
}

impl LifecyclePoint {
    /// Returns the point's snake_case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FrameworkStart => "framework_start",
            Self::BeforeRouting => "before_routing",
            Self::RouteMatched => "route_matched",
            Self::BeforeControllerLoad => "before_controller_load",
            Self::AfterControllerLoad => "after_controller_load",
            Self::BeforeActionExecute => "before_action_execute",
            Self::AfterActionExecute => "after_action_execute",
            Self::BeforeViewRender => "before_view_render",
            Self::AfterViewRender => "after_view_render",
            Self::FrameworkShutdown => "framework_shutdown",
        }
    }

    /// Returns all points in firing order.
    #[must_use]
    pub const fn all() -> [Self; 10] {
        [
            Self::FrameworkStart,
            Self::BeforeRouting,
            Self::RouteMatched,
            Self::BeforeControllerLoad,
            Self::AfterControllerLoad,
            Self::BeforeActionExecute,
            Self::AfterActionExecute,
            Self::BeforeViewRender,
            Self::AfterViewRender,
            Self::FrameworkShutdown,
        ]
    }
}

impl std::fmt::Display for LifecyclePoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown lifecycle point name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown lifecycle point: {0}")]
pub struct UnknownPoint(
    /// The name that failed to parse.
    pub String,
);

impl std::str::FromStr for LifecyclePoint {
    type Err = UnknownPoint;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|point| point.as_str() == s)
            .ok_or_else(|| UnknownPoint(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_firing_order() {
        let all = LifecyclePoint::all();
        for window in all.windows(2) {
            assert!(window[0] < window[1]);
        }
        assert_eq!(all[0], LifecyclePoint::FrameworkStart);
        assert_eq!(all[9], LifecyclePoint::FrameworkShutdown);
    }

    #[test]
    fn test_names_round_trip() {
        for point in LifecyclePoint::all() {
            assert_eq!(LifecyclePoint::from_str(point.as_str()), Ok(point));
        }
    }

    #[test]
    fn test_unknown_name_rejected() {
        assert_eq!(
            LifecyclePoint::from_str("before_everything"),
            Err(UnknownPoint("before_everything".to_string()))
        );
    }

    #[test]
    fn test_routing_points_bracket_handler_points() {
        assert!(LifecyclePoint::BeforeRouting < LifecyclePoint::RouteMatched);
        assert!(LifecyclePoint::RouteMatched < LifecyclePoint::BeforeActionExecute);
        assert!(LifecyclePoint::AfterActionExecute < LifecyclePoint::BeforeViewRender);
    }
}
