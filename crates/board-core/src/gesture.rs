//! Drag/Move State Machine
//!
//! One gesture runs `Idle -> Armed -> Dragging -> Resolved -> Idle`.
//! Both input pipelines drive the same machine:
//! - native pointer drag: `start` + `begin_native` on dragstart, `end` on drop/dragend
//! - touch emulation: `start` on touchstart, `move_to` per touchmove (drag
//!   begins once displacement exceeds the threshold), `end` on touchend with
//!   the hit-tested column
//!
//! A gesture resolves exactly once: `end` on a machine that is not armed or
//! dragging is ignored, so a native `drop` followed by `dragend` cannot
//! commit twice.

use crate::domain::VisualColumn;

/// Touch displacement in pixels before a press becomes a drag
pub const DEFAULT_TOUCH_THRESHOLD_PX: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    pub touch_threshold_px: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            touch_threshold_px: DEFAULT_TOUCH_THRESHOLD_PX,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset_from(&self, origin: Point) -> Point {
        Point::new(self.x - origin.x, self.y - origin.y)
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        let d = self.offset_from(other);
        (d.x * d.x + d.y * d.y).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Pointer,
    Touch,
}

/// A column change to persist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveCommit {
    pub task_id: String,
    pub from: VisualColumn,
    pub to: VisualColumn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Dropped on another column
    Commit(MoveCommit),
    /// Dropped back on the source column; nothing to do
    SameColumn,
    /// Released outside every column, or never moved far enough
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GestureState {
    Idle,
    Armed {
        task_id: String,
        source: VisualColumn,
        origin: Point,
        input: InputKind,
    },
    Dragging {
        task_id: String,
        source: VisualColumn,
        origin: Point,
        current: Point,
        input: InputKind,
    },
    Resolved(Resolution),
}

/// What a movement did to the gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureStep {
    /// No gesture in progress
    Ignored,
    /// Still below the threshold
    Pending,
    /// Just crossed the threshold; ghost should appear at this offset
    Began(Point),
    /// Already dragging; ghost follows to this offset
    Dragged(Point),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GestureMachine {
    config: GestureConfig,
    state: GestureState,
}

impl Default for GestureMachine {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl GestureMachine {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            state: GestureState::Idle,
        }
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == GestureState::Idle
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging { .. })
    }

    /// Task of the armed or dragging gesture
    pub fn active_task(&self) -> Option<&str> {
        match &self.state {
            GestureState::Armed { task_id, .. } | GestureState::Dragging { task_id, .. } => Some(task_id),
            _ => None,
        }
    }

    pub fn source_column(&self) -> Option<VisualColumn> {
        match &self.state {
            GestureState::Armed { source, .. } | GestureState::Dragging { source, .. } => Some(*source),
            _ => None,
        }
    }

    /// Input that started the armed or dragging gesture
    pub fn input(&self) -> Option<InputKind> {
        match &self.state {
            GestureState::Armed { input, .. } | GestureState::Dragging { input, .. } => Some(*input),
            _ => None,
        }
    }

    /// Press on a card. A new press replaces whatever was in progress.
    pub fn start(&mut self, task_id: impl Into<String>, source: VisualColumn, at: Point, input: InputKind) {
        self.state = GestureState::Armed {
            task_id: task_id.into(),
            source,
            origin: at,
            input,
        };
    }

    /// The browser already decided this is a drag (native dragstart)
    pub fn begin_native(&mut self) {
        if let GestureState::Armed { task_id, source, origin, input } = &self.state {
            self.state = GestureState::Dragging {
                task_id: task_id.clone(),
                source: *source,
                origin: *origin,
                current: *origin,
                input: *input,
            };
        }
    }

    pub fn move_to(&mut self, at: Point) -> GestureStep {
        match &mut self.state {
            GestureState::Armed { task_id, source, origin, input } => {
                if at.distance_to(*origin) <= self.config.touch_threshold_px {
                    return GestureStep::Pending;
                }
                let offset = at.offset_from(*origin);
                self.state = GestureState::Dragging {
                    task_id: std::mem::take(task_id),
                    source: *source,
                    origin: *origin,
                    current: at,
                    input: *input,
                };
                GestureStep::Began(offset)
            }
            GestureState::Dragging { origin, current, .. } => {
                *current = at;
                GestureStep::Dragged(at.offset_from(*origin))
            }
            _ => GestureStep::Ignored,
        }
    }

    /// Release. `target` is the column under the release point, if any.
    /// Returns `false` when there was no gesture to resolve.
    pub fn end(&mut self, target: Option<VisualColumn>) -> bool {
        let resolution = match &mut self.state {
            GestureState::Armed { .. } => Resolution::Cancelled,
            GestureState::Dragging { task_id, source, .. } => match target {
                None => Resolution::Cancelled,
                Some(to) if to == *source => Resolution::SameColumn,
                Some(to) => Resolution::Commit(MoveCommit {
                    task_id: std::mem::take(task_id),
                    from: *source,
                    to,
                }),
            },
            GestureState::Idle | GestureState::Resolved(_) => return false,
        };
        self.state = GestureState::Resolved(resolution);
        true
    }

    /// Hand out the resolution once and return to `Idle`
    pub fn take_resolution(&mut self) -> Option<Resolution> {
        match std::mem::replace(&mut self.state, GestureState::Idle) {
            GestureState::Resolved(resolution) => Some(resolution),
            other => {
                self.state = other;
                None
            }
        }
    }

    /// `end` followed by `take_resolution`
    pub fn finish(&mut self, target: Option<VisualColumn>) -> Option<Resolution> {
        if self.end(target) {
            self.take_resolution()
        } else {
            None
        }
    }

    /// Abort without side effects
    pub fn cancel(&mut self) {
        self.state = GestureState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch_machine() -> GestureMachine {
        let mut m = GestureMachine::default();
        m.start("task-003", VisualColumn::ToDo, Point::new(100.0, 100.0), InputKind::Touch);
        m
    }

    #[test]
    fn test_input_kind_follows_gesture() {
        let mut m = GestureMachine::default();
        assert_eq!(m.input(), None);
        m.start("task-001", VisualColumn::Done, Point::new(0.0, 0.0), InputKind::Pointer);
        m.begin_native();
        assert_eq!(m.input(), Some(InputKind::Pointer));
        m.finish(Some(VisualColumn::ToDo));
        assert_eq!(m.input(), None);
        assert_eq!(touch_machine().input(), Some(InputKind::Touch));
    }

    #[test]
    fn test_touch_below_threshold_is_a_tap() {
        let mut m = touch_machine();
        assert_eq!(m.move_to(Point::new(104.0, 106.0)), GestureStep::Pending);
        assert!(!m.is_dragging());
        assert_eq!(m.finish(Some(VisualColumn::Done)), Some(Resolution::Cancelled));
        assert!(m.is_idle());
    }

    #[test]
    fn test_touch_drag_commits_to_other_column() {
        let mut m = touch_machine();
        assert_eq!(m.move_to(Point::new(112.0, 100.0)), GestureStep::Began(Point::new(12.0, 0.0)));
        assert_eq!(m.move_to(Point::new(300.0, 140.0)), GestureStep::Dragged(Point::new(200.0, 40.0)));
        let resolution = m.finish(Some(VisualColumn::Done));
        assert_eq!(
            resolution,
            Some(Resolution::Commit(MoveCommit {
                task_id: "task-003".into(),
                from: VisualColumn::ToDo,
                to: VisualColumn::Done,
            }))
        );
        assert!(m.is_idle());
    }

    #[test]
    fn test_drop_on_source_column_resolves_without_commit() {
        let mut m = touch_machine();
        m.move_to(Point::new(150.0, 150.0));
        assert_eq!(m.finish(Some(VisualColumn::ToDo)), Some(Resolution::SameColumn));
    }

    #[test]
    fn test_release_outside_columns_cancels() {
        let mut m = touch_machine();
        m.move_to(Point::new(150.0, 150.0));
        assert_eq!(m.finish(None), Some(Resolution::Cancelled));
    }

    #[test]
    fn test_native_drop_then_dragend_resolves_once() {
        let mut m = GestureMachine::default();
        m.start("task-001", VisualColumn::InProgress, Point::default(), InputKind::Pointer);
        m.begin_native();
        assert!(m.is_dragging());
        assert!(matches!(m.finish(Some(VisualColumn::AwaitFeedback)), Some(Resolution::Commit(_))));
        // dragend fires after drop with no target
        assert_eq!(m.finish(None), None);
        assert!(m.is_idle());
    }

    #[test]
    fn test_move_while_idle_is_ignored() {
        let mut m = GestureMachine::default();
        assert_eq!(m.move_to(Point::new(50.0, 50.0)), GestureStep::Ignored);
        assert!(!m.end(None));
        assert_eq!(m.take_resolution(), None);
    }

    #[test]
    fn test_resolution_waits_until_taken() {
        let mut m = touch_machine();
        m.move_to(Point::new(150.0, 100.0));
        assert!(m.end(Some(VisualColumn::Done)));
        assert!(matches!(m.state(), GestureState::Resolved(_)));
        assert!(m.take_resolution().is_some());
        assert_eq!(m.take_resolution(), None);
    }
}
