//! Drop zone / file picker normaliser.
//!
//! Drag-and-drop and the native picker both collapse into "at most one accepted file".
//! Enter/leave events fire for every child element the pointer crosses, so the zone
//! keeps a depth counter and only leaves `DragOver` when the outermost leave arrives.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropzoneState {
    Idle,
    DragOver,
    FileAccepted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropzoneInput<F> {
    DragEnter,
    DragOver,
    DragLeave,
    Drop(Vec<F>),
    PickerChanged(Vec<F>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropzoneOutput<F> {
    pub state: DropzoneState,
    /// Whether the highlighted border style applies
    pub highlight: bool,
    /// Whether the browser's default handling must be suppressed
    pub prevent_default: bool,
    /// First file of a drop or selection; the rest are discarded
    pub accepted: Option<F>,
}

#[derive(Debug, Clone)]
pub struct Dropzone {
    state: DropzoneState,
    depth: u32,
}

impl Default for Dropzone {
    fn default() -> Self {
        Self::new()
    }
}

impl Dropzone {
    pub fn new() -> Self {
        Self {
            state: DropzoneState::Idle,
            depth: 0,
        }
    }

    pub fn state(&self) -> DropzoneState {
        self.state
    }

    pub fn handle<F>(&mut self, input: DropzoneInput<F>) -> DropzoneOutput<F> {
        match input {
            DropzoneInput::DragEnter => {
                self.depth += 1;
                self.state = DropzoneState::DragOver;
                self.output(true, None)
            }
            DropzoneInput::DragOver => {
                if self.depth == 0 {
                    self.depth = 1;
                    self.state = DropzoneState::DragOver;
                }
                self.output(true, None)
            }
            DropzoneInput::DragLeave => {
                self.depth = self.depth.saturating_sub(1);
                if self.depth == 0 && self.state == DropzoneState::DragOver {
                    self.state = DropzoneState::Idle;
                }
                self.output(true, None)
            }
            DropzoneInput::Drop(files) => {
                self.depth = 0;
                let accepted = self.accept(files);
                self.output(true, accepted)
            }
            DropzoneInput::PickerChanged(files) => {
                self.depth = 0;
                let accepted = self.accept(files);
                self.output(false, accepted)
            }
        }
    }

    fn accept<F>(&mut self, files: Vec<F>) -> Option<F> {
        let first = files.into_iter().next();
        self.state = if first.is_some() {
            DropzoneState::FileAccepted
        } else {
            DropzoneState::Idle
        };
        first
    }

    fn output<F>(&self, prevent_default: bool, accepted: Option<F>) -> DropzoneOutput<F> {
        DropzoneOutput {
            state: self.state,
            highlight: self.state == DropzoneState::DragOver,
            prevent_default,
            accepted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_highlights_and_leave_restores() {
        let mut zone = Dropzone::new();
        let out = zone.handle::<()>(DropzoneInput::DragEnter);
        assert_eq!(out.state, DropzoneState::DragOver);
        assert!(out.highlight);
        assert!(out.prevent_default);

        let out = zone.handle::<()>(DropzoneInput::DragLeave);
        assert_eq!(out.state, DropzoneState::Idle);
        assert!(!out.highlight);
    }

    #[test]
    fn nested_children_keep_highlight() {
        let mut zone = Dropzone::new();
        zone.handle::<()>(DropzoneInput::DragEnter);
        zone.handle::<()>(DropzoneInput::DragEnter);
        let out = zone.handle::<()>(DropzoneInput::DragLeave);
        assert!(out.highlight);
        let out = zone.handle::<()>(DropzoneInput::DragLeave);
        assert!(!out.highlight);
    }

    #[test]
    fn multi_file_drop_accepts_first_only() {
        let mut zone = Dropzone::new();
        zone.handle(DropzoneInput::<&str>::DragEnter);
        let out = zone.handle(DropzoneInput::Drop(vec!["a.pdf", "b.pdf", "c.pdf"]));
        assert_eq!(out.accepted, Some("a.pdf"));
        assert_eq!(out.state, DropzoneState::FileAccepted);
        assert!(!out.highlight);
        assert!(out.prevent_default);
    }

    #[test]
    fn empty_drop_accepts_nothing() {
        let mut zone = Dropzone::new();
        let out = zone.handle(DropzoneInput::<&str>::Drop(vec![]));
        assert_eq!(out.accepted, None);
        assert_eq!(out.state, DropzoneState::Idle);
        assert!(out.prevent_default);
    }

    #[test]
    fn picker_selection_accepts_first() {
        let mut zone = Dropzone::new();
        let out = zone.handle(DropzoneInput::PickerChanged(vec![1, 2]));
        assert_eq!(out.accepted, Some(1));
        assert!(!out.prevent_default);
    }

    #[test]
    fn accepted_zone_can_be_dragged_over_again() {
        let mut zone = Dropzone::new();
        zone.handle(DropzoneInput::Drop(vec!["a"]));
        let out = zone.handle::<&str>(DropzoneInput::DragEnter);
        assert_eq!(out.state, DropzoneState::DragOver);
    }
}
