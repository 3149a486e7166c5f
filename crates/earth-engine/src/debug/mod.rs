pub mod panel;

pub use panel::{control, ControlKind, PanelControl, Tweak, TweakError, CONTROLS};
