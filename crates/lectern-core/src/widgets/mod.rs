// ── Homepage widgets ──

pub mod customizer;
pub mod drag;
pub mod layout;

pub use customizer::{CustomizerState, CustomizerStatus, HomepageCustomizer};
pub use drag::{DragSession, Reorder};
pub use layout::WidgetLayout;
