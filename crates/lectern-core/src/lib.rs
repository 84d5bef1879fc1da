//! Screen-level state for the church platform back office.
//!
//! Sits between `lectern-api` and front ends (the `lectern` CLI today):
//!
//! - **[`Backoffice`]**: facade built from a [`ClientConfig`]; vends one
//!   store per admin screen.
//!
//! - **[`ResourceStore<R>`]**: paginated list plus create/edit form, delete
//!   and status actions for any [`Resource`]. State lives in a
//!   `tokio::sync::watch` channel; overlapping list calls resolve
//!   last-request-wins.
//!
//! - **[`HomepageCustomizer`]**: ordered homepage widget layout with
//!   toggle/reorder/settings edits, drag sessions, guarded publish and reset.
//!
//! - **[`CategoryManager`]**: arena-backed category tree with type-inheriting
//!   child creation, descendant-safe parent pickers and cascade-aware delete.
//!
//! - **Domain model** ([`model`]): typed records and forms for every
//!   collection, tolerant of the backend's loose JSON encodings.

pub mod backoffice;
pub mod category;
pub mod config;
pub mod confirm;
pub mod error;
pub mod model;
pub mod ordering;
pub mod resource;
pub mod store;
pub mod widgets;

// ── Primary re-exports ──────────────────────────────────────────────
pub use backoffice::Backoffice;
pub use category::{CategoryManager, CategoryTree, ParentOption};
pub use config::{ClientConfig, TlsVerification};
pub use confirm::{AutoConfirm, Confirm};
pub use error::CoreError;
pub use resource::{FormMode, Resource, ResourceForm};
pub use store::{Alert, AlertKind, ListOutcome, ResourceStore, StoreState, SubmitOutcome};
pub use widgets::{CustomizerStatus, DragSession, HomepageCustomizer, WidgetLayout};

pub use model::{
    Announcement, AnnouncementForm, Book, BookForm, Category, CategoryForm, CategoryType,
    Donation, DonationForm, EntityId, Event, EventForm, Menu, MenuForm, MenuItem, MenuItemType,
    Post, PostForm, PrayerRequest, PrayerRequestForm, Role, RoleForm, Sermon, SermonForm,
    SettingValue, User, UserForm, WidgetDescriptor,
};

pub use lectern_api::{CategoryView, FilePart, PageMeta};
