// ── Domain model ──
//
// Typed records for every admin collection plus the homepage widget and
// category shapes. Deserialization is tolerant of the backend's loose
// encodings; see `lenient`.

pub mod announcement;
pub mod book;
pub mod category;
pub mod donation;
pub mod entity_id;
pub mod event;
mod lenient;
pub mod menu;
pub mod post;
pub mod prayer_request;
pub mod role;
pub mod sermon;
pub mod user;
pub mod widget;

pub use announcement::{Announcement, AnnouncementForm};
pub use book::{Book, BookForm};
pub use category::{Category, CategoryForm, CategoryType};
pub use donation::{Donation, DonationForm};
pub use entity_id::EntityId;
pub use event::{Event, EventForm};
pub use menu::{Menu, MenuForm, MenuItem, MenuItemType};
pub use post::{Post, PostForm};
pub use prayer_request::{PrayerRequest, PrayerRequestForm};
pub use role::{Role, RoleForm};
pub use sermon::{Sermon, SermonForm};
pub use user::{User, UserForm};
pub use widget::{SettingValue, WidgetDescriptor, WidgetSettings};
