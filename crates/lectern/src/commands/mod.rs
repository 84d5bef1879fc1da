//! Command dispatch: bridges CLI args -> core stores -> output formatting.

pub mod categories;
pub mod config_cmd;
pub mod resources;
pub mod session;
pub mod util;
pub mod widgets;

use lectern_core::{
    Announcement, Backoffice, Book, Donation, Event, Post, PrayerRequest, Role, Sermon, User,
};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an API-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    office: &Backoffice,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Announcements(args) => {
            resources::handle::<Announcement>(office, args.command, global).await
        }
        Command::Posts(args) => resources::handle::<Post>(office, args.command, global).await,
        Command::Sermons(args) => resources::handle::<Sermon>(office, args.command, global).await,
        Command::Books(args) => resources::handle::<Book>(office, args.command, global).await,
        Command::Events(args) => resources::handle::<Event>(office, args.command, global).await,
        Command::PrayerRequests(args) => {
            resources::handle::<PrayerRequest>(office, args.command, global).await
        }
        Command::Donations(args) => {
            resources::handle::<Donation>(office, args.command, global).await
        }
        Command::Users(args) => resources::handle::<User>(office, args.command, global).await,
        Command::Roles(args) => resources::handle::<Role>(office, args.command, global).await,
        Command::Menus(args) => resources::handle_menus(office, args.command, global).await,
        Command::Widgets(args) => widgets::handle(office, args, global).await,
        Command::Categories(args) => categories::handle(office, args, global).await,
        Command::Session(_) | Command::Config(_) | Command::Completions(_) => Err(
            CliError::Internal("local command routed to the API dispatcher".into()),
        ),
    }
}
