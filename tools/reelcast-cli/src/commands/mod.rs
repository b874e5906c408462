pub mod info;
pub mod render;
pub mod validate;

use anyhow::Context;

use reelcast_project_model::session::Session;

use crate::SessionArgs;

/// Load both session documents, naming the failing file on error.
pub fn load_session(args: &SessionArgs) -> anyhow::Result<Session> {
    Session::load(&args.cursor_data, &args.zoom_config).context("Failed to load session")
}
