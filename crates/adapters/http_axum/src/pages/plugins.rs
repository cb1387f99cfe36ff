//! Plugins step: pick remote plugins to install.

use askama::Template;
use axum::response::{Html, IntoResponse, Response};

use hubsetup_app::navigator::Navigator;
use hubsetup_app::ports::{Geocoder, HubApi, SessionStore};
use hubsetup_domain::plugin::{Plugin, PluginSelection};
use hubsetup_domain::session::WizardSession;
use hubsetup_domain::step::Step;

use super::{Chrome, Reply, follow, load_failed};
use crate::form::FormFields;
use crate::state::AppState;

const TILES_PER_ROW: usize = 2;

#[derive(Debug, Clone)]
pub(crate) struct PluginTile {
    id: String,
    name: String,
    description: Option<String>,
    version: Option<String>,
    selected: bool,
}

#[derive(Template)]
#[template(path = "plugins.html")]
pub(crate) struct PluginsPage {
    chrome: Chrome,
    rows: Vec<Vec<PluginTile>>,
    selected: usize,
}

impl PluginsPage {
    fn new(
        navigator: &Navigator,
        session: &mut WizardSession,
        available: Vec<Plugin>,
        selection: &PluginSelection,
    ) -> Self {
        let tiles: Vec<PluginTile> = available
            .into_iter()
            .map(|plugin| PluginTile {
                selected: selection.is_selected(&plugin.id),
                id: plugin.id,
                name: plugin.name,
                description: plugin.description,
                version: plugin.version,
            })
            .collect();
        let selected = tiles.iter().filter(|tile| tile.selected).count();
        Self {
            chrome: Chrome::new(navigator, session, Step::Plugins),
            rows: tiles.chunks(TILES_PER_ROW).map(<[PluginTile]>::to_vec).collect(),
            selected,
        }
    }
}

impl IntoResponse for PluginsPage {
    fn into_response(self) -> Response {
        Html(self.to_string()).into_response()
    }
}

pub(super) async fn show<H, G, S>(
    state: &AppState<H, G, S>,
    session: &mut WizardSession,
) -> Response
where
    H: HubApi + Send + Sync + 'static,
    G: Geocoder + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    match state.plugins.list(session).await {
        Ok(available) => {
            PluginsPage::new(&state.navigator, session, available, &PluginSelection::new())
                .into_response()
        }
        Err(err) => load_failed(session, err),
    }
}

pub(super) async fn submit<H, G, S>(
    state: &AppState<H, G, S>,
    session: &mut WizardSession,
    fields: &FormFields,
) -> Reply
where
    H: HubApi + Send + Sync + 'static,
    G: Geocoder + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let selection: PluginSelection = fields.all("plugin").collect();
    let outcome = state.plugins.install(session, &selection).await;
    if let Ok(reply) = follow(session, outcome) {
        return reply;
    }
    // re-render with the ticks kept
    let response = match state.plugins.list(session).await {
        Ok(available) => {
            PluginsPage::new(&state.navigator, session, available, &selection).into_response()
        }
        Err(err) => load_failed(session, err),
    };
    Reply::Keep(response)
}
