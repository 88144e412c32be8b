//! Elm-style update function for the earthquake map.
//!
//! Refresh passes are started synchronously here (prune, then a new pass
//! generation) and their async part is handed to `spawn_local`; the pass
//! reports back with `Msg::PassFinished`.

use log::{debug, error};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use common::markers::PassOutcome;

use super::messages::Msg;
use super::state::{style_value, EarthquakeMapComponent};

pub fn update(
    component: &mut EarthquakeMapComponent,
    ctx: &Context<EarthquakeMapComponent>,
    msg: Msg,
) -> bool {
    match msg {
        Msg::RefreshMarkers => {
            start_pass(component, ctx, false);
            false
        }
        Msg::ViewSettled => {
            start_pass(component, ctx, true);
            false
        }
        Msg::SelectBasemap(kind) => {
            if kind == component.active_basemap {
                return false;
            }
            if let Some(markers) = &component.markers {
                let applied =
                    style_value(kind).and_then(|style| markers.layer().map().set_style(&style));
                if let Err(err) = applied {
                    error!("Could not switch basemap to {}: {:?}", kind.label(), err);
                    return false;
                }
            }
            component.active_basemap = kind;
            true
        }
        Msg::PassFinished(report) => {
            if report.outcome == PassOutcome::Superseded {
                debug!("Marker pass superseded after {} insertions", report.added);
            }
            false
        }
    }
}

fn start_pass(
    component: &EarthquakeMapComponent,
    ctx: &Context<EarthquakeMapComponent>,
    prune: bool,
) {
    let Some(markers) = component.markers.clone() else {
        return;
    };
    if prune {
        let removed = markers.prune();
        debug!("Pruned {} markers outside the view", removed);
    }
    let token = markers.begin_pass();
    let fetcher = component.fetcher.clone();
    let link = ctx.link().clone();
    spawn_local(async move {
        let report = markers.run_pass(token, &*fetcher).await;
        link.send_message(Msg::PassFinished(report));
    });
}
