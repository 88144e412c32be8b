use yew::prelude::*;

use super::messages::Msg;
use super::state::EarthquakeMapComponent;
use crate::components::layer_switcher::LayerSwitcher;

const MAP_STYLE: &str = "position: absolute; top: 0; bottom: 0; width: 100%;";

/// Full-viewport map container plus the floating basemap switcher.
pub fn view(component: &EarthquakeMapComponent, ctx: &Context<EarthquakeMapComponent>) -> Html {
    let link = ctx.link();

    html! {
        <div class="quake-viewer">
            <div id="map" ref={component.container_ref.clone()} style={MAP_STYLE} />
            <LayerSwitcher
                active={component.active_basemap}
                on_select={link.callback(Msg::SelectBasemap)}
            />
        </div>
    }
}
