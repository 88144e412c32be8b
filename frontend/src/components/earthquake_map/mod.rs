//! Earthquake map: root module wiring the Yew `Component` implementation
//! with submodules for state, update logic and view rendering.
//!
//! On first render the MapLibre map is created in the container and an
//! initial marker pass is started; every `moveend` afterwards prunes
//! out-of-view markers and starts a new pass.

use log::error;
use yew::prelude::*;

mod messages;
mod props;
mod state;
mod update;
mod view;

pub use messages::Msg;
pub use props::EarthquakeMapProps;
pub use state::EarthquakeMapComponent;

impl Component for EarthquakeMapComponent {
    type Message = Msg;
    type Properties = EarthquakeMapProps;

    fn create(ctx: &Context<Self>) -> Self {
        EarthquakeMapComponent::new(&ctx.props().config)
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render && !self.loaded {
            self.loaded = true;
            match self.mount_map(ctx.link()) {
                Ok(()) => ctx.link().send_message(Msg::RefreshMarkers),
                Err(err) => error!("Could not create the map: {:?}", err),
            }
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.teardown();
    }
}
