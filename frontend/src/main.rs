use crate::app::App;

mod app;
mod components;
mod logging;
mod maplibre;
mod platform;

fn main() {
    logging::init();
    yew::Renderer::<App>::new().render();
}
