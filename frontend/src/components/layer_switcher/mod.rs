//! Floating panel with one button per basemap style.
//!
//! The panel only reports clicks; the parent owns the active style and
//! applies it to the map.

use common::model::basemap::BasemapKind;
use yew::{html, Callback, Component, Context, Html, Properties};

const PANEL_STYLE: &str = "position: fixed; top: 10px; right: 50px; z-index: 2; \
    display: flex; flex-direction: column; gap: 5px; padding: 5px; \
    background: rgba(255, 255, 255, 0.8); border-radius: 5px;";

#[derive(Properties, PartialEq)]
pub struct LayerSwitcherProps {
    /// Style currently shown on the map; its button is highlighted.
    pub active: BasemapKind,
    pub on_select: Callback<BasemapKind>,
}

pub struct LayerSwitcher;

impl Component for LayerSwitcher {
    type Message = ();
    type Properties = LayerSwitcherProps;

    fn create(_ctx: &Context<Self>) -> Self {
        LayerSwitcher
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        let buttons = BasemapKind::ALL
            .iter()
            .map(|&kind| {
                let on_select = props.on_select.clone();
                html! {
                    <button
                        style={button_style(kind == props.active)}
                        onclick={move |_| on_select.emit(kind)}
                    >
                        { kind.label() }
                    </button>
                }
            })
            .collect::<Html>();

        html! {
            <div class="layer-switcher" style={PANEL_STYLE}>
                { buttons }
            </div>
        }
    }
}

fn button_style(active: bool) -> String {
    let background = if active { "#aaa" } else { "#ddd" };
    format!(
        "padding: 8px; cursor: pointer; border: none; background: {}; \
         border-radius: 3px; font-size: 14px; white-space: nowrap; width: auto;",
        background
    )
}
