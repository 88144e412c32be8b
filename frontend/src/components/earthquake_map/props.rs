//! Properties for the `EarthquakeMapComponent`.

use common::config::ViewerConfig;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct EarthquakeMapProps {
    /// Feed URL, cache window, pacing delay and initial view.
    ///
    /// Read once when the component is created; later changes are ignored.
    #[prop_or_default]
    pub config: ViewerConfig,
}
