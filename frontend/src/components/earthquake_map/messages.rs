use common::markers::PassReport;
use common::model::basemap::BasemapKind;

pub enum Msg {
    /// Initial load: draw in-view markers without pruning.
    RefreshMarkers,
    /// The map fired `moveend`.
    ViewSettled,
    SelectBasemap(BasemapKind),
    PassFinished(PassReport),
}
