use std::sync::Arc;

use tnkb_core::{model::RegionRecord, model::VehicleInfo, service::TnkbService};

/// Upper bound for the results history.
const HISTORY_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    PlateCheck,
    RegionList,
}

pub(crate) struct App {
    pub service: Arc<TnkbService>,
    pub offline: bool,

    pub screen: Screen,

    pub plate_input: String,
    /// Checked plates, newest first.
    pub results: Vec<VehicleInfo>,
    pub result_index: usize,

    pub regions: Vec<RegionRecord>,
    pub region_index: usize,

    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl App {
    pub(crate) fn new(service: Arc<TnkbService>, offline: bool) -> Self {
        let regions = service.list_regions();
        Self {
            service,
            offline,
            screen: Screen::PlateCheck,
            plate_input: String::new(),
            results: Vec::new(),
            result_index: 0,
            regions,
            region_index: 0,
            is_loading: false,
            error_message: None,
        }
    }

    pub(crate) fn push_result(&mut self, info: VehicleInfo) {
        self.results.insert(0, info);
        self.results.truncate(HISTORY_LIMIT);
        self.result_index = 0;
    }

    pub(crate) fn selected_result(&self) -> Option<&VehicleInfo> {
        self.results.get(self.result_index)
    }

    pub(crate) fn toggle_screen(&mut self) {
        self.screen = match self.screen {
            Screen::PlateCheck => Screen::RegionList,
            Screen::RegionList => Screen::PlateCheck,
        };
    }
}
