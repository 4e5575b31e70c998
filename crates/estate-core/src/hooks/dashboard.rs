// Dashboard hook
//
// The overview endpoint is background-safe: an expired token shows up as
// an error in place and the admin stays on the page.

use estate_api::models::DashboardOverview;

use super::state::{HookCell, HookState, StateWatch};
use crate::error::CoreError;
use crate::service::DashboardService;

pub struct DashboardHook {
    service: DashboardService,
    cell: HookCell<Option<DashboardOverview>>,
}

impl DashboardHook {
    pub fn new(service: DashboardService) -> Self {
        Self {
            service,
            cell: HookCell::new(None),
        }
    }

    pub fn state(&self) -> HookState<Option<DashboardOverview>> {
        self.cell.snapshot()
    }

    pub fn subscribe(&self) -> StateWatch<Option<DashboardOverview>> {
        self.cell.subscribe()
    }

    pub async fn load(&self) -> Result<DashboardOverview, CoreError> {
        self.cell
            .run(self.service.overview(), |data, overview| {
                *data = Some(overview.clone());
            })
            .await
    }

    pub fn clear_error(&self) {
        self.cell.clear_error();
    }
}
