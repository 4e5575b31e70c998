// Settings hook: one category, fetched once, edited locally, saved whole

use estate_api::models::SettingsCategory;

use super::state::{HookCell, HookState, StateWatch};
use crate::error::CoreError;
use crate::service::SettingsService;

pub struct SettingsHook<S: SettingsCategory> {
    service: SettingsService,
    cell: HookCell<S>,
}

impl<S: SettingsCategory> SettingsHook<S> {
    pub fn new(service: SettingsService) -> Self {
        Self {
            service,
            cell: HookCell::new(S::default()),
        }
    }

    pub fn state(&self) -> HookState<S> {
        self.cell.snapshot()
    }

    pub fn subscribe(&self) -> StateWatch<S> {
        self.cell.subscribe()
    }

    pub async fn load(&self) -> Result<S, CoreError> {
        self.cell
            .run(self.service.get::<S>(), |data, loaded| *data = loaded.clone())
            .await
    }

    /// Change fields locally; nothing is sent until `save`.
    pub fn edit(&self, f: impl FnOnce(&mut S)) {
        self.cell.modify(f);
    }

    /// Send the edited document and adopt what the backend stored.
    pub async fn save(&self) -> Result<S, CoreError> {
        let current = self.cell.read(S::clone);
        self.cell
            .run(self.service.update(&current), |data, saved| *data = saved.clone())
            .await
    }

    pub fn clear_error(&self) {
        self.cell.clear_error();
    }
}
