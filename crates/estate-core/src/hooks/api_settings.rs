// API settings page: the settings document and the key list live together
//
// `load` fetches both concurrently; `loading` clears only once both have
// answered, and if either fails neither is applied.

use estate_api::models::{ApiKey, ApiKeyDraft, ApiSettings};

use super::state::{HookCell, HookState, StateWatch};
use crate::error::CoreError;
use crate::service::SettingsService;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiSettingsData {
    pub settings: ApiSettings,
    pub keys: Vec<ApiKey>,
}

pub struct ApiSettingsHook {
    service: SettingsService,
    cell: HookCell<ApiSettingsData>,
}

impl ApiSettingsHook {
    pub fn new(service: SettingsService) -> Self {
        Self {
            service,
            cell: HookCell::new(ApiSettingsData::default()),
        }
    }

    pub fn state(&self) -> HookState<ApiSettingsData> {
        self.cell.snapshot()
    }

    pub fn subscribe(&self) -> StateWatch<ApiSettingsData> {
        self.cell.subscribe()
    }

    pub async fn load(&self) -> Result<(), CoreError> {
        let both = async {
            tokio::try_join!(
                self.service.get::<ApiSettings>(),
                self.service.list_api_keys()
            )
        };
        self.cell
            .run(both, |data, (settings, keys)| {
                data.settings = settings.clone();
                data.keys = keys.clone();
            })
            .await
            .map(|_| ())
    }

    pub fn edit(&self, f: impl FnOnce(&mut ApiSettings)) {
        self.cell.modify(|data| f(&mut data.settings));
    }

    pub async fn save(&self) -> Result<ApiSettings, CoreError> {
        let current = self.cell.read(|d| d.settings.clone());
        self.cell
            .run(self.service.update(&current), |data, saved| {
                data.settings = saved.clone();
            })
            .await
    }

    // ── Keys ─────────────────────────────────────────────────────────

    pub async fn create_key(&self, draft: &ApiKeyDraft) -> Result<ApiKey, CoreError> {
        self.cell
            .run(self.service.create_api_key(draft), |data, key| {
                data.keys.push(key.clone());
            })
            .await
    }

    pub async fn update_key(&self, id: &str, draft: &ApiKeyDraft) -> Result<ApiKey, CoreError> {
        self.cell
            .run(self.service.update_api_key(id, draft), |data, key| {
                if let Some(slot) = data.keys.iter_mut().find(|k| k.id == key.id) {
                    *slot = key.clone();
                }
            })
            .await
    }

    pub async fn delete_key(&self, id: &str) -> Result<(), CoreError> {
        self.cell
            .run(self.service.delete_api_key(id), |data, _| {
                data.keys.retain(|k| k.id != id);
            })
            .await
    }

    pub fn clear_error(&self) {
        self.cell.clear_error();
    }
}
