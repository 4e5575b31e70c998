// Company info hook: one section, load/edit/save

use estate_api::models::{CompanyInfo, CompanySection};

use super::state::{HookCell, HookState, StateWatch};
use crate::error::CoreError;
use crate::service::CompanyService;

pub struct CompanyInfoHook {
    service: CompanyService,
    section: CompanySection,
    cell: HookCell<CompanyInfo>,
}

impl CompanyInfoHook {
    pub fn new(service: CompanyService, section: CompanySection) -> Self {
        Self {
            service,
            section,
            cell: HookCell::new(CompanyInfo::default()),
        }
    }

    pub fn section(&self) -> CompanySection {
        self.section
    }

    pub fn state(&self) -> HookState<CompanyInfo> {
        self.cell.snapshot()
    }

    pub fn subscribe(&self) -> StateWatch<CompanyInfo> {
        self.cell.subscribe()
    }

    pub async fn load(&self) -> Result<CompanyInfo, CoreError> {
        self.cell
            .run(self.service.get_section(self.section), |data, info| {
                *data = info.clone();
            })
            .await
    }

    pub fn edit(&self, f: impl FnOnce(&mut CompanyInfo)) {
        self.cell.modify(f);
    }

    pub async fn save(&self) -> Result<CompanyInfo, CoreError> {
        let current = self.cell.read(CompanyInfo::clone);
        self.cell
            .run(self.service.update_section(self.section, &current), |data, info| {
                *data = info.clone();
            })
            .await
    }

    pub fn clear_error(&self) {
        self.cell.clear_error();
    }
}
