// Single-project hook for edit pages

use estate_api::UploadFile;
use estate_api::models::{Project, ProjectDraft};

use super::state::{HookCell, HookState, StateWatch};
use crate::error::CoreError;
use crate::service::ProjectService;

pub struct ProjectHook {
    service: ProjectService,
    cell: HookCell<Option<Project>>,
}

impl ProjectHook {
    pub fn new(service: ProjectService) -> Self {
        Self {
            service,
            cell: HookCell::new(None),
        }
    }

    pub fn state(&self) -> HookState<Option<Project>> {
        self.cell.snapshot()
    }

    pub fn subscribe(&self) -> StateWatch<Option<Project>> {
        self.cell.subscribe()
    }

    /// Draft pre-filled from the loaded project, for the edit form.
    pub fn draft(&self) -> Option<ProjectDraft> {
        self.cell.read(|p| p.as_ref().map(ProjectDraft::from))
    }

    pub async fn load(&self, id: &str) -> Result<Project, CoreError> {
        self.cell
            .run(self.service.get_project(id), |data, project| {
                *data = Some(project.clone());
            })
            .await
    }

    /// Save the loaded project. Fails without a request if nothing is
    /// loaded.
    pub async fn update(
        &self,
        draft: ProjectDraft,
        images: Vec<UploadFile>,
    ) -> Result<Project, CoreError> {
        let Some(id) = self.cell.read(|p| p.as_ref().map(|p| p.id.clone())) else {
            return Err(CoreError::Malformed {
                message: "Chưa tải dự án".to_owned(),
            });
        };
        self.cell
            .run(self.service.update_project(&id, draft, images), |data, project| {
                *data = Some(project.clone());
            })
            .await
    }

    pub fn clear_error(&self) {
        self.cell.clear_error();
    }
}
