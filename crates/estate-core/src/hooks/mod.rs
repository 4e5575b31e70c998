// ── Data hooks ──
//
// Stateful containers UI code drives: each exposes `HookState` snapshots
// and subscriptions plus async actions that follow one loading lifecycle.
// Hooks share no state with each other.

mod api_settings;
mod collection;
mod company;
mod dashboard;
mod project;
mod settings;
mod state;

pub use api_settings::{ApiSettingsData, ApiSettingsHook};
pub use collection::{CollectionHook, CollectionState, ListState};
pub use company::CompanyInfoHook;
pub use dashboard::DashboardHook;
pub use project::ProjectHook;
pub use settings::SettingsHook;
pub use state::{HookState, StateStream, StateWatch};

use crate::service::{
    ApiKeys, CareerService, ContactService, EmailTemplates, NewsService, ProductService,
    ProjectService, SettingsCollection, SocialLinks,
};

pub type ProjectsHook = CollectionHook<ProjectService>;
pub type NewsHook = CollectionHook<NewsService>;
pub type ProductsHook = CollectionHook<ProductService>;
pub type CareersHook = CollectionHook<CareerService>;
pub type ContactsHook = CollectionHook<ContactService>;
pub type ApiKeysHook = CollectionHook<SettingsCollection<ApiKeys>>;
pub type EmailTemplatesHook = CollectionHook<SettingsCollection<EmailTemplates>>;
pub type SocialLinksHook = CollectionHook<SettingsCollection<SocialLinks>>;
