use vpn_infra::CredentialStore;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub store: CredentialStore,
    pub config: AppConfig,
}
