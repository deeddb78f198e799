//! Store wiring and script execution

use anyhow::Result;
use unistore::{apply_middleware, create_store, Action, EnhancedStore, StoreError};
use unistore_config::DemoConfig;

use crate::actions::from_scripted;
use crate::middleware::build_chain;
use crate::reducers::{initial_state, root_reducer, AppState};

pub type AppStore = EnhancedStore<AppState, Action>;

/// Outcome of running a script
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub dispatched: usize,
    pub rejected: usize,
}

pub fn build_store(config: &DemoConfig) -> AppStore {
    let store = create_store(root_reducer(), initial_state(config.initial_counter));
    apply_middleware(store, build_chain(config))
}

/// Dispatch every scripted action in order
///
/// Actions rejected by middleware are logged and counted; any other error
/// aborts the run.
pub fn run_script(store: &AppStore, config: &DemoConfig) -> Result<RunSummary> {
    let mut summary = RunSummary::default();
    for scripted in config.scripted_actions()? {
        let action = from_scripted(&scripted);
        match store.dispatch(action) {
            Ok(_) => summary.dispatched += 1,
            Err(e @ StoreError::Rejected { .. }) => {
                log::warn!("{}", e);
                summary.rejected += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(summary)
}
