//! Background loading of the asset bundle
//!
//! Parsing a large bundle takes long enough to stall the first frames, so it
//! runs on its own thread and the UI polls for the result.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use tracing::{error, info};

use crate::asset_manager::{AssetBundle, AssetError};

/// Where the bundle load currently stands.
#[derive(Debug)]
pub enum LoadState {
    Loading,
    Ready(AssetBundle),
    Failed(AssetError),
}

pub struct AssetLoader {
    path: PathBuf,
    receiver: Option<Receiver<Result<AssetBundle, AssetError>>>,
}

impl AssetLoader {
    /// Starts loading `path`; `on_done` runs on the loader thread when finished.
    pub fn spawn(
        path: PathBuf,
        on_done: impl FnOnce() + Send + 'static,
    ) -> Result<Self, AssetError> {
        let (sender, receiver) = mpsc::channel();
        let thread_path = path.clone();
        thread::Builder::new()
            .name("asset-loader".to_string())
            .spawn(move || {
                info!(path = %thread_path.display(), "loading asset bundle");
                let result = AssetBundle::load(&thread_path);
                // Receiver gone means the app already shut down
                let _ = sender.send(result);
                on_done();
            })
            .map_err(|source| AssetError::Io {
                path: path.clone(),
                source,
            })?;
        Ok(Self {
            path,
            receiver: Some(receiver),
        })
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Non-blocking. Yields `Ready`/`Failed` exactly once, then `Loading` is
    /// never returned again; callers keep the bundle they were handed.
    pub fn poll(&mut self) -> Option<LoadState> {
        let receiver = self.receiver.as_ref()?;
        let state = match receiver.try_recv() {
            Ok(Ok(bundle)) => LoadState::Ready(bundle),
            Ok(Err(err)) => {
                error!(path = %self.path.display(), %err, "asset bundle failed to load");
                LoadState::Failed(err)
            }
            Err(TryRecvError::Empty) => return Some(LoadState::Loading),
            Err(TryRecvError::Disconnected) => LoadState::Failed(AssetError::LoaderStopped),
        };
        self.receiver = None;
        Some(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn missing_bundle_reports_failure_once() {
        let mut loader = AssetLoader::spawn(PathBuf::from("no/such/bundle.glb"), || {}).unwrap();
        let deadline = Instant::now() + Duration::from_secs(5);
        let state = loop {
            match loader.poll() {
                Some(LoadState::Loading) if Instant::now() < deadline => {
                    thread::sleep(Duration::from_millis(5))
                }
                other => break other,
            }
        };
        assert!(matches!(state, Some(LoadState::Failed(AssetError::Io { .. }))));
        assert!(loader.poll().is_none());
    }
}
