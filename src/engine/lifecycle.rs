//! Mount/unmount sequencing for a widget instance.
//!
//! The mount hook starts on its own task as soon as the widget mounts. The
//! unmount hook is chained after it: it never begins before the mount hook
//! has settled, and it is skipped when the mount hook failed. Each hook runs
//! at most once because both steps consume the value that holds the chain.
//!
//! Hosts that need to react to the first load, whether or not it changed the
//! model, wait on [`Lifecycle::mount_settled`].

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::controller::Invocation;
use super::error::ActionError;

pub type HookResult = Result<(), ActionError>;

/// Where the mount hook stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountStatus {
    Pending,
    Mounted,
    /// Carries the rendered error.
    Failed(String),
}

pub struct Lifecycle {
    runtime: Handle,
    mount: JoinHandle<HookResult>,
    status: watch::Receiver<MountStatus>,
}

impl Lifecycle {
    /// Start the mount hook.
    pub fn mount<F>(on_mount: F) -> Result<Self, ActionError>
    where
        F: FnOnce() -> Result<Invocation, ActionError> + Send + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| ActionError::NoRuntime {
            action: "mount".to_string(),
        })?;
        let (status_tx, status) = watch::channel(MountStatus::Pending);
        let mount = runtime.spawn(async move {
            let result = match on_mount() {
                Ok(invocation) => invocation.settled().await.map(drop),
                Err(err) => Err(err),
            };
            match &result {
                Ok(()) => {
                    tracing::info!("widget mounted");
                    status_tx.send_replace(MountStatus::Mounted);
                }
                Err(err) => {
                    status_tx.send_replace(MountStatus::Failed(err.to_string()));
                }
            }
            result
        });
        Ok(Self {
            runtime,
            mount,
            status,
        })
    }

    /// Wait until the mount hook has settled and report how it ended.
    ///
    /// Cancel-safe, and may be awaited any number of times.
    pub async fn mount_settled(&self) -> MountStatus {
        let mut receiver = self.status.clone();
        let settled = match receiver.wait_for(|status| *status != MountStatus::Pending).await {
            Ok(status) => status.clone(),
            Err(_) => MountStatus::Failed("mount task ended without settling".to_string()),
        };
        settled
    }

    /// True once the mount hook has settled (successfully or not).
    pub fn is_mount_settled(&self) -> bool {
        self.mount.is_finished()
    }

    /// Chain the unmount hook after the mount hook.
    pub fn unmount<F>(self, on_unmount: F) -> JoinHandle<HookResult>
    where
        F: FnOnce() -> Result<Invocation, ActionError> + Send + 'static,
    {
        let Lifecycle { runtime, mount, .. } = self;
        runtime.spawn(async move {
            match mount.await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    tracing::warn!(error = %err, "mount failed, unmount skipped");
                    return Err(err);
                }
                Err(_) => {
                    return Err(ActionError::Aborted {
                        action: "mount".to_string(),
                    })
                }
            }
            on_unmount()?.settled().await?;
            tracing::info!("widget unmounted");
            Ok::<(), ActionError>(())
        })
    }
}
