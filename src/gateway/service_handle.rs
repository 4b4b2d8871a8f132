use anyhow::Result;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Holds the running server task and the shutdown channel.
/// `shutdown()` flips the channel and waits for the task to drain.
pub struct ServiceHandle {
    shutdown_tx: watch::Sender<bool>,
    join_handles: Vec<JoinHandle<anyhow::Result<()>>>,
}

impl ServiceHandle {
    /// Create a handle plus a receiver the server task observes for shutdown.
    pub fn new() -> (Self, watch::Receiver<bool>) {
        let (tx, rx) = watch::channel(false);
        let handle = ServiceHandle {
            shutdown_tx: tx,
            join_handles: vec![],
        };
        (handle, rx)
    }

    /// Attach a background task so shutdown waits on it.
    pub fn attach(&mut self, h: JoinHandle<anyhow::Result<()>>) {
        self.join_handles.push(h);
    }

    /// Signal shutdown and await attached tasks.
    pub async fn shutdown(self) -> Result<()> {
        let _ = self.shutdown_tx.send(true);

        for h in self.join_handles {
            match h.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::error!("service task returned error: {e:?}"),
                Err(e) => tracing::error!("task join error: {e:?}"),
            }
        }
        Ok(())
    }
}
