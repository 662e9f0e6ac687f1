#![allow(clippy::unwrap_used, dead_code)]
// Scripted control-interface daemon for integration tests.
//
// Binds a Unix datagram socket in a temp dir, answers `ATTACH`/`DETACH`
// itself, records every other command and answers it through a script.
// A script returning `None` leaves the command unanswered. Scripted
// replies can be held back by a fixed delay.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tempfile::TempDir;
use tokio::net::UnixDatagram;
use tokio::task::JoinHandle;

use fstctl_core::CtrlConfig;

pub type Script = Box<dyn FnMut(&str) -> Option<String> + Send>;

pub struct MockDaemon {
    dir: TempDir,
    ctrl_path: PathBuf,
    socket: Arc<UnixDatagram>,
    log: Arc<Mutex<Vec<String>>>,
    attached: Arc<Mutex<Vec<PathBuf>>>,
    task: JoinHandle<()>,
}

impl MockDaemon {
    pub fn start(script: impl FnMut(&str) -> Option<String> + Send + 'static) -> Self {
        Self::start_delayed(script, Duration::ZERO)
    }

    /// Like [`start`](Self::start), but every scripted reply is sent `delay` late.
    pub fn start_delayed(
        script: impl FnMut(&str) -> Option<String> + Send + 'static,
        delay: Duration,
    ) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let ctrl_path = dir.path().join("ctrl");
        let socket = Arc::new(UnixDatagram::bind(&ctrl_path).unwrap());
        let log = Arc::new(Mutex::new(Vec::new()));
        let attached = Arc::new(Mutex::new(Vec::new()));

        let task = tokio::spawn(serve(
            Arc::clone(&socket),
            Arc::clone(&log),
            Arc::clone(&attached),
            Box::new(script),
            delay,
        ));

        Self {
            dir,
            ctrl_path,
            socket,
            log,
            attached,
            task,
        }
    }

    pub fn ctrl_path(&self) -> &Path {
        &self.ctrl_path
    }

    /// Connection settings pointing at this daemon, with a short timeout.
    pub fn config(&self) -> CtrlConfig {
        let mut config = CtrlConfig::new(&self.ctrl_path);
        config.client_dir = self.dir.path().to_path_buf();
        config.request_timeout = Duration::from_millis(500);
        config
    }

    /// Commands received so far, without `ATTACH`/`DETACH`.
    pub fn commands(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn attached_count(&self) -> usize {
        self.attached.lock().unwrap().len()
    }

    /// Push an unsolicited line to every attached client.
    pub async fn push_event(&self, line: &str) {
        let clients = self.attached.lock().unwrap().clone();
        for client in clients {
            self.socket.send_to(line.as_bytes(), &client).await.unwrap();
        }
    }
}

impl Drop for MockDaemon {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve(
    socket: Arc<UnixDatagram>,
    log: Arc<Mutex<Vec<String>>>,
    attached: Arc<Mutex<Vec<PathBuf>>>,
    mut script: Script,
    delay: Duration,
) {
    let mut buf = vec![0u8; 4096];
    loop {
        let Ok((len, from)) = socket.recv_from(&mut buf).await else {
            return;
        };
        let Some(from) = from.as_pathname().map(Path::to_path_buf) else {
            continue;
        };
        let command = String::from_utf8_lossy(&buf[..len]).into_owned();

        let reply = match command.as_str() {
            "ATTACH" => {
                attached.lock().unwrap().push(from.clone());
                Some("OK\n".to_owned())
            }
            "DETACH" => {
                attached.lock().unwrap().retain(|p| p != &from);
                Some("OK\n".to_owned())
            }
            _ => {
                log.lock().unwrap().push(command.clone());
                let reply = script(&command);
                if reply.is_some() && !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                reply
            }
        };

        if let Some(reply) = reply {
            let _ = socket.send_to(reply.as_bytes(), &from).await;
        }
    }
}

// ── Scripts ─────────────────────────────────────────────────────────

/// Answer known commands from a table; anything else gets `UNKNOWN COMMAND`.
pub fn table(entries: &[(&str, &str)]) -> impl FnMut(&str) -> Option<String> + Send + 'static {
    let entries: Vec<(String, String)> = entries
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |command: &str| {
        let reply = entries
            .iter()
            .find(|(k, _)| k == command)
            .map_or("UNKNOWN COMMAND\n", |(_, v)| v.as_str());
        Some(reply.to_owned())
    }
}
