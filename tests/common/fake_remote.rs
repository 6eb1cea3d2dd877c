//! In-process remote host for scenario tests.
//!
//! `FakeRemote` maps absolute remote paths onto a temp directory and
//! interprets the small shell surface the transfer uses (`echo $HOME`,
//! `test -d`, `mkdir -p`, `touch`, `command -v`, the unpack line and
//! `rm -f`). Uploads are written straight to disk and unpacked with the
//! `zip` crate.

use std::collections::BTreeSet;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use dcr::domain::entities::{ConnectionProfile, Credential};
use dcr::domain::ports::{
    CommandOutput, ProgressObserver, ProgressSample, RemoteSession, SessionConnector,
    SessionState,
};
use dcr::error::{ConnectFailure, TransferError, TransferResult};

/// Remote home reported for `echo $HOME`
pub const REMOTE_HOME: &str = "/home/deploy";

const UPLOAD_CHUNK: usize = 16 * 1024;

/// What happened on the fake host
#[derive(Debug, Default)]
pub struct RemoteLog {
    pub commands: Vec<String>,
    pub uploads: Vec<String>,
    pub sessions_opened: usize,
    pub sessions_closed: usize,
}

#[derive(Debug)]
struct HostConfig {
    read_only: BTreeSet<String>,
    has_unzip: bool,
}

struct Shared {
    root: TempDir,
    config: Mutex<HostConfig>,
    log: Mutex<RemoteLog>,
}

impl Shared {
    fn local(&self, remote: &str) -> PathBuf {
        self.root.path().join(remote.trim_start_matches('/'))
    }

    fn is_read_only(&self, remote: &str) -> bool {
        let config = self.config.lock().unwrap();
        config
            .read_only
            .iter()
            .any(|ro| remote == ro || remote.starts_with(&format!("{}/", ro)))
    }
}

#[derive(Clone)]
pub struct FakeRemote {
    shared: Arc<Shared>,
}

impl Default for FakeRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeRemote {
    pub fn new() -> Self {
        let shared = Shared {
            root: TempDir::new().unwrap(),
            config: Mutex::new(HostConfig {
                read_only: BTreeSet::new(),
                has_unzip: true,
            }),
            log: Mutex::new(RemoteLog::default()),
        };
        fs::create_dir_all(shared.local(REMOTE_HOME)).unwrap();
        Self {
            shared: Arc::new(shared),
        }
    }

    /// Create `remote` and refuse writes beneath it.
    pub fn read_only_dir(self, remote: &str) -> Self {
        fs::create_dir_all(self.shared.local(remote)).unwrap();
        self.shared
            .config
            .lock()
            .unwrap()
            .read_only
            .insert(remote.trim_end_matches('/').to_string());
        self
    }

    pub fn without_unzip(self) -> Self {
        self.shared.config.lock().unwrap().has_unzip = false;
        self
    }

    pub fn connector(&self) -> FakeConnector {
        FakeConnector {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Local path backing a remote path
    pub fn path(&self, remote: &str) -> PathBuf {
        self.shared.local(remote)
    }

    pub fn log(&self) -> std::sync::MutexGuard<'_, RemoteLog> {
        self.shared.log.lock().unwrap()
    }

    /// Relative file paths and contents under a remote directory, sorted.
    pub fn snapshot(&self, remote: &str) -> Vec<(String, Vec<u8>)> {
        let base = self.shared.local(remote);
        let mut files = Vec::new();
        collect_files(&base, &base, &mut files);
        files.sort();
        files
    }
}

fn collect_files(base: &Path, dir: &Path, out: &mut Vec<(String, Vec<u8>)>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect_files(base, &path, out);
        } else {
            let rel = path.strip_prefix(base).unwrap();
            let name = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            out.push((name, fs::read(&path).unwrap()));
        }
    }
}

/// Accepts any key file or inline key whose text looks like a PEM private key.
pub struct FakeConnector {
    shared: Arc<Shared>,
}

#[async_trait]
impl SessionConnector for FakeConnector {
    type Session = FakeSession;

    async fn connect(&self, profile: &ConnectionProfile) -> TransferResult<FakeSession> {
        let key = match profile.credential() {
            Credential::KeyFile { path, .. } => fs::read_to_string(path).map_err(|e| {
                TransferError::connect(
                    ConnectFailure::Credential,
                    format!("cannot read {}: {}", path.display(), e),
                )
            })?,
            Credential::KeyMaterial { pem, .. } => pem.clone(),
        };
        if !key.contains("PRIVATE KEY") {
            return Err(TransferError::connect(
                ConnectFailure::Auth,
                format!("server rejected key for {}", profile.target()),
            ));
        }

        self.shared.log.lock().unwrap().sessions_opened += 1;
        Ok(FakeSession {
            shared: Arc::clone(&self.shared),
            state: SessionState::Ready,
        })
    }
}

pub struct FakeSession {
    shared: Arc<Shared>,
    state: SessionState,
}

impl FakeSession {
    fn interpret(&self, command: &str) -> Result<String, (i32, String)> {
        let args = quoted_args(command);
        let first = args.first().cloned().unwrap_or_default();

        if command == "echo $HOME" {
            return Ok(format!("{}\n", REMOTE_HOME));
        }
        if command.starts_with("test -d ") {
            let exists = self.shared.local(&first).is_dir();
            return Ok(if exists { "EXISTS\n" } else { "NOT_EXISTS\n" }.to_string());
        }
        if command.starts_with("mkdir -p ") {
            if self.shared.is_read_only(&first) {
                return Err((
                    1,
                    format!("mkdir: cannot create directory '{}': Permission denied", first),
                ));
            }
            fs::create_dir_all(self.shared.local(&first)).map_err(|e| (1, e.to_string()))?;
            return Ok(String::new());
        }
        if command.starts_with("touch ") {
            let parent = first.rsplit_once('/').map_or("", |(dir, _)| dir);
            if self.shared.is_read_only(parent) || !self.shared.local(parent).is_dir() {
                return Err((1, format!("touch: cannot touch '{}': Permission denied", first)));
            }
            return Ok(String::new());
        }
        if command.starts_with("command -v ") {
            let has_unzip = self.shared.config.lock().unwrap().has_unzip;
            return if has_unzip && first == "unzip" {
                Ok("/usr/bin/unzip\n".to_string())
            } else {
                Err((1, String::new()))
            };
        }
        if command.starts_with("cd ") {
            let dest = self.shared.local(&first);
            let archive = dest.join(args.get(1).map(String::as_str).unwrap_or_default());
            let result = unzip_into(&archive, &dest);
            let _ = fs::remove_file(&archive);
            return result.map(|_| String::new()).map_err(|e| (9, e));
        }
        if command.starts_with("rm -f ") {
            let _ = fs::remove_file(self.shared.local(&first));
            return Ok(String::new());
        }
        Err((127, format!("sh: {}: not found", command)))
    }
}

#[async_trait]
impl RemoteSession for FakeSession {
    fn state(&self) -> SessionState {
        self.state
    }

    async fn execute(&mut self, command: &str) -> TransferResult<CommandOutput> {
        self.shared
            .log
            .lock()
            .unwrap()
            .commands
            .push(command.to_string());

        match self.interpret(command) {
            Ok(stdout) => Ok(CommandOutput {
                stdout,
                stderr: String::new(),
                exit_code: 0,
            }),
            Err((exit_code, stderr)) => Err(TransferError::RemoteCommand {
                command: command.to_string(),
                exit_code,
                stderr,
            }),
        }
    }

    async fn upload(
        &mut self,
        local: &Path,
        remote: &str,
        observer: Arc<dyn ProgressObserver>,
        cancel: &CancellationToken,
    ) -> TransferResult<u64> {
        self.shared
            .log
            .lock()
            .unwrap()
            .uploads
            .push(remote.to_string());

        let upload_err = |detail: String| TransferError::Upload {
            remote_path: remote.to_string(),
            detail,
        };
        if self.shared.is_read_only(remote) {
            return Err(upload_err("permission denied".to_string()));
        }

        let mut input =
            fs::File::open(local).map_err(|e| TransferError::io("opening archive", e))?;
        let total = input
            .metadata()
            .map_err(|e| TransferError::io("reading archive metadata", e))?
            .len();
        let mut output =
            fs::File::create(self.shared.local(remote)).map_err(|e| upload_err(e.to_string()))?;

        if total == 0 {
            observer.on_progress(ProgressSample::new(0, 0));
        }
        let mut buf = vec![0u8; UPLOAD_CHUNK];
        let mut sent = 0u64;
        loop {
            if cancel.is_cancelled() {
                return Err(TransferError::Interrupted);
            }
            let n = input
                .read(&mut buf)
                .map_err(|e| TransferError::io("reading archive", e))?;
            if n == 0 {
                break;
            }
            output
                .write_all(&buf[..n])
                .map_err(|e| upload_err(e.to_string()))?;
            sent += n as u64;
            observer.on_progress(ProgressSample::new(sent, total));
        }
        Ok(sent)
    }

    async fn close(&mut self) -> TransferResult<()> {
        if self.state != SessionState::Closed {
            self.state = SessionState::Closed;
            self.shared.log.lock().unwrap().sessions_closed += 1;
        }
        Ok(())
    }
}

fn unzip_into(archive: &Path, dest: &Path) -> Result<(), String> {
    let file = fs::File::open(archive)
        .map_err(|e| format!("cannot find or open {}: {}", archive.display(), e))?;
    let mut zip = zip::ZipArchive::new(file).map_err(|e| e.to_string())?;

    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).map_err(|e| e.to_string())?;
        let Some(rel) = entry.enclosed_name().map(Path::to_path_buf) else {
            return Err(format!("unsafe entry name {}", entry.name()));
        };
        let out = dest.join(rel);
        if entry.is_dir() {
            fs::create_dir_all(&out).map_err(|e| e.to_string())?;
            continue;
        }
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let mut file = fs::File::create(&out).map_err(|e| e.to_string())?;
        std::io::copy(&mut entry, &mut file).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Single-quoted words of a command, with `'\''` escapes undone.
pub fn quoted_args(command: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;
    let mut chars = command.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quote) {
            ('\'', false) => in_quote = true,
            ('\'', true) => {
                // `'\''` continues the same word
                if chars.peek() == Some(&'\\') {
                    chars.next();
                    chars.next();
                    current.push('\'');
                    chars.next();
                } else {
                    in_quote = false;
                    args.push(std::mem::take(&mut current));
                }
            }
            (c, true) => current.push(c),
            _ => {}
        }
    }
    args
}
