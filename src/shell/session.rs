use crate::core::error::{Result, VRunError};
use crate::core::path::SEARCH_PATH_VAR;
use crate::python::VirtualEnv;
use crate::shell::terminal::TerminalSize;
use portable_pty::{native_pty_system, Child, CommandBuilder, MasterPty};
use std::ffi::OsString;
use std::future::Future;
use std::io::{ErrorKind, Read, Write};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// How long to keep forwarding buffered shell output after the shell exits.
const OUTPUT_DRAIN: Duration = Duration::from_millis(500);

/// Everything needed to start the interactive shell.
#[derive(Debug, Clone)]
pub struct ShellRequest {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub search_path: OsString,
    pub size: TerminalSize,
}

pub trait PtyResizer {
    fn apply_size(&self, size: TerminalSize) -> Result<()>;
}

impl PtyResizer for Box<dyn MasterPty + Send> {
    fn apply_size(&self, size: TerminalSize) -> Result<()> {
        (**self).resize(size.into())?;
        Ok(())
    }
}

/// A shell running on a fresh pseudo-terminal.
pub struct ShellSession {
    master: Box<dyn MasterPty + Send>,
    child: Box<dyn Child + Send + Sync>,
    writer: Box<dyn Write + Send>,
    program: String,
}

impl ShellSession {
    /// Open a PTY of `request.size` and start the shell on it. The search path
    /// is set on the child's environment only.
    pub fn spawn(request: &ShellRequest) -> Result<Self> {
        let spawn_failure = |reason: String| VRunError::SpawnFailure {
            shell: request.program.clone(),
            reason,
        };

        let pair = native_pty_system()
            .openpty(request.size.into())
            .map_err(|e| spawn_failure(format!("failed to open PTY: {}", e)))?;

        let mut cmd = CommandBuilder::new(&request.program);
        cmd.args(&request.args);
        cmd.cwd(&request.cwd);
        cmd.env(SEARCH_PATH_VAR, &request.search_path);

        let child = pair
            .slave
            .spawn_command(cmd)
            .map_err(|e| spawn_failure(e.to_string()))?;
        drop(pair.slave);

        let writer = pair
            .master
            .take_writer()
            .map_err(|e| spawn_failure(format!("failed to get PTY writer: {}", e)))?;

        info!(
            "spawned {} on a {}x{} PTY",
            request.program, request.size.cols, request.size.rows
        );

        Ok(Self {
            master: pair.master,
            child,
            writer,
            program: request.program.clone(),
        })
    }

    /// Source the environment's activate script, then run `follow_up` if any.
    pub fn inject_activation(&mut self, venv: &VirtualEnv, follow_up: &[String]) -> Result<()> {
        let mut lines = vec![venv.activation_line()];
        if !follow_up.is_empty() {
            lines.push(follow_up.join(" "));
        }

        for line in lines {
            debug!("sending to {}: {}", self.program, line);
            self.writer.write_all(line.as_bytes())?;
            self.writer.write_all(b"\n")?;
        }
        self.writer.flush()?;
        Ok(())
    }

    /// Relay `input` to the shell and its output to `output`, applying every
    /// size from `resizes`, until the shell exits. Returns its exit code.
    pub async fn interact<R, W>(
        self,
        input: R,
        output: W,
        resizes: mpsc::UnboundedReceiver<TerminalSize>,
    ) -> Result<u32>
    where
        R: Read + Send + 'static,
        W: Write + Send + 'static,
    {
        let ShellSession {
            master,
            mut child,
            writer,
            program,
        } = self;

        let reader = master.try_clone_reader()?;
        let output_task = tokio::task::spawn_blocking(move || relay(reader, output));

        // Blocked on input for as long as the user stays idle, so it is never joined.
        std::thread::spawn(move || relay(input, writer));

        let wait_task = tokio::task::spawn_blocking(move || child.wait());
        let exited = async move {
            let status = wait_task
                .await
                .map_err(|e| anyhow::anyhow!("shell wait task failed: {}", e))??;
            Ok::<u32, VRunError>(status.exit_code())
        };

        let code = drive(&master, resizes, exited).await?;
        info!("{} exited with status {}", program, code);

        if tokio::time::timeout(OUTPUT_DRAIN, output_task).await.is_err() {
            debug!("shell output still open after exit, closing PTY");
        }
        drop(master);

        Ok(code)
    }
}

/// Apply resize events until `exited` resolves. Pending resizes are handled first.
async fn drive<P, F>(
    pty: &P,
    mut resizes: mpsc::UnboundedReceiver<TerminalSize>,
    exited: F,
) -> Result<u32>
where
    P: PtyResizer,
    F: Future<Output = Result<u32>>,
{
    tokio::pin!(exited);

    loop {
        tokio::select! {
            biased;
            Some(size) = resizes.recv() => {
                if let Err(e) = pty.apply_size(size) {
                    warn!("failed to resize PTY to {}x{}: {}", size.cols, size.rows, e);
                }
            }
            code = &mut exited => return code,
        }
    }
}

fn relay<R: Read, W: Write>(mut from: R, mut to: W) -> std::io::Result<()> {
    let mut buf = [0u8; 4096];
    loop {
        match from.read(&mut buf) {
            Ok(0) => return Ok(()),
            Ok(n) => {
                to.write_all(&buf[..n])?;
                to.flush()?;
            }
            Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
            // Linux reports EIO on the master once the shell side is gone.
            Err(e) => {
                debug!("relay closed: {}", e);
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::sync::oneshot;

    #[derive(Default)]
    struct RecordingPty {
        sizes: Mutex<Vec<TerminalSize>>,
    }

    impl PtyResizer for RecordingPty {
        fn apply_size(&self, size: TerminalSize) -> Result<()> {
            self.sizes.lock().unwrap().push(size);
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    /// Keyboard stand-in: yields whatever is sent, EOF once the sender is gone.
    struct ChannelReader {
        rx: std::sync::mpsc::Receiver<Vec<u8>>,
        pending: Vec<u8>,
    }

    impl Read for ChannelReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pending.is_empty() {
                match self.rx.recv() {
                    Ok(bytes) => self.pending = bytes,
                    Err(_) => return Ok(0),
                }
            }
            let n = buf.len().min(self.pending.len());
            buf[..n].copy_from_slice(&self.pending[..n]);
            self.pending.drain(..n);
            Ok(n)
        }
    }

    #[tokio::test]
    async fn one_resize_event_resizes_once() {
        let (tx, rx) = mpsc::unbounded_channel();
        let (exit_tx, exit_rx) = oneshot::channel::<u32>();
        let pty = RecordingPty::default();

        let new_size = TerminalSize { rows: 50, cols: 160 };
        tx.send(new_size).unwrap();
        exit_tx.send(3).unwrap();

        let code = drive(&pty, rx, async move { Ok::<u32, VRunError>(exit_rx.await.unwrap()) })
            .await
            .unwrap();

        assert_eq!(code, 3);
        assert_eq!(*pty.sizes.lock().unwrap(), vec![new_size]);
    }

    #[tokio::test]
    async fn closed_resize_channel_still_waits_for_exit() {
        let (tx, rx) = mpsc::unbounded_channel::<TerminalSize>();
        drop(tx);
        let pty = RecordingPty::default();

        let code = drive(&pty, rx, async { Ok::<u32, VRunError>(0) }).await.unwrap();

        assert_eq!(code, 0);
        assert!(pty.sizes.lock().unwrap().is_empty());
    }

    #[test]
    fn relay_copies_until_eof() {
        let out = SharedBuffer::default();
        relay(&b"echo hi\n"[..], out.clone()).unwrap();
        assert_eq!(&*out.0.lock().unwrap(), b"echo hi\n");
    }

    #[test]
    fn missing_shell_is_a_spawn_failure_and_leaves_env_alone() {
        let dir = tempfile::tempdir().unwrap();
        let before = std::env::var_os(SEARCH_PATH_VAR);

        let request = ShellRequest {
            program: "/nonexistent/v-run-shell".to_string(),
            args: vec!["-i".to_string()],
            cwd: dir.path().to_path_buf(),
            search_path: OsString::from("/nonexistent/bin"),
            size: TerminalSize { rows: 24, cols: 80 },
        };

        let err = match ShellSession::spawn(&request) {
            Ok(_) => panic!("spawn of a missing shell succeeded"),
            Err(e) => e,
        };
        assert!(matches!(err, VRunError::SpawnFailure { .. }), "unexpected: {:?}", err);
        assert_eq!(std::env::var_os(SEARCH_PATH_VAR), before);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn shell_exit_status_is_propagated() {
        let dir = tempfile::tempdir().unwrap();
        let venv = VirtualEnv::new(dir.path().join("env"));
        std::fs::create_dir_all(venv.bin_dir()).unwrap();
        std::fs::write(venv.activate_script(), "VRUN_ACTIVATED=1\n").unwrap();

        let request = ShellRequest {
            program: "/bin/sh".to_string(),
            args: vec!["-i".to_string()],
            cwd: dir.path().to_path_buf(),
            search_path: crate::core::child_search_path(&venv.bin_dir()),
            size: TerminalSize { rows: 24, cols: 80 },
        };

        let mut session = ShellSession::spawn(&request).unwrap();
        session
            .inject_activation(&venv, &["exit".to_string(), "3".to_string()])
            .unwrap();

        let (_tx, rx) = mpsc::unbounded_channel();
        let code = session
            .interact(std::io::empty(), SharedBuffer::default(), rx)
            .await
            .unwrap();

        assert_eq!(code, 3);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn resize_during_session_keeps_relaying() {
        let dir = tempfile::tempdir().unwrap();
        let venv = VirtualEnv::new(dir.path().join("env"));
        std::fs::create_dir_all(venv.bin_dir()).unwrap();
        std::fs::write(venv.activate_script(), "VRUN_ACTIVATED=1\n").unwrap();

        let request = ShellRequest {
            program: "/bin/sh".to_string(),
            args: vec!["-i".to_string()],
            cwd: dir.path().to_path_buf(),
            search_path: crate::core::child_search_path(&venv.bin_dir()),
            size: TerminalSize { rows: 24, cols: 80 },
        };

        let mut session = ShellSession::spawn(&request).unwrap();
        session.inject_activation(&venv, &[]).unwrap();

        let (input_tx, input_rx) = std::sync::mpsc::channel::<Vec<u8>>();
        let (resize_tx, resize_rx) = mpsc::unbounded_channel();
        let output = SharedBuffer::default();
        let seen = output.clone();
        let input = ChannelReader {
            rx: input_rx,
            pending: Vec::new(),
        };

        let keyboard = async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            resize_tx.send(TerminalSize { rows: 50, cols: 160 }).unwrap();
            tokio::time::sleep(Duration::from_millis(200)).await;

            // The echoed command line contains neither marker, only the shell's output does.
            input_tx
                .send(b"echo resized-$((40+2)); stty size\n".to_vec())
                .unwrap();
            for _ in 0..100 {
                let text = seen.text();
                if text.contains("resized-42") && text.contains("50 160") {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(50)).await;
            }

            input_tx.send(b"exit 3\n".to_vec()).unwrap();
            (input_tx, resize_tx)
        };

        let (code, _senders) = tokio::time::timeout(Duration::from_secs(10), async {
            tokio::join!(session.interact(input, output.clone(), resize_rx), keyboard)
        })
        .await
        .expect("shell session did not finish");

        assert_eq!(code.unwrap(), 3);
        let text = output.text();
        assert!(text.contains("resized-42"), "output after resize missing: {:?}", text);
        assert!(text.contains("50 160"), "PTY size not applied: {:?}", text);
    }
}
