use crate::config::Config;
use crate::debug_if_enabled;
use crate::error::{LootError, Result};
use parking_lot::Mutex;
use std::fmt;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::{ChildStdout, Command};
use tokio::runtime::Handle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

// Сколько ждать конца вывода после выхода процесса (потомки могут держать pipe)
const OUTPUT_GRACE: Duration = Duration::from_secs(1);

/// Подкоманда скрипта бокса
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoxCommand {
    Status,
    Open,
    Close,
}

impl BoxCommand {
    pub fn as_arg(&self) -> &'static str {
        match self {
            BoxCommand::Status => "status",
            BoxCommand::Open => "open",
            BoxCommand::Close => "close",
        }
    }
}

impl fmt::Display for BoxCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_arg())
    }
}

/// Захваченный stdout при успехе (пустой, если захват не запрашивался)
pub type RunResult = Result<Vec<u8>>;

/// Runs a box executable with a single subcommand argument
pub trait CommandRunner {
    /// Spawn `path <command>`, wait for it and optionally capture stdout.
    /// Exit code 0 is the only success.
    fn run(&self, path: &Path, command: BoxCommand, capture_output: bool) -> RunResult;
}

/// Factory function to create a runner based on the dry_run flag.
/// Must be called inside the tokio runtime: the runner keeps its handle.
pub fn create_runner(config: &Config, dry_run: bool) -> Box<dyn CommandRunner + Send> {
    let runner = ProcessRunner::new(
        Handle::current(),
        config.command_timeout(),
        config.boxes.max_status_output_bytes,
    );
    if dry_run {
        Box::new(DryRunRunner::new(runner))
    } else {
        Box::new(runner)
    }
}

#[derive(Default)]
struct CapturedOutput {
    bytes: Vec<u8>,
    overflowed: bool,
}

/// Запускает скрипты через `tokio::process`. Интерфейс синхронный:
/// `run` вызывается из блокирующего потока основного цикла и ждёт
/// процесс через `Handle::block_on`.
pub struct ProcessRunner {
    handle: Handle,
    timeout: Option<Duration>,
    output_limit: usize,
}

impl ProcessRunner {
    pub fn new(handle: Handle, timeout: Option<Duration>, output_limit: usize) -> Self {
        Self {
            handle,
            timeout,
            output_limit,
        }
    }

    /// Читает stdout по мере поступления, пока процесс работает, чтобы
    /// большой вывод не заблокировал его на заполненном pipe. Прочитанное
    /// сразу видно через `captured`, даже если чтение так и не закончится.
    async fn read_limited(mut stdout: ChildStdout, limit: usize, captured: Arc<Mutex<CapturedOutput>>) {
        let mut chunk = [0u8; 1024];

        loop {
            let n = match stdout.read(&mut chunk).await {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) => {
                    debug!("Чтение вывода прервано: {}", e);
                    break;
                }
            };
            // Лишнее дочитываем и выбрасываем, иначе ребёнок повиснет на записи
            let mut out = captured.lock();
            let room = limit.saturating_sub(out.bytes.len());
            if n > room {
                out.overflowed = true;
            }
            out.bytes.extend_from_slice(&chunk[..n.min(room)]);
        }
    }

    async fn run_child(&self, path: &Path, command: BoxCommand, capture_output: bool) -> RunResult {
        let mut child = Command::new(path)
            .arg(command.as_arg())
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .stdout(if capture_output {
                Stdio::piped()
            } else {
                Stdio::inherit()
            })
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| LootError::spawn(path, e))?;

        let captured = Arc::new(Mutex::new(CapturedOutput::default()));
        let mut reader = child
            .stdout
            .take()
            .map(|stdout| tokio::spawn(Self::read_limited(stdout, self.output_limit, captured.clone())));

        let status = match self.timeout {
            Some(limit) => match timeout(limit, child.wait()).await {
                Ok(status) => status?,
                Err(_) => {
                    warn!("{} не ответил за {:?}, завершаем процесс", path.display(), limit);
                    // kill() дожидается процесса, зомби не остаётся
                    if let Err(e) = child.kill().await {
                        debug!("kill для {} не удался: {}", path.display(), e);
                    }
                    if let Some(reader) = reader.take() {
                        reader.abort();
                    }
                    return Err(LootError::Timeout {
                        path: path.to_path_buf(),
                        timeout: limit,
                    });
                }
            },
            None => child.wait().await?,
        };
        debug!("{} {} завершился: {}", path.display(), command, status);

        if let Some(mut reader) = reader {
            if timeout(OUTPUT_GRACE, &mut reader).await.is_err() {
                // pipe держит потомок скрипта: берём то, что успели прочитать
                debug!("Вывод {} не закрылся после выхода процесса", path.display());
                reader.abort();
            }
        }

        if !status.success() {
            return Err(LootError::ProcessFailure {
                path: path.to_path_buf(),
                status,
            });
        }

        let captured = std::mem::take(&mut *captured.lock());
        if captured.overflowed {
            return Err(LootError::OutputOverflow {
                path: path.to_path_buf(),
                limit: self.output_limit,
            });
        }

        Ok(captured.bytes)
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, path: &Path, command: BoxCommand, capture_output: bool) -> RunResult {
        debug_if_enabled!("Запуск {} {} (захват вывода: {})", path.display(), command, capture_output);
        self.handle.block_on(self.run_child(path, command, capture_output))
    }
}

/// Опрос состояния выполняется по-настоящему, `open`/`close` только логируются
pub struct DryRunRunner<R> {
    inner: R,
}

impl<R: CommandRunner> DryRunRunner<R> {
    pub fn new(inner: R) -> Self {
        info!("Dry-run режим - open/close не выполняются");
        Self { inner }
    }
}

impl<R: CommandRunner> CommandRunner for DryRunRunner<R> {
    fn run(&self, path: &Path, command: BoxCommand, capture_output: bool) -> RunResult {
        match command {
            BoxCommand::Status => self.inner.run(path, command, capture_output),
            BoxCommand::Open | BoxCommand::Close => {
                info!("Dry-run: пропускаем {} {}", path.display(), command);
                Ok(Vec::new())
            }
        }
    }
}
