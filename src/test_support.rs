//! Общие помощники для тестов: скрипты-боксы во временной директории и
//! индикатор, записывающий всё, что ему показали.

use crate::indicator::Indicator;
use crate::model::{BoxStatus, BoxView};
use parking_lot::{Mutex, MutexGuard};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tokio::runtime::{Handle, Runtime};

// Запись скрипта в одном потоке и fork() в другом дают ETXTBSY при exec,
// поэтому тесты, запускающие скрипты, выполняются по одному.
static SCRIPT_LOCK: Mutex<()> = parking_lot::const_mutex(());

pub fn script_guard() -> MutexGuard<'static, ()> {
    SCRIPT_LOCK.lock()
}

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Runtime для синхронных тестов, запускающих скрипты через `ProcessRunner`.
/// Многопоточный: только так `Handle::block_on` обслуживает процессы и таймеры.
pub fn runtime_handle() -> Handle {
    RUNTIME
        .get_or_init(|| {
            tokio::runtime::Builder::new_multi_thread()
                .worker_threads(2)
                .enable_all()
                .build()
                .unwrap()
        })
        .handle()
        .clone()
}

pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

pub fn write_plain(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
    path
}

/// Скрипт, состояние которого хранится в файле рядом с ним
pub fn write_stateful_script(dir: &Path, name: &str, initial: &str) -> PathBuf {
    let state = dir.join(format!(".{}.state", name));
    fs::write(&state, initial).unwrap();
    let body = format!(
        "STATE='{state}'\ncase \"$1\" in\n  status) cat \"$STATE\" ;;\n  open) echo opened > \"$STATE\" ;;\n  close) echo closed > \"$STATE\" ;;\n  *) exit 2 ;;\nesac",
        state = state.display()
    );
    write_script(dir, name, &body)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub combined: BoxStatus,
    pub boxes: Vec<BoxView>,
}

#[derive(Clone, Default)]
pub struct RecordingIndicator {
    published: Arc<Mutex<Vec<Published>>>,
    errors: Arc<Mutex<Vec<String>>>,
}

impl RecordingIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Vec<Published> {
        self.published.lock().clone()
    }

    pub fn last(&self) -> Option<Published> {
        self.published.lock().last().cloned()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().clone()
    }
}

impl Indicator for RecordingIndicator {
    fn status_changed(&self, combined: BoxStatus, boxes: &[BoxView]) {
        self.published.lock().push(Published {
            combined,
            boxes: boxes.to_vec(),
        });
    }

    fn show_error(&self, message: &str) {
        self.errors.lock().push(message.to_string());
    }
}
